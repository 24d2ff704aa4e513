//! Primitives shared by the board engine: squares, teams, pieces, candidate
//! moves and sensor transitions.

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use hallboard::board::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Offsets the square by the given number of files and ranks. Returns
    /// `None` when *either* axis leaves the board: there is no wrap-around
    /// between e.g. H4 and A5.
    ///
    /// ```
    /// use hallboard::board::core::Square;
    ///
    /// assert_eq!(Square::B2.shift_by(0, 1), Some(Square::B3));
    /// assert_eq!(Square::A1.shift_by(-1, 0), None);
    /// assert_eq!(Square::H8.shift_by(0, 1), None);
    /// ```
    #[must_use]
    pub fn shift_by(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        const WIDTH: i8 = BOARD_WIDTH as i8;
        if !(0..WIDTH).contains(&file) || !(0..WIDTH).contains(&rank) {
            return None;
        }
        Some(unsafe { mem::transmute((file + rank * WIDTH) as u8) })
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its index on the board (the bit position in a
    /// [`crate::board::grid::Grid`]).
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<(u8, u8)> for Square {
    type Error = anyhow::Error;

    /// Creates a square from a 1-based `(file, rank)` pair, the convention
    /// used on the sensor side of the board. *Both* components must lie
    /// within `[1, 8]`.
    ///
    /// # Errors
    ///
    /// If either component is out of range.
    fn try_from((file, rank): (u8, u8)) -> anyhow::Result<Self> {
        if !(1..=BOARD_WIDTH).contains(&file) {
            bail!("file should be within 1..=8, got {file}");
        }
        if !(1..=BOARD_WIDTH).contains(&rank) {
            bail!("rank should be within 1..=8, got {rank}");
        }
        Ok(Self::new(File::try_from(file - 1)?, Rank::try_from(rank - 1)?))
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.bytes().len()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the board. In chess notation, it is
/// normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

/// Represents a horizontal row of the board. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A game is played between two teams: Red (having the advantage of the
/// first turn, advancing towards higher ranks) and Blue (advancing towards
/// lower ranks).
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// "Flips" the team.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Rank delta of a forward step for this team's pawns.
    pub(crate) fn advance_direction(self) -> i8 {
        match self {
            Self::Red => 1,
            Self::Blue => -1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Team::Red => "red",
                Team::Blue => "blue",
            }
        )
    }
}

/// Standard chess piece kinds. Only [`PieceKind::Pawn`] currently carries a
/// move-generation strategy; the remaining kinds occupy squares and can be
/// captured, but produce no candidate moves of their own.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        })
    }
}

/// A physical piece owned by a team. `has_moved` starts out `false` and
/// flips permanently to `true` once the piece completes its first placement,
/// which disables the pawn's double advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    #[allow(missing_docs)]
    pub kind: PieceKind,
    #[allow(missing_docs)]
    pub team: Team,
    #[allow(missing_docs)]
    pub has_moved: bool,
}

impl Piece {
    /// Creates a piece that has not yet made its first move.
    #[must_use]
    pub const fn new(kind: PieceKind, team: Team) -> Self {
        Self {
            kind,
            team,
            has_moved: false,
        }
    }
}

impl fmt::Display for Piece {
    /// Red pieces are rendered uppercase, Blue pieces lowercase.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(match (&self.team, &self.kind) {
            (Team::Red, PieceKind::Pawn) => 'P',
            (Team::Red, PieceKind::Knight) => 'N',
            (Team::Red, PieceKind::Bishop) => 'B',
            (Team::Red, PieceKind::Rook) => 'R',
            (Team::Red, PieceKind::Queen) => 'Q',
            (Team::Red, PieceKind::King) => 'K',
            (Team::Blue, PieceKind::Pawn) => 'p',
            (Team::Blue, PieceKind::Knight) => 'n',
            (Team::Blue, PieceKind::Bishop) => 'b',
            (Team::Blue, PieceKind::Rook) => 'r',
            (Team::Blue, PieceKind::Queen) => 'q',
            (Team::Blue, PieceKind::King) => 'k',
        })
    }
}

/// Classification of a candidate destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Move to an unoccupied, legal destination.
    Quiet,
    /// Move onto a square held by an opposing piece, contingent on that
    /// piece being lifted off first.
    Capture,
    /// A capture candidate targeting the opposing King. Signals check and is
    /// never executable as a normal capture.
    ExposesCheck,
}

/// A candidate destination for the piece it is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    #[allow(missing_docs)]
    pub to: Square,
    #[allow(missing_docs)]
    pub kind: MoveKind,
}

impl Move {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(to: Square, kind: MoveKind) -> Self {
        Self { to, kind }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to)?;
        match self.kind {
            MoveKind::Quiet => Ok(()),
            MoveKind::Capture => write!(f, "x"),
            MoveKind::ExposesCheck => write!(f, "+"),
        }
    }
}

/// Direction of a single sensor cell flip between two polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorEdge {
    /// Sensor newly triggered: an object landed on the square.
    Rising,
    /// Sensor newly cleared: an object was lifted off the square.
    Falling,
}

/// One square's sensor flip, the semantic event the turn state machine
/// consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareTransition {
    #[allow(missing_docs)]
    pub square: Square,
    #[allow(missing_docs)]
    pub edge: SensorEdge,
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn square_file_rank() {
        assert_eq!(Square::new(File::B, Rank::Three), Square::B3);
        assert_eq!(Square::H8.file(), File::H);
        assert_eq!(Square::H8.rank(), Rank::Eight);
        for square in Square::iter() {
            assert_eq!(Square::new(square.file(), square.rank()), square);
        }
    }

    #[test]
    fn square_from_pair_requires_both_axes_in_range() {
        // The four corner/edge cases: one axis in range is not enough.
        assert!(Square::try_from((0, 5)).is_err());
        assert!(Square::try_from((9, 5)).is_err());
        assert!(Square::try_from((5, 0)).is_err());
        assert!(Square::try_from((5, 9)).is_err());
        assert!(Square::try_from((0, 0)).is_err());
        assert!(Square::try_from((9, 9)).is_err());

        assert_eq!(Square::try_from((1, 1)).unwrap(), Square::A1);
        assert_eq!(Square::try_from((8, 8)).unwrap(), Square::H8);
        assert_eq!(Square::try_from((2, 3)).unwrap(), Square::B3);
    }

    #[test]
    fn square_shift_does_not_wrap() {
        assert_eq!(Square::H4.shift_by(1, 0), None);
        assert_eq!(Square::H4.shift_by(1, 1), None);
        assert_eq!(Square::A5.shift_by(-1, -1), None);
        assert_eq!(Square::D8.shift_by(0, 1), None);
        assert_eq!(Square::D1.shift_by(0, -1), None);
        assert_eq!(Square::D4.shift_by(1, 2), Some(Square::E6));
    }

    #[test]
    fn square_parsing() {
        assert_eq!(Square::try_from("a1").unwrap(), Square::A1);
        assert_eq!(Square::try_from("e2").unwrap(), Square::E2);
        assert!(Square::try_from("i1").is_err());
        assert!(Square::try_from("a9").is_err());
        assert!(Square::try_from("e25").is_err());
    }

    #[test]
    fn team_alternates() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent(), Team::Red);
        assert_eq!(Team::Red.opponent().opponent(), Team::Red);
    }

    #[test]
    fn move_display() {
        assert_eq!(Move::new(Square::B3, MoveKind::Quiet).to_string(), "b3");
        assert_eq!(Move::new(Square::C3, MoveKind::Capture).to_string(), "c3x");
        assert_eq!(
            Move::new(Square::C3, MoveKind::ExposesCheck).to_string(),
            "c3+"
        );
    }
}
