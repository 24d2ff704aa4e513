//! The authoritative mapping of occupied squares to pieces.
//!
//! The registry is exclusively owned and mutated by the turn state machine
//! ([`crate::board::game::Game`]); the move generator only reads it. Every
//! entry carries an opaque [`PieceId`] that stays stable for the registry's
//! lifetime, so removal is never sensitive to how earlier removals reordered
//! the underlying storage.

use std::fmt::{self, Write};

use anyhow::bail;
use strum::IntoEnumIterator;

use crate::board::core::{File, Move, Piece, PieceKind, Rank, Square, Team};
use crate::board::grid::Grid;

/// Opaque, stable identity of a registered piece. Ids are assigned
/// monotonically and never reused, including after removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceId(u32);

/// A registered piece: where it stands, what it is and the candidate moves
/// computed for it on its team's current turn.
#[derive(Clone, Debug)]
pub struct Entry {
    #[allow(missing_docs)]
    pub id: PieceId,
    #[allow(missing_docs)]
    pub square: Square,
    #[allow(missing_docs)]
    pub piece: Piece,
    /// Candidate destinations, refreshed lazily once per turn by the state
    /// machine. Stale between turns.
    pub moves: Vec<Move>,
}

/// Ordered collection of piece entries. Invariant: at most one entry per
/// square.
#[derive(Clone, Debug, Default)]
pub struct PieceRegistry {
    entries: Vec<Entry>,
    next_id: u32,
}

/// Back rank layout shared by both teams, file A through H.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl PieceRegistry {
    /// Creates a registry with no pieces on the board.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Seeds the fixed initial layout: Red on ranks 1 and 2, Blue on ranks 7
    /// and 8. The board reseeds to this layout on every cold start; there is
    /// no persistence.
    #[must_use]
    pub fn starting() -> Self {
        let mut registry = Self::empty();
        for (file, &kind) in File::iter().zip(BACK_RANK.iter()) {
            registry
                .insert(Square::new(file, Rank::One), Piece::new(kind, Team::Red))
                .expect("starting squares are distinct");
            registry
                .insert(
                    Square::new(file, Rank::Two),
                    Piece::new(PieceKind::Pawn, Team::Red),
                )
                .expect("starting squares are distinct");
            registry
                .insert(
                    Square::new(file, Rank::Seven),
                    Piece::new(PieceKind::Pawn, Team::Blue),
                )
                .expect("starting squares are distinct");
            registry
                .insert(Square::new(file, Rank::Eight), Piece::new(kind, Team::Blue))
                .expect("starting squares are distinct");
        }
        registry
    }

    /// Registers a piece on the given square and hands back its stable id.
    ///
    /// # Errors
    ///
    /// Fails if the square is already occupied: the one-piece-per-square
    /// invariant is enforced here, not by the callers.
    pub fn insert(&mut self, square: Square, piece: Piece) -> anyhow::Result<PieceId> {
        if self.occupied(square) {
            bail!("square {square} is already occupied");
        }
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            square,
            piece,
            moves: Vec::new(),
        });
        Ok(id)
    }

    /// Returns true if some entry sits on the given square.
    #[must_use]
    pub fn occupied(&self, square: Square) -> bool {
        self.entry_at(square).is_some()
    }

    /// Looks an entry up by square. An empty square returns `None`, it is
    /// not an error.
    #[must_use]
    pub fn entry_at(&self, square: Square) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.square == square)
    }

    /// Looks an entry up by its stable id.
    #[must_use]
    pub fn entry(&self, id: PieceId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    #[allow(missing_docs)]
    pub fn entry_mut(&mut self, id: PieceId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    /// Deletes the entry with the given id and returns it.
    ///
    /// # Errors
    ///
    /// Fails if no entry carries the id. A failing removal indicates a
    /// transition-handling bug upstream, never a user action.
    pub fn remove(&mut self, id: PieceId) -> anyhow::Result<Entry> {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(index) => Ok(self.entries.remove(index)),
            None => bail!("no registered piece with {id:?}"),
        }
    }

    /// Moves the entry with the given id to a new square.
    ///
    /// # Errors
    ///
    /// Fails if the id is unknown or the destination is held by another
    /// entry.
    pub fn relocate(&mut self, id: PieceId, to: Square) -> anyhow::Result<()> {
        if let Some(blocker) = self.entry_at(to) {
            if blocker.id != id {
                bail!("square {to} is already occupied");
            }
        }
        match self.entry_mut(id) {
            Some(entry) => {
                entry.square = to;
                Ok(())
            },
            None => bail!("no registered piece with {id:?}"),
        }
    }

    /// Iterates over the entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Number of registered pieces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The snapshot the presence sensors should report when every physical
    /// piece sits on its registered square. Seeds the accepted snapshot at
    /// start and after a reset.
    #[must_use]
    pub fn occupancy(&self) -> Grid {
        let mut grid = Grid::empty();
        for entry in &self.entries {
            grid.set(entry.square, true);
        }
        grid
    }

    /// Checks the registry invariants: unique squares and unique ids. Should
    /// hold at every observable point; checked via `debug_assert!` after
    /// every processed batch.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        for (index, entry) in self.entries.iter().enumerate() {
            for other in &self.entries[index + 1..] {
                if entry.square == other.square || entry.id == other.id {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for PieceRegistry {
    /// Renders the board rank 8 at the top, one piece symbol or dot per
    /// square.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.entry_at(Square::new(file, rank)) {
                    Some(entry) => write!(f, "{}", entry.piece)?,
                    None => f.write_char('.')?,
                }
                if file != File::H {
                    f.write_char(' ')?;
                }
            }
            if rank != Rank::One {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}
