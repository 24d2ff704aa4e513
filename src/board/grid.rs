//! [`Grid`]-based representation of one full snapshot of the presence
//! sensors. A snapshot is a thin wrapper around [u64], which makes comparing
//! two polls a couple of bit operations instead of a nested loop over an
//! 8×8 matrix. The sensor-scanning collaborator samples the physical board
//! and hands the core one `Grid` per poll.

use std::fmt;
use std::mem;

use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::board::core::{
    SensorEdge,
    Square,
    SquareTransition,
    BOARD_SIZE,
    BOARD_WIDTH,
};

/// Transitions produced by one diff. There are at most [`BOARD_SIZE`] of
/// them, so the list lives on the stack.
pub type TransitionList = ArrayVec<SquareTransition, { BOARD_SIZE as usize }>;

/// A set of occupied squares as seen by the presence sensors. Mirroring
/// [`Square`] semantics, the least significant bit corresponds to A1 and the
/// most significant bit to H8.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    bits: u64,
}

impl Grid {
    /// Constructs a snapshot from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs a snapshot with no object detected anywhere.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Converts the raw zero-based sample the grid scanner produces. The
    /// outer index is the file (the scanner drives one column at a time),
    /// the inner index is the rank.
    #[must_use]
    pub fn from_cells(cells: &[[bool; BOARD_WIDTH as usize]; BOARD_WIDTH as usize]) -> Self {
        let mut bits = 0u64;
        for (file, column) in cells.iter().enumerate() {
            for (rank, &present) in column.iter().enumerate() {
                if present {
                    bits |= 1u64 << (rank * BOARD_WIDTH as usize + file);
                }
            }
        }
        Self { bits }
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// Returns true if the sensor under the given square detects an object.
    #[must_use]
    pub const fn is_set(self, square: Square) -> bool {
        (self.bits & (1u64 << square as u8)) != 0
    }

    /// Overrides a single cell. Used by simulated sensors; the real scanner
    /// produces whole snapshots at once.
    pub fn set(&mut self, square: Square, present: bool) {
        if present {
            self.bits |= 1u64 << square as u8;
        } else {
            self.bits &= !(1u64 << square as u8);
        }
    }

    /// Number of cells on which the two snapshots disagree.
    #[must_use]
    pub const fn distance(self, other: Self) -> u32 {
        (self.bits ^ other.bits).count_ones()
    }

    /// Compares this snapshot against the previously accepted one and
    /// returns one [`SquareTransition`] per differing cell, in ascending
    /// square order (rank-major from A1). The edge is
    /// [`SensorEdge::Rising`] when the cell is newly set. Equal snapshots
    /// yield an empty list and the caller must skip all downstream
    /// processing in that case.
    #[must_use]
    pub fn diff(self, previous: Self) -> TransitionList {
        let mut transitions = TransitionList::new();
        let mut changed = self.bits ^ previous.bits;
        while changed != 0 {
            let index = changed.trailing_zeros() as u8;
            // The trailing zero count of a non-zero u64 is below 64.
            let square: Square = unsafe { mem::transmute(index) };
            let edge = if self.is_set(square) {
                SensorEdge::Rising
            } else {
                SensorEdge::Falling
            };
            transitions.push(SquareTransition { square, edge });
            changed &= changed - 1;
        }
        transitions
    }
}

impl fmt::Debug for Grid {
    /// Renders the snapshot as an 8×8 dot matrix, rank 8 at the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            format!("{:064b}", self.bits)
                .chars()
                .rev()
                .chunks(BOARD_WIDTH as usize)
                .into_iter()
                .map(|chunk| {
                    chunk
                        .map(|ch| match ch {
                            '1' => '1',
                            '0' => '.',
                            _ => unreachable!(),
                        })
                        .join(" ")
                })
                .collect::<Vec<String>>()
                .iter()
                .rev()
                .join("\n")
        )
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cell_conversion() {
        let mut cells = [[false; 8]; 8];
        // cells[file][rank], zero-based.
        cells[0][0] = true;
        cells[7][0] = true;
        cells[1][1] = true;
        cells[7][7] = true;
        let grid = Grid::from_cells(&cells);
        assert!(grid.is_set(Square::A1));
        assert!(grid.is_set(Square::H1));
        assert!(grid.is_set(Square::B2));
        assert!(grid.is_set(Square::H8));
        assert_eq!(grid.bits().count_ones(), 4);
    }

    #[test]
    fn diff_is_empty_for_identical_snapshots() {
        let mut grid = Grid::empty();
        grid.set(Square::E4, true);
        grid.set(Square::C7, true);
        assert!(grid.diff(grid).is_empty());
        assert!(Grid::empty().diff(Grid::empty()).is_empty());
    }

    #[test]
    fn diff_matches_hamming_distance() {
        let mut previous = Grid::empty();
        previous.set(Square::B2, true);
        previous.set(Square::C3, true);
        previous.set(Square::H8, true);

        let mut current = previous;
        current.set(Square::B2, false);
        current.set(Square::A1, true);
        current.set(Square::G5, true);

        let transitions = current.diff(previous);
        assert_eq!(transitions.len() as u32, current.distance(previous));
        assert_eq!(
            transitions.as_slice(),
            [
                SquareTransition {
                    square: Square::A1,
                    edge: SensorEdge::Rising,
                },
                SquareTransition {
                    square: Square::B2,
                    edge: SensorEdge::Falling,
                },
                SquareTransition {
                    square: Square::G5,
                    edge: SensorEdge::Rising,
                },
            ]
        );
    }

    #[test]
    fn grid_rendering() {
        let mut grid = Grid::empty();
        grid.set(Square::A1, true);
        grid.set(Square::H8, true);
        let rendered = format!("{grid:?}");
        assert_eq!(rendered.lines().count(), 8);
        assert!(rendered.starts_with(". . . . . . . 1"));
        assert!(rendered.ends_with("1 . . . . . . ."));
    }
}
