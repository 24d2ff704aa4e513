//! Cross-module properties of the grid differ, the registry and the
//! projector, exercised through the public API.

use hallboard::board::core::{SensorEdge, Square, BOARD_SIZE};
use hallboard::board::grid::Grid;
use hallboard::board::lights::strip_index;
use hallboard::board::registry::PieceRegistry;
use pretty_assertions::assert_eq;
use strum::IntoEnumIterator;

/// Tiny deterministic generator, enough to produce varied bit patterns
/// without pulling in a dependency.
fn xorshift(state: &mut u64) -> u64 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    *state
}

#[test]
fn diff_size_equals_hamming_distance() {
    let mut state = 0x9E37_79B9_7F4A_7C15;
    for _ in 0..1000 {
        let current = Grid::from_bits(xorshift(&mut state));
        let previous = Grid::from_bits(xorshift(&mut state));
        let transitions = current.diff(previous);
        assert_eq!(transitions.len() as u32, current.distance(previous));
        for transition in &transitions {
            let expected = if current.is_set(transition.square) {
                SensorEdge::Rising
            } else {
                SensorEdge::Falling
            };
            assert_eq!(transition.edge, expected);
            assert_ne!(
                current.is_set(transition.square),
                previous.is_set(transition.square)
            );
        }
    }
}

#[test]
fn diff_against_self_is_empty() {
    let mut state = 42;
    for _ in 0..100 {
        let grid = Grid::from_bits(xorshift(&mut state));
        assert!(grid.diff(grid).is_empty());
    }
}

#[test]
fn diff_labels_every_flip() {
    let previous = Grid::empty();
    let mut current = Grid::empty();
    for square in [Square::A1, Square::D4, Square::H8] {
        current.set(square, true);
    }
    for transition in current.diff(previous) {
        assert_eq!(transition.edge, SensorEdge::Rising);
    }
    for transition in previous.diff(current) {
        assert_eq!(transition.edge, SensorEdge::Falling);
    }
}

#[test]
fn registry_never_doubles_a_square() {
    let registry = PieceRegistry::starting();
    assert!(registry.is_consistent());
    let squares: Vec<Square> = registry.entries().map(|entry| entry.square).collect();
    let mut deduplicated = squares.clone();
    deduplicated.sort_unstable();
    deduplicated.dedup();
    assert_eq!(squares.len(), deduplicated.len());
}

#[test]
fn projector_spec_points() {
    // (file, rank) -> strip index, 1-based pairs as the wiring diagram uses.
    assert_eq!(strip_index(Square::try_from((1, 1)).unwrap()), 0);
    assert_eq!(strip_index(Square::try_from((8, 2)).unwrap()), 8);
    assert_eq!(strip_index(Square::try_from((1, 2)).unwrap()), 15);
    assert_eq!(strip_index(Square::try_from((8, 1)).unwrap()), 7);
}

#[test]
fn projector_covers_the_whole_strip() {
    let mut seen = [false; BOARD_SIZE as usize];
    for square in Square::iter() {
        let index = strip_index(square);
        assert!(!seen[index], "index {index} mapped twice");
        seen[index] = true;
    }
    assert!(seen.iter().all(|&mapped| mapped));
}

#[test]
fn coordinate_bounds_are_two_dimensional() {
    // One axis in range must not be enough.
    for pair in [(0, 5), (9, 5), (5, 0), (5, 9), (0, 0), (9, 9), (255, 1)] {
        assert!(Square::try_from(pair).is_err(), "{pair:?} should be rejected");
    }
    for pair in [(1, 1), (1, 8), (8, 1), (8, 8)] {
        assert!(Square::try_from(pair).is_ok(), "{pair:?} should be accepted");
    }
}
