//! Candidate move generation.
//!
//! Dispatch is capability-oriented: each [`PieceKind`] maps to an optional
//! strategy function, and a kind without a strategy simply produces no
//! candidate moves. Extending the board to a new piece kind means writing
//! one strategy and registering it in [`strategy`]; nothing else changes.
//!
//! Generation is pure: it reads the [`PieceRegistry`] and never mutates it.
//! The turn state machine decides when to run it (lazily, once per turn) and
//! where to store the results.

use crate::board::core::{Move, MoveKind, PieceKind};
use crate::board::registry::{Entry, PieceRegistry};

type Strategy = fn(&Entry, &PieceRegistry) -> Vec<Move>;

/// Looks up the move-generation strategy for a piece kind.
fn strategy(kind: PieceKind) -> Option<Strategy> {
    match kind {
        PieceKind::Pawn => Some(pawn_moves),
        // The remaining kinds stand on the board and can be captured, but do
        // not move on their own yet.
        PieceKind::Knight
        | PieceKind::Bishop
        | PieceKind::Rook
        | PieceKind::Queen
        | PieceKind::King => None,
    }
}

/// Computes the candidate destinations for one registered piece given the
/// current board.
#[must_use]
pub fn candidate_moves(entry: &Entry, registry: &PieceRegistry) -> Vec<Move> {
    match strategy(entry.piece.kind) {
        Some(generate) => generate(entry, registry),
        None => Vec::new(),
    }
}

/// Pawn-class movement, the template for the other kinds.
///
/// - Forward diagonals are captures, and only captures: they require an
///   opposing occupant. A diagonal onto the opposing King is classified
///   [`MoveKind::ExposesCheck`] instead of [`MoveKind::Capture`] because it
///   signals check rather than being executable.
/// - The square directly ahead is a quiet move when empty.
/// - The double advance additionally requires an untouched pawn and an empty
///   intervening square.
fn pawn_moves(entry: &Entry, registry: &PieceRegistry) -> Vec<Move> {
    let mut moves = Vec::new();
    let team = entry.piece.team;
    let forward = team.advance_direction();

    for file_delta in [-1, 1] {
        let Some(to) = entry.square.shift_by(file_delta, forward) else {
            continue;
        };
        match registry.entry_at(to) {
            Some(defender) if defender.piece.team != team => {
                let kind = if defender.piece.kind == PieceKind::King {
                    MoveKind::ExposesCheck
                } else {
                    MoveKind::Capture
                };
                moves.push(Move::new(to, kind));
            },
            // An empty square or a friendly occupant both forbid the
            // capture, for different reasons.
            _ => (),
        }
    }

    if let Some(ahead) = entry.square.shift_by(0, forward) {
        if !registry.occupied(ahead) {
            moves.push(Move::new(ahead, MoveKind::Quiet));
            if !entry.piece.has_moved {
                if let Some(two_ahead) = entry.square.shift_by(0, 2 * forward) {
                    if !registry.occupied(two_ahead) {
                        moves.push(Move::new(two_ahead, MoveKind::Quiet));
                    }
                }
            }
        }
    }

    moves
}
