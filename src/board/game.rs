//! The turn state machine: consumes sensor transitions, validates the
//! human's physical actions against the computed candidate moves, mutates
//! the piece registry and advances turn ownership.
//!
//! One polling cycle is one call to [`Game::process`] with a fresh sensor
//! snapshot. Everything happens synchronously inside that call; the
//! registry is never shared, so no locking discipline is needed. A stuck
//! mid-move state simply persists until a matching physical action occurs.

use anyhow::bail;

use crate::board::core::{Move, MoveKind, SensorEdge, SquareTransition, Team};
use crate::board::grid::Grid;
use crate::board::lights::{self, LightSink};
use crate::board::movegen;
use crate::board::registry::{PieceId, PieceRegistry};

/// Where the machine is within the pickup/placement cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Waiting for the side to move to lift one of its pieces.
    AwaitingPickup,
    /// A piece is in the player's hand; waiting for it to land on a legal
    /// destination (captures first lift the defender off).
    AwaitingPlacement,
    /// An internal inconsistency was detected. The machine ignores all
    /// input until [`Game::reset`].
    Error,
}

/// The board controller. Owns the piece registry, the mode, the side to
/// move and the last accepted sensor snapshot; the state machine cycles
/// `AwaitingPickup` → `AwaitingPlacement` → `AwaitingPickup` indefinitely,
/// there is no terminal state.
#[derive(Clone, Debug)]
pub struct Game {
    registry: PieceRegistry,
    mode: Mode,
    side_to_move: Team,
    in_play: Option<PieceId>,
    moves_fresh: bool,
    accepted: Grid,
}

impl Game {
    /// Creates a board seeded with the fixed starting layout, Red to move.
    /// The accepted snapshot starts out matching the registry, so the first
    /// poll of a correctly set up physical board produces no transitions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(PieceRegistry::starting())
    }

    /// Creates a board over a custom position. Used for setting up studies
    /// and by the tests.
    #[must_use]
    pub fn with_registry(registry: PieceRegistry) -> Self {
        let accepted = registry.occupancy();
        Self {
            registry,
            mode: Mode::AwaitingPickup,
            side_to_move: Team::Red,
            in_play: None,
            moves_fresh: false,
            accepted,
        }
    }

    /// Discards all state and reseeds the starting layout. The only way out
    /// of [`Mode::Error`].
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn side_to_move(&self) -> Team {
        self.side_to_move
    }

    /// Read access to the piece registry. All mutation goes through
    /// [`Game::process`].
    #[must_use]
    pub fn registry(&self) -> &PieceRegistry {
        &self.registry
    }

    /// The id of the piece currently in the player's hand, if any.
    #[must_use]
    pub fn piece_in_play(&self) -> Option<PieceId> {
        self.in_play
    }

    /// Runs one polling cycle: refreshes candidate moves if they went stale
    /// at the end of the previous turn, diffs the snapshot against the last
    /// accepted one and feeds every transition of the batch through the
    /// state machine in order. Two identical consecutive snapshots mean
    /// "nothing happened" and re-run no transitions.
    ///
    /// # Errors
    ///
    /// An error reports an internal inconsistency (a registry operation that
    /// cannot fail under intact invariants failed). The machine switches to
    /// [`Mode::Error`] and stays inert until [`Game::reset`].
    pub fn process(&mut self, snapshot: Grid, sink: &mut impl LightSink) -> anyhow::Result<()> {
        if self.mode == Mode::Error {
            return Ok(());
        }
        if !self.moves_fresh {
            self.refresh_moves();
            self.moves_fresh = true;
        }
        let transitions = snapshot.diff(self.accepted);
        self.accepted = snapshot;
        for transition in transitions {
            if let Err(error) = self.step(transition, sink) {
                self.mode = Mode::Error;
                return Err(error);
            }
        }
        debug_assert!(self.registry.is_consistent());
        Ok(())
    }

    /// Recomputes candidate moves for every piece of the side to move. Runs
    /// at most once per turn, never per sensing cycle.
    fn refresh_moves(&mut self) {
        let side = self.side_to_move;
        let fresh: Vec<(PieceId, Vec<Move>)> = self
            .registry
            .entries()
            .filter(|entry| entry.piece.team == side)
            .map(|entry| (entry.id, movegen::candidate_moves(entry, &self.registry)))
            .collect();
        for (id, moves) in fresh {
            if let Some(entry) = self.registry.entry_mut(id) {
                entry.moves = moves;
            }
        }
    }

    fn step(
        &mut self,
        transition: SquareTransition,
        sink: &mut impl LightSink,
    ) -> anyhow::Result<()> {
        match self.mode {
            Mode::AwaitingPickup => {
                self.handle_pickup(transition, sink);
                Ok(())
            },
            Mode::AwaitingPlacement => self.handle_placement(transition, sink),
            Mode::Error => Ok(()),
        }
    }

    fn handle_pickup(&mut self, transition: SquareTransition, sink: &mut impl LightSink) {
        // A transition on an empty square is meaningless here: boolean
        // sensors produce phantom flips under jitter.
        let Some(entry) = self.registry.entry_at(transition.square) else {
            return;
        };
        if entry.piece.team != self.side_to_move
            || entry.moves.is_empty()
            || transition.edge != SensorEdge::Falling
        {
            return;
        }
        self.in_play = Some(entry.id);
        lights::render(&entry.moves, sink);
        self.mode = Mode::AwaitingPlacement;
    }

    fn handle_placement(
        &mut self,
        transition: SquareTransition,
        sink: &mut impl LightSink,
    ) -> anyhow::Result<()> {
        let Some(id) = self.in_play else {
            bail!("awaiting placement with no piece in play");
        };
        let Some(entry) = self.registry.entry(id) else {
            bail!("piece in play ({id:?}) is missing from the registry");
        };
        let candidate = entry
            .moves
            .iter()
            .enumerate()
            .find(|(_, candidate)| candidate.to == transition.square)
            .map(|(index, candidate)| (index, *candidate));
        // The player has not produced a legal action yet: keep waiting.
        let Some((index, candidate)) = candidate else {
            return Ok(());
        };

        match (candidate.kind, transition.edge) {
            // The piece landed on a legal empty destination: commit.
            (MoveKind::Quiet, SensorEdge::Rising) => {
                self.registry.relocate(id, candidate.to)?;
                if let Some(entry) = self.registry.entry_mut(id) {
                    entry.piece.has_moved = true;
                    entry.moves.clear();
                }
                lights::clear(sink);
                self.in_play = None;
                self.moves_fresh = false;
                self.side_to_move = self.side_to_move.opponent();
                self.mode = Mode::AwaitingPickup;
            },
            // The defender was lifted off: take it off the board and let the
            // ordinary quiet-placement path finish the capture.
            (MoveKind::Capture, SensorEdge::Falling) => {
                let defender = self
                    .registry
                    .entry_at(transition.square)
                    .map(|defender| defender.id);
                let Some(defender) = defender else {
                    bail!(
                        "capture candidate at {} has no defender",
                        transition.square
                    );
                };
                let _taken = self.registry.remove(defender)?;
                if let Some(entry) = self.registry.entry_mut(id) {
                    entry.moves[index].kind = MoveKind::Quiet;
                }
            },
            // Wrong edge for the candidate, or an ExposesCheck signal:
            // nothing to execute.
            _ => (),
        }
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
