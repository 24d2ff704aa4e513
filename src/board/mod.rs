//! Implementation of the board-state engine: sensor grid diffing, the piece
//! registry, candidate move generation, the turn state machine and the LED
//! feedback projector.

pub mod core;
pub mod game;
pub mod grid;
pub mod lights;
pub mod movegen;
pub mod registry;
