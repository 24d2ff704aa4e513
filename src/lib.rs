//! Board-state engine for a sensor-instrumented chessboard.
//!
//! The physical board reports one 8×8 boolean presence snapshot per poll and
//! exposes a serpentine LED strip for feedback. This crate turns those
//! snapshots into game semantics: it diffs successive polls into square
//! transitions, tracks which piece stands where, computes candidate moves
//! for the side to move, and walks a pickup/placement state machine that
//! guides the player with per-square highlights.
//!
//! Scanning the sensor matrix and driving the LED hardware are external
//! collaborators: the engine only consumes [`board::grid::Grid`] snapshots
//! and emits logical light states through [`board::lights::LightSink`].

#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic
)]

pub mod board;

pub use board::game::{Game, Mode};
