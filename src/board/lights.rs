//! Feedback projector: maps board squares onto the addressable LED strip
//! and renders candidate moves as per-square highlights.
//!
//! The strip snakes across the board (serpentine wiring keeps the leads
//! between rows short): odd 1-based ranks run low-to-high file, even ranks
//! high-to-low. The projector only produces logical `(index, light)` pairs
//! plus a single flush per render; pushing the colors out to the hardware is
//! the illumination driver's job, abstracted behind [`LightSink`].

use std::fmt;

use crate::board::core::{Move, MoveKind, Square, BOARD_SIZE, BOARD_WIDTH};

/// Number of addressable positions on the strip, one per square.
pub const STRIP_LENGTH: usize = BOARD_SIZE as usize;

/// Logical state of one strip position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SquareLight {
    #[allow(missing_docs)]
    #[default]
    Off,
    /// Destination of a quiet candidate move.
    QuietHighlight,
    /// Destination of a capture candidate move.
    CaptureHighlight,
}

/// The illumination-driving collaborator. A render issues one [`set`] per
/// strip position followed by exactly one [`flush`], which bounds the
/// hardware transaction count to one per redraw.
///
/// [`set`]: LightSink::set
/// [`flush`]: LightSink::flush
pub trait LightSink {
    /// Stages the light state of one strip position.
    fn set(&mut self, index: usize, light: SquareLight);
    /// Pushes all staged states out to the hardware.
    fn flush(&mut self);
}

/// Maps a square to its 0-based position on the serpentine strip.
///
/// ```
/// use hallboard::board::core::Square;
/// use hallboard::board::lights::strip_index;
///
/// // Odd ranks run low-to-high file.
/// assert_eq!(strip_index(Square::A1), 0);
/// // Even ranks run high-to-low.
/// assert_eq!(strip_index(Square::H2), 8);
/// ```
#[must_use]
pub fn strip_index(square: Square) -> usize {
    let file = square.file() as usize;
    let rank = square.rank() as usize;
    let width = BOARD_WIDTH as usize;
    if rank % 2 == 0 {
        rank * width + file
    } else {
        rank * width + (width - 1 - file)
    }
}

/// Redraws the whole strip for the given candidate moves: quiet candidates
/// glow [`SquareLight::QuietHighlight`], captures
/// [`SquareLight::CaptureHighlight`], every other square is explicitly set
/// [`SquareLight::Off`]. [`MoveKind::ExposesCheck`] candidates are not
/// executable and stay dark. Ends with a single flush.
pub fn render(moves: &[Move], sink: &mut impl LightSink) {
    let mut frame = [SquareLight::Off; STRIP_LENGTH];
    for candidate in moves {
        let light = match candidate.kind {
            MoveKind::Quiet => SquareLight::QuietHighlight,
            MoveKind::Capture => SquareLight::CaptureHighlight,
            MoveKind::ExposesCheck => SquareLight::Off,
        };
        frame[strip_index(candidate.to)] = light;
    }
    for (index, light) in frame.iter().enumerate() {
        sink.set(index, *light);
    }
    sink.flush();
}

/// Turns the whole strip off with a single flush.
pub fn clear(sink: &mut impl LightSink) {
    render(&[], sink);
}

/// In-memory strip used by the simulator binary and the tests, in place of
/// the real LED driver.
#[derive(Clone, Debug)]
pub struct MemoryStrip {
    lights: [SquareLight; STRIP_LENGTH],
    flushes: usize,
}

impl MemoryStrip {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last flushed state of one strip position.
    #[must_use]
    pub fn light(&self, index: usize) -> SquareLight {
        self.lights[index]
    }

    /// How many flushes the sink has seen so far.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Iterates over the positions that are not off.
    pub fn lit(&self) -> impl Iterator<Item = (usize, SquareLight)> + '_ {
        self.lights
            .iter()
            .enumerate()
            .filter(|(_, light)| **light != SquareLight::Off)
            .map(|(index, light)| (index, *light))
    }
}

impl Default for MemoryStrip {
    fn default() -> Self {
        Self {
            lights: [SquareLight::Off; STRIP_LENGTH],
            flushes: 0,
        }
    }
}

impl LightSink for MemoryStrip {
    fn set(&mut self, index: usize, light: SquareLight) {
        self.lights[index] = light;
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

impl fmt::Display for MemoryStrip {
    /// One line per lit LED, or `all off`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut any = false;
        for (index, light) in self.lit() {
            if any {
                writeln!(f)?;
            }
            any = true;
            let label = match light {
                SquareLight::QuietHighlight => "quiet",
                SquareLight::CaptureHighlight => "capture",
                SquareLight::Off => unreachable!("lit() filters off positions"),
            };
            write!(f, "led {index}: {label}")?;
        }
        if !any {
            write!(f, "all off")?;
        }
        Ok(())
    }
}
