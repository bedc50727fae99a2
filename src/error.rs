use thiserror::Error;

use crate::neck::lattice::{MAX_STRINGS, MIN_STRINGS};
use crate::neck::geometry::{MAX_FRET_COUNT, MAX_ZOOM, MIN_FRET_COUNT, MIN_ZOOM};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FretboardError {
    #[error("Unknown pitch name '{0}'")]
    UnknownPitch(String),

    #[error("Invalid string number {index} (expected 0..{count})")]
    StringOutOfRange { index: usize, count: usize },

    #[error("Invalid fret number {position} (expected 0..={max})")]
    PositionOutOfRange { position: usize, max: usize },

    #[error("Tuning must have between {min} and {max} strings, got {0}", min = MIN_STRINGS, max = MAX_STRINGS)]
    InvalidTuning(usize),

    #[error("Fret count must be between {min} and {max}, got {0}", min = MIN_FRET_COUNT, max = MAX_FRET_COUNT)]
    InvalidFretCount(usize),

    #[error("Zoom must be a finite value between {min} and {max}, got {0}", min = MIN_ZOOM, max = MAX_ZOOM)]
    InvalidZoom(f32),

    #[error("Unknown highlight mode '{0}'")]
    UnknownHighlightMode(String),

    #[error("Invalid shift direction {0} (expected -1 or 1)")]
    InvalidDirection(i32),

    #[error("Cannot reconfigure the fretboard while a shift is in progress")]
    ShiftInProgress,
}
