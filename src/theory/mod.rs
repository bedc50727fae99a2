pub mod highlight;
pub mod interval;
pub mod pitch;

pub use highlight::{header_text, pentatonic_label, HighlightMode, HighlightSet, MarkerHighlight};
pub use interval::{interval_between, Interval};
pub use pitch::{PitchClass, PITCH_COUNT};
