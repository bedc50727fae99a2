pub mod geometry;
pub mod lattice;
pub mod markings;

pub use geometry::ViewportGeometry;
pub use lattice::{build_lattice, build_markers, FretLattice, NoteMarker, StringTuning, TuningPreset};
pub use markings::{romanize, visible_inlays, Inlay};
