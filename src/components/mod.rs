pub mod controls;
pub mod fretboard_view;

pub use controls::{ apply_action, step_zoom, ControlAction, ControlsPlugin };
pub use fretboard_view::{ FretboardPlugin, FretboardSystems, FretboardView };
