pub mod components;
pub mod error;
pub mod file;
pub mod neck;
pub mod session;
pub mod slider;
pub mod states;
pub mod theory;

#[cfg(not(feature = "production"))]
pub mod debug;

pub use error::FretboardError;
pub use session::{ FretboardChanged, FretboardSession, FretboardState, StateChange };
pub use slider::{ Direction, SliderPhase };
