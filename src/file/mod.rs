pub mod config;
pub mod preferences;
pub mod theme;

pub use config::{ AppConfig, ConfigError, ConfigPlugin };
pub use preferences::{ PreferenceError, PreferenceStore };
pub use theme::{ Theme, Themes };
