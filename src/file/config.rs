use bevy::prelude::*;
use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::{ Path, PathBuf };
use thiserror::Error;

use crate::slider::DEFAULT_SHIFT_DURATION;

pub const CONFIG_FILE: &str = "fretboard.cfg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error while reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Resource)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub saves: SaveConfig,
    pub fretboard: FretboardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Fretboard".to_string(),
            width: 1000,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SaveConfig {
    pub directory: String,
    pub theme_file: String,
    pub preferences_file: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: "fretboard_app".to_string(),
            theme_file: "themes.yaml".to_string(),
            preferences_file: "preferences.yaml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FretboardConfig {
    pub theme: String,
    pub shift_duration_ms: u64,
}

impl Default for FretboardConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            shift_duration_ms: (DEFAULT_SHIFT_DURATION * 1000.0) as u64,
        }
    }
}

impl FretboardConfig {
    pub fn shift_duration_secs(&self) -> f32 {
        self.shift_duration_ms as f32 / 1000.0
    }
}

impl AppConfig {
    pub fn theme_path(&self) -> PathBuf {
        PathBuf::from(&self.saves.directory).join(&self.saves.theme_file)
    }

    pub fn preferences_path(&self) -> PathBuf {
        PathBuf::from(&self.saves.directory).join(&self.saves.preferences_file)
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let mut config = load_config(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
            warn!("Could not load '{}' ({e}), using built-in defaults", CONFIG_FILE);
            AppConfig::default()
        });

        match get_save_directory(&config.saves.directory) {
            Some(save_path) => {
                if let Err(e) = fs::create_dir_all(&save_path) {
                    error!("Failed to create save directory '{}': {e}", save_path.display());
                }
                config.saves.directory = save_path.to_string_lossy().into_owned();
            }
            None => warn!("No config directory on this platform, saving next to the executable"),
        }

        info!("Save directory: {}", config.saves.directory);
        app.insert_resource(config);
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

fn get_save_directory(save_dir: &str) -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push(save_dir);
    Some(path)
}
