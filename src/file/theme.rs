use bevy::prelude::*;
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::file::config::{ AppConfig, ConfigError };
use crate::states::StartupLatch;

pub const DEFAULT_THEME: &str = "default";

#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    #[serde(with = "srgb_float")]
    pub background: Color,
    #[serde(with = "srgb_float")]
    pub neck: Color,
    #[serde(with = "srgb_float")]
    pub nut: Color,
    #[serde(with = "srgb_float")]
    pub fret: Color,
    #[serde(with = "srgb_float")]
    pub string: Color,
    #[serde(with = "srgb_float")]
    pub inlay: Color,
    #[serde(with = "srgb_float")]
    pub marker: Color,
    #[serde(with = "srgb_float")]
    pub marker_outline: Color,
    #[serde(with = "srgb_float")]
    pub highlight: Color,
    /// One colour per chord tone, root first. Tones past the end of the
    /// palette wrap back to its start.
    #[serde(with = "srgb_float_list")]
    pub chord_tones: Vec<Color>,
    #[serde(with = "srgb_float")]
    pub text_primary: Color,
    #[serde(with = "srgb_float")]
    pub text_secondary: Color,
    #[serde(with = "srgb_float")]
    pub button: Color,
    #[serde(with = "srgb_float")]
    pub button_hover: Color,
    #[serde(with = "srgb_float")]
    pub button_press: Color,
}

impl Theme {
    pub fn chord_tone(&self, tone: usize) -> Color {
        match self.chord_tones.len() {
            0 => self.highlight,
            len => self.chord_tones[tone % len],
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::srgb(0.149, 0.1529, 0.1451), // #262725
            neck: Color::srgb(0.8902, 0.8039, 0.7137), // #E3CDB6
            nut: Color::srgb(0.9608, 0.9608, 0.8627), // #F5F5DC
            fret: Color::srgb(0.4118, 0.4118, 0.4118), // DimGray
            string: Color::srgb(0.0, 0.0, 0.0),
            inlay: Color::srgb(0.5, 0.5, 0.5),
            marker: Color::srgb(1.0, 1.0, 1.0),
            marker_outline: Color::srgb(0.0, 0.0, 0.0),
            highlight: Color::srgb(0.0, 0.502, 0.0), // green
            chord_tones: vec![
                Color::srgb(0.0, 0.651, 0.4627), // #00A676
                Color::srgb(1.0, 0.498, 0.0549), // #FF7F0E
                Color::srgb(0.1216, 0.4667, 0.7059), // #1F77B4
                Color::srgb(0.8392, 0.1529, 0.1569), // #D62728
            ],
            text_primary: Color::srgb(0.8196, 0.8118, 0.8118), // #d1cfcf
            text_secondary: Color::srgb(0.0471, 0.0471, 0.0471), // #0c0c0c
            button: Color::srgb(0.2235, 0.1765, 0.1961), // #392d32
            button_hover: Color::srgb(0.3, 0.25, 0.27),
            button_press: Color::srgb(0.7686, 0.2627, 0.0706), // #C44312
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Resource)]
pub struct Themes {
    pub themes: HashMap<String, Theme>,
}

impl Themes {
    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }
}

impl Default for Themes {
    fn default() -> Self {
        let mut themes = HashMap::new();
        themes.insert(DEFAULT_THEME.to_string(), Theme::default());
        Themes { themes }
    }
}

pub fn load_or_create_themes(path: &Path) -> Result<Themes, ConfigError> {
    if !path.exists() {
        warn!("Theme file not found at '{}', creating default theme file...", path.display());
        let default_themes = Themes::default();
        fs::write(path, serde_yaml::to_string(&default_themes)?)?;
        return Ok(default_themes);
    }

    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

pub fn setup_theme(
    mut commands: Commands,
    config: Res<AppConfig>,
    mut latch: ResMut<StartupLatch>,
) {
    let theme_path = config.theme_path();
    let themes = load_or_create_themes(&theme_path).unwrap_or_else(|e| {
        warn!("Could not load themes from '{}' ({e}), using the built-in palette", theme_path.display());
        Themes::default()
    });

    let theme = themes.get(&config.fretboard.theme).cloned().unwrap_or_else(|| {
        warn!("Theme '{}' not found, using the built-in palette", config.fretboard.theme);
        Theme::default()
    });

    commands.insert_resource(ClearColor(theme.background));
    commands.insert_resource(theme);
    commands.insert_resource(themes);
    latch.theme_loaded = true;
}

mod srgb_float {
    use bevy::prelude::Color;
    use serde::de::{ Deserializer };
    use serde::ser::{ SerializeSeq, Serializer };
    use serde::{ Deserialize };

    pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        let srgba = color.to_srgba();
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&srgba.red)?;
        seq.serialize_element(&srgba.green)?;
        seq.serialize_element(&srgba.blue)?;
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
        where D: Deserializer<'de>
    {
        let rgb: [f32; 3] = <[f32; 3]>::deserialize(deserializer)?;
        Ok(Color::srgb(rgb[0], rgb[1], rgb[2]))
    }
}

mod srgb_float_list {
    use bevy::prelude::Color;
    use serde::de::{ Deserializer };
    use serde::ser::{ SerializeSeq, Serializer };
    use serde::{ Deserialize };

    pub fn serialize<S>(colors: &[Color], serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        let mut seq = serializer.serialize_seq(Some(colors.len()))?;
        for color in colors {
            let srgba = color.to_srgba();
            seq.serialize_element(&[srgba.red, srgba.green, srgba.blue])?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Color>, D::Error>
        where D: Deserializer<'de>
    {
        let triples: Vec<[f32; 3]> = Vec::deserialize(deserializer)?;
        Ok(triples.into_iter().map(|rgb| Color::srgb(rgb[0], rgb[1], rgb[2])).collect())
    }
}
