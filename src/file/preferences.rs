use bevy::prelude::*;
use serde::{ de::DeserializeOwned, Serialize };
use std::collections::BTreeMap;
use std::fs;
use std::path::{ Path, PathBuf };
use thiserror::Error;

use crate::file::config::AppConfig;
use crate::neck::geometry::{ validate_fret_count, validate_zoom };
use crate::neck::StringTuning;
use crate::session::{ FretboardChanged, FretboardSession, FretboardState, StateChange };
use crate::states::StartupLatch;
use crate::theory::{ HighlightMode, HighlightSet, PitchClass };

pub const BASE_NOTE_KEY: &str = "baseNote";
pub const HIGHLIGHT_MODE_KEY: &str = "highlightMode";
pub const HIGHLIGHT_SET_KEY: &str = "highlightSet";
pub const SHOW_NOTE_NAMES_KEY: &str = "showNoteNames";
pub const SHOW_INTERVALS_KEY: &str = "showIntervals";
pub const ZOOM_LEVEL_KEY: &str = "zoomLevel";
pub const FRET_COUNT_KEY: &str = "fretCount";
pub const STRING_TUNING_KEY: &str = "stringTuning";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("I/O error while accessing preferences: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse preferences YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to encode preference value: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value preference storage. Values are kept as JSON strings and the
/// whole map is written out as YAML. A store without a path lives in memory.
#[derive(Resource, Debug, Clone, Default)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl PreferenceStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store at `path`. A missing file yields an empty store that
    /// will be created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str::<Option<BTreeMap<String, serde_yaml::Value>>>(&content)?
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(key, value)| match stored_text(&value) {
                    Some(text) => Some((key, text)),
                    None => {
                        warn!("Dropping stored preference '{key}': not a scalar value");
                        None
                    }
                })
                .collect()
        } else {
            BTreeMap::new()
        };
        Ok(Self { path: Some(path), values })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Undecodable values read as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.values.get(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring stored preference '{key}' = {raw}: {e}");
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), PreferenceError> {
        let encoded = serde_json::to_string(value)?;
        self.values.insert(key.to_string(), encoded);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Writes every default that is not stored yet.
    pub fn initialize_defaults(&mut self) -> Result<(), PreferenceError> {
        let defaults = FretboardState::default();
        if !self.contains(BASE_NOTE_KEY) {
            self.set(BASE_NOTE_KEY, &defaults.base_note)?;
        }
        if !self.contains(HIGHLIGHT_MODE_KEY) {
            self.set(HIGHLIGHT_MODE_KEY, &defaults.highlight_mode)?;
        }
        if !self.contains(HIGHLIGHT_SET_KEY) {
            self.set(HIGHLIGHT_SET_KEY, &defaults.highlight_set)?;
        }
        if !self.contains(SHOW_NOTE_NAMES_KEY) {
            self.set(SHOW_NOTE_NAMES_KEY, &defaults.show_note_names)?;
        }
        if !self.contains(SHOW_INTERVALS_KEY) {
            self.set(SHOW_INTERVALS_KEY, &defaults.show_intervals)?;
        }
        if !self.contains(ZOOM_LEVEL_KEY) {
            self.set(ZOOM_LEVEL_KEY, &defaults.zoom)?;
        }
        if !self.contains(FRET_COUNT_KEY) {
            self.set(FRET_COUNT_KEY, &defaults.fret_count)?;
        }
        if !self.contains(STRING_TUNING_KEY) {
            self.set(STRING_TUNING_KEY, &defaults.tuning)?;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), PreferenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(&self.values)?)?;
        Ok(())
    }

    /// Builds the application state from stored values. Anything missing,
    /// undecodable or out of range falls back to its default. A mode the
    /// stored set does not offer falls back to `BASENOTE`.
    pub fn load_state(&self) -> FretboardState {
        let defaults = FretboardState::default();
        let highlight_set = self
            .get::<HighlightSet>(HIGHLIGHT_SET_KEY)
            .unwrap_or(defaults.highlight_set);
        let highlight_mode = self
            .get::<HighlightMode>(HIGHLIGHT_MODE_KEY)
            .filter(|mode| highlight_set.modes().contains(mode))
            .unwrap_or(HighlightMode::BaseNote);
        FretboardState {
            base_note: self.get::<PitchClass>(BASE_NOTE_KEY).unwrap_or(defaults.base_note),
            highlight_mode,
            highlight_set,
            show_note_names: self
                .get::<bool>(SHOW_NOTE_NAMES_KEY)
                .unwrap_or(defaults.show_note_names),
            show_intervals: self
                .get::<bool>(SHOW_INTERVALS_KEY)
                .unwrap_or(defaults.show_intervals),
            tuning: self
                .get::<StringTuning>(STRING_TUNING_KEY)
                .unwrap_or(defaults.tuning),
            fret_count: self
                .get::<usize>(FRET_COUNT_KEY)
                .and_then(|count| validate_fret_count(count).ok())
                .unwrap_or(defaults.fret_count),
            zoom: self
                .get::<f32>(ZOOM_LEVEL_KEY)
                .and_then(|zoom| validate_zoom(zoom).ok())
                .unwrap_or(defaults.zoom),
        }
    }

    /// Stores the value touched by `change`, read from `state`.
    pub fn record(&mut self, change: &StateChange, state: &FretboardState) -> Result<(), PreferenceError> {
        match change {
            StateChange::BaseNote { new, .. } => self.set(BASE_NOTE_KEY, new),
            StateChange::HighlightMode { new, .. } => self.set(HIGHLIGHT_MODE_KEY, new),
            StateChange::HighlightSet(set) => self.set(HIGHLIGHT_SET_KEY, set),
            StateChange::NoteNamesVisible(visible) => self.set(SHOW_NOTE_NAMES_KEY, visible),
            StateChange::IntervalsVisible(visible) => self.set(SHOW_INTERVALS_KEY, visible),
            StateChange::Layout => {
                self.set(FRET_COUNT_KEY, &state.fret_count)?;
                self.set(ZOOM_LEVEL_KEY, &state.zoom)?;
                self.set(STRING_TUNING_KEY, &state.tuning)
            }
        }
    }
}

/// Stored values are JSON text. Hand-edited files may hold plain YAML
/// numbers or booleans instead of quoted strings, which read back as the
/// same JSON.
fn stored_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(text) => Some(text.clone()),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub fn setup_preferences(
    mut commands: Commands,
    config: Res<AppConfig>,
    mut latch: ResMut<StartupLatch>,
) {
    let path = config.preferences_path();
    let mut store = PreferenceStore::open(&path).unwrap_or_else(|e| {
        warn!("Could not read preferences at '{}' ({e}), starting from defaults", path.display());
        PreferenceStore { path: Some(path.clone()), values: BTreeMap::new() }
    });

    if let Err(e) = store.initialize_defaults().and_then(|_| store.save()) {
        error!("Failed to write default preferences: {e}");
    }

    let state = store.load_state();
    info!(
        "Loaded preferences: base note {}, mode {}, {} frets, zoom {:.1}",
        state.base_note, state.highlight_mode, state.fret_count, state.zoom
    );
    commands.insert_resource(FretboardSession::new(state, config.fretboard.shift_duration_secs()));
    commands.insert_resource(store);
    latch.preferences_loaded = true;
}

pub fn persist_changes(
    mut changes: MessageReader<FretboardChanged>,
    session: Option<Res<FretboardSession>>,
    store: Option<ResMut<PreferenceStore>>,
) {
    let (Some(session), Some(mut store)) = (session, store) else {
        return;
    };

    let mut dirty = false;
    for FretboardChanged(change) in changes.read() {
        match store.record(change, session.state()) {
            Ok(()) => dirty = true,
            Err(e) => error!("Failed to store {change:?}: {e}"),
        }
    }

    if dirty {
        if let Err(e) = store.save() {
            error!("Failed to save preferences: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_fill_an_empty_store() {
        let mut store = PreferenceStore::in_memory();
        store.initialize_defaults().unwrap();
        assert_eq!(store.get::<PitchClass>(BASE_NOTE_KEY), Some(PitchClass::C));
        assert_eq!(store.get::<HighlightMode>(HIGHLIGHT_MODE_KEY), Some(HighlightMode::BaseNote));
        assert_eq!(store.get::<f32>(ZOOM_LEVEL_KEY), Some(0.9));
        assert_eq!(store.get::<usize>(FRET_COUNT_KEY), Some(12));
        assert_eq!(store.load_state(), FretboardState::default());
    }

    #[test]
    fn defaults_do_not_overwrite_stored_values() {
        let mut store = PreferenceStore::in_memory();
        store.set(BASE_NOTE_KEY, &PitchClass::FSharp).unwrap();
        store.initialize_defaults().unwrap();
        assert_eq!(store.get::<PitchClass>(BASE_NOTE_KEY), Some(PitchClass::FSharp));
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let mut store = PreferenceStore::in_memory();
        store.set(FRET_COUNT_KEY, &99).unwrap();
        store.set(ZOOM_LEVEL_KEY, &0.1).unwrap();
        store.set(BASE_NOTE_KEY, &"H").unwrap();
        store.set(STRING_TUNING_KEY, &vec!["E"]).unwrap();
        store.set(SHOW_INTERVALS_KEY, &false).unwrap();

        let state = store.load_state();
        assert_eq!(state.fret_count, 12);
        assert_eq!(state.zoom, 0.9);
        assert_eq!(state.base_note, PitchClass::C);
        assert_eq!(state.tuning, StringTuning::standard());
        assert!(!state.show_intervals);
    }

    #[test]
    fn mode_outside_the_stored_set_falls_back_to_basenote() {
        let mut store = PreferenceStore::in_memory();
        store.set(HIGHLIGHT_MODE_KEY, &HighlightMode::BluesScale).unwrap();
        store.set(HIGHLIGHT_SET_KEY, &HighlightSet::Basic).unwrap();
        let state = store.load_state();
        assert_eq!(state.highlight_set, HighlightSet::Basic);
        assert_eq!(state.highlight_mode, HighlightMode::BaseNote);
        assert_eq!(
            state.highlight_mode.next_in(state.highlight_set),
            HighlightMode::PentatonicScale
        );

        store.set(HIGHLIGHT_SET_KEY, &HighlightSet::Advanced).unwrap();
        assert_eq!(store.load_state().highlight_mode, HighlightMode::BluesScale);

        store.set(HIGHLIGHT_MODE_KEY, &"MYSTERY_CHORD").unwrap();
        assert_eq!(store.load_state().highlight_mode, HighlightMode::BaseNote);
    }

    #[test]
    fn unquoted_scalars_read_as_stored_text() {
        let yaml = "fretCount: 15\nshowIntervals: false\nzoomLevel: 1.2\ntuning:\n  - E\nbaseNote: '\"D\"'\n";
        let parsed: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(yaml).unwrap();
        let texts: BTreeMap<&str, Option<String>> = parsed
            .iter()
            .map(|(key, value)| (key.as_str(), stored_text(value)))
            .collect();
        assert_eq!(texts["fretCount"].as_deref(), Some("15"));
        assert_eq!(texts["showIntervals"].as_deref(), Some("false"));
        assert_eq!(texts["zoomLevel"].as_deref(), Some("1.2"));
        assert_eq!(texts["baseNote"].as_deref(), Some("\"D\""));
        assert_eq!(texts["tuning"], None);
    }

    #[test]
    fn layout_change_stores_every_layout_key() {
        let mut store = PreferenceStore::in_memory();
        let state = FretboardState { fret_count: 17, zoom: 1.2, ..FretboardState::default() };
        store.record(&StateChange::Layout, &state).unwrap();
        assert_eq!(store.get::<usize>(FRET_COUNT_KEY), Some(17));
        assert_eq!(store.get::<f32>(ZOOM_LEVEL_KEY), Some(1.2));
        assert!(store.contains(STRING_TUNING_KEY));
        assert!(store.remove(STRING_TUNING_KEY));
        assert!(!store.remove(STRING_TUNING_KEY));
    }

    #[test]
    fn in_memory_save_is_a_no_op() {
        let store = PreferenceStore::in_memory();
        assert!(store.path().is_none());
        assert!(store.save().is_ok());
    }
}
