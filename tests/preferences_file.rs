use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;

use fretboard_app::file::preferences::{
    PreferenceStore, BASE_NOTE_KEY, HIGHLIGHT_MODE_KEY, STRING_TUNING_KEY, ZOOM_LEVEL_KEY,
};
use fretboard_app::neck::TuningPreset;
use fretboard_app::theory::{ HighlightMode, PitchClass };
use fretboard_app::{ Direction, FretboardSession, FretboardState };

fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fretboard_app_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir.join("preferences.yaml")
}

#[test]
fn session_changes_survive_a_restart() {
    let path = scratch_file("restart");

    let mut store = PreferenceStore::open(&path).unwrap();
    store.initialize_defaults().unwrap();
    store.save().unwrap();
    assert!(path.exists());

    let mut session = FretboardSession::new(store.load_state(), 0.1);
    session.set_highlight_mode(HighlightMode::MinorChord);
    session.set_zoom(1.3).unwrap();
    session.set_tuning(TuningPreset::OpenG.tuning()).unwrap();
    session.set_note_names_visible(false);
    session.shift(Direction::Left);
    session.finish_shift();

    for change in session.drain_changes() {
        store.record(&change, session.state()).unwrap();
    }
    store.save().unwrap();

    let reopened = PreferenceStore::open(&path).unwrap();
    let state = reopened.load_state();
    assert_eq!(
        state,
        FretboardState {
            base_note: PitchClass::B,
            highlight_mode: HighlightMode::MinorChord,
            zoom: 1.3,
            tuning: TuningPreset::OpenG.tuning(),
            show_note_names: false,
            ..FretboardState::default()
        }
    );

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn values_are_stored_as_json_strings() {
    let path = scratch_file("json");
    let mut store = PreferenceStore::open(&path).unwrap();
    store.set(BASE_NOTE_KEY, &PitchClass::ASharp).unwrap();
    store.set(HIGHLIGHT_MODE_KEY, &HighlightMode::BaseNote).unwrap();
    store.set(ZOOM_LEVEL_KEY, &0.9_f32).unwrap();
    store.save().unwrap();

    let yaml = fs::read_to_string(&path).unwrap();
    let raw: std::collections::BTreeMap<String, String> = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(raw[BASE_NOTE_KEY], "\"A#\"");
    assert_eq!(raw[HIGHLIGHT_MODE_KEY], "\"BASENOTE\"");
    assert_eq!(raw[ZOOM_LEVEL_KEY], "0.9");

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn corrupt_values_fall_back_to_defaults() {
    let path = scratch_file("corrupt");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "baseNote: not json\nfretCount: '30'\nshowIntervals: 'false'\n").unwrap();

    let store = PreferenceStore::open(&path).unwrap();
    let state = store.load_state();
    assert_eq!(state.base_note, PitchClass::C);
    assert_eq!(state.fret_count, 12);
    assert!(!state.show_intervals);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn hand_edited_values_only_drop_their_own_key() {
    let path = scratch_file("hand_edited");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        "baseNote: '\"G\"'\nfretCount: 15\nshowIntervals: false\nzoomLevel: 1.1\nstringTuning:\n  nested: true\n",
    )
    .unwrap();

    let store = PreferenceStore::open(&path).unwrap();
    assert!(!store.contains(STRING_TUNING_KEY));
    let state = store.load_state();
    assert_eq!(
        state,
        FretboardState {
            base_note: PitchClass::G,
            fret_count: 15,
            show_intervals: false,
            zoom: 1.1,
            ..FretboardState::default()
        }
    );

    let _ = fs::remove_dir_all(path.parent().unwrap());
}
