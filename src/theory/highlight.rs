use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::pitch::PitchClass;
use crate::error::FretboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HighlightMode {
    None,
    #[serde(rename = "BASENOTE")]
    BaseNote,
    PentatonicScale,
    MajorScale,
    NaturalMinorScale,
    HarmonicMinorScale,
    MelodicMinorScale,
    BluesScale,
    WholeToneScale,
    MajorChord,
    MinorChord,
    DiminishedChord,
    AugmentedChord,
    #[serde(rename = "SUSPENDED_2_CHORD")]
    Suspended2Chord,
    #[serde(rename = "SUSPENDED_4_CHORD")]
    Suspended4Chord,
    PowerChord,
    DominantSevenChord,
    MajorSevenChord,
    MinorSevenChord,
    HalfDiminishedSevenChord,
    DiminishedSevenChord,
    SixChord,
    MinorSixChord,
    Add9Chord,
    MinorAdd9Chord,
    SixNineChord,
    MinorMajorSevenChord,
    MajorNineChord,
    DominantNineChord,
    MinorNineChord,
    MinorMajorNineChord,
    DominantElevenChord,
    MajorElevenChord,
    MinorElevenChord,
    DominantThirteenChord,
    MajorThirteenChord,
    MinorThirteenChord,
    DominantSevenSus4Chord,
    DominantFlatNineChord,
    DominantSharpNineChord,
    DominantFlatThirteenChord,
    DominantSharpElevenChord,
    AlteredDominantChord,
    DominantSevenSharpNineChord,
    DiminishedHalfWholeScale,
    DiminishedWholeHalfScale,
}

/// Which group of modes the mode selector cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HighlightSet {
    #[default]
    Basic,
    Advanced,
}

/// How a single marker should be painted for the current base note and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerHighlight {
    Plain,
    Highlighted,
    /// Position of the pitch within the chord, root first.
    ChordTone(usize),
}

const BASIC_MODES: [HighlightMode; 11] = [
    HighlightMode::None,
    HighlightMode::BaseNote,
    HighlightMode::PentatonicScale,
    HighlightMode::MajorScale,
    HighlightMode::NaturalMinorScale,
    HighlightMode::MajorChord,
    HighlightMode::MinorChord,
    HighlightMode::DominantSevenChord,
    HighlightMode::MajorSevenChord,
    HighlightMode::MinorSevenChord,
    HighlightMode::PowerChord,
];

const ADVANCED_MODES: [HighlightMode; 46] = [
    HighlightMode::None,
    HighlightMode::BaseNote,
    HighlightMode::PentatonicScale,
    HighlightMode::MajorScale,
    HighlightMode::NaturalMinorScale,
    HighlightMode::MajorChord,
    HighlightMode::MinorChord,
    HighlightMode::DominantSevenChord,
    HighlightMode::MajorSevenChord,
    HighlightMode::MinorSevenChord,
    HighlightMode::PowerChord,
    // triads and suspensions
    HighlightMode::DiminishedChord,
    HighlightMode::AugmentedChord,
    HighlightMode::Suspended2Chord,
    HighlightMode::Suspended4Chord,
    // sixths, added tones and sevenths
    HighlightMode::SixChord,
    HighlightMode::MinorSixChord,
    HighlightMode::Add9Chord,
    HighlightMode::MinorAdd9Chord,
    HighlightMode::SixNineChord,
    HighlightMode::HalfDiminishedSevenChord,
    HighlightMode::DiminishedSevenChord,
    HighlightMode::MinorMajorSevenChord,
    // extended
    HighlightMode::MajorNineChord,
    HighlightMode::DominantNineChord,
    HighlightMode::MinorNineChord,
    HighlightMode::MinorMajorNineChord,
    HighlightMode::DominantElevenChord,
    HighlightMode::MajorElevenChord,
    HighlightMode::MinorElevenChord,
    HighlightMode::DominantThirteenChord,
    HighlightMode::MajorThirteenChord,
    HighlightMode::MinorThirteenChord,
    // altered dominants
    HighlightMode::DominantSevenSus4Chord,
    HighlightMode::DominantFlatNineChord,
    HighlightMode::DominantSharpNineChord,
    HighlightMode::DominantFlatThirteenChord,
    HighlightMode::DominantSharpElevenChord,
    HighlightMode::AlteredDominantChord,
    HighlightMode::DominantSevenSharpNineChord,
    HighlightMode::HarmonicMinorScale,
    HighlightMode::MelodicMinorScale,
    HighlightMode::BluesScale,
    HighlightMode::WholeToneScale,
    HighlightMode::DiminishedHalfWholeScale,
    HighlightMode::DiminishedWholeHalfScale,
];

impl HighlightSet {
    pub fn modes(self) -> &'static [HighlightMode] {
        match self {
            HighlightSet::Basic => &BASIC_MODES,
            HighlightSet::Advanced => &ADVANCED_MODES,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            HighlightSet::Basic => HighlightSet::Advanced,
            HighlightSet::Advanced => HighlightSet::Basic,
        }
    }
}

impl HighlightMode {
    /// Semitone offsets from the base note that this mode highlights. Chords
    /// list the root, third, fifth and seventh before any extension, so the
    /// index of an offset is its chord-tone number.
    pub fn semitones(self) -> &'static [u8] {
        match self {
            HighlightMode::None => &[],
            HighlightMode::BaseNote => &[0],
            HighlightMode::PentatonicScale => &[0, 2, 4, 7, 9],
            HighlightMode::MajorScale => &[0, 2, 4, 5, 7, 9, 11],
            HighlightMode::NaturalMinorScale => &[0, 2, 3, 5, 7, 8, 10],
            HighlightMode::HarmonicMinorScale => &[0, 2, 3, 5, 7, 8, 11],
            HighlightMode::MelodicMinorScale => &[0, 2, 3, 5, 7, 9, 11],
            HighlightMode::BluesScale => &[0, 3, 5, 6, 7, 10],
            HighlightMode::WholeToneScale => &[0, 2, 4, 6, 8, 10],
            HighlightMode::MajorChord => &[0, 4, 7],
            HighlightMode::MinorChord => &[0, 3, 7],
            HighlightMode::DiminishedChord => &[0, 3, 6],
            HighlightMode::AugmentedChord => &[0, 4, 8],
            HighlightMode::Suspended2Chord => &[0, 2, 7],
            HighlightMode::Suspended4Chord => &[0, 5, 7],
            HighlightMode::PowerChord => &[0, 7],
            HighlightMode::DominantSevenChord => &[0, 4, 7, 10],
            HighlightMode::MajorSevenChord => &[0, 4, 7, 11],
            HighlightMode::MinorSevenChord => &[0, 3, 7, 10],
            HighlightMode::HalfDiminishedSevenChord => &[0, 3, 6, 10],
            HighlightMode::DiminishedSevenChord => &[0, 3, 6, 9],
            HighlightMode::SixChord => &[0, 4, 7, 9],
            HighlightMode::MinorSixChord => &[0, 3, 7, 9],
            HighlightMode::Add9Chord => &[0, 4, 7, 2],
            HighlightMode::MinorAdd9Chord => &[0, 3, 7, 2],
            HighlightMode::SixNineChord => &[0, 4, 7, 9, 2],
            HighlightMode::MinorMajorSevenChord => &[0, 3, 7, 11],
            HighlightMode::MajorNineChord => &[0, 4, 7, 11, 2],
            HighlightMode::DominantNineChord => &[0, 4, 7, 10, 2],
            HighlightMode::MinorNineChord => &[0, 3, 7, 10, 2],
            HighlightMode::MinorMajorNineChord => &[0, 3, 7, 11, 2],
            HighlightMode::DominantElevenChord => &[0, 4, 7, 10, 2, 5],
            HighlightMode::MajorElevenChord => &[0, 4, 7, 11, 2, 5],
            HighlightMode::MinorElevenChord => &[0, 3, 7, 10, 2, 5],
            HighlightMode::DominantThirteenChord => &[0, 4, 7, 10, 2, 9],
            HighlightMode::MajorThirteenChord => &[0, 4, 7, 11, 2, 9],
            HighlightMode::MinorThirteenChord => &[0, 3, 7, 10, 2, 9],
            HighlightMode::DominantSevenSus4Chord => &[0, 5, 7, 10],
            HighlightMode::DominantFlatNineChord => &[0, 4, 7, 10, 1],
            HighlightMode::DominantSharpNineChord => &[0, 4, 7, 10, 3],
            HighlightMode::DominantFlatThirteenChord => &[0, 4, 7, 10, 8],
            HighlightMode::DominantSharpElevenChord => &[0, 4, 7, 10, 6],
            // no fifth: b9, #9, #11 and b13 take its place
            HighlightMode::AlteredDominantChord => &[0, 4, 10, 1, 3, 6, 8],
            HighlightMode::DominantSevenSharpNineChord => &[0, 4, 7, 10, 3],
            HighlightMode::DiminishedHalfWholeScale => &[0, 1, 3, 4, 6, 7, 9, 10],
            HighlightMode::DiminishedWholeHalfScale => &[0, 2, 3, 5, 6, 8, 9, 11],
        }
    }

    pub fn is_scale(self) -> bool {
        matches!(
            self,
            HighlightMode::PentatonicScale
                | HighlightMode::MajorScale
                | HighlightMode::NaturalMinorScale
                | HighlightMode::HarmonicMinorScale
                | HighlightMode::MelodicMinorScale
                | HighlightMode::BluesScale
                | HighlightMode::WholeToneScale
                | HighlightMode::DiminishedHalfWholeScale
                | HighlightMode::DiminishedWholeHalfScale
        )
    }

    pub fn is_chord(self) -> bool {
        !matches!(self, HighlightMode::None | HighlightMode::BaseNote) && !self.is_scale()
    }

    pub fn pitches(self, base: PitchClass) -> Vec<PitchClass> {
        self.semitones()
            .iter()
            .map(|&offset| base.transpose(offset as i64))
            .collect()
    }

    pub fn classify(self, base: PitchClass, pitch: PitchClass) -> MarkerHighlight {
        let Some(tone) = self.pitches(base).iter().position(|&p| p == pitch) else {
            return MarkerHighlight::Plain;
        };
        if self.is_chord() {
            MarkerHighlight::ChordTone(tone)
        } else {
            MarkerHighlight::Highlighted
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HighlightMode::None => "None",
            HighlightMode::BaseNote => "Basenote",
            HighlightMode::PentatonicScale => "Pentatonic Scale",
            HighlightMode::MajorScale => "Major Scale",
            HighlightMode::NaturalMinorScale => "Natural Minor Scale",
            HighlightMode::HarmonicMinorScale => "Harmonic Minor Scale",
            HighlightMode::MelodicMinorScale => "Melodic Minor Scale",
            HighlightMode::BluesScale => "Blues Scale",
            HighlightMode::WholeToneScale => "Whole Tone Scale",
            HighlightMode::MajorChord => "Major Chord",
            HighlightMode::MinorChord => "Minor Chord",
            HighlightMode::DiminishedChord => "Diminished Chord",
            HighlightMode::AugmentedChord => "Augmented Chord",
            HighlightMode::Suspended2Chord => "Sus2 Chord",
            HighlightMode::Suspended4Chord => "Sus4 Chord",
            HighlightMode::PowerChord => "Power Chord",
            HighlightMode::DominantSevenChord => "7 Chord",
            HighlightMode::MajorSevenChord => "Maj7 Chord",
            HighlightMode::MinorSevenChord => "m7 Chord",
            HighlightMode::HalfDiminishedSevenChord => "m7b5 Chord",
            HighlightMode::DiminishedSevenChord => "dim7 Chord",
            HighlightMode::SixChord => "6 Chord",
            HighlightMode::MinorSixChord => "Minor 6 Chord",
            HighlightMode::Add9Chord => "Add9 Chord",
            HighlightMode::MinorAdd9Chord => "Minor Add9 Chord",
            HighlightMode::SixNineChord => "6/9 Chord",
            HighlightMode::MinorMajorSevenChord => "mMaj7 Chord",
            HighlightMode::MajorNineChord => "Maj9 Chord",
            HighlightMode::DominantNineChord => "9 Chord",
            HighlightMode::MinorNineChord => "m9 Chord",
            HighlightMode::MinorMajorNineChord => "mMaj9 Chord",
            HighlightMode::DominantElevenChord => "11 Chord",
            HighlightMode::MajorElevenChord => "Maj11 Chord",
            HighlightMode::MinorElevenChord => "m11 Chord",
            HighlightMode::DominantThirteenChord => "13 Chord",
            HighlightMode::MajorThirteenChord => "Maj13 Chord",
            HighlightMode::MinorThirteenChord => "m13 Chord",
            HighlightMode::DominantSevenSus4Chord => "7sus4 Chord",
            HighlightMode::DominantFlatNineChord => "7b9 Chord",
            HighlightMode::DominantSharpNineChord => "7#9 Chord",
            HighlightMode::DominantFlatThirteenChord => "7b13 Chord",
            HighlightMode::DominantSharpElevenChord => "7#11 Chord",
            HighlightMode::AlteredDominantChord => "Altered 7 Chord",
            HighlightMode::DominantSevenSharpNineChord => "7#9 (Alt) Chord",
            HighlightMode::DiminishedHalfWholeScale => "Half-Whole Diminished",
            HighlightMode::DiminishedWholeHalfScale => "Whole-Half Diminished",
        }
    }

    /// Next mode in `set`, wrapping around. Modes outside the set restart at
    /// the first entry.
    pub fn next_in(self, set: HighlightSet) -> Self {
        let modes = set.modes();
        match modes.iter().position(|&mode| mode == self) {
            Some(index) => modes[(index + 1) % modes.len()],
            None => modes[0],
        }
    }

    fn serialized_name(self) -> String {
        // Unit variants always serialize to a plain JSON string.
        serde_json::to_value(self)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

impl fmt::Display for HighlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialized_name())
    }
}

impl FromStr for HighlightMode {
    type Err = FretboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_string()))
            .map_err(|_| FretboardError::UnknownHighlightMode(s.to_string()))
    }
}

/// Title shown above the neck, e.g. `C Pentatonic Scale` or `Note C`.
pub fn header_text(base: PitchClass, mode: HighlightMode) -> String {
    match mode {
        HighlightMode::None | HighlightMode::BaseNote => format!("Note {base}"),
        other => format!("{base} {}", other.label()),
    }
}

pub fn pentatonic_label(base: PitchClass, mode: HighlightMode) -> String {
    if mode == HighlightMode::PentatonicScale {
        format!(
            "Pentatonic Scale, {base} major / {} minor",
            base.relative_minor()
        )
    } else {
        "Pentatonic Scale".to_string()
    }
}
