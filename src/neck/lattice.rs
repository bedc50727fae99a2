use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::geometry::ViewportGeometry;
use crate::error::FretboardError;
use crate::theory::PitchClass;

pub const MIN_STRINGS: usize = 3;
pub const MAX_STRINGS: usize = 8;

/// Open-string pitches, listed from the string drawn at the top of the neck
/// (the highest one on a guitar) downwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PitchClass>", into = "Vec<PitchClass>")]
pub struct StringTuning(Vec<PitchClass>);

impl StringTuning {
    pub fn new(strings: Vec<PitchClass>) -> Result<Self, FretboardError> {
        if !(MIN_STRINGS..=MAX_STRINGS).contains(&strings.len()) {
            return Err(FretboardError::InvalidTuning(strings.len()));
        }
        Ok(Self(strings))
    }

    pub fn standard() -> Self {
        TuningPreset::Standard.tuning()
    }

    pub fn strings(&self) -> &[PitchClass] {
        &self.0
    }

    pub fn string_count(&self) -> usize {
        self.0.len()
    }
}

impl Default for StringTuning {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<PitchClass>> for StringTuning {
    type Error = FretboardError;

    fn try_from(strings: Vec<PitchClass>) -> Result<Self, Self::Error> {
        Self::new(strings)
    }
}

impl From<StringTuning> for Vec<PitchClass> {
    fn from(tuning: StringTuning) -> Self {
        tuning.0
    }
}

impl FromStr for StringTuning {
    type Err = FretboardError;

    /// Parses whitespace separated pitch names, e.g. `"E B G D A E"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let strings = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<PitchClass>, _>>()?;
        Self::new(strings)
    }
}

impl fmt::Display for StringTuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|pitch| pitch.name()).collect();
        f.write_str(&names.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningPreset {
    Standard,
    DropD,
    OpenG,
    Dadgad,
    Bass,
    SevenString,
}

impl TuningPreset {
    pub const ALL: [TuningPreset; 6] = [
        TuningPreset::Standard,
        TuningPreset::DropD,
        TuningPreset::OpenG,
        TuningPreset::Dadgad,
        TuningPreset::Bass,
        TuningPreset::SevenString,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TuningPreset::Standard => "Standard",
            TuningPreset::DropD => "Drop D",
            TuningPreset::OpenG => "Open G",
            TuningPreset::Dadgad => "DADGAD",
            TuningPreset::Bass => "Bass",
            TuningPreset::SevenString => "7-String",
        }
    }

    pub fn tuning(self) -> StringTuning {
        use PitchClass::*;
        let strings = match self {
            TuningPreset::Standard => vec![E, B, G, D, A, E],
            TuningPreset::DropD => vec![E, B, G, D, A, D],
            TuningPreset::OpenG => vec![D, B, G, D, G, D],
            TuningPreset::Dadgad => vec![D, A, G, D, A, D],
            TuningPreset::Bass => vec![G, D, A, E],
            TuningPreset::SevenString => vec![E, B, G, D, A, E, B],
        };
        StringTuning(strings)
    }

    pub fn matching(tuning: &StringTuning) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.tuning() == *tuning)
    }

    /// Preset after the one matching `tuning`; custom tunings restart the
    /// cycle.
    pub fn after(tuning: &StringTuning) -> Self {
        match Self::matching(tuning) {
            Some(preset) => {
                let index = Self::ALL.iter().position(|p| *p == preset).unwrap_or(0);
                Self::ALL[(index + 1) % Self::ALL.len()]
            }
            None => Self::ALL[0],
        }
    }
}

/// Pitch names per string and fret position. Each row holds `span + 1`
/// columns so callers can look one step past the last marker column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FretLattice {
    span: usize,
    rows: Vec<Vec<PitchClass>>,
}

impl FretLattice {
    pub fn span(&self) -> usize {
        self.span
    }

    pub fn string_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<PitchClass>] {
        &self.rows
    }

    pub fn pitch_at(&self, string_index: usize, position: usize) -> Result<PitchClass, FretboardError> {
        let row = self
            .rows
            .get(string_index)
            .ok_or(FretboardError::StringOutOfRange {
                index: string_index,
                count: self.rows.len(),
            })?;
        row.get(position)
            .copied()
            .ok_or(FretboardError::PositionOutOfRange {
                position,
                max: self.span,
            })
    }
}

pub fn build_lattice(tuning: &StringTuning, span: usize) -> FretLattice {
    let rows = tuning
        .strings()
        .iter()
        .map(|&open| (0..=span).map(|p| open.transpose(p as i64)).collect())
        .collect();
    FretLattice { span, rows }
}

/// A movable dot bound to one lattice cell. `x` and `y` are container
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteMarker {
    pub string_index: usize,
    pub position: usize,
    pub pitch: PitchClass,
    pub x: f32,
    pub y: f32,
}

/// One marker per string and column in `[0, span)`, grouped by string.
pub fn build_markers(lattice: &FretLattice, geometry: &ViewportGeometry) -> Vec<NoteMarker> {
    let mut markers = Vec::with_capacity(lattice.string_count() * lattice.span());
    for (string_index, row) in lattice.rows().iter().enumerate() {
        let y = geometry.string_y(string_index);
        for (position, &pitch) in row.iter().take(lattice.span()).enumerate() {
            markers.push(NoteMarker {
                string_index,
                position,
                pitch,
                x: geometry.note_x(position as i32),
                y,
            });
        }
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use PitchClass::*;

    #[test]
    fn rows_climb_one_semitone_per_fret() {
        let lattice = build_lattice(&StringTuning::standard(), 24);
        assert_eq!(lattice.string_count(), 6);
        assert_eq!(lattice.rows()[0].len(), 25);
        assert_eq!(lattice.rows()[0][..6].to_vec(), vec![E, F, FSharp, G, GSharp, A]);
        assert_eq!(lattice.rows()[2][..3].to_vec(), vec![G, GSharp, A]);
        assert_eq!(lattice.pitch_at(0, 12), Ok(E));
        assert_eq!(lattice.pitch_at(4, 24), Ok(A));
    }

    #[test]
    fn lookups_outside_the_table_fail() {
        let lattice = build_lattice(&StringTuning::standard(), 12);
        assert_eq!(
            lattice.pitch_at(6, 0),
            Err(FretboardError::StringOutOfRange { index: 6, count: 6 })
        );
        assert_eq!(
            lattice.pitch_at(0, 13),
            Err(FretboardError::PositionOutOfRange { position: 13, max: 12 })
        );
    }

    #[test]
    fn markers_cover_every_column_below_the_span() {
        let tuning = StringTuning::standard();
        let geometry = ViewportGeometry::new(12, 1.0, tuning.string_count());
        let lattice = build_lattice(&tuning, geometry.lattice_span());
        let markers = build_markers(&lattice, &geometry);
        assert_eq!(markers.len(), 6 * 24);

        let first = markers[0];
        assert_eq!((first.string_index, first.position, first.pitch), (0, 0, E));
        assert_eq!(first.x, geometry.note_x(0));
        assert_eq!(first.y, geometry.string_y(0));

        let last = markers[markers.len() - 1];
        assert_eq!((last.string_index, last.position, last.pitch), (5, 23, DSharp));
    }

    #[test]
    fn tuning_validation_and_parsing() {
        assert_eq!("E B G D A E".parse::<StringTuning>(), Ok(StringTuning::standard()));
        assert_eq!(
            "E B".parse::<StringTuning>(),
            Err(FretboardError::InvalidTuning(2))
        );
        assert_eq!(
            "E B X".parse::<StringTuning>(),
            Err(FretboardError::UnknownPitch("X".to_string()))
        );
        assert_eq!(StringTuning::standard().to_string(), "E B G D A E");
    }

    #[test]
    fn tuning_serializes_as_a_list_of_names() {
        let json = serde_json::to_string(&TuningPreset::Bass.tuning()).unwrap();
        assert_eq!(json, r#"["G","D","A","E"]"#);
        let too_short: Result<StringTuning, _> = serde_json::from_str(r#"["G","D"]"#);
        assert!(too_short.is_err());
    }

    #[test]
    fn presets_cycle() {
        assert_eq!(TuningPreset::after(&StringTuning::standard()), TuningPreset::DropD);
        assert_eq!(
            TuningPreset::after(&TuningPreset::SevenString.tuning()),
            TuningPreset::Standard
        );
        let custom = StringTuning::new(vec![C, G, D, A]).unwrap();
        assert_eq!(TuningPreset::matching(&custom), None);
        assert_eq!(TuningPreset::after(&custom), TuningPreset::Standard);
    }
}
