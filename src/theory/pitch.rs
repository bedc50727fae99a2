use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FretboardError;

pub const PITCH_COUNT: usize = 12;

/// One of the twelve chromatic note names, ordered as they appear on the
/// cycle starting from `A`. All arithmetic wraps modulo 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    A,
    #[serde(rename = "A#")]
    ASharp,
    B,
    C,
    #[serde(rename = "C#")]
    CSharp,
    D,
    #[serde(rename = "D#")]
    DSharp,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
    #[serde(rename = "G#")]
    GSharp,
}

impl PitchClass {
    pub const ALL: [PitchClass; PITCH_COUNT] = [
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(PITCH_COUNT as i64) as usize]
    }

    pub fn transpose(self, semitones: i64) -> Self {
        Self::from_index(self.index() as i64 + semitones)
    }

    pub fn raise(self) -> Self {
        self.transpose(1)
    }

    pub fn lower(self) -> Self {
        self.transpose(-1)
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
        }
    }

    /// Relative minor root of a major key rooted here.
    pub fn relative_minor(self) -> Self {
        self.transpose(9)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = FretboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|pitch| pitch.name() == trimmed)
            .ok_or_else(|| FretboardError::UnknownPitch(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_and_lower_are_inverse() {
        for pitch in PitchClass::ALL {
            assert_eq!(pitch.raise().lower(), pitch);
            assert_eq!(pitch.lower().raise(), pitch);
        }
    }

    #[test]
    fn twelve_steps_close_the_cycle() {
        for pitch in PitchClass::ALL {
            let mut up = pitch;
            let mut down = pitch;
            for _ in 0..PITCH_COUNT {
                up = up.raise();
                down = down.lower();
            }
            assert_eq!(up, pitch);
            assert_eq!(down, pitch);
        }
    }

    #[test]
    fn wraps_at_the_ends_of_the_cycle() {
        assert_eq!(PitchClass::GSharp.raise(), PitchClass::A);
        assert_eq!(PitchClass::A.lower(), PitchClass::GSharp);
        assert_eq!(PitchClass::E.transpose(25), PitchClass::F);
        assert_eq!(PitchClass::C.transpose(-15), PitchClass::A);
    }

    #[test]
    fn parses_sharp_names() {
        assert_eq!("C#".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!(" G ".parse::<PitchClass>(), Ok(PitchClass::G));
        assert_eq!(
            "H".parse::<PitchClass>(),
            Err(FretboardError::UnknownPitch("H".to_string()))
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for pitch in PitchClass::ALL {
            assert_eq!(pitch.to_string().parse::<PitchClass>(), Ok(pitch));
        }
    }

    #[test]
    fn serializes_with_sharp_names() {
        let json = serde_json::to_string(&PitchClass::FSharp).unwrap();
        assert_eq!(json, "\"F#\"");
        let parsed: PitchClass = serde_json::from_str("\"A#\"").unwrap();
        assert_eq!(parsed, PitchClass::ASharp);
    }

    #[test]
    fn relative_minor_is_nine_semitones_up() {
        assert_eq!(PitchClass::C.relative_minor(), PitchClass::A);
        assert_eq!(PitchClass::G.relative_minor(), PitchClass::E);
    }
}
