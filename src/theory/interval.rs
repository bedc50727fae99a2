use std::fmt;

use super::pitch::{PitchClass, PITCH_COUNT};

/// Ascending distance in semitones between two pitch classes, folded into a
/// single octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Unison,
    MinorSecond,
    MajorSecond,
    MinorThird,
    MajorThird,
    PerfectFourth,
    Tritone,
    PerfectFifth,
    MinorSixth,
    MajorSixth,
    MinorSeventh,
    MajorSeventh,
}

const INTERVALS: [Interval; PITCH_COUNT] = [
    Interval::Unison,
    Interval::MinorSecond,
    Interval::MajorSecond,
    Interval::MinorThird,
    Interval::MajorThird,
    Interval::PerfectFourth,
    Interval::Tritone,
    Interval::PerfectFifth,
    Interval::MinorSixth,
    Interval::MajorSixth,
    Interval::MinorSeventh,
    Interval::MajorSeventh,
];

impl Interval {
    pub fn from_semitones(semitones: i64) -> Self {
        INTERVALS[semitones.rem_euclid(PITCH_COUNT as i64) as usize]
    }

    pub fn semitones(self) -> usize {
        self as usize
    }

    /// The interval that completes this one to an octave.
    pub fn inverted(self) -> Self {
        Self::from_semitones(PITCH_COUNT as i64 - self.semitones() as i64)
    }

    /// Short label drawn next to each marker. `p` marks minor and `S` major
    /// intervals.
    pub fn label(self) -> &'static str {
        match self {
            Interval::Unison => "1",
            Interval::MinorSecond => "p2",
            Interval::MajorSecond => "S2",
            Interval::MinorThird => "p3",
            Interval::MajorThird => "S3",
            Interval::PerfectFourth => "4",
            Interval::Tritone => "-5",
            Interval::PerfectFifth => "5",
            Interval::MinorSixth => "p6",
            Interval::MajorSixth => "S6",
            Interval::MinorSeventh => "p7",
            Interval::MajorSeventh => "S7",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Interval::Unison => "unison",
            Interval::MinorSecond => "minor second",
            Interval::MajorSecond => "major second",
            Interval::MinorThird => "minor third",
            Interval::MajorThird => "major third",
            Interval::PerfectFourth => "perfect fourth",
            Interval::Tritone => "tritone",
            Interval::PerfectFifth => "perfect fifth",
            Interval::MinorSixth => "minor sixth",
            Interval::MajorSixth => "major sixth",
            Interval::MinorSeventh => "minor seventh",
            Interval::MajorSeventh => "major seventh",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn interval_between(base: PitchClass, target: PitchClass) -> Interval {
    Interval::from_semitones(target.index() as i64 - base.index() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_pitch_is_unison() {
        for pitch in PitchClass::ALL {
            assert_eq!(interval_between(pitch, pitch), Interval::Unison);
        }
    }

    #[test]
    fn reversed_intervals_complete_an_octave() {
        for a in PitchClass::ALL {
            for b in PitchClass::ALL {
                let up = interval_between(a, b).semitones();
                let down = interval_between(b, a).semitones();
                assert_eq!((up + down) % PITCH_COUNT, 0, "{a} -> {b}");
                if a == b {
                    assert_eq!(up, 0);
                    assert_eq!(down, 0);
                }
                assert_eq!(interval_between(a, b).inverted(), interval_between(b, a));
            }
        }
    }

    #[test]
    fn labels_follow_the_chromatic_table() {
        let base = PitchClass::C;
        assert_eq!(interval_between(base, PitchClass::E).label(), "S3");
        assert_eq!(interval_between(base, PitchClass::DSharp).label(), "p3");
        assert_eq!(interval_between(base, PitchClass::FSharp).label(), "-5");
        assert_eq!(interval_between(base, PitchClass::G).label(), "5");
        assert_eq!(interval_between(base, PitchClass::B).label(), "S7");
        assert_eq!(interval_between(base, PitchClass::A).name(), "major sixth");
    }
}
