//! Pixel layout of the neck.
//!
//! Frets follow the equal-tempered law: the distance from the nut to fret
//! `i` is proportional to `1 - 2^(-i/12)`, normalized so the last visible
//! fret lands exactly on the right edge of the neck.

use crate::error::FretboardError;

pub const SEMITONES_PER_OCTAVE: f32 = 12.0;

/// The open-string column is always normalized against this many frets, so
/// it stays put when the visible fret count changes.
pub const OPEN_STRING_BASELINE_FRETS: usize = 12;
pub const MIN_LATTICE_SPAN: usize = 24;

pub const BASE_NECK_WIDTH: f32 = 500.0;
pub const BASE_NECK_HEIGHT: f32 = 200.0;
pub const BASE_PADDING: f32 = 60.0;

pub const MIN_ZOOM: f32 = 0.3;
pub const MAX_ZOOM: f32 = 2.0;
pub const DEFAULT_ZOOM: f32 = 0.9;

pub const MIN_FRET_COUNT: usize = 1;
pub const MAX_FRET_COUNT: usize = 24;
pub const DEFAULT_FRET_COUNT: usize = 12;

const BASE_STRING_THICKNESSES: [f32; 6] = [0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
const STRING_THICKNESS_SCALE: f32 = 3.0;
const BACKGROUND_DOT_MIN_PX: f32 = 3.0;
const BACKGROUND_DOT_RATIO: f32 = 0.28;

fn neck_fraction(position: f32) -> f32 {
    1.0 - (-position / SEMITONES_PER_OCTAVE).exp2()
}

/// Horizontal offset of fret line `position` from the nut. Positions beyond
/// `visible_fret_count` (or below zero) follow the same curve unclamped.
pub fn fret_x(position: f32, visible_fret_count: usize, neck_width: f32) -> f32 {
    neck_width * (neck_fraction(position) / neck_fraction(visible_fret_count as f32))
}

/// Horizontal offset of the note marker for `position`, halfway between its
/// fret and the previous one.
pub fn note_x(position: i32, visible_fret_count: usize, neck_width: f32) -> f32 {
    if position == 0 {
        return open_string_x(neck_width);
    }
    fret_x(position as f32 - 0.5, visible_fret_count, neck_width)
}

/// Open-string markers sit left of the nut at a spot that only depends on
/// the neck width.
pub fn open_string_x(neck_width: f32) -> f32 {
    fret_x(-0.5, OPEN_STRING_BASELINE_FRETS, neck_width)
}

/// Vertical offset of a string, keeping the outer strings half a spacing
/// unit away from the neck edges.
pub fn string_y(string_index: usize, string_count: usize, neck_height: f32) -> f32 {
    let inset = neck_height / (2.0 * string_count as f32);
    if string_count <= 1 {
        return inset;
    }
    let span = neck_height - 2.0 * inset;
    inset + span * string_index as f32 / (string_count - 1) as f32
}

/// Narrowest gap between adjacent visible frets. Spacing shrinks along the
/// neck, so this is the gap before the last visible fret.
pub fn min_fret_spacing(visible_fret_count: usize, neck_width: f32) -> f32 {
    let last = visible_fret_count as f32;
    fret_x(last, visible_fret_count, neck_width) - fret_x(last - 1.0, visible_fret_count, neck_width)
}

/// Number of marker columns per string: a whole number of octaves, at least
/// two, that covers the visible range twice over.
pub fn lattice_span(visible_fret_count: usize) -> usize {
    let octave = SEMITONES_PER_OCTAVE as usize;
    (2 * visible_fret_count).max(MIN_LATTICE_SPAN).div_ceil(octave) * octave
}

pub fn validate_zoom(zoom: f32) -> Result<f32, FretboardError> {
    if zoom.is_finite() && (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        Ok(zoom)
    } else {
        Err(FretboardError::InvalidZoom(zoom))
    }
}

pub fn validate_fret_count(count: usize) -> Result<usize, FretboardError> {
    if (MIN_FRET_COUNT..=MAX_FRET_COUNT).contains(&count) {
        Ok(count)
    } else {
        Err(FretboardError::InvalidFretCount(count))
    }
}

/// Derived pixel layout for one fret count / zoom / string count
/// combination. Coordinates returned by the methods include the padding, so
/// they are relative to the top-left corner of the fretboard container.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportGeometry {
    pub visible_fret_count: usize,
    pub zoom: f32,
    pub string_count: usize,
    pub pixel_width: f32,
    pub pixel_height: f32,
    pub padding: f32,
}

impl ViewportGeometry {
    pub fn new(visible_fret_count: usize, zoom: f32, string_count: usize) -> Self {
        Self {
            visible_fret_count,
            zoom,
            string_count,
            pixel_width: BASE_NECK_WIDTH * zoom,
            pixel_height: BASE_NECK_HEIGHT * zoom,
            padding: BASE_PADDING * zoom,
        }
    }

    pub fn container_width(&self) -> f32 {
        self.pixel_width + self.padding
    }

    pub fn container_height(&self) -> f32 {
        self.pixel_height + 2.0 * self.padding
    }

    pub fn fret_x(&self, position: usize) -> f32 {
        self.padding + fret_x(position as f32, self.visible_fret_count, self.pixel_width)
    }

    pub fn note_x(&self, position: i32) -> f32 {
        self.padding + note_x(position, self.visible_fret_count, self.pixel_width)
    }

    pub fn string_y(&self, string_index: usize) -> f32 {
        self.padding + string_y(string_index, self.string_count, self.pixel_height)
    }

    pub fn min_fret_spacing(&self) -> f32 {
        min_fret_spacing(self.visible_fret_count, self.pixel_width)
    }

    pub fn lattice_span(&self) -> usize {
        lattice_span(self.visible_fret_count)
    }

    /// Where a marker waits just left of the open-string column before it
    /// slides in, or after it slides out.
    pub fn off_left_x(&self) -> f32 {
        let first = self.note_x(0);
        first - (self.note_x(1) - first)
    }

    pub fn marker_diameter(&self) -> f32 {
        let per_string = self.pixel_height / self.string_count.max(1) as f32;
        per_string.min(self.min_fret_spacing())
    }

    pub fn background_dot_radius(&self) -> f32 {
        (self.min_fret_spacing() * BACKGROUND_DOT_RATIO).max(BACKGROUND_DOT_MIN_PX)
    }

    pub fn string_thickness(&self, string_index: usize) -> f32 {
        let base = BASE_STRING_THICKNESSES
            .get(string_index)
            .or(BASE_STRING_THICKNESSES.last())
            .copied()
            .unwrap_or(1.0);
        base * STRING_THICKNESS_SCALE * self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frets_increase_and_end_at_the_neck_edge() {
        for frets in MIN_FRET_COUNT..=MAX_FRET_COUNT {
            let width = 450.0;
            for i in 0..frets {
                assert!(
                    fret_x((i + 1) as f32, frets, width) > fret_x(i as f32, frets, width),
                    "fret {i} of {frets}"
                );
            }
            assert_eq!(fret_x(frets as f32, frets, width), width);
            assert_eq!(fret_x(0.0, frets, width), 0.0);
        }
    }

    #[test]
    fn spacing_shrinks_along_the_neck() {
        let frets = 12;
        let width = 500.0;
        let gaps: Vec<f32> = (1..=frets)
            .map(|i| fret_x(i as f32, frets, width) - fret_x((i - 1) as f32, frets, width))
            .collect();
        for pair in gaps.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        let narrowest = gaps.iter().copied().fold(f32::INFINITY, f32::min);
        assert_eq!(min_fret_spacing(frets, width), narrowest);
    }

    #[test]
    fn notes_sit_between_frets() {
        let width = 500.0;
        for position in 1..12 {
            let x = note_x(position, 12, width);
            assert!(x > fret_x((position - 1) as f32, 12, width));
            assert!(x < fret_x(position as f32, 12, width));
        }
    }

    #[test]
    fn open_string_does_not_move_with_fret_count() {
        let width = 450.0;
        let reference = note_x(0, 12, width);
        for frets in [5, 7, 15, 24] {
            assert_eq!(note_x(0, frets, width), reference);
        }
        assert!(reference < 0.0);
    }

    #[test]
    fn strings_are_inset_by_half_a_spacing() {
        let height = 180.0;
        assert_eq!(string_y(0, 6, height), 15.0);
        assert!((string_y(5, 6, height) - 165.0).abs() < 1e-4);
        assert_eq!(string_y(0, 1, height), 90.0);
        let gap = string_y(1, 4, height) - string_y(0, 4, height);
        assert!((gap - (height - height / 4.0) / 3.0).abs() < 1e-4);
    }

    #[test]
    fn span_is_a_whole_number_of_octaves() {
        assert_eq!(lattice_span(1), 24);
        assert_eq!(lattice_span(10), 24);
        assert_eq!(lattice_span(12), 24);
        assert_eq!(lattice_span(13), 36);
        assert_eq!(lattice_span(18), 36);
        assert_eq!(lattice_span(19), 48);
        assert_eq!(lattice_span(24), 48);
    }

    #[test]
    fn span_covers_two_octaves_and_the_visible_range_twice() {
        for frets in MIN_FRET_COUNT..=MAX_FRET_COUNT {
            let span = lattice_span(frets);
            assert!(span >= MIN_LATTICE_SPAN, "{frets} frets");
            assert!(span >= 2 * frets, "{frets} frets");
            assert_eq!(span % 12, 0);
        }
    }

    #[test]
    fn viewport_scales_with_zoom() {
        let geometry = ViewportGeometry::new(12, 0.9, 6);
        assert_eq!(geometry.pixel_width, 450.0);
        assert_eq!(geometry.pixel_height, 180.0);
        assert_eq!(geometry.padding, 54.0);
        assert_eq!(geometry.container_width(), 504.0);
        assert_eq!(geometry.container_height(), 288.0);
        assert_eq!(geometry.fret_x(12), 504.0);
        assert!(geometry.marker_diameter() <= geometry.min_fret_spacing());
        assert!(geometry.off_left_x() < geometry.note_x(0));
    }

    #[test]
    fn rejects_out_of_range_configuration() {
        assert_eq!(validate_zoom(1.0), Ok(1.0));
        assert_eq!(validate_zoom(2.5), Err(FretboardError::InvalidZoom(2.5)));
        assert!(validate_zoom(f32::NAN).is_err());
        assert_eq!(validate_fret_count(24), Ok(24));
        assert_eq!(validate_fret_count(0), Err(FretboardError::InvalidFretCount(0)));
    }
}
