//! Application state for one fretboard and the single place it is mutated.
//!
//! Every mutation goes through `FretboardSession`. Each accepted change is
//! queued as a `StateChange` that the UI layer drains and broadcasts.

use bevy::log::{debug, info};
use bevy::prelude::{ Message, Resource };

use crate::error::FretboardError;
use crate::neck::geometry::{self, DEFAULT_FRET_COUNT, DEFAULT_ZOOM};
use crate::neck::{build_lattice, build_markers, FretLattice, NoteMarker, StringTuning, ViewportGeometry};
use crate::slider::{Direction, Slider, SliderPhase};
use crate::theory::{
    header_text, interval_between, pentatonic_label, HighlightMode, HighlightSet, Interval,
    MarkerHighlight, PitchClass,
};

pub const DEFAULT_BASE_NOTE: PitchClass = PitchClass::C;
pub const DEFAULT_HIGHLIGHT_MODE: HighlightMode = HighlightMode::BaseNote;

#[derive(Debug, Clone, PartialEq)]
pub struct FretboardState {
    pub base_note: PitchClass,
    pub highlight_mode: HighlightMode,
    pub highlight_set: HighlightSet,
    pub show_note_names: bool,
    pub show_intervals: bool,
    pub tuning: StringTuning,
    pub fret_count: usize,
    pub zoom: f32,
}

impl Default for FretboardState {
    fn default() -> Self {
        Self {
            base_note: DEFAULT_BASE_NOTE,
            highlight_mode: DEFAULT_HIGHLIGHT_MODE,
            highlight_set: HighlightSet::Basic,
            show_note_names: true,
            show_intervals: true,
            tuning: StringTuning::standard(),
            fret_count: DEFAULT_FRET_COUNT,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    BaseNote { old: PitchClass, new: PitchClass },
    HighlightMode { old: HighlightMode, new: HighlightMode },
    HighlightSet(HighlightSet),
    NoteNamesVisible(bool),
    IntervalsVisible(bool),
    /// Fret count, zoom or tuning changed; geometry, lattice and markers were
    /// rebuilt from scratch.
    Layout,
}

/// Broadcast once per accepted `StateChange`.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct FretboardChanged(pub StateChange);

#[derive(Resource, Debug, Clone)]
pub struct FretboardSession {
    state: FretboardState,
    geometry: ViewportGeometry,
    lattice: FretLattice,
    slider: Slider,
    shift_duration: f32,
    pending: Vec<StateChange>,
}

impl FretboardSession {
    pub fn new(state: FretboardState, shift_duration: f32) -> Self {
        let (geometry, lattice, slider) = Self::layout(&state, shift_duration);
        Self {
            state,
            geometry,
            lattice,
            slider,
            shift_duration,
            pending: Vec::new(),
        }
    }

    fn layout(state: &FretboardState, shift_duration: f32) -> (ViewportGeometry, FretLattice, Slider) {
        let geometry = ViewportGeometry::new(state.fret_count, state.zoom, state.tuning.string_count());
        let span = geometry.lattice_span();
        let lattice = build_lattice(&state.tuning, span);
        let markers = build_markers(&lattice, &geometry);
        let slider = Slider::new(markers, span, shift_duration);
        (geometry, lattice, slider)
    }

    fn rebuild(&mut self) {
        let (geometry, lattice, slider) = Self::layout(&self.state, self.shift_duration);
        info!(
            "Rebuilt fretboard: {} frets, zoom {:.1}, tuning {}",
            self.state.fret_count, self.state.zoom, self.state.tuning
        );
        self.geometry = geometry;
        self.lattice = lattice;
        self.slider = slider;
        self.pending.push(StateChange::Layout);
    }

    pub fn state(&self) -> &FretboardState {
        &self.state
    }

    pub fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    pub fn lattice(&self) -> &FretLattice {
        &self.lattice
    }

    pub fn markers(&self) -> &[NoteMarker] {
        self.slider.markers()
    }

    pub fn slider_phase(&self) -> SliderPhase {
        self.slider.phase()
    }

    pub fn is_animating(&self) -> bool {
        self.slider.is_animating()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Takes every change recorded since the last call, oldest first.
    pub fn drain_changes(&mut self) -> Vec<StateChange> {
        std::mem::take(&mut self.pending)
    }

    pub fn pitch_at(&self, string_index: usize, position: usize) -> Result<PitchClass, FretboardError> {
        self.lattice.pitch_at(string_index, position)
    }

    pub fn interval_label(&self, pitch: PitchClass) -> Interval {
        interval_between(self.state.base_note, pitch)
    }

    pub fn highlight_for(&self, pitch: PitchClass) -> MarkerHighlight {
        self.state.highlight_mode.classify(self.state.base_note, pitch)
    }

    pub fn header_text(&self) -> String {
        header_text(self.state.base_note, self.state.highlight_mode)
    }

    pub fn pentatonic_label(&self) -> String {
        pentatonic_label(self.state.base_note, self.state.highlight_mode)
    }

    /// Requests a one-column slide. Dropped while another slide runs.
    pub fn shift(&mut self, direction: Direction) -> bool {
        self.slider.shift(direction, &self.geometry)
    }

    /// Advances the running slide. On completion the base note follows the
    /// slide by one semitone.
    pub fn advance(&mut self, delta_seconds: f32) -> Option<Direction> {
        let direction = self.slider.advance(delta_seconds, &self.geometry)?;
        self.follow_slide(direction);
        Some(direction)
    }

    /// Completes the running slide immediately.
    pub fn finish_shift(&mut self) -> Option<Direction> {
        let direction = self.slider.finish(&self.geometry)?;
        self.follow_slide(direction);
        Some(direction)
    }

    fn follow_slide(&mut self, direction: Direction) {
        match direction {
            Direction::Right => self.raise_base_note(),
            Direction::Left => self.lower_base_note(),
        }
        debug!("Slide {:?} moved base note to {}", direction, self.state.base_note);
    }

    fn raise_base_note(&mut self) {
        self.set_base_note(self.state.base_note.raise());
    }

    fn lower_base_note(&mut self) {
        self.set_base_note(self.state.base_note.lower());
    }

    pub fn set_base_note(&mut self, pitch: PitchClass) {
        let old = self.state.base_note;
        if old == pitch {
            return;
        }
        self.state.base_note = pitch;
        self.pending.push(StateChange::BaseNote { old, new: pitch });
    }

    pub fn set_highlight_mode(&mut self, mode: HighlightMode) {
        let old = self.state.highlight_mode;
        if old == mode {
            return;
        }
        self.state.highlight_mode = mode;
        self.pending.push(StateChange::HighlightMode { old, new: mode });
    }

    /// Switches the mode group. A current mode missing from the new group
    /// falls back to highlighting the base note.
    pub fn set_highlight_set(&mut self, set: HighlightSet) {
        if self.state.highlight_set == set {
            return;
        }
        self.state.highlight_set = set;
        self.pending.push(StateChange::HighlightSet(set));
        if !set.modes().contains(&self.state.highlight_mode) {
            self.set_highlight_mode(HighlightMode::BaseNote);
        }
    }

    pub fn cycle_highlight_mode(&mut self) {
        let next = self.state.highlight_mode.next_in(self.state.highlight_set);
        self.set_highlight_mode(next);
    }

    pub fn set_note_names_visible(&mut self, visible: bool) {
        if self.state.show_note_names == visible {
            return;
        }
        self.state.show_note_names = visible;
        self.pending.push(StateChange::NoteNamesVisible(visible));
    }

    pub fn set_intervals_visible(&mut self, visible: bool) {
        if self.state.show_intervals == visible {
            return;
        }
        self.state.show_intervals = visible;
        self.pending.push(StateChange::IntervalsVisible(visible));
    }

    fn ensure_idle(&self) -> Result<(), FretboardError> {
        if self.slider.is_animating() {
            return Err(FretboardError::ShiftInProgress);
        }
        Ok(())
    }

    pub fn set_fret_count(&mut self, count: usize) -> Result<(), FretboardError> {
        let count = geometry::validate_fret_count(count)?;
        self.ensure_idle()?;
        if count != self.state.fret_count {
            self.state.fret_count = count;
            self.rebuild();
        }
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), FretboardError> {
        let zoom = geometry::validate_zoom(zoom)?;
        self.ensure_idle()?;
        if (zoom - self.state.zoom).abs() > 1e-6 {
            self.state.zoom = zoom;
            self.rebuild();
        }
        Ok(())
    }

    pub fn set_tuning(&mut self, tuning: StringTuning) -> Result<(), FretboardError> {
        self.ensure_idle()?;
        if tuning != self.state.tuning {
            self.state.tuning = tuning;
            self.rebuild();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> FretboardSession {
        FretboardSession::new(FretboardState::default(), 0.25)
    }

    #[test]
    fn slide_moves_base_note_once() {
        let mut session = session();
        assert!(session.shift(Direction::Right));
        assert!(session.drain_changes().is_empty());
        assert_eq!(session.advance(0.3), Some(Direction::Right));
        assert_eq!(session.state().base_note, PitchClass::CSharp);
        assert_eq!(
            session.drain_changes(),
            vec![StateChange::BaseNote {
                old: PitchClass::C,
                new: PitchClass::CSharp
            }]
        );
    }

    #[test]
    fn reconfiguration_waits_for_idle() {
        let mut session = session();
        session.shift(Direction::Left);
        assert_eq!(session.set_fret_count(15), Err(FretboardError::ShiftInProgress));
        assert_eq!(session.set_zoom(1.2), Err(FretboardError::ShiftInProgress));
        assert_eq!(
            session.set_tuning(StringTuning::standard()),
            Err(FretboardError::ShiftInProgress)
        );
        assert_eq!(session.state().fret_count, DEFAULT_FRET_COUNT);

        session.finish_shift();
        session.drain_changes();
        assert_eq!(session.set_fret_count(15), Ok(()));
        assert_eq!(session.geometry().visible_fret_count, 15);
        assert_eq!(session.markers().len(), 6 * 36);
        assert_eq!(session.drain_changes(), vec![StateChange::Layout]);
    }

    #[test]
    fn invalid_values_leave_state_untouched() {
        let mut session = session();
        let before = session.state().clone();
        assert_eq!(session.set_fret_count(0), Err(FretboardError::InvalidFretCount(0)));
        assert_eq!(session.set_zoom(9.0), Err(FretboardError::InvalidZoom(9.0)));
        assert_eq!(session.state(), &before);
        assert!(session.drain_changes().is_empty());
    }

    #[test]
    fn switching_highlight_set_keeps_modes_valid() {
        let mut session = session();
        session.set_highlight_set(HighlightSet::Advanced);
        session.set_highlight_mode(HighlightMode::BluesScale);
        session.set_highlight_set(HighlightSet::Basic);
        assert_eq!(session.state().highlight_mode, HighlightMode::BaseNote);
        assert_eq!(
            session.drain_changes(),
            vec![
                StateChange::HighlightSet(HighlightSet::Advanced),
                StateChange::HighlightMode {
                    old: HighlightMode::BaseNote,
                    new: HighlightMode::BluesScale
                },
                StateChange::HighlightSet(HighlightSet::Basic),
                StateChange::HighlightMode {
                    old: HighlightMode::BluesScale,
                    new: HighlightMode::BaseNote
                },
            ]
        );
    }

    #[test]
    fn unchanged_values_are_not_reported() {
        let mut session = session();
        session.set_base_note(PitchClass::C);
        session.set_note_names_visible(true);
        session.set_intervals_visible(true);
        assert_eq!(session.set_zoom(DEFAULT_ZOOM), Ok(()));
        assert!(session.drain_changes().is_empty());

        session.set_intervals_visible(false);
        assert_eq!(session.drain_changes(), vec![StateChange::IntervalsVisible(false)]);
    }

    #[test]
    fn labels_follow_the_base_note() {
        let mut session = session();
        assert_eq!(session.interval_label(PitchClass::G).label(), "5");
        session.set_base_note(PitchClass::G);
        assert_eq!(session.interval_label(PitchClass::G).label(), "1");
        assert_eq!(session.highlight_for(PitchClass::G), MarkerHighlight::Highlighted);
        assert_eq!(session.header_text(), "Note G");
    }
}
