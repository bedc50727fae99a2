//! The note slider: every marker on the neck moves one column left or right
//! as a single animated batch, wrapping around at the lattice edge.
//!
//! The slider is either idle or running exactly one shift. Triggers that
//! arrive while a shift is running are dropped. Marker positions and pitches
//! are only rewritten once the whole batch has finished moving.

use bevy::log::debug;
use bevy::math::curve::{ Curve, EaseFunction };
use std::str::FromStr;

use crate::error::FretboardError;
use crate::neck::{NoteMarker, ViewportGeometry};

pub const DEFAULT_SHIFT_DURATION: f32 = 1.0;
pub const SHIFT_EASING: EaseFunction = EaseFunction::CubicInOut;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn step(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = FretboardError;

    fn try_from(step: i32) -> Result<Self, Self::Error> {
        match step {
            -1 => Ok(Direction::Left),
            1 => Ok(Direction::Right),
            other => Err(FretboardError::InvalidDirection(other)),
        }
    }
}

impl FromStr for Direction {
    type Err = FretboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(FretboardError::InvalidDirection(0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderPhase {
    Idle,
    Animating(Direction),
}

#[derive(Debug, Clone, Copy)]
struct MarkerTrack {
    from: f32,
    to: f32,
    elapsed: f32,
}

impl MarkerTrack {
    fn sample(&self, duration: f32) -> f32 {
        let t = if duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / duration).clamp(0.0, 1.0)
        };
        self.from + (self.to - self.from) * SHIFT_EASING.sample_clamped(t)
    }

    fn is_finished(&self, duration: f32) -> bool {
        self.elapsed >= duration
    }
}

#[derive(Debug, Clone)]
struct ShiftAnimation {
    direction: Direction,
    duration: f32,
    tracks: Vec<MarkerTrack>,
}


#[derive(Debug, Clone)]
pub struct Slider {
    markers: Vec<NoteMarker>,
    span: usize,
    duration: f32,
    animation: Option<ShiftAnimation>,
}

impl Slider {
    pub fn new(markers: Vec<NoteMarker>, span: usize, duration: f32) -> Self {
        Self {
            markers,
            span,
            duration: duration.max(0.0),
            animation: None,
        }
    }

    pub fn markers(&self) -> &[NoteMarker] {
        &self.markers
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn phase(&self) -> SliderPhase {
        match &self.animation {
            Some(animation) => SliderPhase::Animating(animation.direction),
            None => SliderPhase::Idle,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Starts moving every marker one column towards `direction`. Returns
    /// `false` without touching anything when a shift is already running.
    pub fn shift(&mut self, direction: Direction, geometry: &ViewportGeometry) -> bool {
        if self.animation.is_some() {
            debug!("Slider busy, dropping {:?} shift", direction);
            return false;
        }
        if self.markers.is_empty() || self.span == 0 {
            return false;
        }

        let last = self.span - 1;
        let off_left = geometry.off_left_x();
        let mut tracks = Vec::with_capacity(self.markers.len());

        for marker in &mut self.markers {
            let to = match direction {
                Direction::Right if marker.position == last => {
                    // Recycle the hidden last column through the left edge.
                    marker.x = off_left;
                    geometry.note_x(0)
                }
                Direction::Right => geometry.note_x(marker.position as i32 + 1),
                Direction::Left if marker.position == 0 => off_left,
                Direction::Left => geometry.note_x(marker.position as i32 - 1),
            };
            tracks.push(MarkerTrack {
                from: marker.x,
                to,
                elapsed: 0.0,
            });
        }

        debug!("Slider shifting {:?} over {}s", direction, self.duration);
        self.animation = Some(ShiftAnimation {
            direction,
            duration: self.duration,
            tracks,
        });
        true
    }

    /// Advances the running shift by `delta_seconds`. When the last marker
    /// arrives, the new columns and pitches are committed and the direction
    /// of the finished shift is returned.
    pub fn advance(&mut self, delta_seconds: f32, geometry: &ViewportGeometry) -> Option<Direction> {
        let animation = self.animation.as_mut()?;

        for (marker, track) in self.markers.iter_mut().zip(animation.tracks.iter_mut()) {
            track.elapsed += delta_seconds.max(0.0);
            marker.x = track.sample(animation.duration);
        }

        let duration = animation.duration;
        if !animation.tracks.iter().all(|track| track.is_finished(duration)) {
            return None;
        }

        let direction = animation.direction;
        self.animation = None;
        self.commit(direction, geometry);
        Some(direction)
    }

    /// Runs the current shift to completion immediately.
    pub fn finish(&mut self, geometry: &ViewportGeometry) -> Option<Direction> {
        let remaining = self.animation.as_ref()?.duration;
        self.advance(remaining, geometry)
    }

    fn commit(&mut self, direction: Direction, geometry: &ViewportGeometry) {
        let span = self.span as i64;
        for marker in &mut self.markers {
            let position = (marker.position as i64 + direction.step()).rem_euclid(span) as usize;
            marker.position = position;
            marker.pitch = match direction {
                Direction::Right => marker.pitch.raise(),
                Direction::Left => marker.pitch.lower(),
            };
            // Snap everything so repeated shifts cannot drift.
            marker.x = geometry.note_x(position as i32);
        }
        debug!("Slider committed {:?} shift", direction);
    }
}
