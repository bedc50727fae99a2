use bevy::prelude::*;
use bevy::ui::RelativeCursorPosition;

use crate::components::fretboard_view::{ FretboardSystems, NeckClickArea };
use crate::error::FretboardError;
use crate::file::theme::Theme;
use crate::neck::TuningPreset;
use crate::session::FretboardSession;
use crate::slider::Direction;
use crate::states::AppState;

pub const ZOOM_STEP: f32 = 0.1;
pub const MIN_UI_ZOOM: f32 = 0.4;
pub const MAX_UI_ZOOM: f32 = 1.6;

const BUTTON_FONT_SIZE: f32 = 16.0;

const KEY_BINDINGS: [(KeyCode, ControlAction); 6] = [
    (KeyCode::ArrowLeft, ControlAction::Shift(Direction::Left)),
    (KeyCode::ArrowRight, ControlAction::Shift(Direction::Right)),
    (KeyCode::Equal, ControlAction::ZoomIn),
    (KeyCode::NumpadAdd, ControlAction::ZoomIn),
    (KeyCode::Minus, ControlAction::ZoomOut),
    (KeyCode::NumpadSubtract, ControlAction::ZoomOut),
];

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Fretboard), spawn_control_bar)
            .add_systems(OnExit(AppState::Fretboard), despawn_control_bar)
            .add_systems(
                Update,
                (keyboard_controls, button_controls, neck_click_controls, button_feedback)
                    .in_set(FretboardSystems::Input)
                    .run_if(in_state(AppState::Fretboard)),
            );
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Shift(Direction),
    PreviousBaseNote,
    NextBaseNote,
    NextHighlightMode,
    ToggleHighlightSet,
    ToggleNoteNames,
    ToggleIntervals,
    FewerFrets,
    MoreFrets,
    ZoomOut,
    ZoomIn,
    NextTuning,
}

impl ControlAction {
    pub const BAR: [ControlAction; 13] = [
        ControlAction::Shift(Direction::Left),
        ControlAction::Shift(Direction::Right),
        ControlAction::PreviousBaseNote,
        ControlAction::NextBaseNote,
        ControlAction::NextHighlightMode,
        ControlAction::ToggleHighlightSet,
        ControlAction::ToggleNoteNames,
        ControlAction::ToggleIntervals,
        ControlAction::FewerFrets,
        ControlAction::MoreFrets,
        ControlAction::ZoomOut,
        ControlAction::ZoomIn,
        ControlAction::NextTuning,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ControlAction::Shift(Direction::Left) => "<",
            ControlAction::Shift(Direction::Right) => ">",
            ControlAction::PreviousBaseNote => "Note -",
            ControlAction::NextBaseNote => "Note +",
            ControlAction::NextHighlightMode => "Mode",
            ControlAction::ToggleHighlightSet => "Basic/Advanced",
            ControlAction::ToggleNoteNames => "Names",
            ControlAction::ToggleIntervals => "Intervals",
            ControlAction::FewerFrets => "Frets -",
            ControlAction::MoreFrets => "Frets +",
            ControlAction::ZoomOut => "Zoom -",
            ControlAction::ZoomIn => "Zoom +",
            ControlAction::NextTuning => "Tuning",
        }
    }
}

/// Next zoom level on the UI's 0.1 grid, kept inside the range the buttons
/// offer.
pub fn step_zoom(zoom: f32, delta: f32) -> f32 {
    (((zoom + delta) * 10.0).round() / 10.0).clamp(MIN_UI_ZOOM, MAX_UI_ZOOM)
}

pub fn apply_action(session: &mut FretboardSession, action: ControlAction) -> Result<(), FretboardError> {
    let state = session.state().clone();
    match action {
        ControlAction::Shift(direction) => {
            session.shift(direction);
        }
        ControlAction::PreviousBaseNote => session.set_base_note(state.base_note.lower()),
        ControlAction::NextBaseNote => session.set_base_note(state.base_note.raise()),
        ControlAction::NextHighlightMode => session.cycle_highlight_mode(),
        ControlAction::ToggleHighlightSet => session.set_highlight_set(state.highlight_set.toggled()),
        ControlAction::ToggleNoteNames => session.set_note_names_visible(!state.show_note_names),
        ControlAction::ToggleIntervals => session.set_intervals_visible(!state.show_intervals),
        ControlAction::FewerFrets => session.set_fret_count(state.fret_count.saturating_sub(1))?,
        ControlAction::MoreFrets => session.set_fret_count(state.fret_count + 1)?,
        ControlAction::ZoomOut => session.set_zoom(step_zoom(state.zoom, -ZOOM_STEP))?,
        ControlAction::ZoomIn => session.set_zoom(step_zoom(state.zoom, ZOOM_STEP))?,
        ControlAction::NextTuning => {
            let preset = TuningPreset::after(&state.tuning);
            info!("Switching tuning to {}", preset.name());
            session.set_tuning(preset.tuning())?
        }
    }
    Ok(())
}

/// Direction for a press on the neck, from the cursor's x relative to the
/// board centre (-0.5 at the left edge, 0.5 at the right).
pub fn shift_for_click(relative_x: f32) -> Direction {
    if relative_x < 0.0 {
        Direction::Left
    } else {
        Direction::Right
    }
}

fn run_action(session: &mut FretboardSession, action: ControlAction) {
    if let Err(e) = apply_action(session, action) {
        warn!("'{}' rejected: {e}", action.label());
    }
}

fn keyboard_controls(keys: Res<ButtonInput<KeyCode>>, mut session: ResMut<FretboardSession>) {
    for (key, action) in KEY_BINDINGS {
        if keys.just_pressed(key) {
            run_action(&mut session, action);
        }
    }
}

fn button_controls(
    buttons: Query<(&Interaction, &ControlAction), Changed<Interaction>>,
    mut session: ResMut<FretboardSession>,
) {
    for (interaction, action) in &buttons {
        if *interaction == Interaction::Pressed {
            run_action(&mut session, *action);
        }
    }
}

fn neck_click_controls(
    areas: Query<(&Interaction, &RelativeCursorPosition), (Changed<Interaction>, With<NeckClickArea>)>,
    mut session: ResMut<FretboardSession>,
) {
    for (interaction, cursor) in &areas {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let Some(position) = cursor.normalized else {
            continue;
        };
        run_action(&mut session, ControlAction::Shift(shift_for_click(position.x)));
    }
}

fn button_feedback(
    theme: Res<Theme>,
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<ControlAction>)>,
) {
    for (interaction, mut background) in &mut buttons {
        background.0 = match interaction {
            Interaction::Pressed => theme.button_press,
            Interaction::Hovered => theme.button_hover,
            Interaction::None => theme.button,
        };
    }
}

#[derive(Component)]
struct ControlBar;

fn spawn_control_bar(mut commands: Commands, theme: Res<Theme>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(16.0),
                width: Val::Percent(100.0),
                flex_wrap: FlexWrap::Wrap,
                justify_content: JustifyContent::Center,
                column_gap: Val::Px(8.0),
                row_gap: Val::Px(8.0),
                ..default()
            },
            ControlBar,
        ))
        .with_children(|bar| {
            for action in ControlAction::BAR {
                bar.spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                        align_items: AlignItems::Center,
                        justify_content: JustifyContent::Center,
                        ..default()
                    },
                    BackgroundColor(theme.button),
                    BorderRadius::all(Val::Px(4.0)),
                    action,
                ))
                .with_child((
                    Text::new(action.label()),
                    TextFont {
                        font_size: BUTTON_FONT_SIZE,
                        ..default()
                    },
                    TextColor(theme.text_primary),
                ));
            }
        });
}

fn despawn_control_bar(mut commands: Commands, bars: Query<Entity, With<ControlBar>>) {
    for bar in &bars {
        commands.entity(bar).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FretboardState;
    use crate::slider::SliderPhase;
    use crate::theory::{ HighlightMode, HighlightSet, PitchClass };

    fn session() -> FretboardSession {
        FretboardSession::new(FretboardState::default(), 0.5)
    }

    #[test]
    fn zoom_steps_stay_on_the_grid() {
        assert_eq!(step_zoom(0.9, ZOOM_STEP), 1.0);
        assert_eq!(step_zoom(0.9, -ZOOM_STEP), 0.8);
        assert_eq!(step_zoom(1.6, ZOOM_STEP), MAX_UI_ZOOM);
        assert_eq!(step_zoom(0.4, -ZOOM_STEP), MIN_UI_ZOOM);
    }

    #[test]
    fn clicks_shift_toward_the_pressed_half() {
        assert_eq!(shift_for_click(-0.4), Direction::Left);
        assert_eq!(shift_for_click(-0.01), Direction::Left);
        assert_eq!(shift_for_click(0.0), Direction::Right);
        assert_eq!(shift_for_click(0.3), Direction::Right);

        let mut session = session();
        apply_action(&mut session, ControlAction::Shift(shift_for_click(-0.25))).unwrap();
        assert_eq!(session.slider_phase(), SliderPhase::Animating(Direction::Left));
        session.finish_shift();
        assert_eq!(session.state().base_note, PitchClass::B);
    }

    #[test]
    fn buttons_drive_the_session() {
        let mut session = session();
        apply_action(&mut session, ControlAction::NextBaseNote).unwrap();
        apply_action(&mut session, ControlAction::NextHighlightMode).unwrap();
        apply_action(&mut session, ControlAction::ToggleHighlightSet).unwrap();
        apply_action(&mut session, ControlAction::ToggleNoteNames).unwrap();
        apply_action(&mut session, ControlAction::MoreFrets).unwrap();
        apply_action(&mut session, ControlAction::NextTuning).unwrap();

        let state = session.state();
        assert_eq!(state.base_note, PitchClass::CSharp);
        assert_eq!(state.highlight_mode, HighlightMode::PentatonicScale);
        assert_eq!(state.highlight_set, HighlightSet::Advanced);
        assert!(!state.show_note_names);
        assert_eq!(state.fret_count, 13);
        assert_eq!(TuningPreset::matching(&state.tuning), Some(TuningPreset::DropD));
    }

    #[test]
    fn fret_buttons_stop_at_the_limits() {
        let mut session = FretboardSession::new(
            FretboardState { fret_count: 1, ..FretboardState::default() },
            0.5,
        );
        assert_eq!(
            apply_action(&mut session, ControlAction::FewerFrets),
            Err(FretboardError::InvalidFretCount(0))
        );
        assert_eq!(session.state().fret_count, 1);
    }

    #[test]
    fn layout_buttons_wait_for_the_slide() {
        let mut session = session();
        apply_action(&mut session, ControlAction::Shift(Direction::Right)).unwrap();
        assert!(session.is_animating());
        assert_eq!(
            apply_action(&mut session, ControlAction::ZoomIn),
            Err(FretboardError::ShiftInProgress)
        );
        assert_eq!(session.state().zoom, 0.9);
    }
}
