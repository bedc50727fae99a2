use bevy::{ prelude::*, diagnostic::{ DiagnosticsStore, FrameTimeDiagnosticsPlugin } };

use crate::session::FretboardSession;
use crate::slider::SliderPhase;
use crate::states::AppState;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default())
            .add_systems(OnEnter(AppState::Fretboard), spawn_debug_overlay)
            .add_systems(Update, update_debug_text.run_if(in_state(AppState::Fretboard)));
    }
}

#[derive(Component)]
struct FpsText;

#[derive(Component)]
struct SliderText;

fn spawn_debug_overlay(mut commands: Commands) {
    let font = TextFont {
        font_size: 14.0,
        ..default()
    };
    let color = TextColor(Color::srgb(1.0, 1.0, 1.0));

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(8.0),
                right: Val::Px(8.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(6.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            GlobalZIndex(10),
        ))
        .with_children(|parent| {
            parent
                .spawn((Text::new("FPS: "), font.clone(), color))
                .with_child((TextSpan::default(), font.clone(), color, FpsText));
            parent
                .spawn((Text::new("Slider: "), font.clone(), color))
                .with_child((TextSpan::default(), font.clone(), color, SliderText));
        });
}

fn update_debug_text(
    diagnostics: Res<DiagnosticsStore>,
    session: Res<FretboardSession>,
    mut fps_spans: Query<&mut TextSpan, (With<FpsText>, Without<SliderText>)>,
    mut slider_spans: Query<&mut TextSpan, (With<SliderText>, Without<FpsText>)>,
) {
    if let Some(value) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    {
        for mut span in &mut fps_spans {
            **span = format!("{value:.0}");
        }
    }

    let phase = match session.slider_phase() {
        SliderPhase::Idle => "idle".to_string(),
        SliderPhase::Animating(direction) => format!("shifting {direction:?}"),
    };
    for mut span in &mut slider_spans {
        **span = format!("{phase}, base note {}", session.state().base_note);
    }
}
