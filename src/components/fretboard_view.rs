use bevy::prelude::*;
use bevy::ui::RelativeCursorPosition;

use crate::file::preferences::persist_changes;
use crate::file::theme::Theme;
use crate::neck::{ romanize, visible_inlays, Inlay, NoteMarker, ViewportGeometry };
use crate::session::{ FretboardChanged, FretboardSession, StateChange };
use crate::states::AppState;
use crate::theory::{ MarkerHighlight, PitchClass };

const HEADER_FONT_SIZE: f32 = 28.0;
const SUBHEADER_FONT_SIZE: f32 = 16.0;
const NUMERAL_FONT_SIZE: f32 = 14.0;
const NUMERAL_BOX_WIDTH: f32 = 40.0;
const NUT_WIDTH: f32 = 6.0;
const FRET_WIDTH: f32 = 2.0;
const OUTLINE_WIDTH: f32 = 2.0;
const MARKER_FILL: f32 = 0.9;
const INTERVAL_FONT_RATIO: f32 = 0.34;
const NOTE_NAME_FONT_RATIO: f32 = 0.3;

/// Frame order for everything that touches the fretboard: input mutates the
/// session, the animation advances, accepted changes are broadcast and the
/// UI reacts to them.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FretboardSystems {
    Input,
    Animate,
    Publish,
    Render,
}

pub struct FretboardPlugin;

impl Plugin for FretboardPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<FretboardChanged>()
            .init_resource::<FretboardView>()
            .configure_sets(
                Update,
                (
                    FretboardSystems::Input,
                    FretboardSystems::Animate,
                    FretboardSystems::Publish,
                    FretboardSystems::Render,
                )
                    .chain(),
            )
            .add_systems(OnEnter(AppState::Fretboard), setup_fretboard_ui)
            .add_systems(OnExit(AppState::Fretboard), teardown_fretboard_ui)
            .add_systems(
                Update,
                animate_markers
                    .in_set(FretboardSystems::Animate)
                    .run_if(in_state(AppState::Fretboard)),
            )
            .add_systems(
                Update,
                publish_changes
                    .in_set(FretboardSystems::Publish)
                    .run_if(in_state(AppState::Fretboard)),
            )
            .add_systems(
                Update,
                (apply_changes, persist_changes)
                    .in_set(FretboardSystems::Render)
                    .run_if(in_state(AppState::Fretboard)),
            );
    }
}

/// Handles to the spawned fretboard UI. `markers` is index-aligned with
/// `FretboardSession::markers`.
#[derive(Resource, Default)]
pub struct FretboardView {
    root: Option<Entity>,
    header: Option<Entity>,
    subheader: Option<Entity>,
    markers: Vec<MarkerView>,
}

struct MarkerView {
    circle: Entity,
    label: Entity,
}

#[derive(Component)]
struct FretboardRoot;

/// The board node. Pressing it shifts the neck toward the clicked half.
#[derive(Component)]
pub struct NeckClickArea;

#[derive(Component)]
pub struct MarkerCircle;

#[derive(Component)]
pub struct IntervalLabel;

#[derive(Component)]
pub struct NoteNameLabel;

fn setup_fretboard_ui(
    mut commands: Commands,
    mut view: ResMut<FretboardView>,
    session: Res<FretboardSession>,
    theme: Res<Theme>,
) {
    spawn_fretboard(&mut commands, &mut view, &session, &theme);
}

fn teardown_fretboard_ui(mut commands: Commands, mut view: ResMut<FretboardView>) {
    despawn_fretboard(&mut commands, &mut view);
}

fn despawn_fretboard(commands: &mut Commands, view: &mut FretboardView) {
    if let Some(root) = view.root.take() {
        commands.entity(root).despawn();
    }
    view.header = None;
    view.subheader = None;
    view.markers.clear();
}

fn spawn_fretboard(
    commands: &mut Commands,
    view: &mut FretboardView,
    session: &FretboardSession,
    theme: &Theme,
) {
    let geometry = session.geometry();

    let root = commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::top(Val::Px(16.0)),
                row_gap: Val::Px(4.0),
                ..default()
            },
            FretboardRoot,
        ))
        .id();

    let header = commands
        .spawn((
            Text::new(session.header_text()),
            TextFont {
                font_size: HEADER_FONT_SIZE,
                ..default()
            },
            TextColor(theme.text_primary),
        ))
        .id();

    let subheader = commands
        .spawn((
            Text::new(session.pentatonic_label()),
            TextFont {
                font_size: SUBHEADER_FONT_SIZE,
                ..default()
            },
            TextColor(theme.text_primary),
        ))
        .id();

    let board = commands
        .spawn((
            Node {
                width: Val::Px(geometry.container_width()),
                height: Val::Px(geometry.container_height()),
                position_type: PositionType::Relative,
                ..default()
            },
            Interaction::default(),
            RelativeCursorPosition::default(),
            NeckClickArea,
        ))
        .id();

    commands
        .entity(root)
        .add_child(header)
        .add_child(subheader)
        .add_child(board);

    spawn_neck(commands, board, geometry, theme);

    // Markers recycled through the left edge are hidden by this clip.
    let slider_layer = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Px(geometry.container_width()),
                height: Val::Px(geometry.container_height()),
                overflow: Overflow::clip(),
                ..default()
            },
            ZIndex(1),
        ))
        .id();
    commands.entity(board).add_child(slider_layer);

    view.markers = session
        .markers()
        .iter()
        .map(|marker| spawn_marker(commands, slider_layer, marker, session, theme))
        .collect();
    spawn_note_names(commands, slider_layer, session, theme);

    view.root = Some(root);
    view.header = Some(header);
    view.subheader = Some(subheader);
}

fn spawn_rect(
    commands: &mut Commands,
    parent: Entity,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    color: Color,
) -> Entity {
    let rect = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(left),
                top: Val::Px(top),
                width: Val::Px(width),
                height: Val::Px(height),
                ..default()
            },
            BackgroundColor(color),
        ))
        .id();
    commands.entity(parent).add_child(rect);
    rect
}

fn spawn_neck(commands: &mut Commands, board: Entity, geometry: &ViewportGeometry, theme: &Theme) {
    let zoom = geometry.zoom;
    let top = geometry.padding;
    let height = geometry.pixel_height;

    spawn_rect(commands, board, geometry.padding, top, geometry.pixel_width, height, theme.neck);

    let nut_width = NUT_WIDTH * zoom;
    spawn_rect(commands, board, geometry.fret_x(0) - nut_width / 2.0, top, nut_width, height, theme.nut);

    let fret_width = FRET_WIDTH * zoom;
    for fret in 1..=geometry.visible_fret_count {
        spawn_rect(commands, board, geometry.fret_x(fret) - fret_width / 2.0, top, fret_width, height, theme.fret);
    }

    for string_index in 0..geometry.string_count {
        let thickness = geometry.string_thickness(string_index);
        spawn_rect(
            commands,
            board,
            geometry.fret_x(0),
            geometry.string_y(string_index) - thickness / 2.0,
            geometry.pixel_width,
            thickness,
            theme.string,
        );
    }

    let radius = geometry.background_dot_radius();
    for (fret, inlay) in visible_inlays(geometry.visible_fret_count) {
        let x = geometry.note_x(fret as i32);
        let rows: &[f32] = match inlay {
            Inlay::Single => &[0.5],
            Inlay::Double => &[0.25, 0.75],
        };
        for row in rows {
            let dot = spawn_rect(commands, board, x - radius, top + height * row - radius, 2.0 * radius, 2.0 * radius, theme.inlay);
            commands.entity(dot).insert(BorderRadius::MAX);
        }
    }

    for fret in 1..=geometry.visible_fret_count {
        let numeral_box = commands
            .spawn(Node {
                position_type: PositionType::Absolute,
                left: Val::Px(geometry.note_x(fret as i32) - NUMERAL_BOX_WIDTH / 2.0),
                top: Val::Px(top + height + 4.0),
                width: Val::Px(NUMERAL_BOX_WIDTH),
                justify_content: JustifyContent::Center,
                ..default()
            })
            .with_children(|parent| {
                parent.spawn((
                    Text::new(romanize(fret)),
                    TextFont {
                        font_size: NUMERAL_FONT_SIZE * zoom,
                        ..default()
                    },
                    TextColor(theme.text_primary),
                ));
            })
            .id();
        commands.entity(board).add_child(numeral_box);
    }
}

fn marker_diameter(geometry: &ViewportGeometry) -> f32 {
    geometry.marker_diameter() * MARKER_FILL
}

fn label_visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

fn marker_colors(session: &FretboardSession, theme: &Theme, pitch: PitchClass) -> (Color, Color) {
    let fill = match session.highlight_for(pitch) {
        MarkerHighlight::Plain => theme.marker,
        MarkerHighlight::Highlighted => theme.highlight,
        MarkerHighlight::ChordTone(tone) => theme.chord_tone(tone),
    };
    let outline = if pitch == session.state().base_note {
        theme.marker_outline
    } else {
        Color::NONE
    };
    (fill, outline)
}

fn spawn_marker(
    commands: &mut Commands,
    layer: Entity,
    marker: &NoteMarker,
    session: &FretboardSession,
    theme: &Theme,
) -> MarkerView {
    let geometry = session.geometry();
    let diameter = marker_diameter(geometry);
    let (fill, outline) = marker_colors(session, theme, marker.pitch);

    let label = commands
        .spawn((
            Text::new(session.interval_label(marker.pitch).label()),
            TextFont {
                font_size: diameter * INTERVAL_FONT_RATIO,
                ..default()
            },
            TextColor(theme.text_secondary),
            label_visibility(session.state().show_intervals),
            IntervalLabel,
        ))
        .id();

    let circle = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(marker.x - diameter / 2.0),
                top: Val::Px(marker.y - diameter / 2.0),
                width: Val::Px(diameter),
                height: Val::Px(diameter),
                border: UiRect::all(Val::Px(OUTLINE_WIDTH * geometry.zoom)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::FlexEnd,
                ..default()
            },
            BackgroundColor(fill),
            BorderColor::all(outline),
            BorderRadius::MAX,
            MarkerCircle,
        ))
        .id();

    commands.entity(circle).add_child(label);
    commands.entity(layer).add_child(circle);
    MarkerView { circle, label }
}

/// Pitch names fixed to the visible cells. They stay put while the markers
/// slide underneath.
fn spawn_note_names(commands: &mut Commands, layer: Entity, session: &FretboardSession, theme: &Theme) {
    let geometry = session.geometry();
    let diameter = marker_diameter(geometry);
    let visible = label_visibility(session.state().show_note_names);
    let last_column = geometry.visible_fret_count.min(session.lattice().span().saturating_sub(1));

    for string_index in 0..geometry.string_count {
        for position in 0..=last_column {
            let Ok(pitch) = session.pitch_at(string_index, position) else {
                continue;
            };
            let name_box = commands
                .spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(geometry.note_x(position as i32) - diameter / 2.0),
                        top: Val::Px(geometry.string_y(string_index) - diameter / 2.0),
                        width: Val::Px(diameter),
                        height: Val::Px(diameter / 2.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::FlexEnd,
                        ..default()
                    },
                    visible,
                    NoteNameLabel,
                ))
                .with_children(|parent| {
                    parent.spawn((
                        Text::new(pitch.name()),
                        TextFont {
                            font_size: diameter * NOTE_NAME_FONT_RATIO,
                            ..default()
                        },
                        TextColor(theme.text_secondary),
                    ));
                })
                .id();
            commands.entity(layer).add_child(name_box);
        }
    }
}

fn animate_markers(
    time: Res<Time>,
    mut session: ResMut<FretboardSession>,
    view: Res<FretboardView>,
    mut nodes: Query<&mut Node, With<MarkerCircle>>,
) {
    if !session.is_animating() {
        return;
    }
    session.advance(time.delta_secs());

    let radius = marker_diameter(session.geometry()) / 2.0;
    for (marker, marker_view) in session.markers().iter().zip(&view.markers) {
        if let Ok(mut node) = nodes.get_mut(marker_view.circle) {
            node.left = Val::Px(marker.x - radius);
        }
    }
}

fn publish_changes(mut session: ResMut<FretboardSession>, mut changes: MessageWriter<FretboardChanged>) {
    if !session.has_pending_changes() {
        return;
    }
    for change in session.drain_changes() {
        changes.write(FretboardChanged(change));
    }
}

fn apply_changes(
    mut commands: Commands,
    mut changes: MessageReader<FretboardChanged>,
    session: Res<FretboardSession>,
    theme: Res<Theme>,
    mut view: ResMut<FretboardView>,
    mut texts: Query<&mut Text>,
    mut circles: Query<(&mut BackgroundColor, &mut BorderColor), With<MarkerCircle>>,
    mut note_names: Query<&mut Visibility, (With<NoteNameLabel>, Without<IntervalLabel>)>,
    mut intervals: Query<&mut Visibility, (With<IntervalLabel>, Without<NoteNameLabel>)>,
) {
    let mut relayout = false;
    let mut restyle = false;

    for FretboardChanged(change) in changes.read() {
        match change {
            StateChange::Layout => relayout = true,
            StateChange::BaseNote { .. } | StateChange::HighlightMode { .. } => restyle = true,
            StateChange::HighlightSet(_) => {}
            StateChange::NoteNamesVisible(visible) => {
                for mut visibility in &mut note_names {
                    *visibility = label_visibility(*visible);
                }
            }
            StateChange::IntervalsVisible(visible) => {
                for mut visibility in &mut intervals {
                    *visibility = label_visibility(*visible);
                }
            }
        }
    }

    if relayout {
        despawn_fretboard(&mut commands, &mut view);
        spawn_fretboard(&mut commands, &mut view, &session, &theme);
        return;
    }
    if !restyle {
        return;
    }

    for (marker, marker_view) in session.markers().iter().zip(&view.markers) {
        let (fill, outline) = marker_colors(&session, &theme, marker.pitch);
        if let Ok((mut background, mut border)) = circles.get_mut(marker_view.circle) {
            background.0 = fill;
            *border = BorderColor::all(outline);
        }
        if let Ok(mut text) = texts.get_mut(marker_view.label) {
            text.0 = session.interval_label(marker.pitch).label().to_string();
        }
    }

    if let Some(header) = view.header {
        if let Ok(mut text) = texts.get_mut(header) {
            text.0 = session.header_text();
        }
    }
    if let Some(subheader) = view.subheader {
        if let Ok(mut text) = texts.get_mut(subheader) {
            text.0 = session.pentatonic_label();
        }
    }
}
