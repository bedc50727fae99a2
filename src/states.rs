use bevy::prelude::*;

use crate::file::preferences::setup_preferences;
use crate::file::theme::setup_theme;

#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    InitialLoad,
    Fretboard,
}

// Every loader flips its flag; the fretboard opens once all of them are done.
#[derive(Resource, Default)]
pub struct StartupLatch {
    pub preferences_loaded: bool,
    pub theme_loaded: bool,
}

impl StartupLatch {
    pub fn is_complete(&self) -> bool {
        self.preferences_loaded && self.theme_loaded
    }
}

pub fn check_startup_complete(
    latch: Res<StartupLatch>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if latch.is_complete() {
        next_state.set(AppState::Fretboard);
    }
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub struct StartupPlugin;

impl Plugin for StartupPlugin {
    fn build(&self, app: &mut App) {
        app
        .init_state::<AppState>()
        .insert_resource(StartupLatch::default())
        .add_systems(OnEnter(AppState::InitialLoad), (setup_theme, setup_preferences, setup_camera))
        .add_systems(Update, check_startup_complete.run_if(in_state(AppState::InitialLoad)))
        ;
    }
}
