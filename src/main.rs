use bevy::{
    prelude::*,
    window::{ ExitCondition, WindowPlugin, WindowResolution },
};

use fretboard_app::components::{ ControlsPlugin, FretboardPlugin };
use fretboard_app::file::config::{ AppConfig, ConfigPlugin };
use fretboard_app::states::StartupPlugin;

#[cfg(not(feature = "production"))]
use fretboard_app::debug::DebugPlugin;

fn main() {
    let mut app = App::new();
    app.add_plugins(ConfigPlugin);

    let window = app.world().resource::<AppConfig>().window.clone();

    app.add_plugins((
        DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window.title,
                resolution: WindowResolution::new(window.width, window.height),
                ..default()
            }),
            exit_condition: ExitCondition::OnPrimaryClosed,
            ..default()
        }),
        #[cfg(not(feature = "production"))] DebugPlugin,
        StartupPlugin,
        FretboardPlugin,
        ControlsPlugin,
    ))
    .run();
}
