use bevy::asset::AssetMetaCheck;
use bevy::core_pipeline::bloom::Bloom;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResourcePlugin;
use bevy::render::{ExtractSchedule, RenderApp};
use bevy_common_assets::json::JsonAssetPlugin;

use crate::constants::render_settings::{DroneLightingSettings, SeparationSettings};
use crate::engine::assets::drone_show_assets::DroneShowAssets;
use crate::engine::assets::show_manifest::{ShowManifestAsset, ShowPipeline};
use crate::engine::camera::show_camera::{ShowCamera, camera_controller};
use crate::engine::compute::choreography_compute::ChoreographyComputePlugin;
use crate::engine::core::app_state::{AppState, FpsText, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::drone_creator::create_drones_when_ready;
use crate::engine::loading::manifest_loader::{load_manifest_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::texture_config::configure_loaded_textures;
use crate::engine::loading::texture_loader::check_texture_loading;
use crate::engine::render::extraction::app_state::extract_app_state;
use crate::engine::render::instanced_drone_plugin::InstancedDronePlugin;
use crate::engine::systems::fps_tracking::fps_text_update_system;
use crate::engine::systems::settings_input::settings_input_system;
use crate::engine::systems::show_clock::{ShowClock, ShowFrame, advance_show_clock};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // manifest.json of the baked show
        .add_plugins(JsonAssetPlugin::<ShowManifestAsset>::new(&["json"]))
        .add_plugins((
            ExtractResourcePlugin::<ShowManifestAsset>::default(),
            ExtractResourcePlugin::<ShowPipeline>::default(),
            ExtractResourcePlugin::<DroneShowAssets>::default(),
            ExtractResourcePlugin::<ShowFrame>::default(),
            ExtractResourcePlugin::<SeparationSettings>::default(),
            ExtractResourcePlugin::<DroneLightingSettings>::default(),
        ))
        .add_plugins(ChoreographyComputePlugin)
        .add_plugins(InstancedDronePlugin);

    app.insert_resource(ClearColor(Color::srgb(0.005, 0.005, 0.02)))
        .init_resource::<LoadingProgress>()
        .init_resource::<DroneShowAssets>()
        .init_resource::<ShowClock>()
        .init_resource::<ShowFrame>()
        .init_resource::<ShowCamera>()
        .init_resource::<SeparationSettings>()
        .init_resource::<DroneLightingSettings>();

    if let Some(render_app) = app.get_sub_app_mut(RenderApp) {
        render_app
            .init_resource::<State<AppState>>()
            .init_resource::<ShowFrame>()
            .init_resource::<SeparationSettings>()
            .init_resource::<DroneLightingSettings>()
            .add_systems(ExtractSchedule, extract_app_state);
    }

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                load_manifest_system,
                check_texture_loading,
                configure_loaded_textures,
                create_drones_when_ready,
                transition_to_running,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            (
                advance_show_clock,
                settings_input_system,
                camera_controller,
            )
                .run_if(in_state(AppState::Running)),
        );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

fn setup(mut commands: Commands, show_camera: Res<ShowCamera>) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Bloom::NATURAL,
        show_camera.transform(),
    ));

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
