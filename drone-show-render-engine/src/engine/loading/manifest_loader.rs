use bevy::asset::LoadState;
use bevy::prelude::*;
use choreography::render::neighbour_window;

use crate::constants::path::{DRONE_MODEL_PATH, RELATIVE_MANIFEST_PATH};
use crate::constants::render_settings::SeparationSettings;
use crate::engine::assets::drone_show_assets::DroneShowAssets;
use crate::engine::assets::show_manifest::{ShowManifestAsset, ShowPipeline};
use crate::engine::camera::show_camera::ShowCamera;
use crate::engine::loading::progress::LoadingProgress;

/// Request the manifest and the drone model.
pub fn start_loading(mut assets: ResMut<DroneShowAssets>, asset_server: Res<AssetServer>) {
    let manifest_path = format!("{}/manifest.json", RELATIVE_MANIFEST_PATH);
    info!("Loading show manifest from {}", manifest_path);
    assets.manifest = Some(asset_server.load(manifest_path));
    assets.drone_model = Some(asset_server.load(DRONE_MODEL_PATH));
}

/// Validate the manifest, then fit the camera and request the formation textures.
pub fn load_manifest_system(
    mut loading_progress: ResMut<LoadingProgress>,
    mut assets: ResMut<DroneShowAssets>,
    mut separation: ResMut<SeparationSettings>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<ShowManifestAsset>>,
) {
    if loading_progress.manifest_loaded || loading_progress.failed {
        return;
    }
    let Some(handle) = assets.manifest.clone() else {
        return;
    };

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&handle) {
        loading_progress.fail(format!("manifest failed to load: {err}"));
        return;
    }
    let Some(manifest) = manifests.get(&handle) else {
        return;
    };

    let config = match manifest.validate() {
        Ok(config) => config,
        Err(err) => {
            loading_progress.fail(format!("invalid manifest: {err}"));
            return;
        }
    };

    info!(
        "✓ Manifest loaded: {} drones, {} formations, {}x{} textures, {} sort passes",
        config.drone_count(),
        manifest.formation_count(),
        config.texture_width(),
        config.texture_width(),
        config.sort_passes().len()
    );

    separation.neighbour_window = match manifest.stats.neighbour_window {
        0 => neighbour_window(manifest.stats.max_cell_occupancy),
        window => window,
    };
    if manifest.stats.crowded_drones > 0 {
        warn!(
            "{} drones of the final formation sit closer than the baked safety radius",
            manifest.stats.crowded_drones
        );
    }

    commands.insert_resource(ShowCamera::with_bounds(&manifest.show_bounds));
    commands.insert_resource(manifest.clone());
    commands.insert_resource(ShowPipeline(config));

    assets.formation_positions = manifest
        .position_texture_paths()
        .into_iter()
        .map(|path| asset_server.load(path))
        .collect();
    assets.formation_colours = manifest
        .colour_texture_paths()
        .into_iter()
        .map(|path| asset_server.load(path))
        .collect();

    loading_progress.manifest_loaded = true;
}
