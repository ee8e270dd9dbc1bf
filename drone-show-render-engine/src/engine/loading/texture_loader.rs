use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::drone_show_assets::DroneShowAssets;
use crate::engine::loading::progress::LoadingProgress;

/// Wait for every formation texture. A failed texture stops the loading for good.
pub fn check_texture_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    assets: Res<DroneShowAssets>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.textures_loaded
        || !loading_progress.manifest_loaded
        || loading_progress.failed
    {
        return;
    }

    let mut loaded = 0;
    for handle in assets.formation_textures() {
        match asset_server.get_load_state(handle) {
            Some(LoadState::Loaded) => loaded += 1,
            Some(LoadState::Failed(err)) => {
                let path = handle
                    .path()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "<unnamed>".into());
                loading_progress.fail(format!("formation texture {path}: {err}"));
                return;
            }
            _ => {}
        }
    }

    let total = assets.formation_positions.len() + assets.formation_colours.len();
    if loaded == total {
        info!("✓ All {} formation textures loaded", total);
        loading_progress.textures_loaded = true;
    }
}
