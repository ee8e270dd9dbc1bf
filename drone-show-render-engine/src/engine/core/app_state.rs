use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;
use crate::engine::systems::show_clock::ShowClock;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Resource)]
pub enum AppState {
    /// Manifest, formation textures or drone model still missing.
    #[default]
    Loading,
    /// Compute passes and instanced drawing run every frame.
    Running,
}

#[derive(Component)]
pub struct FpsText;

/// Start the show once every asset is in place. Stays in loading otherwise.
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut clock: ResMut<ShowClock>,
    time: Res<Time>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.is_complete() {
        info!("→ All assets ready, starting the show");
        clock.start(time.elapsed_secs());
        next_state.set(AppState::Running);
    }
}
