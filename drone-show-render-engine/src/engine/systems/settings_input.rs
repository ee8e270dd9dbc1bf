use bevy::prelude::*;
use constants::procedural_shader::MAX_NEIGHBOUR_WINDOW;
use constants::render_settings::SEPARATION_STRENGTH;

use crate::constants::render_settings::{DroneLightingSettings, SeparationSettings};

/// `X` toggles separation, `[`/`]` shrink or grow the neighbour window,
/// `-`/`=` slow down or speed up the heartbeat.
pub fn settings_input_system(
    mut separation: ResMut<SeparationSettings>,
    mut lighting: ResMut<DroneLightingSettings>,
    #[cfg(not(target_arch = "wasm32"))] keyboard: Res<ButtonInput<KeyCode>>,
) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if keyboard.just_pressed(KeyCode::KeyX) {
            separation.strength = if separation.strength > 0.0 {
                0.0
            } else {
                SEPARATION_STRENGTH
            };
            info!("Separation strength: {}", separation.strength);
        }
        if keyboard.just_pressed(KeyCode::BracketLeft) {
            separation.neighbour_window = separation.neighbour_window.saturating_sub(1).max(1);
            info!("Neighbour window: {}", separation.neighbour_window);
        }
        if keyboard.just_pressed(KeyCode::BracketRight) {
            separation.neighbour_window = (separation.neighbour_window + 1).min(MAX_NEIGHBOUR_WINDOW);
            info!("Neighbour window: {}", separation.neighbour_window);
        }
        if keyboard.just_pressed(KeyCode::Minus) {
            lighting.pulse_frequency = (lighting.pulse_frequency - 1.0).max(0.0);
            info!("Pulse frequency: {}", lighting.pulse_frequency);
        }
        if keyboard.just_pressed(KeyCode::Equal) {
            lighting.pulse_frequency += 1.0;
            info!("Pulse frequency: {}", lighting.pulse_frequency);
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        // No keyboard shortcuts in the browser, only report external changes
        if separation.is_changed() && !separation.is_added() {
            info!("Separation settings changed: {:?}", *separation);
        }
        if lighting.is_changed() && !lighting.is_added() {
            info!("Lighting settings changed: {:?}", *lighting);
        }
    }
}
