use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;
use bevy::render::render_resource::ShaderType;
use constants::procedural_shader::{DEFAULT_NEIGHBOUR_WINDOW, HASH_CELL_SIZE};
use constants::render_settings::{
    AMBIENT_LIGHT, BODY_COLOUR, MODEL_SCALE, PULSE_FREQUENCY, SAFETY_RADIUS, SEPARATION_STRENGTH,
    SUNLIGHT_DIRECTION,
};

/// Collision avoidance applied in the drone vertex shader.
#[derive(Resource, Clone, Copy, Debug, ShaderType, ExtractResource)]
pub struct SeparationSettings {
    pub safety_radius: f32,
    pub strength: f32,
    pub cell_size: f32,
    /// Sorted neighbours visited on each side.
    pub neighbour_window: u32,
}

impl Default for SeparationSettings {
    fn default() -> Self {
        Self {
            safety_radius: SAFETY_RADIUS,
            strength: SEPARATION_STRENGTH,
            cell_size: HASH_CELL_SIZE,
            neighbour_window: DEFAULT_NEIGHBOUR_WINDOW,
        }
    }
}

/// LED pulse and body shading.
#[derive(Resource, Clone, Copy, Debug, ShaderType, ExtractResource)]
pub struct DroneLightingSettings {
    pub pulse_frequency: f32,
    pub ambient: f32,
    pub model_scale: f32,
    pub sun_direction: Vec3,
    pub body_colour: Vec3,
}

impl Default for DroneLightingSettings {
    fn default() -> Self {
        Self {
            pulse_frequency: PULSE_FREQUENCY,
            ambient: AMBIENT_LIGHT,
            model_scale: MODEL_SCALE,
            sun_direction: Vec3::from_array(SUNLIGHT_DIRECTION).normalize(),
            body_colour: Vec3::from_array(BODY_COLOUR),
        }
    }
}
