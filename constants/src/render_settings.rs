/// Separation kicks in below this distance
pub const SAFETY_RADIUS: f32 = 50.0;

/// Gain of the separation push
pub const SEPARATION_STRENGTH: f32 = 100.0;

/// Heartbeat pulse frequency (radians per second)
pub const PULSE_FREQUENCY: f32 = 5.0;

/// LEDs are always this bright
pub const PULSE_BASE_INTENSITY: f32 = 10.0;

/// Extra intensity at the top of a heartbeat
pub const PULSE_GAIN: f32 = 5.0;

/// Ambient term of the body shading
pub const AMBIENT_LIGHT: f32 = 0.3;

/// Direction towards the sun (normalised by the renderer)
pub const SUNLIGHT_DIRECTION: [f32; 3] = [0.5, 1.0, 0.5];

/// Dark plastic drone body
pub const BODY_COLOUR: [f32; 3] = [0.05, 0.05, 0.05];

/// Scale applied to the drone model meshes
pub const MODEL_SCALE: f32 = 10.0;
