use constants::formation::NOISE_MULTIPLIER;

/// `fract(sin(x) * 43758.5453)`, the shader-style hash noise in `[0, 1)`.
///
/// Evaluated in f32 so the WGSL passes produce the same values.
pub fn hash_noise(x: f32) -> f32 {
    let v = (x.sin() * NOISE_MULTIPLIER).fract();
    if v < 0.0 { v + 1.0 } else { v }
}
