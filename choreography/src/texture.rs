//! Packing of per-drone state into square float textures.
//!
//! Pixel `(x, y)` of a `W x W` texture belongs to drone `y * W + x`. The WGSL
//! passes use the same mapping, so these helpers are the only place it lives
//! on the CPU side.

use constants::texture::UNUSED_FORMATION_TAG;
use glam::Vec3;
use half::f16;

use crate::error::TextureError;
use crate::formation::FormationSlot;

/// Smallest power of two `W` with `W * W >= count`. Zero drones need no texture.
pub fn texture_width(count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    let mut width: u64 = 1;
    while width * width < count as u64 {
        width <<= 1;
    }
    width as u32
}

/// Texel of drone `index`. A zero-width texture has no texels.
pub fn index_to_texel(index: usize, width: u32) -> Option<(u32, u32)> {
    let width = width as usize;
    if width == 0 {
        return None;
    }
    Some(((index % width) as u32, (index / width) as u32))
}

pub fn texel_to_index(x: u32, y: u32, width: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// RGBA32F texture: xyz = position, a = formation id (or -1 for no drone).
#[derive(Debug, Clone, PartialEq)]
pub struct PositionTexture {
    width: u32,
    texels: Vec<[f32; 4]>,
}

impl PositionTexture {
    pub fn encode(slots: &[FormationSlot], formation_id: u8) -> Self {
        let width = texture_width(slots.len());
        let mut texels = vec![padding_texel(); (width as usize).pow(2)];
        for (texel, slot) in texels.iter_mut().zip(slots) {
            let tag = if slot.is_used() {
                formation_id as f32
            } else {
                UNUSED_FORMATION_TAG
            };
            *texel = [slot.position.x, slot.position.y, slot.position.z, tag];
        }
        Self { width, texels }
    }

    pub fn from_floats(width: u32, floats: Vec<f32>) -> Result<Self, TextureError> {
        let expected = (width as usize).pow(2) * 4;
        if floats.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                expected,
                actual: floats.len(),
            });
        }
        let texels = floats
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        Ok(Self { width, texels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn texel(&self, index: usize) -> Option<[f32; 4]> {
        self.texels.get(index).copied()
    }

    pub fn texel_at(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width {
            return None;
        }
        self.texel(texel_to_index(x, y, self.width))
    }

    /// Position of drone `index`, read back through its texel coordinates.
    pub fn decode(&self, index: usize) -> Option<Vec3> {
        let (x, y) = index_to_texel(index, self.width)?;
        self.texel_at(x, y).map(|[px, py, pz, _]| Vec3::new(px, py, pz))
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.texel(index)
            .is_some_and(|t| t[3] != UNUSED_FORMATION_TAG)
    }

    pub fn as_floats(&self) -> &[f32] {
        self.texels.as_flattened()
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.as_floats().iter().flat_map(|f| f.to_le_bytes()).collect()
    }
}

fn padding_texel() -> [f32; 4] {
    let [x, y, z] = constants::formation::UNUSED_SLOT_POSITION;
    [x, y, z, UNUSED_FORMATION_TAG]
}

/// RGBA16F texture: rgb = light colour, a = opacity. Padding is transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct ColourTexture {
    width: u32,
    texels: Vec<[f16; 4]>,
}

impl ColourTexture {
    pub fn encode(slots: &[FormationSlot]) -> Self {
        let width = texture_width(slots.len());
        let mut texels = vec![[f16::ZERO; 4]; (width as usize).pow(2)];
        for (texel, slot) in texels.iter_mut().zip(slots) {
            *texel = slot.colour.map(f16::from_f32);
        }
        Self { width, texels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn decode(&self, index: usize) -> Option<[f32; 4]> {
        self.texels.get(index).map(|t| t.map(f16::to_f32))
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.texels
            .iter()
            .flatten()
            .flat_map(|h| h.to_le_bytes())
            .collect()
    }
}
