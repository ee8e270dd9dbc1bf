use constants::procedural_shader::WORKGROUP_SIZE;
use constants::texture::MAX_TEXTURE_SIZE;
use log::debug;

use crate::bitonic::{SortPass, schedule};
use crate::error::ConfigError;
use crate::texture::texture_width;

/// Sizes derived from the drone count, validated once before any dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    drone_count: usize,
    texture_width: u32,
    sort_passes: Vec<SortPass>,
}

impl PipelineConfig {
    pub fn new(drone_count: usize) -> Result<Self, ConfigError> {
        if drone_count == 0 {
            return Err(ConfigError::EmptyShow);
        }
        let width = texture_width(drone_count);
        if width > MAX_TEXTURE_SIZE {
            return Err(ConfigError::TooManyDrones {
                drone_count,
                width,
                max: MAX_TEXTURE_SIZE,
            });
        }
        let sort_len = (width as usize).pow(2);
        // width is a power of two, so its square is too
        let sort_passes = schedule(sort_len).map_err(|_| ConfigError::TooManyDrones {
            drone_count,
            width,
            max: MAX_TEXTURE_SIZE,
        })?;
        debug!(
            "pipeline: {} drones, {}x{} textures, {} sort passes",
            drone_count,
            width,
            width,
            sort_passes.len()
        );
        Ok(Self {
            drone_count,
            texture_width: width,
            sort_passes,
        })
    }

    pub fn drone_count(&self) -> usize {
        self.drone_count
    }

    pub fn texture_width(&self) -> u32 {
        self.texture_width
    }

    /// Sorted slots: every texel, padding included.
    pub fn sort_len(&self) -> usize {
        (self.texture_width as usize).pow(2)
    }

    pub fn sort_passes(&self) -> &[SortPass] {
        &self.sort_passes
    }

    /// Workgroups per axis for a full-texture dispatch.
    pub fn workgroups(&self) -> u32 {
        self.texture_width.div_ceil(WORKGROUP_SIZE)
    }
}
