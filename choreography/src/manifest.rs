//! `manifest.json` written by the baker and loaded by the renderer.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::flight::FlightPlan;
use crate::pipeline::PipelineConfig;
use crate::timeline::Timeline;

/// Axis-aligned bounds in show space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsData {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl BoundsData {
    pub fn from_corners(min: Vec3, max: Vec3) -> Self {
        Self {
            min_x: min.x as f64,
            max_x: max.x as f64,
            min_y: min.y as f64,
            max_y: max.y as f64,
            min_z: min.z as f64,
            max_z: max.z as f64,
        }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            ((self.max_x + self.min_x) * 0.5) as f32,
            ((self.max_y + self.min_y) * 0.5) as f32,
            ((self.max_z + self.min_z) * 0.5) as f32,
        )
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(
            (self.max_x - self.min_x) as f32,
            (self.max_y - self.min_y) as f32,
            (self.max_z - self.min_z) as f32,
        )
    }
}

/// Texture paths relative to the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationTextureFiles {
    /// RGBA32F, xyz + formation id.
    pub position: String,
    /// RGBA16F, rgb + opacity.
    pub colour: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationEntry {
    pub id: u8,
    pub name: String,
    pub used_slots: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsData>,
    pub texture_files: FormationTextureFiles,
}

/// Crowding measured on the final formation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShowStats {
    pub max_cell_occupancy: usize,
    pub crowded_drones: usize,
    pub neighbour_window: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowManifest {
    pub drone_count: usize,
    pub texture_size: u32,
    pub seed: u64,
    pub timeline: Timeline,
    pub flight: FlightPlan,
    /// In show order. The first formation anchors the launch curves.
    pub formations: Vec<FormationEntry>,
    pub show_bounds: BoundsData,
    #[serde(default)]
    pub stats: ShowStats,
}

impl ShowManifest {
    /// Everything the renderer relies on before it allocates GPU resources.
    pub fn validate(&self) -> Result<PipelineConfig, ManifestError> {
        let config = PipelineConfig::new(self.drone_count)?;
        if config.texture_width() != self.texture_size {
            return Err(ManifestError::TextureSizeMismatch {
                manifest: self.texture_size,
                expected: config.texture_width(),
            });
        }
        self.timeline.validate()?;
        if self.timeline.formation_count != self.formations.len() {
            return Err(ManifestError::FormationCountMismatch {
                timeline: self.timeline.formation_count,
                listed: self.formations.len(),
            });
        }
        Ok(config)
    }

    pub fn formation_count(&self) -> usize {
        self.formations.len()
    }

    pub fn get_formation_by_name(&self, name: &str) -> Option<&FormationEntry> {
        self.formations.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use pretty_assertions::assert_eq;

    pub(crate) fn manifest(drone_count: usize, texture_size: u32, formations: usize) -> ShowManifest {
        ShowManifest {
            drone_count,
            texture_size,
            seed: 1,
            timeline: Timeline::new(formations),
            flight: FlightPlan::new(texture_size),
            formations: (0..formations)
                .map(|i| FormationEntry {
                    id: i as u8,
                    name: format!("f{i}"),
                    used_slots: drone_count,
                    bounds: None,
                    texture_files: FormationTextureFiles {
                        position: format!("formations/f{i}_position.dds"),
                        colour: format!("formations/f{i}_colour.dds"),
                    },
                })
                .collect(),
            show_bounds: BoundsData::from_corners(Vec3::splat(-1.0), Vec3::ONE),
            stats: ShowStats::default(),
        }
    }

    #[test]
    fn valid_manifest_yields_config() {
        let config = manifest(4096, 64, 3).validate().unwrap();
        assert_eq!(config.texture_width(), 64);
    }

    #[test]
    fn mismatches_are_reported() {
        assert_eq!(
            manifest(4096, 32, 3).validate().unwrap_err(),
            ManifestError::TextureSizeMismatch {
                manifest: 32,
                expected: 64
            }
        );
        let mut short = manifest(16, 4, 3);
        short.formations.pop();
        assert_eq!(
            short.validate().unwrap_err(),
            ManifestError::FormationCountMismatch {
                timeline: 3,
                listed: 2
            }
        );
        assert_eq!(
            manifest(0, 0, 1).validate().unwrap_err(),
            ManifestError::Config(ConfigError::EmptyShow)
        );
    }

    #[test]
    fn json_round_trip() {
        let original = manifest(100, 16, 2);
        let json = serde_json::to_string_pretty(&original).unwrap();
        let parsed: ShowManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
        assert!(parsed.get_formation_by_name("f1").is_some());
    }

    #[test]
    fn bounds_center_and_size() {
        let bounds = BoundsData::from_corners(Vec3::new(-2.0, 0.0, 4.0), Vec3::new(2.0, 10.0, 8.0));
        assert_eq!(bounds.center(), Vec3::new(0.0, 5.0, 6.0));
        assert_eq!(bounds.size(), Vec3::new(4.0, 10.0, 4.0));
    }
}
