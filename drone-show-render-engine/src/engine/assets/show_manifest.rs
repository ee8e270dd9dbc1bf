use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;
use choreography::PipelineConfig;
use choreography::manifest::ShowManifest;
use serde::{Deserialize, Serialize};

use crate::constants::path::RELATIVE_MANIFEST_PATH;

/// Baked show manifest as a Bevy asset. Mirrors the JSON written by the baker.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize, Resource, ExtractResource, Deref)]
#[serde(transparent)]
pub struct ShowManifestAsset(pub ShowManifest);

impl ShowManifestAsset {
    /// Asset path of a file referenced by the manifest.
    pub fn asset_path(relative: &str) -> String {
        format!("{}/{}", RELATIVE_MANIFEST_PATH, relative)
    }

    pub fn position_texture_paths(&self) -> Vec<String> {
        self.formations
            .iter()
            .map(|f| Self::asset_path(&f.texture_files.position))
            .collect()
    }

    pub fn colour_texture_paths(&self) -> Vec<String> {
        self.formations
            .iter()
            .map(|f| Self::asset_path(&f.texture_files.colour))
            .collect()
    }
}

/// Sizes validated from the manifest. Only inserted for a valid show.
#[derive(Resource, Debug, Clone, ExtractResource, Deref)]
pub struct ShowPipeline(pub PipelineConfig);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MANIFEST: &str = r#"{
        "drone_count": 4,
        "texture_size": 2,
        "seed": 7,
        "timeline": {
            "formation_count": 1,
            "first_transition_at": 15.0,
            "transition_duration": 5.0,
            "hold_duration": 5.0
        },
        "flight": { "pad_width": 2 },
        "formations": [{
            "id": 0,
            "name": "00_grid",
            "used_slots": 4,
            "texture_files": {
                "position": "formations/00_grid_position.dds",
                "colour": "formations/00_grid_colour.dds"
            }
        }],
        "show_bounds": {
            "min_x": -1.0, "max_x": 1.0,
            "min_y": 0.0, "max_y": 2.0,
            "min_z": -1.0, "max_z": 1.0
        }
    }"#;

    #[test]
    fn parses_baked_manifest() {
        let manifest: ShowManifestAsset = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.drone_count, 4);
        assert_eq!(
            manifest.position_texture_paths(),
            vec!["show/formations/00_grid_position.dds".to_string()]
        );
        assert_eq!(manifest.flight.fly_up_height, 25.0);
        assert_eq!(manifest.validate().unwrap().texture_width(), 2);
    }
}
