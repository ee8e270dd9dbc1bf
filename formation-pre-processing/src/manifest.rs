/// Show manifest output linking every baked texture.
use anyhow::{Context, Result};
use choreography::manifest::ShowManifest;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Writes `manifest.json` into the output directory.
pub struct ManifestGenerator {
    output_dir: PathBuf,
}

impl ManifestGenerator {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn write(&self, manifest: &ShowManifest) -> Result<PathBuf> {
        // refuse to write something the renderer would reject
        manifest.validate()?;

        let manifest_path = self.output_dir.join(MANIFEST_FILE);
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(&manifest_path, manifest_json)
            .with_context(|| format!("writing {}", manifest_path.display()))?;

        info!("Generated manifest: {}", manifest_path.display());
        log_summary(manifest);
        Ok(manifest_path)
    }
}

pub fn load_manifest(path: &Path) -> Result<ShowManifest> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn log_summary(manifest: &ShowManifest) {
    info!("Manifest Summary:");
    info!(
        "  Drones: {} ({}x{} textures)",
        manifest.drone_count, manifest.texture_size, manifest.texture_size
    );
    for formation in &manifest.formations {
        info!(
            "  {}: {} used slots -> {}",
            formation.name, formation.used_slots, formation.texture_files.position
        );
    }
    info!(
        "  Show bounds: ({:.1}, {:.1}, {:.1}) to ({:.1}, {:.1}, {:.1})",
        manifest.show_bounds.min_x,
        manifest.show_bounds.min_y,
        manifest.show_bounds.min_z,
        manifest.show_bounds.max_x,
        manifest.show_bounds.max_y,
        manifest.show_bounds.max_z
    );
    info!(
        "  Final formation: {} drones in the densest cell, {} crowded",
        manifest.stats.max_cell_occupancy, manifest.stats.crowded_drones
    );
    info!("  Show ends at {:.1}s", manifest.timeline.finished_at());
}
