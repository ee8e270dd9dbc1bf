/// Show baker orchestrating formation generation and texture output.
use crate::config::{FormationSpec, ShowConfig};
use crate::dds_writer::{write_colour_dds, write_position_dds};
use crate::laz::load_point_list;
use crate::manifest::ManifestGenerator;
use crate::mesh::load_text_mesh;
use crate::stats::{crowding, formation_bounds, show_bounds};
use anyhow::{Context, Result};
use choreography::flight::FlightPlan;
use choreography::formation::{FormationKind, FormationSlot, generate};
use choreography::manifest::{FormationEntry, FormationTextureFiles, ShowManifest};
use choreography::show::Show;
use choreography::texture::{ColourTexture, PositionTexture};
use choreography::PipelineConfig;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Seconds between samples when measuring the show bounds.
const BOUNDS_STEP: f32 = 0.5;

pub struct ShowBaker {
    config: ShowConfig,
    output_dir: PathBuf,
}

impl ShowBaker {
    pub fn new(config: ShowConfig, output_dir: &Path) -> Self {
        Self {
            config,
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Generate, encode and write every formation, then the manifest.
    pub fn bake(&self) -> Result<ShowManifest> {
        let pipeline = PipelineConfig::new(self.config.drone_count)
            .context("invalid drone count")?;
        let timeline = self.config.timeline();
        timeline.validate().context("invalid timeline")?;

        info!(
            "Baking '{}': {} drones, {} formations, {}x{} textures",
            self.config.name,
            pipeline.drone_count(),
            self.config.formations.len(),
            pipeline.texture_width(),
            pipeline.texture_width()
        );

        let kinds = self
            .config
            .formations
            .iter()
            .enumerate()
            .map(|(index, spec)| self.resolve_source(index, spec))
            .collect::<Result<Vec<_>>>()?;

        let formations = self.generate_formations(&kinds, pipeline.drone_count())?;

        let formation_dir = self.output_dir.join("formations");
        fs::create_dir_all(&formation_dir)
            .with_context(|| format!("creating {}", formation_dir.display()))?;

        let entries = self
            .config
            .formations
            .iter()
            .zip(&kinds)
            .zip(&formations)
            .enumerate()
            .map(|(index, ((spec, kind), slots))| self.write_formation(index, spec, kind, slots))
            .collect::<Result<Vec<_>>>()?;

        let last = formations
            .last()
            .context("a show needs at least one formation")?;
        let stats = crowding(
            last,
            self.config.cell_size,
            self.config.safety_radius,
            pipeline.sort_len(),
        )?;
        if stats.crowded_drones > 0 {
            warn!(
                "{} drones of the final formation are closer than {} units",
                stats.crowded_drones, self.config.safety_radius
            );
        }

        let mut plan = FlightPlan::new(pipeline.texture_width());
        plan.scale = self.config.scale;
        let show = Show::new(formations, timeline, plan)?;

        let manifest = ShowManifest {
            drone_count: pipeline.drone_count(),
            texture_size: pipeline.texture_width(),
            seed: self.config.seed,
            timeline,
            flight: plan,
            formations: entries,
            show_bounds: show_bounds(&show, BOUNDS_STEP),
            stats,
        };

        ManifestGenerator::new(&self.output_dir).write(&manifest)?;
        info!("Bake complete!");
        Ok(manifest)
    }

    /// Load external sources so generation itself cannot fail on I/O.
    fn resolve_source(&self, index: usize, spec: &FormationSpec) -> Result<FormationKind> {
        let kind = match spec {
            FormationSpec::Grid { edge, spacing } => FormationKind::Grid {
                edge: *edge,
                spacing: *spacing,
            },
            FormationSpec::Sphere { radius } => FormationKind::Sphere { radius: *radius },
            FormationSpec::Heart { scale } => FormationKind::Heart { scale: *scale },
            FormationSpec::Text {
                mesh,
                mesh_name,
                seed,
            } => FormationKind::Text {
                mesh: load_text_mesh(mesh, mesh_name.as_deref())?,
                seed: seed.unwrap_or(self.config.seed.wrapping_add(index as u64)),
            },
            FormationSpec::Points { path, extent } => {
                let points = load_point_list(path, *extent, self.config.drone_count)?;
                if points.len() < self.config.drone_count {
                    info!(
                        "{} has {} points for {} drones, cycling",
                        path.display(),
                        points.len(),
                        self.config.drone_count
                    );
                }
                FormationKind::Points { points }
            }
            FormationSpec::Helix {
                radius,
                height,
                turns,
            } => FormationKind::Helix {
                radius: *radius,
                height: *height,
                turns: *turns,
            },
            FormationSpec::Galaxy { arms, radius } => FormationKind::Galaxy {
                arms: *arms,
                radius: *radius,
            },
            FormationSpec::Wave { spacing, amplitude } => FormationKind::Wave {
                spacing: *spacing,
                amplitude: *amplitude,
            },
            FormationSpec::Burst { radius } => FormationKind::Burst { radius: *radius },
            FormationSpec::Pyramid { base, spacing } => FormationKind::Pyramid {
                base: *base,
                spacing: *spacing,
            },
            FormationSpec::Torus {
                major_radius,
                minor_radius,
            } => FormationKind::Torus {
                major_radius: *major_radius,
                minor_radius: *minor_radius,
            },
        };
        Ok(kind)
    }

    fn generate_formations(
        &self,
        kinds: &[FormationKind],
        count: usize,
    ) -> Result<Vec<Vec<FormationSlot>>> {
        let pb = ProgressBar::new(kinds.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.green/blue}] {pos}/{len} formations ({percent}%) {msg}")?
                .progress_chars("▉▊▋▌▍▎▏ "),
        );
        pb.set_message("Generating formations");

        let formations = kinds
            .par_iter()
            .enumerate()
            .map(|(index, kind)| {
                let slots = generate(kind, count)
                    .with_context(|| format!("generating formation {index}"));
                pb.inc(1);
                slots
            })
            .collect::<Result<Vec<_>>>()?;

        pb.finish_with_message("Formations generated");
        Ok(formations)
    }

    fn write_formation(
        &self,
        index: usize,
        spec: &FormationSpec,
        kind: &FormationKind,
        slots: &[FormationSlot],
    ) -> Result<FormationEntry> {
        let name = format!("{index:02}_{}", spec.name());
        let texture_files = FormationTextureFiles {
            position: format!("formations/{name}_position.dds"),
            colour: format!("formations/{name}_colour.dds"),
        };

        let position = PositionTexture::encode(slots, kind.id());
        write_position_dds(
            &self.output_dir.join(&texture_files.position),
            position.width(),
            position.to_le_bytes(),
        )?;
        let colour = ColourTexture::encode(slots);
        write_colour_dds(
            &self.output_dir.join(&texture_files.colour),
            colour.width(),
            colour.to_le_bytes(),
        )?;

        let used_slots = slots.iter().filter(|s| s.is_used()).count();
        info!("Wrote {name}: {used_slots}/{} slots used", slots.len());

        Ok(FormationEntry {
            id: kind.id(),
            name,
            used_slots,
            bounds: formation_bounds(slots),
            texture_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dds_writer::read_position_dds;
    use crate::manifest::{MANIFEST_FILE, load_manifest};
    use constants::formation::get_formation_name;
    use pretty_assertions::assert_eq;

    fn small_show() -> ShowConfig {
        ShowConfig {
            drone_count: 100,
            ..ShowConfig::default()
        }
    }

    #[test]
    fn bakes_default_formations() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = ShowBaker::new(small_show(), dir.path()).bake().unwrap();

        assert_eq!(manifest.texture_size, 16);
        assert_eq!(manifest.formations.len(), 3);
        assert_eq!(manifest.timeline.formation_count, 3);
        assert_eq!(manifest.formations[0].used_slots, 100);

        let on_disk = load_manifest(&dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(on_disk, manifest);

        for entry in &manifest.formations {
            let (size, floats) = read_position_dds(&dir.path().join(&entry.texture_files.position)).unwrap();
            assert_eq!(size, 16);
            let texture = PositionTexture::from_floats(size, floats).unwrap();
            assert_eq!((0..256).filter(|&i| texture.is_occupied(i)).count(), 100);
            assert!(dir.path().join(&entry.texture_files.colour).exists());
        }
    }

    #[test]
    fn rebaking_is_deterministic() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let a = ShowBaker::new(small_show(), first.path()).bake().unwrap();
        let b = ShowBaker::new(small_show(), second.path()).bake().unwrap();
        assert_eq!(a, b);
        let path = &a.formations[1].texture_files.position;
        assert_eq!(
            fs::read(first.path().join(path)).unwrap(),
            fs::read(second.path().join(path)).unwrap()
        );
    }

    #[test]
    fn empty_show_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShowConfig {
            drone_count: 0,
            ..ShowConfig::default()
        };
        assert!(ShowBaker::new(config, dir.path()).bake().is_err());
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }

    #[test]
    fn bakes_animated_show_formations() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShowConfig {
            drone_count: 64,
            formations: vec![
                FormationSpec::Helix {
                    radius: 160.0,
                    height: 800.0,
                    turns: 4.0,
                },
                FormationSpec::Galaxy {
                    arms: 3,
                    radius: 450.0,
                },
                FormationSpec::Wave {
                    spacing: 40.0,
                    amplitude: 120.0,
                },
                FormationSpec::Burst { radius: 180.0 },
            ],
            ..ShowConfig::default()
        };
        let manifest = ShowBaker::new(config, dir.path()).bake().unwrap();

        let kinds: Vec<_> = manifest
            .formations
            .iter()
            .map(|f| get_formation_name(f.id))
            .collect();
        assert_eq!(kinds, vec!["helix", "galaxy", "wave", "burst"]);
        assert!(manifest.formations.iter().all(|f| f.used_slots == 64));
        assert_eq!(manifest.formations[3].name, "03_burst");
    }

    #[test]
    fn missing_text_mesh_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_show();
        config.formations.push(FormationSpec::Text {
            mesh: dir.path().join("missing.glb"),
            mesh_name: None,
            seed: None,
        });
        let err = ShowBaker::new(config, dir.path()).bake().unwrap_err();
        assert!(format!("{err:#}").contains("missing.glb"));
    }
}
