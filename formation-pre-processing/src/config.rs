/// TOML show description read by `bake --config`.
use anyhow::{Context, Result};
use choreography::Timeline;
use constants::formation::{
    BURST_RADIUS, DEFAULT_SAMPLE_SEED, GALAXY_ARMS, GALAXY_RADIUS, GRID_EDGE, GRID_SPACING,
    HEART_SCALE, HELIX_HEIGHT, HELIX_RADIUS, HELIX_TURNS, POINT_LIST_EXTENT, PYRAMID_BASE,
    PYRAMID_SPACING, SPHERE_RADIUS, TORUS_MAJOR_RADIUS, TORUS_MINOR_RADIUS, WAVE_AMPLITUDE,
    WAVE_SPACING,
};
use constants::procedural_shader::HASH_CELL_SIZE;
use constants::render_settings::SAFETY_RADIUS;
use constants::texture::DEFAULT_DRONE_COUNT;
use constants::timeline::SHOW_SCALE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    pub name: String,
    pub drone_count: usize,
    pub seed: u64,
    /// Multiplies the fly-up height of the launch.
    pub scale: f32,
    pub cell_size: f32,
    pub safety_radius: f32,
    /// `formation_count` is ignored, it always follows `formations`.
    pub timeline: Timeline,
    pub formations: Vec<FormationSpec>,
}

/// One formation of the show, in playback order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormationSpec {
    Grid {
        #[serde(default = "default_grid_edge")]
        edge: u32,
        #[serde(default = "default_grid_spacing")]
        spacing: f32,
    },
    Sphere {
        #[serde(default = "default_sphere_radius")]
        radius: f32,
    },
    Heart {
        #[serde(default = "default_heart_scale")]
        scale: f32,
    },
    /// Extruded text exported as glTF.
    Text {
        mesh: PathBuf,
        /// Only use the glTF mesh with this name.
        #[serde(default)]
        mesh_name: Option<String>,
        #[serde(default)]
        seed: Option<u64>,
    },
    /// LAS/LAZ point list, e.g. a scanned logo.
    Points {
        path: PathBuf,
        #[serde(default = "default_point_extent")]
        extent: f32,
    },
    Helix {
        #[serde(default = "default_helix_radius")]
        radius: f32,
        #[serde(default = "default_helix_height")]
        height: f32,
        #[serde(default = "default_helix_turns")]
        turns: f32,
    },
    Galaxy {
        #[serde(default = "default_galaxy_arms")]
        arms: u32,
        #[serde(default = "default_galaxy_radius")]
        radius: f32,
    },
    Wave {
        #[serde(default = "default_wave_spacing")]
        spacing: f32,
        #[serde(default = "default_wave_amplitude")]
        amplitude: f32,
    },
    Burst {
        #[serde(default = "default_burst_radius")]
        radius: f32,
    },
    Pyramid {
        #[serde(default = "default_pyramid_base")]
        base: u32,
        #[serde(default = "default_pyramid_spacing")]
        spacing: f32,
    },
    Torus {
        #[serde(default = "default_torus_major_radius")]
        major_radius: f32,
        #[serde(default = "default_torus_minor_radius")]
        minor_radius: f32,
    },
}

fn default_grid_edge() -> u32 {
    GRID_EDGE
}

fn default_grid_spacing() -> f32 {
    GRID_SPACING
}

fn default_sphere_radius() -> f32 {
    SPHERE_RADIUS
}

fn default_heart_scale() -> f32 {
    HEART_SCALE
}

fn default_point_extent() -> f32 {
    POINT_LIST_EXTENT
}

fn default_helix_radius() -> f32 {
    HELIX_RADIUS
}

fn default_helix_height() -> f32 {
    HELIX_HEIGHT
}

fn default_helix_turns() -> f32 {
    HELIX_TURNS
}

fn default_galaxy_arms() -> u32 {
    GALAXY_ARMS
}

fn default_galaxy_radius() -> f32 {
    GALAXY_RADIUS
}

fn default_wave_spacing() -> f32 {
    WAVE_SPACING
}

fn default_wave_amplitude() -> f32 {
    WAVE_AMPLITUDE
}

fn default_burst_radius() -> f32 {
    BURST_RADIUS
}

fn default_pyramid_base() -> u32 {
    PYRAMID_BASE
}

fn default_pyramid_spacing() -> f32 {
    PYRAMID_SPACING
}

fn default_torus_major_radius() -> f32 {
    TORUS_MAJOR_RADIUS
}

fn default_torus_minor_radius() -> f32 {
    TORUS_MINOR_RADIUS
}

impl FormationSpec {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grid { .. } => "grid",
            Self::Sphere { .. } => "sphere",
            Self::Heart { .. } => "heart",
            Self::Text { .. } => "text",
            Self::Points { .. } => "points",
            Self::Helix { .. } => "helix",
            Self::Galaxy { .. } => "galaxy",
            Self::Wave { .. } => "wave",
            Self::Burst { .. } => "burst",
            Self::Pyramid { .. } => "pyramid",
            Self::Torus { .. } => "torus",
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        match self {
            Self::Text { mesh: path, .. } | Self::Points { path, .. } if path.is_relative() => {
                *path = base.join(&*path);
            }
            _ => {}
        }
    }
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            name: "show".to_string(),
            drone_count: DEFAULT_DRONE_COUNT,
            seed: DEFAULT_SAMPLE_SEED,
            scale: SHOW_SCALE,
            cell_size: HASH_CELL_SIZE,
            safety_radius: SAFETY_RADIUS,
            timeline: Timeline::new(3),
            formations: vec![
                FormationSpec::Grid {
                    edge: GRID_EDGE,
                    spacing: GRID_SPACING,
                },
                FormationSpec::Sphere {
                    radius: SPHERE_RADIUS,
                },
                FormationSpec::Heart { scale: HEART_SCALE },
            ],
        }
    }
}

impl ShowConfig {
    /// Parse a show file. Relative source paths are resolved against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading show config {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("parsing show config {}", path.display()))?;
        let base = path.parent().unwrap_or(Path::new("."));
        for formation in &mut config.formations {
            formation.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Timeline with the formation count taken from the formation list.
    pub fn timeline(&self) -> Timeline {
        Timeline {
            formation_count: self.formations.len(),
            ..self.timeline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(ShowConfig::parse("").unwrap(), ShowConfig::default());
    }

    #[test]
    fn parses_formations_in_order() {
        let config = ShowConfig::parse(
            r#"
            name = "launch"
            drone_count = 1024

            [timeline]
            hold_duration = 2.0

            [[formations]]
            kind = "sphere"
            radius = 300.0

            [[formations]]
            kind = "grid"

            [[formations]]
            kind = "text"
            mesh = "hello.glb"
            "#,
        )
        .unwrap();
        assert_eq!(config.drone_count, 1024);
        assert_eq!(config.formations.len(), 3);
        assert_eq!(config.formations[0], FormationSpec::Sphere { radius: 300.0 });
        assert_eq!(
            config.formations[1],
            FormationSpec::Grid {
                edge: 16,
                spacing: 50.0
            }
        );
        let timeline = config.timeline();
        assert_eq!(timeline.formation_count, 3);
        assert_eq!(timeline.hold_duration, 2.0);
        assert_eq!(timeline.transition_duration, 5.0);
    }

    #[test]
    fn relative_sources_follow_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show.toml");
        fs::write(
            &path,
            "[[formations]]\nkind = \"points\"\npath = \"logo.laz\"\n",
        )
        .unwrap();
        let config = ShowConfig::load(&path).unwrap();
        assert_eq!(
            config.formations[0],
            FormationSpec::Points {
                path: dir.path().join("logo.laz"),
                extent: 800.0
            }
        );
    }

    #[test]
    fn animated_show_kinds_take_defaults() {
        let config = ShowConfig::parse(
            r#"
            [[formations]]
            kind = "helix"
            turns = 2.0

            [[formations]]
            kind = "galaxy"

            [[formations]]
            kind = "wave"
            amplitude = 60.0

            [[formations]]
            kind = "burst"

            [[formations]]
            kind = "pyramid"
            base = 10

            [[formations]]
            kind = "torus"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.formations,
            vec![
                FormationSpec::Helix {
                    radius: 160.0,
                    height: 800.0,
                    turns: 2.0
                },
                FormationSpec::Galaxy {
                    arms: 3,
                    radius: 450.0
                },
                FormationSpec::Wave {
                    spacing: 40.0,
                    amplitude: 60.0
                },
                FormationSpec::Burst { radius: 180.0 },
                FormationSpec::Pyramid {
                    base: 10,
                    spacing: 40.0
                },
                FormationSpec::Torus {
                    major_radius: 350.0,
                    minor_radius: 140.0
                },
            ]
        );
        let names: Vec<_> = config.formations.iter().map(FormationSpec::name).collect();
        assert_eq!(names, vec!["helix", "galaxy", "wave", "burst", "pyramid", "torus"]);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert!(ShowConfig::parse("[[formations]]\nkind = \"spiral\"\n").is_err());
    }
}
