use std::f32::consts::{PI, TAU};

use constants::formation::{
    BURST_CENTRES, BURST_RADIUS, DRONE_LIGHTNESS, DRONE_SATURATION, FORMATION_BURST,
    FORMATION_GALAXY, FORMATION_GRID, FORMATION_HEART, FORMATION_HELIX, FORMATION_POINTS,
    FORMATION_PYRAMID, FORMATION_SPHERE, FORMATION_TEXT, FORMATION_TORUS, FORMATION_WAVE,
    GALAXY_ARMS, GALAXY_RADIUS, GALAXY_TIGHTNESS, GRID_EDGE, GRID_SPACING, HEART_SCALE,
    HELIX_HEIGHT, HELIX_RADIUS, HELIX_RUNG_SPACING, HELIX_TURNS, PYRAMID_BASE, PYRAMID_SPACING,
    SPHERE_RADIUS, TORUS_MAJOR_RADIUS, TORUS_MINOR_RADIUS, TORUS_WINDINGS,
    UNUSED_SLOT_POSITION, WAVE_AMPLITUDE, WAVE_SPACING,
};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::noise::hash_noise;
use crate::sampler::{SurfaceSampler, TriangleMesh};

/// Target of one drone in one formation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormationSlot {
    pub position: Vec3,
    /// Linear RGB plus opacity. Opacity 0 marks a slot no drone occupies.
    pub colour: [f32; 4],
}

impl FormationSlot {
    pub fn used(id: usize, position: Vec3) -> Self {
        Self {
            position,
            colour: drone_colour(id),
        }
    }

    pub fn unused() -> Self {
        Self {
            position: Vec3::from_array(UNUSED_SLOT_POSITION),
            colour: [0.0; 4],
        }
    }

    pub fn is_used(&self) -> bool {
        self.colour[3] > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormationKind {
    /// Cube of `edge³` drones, centred on the origin.
    Grid { edge: u32, spacing: f32 },
    /// Fibonacci lattice on a sphere.
    Sphere { radius: f32 },
    /// Parametric heart curve in the XY plane.
    Heart { scale: f32 },
    /// Random points on the surface of a text mesh.
    Text { mesh: TriangleMesh, seed: u64 },
    /// Explicit point list, cycled when there are more drones than points.
    Points { points: Vec<Vec3> },
    /// Two strands winding around the Y axis, joined by rungs.
    Helix { radius: f32, height: f32, turns: f32 },
    /// Spiral arms in the XZ plane with a gentle vertical ripple.
    Galaxy { arms: u32, radius: f32 },
    /// Square sheet displaced by interfering sine waves, frozen at its first frame.
    Wave { spacing: f32, amplitude: f32 },
    /// Five firework shells at full spread.
    Burst { radius: f32 },
    /// Square layers, each two drones narrower than the one below.
    Pyramid { base: u32, spacing: f32 },
    /// Drones wound around a ring-shaped tube.
    Torus { major_radius: f32, minor_radius: f32 },
}

impl FormationKind {
    pub fn default_grid() -> Self {
        Self::Grid {
            edge: GRID_EDGE,
            spacing: GRID_SPACING,
        }
    }

    pub fn default_sphere() -> Self {
        Self::Sphere {
            radius: SPHERE_RADIUS,
        }
    }

    pub fn default_heart() -> Self {
        Self::Heart { scale: HEART_SCALE }
    }

    pub fn default_helix() -> Self {
        Self::Helix {
            radius: HELIX_RADIUS,
            height: HELIX_HEIGHT,
            turns: HELIX_TURNS,
        }
    }

    pub fn default_galaxy() -> Self {
        Self::Galaxy {
            arms: GALAXY_ARMS,
            radius: GALAXY_RADIUS,
        }
    }

    pub fn default_wave() -> Self {
        Self::Wave {
            spacing: WAVE_SPACING,
            amplitude: WAVE_AMPLITUDE,
        }
    }

    pub fn default_burst() -> Self {
        Self::Burst {
            radius: BURST_RADIUS,
        }
    }

    pub fn default_pyramid() -> Self {
        Self::Pyramid {
            base: PYRAMID_BASE,
            spacing: PYRAMID_SPACING,
        }
    }

    pub fn default_torus() -> Self {
        Self::Torus {
            major_radius: TORUS_MAJOR_RADIUS,
            minor_radius: TORUS_MINOR_RADIUS,
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            Self::Grid { .. } => FORMATION_GRID,
            Self::Sphere { .. } => FORMATION_SPHERE,
            Self::Text { .. } => FORMATION_TEXT,
            Self::Heart { .. } => FORMATION_HEART,
            Self::Points { .. } => FORMATION_POINTS,
            Self::Helix { .. } => FORMATION_HELIX,
            Self::Galaxy { .. } => FORMATION_GALAXY,
            Self::Wave { .. } => FORMATION_WAVE,
            Self::Burst { .. } => FORMATION_BURST,
            Self::Pyramid { .. } => FORMATION_PYRAMID,
            Self::Torus { .. } => FORMATION_TORUS,
        }
    }
}

/// Produce exactly `count` slots for the formation. Same inputs give the same output.
pub fn generate(kind: &FormationKind, count: usize) -> Result<Vec<FormationSlot>, SourceError> {
    let slots = match kind {
        FormationKind::Grid { edge, spacing } => (0..count)
            .map(|i| match grid_position(i, *edge, *spacing) {
                Some(p) => FormationSlot::used(i, p),
                None => FormationSlot::unused(),
            })
            .collect(),
        FormationKind::Sphere { radius } => (0..count)
            .map(|i| FormationSlot::used(i, sphere_position(i, count, *radius)))
            .collect(),
        FormationKind::Heart { scale } => (0..count)
            .map(|i| FormationSlot::used(i, heart_position(i, count, *scale)))
            .collect(),
        FormationKind::Text { mesh, seed } => {
            let sampler = SurfaceSampler::new(&mesh.centred())?;
            let mut rng = ChaCha8Rng::seed_from_u64(*seed);
            (0..count)
                .map(|i| FormationSlot::used(i, sampler.sample(&mut rng)))
                .collect()
        }
        FormationKind::Points { points } => (0..count)
            .map(|i| match points.get(i % points.len().max(1)) {
                Some(p) if p.is_finite() => FormationSlot::used(i, *p),
                _ => FormationSlot::unused(),
            })
            .collect(),
        FormationKind::Helix {
            radius,
            height,
            turns,
        } => (0..count)
            .map(|i| FormationSlot::used(i, helix_position(i, count, *radius, *height, *turns)))
            .collect(),
        FormationKind::Galaxy { arms, radius } => (0..count)
            .map(|i| FormationSlot::used(i, galaxy_position(i, count, *arms, *radius)))
            .collect(),
        FormationKind::Wave { spacing, amplitude } => (0..count)
            .map(|i| FormationSlot::used(i, wave_position(i, count, *spacing, *amplitude)))
            .collect(),
        FormationKind::Burst { radius } => (0..count)
            .map(|i| FormationSlot::used(i, burst_position(i, *radius)))
            .collect(),
        FormationKind::Pyramid { base, spacing } => (0..count)
            .map(|i| match pyramid_position(i, *base, *spacing) {
                Some(p) => FormationSlot::used(i, p),
                None => FormationSlot::unused(),
            })
            .collect(),
        FormationKind::Torus {
            major_radius,
            minor_radius,
        } => (0..count)
            .map(|i| FormationSlot::used(i, torus_position(i, count, *major_radius, *minor_radius)))
            .collect(),
    };
    Ok(slots)
}

/// `(layer, row, col)` of a drone in an `edge³` cube.
pub fn grid_cell(index: usize, edge: u32) -> (usize, usize, usize) {
    let edge = edge.max(1) as usize;
    let layer_size = edge.saturating_mul(edge);
    (index / layer_size, (index % layer_size) / edge, index % edge)
}

fn grid_position(index: usize, edge: u32, spacing: f32) -> Option<Vec3> {
    // a cube too large to count holds every addressable index
    let fits = (edge as usize)
        .checked_pow(3)
        .is_none_or(|cells| index < cells);
    if !fits {
        return None;
    }
    let (layer, row, col) = grid_cell(index, edge);
    let half = (edge as f32 - 1.0) / 2.0;
    Some(Vec3::new(col as f32 - half, row as f32 - half, layer as f32 - half) * spacing)
}

fn sphere_position(index: usize, count: usize, radius: f32) -> Vec3 {
    if count <= 1 {
        return Vec3::new(0.0, radius, 0.0);
    }
    let golden_angle = PI * (3.0 - 5f32.sqrt());
    let y = 1.0 - 2.0 * index as f32 / (count - 1) as f32;
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = index as f32 * golden_angle;
    Vec3::new(theta.cos() * ring, y, theta.sin() * ring) * radius
}

fn heart_position(index: usize, count: usize, scale: f32) -> Vec3 {
    let t = 2.0 * PI * index as f32 / count.max(1) as f32;
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    Vec3::new(x, y, 0.0) * scale
}

/// Even ids ride the first strand, odd ids the second. Every
/// `HELIX_RUNG_SPACING` steps one pair moves onto the rung between them.
fn helix_position(index: usize, count: usize, radius: f32, height: f32, turns: f32) -> Vec3 {
    let per_strand = count.div_ceil(2).max(1);
    let strand = index % 2;
    let step = index / 2;
    let t = step as f32 / per_strand as f32;
    let y = (t - 0.5) * height;
    let angle = t * turns * TAU;
    let on_strand = |a: f32| Vec3::new(a.cos() * radius, y, a.sin() * radius);

    let mut across = if step % HELIX_RUNG_SPACING == 1 { 1.0 / 3.0 } else { 0.0 };
    if strand == 1 {
        across = 1.0 - across;
    }
    on_strand(angle).lerp(on_strand(angle + PI), across)
}

fn galaxy_position(index: usize, count: usize, arms: u32, radius: f32) -> Vec3 {
    let arms = arms.max(1) as usize;
    let arm = index % arms;
    let reach = (index / arms) as f32 / (count as f32 / arms as f32).max(1.0);
    let distance = reach * radius;
    let angle = arm as f32 / arms as f32 * TAU + reach * GALAXY_TIGHTNESS * TAU;

    let jitter = hash_noise(index as f32) * radius / 45.0;
    let phase = index as f32 * 0.1;
    Vec3::new(
        distance * angle.cos() + phase.sin() * jitter,
        (reach * 6.0).sin() * radius / 15.0,
        distance * angle.sin() + phase.cos() * jitter,
    )
}

fn wave_position(index: usize, count: usize, spacing: f32, amplitude: f32) -> Vec3 {
    let side = ((count as f64).sqrt().ceil() as usize).max(1);
    let half = (side as f32 - 1.0) / 2.0;
    let x = ((index % side) as f32 - half) * spacing;
    let z = ((index / side) as f32 - half) * spacing;

    // about one crest per twenty drones along each axis
    let k = if spacing != 0.0 { 0.4 / spacing } else { 0.0 };
    let radial = (x * x + z * z).sqrt();
    let y = (x * k).sin() * amplitude
        + (z * k).sin() * amplitude * 0.7
        + (radial * k * 0.5).sin() * amplitude * 0.5
        + (x * k * 2.0).sin() * (z * k * 2.0).sin() * amplitude * 0.3
        + ((x + z) * k * 0.5).sin() * amplitude * 0.25;
    Vec3::new(x, y, z)
}

/// Shells share ids round-robin. Each spark gets a noise direction and reach,
/// and drops a little as it burns out.
fn burst_position(index: usize, radius: f32) -> Vec3 {
    let centre = Vec3::from_array(BURST_CENTRES[index % BURST_CENTRES.len()]) * radius;
    let id = index as f32;
    let phi = hash_noise(id + 100.0) * PI;
    let theta = hash_noise(id + 200.0) * TAU;
    let direction = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
    let reach = radius * (0.5 + hash_noise(id + 300.0) * 0.5);
    centre + direction * reach - Vec3::Y * radius * BURST_DROOP
}

const BURST_DROOP: f32 = 0.4;

/// `None` once every layer up to the apex is full.
fn pyramid_position(index: usize, base: u32, spacing: f32) -> Option<Vec3> {
    let base = u64::from(base.max(1));
    let layers = base.div_ceil(2);
    let mut remaining = index as u64;
    let mut layer = 0;
    let mut side = base;
    while remaining >= side * side {
        remaining -= side * side;
        layer += 1;
        if layer >= layers {
            return None;
        }
        side -= 2;
    }
    let half = (side as f32 - 1.0) / 2.0;
    let centre = (layers as f32 - 1.0) / 2.0;
    Some(Vec3::new(
        ((remaining % side) as f32 - half) * spacing,
        (layer as f32 - centre) * spacing,
        ((remaining / side) as f32 - half) * spacing,
    ))
}

fn torus_position(index: usize, count: usize, major_radius: f32, minor_radius: f32) -> Vec3 {
    let t = index as f32 / count.max(1) as f32;
    let ring = t * TAU;
    let tube = t * TORUS_WINDINGS * TAU;
    let reach = major_radius + minor_radius * tube.cos();
    Vec3::new(reach * ring.cos(), minor_radius * tube.sin(), reach * ring.sin())
}

/// Light colour of a drone: hue from its id, fixed saturation and lightness.
pub fn drone_colour(id: usize) -> [f32; 4] {
    let hue = hash_noise(id as f32);
    let [r, g, b] = hsl_to_rgb(hue, DRONE_SATURATION, DRONE_LIGHTNESS);
    [r, g, b, 1.0]
}

pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    if saturation <= 0.0 {
        return [lightness; 3];
    }
    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;
    [
        hue_channel(p, q, hue + 1.0 / 3.0),
        hue_channel(p, q, hue),
        hue_channel(p, q, hue - 1.0 / 3.0),
    ]
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    fn kinds() -> Vec<FormationKind> {
        let mesh = TriangleMesh::new(
            vec![Vec3::ZERO, Vec3::new(30.0, 0.0, 0.0), Vec3::new(0.0, 20.0, 5.0)],
            vec![0, 1, 2],
        );
        vec![
            FormationKind::default_grid(),
            FormationKind::default_sphere(),
            FormationKind::default_heart(),
            FormationKind::Text { mesh, seed: 11 },
            FormationKind::Points {
                points: vec![Vec3::ONE, Vec3::NEG_ONE],
            },
            FormationKind::default_helix(),
            FormationKind::default_galaxy(),
            FormationKind::default_wave(),
            FormationKind::default_burst(),
            FormationKind::default_pyramid(),
            FormationKind::default_torus(),
        ]
    }

    #[test]
    fn grid_corners_for_full_cube() {
        let slots = generate(&FormationKind::default_grid(), 4096).unwrap();
        assert_eq!(slots[0].position, Vec3::splat(-375.0));
        assert_eq!(slots[4095].position, Vec3::splat(375.0));
        assert!(slots.iter().all(FormationSlot::is_used));
    }

    #[test]
    fn grid_overflow_slots_are_parked() {
        let kind = FormationKind::Grid {
            edge: 2,
            spacing: 10.0,
        };
        let slots = generate(&kind, 10).unwrap();
        assert!(slots[..8].iter().all(FormationSlot::is_used));
        for slot in &slots[8..] {
            assert_eq!(*slot, FormationSlot::unused());
        }
    }

    #[test]
    fn huge_grid_edge_keeps_every_slot() {
        let kind = FormationKind::Grid {
            edge: 3_000_000,
            spacing: 1.0,
        };
        let slots = generate(&kind, 4).unwrap();
        assert!(slots.iter().all(|s| s.is_used() && s.position.is_finite()));
        assert_eq!(slots[1].position - slots[0].position, Vec3::X);
    }

    #[test_case(0, (0, 0, 0))]
    #[test_case(17, (0, 1, 1))]
    #[test_case(256, (1, 0, 0))]
    #[test_case(4095, (15, 15, 15))]
    fn grid_cell_layout(index: usize, expected: (usize, usize, usize)) {
        assert_eq!(grid_cell(index, 16), expected);
    }

    #[test]
    fn sphere_points_lie_on_radius() {
        let slots = generate(&FormationKind::Sphere { radius: 400.0 }, 100).unwrap();
        for slot in slots {
            assert!((slot.position.length() - 400.0).abs() < 1e-2);
        }
    }

    #[test]
    fn single_drone_sphere_is_finite() {
        let slots = generate(&FormationKind::Sphere { radius: 5.0 }, 1).unwrap();
        assert_eq!(slots[0].position, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn heart_starts_at_its_top_notch() {
        let slots = generate(&FormationKind::Heart { scale: 1.0 }, 8).unwrap();
        assert_eq!(slots[0].position, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn points_cycle_and_empty_lists_park_everything() {
        let kind = FormationKind::Points {
            points: vec![Vec3::X, Vec3::Y, Vec3::Z],
        };
        let slots = generate(&kind, 7).unwrap();
        assert_eq!(slots[3].position, Vec3::X);
        assert_eq!(slots[6].position, Vec3::X);
        assert_eq!(slots[5].position, Vec3::Z);

        let empty = generate(&FormationKind::Points { points: vec![] }, 4).unwrap();
        assert!(empty.iter().all(|s| !s.is_used()));
    }

    #[test]
    fn text_without_triangles_is_rejected() {
        let kind = FormationKind::Text {
            mesh: TriangleMesh::new(vec![], vec![]),
            seed: 0,
        };
        assert_eq!(generate(&kind, 4).unwrap_err(), SourceError::NoTriangles);
    }

    #[test]
    fn empty_show_gives_empty_formations() {
        for kind in kinds() {
            assert!(generate(&kind, 0).unwrap().is_empty());
        }
    }

    #[test]
    fn helix_strands_face_each_other() {
        let slots = generate(&FormationKind::default_helix(), 1024).unwrap();
        let (a, b) = (slots[0].position, slots[1].position);
        assert!((a.x + b.x).abs() < 1e-3 && (a.z + b.z).abs() < 1e-3);
        assert_eq!(a.y, b.y);
        assert!((a.x - HELIX_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn helix_rungs_cross_between_strands() {
        let slots = generate(&FormationKind::default_helix(), 1024).unwrap();
        // step 1 of each strand is a rung
        let (a, b) = (slots[2].position, slots[3].position);
        assert!(a.distance(b) > 1.0);
        for rung in [a, b] {
            assert!(Vec3::new(rung.x, 0.0, rung.z).length() < HELIX_RADIUS - 1.0);
        }
    }

    #[test]
    fn galaxy_stays_inside_its_disc() {
        let slots = generate(&FormationKind::default_galaxy(), 900).unwrap();
        let bound = GALAXY_RADIUS * (1.0 + 1.0 / 45.0) + 1e-3;
        for slot in &slots {
            assert!(Vec3::new(slot.position.x, 0.0, slot.position.z).length() <= bound);
            assert!(slot.position.y.abs() <= GALAXY_RADIUS / 15.0 + 1e-3);
        }
        // every arm starts at the core
        for slot in &slots[..3] {
            assert!(slot.position.length() <= GALAXY_RADIUS / 45.0 + 1e-3);
        }
    }

    #[test]
    fn wave_sheet_is_centred_and_bounded() {
        let slots = generate(&FormationKind::default_wave(), 400).unwrap();
        let sum: Vec3 = slots.iter().map(|s| s.position).sum();
        assert!(sum.x.abs() < 1e-2 && sum.z.abs() < 1e-2);
        assert_eq!(slots[1].position.x - slots[0].position.x, WAVE_SPACING);
        assert!(slots.iter().all(|s| s.position.y.abs() <= WAVE_AMPLITUDE * 2.75 + 1e-3));
    }

    #[test]
    fn burst_sparks_surround_their_shell() {
        let slots = generate(&FormationKind::default_burst(), 500).unwrap();
        for (i, slot) in slots.iter().enumerate() {
            let centre = Vec3::from_array(BURST_CENTRES[i % 5]) * BURST_RADIUS;
            let spread = slot.position + Vec3::Y * BURST_RADIUS * BURST_DROOP - centre;
            assert!(spread.length() >= BURST_RADIUS * 0.5 - 1e-2);
            assert!(spread.length() <= BURST_RADIUS + 1e-2);
        }
    }

    #[test]
    fn pyramid_layers_shrink_towards_the_apex() {
        let kind = FormationKind::Pyramid {
            base: 4,
            spacing: 10.0,
        };
        // 16 drones in the base, 4 in the apex, then nothing
        let slots = generate(&kind, 22).unwrap();
        assert!(slots[..20].iter().all(FormationSlot::is_used));
        assert!(slots[20..].iter().all(|s| !s.is_used()));
        assert_eq!(slots[0].position, Vec3::new(-15.0, -5.0, -15.0));
        assert_eq!(slots[16].position, Vec3::new(-5.0, 5.0, -5.0));
        assert_eq!(slots[19].position, Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn odd_pyramid_ends_in_a_single_drone() {
        let kind = FormationKind::Pyramid {
            base: 3,
            spacing: 1.0,
        };
        let slots = generate(&kind, 11).unwrap();
        assert_eq!(slots[9].position, Vec3::new(0.0, 0.5, 0.0));
        assert!(!slots[10].is_used());
    }

    #[test]
    fn torus_points_lie_on_the_tube() {
        let slots = generate(&FormationKind::default_torus(), 700).unwrap();
        for slot in &slots {
            let p = slot.position;
            let ring = Vec3::new(p.x, 0.0, p.z).normalize() * TORUS_MAJOR_RADIUS;
            assert!(((p - ring).length() - TORUS_MINOR_RADIUS).abs() < 1e-2);
        }
    }

    #[test]
    fn every_kind_has_its_own_id() {
        let mut ids: Vec<u8> = kinds().iter().map(FormationKind::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), kinds().len());
    }

    #[test]
    fn hsl_primaries() {
        let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5);
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
        assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
        assert_eq!(hsl_to_rgb(0.5, 0.0, 0.25), [0.25; 3]);
    }

    proptest! {
        #[test]
        fn every_formation_is_finite_and_deterministic(count in 0usize..600) {
            for kind in kinds() {
                let first = generate(&kind, count).unwrap();
                prop_assert_eq!(first.len(), count);
                prop_assert!(first.iter().all(|s| s.position.is_finite()));
                prop_assert!(first.iter().all(|s| s.colour.iter().all(|c| c.is_finite())));
                prop_assert_eq!(first, generate(&kind, count).unwrap());
            }
        }
    }
}
