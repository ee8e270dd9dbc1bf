use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Indexed triangle list, e.g. extruded text exported from a modelling tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Copy of the mesh translated so its bounding box is centred on the origin.
    pub fn centred(&self) -> TriangleMesh {
        let Some((min, max)) = self.bounds() else {
            return self.clone();
        };
        let centre = (min + max) * 0.5;
        TriangleMesh {
            positions: self.positions.iter().map(|p| *p - centre).collect(),
            indices: self.indices.clone(),
        }
    }
}

/// Area-weighted uniform sampling over the surface of a triangle mesh.
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    triangles: Vec<[Vec3; 3]>,
    cumulative_area: Vec<f32>,
    total_area: f32,
}

impl SurfaceSampler {
    pub fn new(mesh: &TriangleMesh) -> Result<Self, SourceError> {
        let vertex_count = mesh.positions.len();
        let mut triangles = Vec::with_capacity(mesh.triangle_count());
        for tri in mesh.indices.chunks_exact(3) {
            let mut corners = [Vec3::ZERO; 3];
            for (corner, &index) in corners.iter_mut().zip(tri) {
                *corner = *mesh
                    .positions
                    .get(index as usize)
                    .ok_or(SourceError::IndexOutOfRange {
                        index,
                        vertex_count,
                    })?;
            }
            triangles.push(corners);
        }
        if triangles.is_empty() {
            return Err(SourceError::NoTriangles);
        }

        let mut total_area = 0.0;
        let cumulative_area = triangles
            .iter()
            .map(|[a, b, c]| {
                total_area += triangle_area(*a, *b, *c);
                total_area
            })
            .collect();

        if total_area <= 0.0 || !total_area.is_finite() {
            return Err(SourceError::ZeroArea);
        }

        Ok(Self {
            triangles,
            cumulative_area,
            total_area,
        })
    }

    pub fn total_area(&self) -> f32 {
        self.total_area
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let pick = rng.r#gen::<f32>() * self.total_area;
        let index = self
            .cumulative_area
            .partition_point(|&area| area <= pick)
            .min(self.triangles.len() - 1);
        let [a, b, c] = self.triangles[index];

        let mut u = rng.r#gen::<f32>();
        let mut v = rng.r#gen::<f32>();
        // fold the far half of the parallelogram back into the triangle
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        a + (b - a) * u + (c - a) * v
    }
}

fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    (b - a).cross(c - a).length() * 0.5
}
