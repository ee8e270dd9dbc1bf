/// glTF triangle meshes for text formations.
use anyhow::{Context, Result, bail};
use choreography::sampler::TriangleMesh;
use glam::Vec3;
use gltf::mesh::Mode;
use log::{debug, info};
use std::path::Path;

/// Merge every triangle primitive of the file (or of the mesh called `mesh_name`).
pub fn load_text_mesh(path: &Path, mesh_name: Option<&str>) -> Result<TriangleMesh> {
    let (document, buffers, _) =
        gltf::import(path).with_context(|| format!("importing glTF {}", path.display()))?;

    let mut positions: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for mesh in document.meshes() {
        if mesh_name.is_some_and(|name| mesh.name() != Some(name)) {
            continue;
        }
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                debug!("Skipping non-triangle primitive in {:?}", mesh.name());
                continue;
            }
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));
            let Some(primitive_positions) = reader.read_positions() else {
                continue;
            };
            let base = positions.len() as u32;
            positions.extend(primitive_positions.map(Vec3::from_array));
            let vertex_count = positions.len() as u32 - base;
            match reader.read_indices() {
                Some(read) => indices.extend(read.into_u32().map(|i| base + i)),
                None => indices.extend(base..base + vertex_count),
            }
        }
    }

    if indices.is_empty() {
        match mesh_name {
            Some(name) => bail!("no triangles in mesh '{}' of {}", name, path.display()),
            None => bail!("no triangles in {}", path.display()),
        }
    }

    info!(
        "Loaded text mesh {}: {} vertices, {} triangles",
        path.display(),
        positions.len(),
        indices.len() / 3
    );
    Ok(TriangleMesh::new(positions, indices))
}
