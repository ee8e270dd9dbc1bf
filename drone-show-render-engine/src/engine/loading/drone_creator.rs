use bevy::asset::LoadState;
use bevy::gltf::{Gltf, GltfMesh};
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;

use crate::constants::path::{BODY_MESH_NAME, LIGHT_MESH_NAME};
use crate::constants::render_settings::DroneLightingSettings;
use crate::engine::assets::drone_show_assets::DroneShowAssets;
use crate::engine::assets::show_manifest::ShowPipeline;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::render::instanced_drone_plugin::{DroneInstance, DroneInstances, DronePart};

pub fn create_drones_when_ready(
    mut loading_progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    assets: Res<DroneShowAssets>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    gltf_meshes: Res<Assets<GltfMesh>>,
    pipeline: Option<Res<ShowPipeline>>,
    lighting: Res<DroneLightingSettings>,
) {
    if loading_progress.drones_created
        || !loading_progress.textures_configured
        || loading_progress.failed
    {
        return;
    }
    let (Some(pipeline), Some(model)) = (pipeline, assets.drone_model.as_ref()) else {
        return;
    };

    let gltf = match asset_server.get_load_state(model) {
        Some(LoadState::Loaded) => gltfs.get(model),
        Some(LoadState::Failed(err)) => {
            warn!("Drone model unavailable ({err}), using primitive meshes");
            None
        }
        // still loading
        _ => return,
    };

    let instances = (0..pipeline.drone_count() as u32)
        .map(|id| DroneInstance {
            id,
            scale: lighting.model_scale,
        })
        .collect::<Vec<_>>();

    for part in [DronePart::Light, DronePart::Body] {
        let mesh = gltf
            .and_then(|gltf| named_mesh(gltf, &gltf_meshes, &meshes, part_mesh_name(part)))
            .unwrap_or_else(|| {
                warn!("No '{}' mesh in the drone model, using a fallback", part_mesh_name(part));
                fallback_mesh(part)
            });

        commands.spawn((
            Mesh3d(meshes.add(mesh)),
            Transform::IDENTITY,
            Visibility::Visible,
            part,
            DroneInstances(instances.clone()),
            // Drones move on the GPU, CPU bounds are meaningless
            NoFrustumCulling,
        ));
    }

    info!("✓ Spawned light and body instances for {} drones", instances.len());
    loading_progress.drones_created = true;
}

fn part_mesh_name(part: DronePart) -> &'static str {
    match part {
        DronePart::Light => LIGHT_MESH_NAME,
        DronePart::Body => BODY_MESH_NAME,
    }
}

/// First triangle primitive of a named glTF mesh, with normals.
fn named_mesh(
    gltf: &Gltf,
    gltf_meshes: &Assets<GltfMesh>,
    meshes: &Assets<Mesh>,
    name: &str,
) -> Option<Mesh> {
    let gltf_mesh = gltf_meshes.get(gltf.named_meshes.get(name)?)?;
    let primitive = gltf_mesh.primitives.first()?;
    let mut mesh = meshes.get(&primitive.mesh)?.clone();
    if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
        return None;
    }
    if mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_none() {
        mesh.compute_normals();
    }
    Some(mesh)
}

pub fn fallback_mesh(part: DronePart) -> Mesh {
    match part {
        DronePart::Light => Sphere::new(2.0).mesh().uv(16, 8),
        DronePart::Body => Cuboid::new(4.0, 1.0, 4.0).mesh().build(),
    }
}
