use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;

use crate::engine::assets::show_manifest::ShowManifestAsset;

/// Storage textures written by the compute passes each frame.
#[derive(Debug, Clone)]
pub struct ChoreographyTargets {
    /// Ping-pong pair: current and previous drone positions (xyz + opacity).
    pub position: [Handle<Image>; 2],
    /// Blended light colour of each drone.
    pub colour: Handle<Image>,
    /// Ping-pong pair of `(hash, id)` sort keys.
    pub sort: [Handle<Image>; 2],
    /// Drone id → index in the sorted key list.
    pub rank: Handle<Image>,
}

#[derive(Resource, Debug, Clone, Default, ExtractResource)]
pub struct DroneShowAssets {
    pub manifest: Option<Handle<ShowManifestAsset>>,
    /// Baked formation textures in show order.
    pub formation_positions: Vec<Handle<Image>>,
    pub formation_colours: Vec<Handle<Image>>,
    pub drone_model: Option<Handle<Gltf>>,
    pub targets: Option<ChoreographyTargets>,
}

impl DroneShowAssets {
    pub fn formation_textures(&self) -> impl Iterator<Item = &Handle<Image>> {
        self.formation_positions
            .iter()
            .chain(self.formation_colours.iter())
    }
}
