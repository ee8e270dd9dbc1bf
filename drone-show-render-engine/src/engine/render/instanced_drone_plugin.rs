use bevy::{
    core_pipeline::core_3d::Transparent3d,
    ecs::system::{SystemParamItem, lifetimeless::*},
    pbr::{
        MeshPipeline, MeshPipelineKey, RenderMeshInstances, SetMeshBindGroup, SetMeshViewBindGroup,
    },
    prelude::*,
    render::{
        Render, RenderApp, RenderSet,
        extract_component::{ExtractComponent, ExtractComponentPlugin},
        mesh::{
            MeshVertexBufferLayoutRef, RenderMesh, RenderMeshBufferInfo, allocator::MeshAllocator,
        },
        render_asset::RenderAssets,
        render_phase::{
            AddRenderCommand, DrawFunctions, PhaseItem, PhaseItemExtraIndex, RenderCommand,
            RenderCommandResult, SetItemPipeline, TrackedRenderPass, ViewSortedRenderPhases,
        },
        render_resource::*,
        renderer::{RenderDevice, RenderQueue},
        sync_world::MainEntity,
        texture::GpuImage,
        view::ExtractedView,
    },
};
use bytemuck::{Pod, Zeroable};

use crate::constants::path::DRONE_INSTANCED_SHADER;
use crate::constants::render_settings::{DroneLightingSettings, SeparationSettings};
use crate::engine::assets::show_manifest::ShowPipeline;
use crate::engine::compute::choreography_compute::ChoreographyComputeState;
use crate::engine::systems::show_clock::ShowFrame;

/// Instance attribute locations, above the mesh attributes of the mesh pipeline.
const INSTANCE_ID_LOCATION: u32 = 8;
const INSTANCE_SCALE_LOCATION: u32 = 9;

pub struct InstancedDronePlugin;

impl Plugin for InstancedDronePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ExtractComponentPlugin::<DroneInstances>::default(),
            ExtractComponentPlugin::<DronePart>::default(),
        ));

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .add_render_command::<Transparent3d, DrawDrones>()
            .init_resource::<SpecializedMeshPipelines<DronePipeline>>()
            .init_resource::<PreparedDroneBindGroup>()
            .add_systems(
                Render,
                (
                    prepare_instance_buffers.in_set(RenderSet::PrepareResources),
                    prepare_drone_bind_group.in_set(RenderSet::PrepareBindGroups),
                    queue_drones.in_set(RenderSet::QueueMeshes),
                ),
            );
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };
        render_app.init_resource::<DronePipeline>();
    }
}

/// Which half of the drone model an entity draws.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash, ExtractComponent)]
pub enum DronePart {
    /// Emissive LED, pulsing with the heartbeat.
    Light,
    /// Dark plastic frame lit by the sun.
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct DroneInstance {
    /// Texel index into the compute textures.
    pub id: u32,
    pub scale: f32,
}

#[derive(Component, Deref, Clone, ExtractComponent)]
pub struct DroneInstances(pub Vec<DroneInstance>);

#[derive(Component)]
pub struct DroneInstanceBuffer {
    pub buffer: Buffer,
    pub length: usize,
}

/// Uniform block of the drone shader (group 2, binding 5).
#[derive(Clone, Copy, Debug, Default, ShaderType)]
pub struct DroneRenderUniform {
    pub separation: SeparationSettings,
    pub lighting: DroneLightingSettings,
    pub width: u32,
    pub drone_count: u32,
    pub time: f32,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DronePipelineKey {
    pub mesh_key: MeshPipelineKey,
    pub part: DronePart,
}

#[derive(Resource)]
pub struct DronePipeline {
    shader: Handle<Shader>,
    mesh_pipeline: MeshPipeline,
    material_bind_group_layout: BindGroupLayout,
}

impl FromWorld for DronePipeline {
    fn from_world(world: &mut World) -> Self {
        let mesh_pipeline = world.resource::<MeshPipeline>().clone();
        let render_device = world.resource::<RenderDevice>();
        let material_bind_group_layout = create_drone_bind_group_layout(render_device);

        Self {
            shader: world.load_asset(DRONE_INSTANCED_SHADER),
            mesh_pipeline,
            material_bind_group_layout,
        }
    }
}

pub fn instance_buffer_layout() -> VertexBufferLayout {
    VertexBufferLayout {
        array_stride: std::mem::size_of::<DroneInstance>() as u64,
        step_mode: VertexStepMode::Instance,
        attributes: vec![
            VertexAttribute {
                format: VertexFormat::Uint32,
                offset: 0,
                shader_location: INSTANCE_ID_LOCATION,
            },
            VertexAttribute {
                format: VertexFormat::Float32,
                offset: 4,
                shader_location: INSTANCE_SCALE_LOCATION,
            },
        ],
    }
}

impl SpecializedMeshPipeline for DronePipeline {
    type Key = DronePipelineKey;

    fn specialize(
        &self,
        key: Self::Key,
        layout: &MeshVertexBufferLayoutRef,
    ) -> Result<RenderPipelineDescriptor, SpecializedMeshPipelineError> {
        let mut descriptor = self.mesh_pipeline.specialize(key.mesh_key, layout)?;
        descriptor.label = Some(
            match key.part {
                DronePart::Light => "drone_light_pipeline",
                DronePart::Body => "drone_body_pipeline",
            }
            .into(),
        );

        let part_defs: Vec<ShaderDefVal> = match key.part {
            DronePart::Light => vec!["DRONE_LIGHT".into()],
            DronePart::Body => vec![],
        };

        descriptor.vertex.shader = self.shader.clone();
        descriptor.vertex.shader_defs.extend(part_defs.iter().cloned());
        descriptor.vertex.buffers.push(instance_buffer_layout());

        if let Some(fragment) = descriptor.fragment.as_mut() {
            fragment.shader = self.shader.clone();
            fragment.shader_defs.extend(part_defs);
        }

        descriptor
            .layout
            .push(self.material_bind_group_layout.clone());

        Ok(descriptor)
    }
}

#[derive(Resource)]
struct PreparedDroneBindGroup {
    uniform: UniformBuffer<DroneRenderUniform>,
    bind_group: Option<BindGroup>,
}

impl Default for PreparedDroneBindGroup {
    fn default() -> Self {
        let mut uniform = UniformBuffer::<DroneRenderUniform>::default();
        uniform.set_label(Some("drone_render_uniform"));
        Self {
            uniform,
            bind_group: None,
        }
    }
}

fn prepare_instance_buffers(
    mut commands: Commands,
    query: Query<(Entity, &DroneInstances), Without<DroneInstanceBuffer>>,
    render_device: Res<RenderDevice>,
) {
    for (entity, instances) in &query {
        let buffer = render_device.create_buffer_with_data(&BufferInitDescriptor {
            label: Some("drone_instance_buffer"),
            contents: bytemuck::cast_slice(instances.as_slice()),
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        });
        commands.entity(entity).insert(DroneInstanceBuffer {
            buffer,
            length: instances.len(),
        });
    }
}

/// Bind the textures written by this frame's compute dispatch.
fn prepare_drone_bind_group(
    mut prepared: ResMut<PreparedDroneBindGroup>,
    render_device: Res<RenderDevice>,
    render_queue: Res<RenderQueue>,
    gpu_images: Res<RenderAssets<GpuImage>>,
    compute_state: Res<ChoreographyComputeState>,
    pipeline: Res<DronePipeline>,
    show_pipeline: Option<Res<ShowPipeline>>,
    frame: Res<ShowFrame>,
    separation: Res<SeparationSettings>,
    lighting: Res<DroneLightingSettings>,
) {
    let (Some(show_pipeline), Some(textures)) = (show_pipeline, compute_state.textures()) else {
        return;
    };
    let (Some(current), Some(previous), Some(colour), Some(sorted), Some(rank)) = (
        gpu_images.get(textures.position.read()),
        gpu_images.get(textures.position.write()),
        gpu_images.get(&textures.colour),
        gpu_images.get(textures.sort.read()),
        gpu_images.get(&textures.rank),
    ) else {
        return;
    };

    prepared.uniform.set(DroneRenderUniform {
        separation: *separation,
        lighting: *lighting,
        width: show_pipeline.texture_width(),
        drone_count: show_pipeline.drone_count() as u32,
        time: frame.time,
        intensity: frame.intensity,
    });
    prepared.uniform.write_buffer(&render_device, &render_queue);
    let Some(uniform) = prepared.uniform.binding() else {
        return;
    };

    let bind_group = render_device.create_bind_group(
        "drone_material_bind_group",
        &pipeline.material_bind_group_layout,
        &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(&current.texture_view),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::TextureView(&previous.texture_view),
            },
            BindGroupEntry {
                binding: 2,
                resource: BindingResource::TextureView(&colour.texture_view),
            },
            BindGroupEntry {
                binding: 3,
                resource: BindingResource::TextureView(&sorted.texture_view),
            },
            BindGroupEntry {
                binding: 4,
                resource: BindingResource::TextureView(&rank.texture_view),
            },
            BindGroupEntry {
                binding: 5,
                resource: uniform,
            },
        ],
    );
    prepared.bind_group = Some(bind_group);
}

fn queue_drones(
    transparent_3d_draw_functions: Res<DrawFunctions<Transparent3d>>,
    drone_pipeline: Res<DronePipeline>,
    mut pipelines: ResMut<SpecializedMeshPipelines<DronePipeline>>,
    pipeline_cache: Res<PipelineCache>,
    meshes: Res<RenderAssets<RenderMesh>>,
    render_mesh_instances: Res<RenderMeshInstances>,
    drones: Query<(Entity, &MainEntity, &DronePart), With<DroneInstances>>,
    mut transparent_render_phases: ResMut<ViewSortedRenderPhases<Transparent3d>>,
    views: Query<(&ExtractedView, &Msaa)>,
) {
    let draw_drones = transparent_3d_draw_functions.read().id::<DrawDrones>();

    for (view, msaa) in &views {
        let Some(transparent_phase) = transparent_render_phases.get_mut(&view.retained_view_entity)
        else {
            continue;
        };

        let view_key =
            MeshPipelineKey::from_msaa_samples(msaa.samples()) | MeshPipelineKey::from_hdr(view.hdr);
        let rangefinder = view.rangefinder3d();

        for (entity, main_entity, part) in &drones {
            let Some(mesh_instance) = render_mesh_instances.render_mesh_queue_data(*main_entity)
            else {
                continue;
            };
            let Some(mesh) = meshes.get(mesh_instance.mesh_asset_id) else {
                continue;
            };

            let key = DronePipelineKey {
                mesh_key: view_key
                    | MeshPipelineKey::from_primitive_topology(mesh.primitive_topology()),
                part: *part,
            };
            let pipeline =
                match pipelines.specialize(&pipeline_cache, &drone_pipeline, key, &mesh.layout) {
                    Ok(pipeline) => pipeline,
                    Err(err) => {
                        error!("Drone pipeline specialisation failed: {err}");
                        continue;
                    }
                };

            transparent_phase.add(Transparent3d {
                entity: (entity, *main_entity),
                pipeline,
                draw_function: draw_drones,
                distance: rangefinder.distance_translation(&mesh_instance.translation),
                batch_range: 0..1,
                extra_index: PhaseItemExtraIndex::None,
                indexed: mesh.indexed(),
            });
        }
    }
}

type DrawDrones = (
    SetItemPipeline,
    SetMeshViewBindGroup<0>,
    SetMeshBindGroup<1>,
    SetDroneMaterialGroup<2>,
    DrawDroneInstances,
);

struct SetDroneMaterialGroup<const I: usize>;

impl<P: PhaseItem, const I: usize> RenderCommand<P> for SetDroneMaterialGroup<I> {
    type Param = SRes<PreparedDroneBindGroup>;
    type ViewQuery = ();
    type ItemQuery = ();

    #[inline]
    fn render<'w>(
        _item: &P,
        _view: (),
        _entity: Option<()>,
        prepared: SystemParamItem<'w, '_, Self::Param>,
        pass: &mut TrackedRenderPass<'w>,
    ) -> RenderCommandResult {
        match &prepared.into_inner().bind_group {
            Some(bind_group) => {
                pass.set_bind_group(I, bind_group, &[]);
                RenderCommandResult::Success
            }
            None => RenderCommandResult::Skip,
        }
    }
}

struct DrawDroneInstances;

impl<P: PhaseItem> RenderCommand<P> for DrawDroneInstances {
    type Param = (
        SRes<RenderAssets<RenderMesh>>,
        SRes<RenderMeshInstances>,
        SRes<MeshAllocator>,
    );
    type ViewQuery = ();
    type ItemQuery = Read<DroneInstanceBuffer>;

    #[inline]
    fn render<'w>(
        item: &P,
        _view: (),
        instance_buffer: Option<&'w DroneInstanceBuffer>,
        (meshes, render_mesh_instances, mesh_allocator): SystemParamItem<'w, '_, Self::Param>,
        pass: &mut TrackedRenderPass<'w>,
    ) -> RenderCommandResult {
        let mesh_allocator = mesh_allocator.into_inner();

        let Some(mesh_instance) = render_mesh_instances.render_mesh_queue_data(item.main_entity())
        else {
            return RenderCommandResult::Skip;
        };
        let Some(gpu_mesh) = meshes.into_inner().get(mesh_instance.mesh_asset_id) else {
            return RenderCommandResult::Skip;
        };
        let Some(instance_buffer) = instance_buffer else {
            return RenderCommandResult::Skip;
        };
        let Some(vertex_buffer_slice) =
            mesh_allocator.mesh_vertex_slice(&mesh_instance.mesh_asset_id)
        else {
            return RenderCommandResult::Skip;
        };

        pass.set_vertex_buffer(0, vertex_buffer_slice.buffer.slice(..));
        pass.set_vertex_buffer(1, instance_buffer.buffer.slice(..));
        let instances = 0..instance_buffer.length as u32;

        match &gpu_mesh.buffer_info {
            RenderMeshBufferInfo::Indexed {
                index_format,
                count,
            } => {
                let Some(index_buffer_slice) =
                    mesh_allocator.mesh_index_slice(&mesh_instance.mesh_asset_id)
                else {
                    return RenderCommandResult::Skip;
                };
                pass.set_index_buffer(index_buffer_slice.buffer.slice(..), 0, *index_format);
                pass.draw_indexed(
                    index_buffer_slice.range.start..(index_buffer_slice.range.start + count),
                    vertex_buffer_slice.range.start as i32,
                    instances,
                );
            }
            RenderMeshBufferInfo::NonIndexed => {
                pass.draw(vertex_buffer_slice.range, instances);
            }
        }
        RenderCommandResult::Success
    }
}

fn create_drone_bind_group_layout(render_device: &RenderDevice) -> BindGroupLayout {
    let texture = |binding: u32, sample_type: TextureSampleType| BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::VERTEX,
        ty: BindingType::Texture {
            sample_type,
            view_dimension: TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    };
    let unfilterable = TextureSampleType::Float { filterable: false };

    render_device.create_bind_group_layout(
        "drone_material_layout",
        &[
            // Current and previous positions (xyz + opacity)
            texture(0, unfilterable),
            texture(1, unfilterable),
            texture(2, unfilterable),
            // Sorted (hash, id) keys and per-drone rank
            texture(3, TextureSampleType::Uint),
            texture(4, TextureSampleType::Uint),
            BindGroupLayoutEntry {
                binding: 5,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(DroneRenderUniform::min_size()),
                },
                count: None,
            },
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn instance_layout_matches_the_instance_struct() {
        let layout = instance_buffer_layout();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.step_mode, VertexStepMode::Instance);
        let locations: Vec<_> = layout
            .attributes
            .iter()
            .map(|a| (a.shader_location, a.offset))
            .collect();
        assert_eq!(locations, vec![(8, 0), (9, 4)]);
    }

    #[test]
    fn parts_get_distinct_pipeline_keys() {
        let mesh_key = MeshPipelineKey::from_hdr(true);
        let light = DronePipelineKey {
            mesh_key,
            part: DronePart::Light,
        };
        let body = DronePipelineKey {
            mesh_key,
            part: DronePart::Body,
        };
        assert!(light != body);
    }

    #[test]
    fn render_uniform_has_a_fixed_size() {
        // separation (16) + lighting (48) + four scalars, rounded to 16
        assert_eq!(DroneRenderUniform::min_size().get(), 80);
    }
}
