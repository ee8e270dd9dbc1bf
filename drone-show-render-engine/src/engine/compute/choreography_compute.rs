use bevy::prelude::*;
use bevy::render::{
    Render, RenderApp, RenderSet,
    render_asset::RenderAssets,
    render_resource::{
        BindGroup, BindGroupEntry, BindGroupLayout, BindGroupLayoutEntry, BindingResource,
        BindingType, Buffer, BufferBindingType, BufferInitDescriptor, BufferUsages,
        CachedComputePipelineId, CommandEncoder, ComputePassDescriptor, ComputePipeline,
        ComputePipelineDescriptor, PipelineCache, ShaderStages, StorageTextureAccess,
        TextureFormat, TextureSampleType, TextureView, TextureViewDimension,
    },
    renderer::{RenderDevice, RenderQueue},
    texture::GpuImage,
};
use bytemuck::Pod;
use choreography::{PingPong, PipelineConfig};

use crate::constants::path::{
    BITONIC_SORT_SHADER, FORMATION_POSITION_SHADER, SORT_RANK_SHADER, SPATIAL_HASH_SHADER,
};
use crate::constants::render_settings::SeparationSettings;
use crate::engine::assets::drone_show_assets::{ChoreographyTargets, DroneShowAssets};
use crate::engine::assets::show_manifest::{ShowManifestAsset, ShowPipeline};
use crate::engine::compute::uniforms::{HashPassUniform, PositionPassUniform, SortPassUniform};
use crate::engine::core::app_state::AppState;
use crate::engine::systems::show_clock::ShowFrame;

pub struct ChoreographyComputePlugin;

impl Plugin for ChoreographyComputePlugin {
    fn build(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };
        render_app
            .init_resource::<ChoreographyComputeState>()
            .add_systems(
                Render,
                run_choreography_compute
                    .in_set(RenderSet::Queue)
                    .run_if(in_state(AppState::Running)),
            );
    }
}

/// Storage textures with their read/write sides, owned by the render world.
pub struct ChoreographyTextures {
    /// After the frame's dispatch: `read()` is the current frame, `write()` the previous one.
    pub position: PingPong<Handle<Image>>,
    /// After the frame's dispatch: `read()` holds the sorted keys.
    pub sort: PingPong<Handle<Image>>,
    pub colour: Handle<Image>,
    pub rank: Handle<Image>,
}

impl ChoreographyTextures {
    fn new(targets: &ChoreographyTargets) -> Self {
        let [position_a, position_b] = targets.position.clone();
        let [sort_a, sort_b] = targets.sort.clone();
        Self {
            position: PingPong::new(position_a, position_b),
            sort: PingPong::new(sort_a, sort_b),
            colour: targets.colour.clone(),
            rank: targets.rank.clone(),
        }
    }
}

/// Lazily built pipelines plus the bind groups that never change during a show.
#[derive(Resource, Default)]
pub struct ChoreographyComputeState {
    pipelines: Option<ComputePipelines>,
    sort_uniforms: Option<SortUniforms>,
    textures: Option<ChoreographyTextures>,
}

impl ChoreographyComputeState {
    /// Textures of the last completed dispatch, `None` before the first frame.
    pub fn textures(&self) -> Option<&ChoreographyTextures> {
        self.textures.as_ref()
    }
}

struct ComputePipelines {
    position_layout: BindGroupLayout,
    hash_layout: BindGroupLayout,
    sort_layout: BindGroupLayout,
    sort_uniform_layout: BindGroupLayout,
    rank_layout: BindGroupLayout,
    position: CachedComputePipelineId,
    hash: CachedComputePipelineId,
    sort: CachedComputePipelineId,
    rank: CachedComputePipelineId,
}

/// One uniform bind group per bitonic pass, plus the rank pass uniform.
struct SortUniforms {
    width: u32,
    passes: Vec<BindGroup>,
    rank: Buffer,
}

fn float_texture(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::Texture {
            sample_type: TextureSampleType::Float { filterable: false },
            view_dimension: TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn uint_texture(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::Texture {
            sample_type: TextureSampleType::Uint,
            view_dimension: TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn storage_texture(binding: u32, format: TextureFormat) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::StorageTexture {
            access: StorageTextureAccess::WriteOnly,
            format,
            view_dimension: TextureViewDimension::D2,
        },
        count: None,
    }
}

fn uniform(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl ComputePipelines {
    fn new(
        render_device: &RenderDevice,
        pipeline_cache: &PipelineCache,
        asset_server: &AssetServer,
    ) -> Self {
        let position_layout = render_device.create_bind_group_layout(
            "formation_position_layout",
            &[
                float_texture(0),
                float_texture(1),
                float_texture(2),
                float_texture(3),
                float_texture(4),
                storage_texture(5, TextureFormat::Rgba32Float),
                storage_texture(6, TextureFormat::Rgba16Float),
                uniform(7),
            ],
        );
        let hash_layout = render_device.create_bind_group_layout(
            "spatial_hash_layout",
            &[
                float_texture(0),
                storage_texture(1, TextureFormat::Rgba32Uint),
                uniform(2),
            ],
        );
        let sort_layout = render_device.create_bind_group_layout(
            "bitonic_sort_textures_layout",
            &[uint_texture(0), storage_texture(1, TextureFormat::Rgba32Uint)],
        );
        let sort_uniform_layout =
            render_device.create_bind_group_layout("bitonic_sort_pass_layout", &[uniform(0)]);
        let rank_layout = render_device.create_bind_group_layout(
            "sort_rank_layout",
            &[
                uint_texture(0),
                storage_texture(1, TextureFormat::R32Uint),
                uniform(2),
            ],
        );

        let queue = |label: &'static str, layout: Vec<BindGroupLayout>, path: &'static str| {
            pipeline_cache.queue_compute_pipeline(ComputePipelineDescriptor {
                label: Some(label.into()),
                layout,
                push_constant_ranges: Vec::new(),
                shader: asset_server.load(path),
                shader_defs: vec![],
                entry_point: "main".into(),
                zero_initialize_workgroup_memory: true,
            })
        };

        let position = queue(
            "formation_position",
            vec![position_layout.clone()],
            FORMATION_POSITION_SHADER,
        );
        let hash = queue("spatial_hash", vec![hash_layout.clone()], SPATIAL_HASH_SHADER);
        let sort = queue(
            "bitonic_sort",
            vec![sort_layout.clone(), sort_uniform_layout.clone()],
            BITONIC_SORT_SHADER,
        );
        let rank = queue("sort_rank", vec![rank_layout.clone()], SORT_RANK_SHADER);

        Self {
            position_layout,
            hash_layout,
            sort_layout,
            sort_uniform_layout,
            rank_layout,
            position,
            hash,
            sort,
            rank,
        }
    }
}

impl SortUniforms {
    fn new(render_device: &RenderDevice, layout: &BindGroupLayout, config: &PipelineConfig) -> Self {
        let passes = config
            .sort_passes()
            .iter()
            .map(|pass| {
                let buffer = uniform_buffer(
                    render_device,
                    "bitonic_sort_pass",
                    &SortPassUniform::new(config, *pass),
                );
                render_device.create_bind_group(
                    "bitonic_sort_pass_bind_group",
                    layout,
                    &[BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                )
            })
            .collect();
        Self {
            width: config.texture_width(),
            passes,
            rank: uniform_buffer(render_device, "sort_rank", &SortPassUniform::rank(config)),
        }
    }
}

fn uniform_buffer<T: Pod>(render_device: &RenderDevice, label: &'static str, value: &T) -> Buffer {
    render_device.create_buffer_with_data(&BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: BufferUsages::UNIFORM,
    })
}

fn view<'a>(gpu_images: &'a RenderAssets<GpuImage>, handle: &Handle<Image>) -> Option<&'a TextureView> {
    gpu_images.get(handle).map(|image| &image.texture_view)
}

fn formation_view<'a>(
    gpu_images: &'a RenderAssets<GpuImage>,
    formations: &[Handle<Image>],
    index: usize,
) -> Option<&'a TextureView> {
    formations.get(index).and_then(|handle| view(gpu_images, handle))
}

fn dispatch(
    encoder: &mut CommandEncoder,
    label: &'static str,
    pipeline: &ComputePipeline,
    bind_groups: &[&BindGroup],
    workgroups: u32,
) {
    let mut pass = encoder.begin_compute_pass(&ComputePassDescriptor {
        label: Some(label),
        timestamp_writes: None,
    });
    pass.set_pipeline(pipeline);
    for (index, bind_group) in bind_groups.iter().enumerate() {
        pass.set_bind_group(index as u32, *bind_group, &[]);
    }
    pass.dispatch_workgroups(workgroups, workgroups, 1);
}

/// Position, hash, sort and rank stages of one frame, submitted together.
///
/// Nothing is dispatched (and no ping-pong side flips) until every pipeline
/// is compiled and every texture is resident on the GPU.
pub fn run_choreography_compute(
    mut state: ResMut<ChoreographyComputeState>,
    render_device: Res<RenderDevice>,
    render_queue: Res<RenderQueue>,
    pipeline_cache: Res<PipelineCache>,
    gpu_images: Res<RenderAssets<GpuImage>>,
    asset_server: Res<AssetServer>,
    assets: Option<Res<DroneShowAssets>>,
    manifest: Option<Res<ShowManifestAsset>>,
    show_pipeline: Option<Res<ShowPipeline>>,
    frame: Option<Res<ShowFrame>>,
    separation: Res<SeparationSettings>,
) {
    let (Some(assets), Some(manifest), Some(show_pipeline), Some(frame)) =
        (assets, manifest, show_pipeline, frame)
    else {
        return;
    };
    let Some(targets) = &assets.targets else {
        return;
    };
    let config = &show_pipeline.0;

    let state = &mut *state;
    let pipelines = state
        .pipelines
        .get_or_insert_with(|| ComputePipelines::new(&render_device, &pipeline_cache, &asset_server));
    if state
        .sort_uniforms
        .as_ref()
        .is_none_or(|uniforms| uniforms.width != config.texture_width())
    {
        state.sort_uniforms = Some(SortUniforms::new(
            &render_device,
            &pipelines.sort_uniform_layout,
            config,
        ));
    }
    let Some(sort_uniforms) = &state.sort_uniforms else {
        return;
    };
    let textures = state
        .textures
        .get_or_insert_with(|| ChoreographyTextures::new(targets));

    let (
        Some(position_pipeline),
        Some(hash_pipeline),
        Some(sort_pipeline),
        Some(rank_pipeline),
    ) = (
        pipeline_cache.get_compute_pipeline(pipelines.position),
        pipeline_cache.get_compute_pipeline(pipelines.hash),
        pipeline_cache.get_compute_pipeline(pipelines.sort),
        pipeline_cache.get_compute_pipeline(pipelines.rank),
    )
    else {
        return;
    };

    let from = frame.from as usize;
    let to = frame.to as usize;
    let (
        Some(anchor),
        Some(from_position),
        Some(to_position),
        Some(from_colour),
        Some(to_colour),
        Some(colour_out),
        Some(rank_out),
        Some(position_written),
        Some(sort_a),
        Some(sort_b),
    ) = (
        formation_view(&gpu_images, &assets.formation_positions, 0),
        formation_view(&gpu_images, &assets.formation_positions, from),
        formation_view(&gpu_images, &assets.formation_positions, to),
        formation_view(&gpu_images, &assets.formation_colours, from),
        formation_view(&gpu_images, &assets.formation_colours, to),
        view(&gpu_images, &textures.colour),
        view(&gpu_images, &textures.rank),
        view(&gpu_images, textures.position.write()),
        view(&gpu_images, textures.sort.read()),
        view(&gpu_images, textures.sort.write()),
    )
    else {
        return;
    };

    let position_uniform = uniform_buffer(
        &render_device,
        "formation_position_params",
        &PositionPassUniform::new(config, &manifest.flight, &frame),
    );
    let hash_uniform = uniform_buffer(
        &render_device,
        "spatial_hash_params",
        &HashPassUniform::new(config, separation.cell_size),
    );

    let position_group = render_device.create_bind_group(
        "formation_position_bind_group",
        &pipelines.position_layout,
        &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(anchor),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::TextureView(from_position),
            },
            BindGroupEntry {
                binding: 2,
                resource: BindingResource::TextureView(to_position),
            },
            BindGroupEntry {
                binding: 3,
                resource: BindingResource::TextureView(from_colour),
            },
            BindGroupEntry {
                binding: 4,
                resource: BindingResource::TextureView(to_colour),
            },
            BindGroupEntry {
                binding: 5,
                resource: BindingResource::TextureView(position_written),
            },
            BindGroupEntry {
                binding: 6,
                resource: BindingResource::TextureView(colour_out),
            },
            BindGroupEntry {
                binding: 7,
                resource: position_uniform.as_entire_binding(),
            },
        ],
    );

    // Sort keys are hashed into the write side, so the first bitonic pass reads it
    let sort_sides = PingPong::new(sort_a, sort_b);
    let hash_group = render_device.create_bind_group(
        "spatial_hash_bind_group",
        &pipelines.hash_layout,
        &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(position_written),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::TextureView(sort_sides.write()),
            },
            BindGroupEntry {
                binding: 2,
                resource: hash_uniform.as_entire_binding(),
            },
        ],
    );

    // sort_groups[i] reads side i of `sort_sides` and writes the other one
    let sort_groups = [(sort_a, sort_b), (sort_b, sort_a)].map(|(input, output)| {
        render_device.create_bind_group(
            "bitonic_sort_textures_bind_group",
            &pipelines.sort_layout,
            &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(input),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::TextureView(output),
                },
            ],
        )
    });

    let mut sort_sides = sort_sides;
    sort_sides.swap();

    let workgroups = config.workgroups();
    let mut encoder = render_device.create_command_encoder(&Default::default());

    dispatch(
        &mut encoder,
        "formation_position",
        position_pipeline,
        &[&position_group],
        workgroups,
    );
    textures.position.swap();

    dispatch(
        &mut encoder,
        "spatial_hash",
        hash_pipeline,
        &[&hash_group],
        workgroups,
    );
    textures.sort.swap();

    for pass_uniform in &sort_uniforms.passes {
        // sort_sides flips in step with textures.sort
        let group = &sort_groups[sort_sides.read_index()];
        dispatch(
            &mut encoder,
            "bitonic_sort",
            sort_pipeline,
            &[group, pass_uniform],
            workgroups,
        );
        sort_sides.swap();
        textures.sort.swap();
    }

    let rank_group = render_device.create_bind_group(
        "sort_rank_bind_group",
        &pipelines.rank_layout,
        &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(sort_sides.read()),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::TextureView(rank_out),
            },
            BindGroupEntry {
                binding: 2,
                resource: sort_uniforms.rank.as_entire_binding(),
            },
        ],
    );
    dispatch(
        &mut encoder,
        "sort_rank",
        rank_pipeline,
        &[&rank_group],
        workgroups,
    );

    render_queue.submit([encoder.finish()]);
}
