use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};

use crate::engine::assets::drone_show_assets::{ChoreographyTargets, DroneShowAssets};
use crate::engine::assets::show_manifest::ShowPipeline;
use crate::engine::loading::progress::LoadingProgress;

/// Point sampling for baked textures, then allocate the compute targets.
pub fn configure_loaded_textures(
    mut loading_progress: ResMut<LoadingProgress>,
    mut assets: ResMut<DroneShowAssets>,
    mut images: ResMut<Assets<Image>>,
    pipeline: Option<Res<ShowPipeline>>,
) {
    if loading_progress.textures_configured
        || !loading_progress.textures_loaded
        || loading_progress.failed
    {
        return;
    }
    let Some(pipeline) = pipeline else {
        return;
    };
    let width = pipeline.texture_width();

    for handle in assets.formation_textures() {
        let Some(image) = images.get_mut(handle) else {
            return;
        };
        let size = image.size();
        if size != UVec2::splat(width) {
            loading_progress.fail(format!(
                "formation texture is {}x{}, manifest expects {}x{}",
                size.x, size.y, width, width
            ));
            return;
        }
        image.sampler = nearest_sampler();
    }

    let targets = ChoreographyTargets {
        position: [
            images.add(storage_image(width, TextureFormat::Rgba32Float)),
            images.add(storage_image(width, TextureFormat::Rgba32Float)),
        ],
        colour: images.add(storage_image(width, TextureFormat::Rgba16Float)),
        sort: [
            images.add(storage_image(width, TextureFormat::Rgba32Uint)),
            images.add(storage_image(width, TextureFormat::Rgba32Uint)),
        ],
        rank: images.add(storage_image(width, TextureFormat::R32Uint)),
    };
    assets.targets = Some(targets);

    info!("✓ Compute targets created ({}x{})", width, width);
    loading_progress.textures_configured = true;
}

fn nearest_sampler() -> ImageSampler {
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        mag_filter: ImageFilterMode::Nearest,
        min_filter: ImageFilterMode::Nearest,
        ..default()
    })
}

/// Square GPU-only texture usable as compute output and shader input.
pub fn storage_image(width: u32, format: TextureFormat) -> Image {
    let mut image = Image::new_uninit(
        Extent3d {
            width,
            height: width,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        format,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::STORAGE_BINDING | TextureUsages::COPY_DST;
    image.sampler = nearest_sampler();
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn storage_targets_are_square_and_bindable() {
        let image = storage_image(64, TextureFormat::Rgba32Uint);
        assert_eq!(image.size(), UVec2::splat(64));
        assert_eq!(image.texture_descriptor.format, TextureFormat::Rgba32Uint);
        assert!(
            image
                .texture_descriptor
                .usage
                .contains(TextureUsages::STORAGE_BINDING | TextureUsages::TEXTURE_BINDING)
        );
    }
}
