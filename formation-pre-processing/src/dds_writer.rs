use anyhow::{Context, Result, bail};
use ddsfile::{AlphaMode, D3D10ResourceDimension, Dds, DxgiFormat, NewDxgiParams};
use std::fs::File;
use std::path::Path;

fn write_dds(path: &Path, size: u32, format: DxgiFormat, bytes: Vec<u8>) -> Result<()> {
    let params = NewDxgiParams {
        height: size,
        width: size,
        depth: None,
        format,
        mipmap_levels: Some(1),
        array_layers: Some(1),
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Unknown,
    };

    let mut dds = Dds::new_dxgi(params)?;
    dds.data = bytes;
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    dds.write(&mut file)?;
    Ok(())
}

/// Formation positions: xyz + formation id, little-endian f32.
pub fn write_position_dds(path: &Path, size: u32, bytes: Vec<u8>) -> Result<()> {
    write_dds(path, size, DxgiFormat::R32G32B32A32_Float, bytes)
}

/// Formation colours: rgb + opacity, little-endian f16.
pub fn write_colour_dds(path: &Path, size: u32, bytes: Vec<u8>) -> Result<()> {
    write_dds(path, size, DxgiFormat::R16G16B16A16_Float, bytes)
}

/// Read back an RGBA32F texture as `(size, floats)`.
pub fn read_position_dds(path: &Path) -> Result<(u32, Vec<f32>)> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let dds = Dds::read(&mut file)?;
    if dds.get_dxgi_format() != Some(DxgiFormat::R32G32B32A32_Float) {
        bail!("{} is not an RGBA32F texture", path.display());
    }
    let floats = dds
        .data
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok((dds.get_width(), floats))
}
