use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use ddsfile::{D3DFormat, DxgiFormat};

use crate::{
    foundation::{
        error::{EnvmapError, EnvmapResult},
        format::PixelFormat,
    },
    texture::{
        descriptor::{AlphaMode, ImageDescriptor, MiscFlags, TextureDimension},
        scratch::ScratchImage,
    },
};

pub(crate) fn to_dxgi(format: PixelFormat) -> DxgiFormat {
    use PixelFormat::*;
    match format {
        R32G32B32A32Float => DxgiFormat::R32G32B32A32_Float,
        R32G32B32Float => DxgiFormat::R32G32B32_Float,
        R16G16B16A16Float => DxgiFormat::R16G16B16A16_Float,
        R16G16B16A16Unorm => DxgiFormat::R16G16B16A16_UNorm,
        R32G32Float => DxgiFormat::R32G32_Float,
        R10G10B10A2Unorm => DxgiFormat::R10G10B10A2_UNorm,
        R11G11B10Float => DxgiFormat::R11G11B10_Float,
        R8G8B8A8Unorm => DxgiFormat::R8G8B8A8_UNorm,
        R8G8B8A8UnormSrgb => DxgiFormat::R8G8B8A8_UNorm_sRGB,
        R16G16Float => DxgiFormat::R16G16_Float,
        R16G16Unorm => DxgiFormat::R16G16_UNorm,
        R32Float => DxgiFormat::R32_Float,
        R8G8Unorm => DxgiFormat::R8G8_UNorm,
        R16Float => DxgiFormat::R16_Float,
        R16Unorm => DxgiFormat::R16_UNorm,
        R8Unorm => DxgiFormat::R8_UNorm,
        R8Uint => DxgiFormat::R8_UInt,
        A8Unorm => DxgiFormat::A8_UNorm,
        B5G6R5Unorm => DxgiFormat::B5G6R5_UNorm,
        B5G5R5A1Unorm => DxgiFormat::B5G5R5A1_UNorm,
        B8G8R8A8Unorm => DxgiFormat::B8G8R8A8_UNorm,
        B8G8R8A8UnormSrgb => DxgiFormat::B8G8R8A8_UNorm_sRGB,
        B8G8R8X8Unorm => DxgiFormat::B8G8R8X8_UNorm,
        Bc1Unorm => DxgiFormat::BC1_UNorm,
        Bc1UnormSrgb => DxgiFormat::BC1_UNorm_sRGB,
        Bc2Unorm => DxgiFormat::BC2_UNorm,
        Bc2UnormSrgb => DxgiFormat::BC2_UNorm_sRGB,
        Bc3Unorm => DxgiFormat::BC3_UNorm,
        Bc3UnormSrgb => DxgiFormat::BC3_UNorm_sRGB,
        Bc4Unorm => DxgiFormat::BC4_UNorm,
        Bc4Snorm => DxgiFormat::BC4_SNorm,
        Bc5Unorm => DxgiFormat::BC5_UNorm,
        Bc5Snorm => DxgiFormat::BC5_SNorm,
        Bc6hUf16 => DxgiFormat::BC6H_UF16,
        Bc6hSf16 => DxgiFormat::BC6H_SF16,
        Bc7Unorm => DxgiFormat::BC7_UNorm,
        Bc7UnormSrgb => DxgiFormat::BC7_UNorm_sRGB,
        Nv12 => DxgiFormat::NV12,
        P010 => DxgiFormat::P010,
    }
}

pub(crate) fn from_dxgi(format: DxgiFormat) -> Option<PixelFormat> {
    use PixelFormat::*;
    Some(match format {
        DxgiFormat::R32G32B32A32_Float => R32G32B32A32Float,
        DxgiFormat::R32G32B32_Float => R32G32B32Float,
        DxgiFormat::R16G16B16A16_Float => R16G16B16A16Float,
        DxgiFormat::R16G16B16A16_UNorm => R16G16B16A16Unorm,
        DxgiFormat::R32G32_Float => R32G32Float,
        DxgiFormat::R10G10B10A2_UNorm => R10G10B10A2Unorm,
        DxgiFormat::R11G11B10_Float => R11G11B10Float,
        DxgiFormat::R8G8B8A8_UNorm => R8G8B8A8Unorm,
        DxgiFormat::R8G8B8A8_UNorm_sRGB => R8G8B8A8UnormSrgb,
        DxgiFormat::R16G16_Float => R16G16Float,
        DxgiFormat::R16G16_UNorm => R16G16Unorm,
        DxgiFormat::R32_Float => R32Float,
        DxgiFormat::R8G8_UNorm => R8G8Unorm,
        DxgiFormat::R16_Float => R16Float,
        DxgiFormat::R16_UNorm => R16Unorm,
        DxgiFormat::R8_UNorm => R8Unorm,
        DxgiFormat::R8_UInt => R8Uint,
        DxgiFormat::A8_UNorm => A8Unorm,
        DxgiFormat::B5G6R5_UNorm => B5G6R5Unorm,
        DxgiFormat::B5G5R5A1_UNorm => B5G5R5A1Unorm,
        DxgiFormat::B8G8R8A8_UNorm => B8G8R8A8Unorm,
        DxgiFormat::B8G8R8A8_UNorm_sRGB => B8G8R8A8UnormSrgb,
        DxgiFormat::B8G8R8X8_UNorm => B8G8R8X8Unorm,
        DxgiFormat::BC1_UNorm => Bc1Unorm,
        DxgiFormat::BC1_UNorm_sRGB => Bc1UnormSrgb,
        DxgiFormat::BC2_UNorm => Bc2Unorm,
        DxgiFormat::BC2_UNorm_sRGB => Bc2UnormSrgb,
        DxgiFormat::BC3_UNorm => Bc3Unorm,
        DxgiFormat::BC3_UNorm_sRGB => Bc3UnormSrgb,
        DxgiFormat::BC4_UNorm => Bc4Unorm,
        DxgiFormat::BC4_SNorm => Bc4Snorm,
        DxgiFormat::BC5_UNorm => Bc5Unorm,
        DxgiFormat::BC5_SNorm => Bc5Snorm,
        DxgiFormat::BC6H_UF16 => Bc6hUf16,
        DxgiFormat::BC6H_SF16 => Bc6hSf16,
        DxgiFormat::BC7_UNorm => Bc7Unorm,
        DxgiFormat::BC7_UNorm_sRGB => Bc7UnormSrgb,
        DxgiFormat::NV12 => Nv12,
        DxgiFormat::P010 => P010,
        _ => return None,
    })
}

/// Legacy (pre-DX10) headers. The second value marks premultiplied DXT2/DXT4.
pub(crate) fn from_d3d(format: D3DFormat) -> Option<(PixelFormat, bool)> {
    use PixelFormat::*;
    Some(match format {
        D3DFormat::A8R8G8B8 => (B8G8R8A8Unorm, false),
        D3DFormat::X8R8G8B8 => (B8G8R8X8Unorm, false),
        D3DFormat::A8B8G8R8 => (R8G8B8A8Unorm, false),
        D3DFormat::R5G6B5 => (B5G6R5Unorm, false),
        D3DFormat::A1R5G5B5 => (B5G5R5A1Unorm, false),
        D3DFormat::A2B10G10R10 => (R10G10B10A2Unorm, false),
        D3DFormat::G16R16 => (R16G16Unorm, false),
        D3DFormat::A16B16G16R16 => (R16G16B16A16Unorm, false),
        D3DFormat::L8 => (R8Unorm, false),
        D3DFormat::L16 => (R16Unorm, false),
        D3DFormat::A8 => (A8Unorm, false),
        D3DFormat::R16F => (R16Float, false),
        D3DFormat::G16R16F => (R16G16Float, false),
        D3DFormat::A16B16G16R16F => (R16G16B16A16Float, false),
        D3DFormat::R32F => (R32Float, false),
        D3DFormat::G32R32F => (R32G32Float, false),
        D3DFormat::A32B32G32R32F => (R32G32B32A32Float, false),
        D3DFormat::DXT1 => (Bc1Unorm, false),
        D3DFormat::DXT2 => (Bc2Unorm, true),
        D3DFormat::DXT3 => (Bc2Unorm, false),
        D3DFormat::DXT4 => (Bc3Unorm, true),
        D3DFormat::DXT5 => (Bc3Unorm, false),
        _ => return None,
    })
}

fn alpha_from_dds(mode: ddsfile::AlphaMode) -> AlphaMode {
    match mode {
        ddsfile::AlphaMode::Unknown => AlphaMode::Unknown,
        ddsfile::AlphaMode::Straight => AlphaMode::Straight,
        ddsfile::AlphaMode::PreMultiplied => AlphaMode::Premultiplied,
        ddsfile::AlphaMode::Opaque => AlphaMode::Opaque,
        ddsfile::AlphaMode::Custom => AlphaMode::Custom,
    }
}

fn alpha_to_dds(mode: AlphaMode) -> ddsfile::AlphaMode {
    match mode {
        AlphaMode::Unknown => ddsfile::AlphaMode::Unknown,
        AlphaMode::Straight => ddsfile::AlphaMode::Straight,
        AlphaMode::Premultiplied => ddsfile::AlphaMode::PreMultiplied,
        AlphaMode::Opaque => ddsfile::AlphaMode::Opaque,
        AlphaMode::Custom => ddsfile::AlphaMode::Custom,
    }
}

/// Describe a parsed DDS container, rejecting layouts the baker cannot use as a source.
pub(crate) fn describe(dds: &ddsfile::Dds) -> EnvmapResult<ImageDescriptor> {
    let header10 = dds.header10.as_ref();
    let is_volume = dds.header.caps2.contains(ddsfile::Caps2::VOLUME)
        || dds.get_depth() > 1
        || header10.is_some_and(|h| {
            h.resource_dimension == ddsfile::D3D10ResourceDimension::Texture3D
        });
    if is_volume {
        return Err(EnvmapError::input("Can't use volume textures as input"));
    }

    let (format, legacy_pm) = match header10 {
        Some(h) => (
            from_dxgi(h.dxgi_format).ok_or_else(|| {
                EnvmapError::input(format!("unsupported DXGI format {:?}", h.dxgi_format))
            })?,
            false,
        ),
        None => match dds.get_d3d_format().and_then(from_d3d) {
            Some(legacy) => legacy,
            None => (
                dds.get_dxgi_format()
                    .and_then(from_dxgi)
                    .ok_or_else(|| EnvmapError::input("unsupported legacy DDS pixel format"))?,
                false,
            ),
        },
    };

    let cubemap = match header10 {
        Some(h) => h.misc_flag.contains(ddsfile::MiscFlag::TEXTURECUBE),
        None => dds.header.caps2.contains(ddsfile::Caps2::CUBEMAP),
    };
    let entries = match header10 {
        Some(h) => h.array_size.max(1),
        None => 1,
    };
    let array_size = if cubemap { entries * 6 } else { entries };
    if array_size != 1 && array_size != 6 {
        return Err(EnvmapError::input(format!(
            "Can't use arrays with {array_size} entries as input, only 1 or 6"
        )));
    }

    let dimension = match header10.map(|h| h.resource_dimension) {
        Some(ddsfile::D3D10ResourceDimension::Texture1D) => TextureDimension::Tex1D,
        _ => TextureDimension::Tex2D,
    };
    let alpha_mode = match header10 {
        Some(h) => alpha_from_dds(h.alpha_mode),
        None if legacy_pm => AlphaMode::Premultiplied,
        None => AlphaMode::Unknown,
    };

    let desc = ImageDescriptor {
        width: dds.get_width(),
        height: dds.get_height(),
        depth: 1,
        array_size,
        mip_levels: dds.get_num_mipmap_levels().max(1),
        format,
        dimension,
        misc: MiscFlags { cubemap },
        alpha_mode,
    };
    desc.validate()?;
    Ok(desc)
}

pub(crate) fn read_dds(path: &Path) -> EnvmapResult<ScratchImage> {
    let file = File::open(path)
        .map_err(|e| EnvmapError::input(format!("cannot open '{}': {e}", path.display())))?;
    let dds = ddsfile::Dds::read(BufReader::new(file))
        .map_err(|e| EnvmapError::input(format!("'{}': {e}", path.display())))?;
    let desc = describe(&dds)?;

    let expected = desc.total_bytes();
    let mut data = dds.data;
    if data.len() < expected {
        return Err(EnvmapError::input(format!(
            "'{}' is truncated: {} of {expected} pixel bytes",
            path.display(),
            data.len()
        )));
    }
    data.truncate(expected);
    ScratchImage::new(desc, data)
}

/// Encode an image as a DDS container with a DX10 header.
pub(crate) fn encode_dds(image: &ScratchImage) -> EnvmapResult<ddsfile::Dds> {
    let desc = image.desc();
    let caps2 = desc
        .is_cubemap()
        .then_some(ddsfile::Caps2::CUBEMAP | ddsfile::Caps2::CUBEMAP_ALLFACES);
    let resource_dimension = match desc.dimension {
        TextureDimension::Tex1D => ddsfile::D3D10ResourceDimension::Texture1D,
        TextureDimension::Tex2D => ddsfile::D3D10ResourceDimension::Texture2D,
        TextureDimension::Tex3D => ddsfile::D3D10ResourceDimension::Texture3D,
    };
    let mut dds = ddsfile::Dds::new_dxgi(ddsfile::NewDxgiParams {
        height: desc.height,
        width: desc.width,
        depth: desc.is_volume().then_some(desc.depth),
        format: to_dxgi(desc.format),
        mipmap_levels: Some(desc.mip_levels),
        array_layers: Some(desc.array_size),
        caps2,
        is_cubemap: desc.is_cubemap(),
        resource_dimension,
        alpha_mode: alpha_to_dds(desc.alpha_mode),
    })
    .map_err(|e| EnvmapError::serialize(format!("dds header for {desc}: {e}")))?;
    dds.data = image.pixels().to_vec();
    Ok(dds)
}

pub(crate) fn write_dds(path: &Path, image: &ScratchImage) -> EnvmapResult<()> {
    let dds = encode_dds(image)?;
    let file = File::create(path)
        .map_err(|e| EnvmapError::serialize(format!("create '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    dds.write(&mut writer)
        .map_err(|e| EnvmapError::serialize(format!("write '{}': {e}", path.display())))?;
    writer
        .flush()
        .map_err(|e| EnvmapError::serialize(format!("flush '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/dds.rs"]
mod tests;
