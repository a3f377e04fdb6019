use std::path::Path;

use image::DynamicImage;

use crate::{
    codec::dds,
    foundation::{
        error::{EnvmapError, EnvmapResult},
        format::PixelFormat,
    },
    texture::{
        descriptor::{AlphaMode, ImageDescriptor},
        scratch::ScratchImage,
    },
};

/// File extensions the loader understands, lower case.
pub const SUPPORTED_EXTENSIONS: [&str; 9] =
    ["dds", "tga", "hdr", "bmp", "png", "jpg", "jpeg", "tif", "tiff"];

pub(crate) fn load_image(path: &Path) -> EnvmapResult<ScratchImage> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "dds" => dds::read_dds(path),
        e if SUPPORTED_EXTENSIONS.contains(&e) => load_with_image(path),
        "" => Err(EnvmapError::input(format!(
            "'{}' has no file extension",
            path.display()
        ))),
        other => Err(EnvmapError::input(format!(
            "unsupported file extension '.{other}' for '{}'",
            path.display()
        ))),
    }
}

fn load_with_image(path: &Path) -> EnvmapResult<ScratchImage> {
    let decoded = image::open(path)
        .map_err(|e| EnvmapError::input(format!("failed to decode '{}': {e}", path.display())))?;
    from_dynamic(decoded)
}

fn words_le(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

fn floats_le(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Map a decoded `image` buffer onto the nearest DXGI-style layout.
pub(crate) fn from_dynamic(decoded: DynamicImage) -> EnvmapResult<ScratchImage> {
    let (width, height) = (decoded.width(), decoded.height());
    let alpha_mode = if decoded.color().has_alpha() {
        AlphaMode::Straight
    } else {
        AlphaMode::Opaque
    };

    let (format, bytes) = match decoded {
        DynamicImage::ImageLuma8(buf) => (PixelFormat::R8Unorm, buf.into_raw()),
        DynamicImage::ImageLuma16(buf) => (PixelFormat::R16Unorm, words_le(buf.as_raw())),
        DynamicImage::ImageRgba8(buf) => (PixelFormat::R8G8B8A8Unorm, buf.into_raw()),
        DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => (
            PixelFormat::R16G16B16A16Unorm,
            words_le(decoded.to_rgba16().as_raw()),
        ),
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => (
            PixelFormat::R32G32B32A32Float,
            floats_le(decoded.to_rgba32f().as_raw()),
        ),
        other => (PixelFormat::R8G8B8A8Unorm, other.to_rgba8().into_raw()),
    };

    let desc = ImageDescriptor {
        alpha_mode,
        ..ImageDescriptor::new_2d(width, height, format)
    };
    ScratchImage::new(desc, bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/load.rs"]
mod tests;
