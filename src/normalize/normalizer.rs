use std::path::Path;

use crate::{
    codec::{Codec, SrgbFlags},
    foundation::error::{EnvmapError, EnvmapResult},
    texture::{
        descriptor::{AlphaMode, ImageDescriptor},
        scratch::ScratchImage,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Reverse premultiplied alpha when the source declares it.
    pub demultiply_alpha: bool,
    pub srgb: SrgbFlags,
}

/// Non-fatal observations made while normalizing one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizeWarning {
    AlreadyStraightAlpha,
    NotPremultiplied,
}

impl std::fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyStraightAlpha => f.write_str("image is already using straight alpha"),
            Self::NotPremultiplied => f.write_str("image is not using premultiplied alpha"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Normalized {
    pub image: ScratchImage,
    pub warnings: Vec<NormalizeWarning>,
}

fn ensure_same_geometry(
    op: &str,
    before: &ImageDescriptor,
    after: &ImageDescriptor,
) -> EnvmapResult<()> {
    if before.same_geometry(after) {
        return Ok(());
    }
    Err(EnvmapError::consistency(format!(
        "{op} changed image geometry from {before} to {after}"
    )))
}

fn codec_step(
    op: &'static str,
    source: &Path,
    image: ScratchImage,
    run: impl FnOnce(ScratchImage) -> EnvmapResult<ScratchImage>,
) -> EnvmapResult<ScratchImage> {
    let before = *image.desc();
    // only per-image failures become skippable; resource and consistency faults stay fatal
    let out = run(image).map_err(|e| match e {
        EnvmapError::Input(_) | EnvmapError::Unsupported(_) => {
            EnvmapError::codec(op, source, e.to_string())
        }
        other => other,
    })?;
    ensure_same_geometry(op, &before, out.desc())?;
    Ok(out)
}

/// Bring one loaded image into a single-plane, uncompressed form the rasterizer can sample.
///
/// Codec failures come back as [`EnvmapError::Codec`] so the caller can skip the image;
/// a step that alters width, height, depth, array size, mips, flags or dimension is a
/// [`EnvmapError::Consistency`] fault.
pub fn normalize_image(
    codec: &dyn Codec,
    source: &Path,
    image: ScratchImage,
    opts: &NormalizeOptions,
) -> EnvmapResult<Normalized> {
    let mut image = image;
    let mut warnings = Vec::new();

    if image.desc().format.is_planar() {
        image = codec_step("merge planes", source, image, |img| codec.merge_planes(img))?;
    }

    if image.desc().format.is_compressed() {
        image = codec_step("decompress", source, image, |img| codec.decompress(img))?;
        if image.desc().format.is_compressed() {
            return Err(EnvmapError::consistency(format!(
                "decompress left '{}' in {}",
                source.display(),
                image.desc().format
            )));
        }
    }

    let format = image.desc().format;
    if opts.demultiply_alpha && format.has_alpha() && !format.is_pure_alpha() {
        if image.desc().is_pm_alpha() {
            image = codec_step("premultiply reverse", source, image, |img| {
                codec.premultiply_reverse(img, opts.srgb)
            })?;
        } else if image.desc().alpha_mode == AlphaMode::Straight {
            tracing::warn!(source = %source.display(), "image is already using straight alpha");
            warnings.push(NormalizeWarning::AlreadyStraightAlpha);
        } else {
            tracing::warn!(source = %source.display(), "image is not using premultiplied alpha");
            warnings.push(NormalizeWarning::NotPremultiplied);
        }
    }

    Ok(Normalized { image, warnings })
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/normalizer.rs"]
mod tests;
