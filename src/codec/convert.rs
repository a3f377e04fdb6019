use crate::{
    codec::{
        ResizeOptions, SrgbFlags,
        texel::{self, Rgba},
    },
    foundation::{
        error::{EnvmapError, EnvmapResult},
        format::PixelFormat,
    },
    texture::{
        descriptor::{AlphaMode, ImageDescriptor},
        scratch::{ScratchImage, Subresource},
    },
};

/// Rebuild an image subresource by subresource, in payload order.
pub(crate) fn rebuild<F>(
    image: &ScratchImage,
    desc: ImageDescriptor,
    mut per_subresource: F,
) -> EnvmapResult<ScratchImage>
where
    F: FnMut(Subresource<'_>) -> EnvmapResult<Vec<u8>>,
{
    let src = image.desc();
    let mut out = Vec::with_capacity(desc.total_bytes());
    for item in 0..src.array_size {
        for mip in 0..src.mip_levels {
            let sub = image.subresource(item, mip).ok_or_else(|| {
                EnvmapError::input(format!("image is missing item {item} mip {mip}"))
            })?;
            out.extend(per_subresource(sub)?);
        }
    }
    ScratchImage::new(desc, out)
}

fn require_plain(format: PixelFormat, op: &str) -> EnvmapResult<()> {
    if format.is_compressed() || format.is_planar() {
        return Err(EnvmapError::input(format!(
            "{op} needs an uncompressed single-plane format, got {format}"
        )));
    }
    Ok(())
}

fn map_colour(texels: &mut [Rgba], f: impl Fn(f32) -> f32) {
    for t in texels {
        t[0] = f(t[0]);
        t[1] = f(t[1]);
        t[2] = f(t[2]);
    }
}

pub(crate) fn convert(image: ScratchImage, format: PixelFormat) -> EnvmapResult<ScratchImage> {
    let src = *image.desc();
    if src.format == format {
        return Ok(image);
    }
    require_plain(src.format, "convert")?;
    require_plain(format, "convert")?;

    let linearize = src.format.is_srgb() && !format.is_srgb();
    let encode = !src.format.is_srgb() && format.is_srgb();
    let desc = ImageDescriptor { format, ..src };
    rebuild(&image, desc, |sub| {
        let mut texels = texel::unpack(src.format, sub.data)?;
        if linearize {
            map_colour(&mut texels, texel::srgb_to_linear);
        } else if encode {
            map_colour(&mut texels, texel::linear_to_srgb);
        }
        texel::pack(format, &texels)
    })
}

fn resample_weighted(
    texels: Vec<Rgba>,
    (w, h): (u32, u32),
    (width, height): (u32, u32),
    filter: image::imageops::FilterType,
) -> EnvmapResult<Vec<Rgba>> {
    let flat: Vec<f32> = texels
        .into_iter()
        .flat_map(|[r, g, b, a]| [r * a, g * a, b * a, a])
        .collect();
    let buffer = image::Rgba32FImage::from_raw(w, h, flat)
        .ok_or_else(|| EnvmapError::input("resize source does not match its extent"))?;
    Ok(image::imageops::resize(&buffer, width, height, filter)
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            if a > 0.0 {
                [r / a, g / a, b / a, a]
            } else {
                [0.0, 0.0, 0.0, a]
            }
        })
        .collect())
}

fn resample_separate(
    texels: Vec<Rgba>,
    (w, h): (u32, u32),
    (width, height): (u32, u32),
    filter: image::imageops::FilterType,
) -> EnvmapResult<Vec<Rgba>> {
    let alpha: Vec<f32> = texels.iter().map(|t| t[3]).collect();
    let colour: Vec<f32> = texels
        .into_iter()
        .flat_map(|[r, g, b, _]| [r, g, b, 1.0])
        .collect();
    let colour = image::Rgba32FImage::from_raw(w, h, colour)
        .ok_or_else(|| EnvmapError::input("resize source does not match its extent"))?;
    let alpha = image::ImageBuffer::<image::Luma<f32>, Vec<f32>>::from_raw(w, h, alpha)
        .ok_or_else(|| EnvmapError::input("resize source does not match its extent"))?;
    let colour = image::imageops::resize(&colour, width, height, filter);
    let alpha = image::imageops::resize(&alpha, width, height, filter);
    Ok(colour
        .pixels()
        .zip(alpha.pixels())
        .map(|(c, a)| [c.0[0], c.0[1], c.0[2], a.0[0]])
        .collect())
}

/// Resample the top mip of every array item. The result has a single mip level.
///
/// Colour is weighted by alpha while filtering unless `opts.separate_alpha` is set, so fully
/// transparent texels do not bleed into their neighbours.
pub(crate) fn resize(
    image: ScratchImage,
    width: u32,
    height: u32,
    opts: ResizeOptions,
) -> EnvmapResult<ScratchImage> {
    let src = *image.desc();
    require_plain(src.format, "resize")?;
    if width == 0 || height == 0 {
        return Err(EnvmapError::input("cannot resize to a zero-sized extent"));
    }
    if src.is_volume() {
        return Err(EnvmapError::unsupported("resizing volume textures"));
    }

    let desc = ImageDescriptor {
        width,
        height,
        mip_levels: 1,
        ..src
    };
    let mut out = Vec::with_capacity(desc.total_bytes());
    for item in 0..src.array_size {
        let sub = image
            .subresource(item, 0)
            .ok_or_else(|| EnvmapError::input(format!("image is missing item {item}")))?;
        let texels = texel::unpack(src.format, sub.data)?;
        let extent = (sub.width, sub.height);
        let filter = opts.filter.resample();
        let texels = if opts.separate_alpha || !src.format.has_alpha() {
            resample_separate(texels, extent, (width, height), filter)?
        } else {
            resample_weighted(texels, extent, (width, height), filter)?
        };
        out.extend(texel::pack(src.format, &texels)?);
    }
    ScratchImage::new(desc, out)
}

pub(crate) fn premultiply_reverse(
    image: ScratchImage,
    srgb: SrgbFlags,
) -> EnvmapResult<ScratchImage> {
    let src = *image.desc();
    require_plain(src.format, "premultiply reverse")?;
    let srgb_in = srgb.srgb_in || src.format.is_srgb();
    let srgb_out = srgb.srgb_out || src.format.is_srgb();

    let desc = ImageDescriptor {
        alpha_mode: AlphaMode::Straight,
        ..src
    };
    rebuild(&image, desc, |sub| {
        let mut texels = texel::unpack(src.format, sub.data)?;
        for t in texels.iter_mut() {
            let alpha = t[3];
            if alpha <= 0.0 {
                continue;
            }
            for c in &mut t[..3] {
                let linear = if srgb_in {
                    texel::srgb_to_linear(*c)
                } else {
                    *c
                };
                let straight = linear / alpha;
                *c = if srgb_out {
                    texel::linear_to_srgb(straight)
                } else {
                    straight
                };
            }
        }
        texel::pack(src.format, &texels)
    })
}

/// BT.601 limited-range YUV to RGB, inputs on an eight-bit scale.
fn yuv_to_rgb(y: f32, u: f32, v: f32) -> [f32; 3] {
    let c = 1.164_383 * (y - 16.0);
    let d = u - 128.0;
    let e = v - 128.0;
    [
        (c + 1.596_027 * e) / 255.0,
        (c - 0.391_762 * d - 0.812_968 * e) / 255.0,
        (c + 2.017_232 * d) / 255.0,
    ]
}

/// Merge NV12 (8-bit) and P010 (10-bit in 16-bit words) into interleaved RGBA.
pub(crate) fn merge_planes(image: ScratchImage) -> EnvmapResult<ScratchImage> {
    let src = *image.desc();
    let (target, sample_bytes) = match src.format {
        PixelFormat::Nv12 => (PixelFormat::R8G8B8A8Unorm, 1usize),
        PixelFormat::P010 => (PixelFormat::R16G16B16A16Unorm, 2usize),
        other => {
            return Err(EnvmapError::input(format!(
                "{other} is not a multi-plane format"
            )));
        }
    };
    let desc = ImageDescriptor {
        format: target,
        ..src
    };

    let sample = move |plane: &[u8], offset: usize| -> f32 {
        if sample_bytes == 1 {
            plane[offset] as f32
        } else {
            // High ten bits of each little-endian word, rescaled to eight bits.
            let word = u16::from_le_bytes([plane[offset], plane[offset + 1]]);
            (word >> 6) as f32 / 4.0
        }
    };

    rebuild(&image, desc, |sub| {
        let w = sub.width as usize;
        let h = sub.height as usize;
        let mut texels = Vec::with_capacity(w * h * sub.depth as usize);
        for slice in sub.data.chunks_exact(sub.slice_pitch) {
            let (luma, chroma) = slice.split_at(sub.row_pitch * h);
            for y in 0..h {
                for x in 0..w {
                    let luma_at = y * sub.row_pitch + x * sample_bytes;
                    let chroma_at = (y / 2) * sub.row_pitch + (x / 2) * 2 * sample_bytes;
                    let [r, g, b] = yuv_to_rgb(
                        sample(luma, luma_at),
                        sample(chroma, chroma_at),
                        sample(chroma, chroma_at + sample_bytes),
                    );
                    texels.push([r, g, b, 1.0]);
                }
            }
        }
        texel::pack(target, &texels)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/codec/convert.rs"]
mod tests;
