use crate::{
    codec::{
        convert::rebuild,
        texel::{self, Rgba},
    },
    foundation::{
        error::{EnvmapError, EnvmapResult},
        format::PixelFormat,
    },
    texture::{descriptor::ImageDescriptor, scratch::ScratchImage},
};

const BLOCK_TEXELS: usize = 16;

type Block = [Rgba; BLOCK_TEXELS];

/// Uncompressed format a block format decodes into.
pub(crate) fn decompressed_format(format: PixelFormat) -> EnvmapResult<PixelFormat> {
    use PixelFormat::*;
    match format {
        Bc1UnormSrgb | Bc2UnormSrgb | Bc3UnormSrgb | Bc7UnormSrgb => Ok(R8G8B8A8UnormSrgb),
        Bc1Unorm | Bc2Unorm | Bc3Unorm | Bc4Unorm | Bc4Snorm | Bc5Unorm | Bc5Snorm | Bc7Unorm => {
            Ok(R8G8B8A8Unorm)
        }
        Bc6hUf16 | Bc6hSf16 => Ok(R32G32B32A32Float),
        other => Err(EnvmapError::input(format!(
            "{other} is not a block-compressed format"
        ))),
    }
}

fn rgba8_block(block: &[u8], decode: fn(&[u8], &mut [u8], usize)) -> Block {
    let mut out = [0u8; BLOCK_TEXELS * 4];
    decode(block, &mut out, 4 * 4);
    let mut texels = [[0.0; 4]; BLOCK_TEXELS];
    for (t, px) in texels.iter_mut().zip(out.chunks_exact(4)) {
        *t = [px[0], px[1], px[2], px[3]].map(|v| f32::from(v) / 255.0);
    }
    texels
}

/// Decode one 4x4 block into row-major RGBA texels. Colour comes out as stored, so sRGB
/// blocks stay sRGB encoded and signed channels keep their negative range.
fn decode_block(format: PixelFormat, block: &[u8]) -> Block {
    use PixelFormat::*;
    let mut texels = [[0.0, 0.0, 0.0, 1.0]; BLOCK_TEXELS];
    match format {
        Bc1Unorm | Bc1UnormSrgb => return rgba8_block(block, bcdec_rs::bc1),
        Bc2Unorm | Bc2UnormSrgb => return rgba8_block(block, bcdec_rs::bc2),
        Bc3Unorm | Bc3UnormSrgb => return rgba8_block(block, bcdec_rs::bc3),
        Bc4Unorm | Bc4Snorm => {
            let mut red = [0.0f32; BLOCK_TEXELS];
            bcdec_rs::bc4_float(block, &mut red, 4, format == Bc4Snorm);
            for (t, r) in texels.iter_mut().zip(red) {
                t[0] = r;
            }
        }
        Bc5Unorm | Bc5Snorm => {
            let mut rg = [0.0f32; BLOCK_TEXELS * 2];
            bcdec_rs::bc5_float(block, &mut rg, 4 * 2, format == Bc5Snorm);
            for (t, c) in texels.iter_mut().zip(rg.chunks_exact(2)) {
                t[0] = c[0];
                t[1] = c[1];
            }
        }
        Bc6hUf16 | Bc6hSf16 => {
            let mut rgb = [0.0f32; BLOCK_TEXELS * 3];
            bcdec_rs::bc6h_float(block, &mut rgb, 4 * 3, format == Bc6hSf16);
            for (t, c) in texels.iter_mut().zip(rgb.chunks_exact(3)) {
                t[..3].copy_from_slice(c);
            }
        }
        _ => return rgba8_block(block, bcdec_rs::bc7),
    }
    texels
}

pub(crate) fn decompress(image: ScratchImage) -> EnvmapResult<ScratchImage> {
    let src = *image.desc();
    let target = decompressed_format(src.format)?;
    let block_bytes = src
        .format
        .block_bytes()
        .ok_or_else(|| EnvmapError::input(format!("{} has no block size", src.format)))?;

    let desc = ImageDescriptor {
        format: target,
        ..src
    };
    rebuild(&image, desc, |sub| {
        let w = sub.width as usize;
        let h = sub.height as usize;
        let blocks_wide = w.div_ceil(4);
        let mut texels: Vec<Rgba> = vec![[0.0; 4]; w * h * sub.depth as usize];

        for (z, slice) in sub.data.chunks_exact(sub.slice_pitch).enumerate() {
            let base = z * w * h;
            for (i, block) in slice.chunks_exact(block_bytes).enumerate() {
                let bx = (i % blocks_wide) * 4;
                let by = (i / blocks_wide) * 4;
                for (j, px) in decode_block(src.format, block).into_iter().enumerate() {
                    let x = bx + j % 4;
                    let y = by + j / 4;
                    if x < w && y < h {
                        texels[base + y * w + x] = px;
                    }
                }
            }
        }
        texel::pack(target, &texels)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/codec/decompress.rs"]
mod tests;
