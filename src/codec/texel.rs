use half::f16;

use crate::foundation::{
    error::{EnvmapError, EnvmapResult},
    format::PixelFormat,
};

pub(crate) type Rgba = [f32; 4];

/// Expand packed texels of an uncompressed, single-plane format into RGBA f32.
///
/// Missing colour channels read as 0 and a missing alpha channel reads as 1. Values are
/// returned as stored: sRGB-encoded formats are not linearized here.
pub(crate) fn unpack(format: PixelFormat, bytes: &[u8]) -> EnvmapResult<Vec<Rgba>> {
    let bpp = texel_size(format)?;
    if bytes.len() % bpp != 0 {
        return Err(EnvmapError::input(format!(
            "{} bytes is not a whole number of {format} texels",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(bpp)
        .map(|t| unpack_texel(format, t))
        .collect())
}

/// Inverse of [`unpack`]. Unorm channels clamp to `[0, 1]` and round to nearest.
pub(crate) fn pack(format: PixelFormat, texels: &[Rgba]) -> EnvmapResult<Vec<u8>> {
    let bpp = texel_size(format)?;
    let mut out = Vec::with_capacity(texels.len() * bpp);
    for t in texels {
        pack_texel(format, *t, &mut out);
    }
    Ok(out)
}

fn texel_size(format: PixelFormat) -> EnvmapResult<usize> {
    format.bytes_per_texel().ok_or_else(|| {
        EnvmapError::input(format!(
            "{format} is not an uncompressed single-plane format"
        ))
    })
}

fn u16_at(t: &[u8], i: usize) -> u16 {
    u16::from_le_bytes([t[i * 2], t[i * 2 + 1]])
}

fn u32_at(t: &[u8], i: usize) -> u32 {
    u32::from_le_bytes([t[i * 4], t[i * 4 + 1], t[i * 4 + 2], t[i * 4 + 3]])
}

fn f32_at(t: &[u8], i: usize) -> f32 {
    f32::from_bits(u32_at(t, i))
}

fn f16_at(t: &[u8], i: usize) -> f32 {
    f16::from_bits(u16_at(t, i)).to_f32()
}

fn unorm(v: u32, bits: u32) -> f32 {
    v as f32 / ((1u32 << bits) - 1) as f32
}

fn unpack_texel(format: PixelFormat, t: &[u8]) -> Rgba {
    use PixelFormat::*;
    match format {
        R32G32B32A32Float => [f32_at(t, 0), f32_at(t, 1), f32_at(t, 2), f32_at(t, 3)],
        R32G32B32Float => [f32_at(t, 0), f32_at(t, 1), f32_at(t, 2), 1.0],
        R16G16B16A16Float => [f16_at(t, 0), f16_at(t, 1), f16_at(t, 2), f16_at(t, 3)],
        R16G16B16A16Unorm => [
            unorm(u16_at(t, 0) as u32, 16),
            unorm(u16_at(t, 1) as u32, 16),
            unorm(u16_at(t, 2) as u32, 16),
            unorm(u16_at(t, 3) as u32, 16),
        ],
        R32G32Float => [f32_at(t, 0), f32_at(t, 1), 0.0, 1.0],
        R10G10B10A2Unorm => {
            let v = u32_at(t, 0);
            [
                unorm(v & 0x3ff, 10),
                unorm((v >> 10) & 0x3ff, 10),
                unorm((v >> 20) & 0x3ff, 10),
                unorm(v >> 30, 2),
            ]
        }
        R11G11B10Float => {
            let v = u32_at(t, 0);
            [
                decode_small_float(v & 0x7ff, 6),
                decode_small_float((v >> 11) & 0x7ff, 6),
                decode_small_float(v >> 22, 5),
                1.0,
            ]
        }
        R8G8B8A8Unorm | R8G8B8A8UnormSrgb => [
            unorm(t[0] as u32, 8),
            unorm(t[1] as u32, 8),
            unorm(t[2] as u32, 8),
            unorm(t[3] as u32, 8),
        ],
        R16G16Float => [f16_at(t, 0), f16_at(t, 1), 0.0, 1.0],
        R16G16Unorm => [
            unorm(u16_at(t, 0) as u32, 16),
            unorm(u16_at(t, 1) as u32, 16),
            0.0,
            1.0,
        ],
        R32Float => [f32_at(t, 0), 0.0, 0.0, 1.0],
        R8G8Unorm => [unorm(t[0] as u32, 8), unorm(t[1] as u32, 8), 0.0, 1.0],
        R16Float => [f16_at(t, 0), 0.0, 0.0, 1.0],
        R16Unorm => [unorm(u16_at(t, 0) as u32, 16), 0.0, 0.0, 1.0],
        R8Unorm => [unorm(t[0] as u32, 8), 0.0, 0.0, 1.0],
        R8Uint => [t[0] as f32, 0.0, 0.0, 1.0],
        A8Unorm => [0.0, 0.0, 0.0, unorm(t[0] as u32, 8)],
        B5G6R5Unorm => {
            let v = u16_at(t, 0) as u32;
            [
                unorm(v >> 11, 5),
                unorm((v >> 5) & 0x3f, 6),
                unorm(v & 0x1f, 5),
                1.0,
            ]
        }
        B5G5R5A1Unorm => {
            let v = u16_at(t, 0) as u32;
            [
                unorm((v >> 10) & 0x1f, 5),
                unorm((v >> 5) & 0x1f, 5),
                unorm(v & 0x1f, 5),
                (v >> 15) as f32,
            ]
        }
        B8G8R8A8Unorm | B8G8R8A8UnormSrgb => [
            unorm(t[2] as u32, 8),
            unorm(t[1] as u32, 8),
            unorm(t[0] as u32, 8),
            unorm(t[3] as u32, 8),
        ],
        B8G8R8X8Unorm => [
            unorm(t[2] as u32, 8),
            unorm(t[1] as u32, 8),
            unorm(t[0] as u32, 8),
            1.0,
        ],
        // Compressed and planar formats never reach here; texel_size rejects them.
        _ => [0.0, 0.0, 0.0, 1.0],
    }
}

fn to_unorm(v: f32, bits: u32) -> u32 {
    let max = ((1u32 << bits) - 1) as f32;
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    (v * max).round() as u32
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_f16(out: &mut Vec<u8>, v: f32) {
    push_u16(out, f16::from_f32(v).to_bits());
}

fn pack_texel(format: PixelFormat, [r, g, b, a]: Rgba, out: &mut Vec<u8>) {
    use PixelFormat::*;
    match format {
        R32G32B32A32Float => [r, g, b, a].into_iter().for_each(|v| push_f32(out, v)),
        R32G32B32Float => [r, g, b].into_iter().for_each(|v| push_f32(out, v)),
        R16G16B16A16Float => [r, g, b, a].into_iter().for_each(|v| push_f16(out, v)),
        R16G16B16A16Unorm => [r, g, b, a]
            .into_iter()
            .for_each(|v| push_u16(out, to_unorm(v, 16) as u16)),
        R32G32Float => [r, g].into_iter().for_each(|v| push_f32(out, v)),
        R10G10B10A2Unorm => push_u32(
            out,
            to_unorm(r, 10)
                | (to_unorm(g, 10) << 10)
                | (to_unorm(b, 10) << 20)
                | (to_unorm(a, 2) << 30),
        ),
        R11G11B10Float => push_u32(
            out,
            encode_small_float(r, 6)
                | (encode_small_float(g, 6) << 11)
                | (encode_small_float(b, 5) << 22),
        ),
        R8G8B8A8Unorm | R8G8B8A8UnormSrgb => {
            out.extend([r, g, b, a].map(|v| to_unorm(v, 8) as u8));
        }
        R16G16Float => [r, g].into_iter().for_each(|v| push_f16(out, v)),
        R16G16Unorm => [r, g]
            .into_iter()
            .for_each(|v| push_u16(out, to_unorm(v, 16) as u16)),
        R32Float => push_f32(out, r),
        R8G8Unorm => out.extend([r, g].map(|v| to_unorm(v, 8) as u8)),
        R16Float => push_f16(out, r),
        R16Unorm => push_u16(out, to_unorm(r, 16) as u16),
        R8Unorm => out.push(to_unorm(r, 8) as u8),
        R8Uint => out.push(if r.is_nan() { 0 } else { r.round().clamp(0.0, 255.0) as u8 }),
        A8Unorm => out.push(to_unorm(a, 8) as u8),
        B5G6R5Unorm => push_u16(
            out,
            ((to_unorm(r, 5) << 11) | (to_unorm(g, 6) << 5) | to_unorm(b, 5)) as u16,
        ),
        B5G5R5A1Unorm => push_u16(
            out,
            ((to_unorm(a, 1) << 15)
                | (to_unorm(r, 5) << 10)
                | (to_unorm(g, 5) << 5)
                | to_unorm(b, 5)) as u16,
        ),
        B8G8R8A8Unorm | B8G8R8A8UnormSrgb => {
            out.extend([b, g, r, a].map(|v| to_unorm(v, 8) as u8));
        }
        B8G8R8X8Unorm => {
            out.extend([b, g, r].map(|v| to_unorm(v, 8) as u8));
            out.push(0xff);
        }
        _ => {}
    }
}

/// Decode an unsigned 5-bit-exponent float (the 11- and 10-bit channels of R11G11B10).
pub(crate) fn decode_small_float(bits: u32, mantissa_bits: u32) -> f32 {
    let mantissa = bits & ((1 << mantissa_bits) - 1);
    let exponent = (bits >> mantissa_bits) & 0x1f;
    let scale = (1u32 << mantissa_bits) as f32;
    match exponent {
        0 => (mantissa as f32 / scale) * 2f32.powi(-14),
        31 if mantissa == 0 => f32::INFINITY,
        31 => f32::NAN,
        e => 2f32.powi(e as i32 - 15) * (1.0 + mantissa as f32 / scale),
    }
}

/// Encode to an unsigned 5-bit-exponent float, rounding to nearest.
///
/// Negative values clamp to 0 and values past the largest finite encoding saturate to it.
pub(crate) fn encode_small_float(value: f32, mantissa_bits: u32) -> u32 {
    let max_mantissa = (1u32 << mantissa_bits) - 1;
    if value.is_nan() {
        return (0x1f << mantissa_bits) | 1;
    }
    if value <= 0.0 {
        return 0;
    }
    let largest = 2f32.powi(15) * (1.0 + max_mantissa as f32 / (1u32 << mantissa_bits) as f32);
    if value >= largest {
        return (30 << mantissa_bits) | max_mantissa;
    }

    let smallest_normal = 2f32.powi(-14);
    if value < smallest_normal {
        // Denormal; a carry into the exponent field lands on the smallest normal, which is
        // exactly the right encoding.
        let m = (value / smallest_normal * (1u32 << mantissa_bits) as f32).round() as u32;
        return m;
    }

    let bits = value.to_bits();
    let exponent = ((bits >> 23) & 0xff) as i32 - 127;
    let shift = 23 - mantissa_bits;
    let mantissa23 = bits & 0x7f_ffff;
    let mut mantissa = (mantissa23 + (1 << (shift - 1))) >> shift;
    let mut biased = (exponent + 15) as u32;
    if mantissa > max_mantissa {
        mantissa = 0;
        biased += 1;
    }
    if biased >= 31 {
        return (30 << mantissa_bits) | max_mantissa;
    }
    (biased << mantissa_bits) | mantissa
}

pub(crate) fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

pub(crate) fn linear_to_srgb(v: f32) -> f32 {
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/texel.rs"]
mod tests;
