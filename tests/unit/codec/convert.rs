use super::*;
use crate::codec::ImageFilter;

fn rgba8(width: u32, height: u32, texels: &[[u8; 4]]) -> ScratchImage {
    let desc = ImageDescriptor::new_2d(width, height, PixelFormat::R8G8B8A8Unorm);
    ScratchImage::new(desc, texels.concat()).unwrap()
}

#[test]
fn convert_to_same_format_is_identity() {
    let img = rgba8(1, 1, &[[1, 2, 3, 4]]);
    let out = convert(img.clone(), PixelFormat::R8G8B8A8Unorm).unwrap();
    assert_eq!(out, img);
}

#[test]
fn convert_widens_to_float() {
    let img = rgba8(1, 1, &[[255, 0, 255, 0]]);
    let out = convert(img, PixelFormat::R32G32B32A32Float).unwrap();
    assert_eq!(out.desc().format, PixelFormat::R32G32B32A32Float);
    let texels = texel::unpack(PixelFormat::R32G32B32A32Float, out.pixels()).unwrap();
    assert_eq!(texels, vec![[1.0, 0.0, 1.0, 0.0]]);
}

#[test]
fn convert_rejects_block_formats() {
    let img = rgba8(4, 4, &[[0; 4]; 16]);
    assert!(convert(img, PixelFormat::Bc1Unorm).is_err());
}

#[test]
fn resize_keeps_format_and_drops_mips() {
    let img = rgba8(2, 2, &[[255, 255, 255, 255]; 4]);
    let opts = ResizeOptions {
        filter: ImageFilter::Point,
        ..ResizeOptions::default()
    };
    let out = resize(img, 4, 1, opts).unwrap();
    assert_eq!(out.desc().width, 4);
    assert_eq!(out.desc().height, 1);
    assert_eq!(out.desc().mip_levels, 1);
    assert_eq!(out.pixels(), [255u8; 16].as_slice());
}

fn red_beside_clear_blue() -> ScratchImage {
    let desc = ImageDescriptor::new_2d(2, 1, PixelFormat::R32G32B32A32Float);
    let texels = [[1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 0.0]];
    ScratchImage::new(desc, texel::pack(desc.format, &texels).unwrap()).unwrap()
}

fn halve(separate_alpha: bool) -> [f32; 4] {
    let opts = ResizeOptions {
        filter: ImageFilter::Linear,
        separate_alpha,
    };
    let out = resize(red_beside_clear_blue(), 1, 1, opts).unwrap();
    texel::unpack(PixelFormat::R32G32B32A32Float, out.pixels()).unwrap()[0]
}

#[test]
fn resize_keeps_transparent_colour_out_by_default() {
    let [r, g, b, a] = halve(false);
    assert!((r - 1.0).abs() < 1e-3, "{r}");
    assert_eq!(g, 0.0);
    assert!(b.abs() < 1e-3, "{b}");
    assert!((a - 0.5).abs() < 1e-3, "{a}");
}

#[test]
fn separate_alpha_filters_colour_unweighted() {
    let [r, _, b, a] = halve(true);
    assert!((r - 0.5).abs() < 1e-3, "{r}");
    assert!((b - 0.5).abs() < 1e-3, "{b}");
    assert!((a - 0.5).abs() < 1e-3, "{a}");
}

fn premultiplied(img: ScratchImage) -> ScratchImage {
    let (desc, pixels) = img.into_parts();
    let desc = ImageDescriptor {
        alpha_mode: AlphaMode::Premultiplied,
        ..desc
    };
    ScratchImage::new(desc, pixels.into_vec()).unwrap()
}

#[test]
fn premultiply_reverse_divides_by_alpha() {
    let img = premultiplied(rgba8(2, 1, &[[17, 34, 0, 51], [10, 10, 10, 0]]));
    let out = premultiply_reverse(img, SrgbFlags::default()).unwrap();
    assert_eq!(out.desc().alpha_mode, AlphaMode::Straight);
    // 17/51 -> 1/3, 34/51 -> 2/3, zero alpha left untouched
    assert_eq!(out.pixels(), &[85, 170, 0, 51, 10, 10, 10, 0]);
}

#[test]
fn nv12_grey_merges_to_grey() {
    // 2x2 luma at video black (16) and neutral chroma.
    let desc = ImageDescriptor::new_2d(2, 2, PixelFormat::Nv12);
    let img = ScratchImage::new(desc, vec![16, 16, 16, 16, 128, 128]).unwrap();
    let out = merge_planes(img).unwrap();
    assert_eq!(out.desc().format, PixelFormat::R8G8B8A8Unorm);
    assert_eq!(out.pixels(), [0, 0, 0, 255].repeat(4).as_slice());
}

#[test]
fn p010_white_merges_to_sixteen_bit() {
    // Ten-bit video white is 940, stored in the high bits.
    let y = (940u16 << 6).to_le_bytes();
    let c = (512u16 << 6).to_le_bytes();
    let mut bytes = Vec::new();
    for _ in 0..4 {
        bytes.extend_from_slice(&y);
    }
    bytes.extend_from_slice(&c);
    bytes.extend_from_slice(&c);
    let desc = ImageDescriptor::new_2d(2, 2, PixelFormat::P010);
    let out = merge_planes(ScratchImage::new(desc, bytes).unwrap()).unwrap();
    assert_eq!(out.desc().format, PixelFormat::R16G16B16A16Unorm);
    let texels = texel::unpack(PixelFormat::R16G16B16A16Unorm, out.pixels()).unwrap();
    assert!(texels.iter().all(|t| t.iter().all(|v| (*v - 1.0).abs() < 1e-3)));
}

#[test]
fn merge_planes_rejects_single_plane() {
    let img = rgba8(1, 1, &[[0; 4]]);
    assert!(merge_planes(img).is_err());
}
