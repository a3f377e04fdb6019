use super::*;

fn cube(format: PixelFormat) -> ImageDescriptor {
    ImageDescriptor {
        array_size: 6,
        misc: MiscFlags { cubemap: true },
        ..ImageDescriptor::new_2d(512, 512, format)
    }
}

#[test]
fn new_2d_is_valid() {
    ImageDescriptor::new_2d(300, 700, PixelFormat::R8G8B8A8Unorm)
        .validate()
        .unwrap();
}

#[test]
fn cubemap_needs_multiple_of_six() {
    cube(PixelFormat::R8G8B8A8Unorm).validate().unwrap();

    let mut bad = cube(PixelFormat::R8G8B8A8Unorm);
    bad.array_size = 4;
    assert!(bad.validate().is_err());
}

#[test]
fn depth_only_for_volumes() {
    let mut desc = ImageDescriptor::new_2d(8, 8, PixelFormat::R8Unorm);
    desc.depth = 4;
    assert!(desc.validate().is_err());

    desc.dimension = TextureDimension::Tex3D;
    desc.validate().unwrap();

    desc.array_size = 2;
    assert!(desc.validate().is_err());
}

#[test]
fn mip_chain_cannot_exceed_extent() {
    let mut desc = ImageDescriptor::new_2d(8, 2, PixelFormat::R8Unorm);
    desc.mip_levels = 4;
    desc.validate().unwrap();
    desc.mip_levels = 5;
    assert!(desc.validate().is_err());
}

#[test]
fn same_geometry_ignores_format_and_alpha() {
    let a = ImageDescriptor::new_2d(64, 32, PixelFormat::Bc1Unorm);
    let mut b = a;
    b.format = PixelFormat::R8G8B8A8Unorm;
    b.alpha_mode = AlphaMode::Straight;
    assert!(a.same_geometry(&b));

    b.height = 16;
    assert!(!a.same_geometry(&b));
}

#[test]
fn byte_sizes_follow_mip_chain() {
    let mut desc = ImageDescriptor::new_2d(4, 4, PixelFormat::R8G8B8A8Unorm);
    desc.mip_levels = 3;
    desc.array_size = 2;
    assert_eq!(desc.mip_bytes(0), 64);
    assert_eq!(desc.mip_bytes(1), 16);
    assert_eq!(desc.mip_bytes(2), 4);
    assert_eq!(desc.item_bytes(), 84);
    assert_eq!(desc.total_bytes(), 168);
}

#[test]
fn display_matches_info_line() {
    let mut desc = cube(PixelFormat::R8G8B8A8Unorm);
    desc.alpha_mode = AlphaMode::Opaque;
    assert_eq!(desc.to_string(), "(512x512,6 R8G8B8A8_UNORM Cube a:Opaque)");

    let mut flat = ImageDescriptor::new_2d(300, 700, PixelFormat::Bc7Unorm);
    flat.mip_levels = 3;
    flat.alpha_mode = AlphaMode::Premultiplied;
    assert_eq!(flat.to_string(), "(300x700,3 BC7_UNORM 2D a:PM)");
}
