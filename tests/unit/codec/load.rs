use super::*;

#[test]
fn rgb8_becomes_opaque_rgba8() {
    let buf = image::RgbImage::from_raw(1, 1, vec![10, 20, 30]).unwrap();
    let img = from_dynamic(DynamicImage::ImageRgb8(buf)).unwrap();
    assert_eq!(img.desc().format, PixelFormat::R8G8B8A8Unorm);
    assert_eq!(img.desc().alpha_mode, AlphaMode::Opaque);
    assert_eq!(img.pixels(), &[10, 20, 30, 255]);
}

#[test]
fn rgba8_keeps_straight_alpha() {
    let buf = image::RgbaImage::from_raw(1, 1, vec![1, 2, 3, 4]).unwrap();
    let img = from_dynamic(DynamicImage::ImageRgba8(buf)).unwrap();
    assert_eq!(img.desc().alpha_mode, AlphaMode::Straight);
    assert_eq!(img.pixels(), &[1, 2, 3, 4]);
}

#[test]
fn luma_formats_stay_single_channel() {
    let buf = image::GrayImage::from_raw(2, 1, vec![0, 255]).unwrap();
    let img = from_dynamic(DynamicImage::ImageLuma8(buf)).unwrap();
    assert_eq!(img.desc().format, PixelFormat::R8Unorm);

    let buf = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(1, 1, vec![0x1234])
        .unwrap();
    let img = from_dynamic(DynamicImage::ImageLuma16(buf)).unwrap();
    assert_eq!(img.desc().format, PixelFormat::R16Unorm);
    assert_eq!(img.pixels(), &[0x34, 0x12]);
}

#[test]
fn float_images_load_as_rgba32f() {
    let buf = image::Rgb32FImage::from_raw(1, 1, vec![0.5, 2.0, 4.0]).unwrap();
    let img = from_dynamic(DynamicImage::ImageRgb32F(buf)).unwrap();
    assert_eq!(img.desc().format, PixelFormat::R32G32B32A32Float);
    assert_eq!(img.desc().alpha_mode, AlphaMode::Opaque);
    assert_eq!(img.pixels().len(), 16);
}

#[test]
fn unknown_extensions_are_input_errors() {
    let err = load_image(Path::new("faces/posx.xyz")).unwrap_err();
    assert!(matches!(err, EnvmapError::Input(_)));
    assert!(load_image(Path::new("noext")).is_err());
}

#[test]
fn missing_files_are_input_errors() {
    let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
    assert!(matches!(err, EnvmapError::Input(_)));
}
