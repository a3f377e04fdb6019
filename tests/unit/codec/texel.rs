use super::*;

#[test]
fn missing_channels_default_to_zero_and_opaque() {
    let t = unpack(PixelFormat::R8Unorm, &[255]).unwrap();
    assert_eq!(t, vec![[1.0, 0.0, 0.0, 1.0]]);

    let t = unpack(PixelFormat::A8Unorm, &[0]).unwrap();
    assert_eq!(t, vec![[0.0, 0.0, 0.0, 0.0]]);
}

#[test]
fn bgra_swizzles_to_rgba() {
    let t = unpack(PixelFormat::B8G8R8A8Unorm, &[0, 0, 255, 255]).unwrap();
    assert_eq!(t, vec![[1.0, 0.0, 0.0, 1.0]]);
    assert_eq!(
        pack(PixelFormat::B8G8R8A8Unorm, &t).unwrap(),
        vec![0, 0, 255, 255]
    );
}

#[test]
fn b5g6r5_uses_full_range() {
    let t = unpack(PixelFormat::B5G6R5Unorm, &0xffffu16.to_le_bytes()).unwrap();
    assert_eq!(t, vec![[1.0, 1.0, 1.0, 1.0]]);
    let red = pack(PixelFormat::B5G6R5Unorm, &[[1.0, 0.0, 0.0, 1.0]]).unwrap();
    assert_eq!(u16::from_le_bytes([red[0], red[1]]), 0xf800);
}

#[test]
fn unorm_packing_clamps_and_rounds() {
    let bytes = pack(PixelFormat::R8G8B8A8Unorm, &[[-1.0, 2.0, 0.5, f32::NAN]]).unwrap();
    assert_eq!(bytes, vec![0, 255, 128, 0]);
}

#[test]
fn rejects_partial_texels_and_block_formats() {
    assert!(unpack(PixelFormat::R8G8B8A8Unorm, &[1, 2, 3]).is_err());
    assert!(unpack(PixelFormat::Bc1Unorm, &[0; 8]).is_err());
    assert!(pack(PixelFormat::Nv12, &[[0.0; 4]]).is_err());
}

#[test]
fn small_floats_encode_exact_values() {
    for v in [0.0f32, 1.0, 0.5, 2.0, 65024.0, 2f32.powi(-14)] {
        let enc = encode_small_float(v, 6);
        assert_eq!(decode_small_float(enc, 6), v, "value {v}");
    }
    assert_eq!(encode_small_float(1.0, 6), 15 << 6);
    assert_eq!(encode_small_float(1.0, 5), 15 << 5);
    assert_eq!(encode_small_float(-3.0, 6), 0);
    assert_eq!(decode_small_float(encode_small_float(1.0e9, 5), 5), 64512.0);
}

#[test]
fn r11g11b10_packs_channels_in_order() {
    let bytes = pack(PixelFormat::R11G11B10Float, &[[1.0, 2.0, 0.5, 1.0]]).unwrap();
    let t = unpack(PixelFormat::R11G11B10Float, &bytes).unwrap();
    assert_eq!(t, vec![[1.0, 2.0, 0.5, 1.0]]);
}

#[test]
fn half_floats_keep_precision() {
    let bytes = pack(PixelFormat::R16G16B16A16Float, &[[0.25, 1.5, 100.0, 1.0]]).unwrap();
    assert_eq!(bytes.len(), 8);
    let t = unpack(PixelFormat::R16G16B16A16Float, &bytes).unwrap();
    assert_eq!(t, vec![[0.25, 1.5, 100.0, 1.0]]);
}

#[test]
fn srgb_curve_is_inverse() {
    for i in 0..=10 {
        let v = i as f32 / 10.0;
        assert!((linear_to_srgb(srgb_to_linear(v)) - v).abs() < 1e-5);
    }
}
