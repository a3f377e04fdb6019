use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "envmap_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn cube_faces(size: u32) -> ScratchImage {
    let desc = ImageDescriptor {
        array_size: 6,
        misc: MiscFlags { cubemap: true },
        alpha_mode: AlphaMode::Opaque,
        ..ImageDescriptor::new_2d(size, size, PixelFormat::R8G8B8A8Unorm)
    };
    let bytes = (0..desc.total_bytes()).map(|i| (i % 251) as u8).collect();
    ScratchImage::new(desc, bytes).unwrap()
}

fn reparse(dds: &ddsfile::Dds) -> ddsfile::Dds {
    let mut buf = Vec::new();
    dds.write(&mut buf).unwrap();
    ddsfile::Dds::read(buf.as_slice()).unwrap()
}

#[test]
fn cubemap_is_written_as_one_cube_entry() {
    let dds = encode_dds(&cube_faces(4)).unwrap();
    let h10 = dds.header10.as_ref().unwrap();
    assert_eq!(h10.array_size, 1);
    assert!(h10.misc_flag.contains(ddsfile::MiscFlag::TEXTURECUBE));
    assert_eq!(h10.dxgi_format, DxgiFormat::R8G8B8A8_UNorm);
    assert!(dds.header.caps2.contains(ddsfile::Caps2::CUBEMAP));
}

#[test]
fn describe_reads_back_six_faces() {
    let faces = cube_faces(4);
    let dds = reparse(&encode_dds(&faces).unwrap());
    let desc = describe(&dds).unwrap();
    assert_eq!(desc, *faces.desc());
    assert_eq!(&dds.data[..desc.total_bytes()], faces.pixels());
}

#[test]
fn file_round_trip_keeps_pixels() {
    let tmp = temp_dir("dds_file");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("cube.dds");

    let faces = cube_faces(8);
    write_dds(&path, &faces).unwrap();
    let back = read_dds(&path).unwrap();
    assert_eq!(back, faces);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn volumes_are_rejected() {
    let dds = ddsfile::Dds::new_dxgi(ddsfile::NewDxgiParams {
        height: 4,
        width: 4,
        depth: Some(4),
        format: DxgiFormat::R8G8B8A8_UNorm,
        mipmap_levels: None,
        array_layers: None,
        caps2: Some(ddsfile::Caps2::VOLUME),
        is_cubemap: false,
        resource_dimension: ddsfile::D3D10ResourceDimension::Texture3D,
        alpha_mode: ddsfile::AlphaMode::Unknown,
    })
    .unwrap();
    let err = describe(&dds).unwrap_err();
    assert!(err.to_string().contains("volume"));
}

#[test]
fn arrays_other_than_one_or_six_are_rejected() {
    let dds = ddsfile::Dds::new_dxgi(ddsfile::NewDxgiParams {
        height: 4,
        width: 4,
        depth: None,
        format: DxgiFormat::R8G8B8A8_UNorm,
        mipmap_levels: None,
        array_layers: Some(3),
        caps2: None,
        is_cubemap: false,
        resource_dimension: ddsfile::D3D10ResourceDimension::Texture2D,
        alpha_mode: ddsfile::AlphaMode::Unknown,
    })
    .unwrap();
    assert!(matches!(describe(&dds), Err(EnvmapError::Input(_))));
}

#[test]
fn legacy_dxt2_is_premultiplied() {
    let dds = ddsfile::Dds::new_d3d(ddsfile::NewD3dParams {
        height: 4,
        width: 4,
        depth: None,
        format: D3DFormat::DXT2,
        mipmap_levels: None,
        caps2: None,
    })
    .unwrap();
    let desc = describe(&reparse(&dds)).unwrap();
    assert_eq!(desc.format, PixelFormat::Bc2Unorm);
    assert_eq!(desc.alpha_mode, AlphaMode::Premultiplied);
}

#[test]
fn dxgi_mapping_is_symmetric() {
    for f in crate::foundation::format::RENDER_TARGET_FORMATS {
        assert_eq!(from_dxgi(to_dxgi(f)), Some(f));
    }
    assert_eq!(from_dxgi(DxgiFormat::R9G9B9E5_SharedExp), None);
}
