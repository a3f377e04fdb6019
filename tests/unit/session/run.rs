use super::*;
use crate::{
    codec::DdsCodec,
    texture::descriptor::{AlphaMode, MiscFlags},
};

/// Synthesizes sources from their file names instead of reading them.
struct NamedCodec;

impl NamedCodec {
    fn image_for(name: &str) -> ScratchImage {
        let (format, array_size) = if name.contains("bc1") {
            (PixelFormat::Bc1Unorm, 1)
        } else if name.contains("float") {
            (PixelFormat::R32G32B32A32Float, 1)
        } else if name.contains("cube") {
            (PixelFormat::R8G8B8A8Unorm, 6)
        } else {
            (PixelFormat::R8G8B8A8Unorm, 1)
        };
        let desc = ImageDescriptor {
            array_size,
            misc: MiscFlags {
                cubemap: array_size == 6,
            },
            alpha_mode: AlphaMode::Straight,
            ..ImageDescriptor::new_2d(8, 4, format)
        };
        ScratchImage::new(desc, vec![0; desc.total_bytes()]).unwrap()
    }
}

impl Codec for NamedCodec {
    fn load(&self, path: &Path) -> EnvmapResult<ScratchImage> {
        let name = path.to_string_lossy();
        if name.contains("missing") {
            return Err(EnvmapError::input(format!("cannot open '{name}'")));
        }
        Ok(Self::image_for(&name))
    }

    fn merge_planes(&self, image: ScratchImage) -> EnvmapResult<ScratchImage> {
        Ok(image)
    }

    fn decompress(&self, _image: ScratchImage) -> EnvmapResult<ScratchImage> {
        Err(EnvmapError::input("corrupt block data"))
    }

    fn premultiply_reverse(
        &self,
        image: ScratchImage,
        _srgb: SrgbFlags,
    ) -> EnvmapResult<ScratchImage> {
        Ok(image)
    }

    fn resize(
        &self,
        image: ScratchImage,
        width: u32,
        height: u32,
        opts: ResizeOptions,
    ) -> EnvmapResult<ScratchImage> {
        DdsCodec.resize(image, width, height, opts)
    }

    fn convert(&self, image: ScratchImage, format: PixelFormat) -> EnvmapResult<ScratchImage> {
        DdsCodec.convert(image, format)
    }

    fn save(&self, _path: &Path, _image: &ScratchImage) -> EnvmapResult<()> {
        Err(EnvmapError::serialize("save is not expected in these tests"))
    }
}

fn opts(sources: &[&str]) -> EnvmapOpts {
    EnvmapOpts {
        sources: sources.iter().map(PathBuf::from).collect(),
        ..EnvmapOpts::default()
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "envmap_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn three_sources_fail_before_anything_is_loaded() {
    let err = run(&opts(&["missing_a.png", "missing_b.png", "missing_c.png"]), &NamedCodec)
        .unwrap_err();
    assert!(matches!(err, EnvmapError::InputCount { count: 3 }));
}

#[test]
fn unreadable_source_aborts_the_run() {
    let err = run(&opts(&["missing.png"]), &NamedCodec).unwrap_err();
    assert!(matches!(err, EnvmapError::Input(_)));
}

#[test]
fn single_source_is_an_unsupported_projection() {
    let err = run(&opts(&["panorama.png"]), &NamedCodec).unwrap_err();
    assert!(matches!(err, EnvmapError::Unsupported(_)), "{err}");
}

#[test]
fn non_cubic_commands_are_unsupported() {
    let faces = ["a.png", "b.png", "c.png", "d.png", "e.png", "f.png"];
    for command in [
        EnvmapCommand::Sphere,
        EnvmapCommand::Parabola,
        EnvmapCommand::Hemisphere,
    ] {
        let o = EnvmapOpts {
            command,
            ..opts(&faces)
        };
        let err = run(&o, &NamedCodec).unwrap_err();
        assert!(err.to_string().contains(command.name()), "{err}");
    }
}

#[test]
fn skipped_source_leaves_too_few_faces() {
    let faces = ["a.png", "b.png", "c_bc1.dds", "d.png", "e.png", "f.png"];
    let o = EnvmapOpts {
        output: Some(PathBuf::from("unused.dds")),
        ..opts(&faces)
    };
    let loaded = load_sources(&o, &NamedCodec).unwrap();
    assert_eq!(loaded.skipped, 1);
    assert_eq!(loaded.images.len(), 5);

    let err = run(&o, &NamedCodec).unwrap_err();
    assert!(matches!(err, EnvmapError::InputCount { count: 5 }));
}

#[test]
fn cube_sources_split_and_extra_faces_are_dropped() {
    let loaded = load_sources(&opts(&["sky_cube.dds", "more_cube.dds"]), &NamedCodec).unwrap();
    assert_eq!(loaded.images.len(), CUBE_FACES);
    assert!(loaded.images.iter().all(|i| i.desc().array_size == 1));
}

#[test]
fn auto_format_follows_first_source() {
    let loaded = load_sources(&opts(&["hdr_float.hdr", "b.png"]), &NamedCodec).unwrap();
    assert_eq!(loaded.format, PixelFormat::R32G32B32A32Float);
    let loaded = load_sources(&opts(&["b.png", "hdr_float.hdr"]), &NamedCodec).unwrap();
    assert_eq!(loaded.format, PixelFormat::R8G8B8A8Unorm);
}

#[test]
fn negotiate_format_applies_srgb_twin() {
    use PixelFormat::*;
    assert_eq!(negotiate_format(FormatChoice::Auto, R16G16B16A16Float, false), R32G32B32A32Float);
    assert_eq!(negotiate_format(FormatChoice::Auto, R8G8B8A8Unorm, true), R8G8B8A8UnormSrgb);
    assert_eq!(negotiate_format(FormatChoice::Fixed(B8G8R8A8Unorm), R8Unorm, true), B8G8R8A8UnormSrgb);
    assert_eq!(negotiate_format(FormatChoice::Fixed(R16Float), R8Unorm, true), R16Float);
}

#[test]
fn default_output_uses_first_stem() {
    let path = output_path(&opts(&["faces/Sky_PosX.png"])).unwrap();
    assert_eq!(path, PathBuf::from("Sky_PosX.dds"));

    let lower = EnvmapOpts {
        lowercase_output: true,
        ..opts(&["faces/Sky_PosX.png"])
    };
    assert_eq!(output_path(&lower).unwrap(), PathBuf::from("sky_posx.dds"));
}

#[test]
fn dds_source_needs_explicit_output() {
    let err = output_path(&opts(&["sky.DDS"])).unwrap_err();
    assert!(err.to_string().contains("-o"), "{err}");
}

#[test]
fn existing_output_needs_overwrite() {
    let dir = temp_dir("existing_output");
    let out = dir.join("cube.dds");
    std::fs::write(&out, b"old").unwrap();

    let mut o = EnvmapOpts {
        output: Some(out.clone()),
        ..opts(&["a.png"])
    };
    let err = output_path(&o).unwrap_err();
    assert!(err.to_string().contains("-y"), "{err}");

    o.overwrite = true;
    assert_eq!(output_path(&o).unwrap(), out);
    let _ = std::fs::remove_dir_all(&dir);
}
