use std::path::{Path, PathBuf};

use crate::{
    assemble::assembler::assemble_cubemap,
    codec::{Codec, ImageFilter, ResizeOptions, SrgbFlags},
    foundation::{
        error::{EnvmapError, EnvmapResult},
        format::PixelFormat,
    },
    normalize::{
        normalizer::{NormalizeOptions, normalize_image},
        split::split_array,
    },
    render::{
        device::{AdapterChoice, GpuContext},
        pipeline::AddressMode,
        rasterizer::{CUBE_FACES, CubeRasterizer, RenderOptions, prepare_source},
    },
    sizing::resolver::{FaceSize, resolve_face_size},
    texture::{descriptor::ImageDescriptor, scratch::ScratchImage},
};

/// Projection to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvmapCommand {
    #[default]
    Cubic,
    Sphere,
    Parabola,
    Hemisphere,
}

impl EnvmapCommand {
    pub fn name(self) -> &'static str {
        match self {
            Self::Cubic => "cubic",
            Self::Sphere => "sphere",
            Self::Parabola => "dual parabola",
            Self::Hemisphere => "dual hemisphere",
        }
    }
}

/// Output pixel format: derived from the first source, or forced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatChoice {
    #[default]
    Auto,
    Fixed(PixelFormat),
}

/// Options for [`run`].
#[derive(Clone, Debug, Default)]
pub struct EnvmapOpts {
    pub command: EnvmapCommand,
    /// Face width; 0 derives it from the sources (or copies `height`).
    pub width: u32,
    /// Face height; 0 derives it from the sources (or copies `width`).
    pub height: u32,
    pub format: FormatChoice,
    pub filter: ImageFilter,
    /// Resize alpha independently of colour.
    pub separate_alpha: bool,
    pub srgb: SrgbFlags,
    pub address_mode: AddressMode,
    /// Reverse premultiplied alpha on load.
    pub demultiply_alpha: bool,
    pub adapter: AdapterChoice,
    /// 1 or 6 source image paths, in face order.
    pub sources: Vec<PathBuf>,
    /// Defaults to the first source's stem with a `.dds` extension.
    pub output: Option<PathBuf>,
    pub overwrite: bool,
    pub lowercase_output: bool,
}

/// What a successful run produced.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EnvmapSummary {
    pub output: PathBuf,
    pub descriptor: ImageDescriptor,
    pub face_size: FaceSize,
    pub adapter: String,
    /// Sources dropped after a recoverable codec fault.
    pub skipped: usize,
}

fn is_dds(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("dds"))
}

/// Where the cubemap will be written. Fails if the name cannot be derived or the file exists
/// and overwriting was not asked for.
pub fn output_path(opts: &EnvmapOpts) -> EnvmapResult<PathBuf> {
    let path = match &opts.output {
        Some(p) => p.clone(),
        None => {
            let first = opts
                .sources
                .first()
                .ok_or(EnvmapError::InputCount { count: 0 })?;
            if is_dds(first) {
                return Err(EnvmapError::input(
                    "need to specify output file via -o when the first source is a .dds",
                ));
            }
            let stem = first
                .file_stem()
                .ok_or_else(|| EnvmapError::input(format!("'{}' has no file name", first.display())))?;
            PathBuf::from(stem).with_extension("dds")
        }
    };

    let path = if opts.lowercase_output {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => path.with_file_name(name.to_lowercase()),
            None => path,
        }
    } else {
        path
    };

    if !opts.overwrite && path.exists() {
        return Err(EnvmapError::input(format!(
            "output file '{}' already exists, use -y to overwrite",
            path.display()
        )));
    }
    Ok(path)
}

/// Face format for `choice`, given the first normalized source.
pub fn negotiate_format(choice: FormatChoice, first: PixelFormat, srgb_out: bool) -> PixelFormat {
    let format = match choice {
        FormatChoice::Fixed(f) => f,
        FormatChoice::Auto if first.is_float() => PixelFormat::R32G32B32A32Float,
        FormatChoice::Auto => PixelFormat::R8G8B8A8Unorm,
    };
    if srgb_out {
        format.to_srgb().unwrap_or(format)
    } else {
        format
    }
}

/// Normalized, split sources plus the face format they imply.
pub struct LoadedSources {
    pub images: Vec<ScratchImage>,
    pub format: PixelFormat,
    pub skipped: usize,
}

/// Load, normalize and split every source. Recoverable codec faults skip the image.
pub fn load_sources(opts: &EnvmapOpts, codec: &dyn Codec) -> EnvmapResult<LoadedSources> {
    let normalize = NormalizeOptions {
        demultiply_alpha: opts.demultiply_alpha,
        srgb: opts.srgb,
    };
    let mut images = Vec::new();
    let mut format = None;
    let mut skipped = 0;

    for source in &opts.sources {
        let image = codec.load(source)?;
        tracing::info!("reading {} {}", source.display(), image.desc());

        let normalized = match normalize_image(codec, source, image, &normalize) {
            Ok(n) => n,
            Err(e) if e.is_recoverable() => {
                tracing::warn!("{e}; skipping");
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let first = *format.get_or_insert_with(|| {
            negotiate_format(opts.format, normalized.image.desc().format, opts.srgb.srgb_out)
        });
        tracing::debug!(format = %first, "face format");
        images.extend(split_array(normalized.image)?);
    }

    if images.len() > CUBE_FACES {
        tracing::warn!(
            "ignoring additional images, only using first {CUBE_FACES} of {} to form input cubemap",
            images.len()
        );
        images.truncate(CUBE_FACES);
    }

    Ok(LoadedSources {
        images,
        format: format.unwrap_or(PixelFormat::R8G8B8A8Unorm),
        skipped,
    })
}

/// Bake the sources into a cubemap DDS.
///
/// The GPU context lives only inside this call and is released on every return path.
#[tracing::instrument(skip(opts, codec), fields(command = opts.command.name()))]
pub fn run(opts: &EnvmapOpts, codec: &dyn Codec) -> EnvmapResult<EnvmapSummary> {
    let count = opts.sources.len();
    if count != 1 && count != CUBE_FACES {
        return Err(EnvmapError::InputCount { count });
    }
    let output = output_path(opts)?;

    let LoadedSources {
        images,
        format,
        skipped,
    } = load_sources(opts, codec)?;

    let count = images.len();
    if count != 1 && count < CUBE_FACES {
        return Err(EnvmapError::InputCount { count });
    }
    let bounds = images.iter().fold((0, 0), |(w, h), img| {
        (w.max(img.desc().width), h.max(img.desc().height))
    });
    let face_size = resolve_face_size(opts.width, opts.height, bounds, count);
    tracing::info!(%face_size, %format, "resolved faces");

    if count == 1 {
        return Err(EnvmapError::unsupported(
            "equirectangular to cubemap projection",
        ));
    }
    if opts.command != EnvmapCommand::Cubic {
        return Err(EnvmapError::unsupported(format!(
            "{} projection",
            opts.command.name()
        )));
    }

    let ctx = GpuContext::new(opts.adapter)?;
    let rasterizer = CubeRasterizer::new(&ctx, format, face_size, opts.address_mode)?;

    let render_opts = RenderOptions {
        resize: ResizeOptions {
            filter: opts.filter,
            separate_alpha: opts.separate_alpha,
        },
        srgb_in: opts.srgb.srgb_in,
    };
    let max_dimension = ctx.max_texture_dimension();
    let prepared = images
        .into_iter()
        .enumerate()
        .map(|(face, img)| {
            prepare_source(codec, img, max_dimension, &render_opts)
                .map_err(|e| EnvmapError::device(face, e.to_string()))
        })
        .collect::<EnvmapResult<Vec<_>>>()?;

    let faces = rasterizer.render_faces(&prepared)?;
    let cube = assemble_cubemap(faces)?;

    tracing::info!("writing {} {}", output.display(), cube.desc());
    codec.save(&output, &cube)?;

    Ok(EnvmapSummary {
        output,
        descriptor: *cube.desc(),
        face_size,
        adapter: ctx.adapter().name.clone(),
        skipped,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/run.rs"]
mod tests;
