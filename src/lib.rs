//! envmap bakes one or six source images into the faces of a cube environment map.
//!
//! # Pipeline overview
//!
//! 1. **Load**: read each source through a [`Codec`] (`.dds` via `ddsfile`, the rest via `image`).
//! 2. **Normalize**: merge planes, decompress blocks and optionally reverse premultiplied alpha
//!    ([`normalize_image`]); arrays and cubemaps are split into single images ([`split_array`]).
//! 3. **Size**: pick power-of-two face dimensions from the sources or explicit overrides
//!    ([`resolve_face_size`]).
//! 4. **Rasterize**: draw each source onto its face with `wgpu` and read it back
//!    ([`CubeRasterizer`]).
//! 5. **Assemble**: pack the six faces into a cubemap texture array ([`assemble_cubemap`]) and
//!    write it as DDS.
//!
//! [`run`] drives the whole pipeline from an [`EnvmapOpts`].
#![forbid(unsafe_code)]

mod assemble;
mod codec;
mod foundation;
mod normalize;
mod render;
mod session;
mod sizing;
mod texture;

pub use assemble::assembler::assemble_cubemap;
pub use codec::load::SUPPORTED_EXTENSIONS;
pub use codec::{Codec, DdsCodec, ImageFilter, ResizeOptions, SrgbFlags};
pub use foundation::error::{EnvmapError, EnvmapResult};
pub use foundation::format::{FORMAT_ALIASES, FormatType, PixelFormat, RENDER_TARGET_FORMATS};
pub use normalize::normalizer::{
    NormalizeOptions, NormalizeWarning, Normalized, normalize_image,
};
pub use normalize::split::split_array;
pub use render::device::{
    AdapterChoice, AdapterSummary, GpuContext, list_adapters, render_target_format,
};
pub use render::pipeline::AddressMode;
pub use render::rasterizer::{
    CUBE_FACES, CubeRasterizer, RenderOptions, prepare_source, upload_format,
};
pub use session::filelist::{parse_file_list, read_file_list};
pub use session::run::{
    EnvmapCommand, EnvmapOpts, EnvmapSummary, FormatChoice, LoadedSources, load_sources,
    negotiate_format, output_path, run,
};
pub use sizing::resolver::{
    FaceSize, MAX_FACE_DIMENSION, fit_power_of_two, fit_power_of_two_aspect, resolve_face_size,
};
pub use texture::descriptor::{AlphaMode, ImageDescriptor, MiscFlags, TextureDimension};
pub use texture::scratch::{PixelBuffer, ScratchImage, Subresource};
