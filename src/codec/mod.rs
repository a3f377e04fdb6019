use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::{
    foundation::{error::EnvmapResult, format::PixelFormat},
    texture::scratch::ScratchImage,
};

pub(crate) mod convert;
pub(crate) mod dds;
pub(crate) mod decompress;
pub(crate) mod load;
pub(crate) mod texel;

/// Filter used when an image has to be resampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFilter {
    Point,
    #[default]
    Linear,
    Cubic,
    Fant,
    Box,
    Triangle,
}

impl ImageFilter {
    pub const ALL: [ImageFilter; 6] = [
        ImageFilter::Point,
        ImageFilter::Linear,
        ImageFilter::Cubic,
        ImageFilter::Fant,
        ImageFilter::Box,
        ImageFilter::Triangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::Linear => "LINEAR",
            Self::Cubic => "CUBIC",
            Self::Fant => "FANT",
            Self::Box => "BOX",
            Self::Triangle => "TRIANGLE",
        }
    }

    pub(crate) fn resample(self) -> image::imageops::FilterType {
        use image::imageops::FilterType;
        match self {
            Self::Point => FilterType::Nearest,
            Self::Linear | Self::Box | Self::Triangle => FilterType::Triangle,
            Self::Cubic => FilterType::CatmullRom,
            Self::Fant => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ImageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid filter '{s}'"))
    }
}

/// Whether colour data entering or leaving an operation is sRGB encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SrgbFlags {
    pub srgb_in: bool,
    pub srgb_out: bool,
}

/// How [`Codec::resize`] filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResizeOptions {
    pub filter: ImageFilter,
    /// Filter alpha on its own instead of weighting colour by it.
    pub separate_alpha: bool,
}

/// Image codec operations the baking pipeline consumes.
///
/// Every transform takes the image by value and returns a new one, so callers can check
/// what changed between input and output.
pub trait Codec {
    fn load(&self, path: &Path) -> EnvmapResult<ScratchImage>;

    /// Collapse a multi-plane (YUV) image into a single interleaved plane.
    fn merge_planes(&self, image: ScratchImage) -> EnvmapResult<ScratchImage>;

    /// Decode a block-compressed image into its default uncompressed format.
    fn decompress(&self, image: ScratchImage) -> EnvmapResult<ScratchImage>;

    /// Divide colour by alpha and report the result as straight alpha.
    fn premultiply_reverse(&self, image: ScratchImage, srgb: SrgbFlags)
    -> EnvmapResult<ScratchImage>;

    fn resize(
        &self,
        image: ScratchImage,
        width: u32,
        height: u32,
        opts: ResizeOptions,
    ) -> EnvmapResult<ScratchImage>;

    fn convert(&self, image: ScratchImage, format: PixelFormat) -> EnvmapResult<ScratchImage>;

    fn save(&self, path: &Path, image: &ScratchImage) -> EnvmapResult<()>;
}

/// The shipped codec: DDS through `ddsfile`, everything else through `image`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DdsCodec;

impl Codec for DdsCodec {
    fn load(&self, path: &Path) -> EnvmapResult<ScratchImage> {
        load::load_image(path)
    }

    fn merge_planes(&self, image: ScratchImage) -> EnvmapResult<ScratchImage> {
        convert::merge_planes(image)
    }

    fn decompress(&self, image: ScratchImage) -> EnvmapResult<ScratchImage> {
        decompress::decompress(image)
    }

    fn premultiply_reverse(
        &self,
        image: ScratchImage,
        srgb: SrgbFlags,
    ) -> EnvmapResult<ScratchImage> {
        convert::premultiply_reverse(image, srgb)
    }

    fn resize(
        &self,
        image: ScratchImage,
        width: u32,
        height: u32,
        opts: ResizeOptions,
    ) -> EnvmapResult<ScratchImage> {
        convert::resize(image, width, height, opts)
    }

    fn convert(&self, image: ScratchImage, format: PixelFormat) -> EnvmapResult<ScratchImage> {
        convert::convert(image, format)
    }

    fn save(&self, path: &Path, image: &ScratchImage) -> EnvmapResult<()> {
        dds::write_dds(path, image)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/mod.rs"]
mod tests;
