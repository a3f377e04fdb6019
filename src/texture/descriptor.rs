use std::fmt;

use crate::foundation::{
    error::{EnvmapError, EnvmapResult},
    format::PixelFormat,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TextureDimension {
    Tex1D,
    Tex2D,
    Tex3D,
}

/// How the alpha channel relates to the colour channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub enum AlphaMode {
    #[default]
    Unknown,
    Straight,
    Premultiplied,
    Opaque,
    Custom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct MiscFlags {
    pub cubemap: bool,
}

/// Geometry, format and metadata of one image. Carries no pixels.
///
/// Invariants (checked by [`ImageDescriptor::validate`]):
/// - `depth > 1` only for [`TextureDimension::Tex3D`]
/// - `array_size > 1` only for 1D/2D
/// - a cubemap is 2D with `array_size` a multiple of 6
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub array_size: u32,
    pub mip_levels: u32,
    pub format: PixelFormat,
    pub dimension: TextureDimension,
    pub misc: MiscFlags,
    pub alpha_mode: AlphaMode,
}

impl ImageDescriptor {
    /// A single 2D image with one mip level.
    pub fn new_2d(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            depth: 1,
            array_size: 1,
            mip_levels: 1,
            format,
            dimension: TextureDimension::Tex2D,
            misc: MiscFlags::default(),
            alpha_mode: AlphaMode::Unknown,
        }
    }

    pub fn validate(&self) -> EnvmapResult<()> {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(EnvmapError::input("image has a zero-sized extent"));
        }
        if self.array_size == 0 || self.mip_levels == 0 {
            return Err(EnvmapError::input(
                "image needs at least one array item and one mip level",
            ));
        }
        match self.dimension {
            TextureDimension::Tex3D => {
                if self.array_size > 1 {
                    return Err(EnvmapError::input("volume textures cannot be arrays"));
                }
                if self.misc.cubemap {
                    return Err(EnvmapError::input("volume textures cannot be cubemaps"));
                }
            }
            TextureDimension::Tex1D | TextureDimension::Tex2D => {
                if self.depth > 1 {
                    return Err(EnvmapError::input("only volume textures have depth > 1"));
                }
            }
        }
        if self.misc.cubemap
            && (self.dimension != TextureDimension::Tex2D || self.array_size % 6 != 0)
        {
            return Err(EnvmapError::input(
                "cubemaps must be 2D with an array size that is a multiple of 6",
            ));
        }
        if self.mip_levels > max_mip_levels(self.width, self.height, self.depth) {
            return Err(EnvmapError::input(format!(
                "{} mip levels exceed the full chain for {}x{}",
                self.mip_levels, self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn is_cubemap(&self) -> bool {
        self.misc.cubemap
    }

    pub fn is_volume(&self) -> bool {
        self.dimension == TextureDimension::Tex3D
    }

    pub fn is_pm_alpha(&self) -> bool {
        self.alpha_mode == AlphaMode::Premultiplied
    }

    /// Same extent, array, mips, flags and dimension. Format and alpha mode may differ.
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.depth == other.depth
            && self.array_size == other.array_size
            && self.mip_levels == other.mip_levels
            && self.misc == other.misc
            && self.dimension == other.dimension
    }

    /// Extent of one mip level: `(width, height, depth)`.
    pub fn mip_extent(&self, level: u32) -> (u32, u32, u32) {
        let w = (self.width >> level).max(1);
        let h = (self.height >> level).max(1);
        let d = if self.is_volume() {
            (self.depth >> level).max(1)
        } else {
            1
        };
        (w, h, d)
    }

    /// Bytes of one mip level of one array item, all depth slices included.
    pub fn mip_bytes(&self, level: u32) -> usize {
        let (w, h, d) = self.mip_extent(level);
        self.format.pitch(w, h).1 * d as usize
    }

    /// Bytes of one array item including its full mip chain.
    pub fn item_bytes(&self) -> usize {
        (0..self.mip_levels).map(|m| self.mip_bytes(m)).sum()
    }

    pub fn total_bytes(&self) -> usize {
        self.item_bytes() * self.array_size as usize
    }
}

pub(crate) fn max_mip_levels(width: u32, height: u32, depth: u32) -> u32 {
    let largest = width.max(height).max(depth).max(1);
    32 - largest.leading_zeros()
}

/// Renders the one-line summary printed while reading and writing images, e.g.
/// `(512x512,6 R8G8B8A8_UNORM Cube a:Opaque)`.
impl fmt::Display for ImageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}x{}", self.width, self.height)?;
        if self.is_volume() {
            write!(f, "x{}", self.depth)?;
        }
        if self.mip_levels > 1 {
            write!(f, ",{}", self.mip_levels)?;
        }
        if self.array_size > 1 {
            write!(f, ",{}", self.array_size)?;
        }
        write!(f, " {}", self.format)?;

        let kind = match self.dimension {
            TextureDimension::Tex1D if self.array_size > 1 => "1DArray",
            TextureDimension::Tex1D => "1D",
            TextureDimension::Tex2D if self.is_cubemap() && self.array_size > 6 => "CubeArray",
            TextureDimension::Tex2D if self.is_cubemap() => "Cube",
            TextureDimension::Tex2D if self.array_size > 1 => "2DArray",
            TextureDimension::Tex2D => "2D",
            TextureDimension::Tex3D => "3D",
        };
        write!(f, " {kind}")?;

        match self.alpha_mode {
            AlphaMode::Opaque => f.write_str(" a:Opaque")?,
            AlphaMode::Premultiplied => f.write_str(" a:PM")?,
            AlphaMode::Straight => f.write_str(" a:NonPM")?,
            AlphaMode::Custom => f.write_str(" a:Custom")?,
            AlphaMode::Unknown => {}
        }
        f.write_str(")")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/descriptor.rs"]
mod tests;
