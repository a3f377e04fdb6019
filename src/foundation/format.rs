use std::fmt;
use std::str::FromStr;

/// Pixel formats the tool reads, renders and writes.
///
/// Names follow the DXGI spelling (`R8G8B8A8_UNORM`) because that is what ends up in the DDS
/// header and what users pass on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    R32G32B32A32Float,
    R32G32B32Float,
    R16G16B16A16Float,
    R16G16B16A16Unorm,
    R32G32Float,
    R10G10B10A2Unorm,
    R11G11B10Float,
    R8G8B8A8Unorm,
    R8G8B8A8UnormSrgb,
    R16G16Float,
    R16G16Unorm,
    R32Float,
    R8G8Unorm,
    R16Float,
    R16Unorm,
    R8Unorm,
    R8Uint,
    A8Unorm,
    B5G6R5Unorm,
    B5G5R5A1Unorm,
    B8G8R8A8Unorm,
    B8G8R8A8UnormSrgb,
    B8G8R8X8Unorm,
    Bc1Unorm,
    Bc1UnormSrgb,
    Bc2Unorm,
    Bc2UnormSrgb,
    Bc3Unorm,
    Bc3UnormSrgb,
    Bc4Unorm,
    Bc4Snorm,
    Bc5Unorm,
    Bc5Snorm,
    Bc6hUf16,
    Bc6hSf16,
    Bc7Unorm,
    Bc7UnormSrgb,
    Nv12,
    P010,
}

/// Numeric interpretation of a format's channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatType {
    Float,
    Unorm,
    Snorm,
    Uint,
}

/// Formats accepted as an explicit render target (`-f`), in listing order.
pub const RENDER_TARGET_FORMATS: [PixelFormat; 20] = [
    PixelFormat::R32G32B32A32Float,
    PixelFormat::R16G16B16A16Float,
    PixelFormat::R16G16B16A16Unorm,
    PixelFormat::R32G32Float,
    PixelFormat::R10G10B10A2Unorm,
    PixelFormat::R11G11B10Float,
    PixelFormat::R8G8B8A8Unorm,
    PixelFormat::R8G8B8A8UnormSrgb,
    PixelFormat::R16G16Float,
    PixelFormat::R16G16Unorm,
    PixelFormat::R32Float,
    PixelFormat::R8G8Unorm,
    PixelFormat::R16Float,
    PixelFormat::R16Unorm,
    PixelFormat::R8Unorm,
    PixelFormat::R8Uint,
    PixelFormat::A8Unorm,
    PixelFormat::B5G6R5Unorm,
    PixelFormat::B8G8R8A8Unorm,
    PixelFormat::B8G8R8A8UnormSrgb,
];

/// Short names accepted in place of a full format name.
pub const FORMAT_ALIASES: [(&str, PixelFormat); 4] = [
    ("RGBA", PixelFormat::R8G8B8A8Unorm),
    ("BGRA", PixelFormat::B8G8R8A8Unorm),
    ("FP16", PixelFormat::R16G16B16A16Float),
    ("FP32", PixelFormat::R32G32B32A32Float),
];

impl PixelFormat {
    pub fn name(self) -> &'static str {
        use PixelFormat::*;
        match self {
            R32G32B32A32Float => "R32G32B32A32_FLOAT",
            R32G32B32Float => "R32G32B32_FLOAT",
            R16G16B16A16Float => "R16G16B16A16_FLOAT",
            R16G16B16A16Unorm => "R16G16B16A16_UNORM",
            R32G32Float => "R32G32_FLOAT",
            R10G10B10A2Unorm => "R10G10B10A2_UNORM",
            R11G11B10Float => "R11G11B10_FLOAT",
            R8G8B8A8Unorm => "R8G8B8A8_UNORM",
            R8G8B8A8UnormSrgb => "R8G8B8A8_UNORM_SRGB",
            R16G16Float => "R16G16_FLOAT",
            R16G16Unorm => "R16G16_UNORM",
            R32Float => "R32_FLOAT",
            R8G8Unorm => "R8G8_UNORM",
            R16Float => "R16_FLOAT",
            R16Unorm => "R16_UNORM",
            R8Unorm => "R8_UNORM",
            R8Uint => "R8_UINT",
            A8Unorm => "A8_UNORM",
            B5G6R5Unorm => "B5G6R5_UNORM",
            B5G5R5A1Unorm => "B5G5R5A1_UNORM",
            B8G8R8A8Unorm => "B8G8R8A8_UNORM",
            B8G8R8A8UnormSrgb => "B8G8R8A8_UNORM_SRGB",
            B8G8R8X8Unorm => "B8G8R8X8_UNORM",
            Bc1Unorm => "BC1_UNORM",
            Bc1UnormSrgb => "BC1_UNORM_SRGB",
            Bc2Unorm => "BC2_UNORM",
            Bc2UnormSrgb => "BC2_UNORM_SRGB",
            Bc3Unorm => "BC3_UNORM",
            Bc3UnormSrgb => "BC3_UNORM_SRGB",
            Bc4Unorm => "BC4_UNORM",
            Bc4Snorm => "BC4_SNORM",
            Bc5Unorm => "BC5_UNORM",
            Bc5Snorm => "BC5_SNORM",
            Bc6hUf16 => "BC6H_UF16",
            Bc6hSf16 => "BC6H_SF16",
            Bc7Unorm => "BC7_UNORM",
            Bc7UnormSrgb => "BC7_UNORM_SRGB",
            Nv12 => "NV12",
            P010 => "P010",
        }
    }

    /// Case-insensitive lookup over [`RENDER_TARGET_FORMATS`] and [`FORMAT_ALIASES`].
    pub fn parse_target(name: &str) -> Option<Self> {
        RENDER_TARGET_FORMATS
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .or_else(|| {
                FORMAT_ALIASES
                    .iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
                    .map(|(_, f)| *f)
            })
    }

    pub fn is_compressed(self) -> bool {
        self.block_bytes().is_some()
    }

    pub fn is_planar(self) -> bool {
        matches!(self, Self::Nv12 | Self::P010)
    }

    /// Bytes per 4x4 block for block-compressed formats.
    pub fn block_bytes(self) -> Option<usize> {
        use PixelFormat::*;
        match self {
            Bc1Unorm | Bc1UnormSrgb | Bc4Unorm | Bc4Snorm => Some(8),
            Bc2Unorm | Bc2UnormSrgb | Bc3Unorm | Bc3UnormSrgb | Bc5Unorm | Bc5Snorm
            | Bc6hUf16 | Bc6hSf16 | Bc7Unorm | Bc7UnormSrgb => Some(16),
            _ => None,
        }
    }

    pub fn bits_per_pixel(self) -> u32 {
        use PixelFormat::*;
        match self {
            R32G32B32A32Float => 128,
            R32G32B32Float => 96,
            R16G16B16A16Float | R16G16B16A16Unorm | R32G32Float => 64,
            R10G10B10A2Unorm | R11G11B10Float | R8G8B8A8Unorm | R8G8B8A8UnormSrgb
            | R16G16Float | R16G16Unorm | R32Float | B8G8R8A8Unorm | B8G8R8A8UnormSrgb
            | B8G8R8X8Unorm => 32,
            R8G8Unorm | R16Float | R16Unorm | B5G6R5Unorm | B5G5R5A1Unorm => 16,
            R8Unorm | R8Uint | A8Unorm => 8,
            Bc1Unorm | Bc1UnormSrgb | Bc4Unorm | Bc4Snorm => 4,
            Bc2Unorm | Bc2UnormSrgb | Bc3Unorm | Bc3UnormSrgb | Bc5Unorm | Bc5Snorm
            | Bc6hUf16 | Bc6hSf16 | Bc7Unorm | Bc7UnormSrgb => 8,
            Nv12 => 12,
            P010 => 24,
        }
    }

    /// Bytes per texel for uncompressed, single-plane formats.
    pub fn bytes_per_texel(self) -> Option<usize> {
        if self.is_compressed() || self.is_planar() {
            None
        } else {
            Some(self.bits_per_pixel() as usize / 8)
        }
    }

    pub fn has_alpha(self) -> bool {
        use PixelFormat::*;
        matches!(
            self,
            R32G32B32A32Float
                | R16G16B16A16Float
                | R16G16B16A16Unorm
                | R10G10B10A2Unorm
                | R8G8B8A8Unorm
                | R8G8B8A8UnormSrgb
                | A8Unorm
                | B5G5R5A1Unorm
                | B8G8R8A8Unorm
                | B8G8R8A8UnormSrgb
                | Bc1Unorm
                | Bc1UnormSrgb
                | Bc2Unorm
                | Bc2UnormSrgb
                | Bc3Unorm
                | Bc3UnormSrgb
                | Bc7Unorm
                | Bc7UnormSrgb
        )
    }

    pub fn is_pure_alpha(self) -> bool {
        matches!(self, Self::A8Unorm)
    }

    pub fn format_type(self) -> FormatType {
        use PixelFormat::*;
        match self {
            R32G32B32A32Float | R32G32B32Float | R16G16B16A16Float | R32G32Float
            | R11G11B10Float | R16G16Float | R32Float | R16Float | Bc6hUf16 | Bc6hSf16 => {
                FormatType::Float
            }
            Bc4Snorm | Bc5Snorm => FormatType::Snorm,
            R8Uint => FormatType::Uint,
            _ => FormatType::Unorm,
        }
    }

    pub fn is_float(self) -> bool {
        self.format_type() == FormatType::Float
    }

    pub fn is_srgb(self) -> bool {
        use PixelFormat::*;
        matches!(
            self,
            R8G8B8A8UnormSrgb
                | B8G8R8A8UnormSrgb
                | Bc1UnormSrgb
                | Bc2UnormSrgb
                | Bc3UnormSrgb
                | Bc7UnormSrgb
        )
    }

    /// The `_SRGB` variant of a linear format, if one exists.
    pub fn to_srgb(self) -> Option<Self> {
        use PixelFormat::*;
        match self {
            R8G8B8A8Unorm | R8G8B8A8UnormSrgb => Some(R8G8B8A8UnormSrgb),
            B8G8R8A8Unorm | B8G8R8A8UnormSrgb => Some(B8G8R8A8UnormSrgb),
            Bc1Unorm | Bc1UnormSrgb => Some(Bc1UnormSrgb),
            Bc2Unorm | Bc2UnormSrgb => Some(Bc2UnormSrgb),
            Bc3Unorm | Bc3UnormSrgb => Some(Bc3UnormSrgb),
            Bc7Unorm | Bc7UnormSrgb => Some(Bc7UnormSrgb),
            _ => None,
        }
    }

    /// Size in bytes of one row and one 2D slice at the given extent.
    pub fn pitch(self, width: u32, height: u32) -> (usize, usize) {
        let w = width.max(1) as usize;
        let h = height.max(1) as usize;
        if let Some(block) = self.block_bytes() {
            let row = w.div_ceil(4).max(1) * block;
            return (row, row * h.div_ceil(4).max(1));
        }
        match self {
            Self::Nv12 => {
                let row = w.div_ceil(2) * 2;
                (row, row * (h + h.div_ceil(2)))
            }
            Self::P010 => {
                let row = w.div_ceil(2) * 2 * 2;
                (row, row * (h + h.div_ceil(2)))
            }
            _ => {
                let row = (w * self.bits_per_pixel() as usize).div_ceil(8);
                (row, row * h)
            }
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_target(s).ok_or_else(|| format!("invalid format '{s}'"))
    }
}

impl serde::Serialize for PixelFormat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/format.rs"]
mod tests;
