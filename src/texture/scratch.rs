use crate::{
    foundation::error::{EnvmapError, EnvmapResult},
    texture::descriptor::ImageDescriptor,
};

/// Raw pixel data for every array item and mip level of one image.
///
/// Layout matches a DDS payload: items in order, each item's mip chain in order, each mip
/// holding all of its depth slices tightly packed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    bytes: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One mip level of one array item.
#[derive(Clone, Copy, Debug)]
pub struct Subresource<'a> {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub row_pitch: usize,
    pub slice_pitch: usize,
    pub data: &'a [u8],
}

/// An [`ImageDescriptor`] paired with the [`PixelBuffer`] it describes.
///
/// Construction checks that the buffer length matches the descriptor, so every stage that
/// receives a `ScratchImage` can index subresources without re-validating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScratchImage {
    desc: ImageDescriptor,
    pixels: PixelBuffer,
}

impl ScratchImage {
    pub fn new(desc: ImageDescriptor, bytes: Vec<u8>) -> EnvmapResult<Self> {
        desc.validate()?;
        let expected = desc.total_bytes();
        if bytes.len() != expected {
            return Err(EnvmapError::input(format!(
                "pixel buffer holds {} bytes but {} needs {}",
                bytes.len(),
                desc,
                expected
            )));
        }
        Ok(Self {
            desc,
            pixels: PixelBuffer::from_vec(bytes),
        })
    }

    pub fn desc(&self) -> &ImageDescriptor {
        &self.desc
    }

    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    pub fn into_parts(self) -> (ImageDescriptor, PixelBuffer) {
        (self.desc, self.pixels)
    }

    fn offset_of(&self, item: u32, mip: u32) -> usize {
        let before_mips: usize = (0..mip).map(|m| self.desc.mip_bytes(m)).sum();
        item as usize * self.desc.item_bytes() + before_mips
    }

    pub fn subresource(&self, item: u32, mip: u32) -> Option<Subresource<'_>> {
        if item >= self.desc.array_size || mip >= self.desc.mip_levels {
            return None;
        }
        let (width, height, depth) = self.desc.mip_extent(mip);
        let (row_pitch, slice_pitch) = self.desc.format.pitch(width, height);
        let start = self.offset_of(item, mip);
        let len = slice_pitch * depth as usize;
        let data = self.pixels.as_bytes().get(start..start + len)?;
        Some(Subresource {
            width,
            height,
            depth,
            row_pitch,
            slice_pitch,
            data,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/scratch.rs"]
mod tests;
