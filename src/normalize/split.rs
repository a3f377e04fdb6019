use crate::{
    foundation::error::{EnvmapError, EnvmapResult},
    texture::{
        descriptor::{ImageDescriptor, MiscFlags},
        scratch::ScratchImage,
    },
};

/// Expand an array (or cubemap) into one independent image per item.
///
/// Each item keeps only its top mip level. Single images pass through unchanged. An item
/// that cannot be extracted is an input error, not a skip.
pub fn split_array(image: ScratchImage) -> EnvmapResult<Vec<ScratchImage>> {
    let src = *image.desc();
    if src.array_size <= 1 {
        return Ok(vec![image]);
    }

    let desc = ImageDescriptor {
        array_size: 1,
        mip_levels: 1,
        misc: MiscFlags::default(),
        ..src
    };
    (0..src.array_size)
        .map(|item| {
            let sub = image
                .subresource(item, 0)
                .filter(|s| s.width > 0 && s.height > 0 && !s.data.is_empty())
                .ok_or_else(|| {
                    EnvmapError::input(format!(
                        "failed to extract item {item} of {} from {src}",
                        src.array_size
                    ))
                })?;
            ScratchImage::new(desc, sub.data.to_vec())
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/split.rs"]
mod tests;
