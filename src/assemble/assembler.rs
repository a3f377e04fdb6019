use crate::{
    foundation::error::{EnvmapError, EnvmapResult},
    render::rasterizer::CUBE_FACES,
    texture::{
        descriptor::{ImageDescriptor, MiscFlags, TextureDimension},
        scratch::ScratchImage,
    },
};

/// Pack six captured faces into one cubemap texture array.
///
/// Faces must agree on width, height and format. Alpha mode and mip count are not compared;
/// only the top level of each face is kept.
pub fn assemble_cubemap(faces: Vec<ScratchImage>) -> EnvmapResult<ScratchImage> {
    if faces.len() != CUBE_FACES {
        return Err(EnvmapError::InputCount { count: faces.len() });
    }
    let first = *faces[0].desc();
    for (i, face) in faces.iter().enumerate().skip(1) {
        let d = face.desc();
        if d.width != first.width || d.height != first.height || d.format != first.format {
            return Err(EnvmapError::input(format!(
                "face {i} {d} does not match face 0 {first}"
            )));
        }
    }

    let desc = ImageDescriptor {
        depth: 1,
        array_size: CUBE_FACES as u32,
        mip_levels: 1,
        dimension: TextureDimension::Tex2D,
        misc: MiscFlags { cubemap: true },
        ..first
    };
    let mut pixels = Vec::with_capacity(desc.total_bytes());
    for (i, face) in faces.iter().enumerate() {
        let top = face
            .subresource(0, 0)
            .ok_or_else(|| EnvmapError::input(format!("face {i} has no top-level image")))?;
        pixels.extend_from_slice(top.data);
    }
    ScratchImage::new(desc, pixels)
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/assembler.rs"]
mod tests;
