use crate::{foundation::format::PixelFormat, render::device::FACE_TARGET_USAGES};

/// One cube face render target and its view.
pub struct FaceTarget {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl FaceTarget {
    pub(crate) fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: PixelFormat,
        texture_format: wgpu::TextureFormat,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("envmap_face_target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format,
            usage: FACE_TARGET_USAGES,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
            format,
        }
    }

    /// Full-extent viewport: `(x, y, w, h, min_depth, max_depth)`.
    pub fn viewport(&self) -> [f32; 6] {
        [0.0, 0.0, self.width as f32, self.height as f32, 0.0, 1.0]
    }
}
