use glam::Mat4;

use crate::{
    codec::{Codec, ResizeOptions},
    foundation::{
        error::{EnvmapError, EnvmapResult},
        format::PixelFormat,
    },
    render::{
        device::GpuContext,
        pipeline::{AddressMode, PipelineStateSet},
        target::FaceTarget,
    },
    sizing::resolver::FaceSize,
    texture::{
        descriptor::{AlphaMode, ImageDescriptor},
        scratch::ScratchImage,
    },
};

/// Faces per cube, in DDS array order (+X, -X, +Y, -Y, +Z, -Z).
pub const CUBE_FACES: usize = 6;

/// Background used when a source does not exactly cover its face.
const BACKGROUND: wgpu::Color = wgpu::Color::BLACK;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Filtering used when a source has to shrink to fit the device.
    pub resize: ResizeOptions,
    /// Source bytes are sRGB encoded regardless of their declared format.
    pub srgb_in: bool,
}

/// Sampleable format a normalized source is uploaded in.
pub fn upload_format(format: PixelFormat, srgb_in: bool) -> PixelFormat {
    use PixelFormat::*;
    let deep = matches!(
        format,
        R16G16B16A16Unorm | R16G16Unorm | R16Unorm | R10G10B10A2Unorm
    );
    if format.is_float() || deep {
        R16G16B16A16Float
    } else if srgb_in || format.is_srgb() {
        R8G8B8A8UnormSrgb
    } else {
        R8G8B8A8Unorm
    }
}

/// Extent that fits `(width, height)` under `max` on both axes, aspect kept.
pub(crate) fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max {
        return (width, height);
    }
    let scale = |v: u32| ((u64::from(v) * u64::from(max)) / u64::from(longest)).max(1) as u32;
    (scale(width), scale(height))
}

/// Shrink oversized sources and convert into the upload format.
pub fn prepare_source(
    codec: &dyn Codec,
    image: ScratchImage,
    max_dimension: u32,
    opts: &RenderOptions,
) -> EnvmapResult<ScratchImage> {
    let src = *image.desc();
    let (w, h) = fit_within(src.width, src.height, max_dimension);
    let image = if (w, h) != (src.width, src.height) {
        tracing::debug!(from = %src, width = w, height = h, "shrinking source to device limit");
        codec.resize(image, w, h, opts.resize)?
    } else {
        image
    };

    let target = upload_format(src.format, opts.srgb_in);
    if target == PixelFormat::R8G8B8A8UnormSrgb && !src.format.is_srgb() {
        // bytes are already sRGB; convert the layout, then relabel
        let linear = codec.convert(image, PixelFormat::R8G8B8A8Unorm)?;
        let (desc, pixels) = linear.into_parts();
        return ScratchImage::new(
            ImageDescriptor {
                format: target,
                ..desc
            },
            pixels.into_vec(),
        );
    }
    codec.convert(image, target)
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

/// Row layout of the buffer one face is copied into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ReadbackLayout {
    pub(crate) row_bytes: u32,
    pub(crate) padded_row_bytes: u32,
    pub(crate) size: u64,
}

impl ReadbackLayout {
    pub(crate) fn new(size: FaceSize, format: PixelFormat) -> EnvmapResult<Self> {
        let texel_bytes = format
            .bytes_per_texel()
            .ok_or_else(|| EnvmapError::resource(format!("{format} has no texel size")))?;
        let row_bytes = u32::try_from(texel_bytes)
            .ok()
            .and_then(|t| size.width.checked_mul(t))
            .filter(|r| r.checked_add(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT).is_some())
            .ok_or_else(|| EnvmapError::resource("face row size overflow"))?;
        let padded_row_bytes = align_to(row_bytes, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        Ok(Self {
            row_bytes,
            padded_row_bytes,
            size: u64::from(padded_row_bytes) * u64::from(size.height),
        })
    }

    /// Fails with a resource error when the buffer would exceed `max_buffer_size`.
    pub(crate) fn check_limit(&self, max_buffer_size: u64) -> EnvmapResult<()> {
        if self.size > max_buffer_size {
            return Err(EnvmapError::resource(format!(
                "face readback needs {} bytes, device buffers are limited to {max_buffer_size}",
                self.size
            )));
        }
        Ok(())
    }
}

/// Run `op` inside validation and out-of-memory error scopes. A captured validation error
/// becomes `fault(face, message)`; running out of memory is a resource error.
fn scoped<T>(
    device: &wgpu::Device,
    face: usize,
    fault: impl FnOnce(usize, String) -> EnvmapError,
    op: impl FnOnce() -> EnvmapResult<T>,
) -> EnvmapResult<T> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let out = op();
    let validation = pollster::block_on(device.pop_error_scope());
    let oom = pollster::block_on(device.pop_error_scope());
    let value = out?;
    if let Some(err) = oom {
        return Err(EnvmapError::resource(format!("face {face}: {err}")));
    }
    match validation {
        Some(err) => Err(fault(face, err.to_string())),
        None => Ok(value),
    }
}

/// Draws each source onto its face and reads the result back.
pub struct CubeRasterizer<'a> {
    ctx: &'a GpuContext,
    states: PipelineStateSet,
    size: FaceSize,
    format: PixelFormat,
    texture_format: wgpu::TextureFormat,
    readback: ReadbackLayout,
}

impl<'a> CubeRasterizer<'a> {
    /// Checks format support and device limits before building any pipeline state.
    pub fn new(
        ctx: &'a GpuContext,
        format: PixelFormat,
        size: FaceSize,
        address_mode: AddressMode,
    ) -> EnvmapResult<Self> {
        let texture_format = ctx.ensure_format_support(format)?;
        let max = ctx.max_texture_dimension();
        if size.width > max || size.height > max {
            return Err(EnvmapError::resource(format!(
                "face size {size} exceeds the device limit of {max}"
            )));
        }
        let readback = ReadbackLayout::new(size, format)?;
        readback.check_limit(ctx.max_buffer_size())?;
        let states = PipelineStateSet::new(ctx.device(), texture_format, address_mode);
        Ok(Self {
            ctx,
            states,
            size,
            format,
            texture_format,
            readback,
        })
    }

    /// Render six prepared sources in order, one face at a time.
    pub fn render_faces(&self, sources: &[ScratchImage]) -> EnvmapResult<Vec<ScratchImage>> {
        if sources.len() != CUBE_FACES {
            return Err(EnvmapError::InputCount {
                count: sources.len(),
            });
        }
        sources
            .iter()
            .enumerate()
            .map(|(face, source)| self.render_face(face, source))
            .collect()
    }

    pub fn render_face(&self, face: usize, source: &ScratchImage) -> EnvmapResult<ScratchImage> {
        let device = self.ctx.device();
        let target = scoped(device, face, |f, m| EnvmapError::capture(f, m), || {
            Ok(FaceTarget::new(
                device,
                self.size.width,
                self.size.height,
                self.format,
                self.texture_format,
            ))
        })?;
        scoped(device, face, |f, m| EnvmapError::device(f, m), || {
            self.draw(face, source, &target)
        })?;
        let pixels = scoped(device, face, |f, m| EnvmapError::capture(f, m), || {
            self.capture(face, &target)
        })?;
        let desc = ImageDescriptor {
            alpha_mode: if self.format.has_alpha() {
                source.desc().alpha_mode
            } else {
                AlphaMode::Opaque
            },
            ..ImageDescriptor::new_2d(target.width, target.height, target.format)
        };
        tracing::debug!(face, "face captured");
        ScratchImage::new(desc, pixels).map_err(|e| EnvmapError::capture(face, e.to_string()))
    }

    fn upload(&self, face: usize, source: &ScratchImage) -> EnvmapResult<wgpu::TextureView> {
        let desc = source.desc();
        let texture_format = match desc.format {
            PixelFormat::R8G8B8A8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            PixelFormat::R8G8B8A8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            PixelFormat::R16G16B16A16Float => wgpu::TextureFormat::Rgba16Float,
            other => {
                return Err(EnvmapError::device(
                    face,
                    format!("source in {other} was not prepared for upload"),
                ));
            }
        };
        let sub = source
            .subresource(0, 0)
            .ok_or_else(|| EnvmapError::device(face, "source has no top-level image"))?;

        let size = wgpu::Extent3d {
            width: sub.width,
            height: sub.height,
            depth_or_array_layers: 1,
        };
        let texture = self.ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("envmap_face_source"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.ctx.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            sub.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(sub.row_pitch as u32),
                rows_per_image: Some(sub.height),
            },
            size,
        );
        Ok(texture.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    fn draw(&self, face: usize, source: &ScratchImage, target: &FaceTarget) -> EnvmapResult<()> {
        let device = self.ctx.device();
        let queue = self.ctx.queue();
        let source_view = self.upload(face, source)?;
        let bind_group = self.states.bind_source(device, &source_view);
        self.states.write_transform(queue, &Mat4::IDENTITY);

        let covers = source.desc().width == target.width && source.desc().height == target.height;
        let load = if covers {
            wgpu::LoadOp::Load
        } else {
            wgpu::LoadOp::Clear(BACKGROUND)
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("envmap_face_encoder"),
        });
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("envmap_face_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let [x, y, w, h, min_depth, max_depth] = target.viewport();
            rp.set_viewport(x, y, w, h, min_depth, max_depth);
            rp.set_pipeline(&self.states.pipeline);
            rp.set_bind_group(0, &bind_group, &[]);
            rp.set_vertex_buffer(0, self.states.vertices.slice(..));
            rp.set_index_buffer(self.states.indices.slice(..), wgpu::IndexFormat::Uint16);
            rp.draw_indexed(0..self.states.index_count, 0, 0..1);
        }
        queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn capture(&self, face: usize, target: &FaceTarget) -> EnvmapResult<Vec<u8>> {
        let device = self.ctx.device();
        let queue = self.ctx.queue();

        let ReadbackLayout {
            row_bytes,
            padded_row_bytes,
            size,
        } = self.readback;

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("envmap_readback"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("envmap_readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(target.height),
                },
            },
            wgpu::Extent3d {
                width: target.width,
                height: target.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(Some(encoder.finish()));

        let buffer_slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| EnvmapError::capture(face, format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| EnvmapError::capture(face, "readback channel closed"))?
            .map_err(|e| EnvmapError::capture(face, format!("readback map failed: {e:?}")))?;

        let mapped = buffer_slice.get_mapped_range();
        let row_bytes = row_bytes as usize;
        let padded_row_bytes = padded_row_bytes as usize;
        let mut out = Vec::with_capacity(row_bytes * target.height as usize);
        for row in 0..target.height as usize {
            let start = row * padded_row_bytes;
            out.extend_from_slice(&mapped[start..start + row_bytes]);
        }
        drop(mapped);
        readback.unmap();
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/rasterizer.rs"]
mod tests;
