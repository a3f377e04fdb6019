use crate::foundation::{
    error::{EnvmapError, EnvmapResult},
    format::PixelFormat,
};

/// Which adapter the GPU context binds to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdapterChoice {
    /// High-performance hardware adapter, falling back to a software one.
    #[default]
    Auto,
    /// N-th adapter in enumeration order.
    Index(usize),
}

/// One enumerated adapter, as printed by `envmap adapters`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AdapterSummary {
    pub index: usize,
    pub name: String,
    pub backend: String,
    pub device_type: String,
}

impl AdapterSummary {
    fn from_info(index: usize, info: &wgpu::AdapterInfo) -> Self {
        Self {
            index,
            name: info.name.clone(),
            backend: format!("{:?}", info.backend),
            device_type: format!("{:?}", info.device_type),
        }
    }
}

impl std::fmt::Display for AdapterSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({}, {})",
            self.index, self.name, self.backend, self.device_type
        )
    }
}

/// Features requested when the adapter offers them; they widen the renderable format set.
const OPTIONAL_FEATURES: wgpu::Features = wgpu::Features::TEXTURE_FORMAT_16BIT_NORM
    .union(wgpu::Features::RG11B10UFLOAT_RENDERABLE);

/// Usages a face render target needs: drawn into, sampled, then copied out.
pub(crate) const FACE_TARGET_USAGES: wgpu::TextureUsages = wgpu::TextureUsages::RENDER_ATTACHMENT
    .union(wgpu::TextureUsages::TEXTURE_BINDING)
    .union(wgpu::TextureUsages::COPY_SRC);

/// Texture format a render-target pixel format is drawn in, when one exists with the same
/// byte layout.
pub fn render_target_format(format: PixelFormat) -> Option<wgpu::TextureFormat> {
    use PixelFormat::*;
    use wgpu::TextureFormat as T;
    Some(match format {
        R32G32B32A32Float => T::Rgba32Float,
        R16G16B16A16Float => T::Rgba16Float,
        R16G16B16A16Unorm => T::Rgba16Unorm,
        R32G32Float => T::Rg32Float,
        R10G10B10A2Unorm => T::Rgb10a2Unorm,
        R11G11B10Float => T::Rg11b10Ufloat,
        R8G8B8A8Unorm => T::Rgba8Unorm,
        R8G8B8A8UnormSrgb => T::Rgba8UnormSrgb,
        R16G16Float => T::Rg16Float,
        R16G16Unorm => T::Rg16Unorm,
        R32Float => T::R32Float,
        R8G8Unorm => T::Rg8Unorm,
        R16Float => T::R16Float,
        R16Unorm => T::R16Unorm,
        R8Unorm => T::R8Unorm,
        B8G8R8A8Unorm => T::Bgra8Unorm,
        B8G8R8A8UnormSrgb => T::Bgra8UnormSrgb,
        _ => return None,
    })
}

/// Decide whether `format` can be a face target given what the adapter reports for it and
/// which features the device was opened with.
pub(crate) fn check_format_support(
    format: PixelFormat,
    features: Option<wgpu::TextureFormatFeatures>,
    device_features: wgpu::Features,
) -> EnvmapResult<wgpu::TextureFormat> {
    let unsupported = || EnvmapError::FormatSupport { format };
    let texture_format = render_target_format(format).ok_or_else(unsupported)?;
    if !device_features.contains(texture_format.required_features()) {
        return Err(unsupported());
    }
    let features = features.ok_or_else(unsupported)?;
    if !features.allowed_usages.contains(FACE_TARGET_USAGES) {
        return Err(unsupported());
    }
    Ok(texture_format)
}

/// List every adapter the default instance can see.
pub fn list_adapters() -> Vec<AdapterSummary> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    instance
        .enumerate_adapters(wgpu::Backends::all())
        .iter()
        .enumerate()
        .map(|(i, a)| AdapterSummary::from_info(i, &a.get_info()))
        .collect()
}

fn request_adapter(
    instance: &wgpu::Instance,
    force_fallback_adapter: bool,
) -> Result<wgpu::Adapter, wgpu::RequestAdapterError> {
    pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter,
    }))
}

/// Device, queue and the adapter they came from. Everything GPU-side in a run borrows this.
pub struct GpuContext {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    summary: AdapterSummary,
}

impl GpuContext {
    pub fn new(choice: AdapterChoice) -> EnvmapResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let (index, adapter) = match choice {
            AdapterChoice::Index(index) => {
                let mut adapters = instance.enumerate_adapters(wgpu::Backends::all());
                if index >= adapters.len() {
                    return Err(EnvmapError::resource(format!(
                        "invalid adapter index ({index}); {} adapter(s) available",
                        adapters.len()
                    )));
                }
                (index, adapters.swap_remove(index))
            }
            AdapterChoice::Auto => {
                let adapter = request_adapter(&instance, false)
                    .or_else(|_| request_adapter(&instance, true))
                    .map_err(|e| match e {
                        wgpu::RequestAdapterError::NotFound { .. } => {
                            EnvmapError::resource("no gpu adapter available")
                        }
                        other => EnvmapError::resource(format!(
                            "wgpu request_adapter failed: {other:?}"
                        )),
                    })?;
                (0, adapter)
            }
        };

        let summary = AdapterSummary::from_info(index, &adapter.get_info());
        let required_features = adapter.features() & OPTIONAL_FEATURES;
        let adapter_limits = adapter.limits();
        let required_limits = wgpu::Limits {
            max_buffer_size: adapter_limits.max_buffer_size,
            ..wgpu::Limits::downlevel_defaults().using_resolution(adapter_limits)
        };

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("envmap_device"),
            required_features,
            required_limits,
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| EnvmapError::resource(format!("wgpu request_device failed: {e:?}")))?;

        tracing::info!("[Using {}]", summary.name);
        tracing::debug!(
            backend = %summary.backend,
            device_type = %summary.device_type,
            features = ?required_features,
            "gpu context ready"
        );

        Ok(Self {
            adapter,
            device,
            queue,
            summary,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter(&self) -> &AdapterSummary {
        &self.summary
    }

    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    pub fn max_buffer_size(&self) -> u64 {
        self.device.limits().max_buffer_size
    }

    /// Fails with [`EnvmapError::FormatSupport`] unless `format` can be sampled, rendered
    /// into and copied out of on this device.
    pub fn ensure_format_support(&self, format: PixelFormat) -> EnvmapResult<wgpu::TextureFormat> {
        let features =
            render_target_format(format).map(|tf| self.adapter.get_texture_format_features(tf));
        check_format_support(format, features, self.device.features())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/device.rs"]
mod tests;
