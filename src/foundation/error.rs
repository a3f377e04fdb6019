use std::path::{Path, PathBuf};

use crate::foundation::format::PixelFormat;

/// Convenience result type used across the crate.
pub type EnvmapResult<T> = Result<T, EnvmapError>;

/// Top-level error taxonomy used by the baking pipeline.
#[derive(thiserror::Error, Debug)]
pub enum EnvmapError {
    /// Bad command selection, unreadable or unsupported source, mismatched faces.
    #[error("input error: {0}")]
    Input(String),

    /// The run needs exactly 1 or 6 source images.
    #[error("input error: requires 1 or 6 input images, got {count}")]
    InputCount { count: usize },

    /// A codec operation failed on one source image. The run skips that image.
    #[error("codec error: {op} failed for '{}': {message}", .source_path.display())]
    Codec {
        op: &'static str,
        source_path: PathBuf,
        message: String,
    },

    /// A normalization step changed image geometry.
    #[error("consistency error: {0}")]
    Consistency(String),

    /// Device creation, adapter selection or allocation failure.
    #[error("resource error: {0}")]
    Resource(String),

    /// The device cannot sample and render the negotiated format.
    #[error("format error: device does not support {format} as a render target")]
    FormatSupport { format: PixelFormat },

    /// Bind, draw or validation fault while rendering one face.
    #[error("device error on face {face}: {message}")]
    Device { face: usize, message: String },

    /// Readback fault while capturing one face.
    #[error("capture error on face {face}: {message}")]
    Capture { face: usize, message: String },

    /// A projection or path the tool does not implement.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Writing the output container failed.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EnvmapError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn codec(op: &'static str, source_path: &Path, msg: impl Into<String>) -> Self {
        Self::Codec {
            op,
            source_path: source_path.to_path_buf(),
            message: msg.into(),
        }
    }

    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::Consistency(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    pub fn device(face: usize, msg: impl Into<String>) -> Self {
        Self::Device {
            face,
            message: msg.into(),
        }
    }

    pub fn capture(face: usize, msg: impl Into<String>) -> Self {
        Self::Capture {
            face,
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn serialize(msg: impl Into<String>) -> Self {
        Self::Serialize(msg.into())
    }

    /// Per-image codec faults skip the image; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Codec { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
