pub(crate) mod device;
pub(crate) mod pipeline;
pub(crate) mod rasterizer;
pub(crate) mod target;
