pub mod null;
pub mod overlay;
pub mod types;
mod gpu_context;
mod wgpu_backend;

pub use gpu_context::GpuContext;
pub use null::{NullBackend, NullStats};
pub use wgpu_backend::{RedrawScheduler, WgpuBackend, WgpuSurface};

use thiserror::Error;

use crate::context::SceneContext;
use crate::core::Viewport;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("viewport {width}x{height} cannot back a surface")]
    EmptyViewport { width: u32, height: u32 },
    #[error("failed to create surface: {0}")]
    Create(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface has no supported formats")]
    Unsupported,
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// Surface must be reconfigured before the next frame
    #[error("surface lost or outdated")]
    Lost,
    #[error("timed out acquiring the next frame")]
    Timeout,
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("render failed: {0}")]
    Other(String),
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Lost,
            wgpu::SurfaceError::Timeout => Self::Timeout,
            wgpu::SurfaceError::OutOfMemory => Self::OutOfMemory,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Creates the drawing surface a scene instance owns
pub trait RenderBackend {
    type Surface: RenderSurface;

    fn create_surface(&mut self, viewport: Viewport) -> Result<Self::Surface, SurfaceError>;
}

/// GPU-side resources of one scene instance
pub trait RenderSurface {
    /// Upload meshes, textures and particle buffers for a freshly built scene
    fn upload(&mut self, ctx: &SceneContext) -> Result<(), RenderError>;
    fn resize(&mut self, viewport: Viewport);
    fn render(&mut self, ctx: &SceneContext) -> Result<(), RenderError>;
    /// Free every GPU resource; safe to call more than once
    fn release(&mut self);
    fn resource_count(&self) -> usize;
}
