use thiserror::Error;

/// Errors surfaced by the rendering subsystem. Every variant is fatal for the
/// frame (or the process, when raised during initialization).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("atlas is full: cannot place a {width}x{height} entry in a {atlas_width}x{atlas_height} atlas")]
    AtlasFull {
        width: i32,
        height: i32,
        atlas_width: u32,
        atlas_height: u32,
    },

    #[error("batch capacity {requested} exceeds the maximum of {max} quads")]
    BatchCapacity { requested: usize, max: usize },

    #[error("atlas texture has not been uploaded to the backend")]
    AtlasNotUploaded,

    #[error("no graphics adapter compatible with the surface")]
    NoAdapter,

    #[cfg(feature = "backend-wgpu")]
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[cfg(feature = "backend-wgpu")]
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[cfg(feature = "backend-wgpu")]
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[cfg(feature = "backend-wgpu")]
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[cfg(feature = "backend-wgpu")]
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("config i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to encode atlas image: {0}")]
    Image(#[from] image::ImageError),
}
