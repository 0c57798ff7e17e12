//! Batched quad renderer for an immediate-mode UI toolkit.
//!
//! The toolkit emits a stream of rectangle, text, icon and clip commands each
//! frame. [`Renderer`] turns them into textured, colored quads sampled from a
//! small atlas built at startup, batches them and hands full batches to a
//! [`Backend`].

pub mod backend;
pub mod batch;
pub mod config;
pub mod error;
pub mod geometry;
pub mod glyphs;
pub mod renderer;
pub mod text;
pub mod texture_atlas;
pub mod utils;

#[cfg(feature = "backend-wgpu")]
pub mod app;
#[cfg(feature = "backend-wgpu")]
pub mod wgpu_backend;

pub use backend::{Backend, BackendCall, RecordingBackend, Submission};
pub use batch::{Batch, BatchBuffer, DEFAULT_CAPACITY};
pub use config::RenderConfig;
pub use error::RenderError;
pub use geometry::GeometryTable;
pub use glyphs::Icon;
pub use renderer::{DrawCommand, FrameStats, Renderer};
pub use texture_atlas::{Atlas, AtlasBuilder, AtlasImage};
pub use utils::{AtlasRect, Color, Position, Rectangle};

#[cfg(feature = "backend-wgpu")]
pub use app::{run_app, FrameContext, SapApp, SapRenderer};
#[cfg(feature = "backend-wgpu")]
pub use wgpu_backend::WgpuBackend;
