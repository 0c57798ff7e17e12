use crate::batch::Batch;
use crate::error::RenderError;
use crate::texture_atlas::AtlasImage;
use crate::utils::{Color, Rectangle};

/// The graphics API seam. The batching engine and atlas builder are shared;
/// only this submission shim differs between APIs.
pub trait Backend {
    /// Uploads the RGBA atlas once; sampled with nearest filtering.
    fn upload_atlas(&mut self, image: &AtlasImage) -> Result<(), RenderError>;

    /// New target size in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Scissor applied to every following submission. `None` disables clipping.
    fn set_clip(&mut self, clip: Option<Rectangle>);

    fn clear(&mut self, color: Color) -> Result<(), RenderError>;

    /// Issues exactly one indexed triangle-list draw for the whole batch.
    fn submit(&mut self, batch: &Batch<'_>) -> Result<(), RenderError>;

    fn present(&mut self) -> Result<(), RenderError>;
}

/// Physical-pixel scissor for `clip` on a `target_width` x `target_height`
/// target. The clip is scaled by `scale_factor`, rounded outward and clamped to
/// the target; `None` means nothing under it is visible. No clip covers the
/// whole target.
pub fn scissor_rect(
    clip: Option<Rectangle>,
    target_width: u32,
    target_height: u32,
    scale_factor: f32,
) -> Option<Rectangle> {
    let target = Rectangle::new(
        0,
        0,
        target_width.min(i32::MAX as u32) as i32,
        target_height.min(i32::MAX as u32) as i32,
    );
    let scissor = match clip {
        None => target,
        Some(clip) => clip.scaled(scale_factor).intersect(&target),
    };
    (!scissor.is_empty()).then_some(scissor)
}

/// One draw submission as seen by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub clip: Option<Rectangle>,
    pub positions: Vec<[f32; 2]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub colors: Vec<Color>,
    pub indices: Vec<u32>,
}

impl Submission {
    pub fn quad_count(&self) -> usize {
        self.positions.len() / 4
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    UploadAtlas { width: u32, height: u32 },
    Resize { width: u32, height: u32 },
    SetClip(Option<Rectangle>),
    Clear(Color),
    Submit(Submission),
    Present,
}

/// Headless backend that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    clip: Option<Rectangle>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn submissions(&self) -> impl Iterator<Item = &Submission> {
        self.calls.iter().filter_map(|call| match call {
            BackendCall::Submit(submission) => Some(submission),
            _ => None,
        })
    }

    pub fn present_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BackendCall::Present))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Backend for RecordingBackend {
    fn upload_atlas(&mut self, image: &AtlasImage) -> Result<(), RenderError> {
        self.calls.push(BackendCall::UploadAtlas {
            width: image.width(),
            height: image.height(),
        });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.calls.push(BackendCall::Resize { width, height });
    }

    fn set_clip(&mut self, clip: Option<Rectangle>) {
        self.clip = clip;
        self.calls.push(BackendCall::SetClip(clip));
    }

    fn clear(&mut self, color: Color) -> Result<(), RenderError> {
        self.calls.push(BackendCall::Clear(color));
        Ok(())
    }

    fn submit(&mut self, batch: &Batch<'_>) -> Result<(), RenderError> {
        self.calls.push(BackendCall::Submit(Submission {
            clip: self.clip,
            positions: batch.positions.to_vec(),
            tex_coords: batch.tex_coords.to_vec(),
            colors: batch.colors.to_vec(),
            indices: batch.indices.to_vec(),
        }));
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.calls.push(BackendCall::Present);
        Ok(())
    }
}
