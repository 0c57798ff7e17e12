use crate::backend::Backend;
use crate::batch::{BatchBuffer, DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::error::RenderError;
use crate::geometry::GeometryTable;
use crate::text;
use crate::texture_atlas::Atlas;
use crate::utils::{Color, Position, Rectangle};

/// One entry of the toolkit's per-frame command stream. Stream order is
/// paint order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand<'a> {
    Rect(Rectangle, Color),
    /// Raw text bytes; see [`crate::text`] for how they map to glyphs.
    Text(&'a [u8], Position, Color),
    Icon(u32, Rectangle, Color),
    Clip(Rectangle),
}

impl<'a> DrawCommand<'a> {
    /// Text command from anything byte-like (`&str`, `&[u8]`, byte literals).
    pub fn text<T: AsRef<[u8]> + ?Sized>(text: &'a T, pos: Position, color: Color) -> Self {
        DrawCommand::Text(text.as_ref(), pos, color)
    }
}

/// Flush and quad counts for one completed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub flushes: u64,
    pub quads: u64,
}

/// Consumes draw commands, batches them into quads and owns the clip state.
pub struct Renderer<B: Backend> {
    backend: B,
    batch: BatchBuffer,
    geometry: GeometryTable,
    clip: Option<Rectangle>,
    frame_start: FrameStats,
    last_frame: FrameStats,
}

impl<B: Backend> Renderer<B> {
    /// Uploads the atlas to `backend` and reserves a batch of `capacity` quads.
    /// Capacities above [`MAX_CAPACITY`] are rejected.
    pub fn new(mut backend: B, atlas: Atlas, capacity: usize) -> Result<Self, RenderError> {
        if capacity > MAX_CAPACITY {
            return Err(RenderError::BatchCapacity {
                requested: capacity,
                max: MAX_CAPACITY,
            });
        }
        backend.upload_atlas(&atlas.image)?;
        let (atlas_width, atlas_height) = atlas.geometry.atlas_size();
        Ok(Self {
            backend,
            batch: BatchBuffer::new(capacity, atlas_width, atlas_height),
            geometry: atlas.geometry,
            clip: None,
            frame_start: FrameStats::default(),
            last_frame: FrameStats::default(),
        })
    }

    /// Builds the embedded atlas and uses the reference batch capacity.
    pub fn with_default_atlas(backend: B) -> Result<Self, RenderError> {
        Self::new(backend, Atlas::build()?, DEFAULT_CAPACITY)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn geometry(&self) -> &GeometryTable {
        &self.geometry
    }

    pub fn batch(&self) -> &BatchBuffer {
        &self.batch
    }

    /// Active clip rectangle, `None` before the first clip command.
    pub fn clip(&self) -> Option<Rectangle> {
        self.clip
    }

    /// Stats of the most recent `end_frame`.
    pub fn stats(&self) -> FrameStats {
        self.last_frame
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.backend.resize(width, height);
    }

    /// Starts a frame. Quads left over from a frame that never reached
    /// `end_frame` are dropped.
    pub fn begin_frame(&mut self) {
        let stale = self.batch.discard();
        if stale > 0 {
            log::warn!("dropping {} quads from an unfinished frame", stale);
        }
        self.frame_start = self.totals();
    }

    pub fn dispatch(&mut self, command: DrawCommand<'_>) -> Result<(), RenderError> {
        match command {
            DrawCommand::Rect(rect, color) => self.draw_rect(rect, color),
            DrawCommand::Text(text, pos, color) => self.draw_text(text, pos, color),
            DrawCommand::Icon(id, rect, color) => self.draw_icon(id, rect, color),
            DrawCommand::Clip(rect) => self.set_clip_rect(rect),
        }
    }

    pub fn draw_rect(&mut self, rect: Rectangle, color: Color) -> Result<(), RenderError> {
        let src = self.geometry.solid_rect();
        self.batch.push_quad(&mut self.backend, rect, src, color)
    }

    pub fn draw_text(
        &mut self,
        text: impl AsRef<[u8]>,
        pos: Position,
        color: Color,
    ) -> Result<(), RenderError> {
        for (dst, src) in text::layout_text(&self.geometry, text.as_ref(), pos) {
            self.batch.push_quad(&mut self.backend, dst, src, color)?;
        }
        Ok(())
    }

    /// Draws an icon at its natural size, centered in `rect`. Unknown ids are
    /// skipped.
    pub fn draw_icon(&mut self, id: u32, rect: Rectangle, color: Color) -> Result<(), RenderError> {
        let Some(src) = self.geometry.icon_rect(id) else {
            log::debug!("skipping unknown icon id {}", id);
            return Ok(());
        };
        let dst = rect.centered(src.width, src.height);
        self.batch.push_quad(&mut self.backend, dst, src, color)
    }

    /// Switches the clip rectangle. Pending quads are flushed under the old
    /// clip before the new one reaches the backend.
    pub fn set_clip_rect(&mut self, rect: Rectangle) -> Result<(), RenderError> {
        if self.clip == Some(rect) {
            return Ok(());
        }
        self.flush()?;
        log::trace!("clip {:?} -> {:?}", self.clip, rect);
        self.clip = Some(rect);
        self.backend.set_clip(self.clip);
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RenderError> {
        self.batch.flush(&mut self.backend)?;
        Ok(())
    }

    /// Flushes, then clears the whole target.
    pub fn clear(&mut self, color: Color) -> Result<(), RenderError> {
        self.flush()?;
        self.backend.clear(color)
    }

    pub fn measure_text_width(&self, text: impl AsRef<[u8]>) -> i32 {
        text::measure_text_width(&self.geometry, text)
    }

    pub fn measure_text_height(&self) -> i32 {
        self.geometry.text_height()
    }

    /// Longest prefix of `text` that fits in `max_width` pixels.
    pub fn fit_text<'t>(&self, text: &'t str, max_width: i32) -> &'t str {
        text::fit_text(&self.geometry, text, max_width)
    }

    /// Drains the batch and presents.
    pub fn end_frame(&mut self) -> Result<(), RenderError> {
        self.flush()?;
        self.backend.present()?;
        let totals = self.totals();
        self.last_frame = FrameStats {
            flushes: totals.flushes - self.frame_start.flushes,
            quads: totals.quads - self.frame_start.quads,
        };
        self.frame_start = totals;
        log::trace!(
            "frame done: {} flushes, {} quads",
            self.last_frame.flushes,
            self.last_frame.quads
        );
        Ok(())
    }

    /// Runs a whole frame: optional clear, every command in order, present.
    pub fn render_frame<'a, I>(&mut self, clear: Option<Color>, commands: I) -> Result<(), RenderError>
    where
        I: IntoIterator<Item = DrawCommand<'a>>,
    {
        self.begin_frame();
        if let Some(color) = clear {
            self.clear(color)?;
        }
        for command in commands {
            self.dispatch(command)?;
        }
        self.end_frame()
    }

    fn totals(&self) -> FrameStats {
        FrameStats {
            flushes: self.batch.flush_count(),
            quads: self.batch.quad_total(),
        }
    }
}
