use crate::backend::Backend;
use crate::error::RenderError;
use crate::utils::{AtlasRect, Color, Rectangle};

/// Quads per batch in the reference sizing.
pub const DEFAULT_CAPACITY: usize = 16384;
/// Largest capacity whose vertex indices still fit in `u32`.
pub const MAX_CAPACITY: usize = u32::MAX as usize / 4;

// Two triangles per quad, relative to the quad's first vertex.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 1];

/// Borrowed view of the pending quads, handed to the backend on flush.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    pub positions: &'a [[f32; 2]],
    pub tex_coords: &'a [[f32; 2]],
    pub colors: &'a [Color],
    pub indices: &'a [u32],
}

impl Batch<'_> {
    pub fn quad_count(&self) -> usize {
        self.positions.len() / 4
    }
}

/// Fixed-capacity parallel vertex arrays for one draw submission.
///
/// Storage is reserved up front (at most [`DEFAULT_CAPACITY`] quads) and
/// reused after every flush.
pub struct BatchBuffer {
    capacity: usize,
    atlas_size: [f32; 2],
    positions: Vec<[f32; 2]>,
    tex_coords: Vec<[f32; 2]>,
    colors: Vec<Color>,
    indices: Vec<u32>,
    flush_count: u64,
    quad_total: u64,
}

impl BatchBuffer {
    /// Creates a buffer holding up to `capacity` quads, clamped to
    /// `1..=MAX_CAPACITY`, whose source rectangles are normalized against an
    /// atlas of the given size.
    pub fn new(capacity: usize, atlas_width: u32, atlas_height: u32) -> Self {
        let capacity = capacity.clamp(1, MAX_CAPACITY);
        let reserved = capacity.min(DEFAULT_CAPACITY);
        Self {
            capacity,
            atlas_size: [atlas_width as f32, atlas_height as f32],
            positions: Vec::with_capacity(reserved * 4),
            tex_coords: Vec::with_capacity(reserved * 4),
            colors: Vec::with_capacity(reserved * 4),
            indices: Vec::with_capacity(reserved * 6),
            flush_count: 0,
            quad_total: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Quads pending since the last flush.
    pub fn count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    /// Submissions issued over the buffer's lifetime.
    pub fn flush_count(&self) -> u64 {
        self.flush_count
    }

    /// Quads submitted over the buffer's lifetime.
    pub fn quad_total(&self) -> u64 {
        self.quad_total
    }

    pub fn view(&self) -> Batch<'_> {
        Batch {
            positions: &self.positions,
            tex_coords: &self.tex_coords,
            colors: &self.colors,
            indices: &self.indices,
        }
    }

    /// Appends one quad drawing `src` from the atlas into `dst`, tinted by
    /// `color`. A full buffer is flushed to `backend` first.
    pub fn push_quad<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        dst: Rectangle,
        src: AtlasRect,
        color: Color,
    ) -> Result<(), RenderError> {
        if self.is_full() {
            self.flush(backend)?;
        }

        let base = self.positions.len() as u32;
        let [atlas_w, atlas_h] = self.atlas_size;

        let u = src.x as f32 / atlas_w;
        let v = src.y as f32 / atlas_h;
        let u2 = u + src.width as f32 / atlas_w;
        let v2 = v + src.height as f32 / atlas_h;
        self.tex_coords
            .extend_from_slice(&[[u, v], [u2, v], [u, v2], [u2, v2]]);

        let x = dst.x as f32;
        let y = dst.y as f32;
        let x2 = x + dst.width as f32;
        let y2 = y + dst.height as f32;
        self.positions
            .extend_from_slice(&[[x, y], [x2, y], [x, y2], [x2, y2]]);

        self.colors.extend_from_slice(&[color; 4]);
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        Ok(())
    }

    /// Submits the pending quads as one draw and empties the buffer. Returns
    /// `false` without touching the backend when nothing is pending.
    pub fn flush<B: Backend + ?Sized>(&mut self, backend: &mut B) -> Result<bool, RenderError> {
        if self.is_empty() {
            return Ok(false);
        }
        let quads = self.count();
        log::trace!("flushing {} quads", quads);
        backend.submit(&self.view())?;
        self.flush_count += 1;
        self.quad_total += quads as u64;
        self.clear();
        Ok(true)
    }

    /// Drops pending quads without submitting them. Returns how many there were.
    pub fn discard(&mut self) -> usize {
        let quads = self.count();
        self.clear();
        quads
    }

    fn clear(&mut self) {
        self.positions.clear();
        self.tex_coords.clear();
        self.colors.clear();
        self.indices.clear();
    }
}
