use crate::glyphs::{Icon, TEXT_HEIGHT};
use crate::utils::AtlasRect;

/// Glyph slots: one per byte value 0..=127.
pub const GLYPH_COUNT: usize = 128;
/// Number of toolkit icons stored in the atlas.
pub const ICON_COUNT: usize = 4;
/// Highest byte value with its own glyph; larger lead bytes clamp to it.
pub const MAX_GLYPH: u8 = 127;

/// Immutable lookup from glyphs, icons and the solid fill to atlas rectangles.
#[derive(Debug, Clone)]
pub struct GeometryTable {
    glyphs: [AtlasRect; GLYPH_COUNT],
    icons: [AtlasRect; ICON_COUNT],
    solid: AtlasRect,
    atlas_width: u32,
    atlas_height: u32,
}

impl GeometryTable {
    pub fn new(
        glyphs: [AtlasRect; GLYPH_COUNT],
        icons: [AtlasRect; ICON_COUNT],
        solid: AtlasRect,
        atlas_width: u32,
        atlas_height: u32,
    ) -> Self {
        Self {
            glyphs,
            icons,
            solid,
            atlas_width,
            atlas_height,
        }
    }

    /// Rectangle for a byte, clamped to the last glyph slot.
    pub fn glyph_rect(&self, byte: u8) -> AtlasRect {
        self.glyphs[byte.min(MAX_GLYPH) as usize]
    }

    pub fn glyph_advance(&self, byte: u8) -> i32 {
        self.glyph_rect(byte).width
    }

    /// Rectangle for a toolkit icon id, `None` when the id is unknown.
    pub fn icon_rect(&self, id: u32) -> Option<AtlasRect> {
        Icon::from_id(id).map(|icon| self.icons[icon as usize - 1])
    }

    /// Opaque white region used for flat fills.
    pub fn solid_rect(&self) -> AtlasRect {
        self.solid
    }

    pub fn text_height(&self) -> i32 {
        TEXT_HEIGHT
    }

    pub fn atlas_size(&self) -> (u32, u32) {
        (self.atlas_width, self.atlas_height)
    }

    /// Every rectangle in the table: glyphs, then icons, then the solid fill.
    pub fn rects(&self) -> impl Iterator<Item = AtlasRect> + '_ {
        self.glyphs
            .iter()
            .chain(self.icons.iter())
            .chain(std::iter::once(&self.solid))
            .copied()
    }
}
