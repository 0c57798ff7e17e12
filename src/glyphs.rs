//! Embedded monochrome glyph and icon definitions.
//!
//! Glyphs are a 5x7 bitmap font (one byte per row, bit 4 is the leftmost
//! column). Icons are 7x7 (bit 6 is the leftmost column). `compose` stamps
//! both into a [`SourceGrid`] at [`SCALE`]x and records where each one landed
//! in a [`GeometryTable`].

use crate::error::RenderError;
use crate::geometry::{GeometryTable, GLYPH_COUNT, ICON_COUNT};
use crate::utils::{AtlasRect, Rectangle};

/// Atlas texture width in pixels.
pub const ATLAS_WIDTH: u32 = 256;
/// Atlas texture height in pixels.
pub const ATLAS_HEIGHT: u32 = 160;
/// Fixed line height shared by every glyph rectangle.
pub const TEXT_HEIGHT: i32 = 18;
/// Source bitmap pixels are stamped as `SCALE` x `SCALE` blocks.
pub const SCALE: i32 = 2;

/// Marker byte for a foreground cell in a [`SourceGrid`].
pub const FOREGROUND: u8 = b'*';
/// Marker byte for a background cell in a [`SourceGrid`].
pub const BACKGROUND: u8 = b' ';

// Rows above the glyph bitmap inside its rectangle: one empty row, one halo row.
const GLYPH_TOP: i32 = 2;
// Advance used for bitmaps with no set pixels (space).
const BLANK_COLUMNS: i32 = 3;
const GUTTER: i32 = 1;
const SOLID_SIZE: i32 = 3;

/// Icons the toolkit can reference by integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Close = 1,
    Check = 2,
    Collapsed = 3,
    Expanded = 4,
}

impl Icon {
    pub const ALL: [Icon; ICON_COUNT] = [Icon::Close, Icon::Check, Icon::Collapsed, Icon::Expanded];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Icon> {
        Icon::ALL.into_iter().find(|icon| icon.id() == id)
    }

    fn bitmap(self) -> &'static [u8; 7] {
        &ICONS[self as usize - 1]
    }
}

/// A 2D grid of marker bytes, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl SourceGrid {
    /// A grid of `width` x `height` background cells.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BACKGROUND; width * height],
        }
    }

    /// Builds a grid from text rows. Short rows are padded with background.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut grid = Self::blank(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, byte) in row.bytes().enumerate() {
                grid.cells[y * width + x] = byte;
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(FOREGROUND)
    }

    /// Marks one cell as foreground. Out-of-range coordinates are ignored.
    pub fn set_foreground(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = FOREGROUND;
        }
    }

    /// Stamps a `SCALE`d bitmap whose top-left lands at `(x, y)`. `columns` is the
    /// bit width of each row; only columns in `first..=last` are drawn.
    fn stamp(&mut self, rows: &[u8], columns: u32, first: u32, last: u32, x: i32, y: i32) {
        for (row_idx, bits) in rows.iter().enumerate() {
            for col in first..=last {
                if bits & (1 << (columns - 1 - col)) == 0 {
                    continue;
                }
                let px = x + (col - first) as i32 * SCALE;
                let py = y + row_idx as i32 * SCALE;
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        self.set_foreground(px + dx, py + dy);
                    }
                }
            }
        }
    }
}

// Row-based shelf packer: places entries left to right and opens a new row when
// the current one is full.
struct ShelfPacker {
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    row_height: i32,
}

impl ShelfPacker {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            x: 0,
            y: 0,
            row_height: 0,
        }
    }

    fn next_row(&mut self) {
        if self.row_height > 0 {
            self.x = 0;
            self.y += self.row_height + GUTTER;
            self.row_height = 0;
        }
    }

    fn place(&mut self, width: i32, height: i32) -> Result<AtlasRect, RenderError> {
        if self.x + width > self.width {
            self.next_row();
        }
        if self.x + width > self.width || self.y + height > self.height {
            return Err(RenderError::AtlasFull {
                width,
                height,
                atlas_width: self.width as u32,
                atlas_height: self.height as u32,
            });
        }
        let rect = Rectangle::new(self.x, self.y, width, height);
        self.x += width + GUTTER;
        self.row_height = self.row_height.max(height);
        Ok(rect)
    }
}

// Leftmost and rightmost set columns of a 5-column bitmap.
fn column_extent(rows: &[u8; 7]) -> Option<(u32, u32)> {
    let mask = rows.iter().fold(0u8, |acc, row| acc | row);
    if mask == 0 {
        return None;
    }
    let first = (0..5).find(|col| mask & (1 << (4 - col)) != 0)?;
    let last = (0..5).rev().find(|col| mask & (1 << (4 - col)) != 0)?;
    Some((first, last))
}

/// Lays out every glyph, icon and the solid-fill block inside the fixed atlas.
pub fn compose() -> Result<(SourceGrid, GeometryTable), RenderError> {
    let mut grid = SourceGrid::blank(ATLAS_WIDTH as usize, ATLAS_HEIGHT as usize);
    let mut packer = ShelfPacker::new(ATLAS_WIDTH, ATLAS_HEIGHT);

    // Control codes have no area and no advance.
    let mut glyphs = [Rectangle::new(0, 0, 0, TEXT_HEIGHT); GLYPH_COUNT];
    for code in FIRST_PRINTABLE..GLYPH_COUNT {
        let rows = &FONT[code - FIRST_PRINTABLE];
        let extent = column_extent(rows);
        let columns = extent.map_or(BLANK_COLUMNS, |(first, last)| (last - first + 1) as i32);
        // One halo pixel on each side of the scaled bitmap.
        let rect = packer.place(columns * SCALE + 2, TEXT_HEIGHT)?;
        if let Some((first, last)) = extent {
            grid.stamp(rows, 5, first, last, rect.x + 1, rect.y + GLYPH_TOP);
        }
        glyphs[code] = rect;
    }

    packer.next_row();
    let icon_size = 7 * SCALE + 2;
    let mut icons = [Rectangle::default(); ICON_COUNT];
    for icon in Icon::ALL {
        let rect = packer.place(icon_size, icon_size)?;
        grid.stamp(icon.bitmap(), 7, 0, 6, rect.x + 1, rect.y + 1);
        icons[icon as usize - 1] = rect;
    }

    // The solid block keeps a halo around it, so reserve space for it and
    // point the rectangle at the interior only.
    let slot = packer.place(SOLID_SIZE + 2, SOLID_SIZE + 2)?;
    let solid = Rectangle::new(slot.x + 1, slot.y + 1, SOLID_SIZE, SOLID_SIZE);
    for y in solid.y..solid.bottom() {
        for x in solid.x..solid.right() {
            grid.set_foreground(x, y);
        }
    }

    let table = GeometryTable::new(glyphs, icons, solid, ATLAS_WIDTH, ATLAS_HEIGHT);
    Ok((grid, table))
}

const FIRST_PRINTABLE: usize = 32;

#[rustfmt::skip]
const FONT: [[u8; 7]; GLYPH_COUNT - FIRST_PRINTABLE] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x04, 0x04, 0x04, 0x04, 0x00, 0x00, 0x04], // !
    [0x0A, 0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00], // "
    [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A], // #
    [0x04, 0x0F, 0x14, 0x0E, 0x05, 0x1E, 0x04], // $
    [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03], // %
    [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D], // &
    [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00], // '
    [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02], // (
    [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08], // )
    [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00], // *
    [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08], // ,
    [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C], // .
    [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00], // /
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E], // 0
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E], // 1
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F], // 2
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E], // 3
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02], // 4
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E], // 5
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E], // 6
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08], // 7
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E], // 8
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C], // 9
    [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00], // :
    [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x04, 0x08], // ;
    [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02], // <
    [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00], // =
    [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08], // >
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04], // ?
    [0x0E, 0x11, 0x01, 0x0D, 0x15, 0x15, 0x0E], // @
    [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11], // A
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E], // B
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E], // C
    [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C], // D
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F], // E
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10], // F
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F], // G
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // H
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // I
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C], // J
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11], // K
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F], // L
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11], // M
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11], // N
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // O
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10], // P
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D], // Q
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11], // R
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E], // S
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04], // T
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // U
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04], // V
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A], // W
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11], // X
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04], // Y
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F], // Z
    [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E], // [
    [0x00, 0x10, 0x08, 0x04, 0x02, 0x01, 0x00], // backslash
    [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E], // ]
    [0x04, 0x0A, 0x11, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F], // _
    [0x08, 0x04, 0x02, 0x00, 0x00, 0x00, 0x00], // `
    [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F], // a
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E], // b
    [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E], // c
    [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F], // d
    [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E], // e
    [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08], // f
    [0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x0E], // g
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11], // h
    [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E], // i
    [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C], // j
    [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12], // k
    [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // l
    [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11], // m
    [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11], // n
    [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E], // o
    [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10], // p
    [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01], // q
    [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10], // r
    [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E], // s
    [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06], // t
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D], // u
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04], // v
    [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A], // w
    [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11], // x
    [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E], // y
    [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F], // z
    [0x02, 0x04, 0x04, 0x08, 0x04, 0x04, 0x02], // {
    [0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04], // |
    [0x08, 0x04, 0x04, 0x02, 0x04, 0x04, 0x08], // }
    [0x00, 0x00, 0x08, 0x15, 0x02, 0x00, 0x00], // ~
    [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F], // 127: replacement box
];

#[rustfmt::skip]
const ICONS: [[u8; 7]; ICON_COUNT] = [
    [0x41, 0x22, 0x14, 0x08, 0x14, 0x22, 0x41], // close
    [0x01, 0x03, 0x06, 0x4C, 0x78, 0x30, 0x00], // check
    [0x10, 0x18, 0x1C, 0x1E, 0x1C, 0x18, 0x10], // collapsed
    [0x00, 0x7F, 0x3E, 0x1C, 0x08, 0x00, 0x00], // expanded
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_extent_trims_blank_columns() {
        // '!' only uses the middle column.
        assert_eq!(column_extent(&FONT[1]), Some((2, 2)));
        assert_eq!(column_extent(&FONT[0]), None);
        assert_eq!(column_extent(&FONT[(b'M' as usize) - 32]), Some((0, 4)));
    }

    #[test]
    fn packer_wraps_rows_and_reports_overflow() {
        let mut packer = ShelfPacker::new(10, 10);
        let a = packer.place(6, 4).unwrap();
        let b = packer.place(6, 4).unwrap();
        assert_eq!(a, Rectangle::new(0, 0, 6, 4));
        assert_eq!(b, Rectangle::new(0, 5, 6, 4));
        assert!(matches!(
            packer.place(6, 4),
            Err(RenderError::AtlasFull { .. })
        ));
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let grid = SourceGrid::from_rows(&["*", "  *"]);
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert!(grid.is_foreground(0, 0));
        assert!(!grid.is_foreground(1, 0));
        assert!(grid.is_foreground(2, 1));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn icon_ids_round_trip() {
        for icon in Icon::ALL {
            assert_eq!(Icon::from_id(icon.id()), Some(icon));
        }
        assert_eq!(Icon::from_id(0), None);
        assert_eq!(Icon::from_id(5), None);
    }
}
