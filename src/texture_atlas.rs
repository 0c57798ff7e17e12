use std::path::Path;

use crate::error::RenderError;
use crate::geometry::GeometryTable;
use crate::glyphs::{self, SourceGrid};
use crate::utils::Color;

/// Per-cell classification produced by the two build passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Solid,
    Outline,
}

/// RGBA8 pixels, row-major, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl AtlasImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let p = &self.pixels[i..i + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Writes the atlas to disk as a PNG, mostly for eyeballing glyph layout.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// Turns a marker grid into an outlined RGBA bitmap.
pub struct AtlasBuilder;

impl AtlasBuilder {
    pub fn build(grid: &SourceGrid) -> AtlasImage {
        let (w, h) = (grid.width(), grid.height());
        let mut cells = vec![Cell::Empty; w * h];

        for y in 0..h {
            for x in 0..w {
                if grid.is_foreground(x, y) {
                    cells[y * w + x] = Cell::Solid;
                }
            }
        }

        // Dilate by one pixel in all 8 directions. Only empty cells become
        // outline, so a solid cell is never demoted.
        for y in 0..h {
            for x in 0..w {
                if cells[y * w + x] != Cell::Solid {
                    continue;
                }
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as i64 + dx;
                        let ny = y as i64 + dy;
                        if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                            continue;
                        }
                        let neighbor = &mut cells[ny as usize * w + nx as usize];
                        if *neighbor == Cell::Empty {
                            *neighbor = Cell::Outline;
                        }
                    }
                }
            }
        }

        let mut pixels = Vec::with_capacity(w * h * 4);
        for cell in &cells {
            let color = match cell {
                Cell::Solid => Color::WHITE,
                Cell::Outline => Color::BLACK,
                Cell::Empty => Color::TRANSPARENT,
            };
            pixels.extend_from_slice(&color.to_array());
        }

        AtlasImage {
            width: w as u32,
            height: h as u32,
            pixels,
        }
    }
}

/// The built atlas bitmap together with its lookup table.
pub struct Atlas {
    pub image: AtlasImage,
    pub geometry: GeometryTable,
}

impl Atlas {
    /// Builds the atlas from the embedded glyph and icon definitions.
    pub fn build() -> Result<Self, RenderError> {
        let (grid, geometry) = glyphs::compose()?;
        let image = AtlasBuilder::build(&grid);
        log::info!(
            "built {}x{} glyph atlas ({} rects)",
            image.width(),
            image.height(),
            geometry.rects().count()
        );
        Ok(Self { image, geometry })
    }
}
