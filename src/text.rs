//! Byte-level text layout against the atlas glyph table.
//!
//! Text is treated as bytes, not chars: a NUL byte ends the text, UTF-8
//! continuation bytes are skipped and every other byte above 127 is clamped to
//! the replacement glyph. A multi-byte character therefore lays out as a single
//! replacement glyph, and a byte prefix cut inside one still measures cleanly.

use crate::geometry::{GeometryTable, MAX_GLYPH};
use crate::utils::{AtlasRect, Position, Rectangle};

/// True for UTF-8 continuation bytes (`0b10xx_xxxx`).
pub fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// The glyph indices drawn for `text`, in order.
pub fn glyph_bytes<T: AsRef<[u8]> + ?Sized>(text: &T) -> impl Iterator<Item = u8> + '_ {
    text.as_ref()
        .iter()
        .copied()
        .take_while(|&b| b != 0)
        .filter(|&b| !is_continuation(b))
        .map(|b| b.min(MAX_GLYPH))
}

/// Sum of glyph advances. Pure: no batching, no flushing.
pub fn measure_text_width(geometry: &GeometryTable, text: impl AsRef<[u8]>) -> i32 {
    glyph_bytes(&text)
        .map(|b| geometry.glyph_advance(b))
        .fold(0i32, i32::saturating_add)
}

/// Destination and source rectangle for every glyph of `text`, starting at
/// `origin` and advancing left to right. The cursor saturates at `i32::MAX`.
pub fn layout_text<'a, T: AsRef<[u8]> + ?Sized>(
    geometry: &'a GeometryTable,
    text: &'a T,
    origin: Position,
) -> impl Iterator<Item = (Rectangle, AtlasRect)> + 'a {
    glyph_bytes(text).scan(origin.x, move |cursor, byte| {
        let src = geometry.glyph_rect(byte);
        let dst = Rectangle::new(*cursor, origin.y, src.width, src.height);
        *cursor = cursor.saturating_add(src.width);
        Some((dst, src))
    })
}

/// Longest prefix of `text`, cut on a char boundary, whose width fits in
/// `max_width`.
pub fn fit_text<'a>(geometry: &GeometryTable, text: &'a str, max_width: i32) -> &'a str {
    let mut width = 0i32;
    for (idx, ch) in text.char_indices() {
        let mut buf = [0u8; 4];
        width = width.saturating_add(measure_text_width(geometry, ch.encode_utf8(&mut buf)));
        if width > max_width {
            return &text[..idx];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_bytes_are_detected() {
        assert!(is_continuation(0x80));
        assert!(is_continuation(0xBF));
        assert!(!is_continuation(b'a'));
        assert!(!is_continuation(0xC3));
    }

    #[test]
    fn multibyte_chars_collapse_to_one_clamped_byte() {
        // 'é' is C3 A9: lead byte clamps to 127, continuation is dropped.
        let bytes: Vec<u8> = glyph_bytes("aé").collect();
        assert_eq!(bytes, vec![b'a', 127]);
        // Three-byte sequence still yields one glyph.
        assert_eq!(glyph_bytes("€").count(), 1);
    }

    #[test]
    fn nul_ends_the_text() {
        assert_eq!(glyph_bytes("a\0b").collect::<Vec<_>>(), vec![b'a']);
        assert_eq!(glyph_bytes(b"\0abc").count(), 0);
    }

    #[test]
    fn truncated_multibyte_prefix_is_still_one_glyph() {
        let euro = "€".as_bytes();
        assert_eq!(glyph_bytes(&euro[..1]).collect::<Vec<_>>(), vec![127]);
        assert_eq!(glyph_bytes(&euro[1..]).count(), 0);
    }
}
