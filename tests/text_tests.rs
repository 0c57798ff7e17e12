use sap_render::geometry::GeometryTable;
use sap_render::text::{fit_text, glyph_bytes, layout_text, measure_text_width};
use sap_render::texture_atlas::Atlas;
use sap_render::utils::Position;

fn geometry() -> GeometryTable {
    Atlas::build().unwrap().geometry
}

#[test]
fn empty_string_measures_zero() {
    assert_eq!(measure_text_width(&geometry(), ""), 0);
}

#[test]
fn width_is_sum_of_advances_over_non_continuation_bytes() {
    let geometry = geometry();
    for text in ["hello", "Hello, World!", "naïve café", "日本", "tab\there"] {
        let expected: i32 = text
            .bytes()
            .filter(|b| b & 0xC0 != 0x80)
            .map(|b| geometry.glyph_advance(b.min(127)))
            .sum();
        assert_eq!(measure_text_width(&geometry, text), expected, "{:?}", text);
    }
}

#[test]
fn each_multibyte_char_measures_as_the_replacement_glyph() {
    let geometry = geometry();
    let replacement = geometry.glyph_advance(127);
    assert_eq!(measure_text_width(&geometry, "é"), replacement);
    assert_eq!(measure_text_width(&geometry, "€"), replacement);
    assert_eq!(measure_text_width(&geometry, "😀"), replacement);
    assert_eq!(glyph_bytes("a€b").collect::<Vec<_>>(), vec![b'a', 127, b'b']);
}

#[test]
fn control_codes_have_no_width() {
    let geometry = geometry();
    assert_eq!(
        measure_text_width(&geometry, "a\nb"),
        measure_text_width(&geometry, "ab")
    );
}

#[test]
fn layout_advances_cursor_by_glyph_width() {
    let geometry = geometry();
    let origin = Position::new(3, 4);
    let quads: Vec<_> = layout_text(&geometry, "abc", origin).collect();
    assert_eq!(quads.len(), 3);
    assert_eq!(quads[0].0.x, 3);
    assert_eq!(quads[1].0.x, 3 + geometry.glyph_advance(b'a'));
    assert_eq!(
        quads[2].0.x,
        3 + geometry.glyph_advance(b'a') + geometry.glyph_advance(b'b')
    );
    for (dst, src) in &quads {
        assert_eq!(dst.y, origin.y);
        assert_eq!((dst.width, dst.height), (src.width, src.height));
    }
    let end = quads[2].0.right();
    assert_eq!(end - origin.x, measure_text_width(&geometry, "abc"));
}

#[test]
fn fit_text_returns_longest_fitting_prefix() {
    let geometry = geometry();
    let text = "Hello";
    let width = measure_text_width(&geometry, "Hel");
    assert_eq!(fit_text(&geometry, text, width), "Hel");
    assert_eq!(fit_text(&geometry, text, width + 1), "Hel");
    assert_eq!(fit_text(&geometry, text, 0), "");
    assert_eq!(fit_text(&geometry, text, i32::MAX), "Hello");
}

#[test]
fn fit_text_cuts_on_char_boundaries() {
    let geometry = geometry();
    let a = measure_text_width(&geometry, "a");
    let text = "aéb";
    assert_eq!(fit_text(&geometry, text, a), "a");
    assert_eq!(
        fit_text(&geometry, text, measure_text_width(&geometry, "aé")),
        "aé"
    );
}

#[test]
fn layout_cursor_saturates_at_the_coordinate_limit() {
    let geometry = geometry();
    let origin = Position::new(i32::MAX - 1, 0);
    let quads: Vec<_> = layout_text(&geometry, "abc", origin).collect();
    assert_eq!(quads.len(), 3);
    assert_eq!(quads[0].0.x, i32::MAX - 1);
    assert_eq!(quads[1].0.x, i32::MAX);
    assert_eq!(quads[2].0.x, i32::MAX);
    assert_eq!(quads[2].0.right(), i32::MAX);
}

#[test]
fn nul_terminates_measurement_and_layout() {
    let geometry = geometry();
    assert_eq!(
        measure_text_width(&geometry, "ab\0cd"),
        measure_text_width(&geometry, "ab")
    );
    assert_eq!(measure_text_width(&geometry, "\0ab"), 0);
    assert_eq!(layout_text(&geometry, "ab\0cd", Position::default()).count(), 2);
}

#[test]
fn byte_prefixes_measure_without_char_boundaries() {
    let geometry = geometry();
    let text = "aé".as_bytes();
    let a = geometry.glyph_advance(b'a');
    let replacement = geometry.glyph_advance(127);
    assert_eq!(measure_text_width(&geometry, &text[..1]), a);
    // Cut between the lead byte and its continuation.
    assert_eq!(measure_text_width(&geometry, &text[..2]), a + replacement);
    assert_eq!(measure_text_width(&geometry, text), a + replacement);
    assert_eq!(layout_text(&geometry, &text[..2], Position::default()).count(), 2);
}
