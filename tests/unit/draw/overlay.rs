use super::*;

fn gray_canvas(w: u32, h: u32, v: u8) -> HostMatrix {
    HostMatrix::filled(w, h, ElemType::U8C3, v)
}

#[test]
fn empty_overlay_leaves_canvas_untouched() {
    let mut canvas = gray_canvas(6, 4, 77);
    let before = canvas.clone();
    Overlay::new(6, 4).unwrap().composite_onto(&mut canvas).unwrap();
    assert_eq!(canvas, before);
}

#[test]
fn horizontal_line_covers_its_row() {
    let mut canvas = gray_canvas(10, 5, 0);
    let mut overlay = Overlay::new(10, 5).unwrap();
    overlay.set_color(Rgb8::new(0, 255, 0));
    overlay.stroke_line(Line2d::new(Coord2d::new(1, 2), Coord2d::new(8, 2)), 1.0);
    overlay.composite_onto(&mut canvas).unwrap();

    let mid = canvas.pixel(5, 2).unwrap();
    assert!(mid[1] > 200, "{mid:?}");
    assert_eq!(mid[0], 0);
    assert_eq!(canvas.pixel(5, 0).unwrap(), &[0, 0, 0]);
}

#[test]
fn filled_circle_is_opaque_at_center_and_absent_far_away() {
    let mut canvas = gray_canvas(16, 16, 10);
    let mut overlay = Overlay::new(16, 16).unwrap();
    overlay.set_color(Rgb8::new(255, 255, 255));
    overlay.fill_circle(Coord2d::new(8, 8), 4.0);
    overlay.composite_onto(&mut canvas).unwrap();

    assert!(canvas.pixel(8, 8).unwrap().iter().all(|&c| c >= 250));
    assert_eq!(canvas.pixel(0, 0).unwrap(), &[10, 10, 10]);
}

#[test]
fn stroked_circle_leaves_the_middle_open() {
    let mut canvas = gray_canvas(21, 21, 0);
    let mut overlay = Overlay::new(21, 21).unwrap();
    overlay.set_color(Rgb8::new(0, 0, 255));
    overlay.stroke_circle(Coord2d::new(10, 10), 8.0, 1.0);
    overlay.composite_onto(&mut canvas).unwrap();

    assert_eq!(canvas.pixel(10, 10).unwrap(), &[0, 0, 0]);
    assert!(canvas.pixel(18, 10).unwrap()[2] > 100);
}

#[test]
fn composite_requires_matching_rgb_target() {
    let overlay = Overlay::new(4, 4).unwrap();
    let mut gray = HostMatrix::new(4, 4, ElemType::U8C1);
    assert!(matches!(
        overlay.composite_onto(&mut gray),
        Err(InteropError::UnsupportedFormat(_))
    ));

    let overlay = Overlay::new(4, 4).unwrap();
    let mut other = gray_canvas(5, 4, 0);
    assert!(matches!(
        overlay.composite_onto(&mut other),
        Err(InteropError::Validation(_))
    ));
}

#[test]
fn oversized_canvas_is_rejected() {
    assert!(matches!(
        Overlay::new(70_000, 1),
        Err(InteropError::Validation(_))
    ));
}

#[test]
fn blend_over_mixes_by_alpha() {
    let mut dst = [200, 100, 0];
    blend_over(&mut dst, &[0, 0, 0, 0]);
    assert_eq!(dst, [200, 100, 0]);

    blend_over(&mut dst, &[255, 0, 0, 255]);
    assert_eq!(dst, [255, 0, 0]);

    let mut dst = [0, 0, 200];
    // Half-covered premultiplied red.
    blend_over(&mut dst, &[128, 0, 0, 128]);
    assert_eq!(dst, [128, 0, 100]);
}
