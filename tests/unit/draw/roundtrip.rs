use super::*;
use crate::{
    patch::session::PatchSession,
    runtime::{api::Usage, software::SoftwareRuntime},
};

fn image_with<R: VisionRuntime>(
    rt: &mut R,
    w: u32,
    h: u32,
    format: VisionFormat,
    fill: impl Fn(usize) -> u8,
) -> ImageHandle {
    let image = rt.create_image(w, h, format).unwrap();
    let mut s = PatchSession::open(rt, image, Usage::WriteOnly).unwrap();
    for (i, b) in s.bytes_mut().unwrap().iter_mut().enumerate() {
        *b = fill(i);
    }
    s.close().unwrap();
    image
}

fn snapshot<R: VisionRuntime>(rt: &mut R, image: ImageHandle) -> Vec<u8> {
    let s = PatchSession::open(rt, image, Usage::ReadOnly).unwrap();
    s.bytes().to_vec()
}

#[test]
fn drawing_lines_never_writes_the_input() {
    let mut rt = SoftwareRuntime::default();
    let src = image_with(&mut rt, 10, 10, VisionFormat::Rgb, |i| (i % 251) as u8);
    let before = snapshot(&mut rt, src);

    let line = Line2d::new(Coord2d::new(0, 0), Coord2d::new(9, 9));
    let out = draw_lines(&mut rt, src, &[line], 1, &DrawStyle::default()).unwrap();

    assert_ne!(out, src);
    assert_eq!(snapshot(&mut rt, src), before);
    assert_ne!(snapshot(&mut rt, out), before);
    assert_eq!(rt.open_maps(), 0);
}

#[test]
fn s16_input_is_rejected_before_mapping() {
    let mut rt = SoftwareRuntime::default();
    let src = rt.create_image(4, 4, VisionFormat::S16).unwrap();
    let images = rt.image_count();

    let err = draw_circles(
        &mut rt,
        src,
        &[Coord2d::new(1, 1)],
        1,
        1,
        &DrawStyle::default(),
    )
    .unwrap_err();

    assert!(matches!(err, InteropError::UnsupportedFormat(_)));
    assert_eq!(rt.image_count(), images);
    assert_eq!(rt.open_maps(), 0);
}

#[test]
fn gray_input_is_promoted_and_drawn_in_color() {
    let mut rt = SoftwareRuntime::default();
    let src = image_with(&mut rt, 4, 4, VisionFormat::U8, |_| 128);
    let style = DrawStyle {
        color: Rgb8::new(255, 0, 0),
        thickness: 2,
    };

    let out = draw_circles(&mut rt, src, &[Coord2d::new(2, 2)], 1, 1, &style).unwrap();

    assert_eq!(rt.query_image(out).unwrap().format, VisionFormat::Rgb);
    let host = convert_vision_to_host(&mut rt, out).unwrap();
    let center = host.pixel(2, 2).unwrap();
    assert!(center[0] > center[1] && center[0] > center[2], "{center:?}");
}

#[test]
fn filled_circle_with_negative_thickness() {
    let mut rt = SoftwareRuntime::default();
    let src = image_with(&mut rt, 12, 12, VisionFormat::Rgb, |_| 0);
    let style = DrawStyle {
        color: Rgb8::new(0, 0, 255),
        thickness: -1,
    };

    let out = draw_circles(&mut rt, src, &[Coord2d::new(6, 6)], 1, 4, &style).unwrap();
    let host = convert_vision_to_host(&mut rt, out).unwrap();
    assert!(host.pixel(6, 6).unwrap()[2] > 200);
    assert_eq!(host.pixel(0, 0).unwrap(), &[0, 0, 0]);
}

#[test]
fn only_the_first_count_primitives_are_drawn() {
    let mut rt = SoftwareRuntime::default();
    let src = image_with(&mut rt, 10, 10, VisionFormat::Rgb, |_| 0);
    let lines = [
        Line2d::new(Coord2d::new(0, 1), Coord2d::new(9, 1)),
        Line2d::new(Coord2d::new(0, 8), Coord2d::new(9, 8)),
    ];

    let out = draw_lines(&mut rt, src, &lines, 1, &DrawStyle::default()).unwrap();
    let host = convert_vision_to_host(&mut rt, out).unwrap();
    assert!(host.pixel(5, 1).unwrap()[0] > 200);
    assert_eq!(host.pixel(5, 8).unwrap(), &[0, 0, 0]);
}

#[test]
fn count_past_the_slice_is_a_validation_error() {
    let mut rt = SoftwareRuntime::default();
    let src = image_with(&mut rt, 4, 4, VisionFormat::Rgb, |_| 0);
    let images = rt.image_count();

    let err = draw_lines(&mut rt, src, &[], 2, &DrawStyle::default()).unwrap_err();
    assert!(matches!(err, InteropError::Validation(_)));
    assert_eq!(rt.image_count(), images);
}

#[test]
fn invalid_thickness_is_rejected() {
    let mut rt = SoftwareRuntime::default();
    let src = image_with(&mut rt, 4, 4, VisionFormat::Rgb, |_| 0);
    let zero = DrawStyle {
        thickness: 0,
        ..DrawStyle::default()
    };
    let line = Line2d::new(Coord2d::new(0, 0), Coord2d::new(3, 3));

    assert!(matches!(
        draw_lines(&mut rt, src, &[line], 1, &zero),
        Err(InteropError::Validation(_))
    ));
    assert!(matches!(
        draw_circles(&mut rt, src, &[Coord2d::new(1, 1)], 1, 1, &zero),
        Err(InteropError::Validation(_))
    ));
}
