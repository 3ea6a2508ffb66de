use std::{io::Cursor, path::PathBuf};

use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("codec_unit");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn decode_keeps_gray_as_single_channel() {
    let img = image::GrayImage::from_raw(2, 1, vec![7, 250]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let m = decode_matrix_bytes(&buf).unwrap();
    assert_eq!(m.elem(), ElemType::U8C1);
    assert_eq!((m.width(), m.height()), (2, 1));
    assert_eq!(m.as_bytes(), &[7, 250]);
}

#[test]
fn decode_flattens_alpha_to_rgb() {
    let img = image::RgbaImage::from_raw(1, 1, vec![10, 20, 30, 128]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let m = decode_matrix_bytes(&buf).unwrap();
    assert_eq!(m.elem(), ElemType::U8C3);
    assert_eq!(m.as_bytes(), &[10, 20, 30]);
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    assert!(matches!(
        decode_matrix_bytes(b"not an image"),
        Err(InteropError::Decode(_))
    ));
    assert!(matches!(
        decode_matrix(scratch("does_not_exist.png")),
        Err(InteropError::Decode(_))
    ));
}

#[test]
fn encode_then_decode_png_strips_padding() {
    let mut m = HostMatrix::with_stride(2, 2, ElemType::U8C3, 8).unwrap();
    for y in 0..2 {
        m.row_with_stride_mut(y)
            .copy_from_slice(&[1, 2, 3, 4, 5, 6, 0xFF, 0xFF]);
    }
    let path = scratch("padded.png");
    encode_matrix(&m, &path).unwrap();

    let back = decode_matrix(&path).unwrap();
    assert_eq!(back.stride(), 6);
    assert_eq!(back.as_bytes(), &[1, 2, 3, 4, 5, 6, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn encode_rejects_s16_and_unknown_extensions() {
    let s16 = HostMatrix::new(1, 1, ElemType::S16C1);
    assert!(matches!(
        encode_matrix(&s16, scratch("s16.png")),
        Err(InteropError::UnsupportedFormat(_))
    ));

    let gray = HostMatrix::new(1, 1, ElemType::U8C1);
    assert!(matches!(
        encode_matrix(&gray, scratch("gray.unknownext")),
        Err(InteropError::Encode(_))
    ));
}
