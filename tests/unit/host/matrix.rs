use super::*;

#[test]
fn padded_rows_keep_visible_and_padding_bytes_apart() {
    let mut m = HostMatrix::with_stride(2, 2, ElemType::U8C3, 8).unwrap();
    assert_eq!(m.row_bytes(), 6);
    assert_eq!(m.as_bytes().len(), 16);

    m.row_with_stride_mut(1).copy_from_slice(&[1, 2, 3, 4, 5, 6, 0xEE, 0xEF]);
    assert_eq!(m.row(1), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(&m.row_with_stride(1)[6..], &[0xEE, 0xEF]);
    assert_eq!(m.pixel(1, 1), Some(&[4u8, 5, 6][..]));
    assert_eq!(m.pixel(2, 1), None);
}

#[test]
fn stride_smaller_than_row_is_rejected() {
    assert!(matches!(
        HostMatrix::with_stride(4, 1, ElemType::S16C1, 7),
        Err(InteropError::Validation(_))
    ));
}

#[test]
fn from_bytes_requires_full_rows() {
    assert!(HostMatrix::from_bytes(2, 2, ElemType::U8C1, 3, vec![0; 5]).is_err());

    let m = HostMatrix::from_bytes(2, 2, ElemType::U8C1, 3, vec![9; 7]).unwrap();
    assert_eq!(m.as_bytes().len(), 6);
}

#[test]
fn gray_promotion_replicates_channels() {
    let gray = HostMatrix::from_bytes(2, 1, ElemType::U8C1, 4, vec![10, 200, 0, 0]).unwrap();
    let rgb = gray.gray_to_rgb().unwrap();
    assert_eq!(rgb.elem(), ElemType::U8C3);
    assert_eq!(rgb.stride(), 6);
    assert_eq!(rgb.as_bytes(), &[10, 10, 10, 200, 200, 200]);

    assert!(matches!(
        rgb.gray_to_rgb(),
        Err(InteropError::UnsupportedFormat(_))
    ));
}

#[test]
fn to_packed_drops_padding() {
    let m = HostMatrix::from_bytes(1, 2, ElemType::U8C1, 2, vec![1, 0xAA, 2, 0xAA]).unwrap();
    let packed = m.to_packed();
    assert_eq!(packed.stride(), 1);
    assert_eq!(packed.as_bytes(), &[1, 2]);
}
