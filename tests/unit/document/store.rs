use super::*;

const DOC: &str = r#"
{
  "img": { "type_id": "opencv-matrix", "rows": 2, "cols": 2, "dt": "s", "data": [-1, 2, 300, -32768] },
  "field": { "rows": 1, "cols": 2, "dt": "2f", "data": [0.5, 1.5, 2.0, 3.25] },
  "field_dst_width": 2,
  "label": "not a number"
}
"#;

#[test]
fn s16_matrix_nodes_decode_to_native_bytes() {
    let doc = JsonDocument::from_json_str(DOC).unwrap();
    let m = doc.matrix("img").unwrap();
    assert_eq!(m.elem(), ElemType::S16C1);
    assert_eq!((m.width(), m.height()), (2, 2));
    assert_eq!(m.stride(), 4);
    let row1 = m.row(1);
    assert_eq!(i16::from_ne_bytes([row1[0], row1[1]]), 300);
    assert_eq!(i16::from_ne_bytes([row1[2], row1[3]]), -32768);
}

#[test]
fn coordinate_nodes_decode_as_two_channel_float() {
    let doc = JsonDocument::from_json_str(DOC).unwrap();
    let m = doc.matrix("field").unwrap();
    assert_eq!(m.elem(), ElemType::F32C2);
    let px = m.pixel(1, 0).unwrap();
    assert_eq!(f32::from_ne_bytes([px[0], px[1], px[2], px[3]]), 2.0);
    assert_eq!(f32::from_ne_bytes([px[4], px[5], px[6], px[7]]), 3.25);
}

#[test]
fn scalars_and_missing_nodes() {
    let doc = JsonDocument::from_json_str(DOC).unwrap();
    assert_eq!(doc.scalar("field_dst_width").unwrap(), 2);
    assert!(matches!(
        doc.scalar("field_dst_height"),
        Err(InteropError::Document(_))
    ));
    assert!(matches!(doc.scalar("label"), Err(InteropError::Document(_))));
    assert!(matches!(doc.matrix("nope"), Err(InteropError::Document(_))));
    assert!(matches!(
        doc.matrix("field_dst_width"),
        Err(InteropError::Document(_))
    ));
}

#[test]
fn malformed_matrix_nodes_are_document_errors() {
    let doc = JsonDocument::from_json_str(
        r#"{
          "short": { "rows": 2, "cols": 2, "dt": "u", "data": [1, 2, 3] },
          "range": { "rows": 1, "cols": 1, "dt": "u", "data": [256] },
          "frac": { "rows": 1, "cols": 1, "dt": "s", "data": [1.5] },
          "dt": { "rows": 1, "cols": 1, "dt": "d", "data": [1] },
          "kind": { "type_id": "opencv-seq", "rows": 1, "cols": 1, "dt": "u", "data": [1] }
        }"#,
    )
    .unwrap();
    for name in ["short", "range", "frac", "dt", "kind"] {
        assert!(
            matches!(doc.matrix(name), Err(InteropError::Document(_))),
            "{name} should be rejected"
        );
    }
}

#[test]
fn top_level_must_be_an_object() {
    assert!(JsonDocument::from_json_str("[1, 2]").is_err());
    assert!(JsonDocument::from_json_str("{").is_err());
}

#[test]
fn written_documents_read_back() {
    let mut rgb = HostMatrix::with_stride(2, 1, ElemType::U8C3, 8).unwrap();
    rgb.row_mut(0).copy_from_slice(&[1, 2, 3, 4, 5, 6]);

    let mut doc = JsonDocument::new();
    doc.set_matrix("rgb", &rgb).unwrap();
    doc.set_scalar("rgb_dst_width", 2);
    assert!(doc.contains("rgb"));

    let text = doc.to_json_string().unwrap();
    let back = JsonDocument::from_json_str(&text).unwrap();
    assert_eq!(back.matrix("rgb").unwrap(), rgb.to_packed());
    assert_eq!(back.scalar("rgb_dst_width").unwrap(), 2);
}
