use super::*;
use crate::{
    foundation::error::Status,
    format::table::{ElemType, VisionFormat},
    runtime::{
        faulty::FaultyRuntime,
        software::{SoftwareRuntime, SoftwareRuntimeOpts},
    },
};

fn fill_pattern<R: VisionRuntime>(rt: &mut R, image: ImageHandle) {
    let mut s = PatchSession::open(rt, image, Usage::WriteOnly).unwrap();
    for (i, b) in s.bytes_mut().unwrap().iter_mut().enumerate() {
        *b = (i * 7 + 3) as u8;
    }
    s.close().unwrap();
}

fn raw_bytes<R: VisionRuntime>(rt: &mut R, image: ImageHandle) -> Vec<u8> {
    let s = PatchSession::open(rt, image, Usage::ReadOnly).unwrap();
    s.bytes().to_vec()
}

#[test]
fn roundtrip_is_byte_identical_for_gray_and_rgb() {
    let mut rt = SoftwareRuntime::new(SoftwareRuntimeOpts { row_align: 16 });
    for format in [VisionFormat::U8, VisionFormat::Rgb] {
        let src = rt.create_image(5, 3, format).unwrap();
        fill_pattern(&mut rt, src);

        let host = convert_vision_to_host(&mut rt, src).unwrap();
        let dst = convert_host_to_vision(&mut rt, &host).unwrap();

        assert_eq!(rt.query_image(dst).unwrap(), rt.query_image(src).unwrap());
        assert_eq!(raw_bytes(&mut rt, dst), raw_bytes(&mut rt, src));
        assert_eq!(rt.open_maps(), 0);
    }
}

#[test]
fn padding_bytes_survive_a_full_roundtrip() {
    let mut rt = SoftwareRuntime::new(SoftwareRuntimeOpts { row_align: 8 });
    let src = rt.create_image(2, 2, VisionFormat::Rgb).unwrap();
    fill_pattern(&mut rt, src);

    let host = convert_vision_to_host(&mut rt, src).unwrap();
    assert_eq!(host.stride(), 8);
    assert!(host.stride() > host.row_bytes());
    let want: Vec<u8> = (6..8).map(|i| (i * 7 + 3) as u8).collect();
    assert_eq!(&host.row_with_stride(0)[6..], want.as_slice());

    let dst = convert_host_to_vision(&mut rt, &host).unwrap();
    let back = convert_vision_to_host(&mut rt, dst).unwrap();
    assert_eq!(back, host);
}

#[test]
fn s16_images_have_no_host_conversion() {
    let mut rt = SoftwareRuntime::default();
    let img = rt.create_image(2, 2, VisionFormat::S16).unwrap();
    assert!(matches!(
        convert_vision_to_host(&mut rt, img),
        Err(InteropError::UnsupportedFormat(_))
    ));

    let host = HostMatrix::new(2, 2, ElemType::S16C1);
    assert!(matches!(
        convert_host_to_vision(&mut rt, &host),
        Err(InteropError::UnsupportedFormat(_))
    ));
    assert_eq!(rt.image_count(), 1);
}

#[test]
fn failed_write_releases_the_new_image() {
    let mut rt = FaultyRuntime::new(SoftwareRuntime::default());
    rt.map_status = Some(Status::ERROR_NO_MEMORY);

    let host = HostMatrix::new(3, 3, ElemType::U8C3);
    let err = convert_host_to_vision(&mut rt, &host).unwrap_err();
    assert_eq!(err.status(), Some(Status::ERROR_NO_MEMORY));
    assert_eq!(rt.inner.image_count(), 0);
}

#[test]
fn create_failure_is_a_runtime_error() {
    let mut rt = FaultyRuntime::new(SoftwareRuntime::default());
    rt.create_status = Some(Status::ERROR_NO_MEMORY);

    let host = HostMatrix::new(1, 1, ElemType::U8C1);
    assert!(matches!(
        convert_host_to_vision(&mut rt, &host),
        Err(InteropError::Runtime {
            op: "create_image",
            ..
        })
    ));
    assert_eq!(rt.map_calls, 0);
}

#[test]
fn unknown_image_is_a_runtime_error() {
    let mut rt = SoftwareRuntime::default();
    let err = convert_vision_to_host(&mut rt, ImageHandle::from_raw(99)).unwrap_err();
    assert_eq!(err.status(), Some(Status::ERROR_INVALID_REFERENCE));
}
