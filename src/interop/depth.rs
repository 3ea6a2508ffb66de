use crate::{
    foundation::{
        core::Rect,
        error::{InteropError, InteropResult},
    },
    format::table::{ElemType, VisionFormat},
    host::matrix::HostMatrix,
    interop::convert::convert_host_to_vision,
    runtime::api::{ImageHandle, PatchAddressing, VisionRuntime},
};

/// How out-of-range values are brought into `u8`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConvertPolicy {
    /// Clamp to `[0, 255]`.
    #[default]
    Saturate,
    /// Keep the low byte.
    Wrap,
}

/// Down-convert an `S16` image into a new `U8` image: `value >> shift`, then `policy`.
#[tracing::instrument(skip(runtime))]
pub fn convert_depth<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    image: ImageHandle,
    policy: ConvertPolicy,
    shift: u32,
) -> InteropResult<ImageHandle> {
    if shift >= 16 {
        return Err(InteropError::validation(format!(
            "shift {shift} is outside [0, 16)"
        )));
    }
    let info = runtime
        .query_image(image)
        .map_err(|status| InteropError::runtime("query_image", status))?;
    if info.format != VisionFormat::S16 {
        return Err(InteropError::unsupported_format(format!(
            "depth conversion expects {:?}, got {:?}",
            VisionFormat::S16,
            info.format
        )));
    }

    let mut wide = HostMatrix::new(info.width, info.height, ElemType::S16C1);
    let addressing = PatchAddressing {
        dim_x: info.width,
        dim_y: info.height,
        stride_x: ElemType::S16C1.size(),
        stride_y: wide.stride(),
    };
    let rect = Rect::full(info.width, info.height);
    runtime
        .read_image_patch(image, rect, &addressing, wide.as_bytes_mut())
        .map_err(|status| InteropError::runtime("read_image_patch", status))?;

    let mut narrow = HostMatrix::new(info.width, info.height, ElemType::U8C1);
    for y in 0..info.height {
        let src = wide.row(y);
        for (dst, px) in narrow.row_mut(y).iter_mut().zip(src.chunks_exact(2)) {
            let v = i16::from_ne_bytes([px[0], px[1]]) >> shift;
            *dst = match policy {
                ConvertPolicy::Saturate => v.clamp(0, 255) as u8,
                ConvertPolicy::Wrap => v as u8,
            };
        }
    }
    convert_host_to_vision(runtime, &narrow)
}

#[cfg(test)]
#[path = "../../tests/unit/interop/depth.rs"]
mod tests;
