use crate::{
    foundation::error::{InteropError, InteropResult},
    format::table,
    host::matrix::HostMatrix,
    patch::session::PatchSession,
    runtime::api::{ImageHandle, Usage, VisionRuntime},
};

/// Copy a gray or RGB vision image into a freshly allocated host matrix.
///
/// The matrix takes the patch's row stride, so row padding reported by the
/// runtime is carried over byte for byte.
#[tracing::instrument(skip(runtime))]
pub fn convert_vision_to_host<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    image: ImageHandle,
) -> InteropResult<HostMatrix> {
    let info = runtime
        .query_image(image)
        .map_err(|status| InteropError::runtime("query_image", status))?;
    let elem = table::to_host(info.format)?;

    let session = PatchSession::open(runtime, image, Usage::ReadOnly)?;
    let stride_y = session.addressing().stride_y;
    let mut host = HostMatrix::with_stride(info.width, info.height, elem, stride_y)?;
    session.copy_in(&mut host)?;
    session.close()?;

    tracing::debug!(width = info.width, height = info.height, stride_y, "vision -> host");
    Ok(host)
}

/// Create a new vision image holding the pixels of a gray or RGB host matrix.
///
/// On failure the partially written image is released again.
#[tracing::instrument(skip(runtime, host), fields(width = host.width(), height = host.height()))]
pub fn convert_host_to_vision<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    host: &HostMatrix,
) -> InteropResult<ImageHandle> {
    let format = table::to_vision(host.elem())?;
    let image = runtime
        .create_image(host.width(), host.height(), format)
        .map_err(|status| InteropError::runtime("create_image", status))?;

    match write_host(runtime, image, host) {
        Ok(()) => Ok(image),
        Err(err) => {
            if let Err(status) = runtime.release_image(image) {
                tracing::warn!(%status, "releasing image after failed write");
            }
            Err(err)
        }
    }
}

fn write_host<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    image: ImageHandle,
    host: &HostMatrix,
) -> InteropResult<()> {
    let mut session = PatchSession::open(runtime, image, Usage::WriteOnly)?;
    session.copy_out(host)?;
    session.close()
}

#[cfg(test)]
#[path = "../../tests/unit/interop/convert.rs"]
mod tests;
