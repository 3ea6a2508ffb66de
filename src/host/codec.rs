use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::error::{InteropError, InteropResult},
    format::table::ElemType,
    host::matrix::HostMatrix,
};

/// Decode an image file into a host matrix.
///
/// Gray files without alpha become `U8C1`, everything else `U8C3` (R, G, B).
pub fn decode_matrix(path: impl AsRef<Path>) -> InteropResult<HostMatrix> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| InteropError::decode(format!("read '{}': {e}", path.display())))?;
    decode_matrix_bytes(&bytes)
}

/// Decode encoded image bytes into a host matrix.
pub fn decode_matrix_bytes(bytes: &[u8]) -> InteropResult<HostMatrix> {
    let dyn_img =
        image::load_from_memory(bytes).map_err(|e| InteropError::decode(e.to_string()))?;
    let (width, height) = (dyn_img.width(), dyn_img.height());

    let (elem, raw) = match dyn_img.color() {
        image::ColorType::L8 | image::ColorType::L16 => {
            (ElemType::U8C1, dyn_img.to_luma8().into_raw())
        }
        _ => (ElemType::U8C3, dyn_img.to_rgb8().into_raw()),
    };
    let stride = width as usize * elem.size();
    HostMatrix::from_bytes(width, height, elem, stride, raw)
}

/// Encode a gray or RGB host matrix; the container is picked from the file extension.
pub fn encode_matrix(matrix: &HostMatrix, path: impl AsRef<Path>) -> InteropResult<()> {
    let path = path.as_ref();
    let color = match matrix.elem() {
        ElemType::U8C1 => image::ColorType::L8,
        ElemType::U8C3 => image::ColorType::Rgb8,
        other => {
            return Err(InteropError::unsupported_format(format!(
                "cannot encode {other:?} matrices"
            )));
        }
    };
    let format = image::ImageFormat::from_path(path)
        .map_err(|e| InteropError::encode(format!("'{}': {e}", path.display())))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let packed = matrix.to_packed();
    image::save_buffer_with_format(
        path,
        packed.as_bytes(),
        packed.width(),
        packed.height(),
        color,
        format,
    )
    .map_err(|e| InteropError::encode(format!("write '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/host/codec.rs"]
mod tests;
