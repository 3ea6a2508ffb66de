use std::path::Path;

use crate::{
    document::store::{DocumentStore, JsonDocument},
    foundation::{
        core::Rect,
        error::{InteropError, InteropResult},
    },
    format::table::{self, ElemType},
    host::codec,
    interop::convert::{convert_host_to_vision, convert_vision_to_host},
    runtime::api::{ImageHandle, PatchAddressing, RemapHandle, VisionRuntime},
};

/// Remap field created from a document, with its destination size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportedRemap {
    pub remap: RemapHandle,
    pub dst_width: u32,
    pub dst_height: u32,
}

/// Image created from a document matrix, with its size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportedImage {
    pub image: ImageHandle,
    pub width: u32,
    pub height: u32,
}

/// Build a remap field from the coordinate matrix stored under `node`.
///
/// The sizes come from the scalars `<node>_src_width`, `<node>_src_height`,
/// `<node>_dst_width` and `<node>_dst_height`; the matrix must be
/// `dst_width x dst_height` pairs of `f32` and is written in one patch.
#[tracing::instrument(skip(runtime, doc))]
pub fn import_remap_field<R, D>(runtime: &mut R, doc: &D, node: &str) -> InteropResult<ImportedRemap>
where
    R: VisionRuntime + ?Sized,
    D: DocumentStore + ?Sized,
{
    let coords = doc.matrix(node)?;
    let src_width = dimension(doc, node, "src_width")?;
    let src_height = dimension(doc, node, "src_height")?;
    let dst_width = dimension(doc, node, "dst_width")?;
    let dst_height = dimension(doc, node, "dst_height")?;

    if coords.elem() != ElemType::F32C2 {
        return Err(InteropError::unsupported_format(format!(
            "remap node '{node}' must be {:?}, got {:?}",
            ElemType::F32C2,
            coords.elem()
        )));
    }
    if coords.width() != dst_width || coords.height() != dst_height {
        return Err(InteropError::validation(format!(
            "remap node '{node}' is {}x{}, destination is {dst_width}x{dst_height}",
            coords.width(),
            coords.height()
        )));
    }

    let remap = runtime
        .create_remap(src_width, src_height, dst_width, dst_height)
        .map_err(|status| InteropError::runtime("create_remap", status))?;
    let rect = Rect::full(dst_width, dst_height);
    if let Err(status) = runtime.write_remap_patch(remap, rect, coords.stride(), coords.as_bytes()) {
        if let Err(release) = runtime.release_remap(remap) {
            tracing::warn!(status = %release, "releasing remap after failed write");
        }
        return Err(InteropError::runtime("write_remap_patch", status));
    }

    tracing::debug!(src_width, src_height, dst_width, dst_height, "remap imported");
    Ok(ImportedRemap {
        remap,
        dst_width,
        dst_height,
    })
}

/// Build a 16-bit signed image from the `S16C1` matrix stored under `node`.
#[tracing::instrument(skip(runtime, doc))]
pub fn import_image_from_document<R, D>(
    runtime: &mut R,
    doc: &D,
    node: &str,
) -> InteropResult<ImportedImage>
where
    R: VisionRuntime + ?Sized,
    D: DocumentStore + ?Sized,
{
    let matrix = doc.matrix(node)?;
    let format = table::document_import_format(matrix.elem())?;
    let (width, height) = (matrix.width(), matrix.height());

    let image = runtime
        .create_image(width, height, format)
        .map_err(|status| InteropError::runtime("create_image", status))?;
    let addressing = PatchAddressing {
        dim_x: width,
        dim_y: height,
        stride_x: matrix.elem().size(),
        stride_y: matrix.stride(),
    };
    let rect = Rect::full(width, height);
    if let Err(status) = runtime.write_image_patch(image, rect, &addressing, matrix.as_bytes()) {
        tracing::warn!(%status, "write_image_patch failed");
        if let Err(release) = runtime.release_image(image) {
            tracing::warn!(status = %release, "releasing image after failed write");
        }
        return Err(InteropError::runtime("write_image_patch", status));
    }

    Ok(ImportedImage {
        image,
        width,
        height,
    })
}

/// [`import_remap_field`] on a JSON document read from `path`.
pub fn import_remap_field_from_path<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    path: impl AsRef<Path>,
    node: &str,
) -> InteropResult<ImportedRemap> {
    let doc = JsonDocument::from_path(path)?;
    import_remap_field(runtime, &doc, node)
}

/// [`import_image_from_document`] on a JSON document read from `path`.
pub fn import_image_from_document_path<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    path: impl AsRef<Path>,
    node: &str,
) -> InteropResult<ImportedImage> {
    let doc = JsonDocument::from_path(path)?;
    import_image_from_document(runtime, &doc, node)
}

/// Encode a gray or RGB vision image to `path`.
#[tracing::instrument(skip(runtime, path), fields(file = %path.as_ref().display()))]
pub fn export_image_to_file<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    image: ImageHandle,
    path: impl AsRef<Path>,
) -> InteropResult<()> {
    let host = convert_vision_to_host(runtime, image)?;
    codec::encode_matrix(&host, path)
}

/// Decode `path` into a new gray or RGB vision image.
#[tracing::instrument(skip(runtime, path), fields(file = %path.as_ref().display()))]
pub fn import_image_from_file<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    path: impl AsRef<Path>,
) -> InteropResult<ImageHandle> {
    let host = codec::decode_matrix(path)?;
    convert_host_to_vision(runtime, &host)
}

fn dimension<D: DocumentStore + ?Sized>(doc: &D, node: &str, suffix: &str) -> InteropResult<u32> {
    let key = format!("{node}_{suffix}");
    let value = doc.scalar(&key)?;
    u32::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| InteropError::document(format!("'{key}' = {value} is not a positive size")))
}

#[cfg(test)]
#[path = "../../tests/unit/interop/import.rs"]
mod tests;
