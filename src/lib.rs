//! Image interchange between handle-based vision buffers and host matrices.
//!
//! A [`VisionRuntime`] owns images and remap fields behind opaque handles and
//! hands out rectangular patches with explicit addressing. This crate moves
//! pixels between those patches and stride-addressed [`HostMatrix`] buffers:
//!
//! - Convert gray or RGB images in both directions, padding included
//! - Import remap fields and 16-bit images from a matrix document
//! - Load and save images through host codecs
//! - Draw lines and circles on a copy of an image
//!
//! Every mapping is held by a [`PatchSession`] and is closed before the
//! operation that opened it returns.
#![forbid(unsafe_code)]

mod document;
mod draw;
mod foundation;
mod format;
mod host;
mod interop;
mod patch;
mod runtime;

pub use crate::foundation::core::{Coord2d, Coord2df, Line2d, Rect, Rgb8};
pub use crate::foundation::error::{InteropError, InteropResult, Status};

pub use crate::format::table::{ElemType, VisionFormat, document_import_format, to_host, to_vision};
pub use crate::host::codec::{decode_matrix, decode_matrix_bytes, encode_matrix};
pub use crate::host::matrix::HostMatrix;

pub use crate::runtime::api::{
    ImageHandle, ImageInfo, MapId, MappedPatch, PatchAddressing, RemapHandle, RemapInfo, Usage,
    VisionRuntime,
};
pub use crate::runtime::software::{ROW_ALIGN_ENV, SoftwareRuntime, SoftwareRuntimeOpts};

pub use crate::patch::session::PatchSession;

pub use crate::document::store::{DocumentStore, JsonDocument};

pub use crate::interop::convert::{convert_host_to_vision, convert_vision_to_host};
pub use crate::interop::depth::{ConvertPolicy, convert_depth};
pub use crate::interop::import::{
    ImportedImage, ImportedRemap, export_image_to_file, import_image_from_document,
    import_image_from_document_path, import_image_from_file, import_remap_field,
    import_remap_field_from_path,
};

pub use crate::draw::roundtrip::{DrawStyle, draw_circles, draw_lines};
