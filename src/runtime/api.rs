use crate::{
    foundation::{
        core::{Coord2df, Rect},
        error::Status,
    },
    format::table::VisionFormat,
};

/// Identifier of a runtime-owned image. Carries no memory of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(u64);

impl ImageHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Identifier of a runtime-owned remap field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RemapHandle(u64);

impl RemapHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Identifier of one open mapping, returned by map and consumed by unmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MapId(u64);

impl MapId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Usage {
    ReadOnly,
    WriteOnly,
}

/// Layout of a mapped or caller-provided patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchAddressing {
    /// Patch width in pixels.
    pub dim_x: u32,
    /// Patch height in pixels.
    pub dim_y: u32,
    /// Bytes between horizontally adjacent pixels.
    pub stride_x: usize,
    /// Bytes between the starts of adjacent rows.
    pub stride_y: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: VisionFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemapInfo {
    pub src_width: u32,
    pub src_height: u32,
    pub dst_width: u32,
    pub dst_height: u32,
}

/// A mapped view onto an image's backing memory.
///
/// `data` holds `addressing.dim_y` rows spaced `addressing.stride_y` bytes
/// apart. The view is valid until it is handed back to
/// [`VisionRuntime::unmap_image_patch`]; write-only views are committed then.
#[derive(Debug)]
pub struct MappedPatch {
    pub map_id: MapId,
    pub usage: Usage,
    pub addressing: PatchAddressing,
    pub data: Vec<u8>,
}

/// The external vision-buffer runtime.
///
/// Every call reports failure as a numeric [`Status`]; translating that into an
/// [`crate::InteropError`] is the caller's job.
pub trait VisionRuntime {
    fn create_image(
        &mut self,
        width: u32,
        height: u32,
        format: VisionFormat,
    ) -> Result<ImageHandle, Status>;

    fn create_remap(
        &mut self,
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
    ) -> Result<RemapHandle, Status>;

    fn query_image(&self, image: ImageHandle) -> Result<ImageInfo, Status>;

    fn query_remap(&self, remap: RemapHandle) -> Result<RemapInfo, Status>;

    fn map_image_patch(
        &mut self,
        image: ImageHandle,
        rect: Rect,
        usage: Usage,
    ) -> Result<MappedPatch, Status>;

    fn unmap_image_patch(&mut self, image: ImageHandle, patch: MappedPatch) -> Result<(), Status>;

    /// Copy `data`, laid out per `addressing`, into `rect` of the image.
    fn write_image_patch(
        &mut self,
        image: ImageHandle,
        rect: Rect,
        addressing: &PatchAddressing,
        data: &[u8],
    ) -> Result<(), Status>;

    /// Copy `rect` of the image into `data`, laid out per `addressing`.
    fn read_image_patch(
        &self,
        image: ImageHandle,
        rect: Rect,
        addressing: &PatchAddressing,
        data: &mut [u8],
    ) -> Result<(), Status>;

    /// Copy coordinate pairs into `rect` of the remap's destination grid.
    /// `data` rows are `stride_y` bytes apart, each pair two native-endian `f32`s.
    fn write_remap_patch(
        &mut self,
        remap: RemapHandle,
        rect: Rect,
        stride_y: usize,
        data: &[u8],
    ) -> Result<(), Status>;

    fn read_remap_patch(
        &self,
        remap: RemapHandle,
        rect: Rect,
    ) -> Result<Vec<Coord2df>, Status>;

    fn release_image(&mut self, image: ImageHandle) -> Result<(), Status>;

    fn release_remap(&mut self, remap: RemapHandle) -> Result<(), Status>;
}
