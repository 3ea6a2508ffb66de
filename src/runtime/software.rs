use std::collections::HashMap;

use crate::{
    foundation::{
        core::{Coord2df, Rect},
        error::Status,
    },
    format::table::VisionFormat,
    runtime::api::{
        ImageHandle, ImageInfo, MapId, MappedPatch, PatchAddressing, RemapHandle, RemapInfo,
        Usage, VisionRuntime,
    },
};

/// Environment variable read by [`SoftwareRuntimeOpts::from_env`].
pub const ROW_ALIGN_ENV: &str = "VISION_INTEROP_ROW_ALIGN";

const COORD_PAIR_BYTES: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SoftwareRuntimeOpts {
    /// Image rows are padded up to a multiple of this many bytes.
    pub row_align: usize,
}

impl Default for SoftwareRuntimeOpts {
    fn default() -> Self {
        Self { row_align: 1 }
    }
}

impl SoftwareRuntimeOpts {
    /// Defaults, with `row_align` taken from `VISION_INTEROP_ROW_ALIGN` when it
    /// holds a positive integer.
    pub fn from_env() -> Self {
        let row_align = std::env::var(ROW_ALIGN_ENV)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(Self::default().row_align);
        Self { row_align }
    }
}

/// In-process vision runtime backed by plain byte buffers.
pub struct SoftwareRuntime {
    opts: SoftwareRuntimeOpts,
    next_id: u64,
    images: HashMap<ImageHandle, StoredImage>,
    remaps: HashMap<RemapHandle, StoredRemap>,
}

struct StoredImage {
    info: ImageInfo,
    stride: usize,
    data: Vec<u8>,
    mapped: Option<(MapId, Rect)>,
}

struct StoredRemap {
    info: RemapInfo,
    coords: Vec<Coord2df>,
}

impl Default for SoftwareRuntime {
    fn default() -> Self {
        Self::new(SoftwareRuntimeOpts::default())
    }
}

impl SoftwareRuntime {
    pub fn new(opts: SoftwareRuntimeOpts) -> Self {
        Self {
            opts: SoftwareRuntimeOpts {
                row_align: opts.row_align.max(1),
            },
            next_id: 1,
            images: HashMap::new(),
            remaps: HashMap::new(),
        }
    }

    pub fn opts(&self) -> SoftwareRuntimeOpts {
        self.opts
    }

    /// Number of mappings currently open across all images.
    pub fn open_maps(&self) -> usize {
        self.images.values().filter(|i| i.mapped.is_some()).count()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn remap_count(&self) -> usize {
        self.remaps.len()
    }

    /// Row stride the runtime uses for `image`.
    pub fn image_stride(&self, image: ImageHandle) -> Result<usize, Status> {
        Ok(self.image(image)?.stride)
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn aligned(&self, row_bytes: usize) -> usize {
        row_bytes.div_ceil(self.opts.row_align) * self.opts.row_align
    }

    fn image(&self, image: ImageHandle) -> Result<&StoredImage, Status> {
        self.images
            .get(&image)
            .ok_or(Status::ERROR_INVALID_REFERENCE)
    }

    fn image_mut(&mut self, image: ImageHandle) -> Result<&mut StoredImage, Status> {
        self.images
            .get_mut(&image)
            .ok_or(Status::ERROR_INVALID_REFERENCE)
    }

    fn remap(&self, remap: RemapHandle) -> Result<&StoredRemap, Status> {
        self.remaps
            .get(&remap)
            .ok_or(Status::ERROR_INVALID_REFERENCE)
    }
}

fn check_rect(rect: Rect, width: u32, height: u32) -> Result<(), Status> {
    if rect.is_empty() || rect.end_x > width || rect.end_y > height {
        return Err(Status::ERROR_INVALID_PARAMETERS);
    }
    Ok(())
}

/// Byte length a caller buffer needs to hold `rect` under `addressing`.
fn required_len(rect: Rect, addressing: &PatchAddressing, bpp: usize) -> usize {
    let last_row = (rect.height() as usize - 1) * addressing.stride_y;
    let last_px = (rect.width() as usize - 1) * addressing.stride_x;
    last_row + last_px + bpp
}

impl VisionRuntime for SoftwareRuntime {
    fn create_image(
        &mut self,
        width: u32,
        height: u32,
        format: VisionFormat,
    ) -> Result<ImageHandle, Status> {
        if width == 0 || height == 0 {
            return Err(Status::ERROR_INVALID_DIMENSION);
        }
        let stride = self.aligned(width as usize * format.bytes_per_pixel());
        let len = stride
            .checked_mul(height as usize)
            .ok_or(Status::ERROR_NO_MEMORY)?;

        let handle = ImageHandle::from_raw(self.alloc_id());
        self.images.insert(
            handle,
            StoredImage {
                info: ImageInfo {
                    width,
                    height,
                    format,
                },
                stride,
                data: vec![0; len],
                mapped: None,
            },
        );
        Ok(handle)
    }

    fn create_remap(
        &mut self,
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
    ) -> Result<RemapHandle, Status> {
        if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
            return Err(Status::ERROR_INVALID_DIMENSION);
        }
        let len = (dst_width as usize)
            .checked_mul(dst_height as usize)
            .ok_or(Status::ERROR_NO_MEMORY)?;

        let handle = RemapHandle::from_raw(self.alloc_id());
        self.remaps.insert(
            handle,
            StoredRemap {
                info: RemapInfo {
                    src_width,
                    src_height,
                    dst_width,
                    dst_height,
                },
                coords: vec![Coord2df::default(); len],
            },
        );
        Ok(handle)
    }

    fn query_image(&self, image: ImageHandle) -> Result<ImageInfo, Status> {
        Ok(self.image(image)?.info)
    }

    fn query_remap(&self, remap: RemapHandle) -> Result<RemapInfo, Status> {
        Ok(self.remap(remap)?.info)
    }

    fn map_image_patch(
        &mut self,
        image: ImageHandle,
        rect: Rect,
        usage: Usage,
    ) -> Result<MappedPatch, Status> {
        let map_id = MapId::from_raw(self.next_id);
        let row_align = self.opts.row_align;
        let stored = self.image_mut(image)?;
        if stored.mapped.is_some() {
            return Err(Status::ERROR_MULTIPLE_WRITERS);
        }
        check_rect(rect, stored.info.width, stored.info.height)?;

        let bpp = stored.info.format.bytes_per_pixel();
        let x_off = rect.start_x as usize * bpp;
        // A full-width patch exposes the stored rows, padding included.
        let stride_y = if rect.start_x == 0 && rect.end_x == stored.info.width {
            stored.stride
        } else {
            (rect.width() as usize * bpp).div_ceil(row_align) * row_align
        };
        let copy_len = stride_y.min(stored.stride - x_off);

        let mut data = vec![0; stride_y * rect.height() as usize];
        for (y, dst) in data.chunks_exact_mut(stride_y).enumerate() {
            let src = (rect.start_y as usize + y) * stored.stride + x_off;
            dst[..copy_len].copy_from_slice(&stored.data[src..src + copy_len]);
        }
        stored.mapped = Some((map_id, rect));
        self.next_id += 1;

        Ok(MappedPatch {
            map_id,
            usage,
            addressing: PatchAddressing {
                dim_x: rect.width(),
                dim_y: rect.height(),
                stride_x: bpp,
                stride_y,
            },
            data,
        })
    }

    fn unmap_image_patch(&mut self, image: ImageHandle, patch: MappedPatch) -> Result<(), Status> {
        let stored = self.image_mut(image)?;
        let Some((map_id, rect)) = stored.mapped else {
            return Err(Status::ERROR_INVALID_PARAMETERS);
        };
        if map_id != patch.map_id {
            return Err(Status::ERROR_INVALID_PARAMETERS);
        }

        if patch.usage == Usage::WriteOnly {
            let bpp = stored.info.format.bytes_per_pixel();
            let x_off = rect.start_x as usize * bpp;
            let stride_y = patch.addressing.stride_y;
            let copy_len = stride_y.min(stored.stride - x_off);
            for (y, src) in patch.data.chunks_exact(stride_y).enumerate() {
                let dst = (rect.start_y as usize + y) * stored.stride + x_off;
                stored.data[dst..dst + copy_len].copy_from_slice(&src[..copy_len]);
            }
        }
        stored.mapped = None;
        Ok(())
    }

    fn write_image_patch(
        &mut self,
        image: ImageHandle,
        rect: Rect,
        addressing: &PatchAddressing,
        data: &[u8],
    ) -> Result<(), Status> {
        let stored = self.image_mut(image)?;
        if stored.mapped.is_some() {
            return Err(Status::ERROR_MULTIPLE_WRITERS);
        }
        check_rect(rect, stored.info.width, stored.info.height)?;
        let bpp = stored.info.format.bytes_per_pixel();
        if addressing.stride_x < bpp || data.len() < required_len(rect, addressing, bpp) {
            return Err(Status::ERROR_INVALID_PARAMETERS);
        }

        for y in 0..rect.height() as usize {
            for x in 0..rect.width() as usize {
                let src = y * addressing.stride_y + x * addressing.stride_x;
                let dst = (rect.start_y as usize + y) * stored.stride
                    + (rect.start_x as usize + x) * bpp;
                stored.data[dst..dst + bpp].copy_from_slice(&data[src..src + bpp]);
            }
        }
        Ok(())
    }

    fn read_image_patch(
        &self,
        image: ImageHandle,
        rect: Rect,
        addressing: &PatchAddressing,
        data: &mut [u8],
    ) -> Result<(), Status> {
        let stored = self.image(image)?;
        if stored.mapped.is_some() {
            return Err(Status::ERROR_MULTIPLE_WRITERS);
        }
        check_rect(rect, stored.info.width, stored.info.height)?;
        let bpp = stored.info.format.bytes_per_pixel();
        if addressing.stride_x < bpp || data.len() < required_len(rect, addressing, bpp) {
            return Err(Status::ERROR_INVALID_PARAMETERS);
        }

        for y in 0..rect.height() as usize {
            for x in 0..rect.width() as usize {
                let dst = y * addressing.stride_y + x * addressing.stride_x;
                let src = (rect.start_y as usize + y) * stored.stride
                    + (rect.start_x as usize + x) * bpp;
                data[dst..dst + bpp].copy_from_slice(&stored.data[src..src + bpp]);
            }
        }
        Ok(())
    }

    fn write_remap_patch(
        &mut self,
        remap: RemapHandle,
        rect: Rect,
        stride_y: usize,
        data: &[u8],
    ) -> Result<(), Status> {
        let stored = self
            .remaps
            .get_mut(&remap)
            .ok_or(Status::ERROR_INVALID_REFERENCE)?;
        check_rect(rect, stored.info.dst_width, stored.info.dst_height)?;
        let row_bytes = rect.width() as usize * COORD_PAIR_BYTES;
        let required = (rect.height() as usize - 1) * stride_y + row_bytes;
        if stride_y < row_bytes || data.len() < required {
            return Err(Status::ERROR_INVALID_PARAMETERS);
        }

        let dst_width = stored.info.dst_width as usize;
        for y in 0..rect.height() as usize {
            let row = &data[y * stride_y..y * stride_y + row_bytes];
            let base = (rect.start_y as usize + y) * dst_width + rect.start_x as usize;
            for (x, pair) in row.chunks_exact(COORD_PAIR_BYTES).enumerate() {
                let (px, py) = pair.split_at(4);
                stored.coords[base + x] = Coord2df::new(
                    f32::from_ne_bytes([px[0], px[1], px[2], px[3]]),
                    f32::from_ne_bytes([py[0], py[1], py[2], py[3]]),
                );
            }
        }
        Ok(())
    }

    fn read_remap_patch(&self, remap: RemapHandle, rect: Rect) -> Result<Vec<Coord2df>, Status> {
        let stored = self.remap(remap)?;
        check_rect(rect, stored.info.dst_width, stored.info.dst_height)?;
        let dst_width = stored.info.dst_width as usize;
        let mut out = Vec::with_capacity(rect.width() as usize * rect.height() as usize);
        for y in rect.start_y..rect.end_y {
            let base = y as usize * dst_width;
            out.extend_from_slice(
                &stored.coords[base + rect.start_x as usize..base + rect.end_x as usize],
            );
        }
        Ok(out)
    }

    fn release_image(&mut self, image: ImageHandle) -> Result<(), Status> {
        if self.image(image)?.mapped.is_some() {
            return Err(Status::ERROR_REFERENCE_NONZERO);
        }
        self.images.remove(&image);
        Ok(())
    }

    fn release_remap(&mut self, remap: RemapHandle) -> Result<(), Status> {
        self.remaps
            .remove(&remap)
            .map(|_| ())
            .ok_or(Status::ERROR_INVALID_REFERENCE)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/software.rs"]
mod tests;
