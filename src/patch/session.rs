use crate::{
    foundation::{
        core::Rect,
        error::{InteropError, InteropResult},
    },
    host::matrix::HostMatrix,
    runtime::api::{ImageHandle, MappedPatch, PatchAddressing, Usage, VisionRuntime},
};

/// Scoped mapping of a whole image.
///
/// The session holds the runtime mutably for its lifetime, so no second
/// session can be opened while it is alive. The patch is unmapped by
/// [`PatchSession::close`] or, failing that, when the session is dropped.
pub struct PatchSession<'rt, R: VisionRuntime + ?Sized> {
    runtime: &'rt mut R,
    image: ImageHandle,
    patch: MappedPatch,
    open: bool,
}

impl<'rt, R: VisionRuntime + ?Sized> PatchSession<'rt, R> {
    pub fn open(runtime: &'rt mut R, image: ImageHandle, usage: Usage) -> InteropResult<Self> {
        let info = runtime
            .query_image(image)
            .map_err(|status| InteropError::runtime("query_image", status))?;
        let rect = Rect::full(info.width, info.height);
        let patch = runtime
            .map_image_patch(image, rect, usage)
            .map_err(|status| {
                tracing::warn!(%status, image = image.raw(), "map_image_patch failed");
                InteropError::mapping("map_image_patch", status)
            })?;
        tracing::debug!(
            image = image.raw(),
            ?usage,
            stride_x = patch.addressing.stride_x,
            stride_y = patch.addressing.stride_y,
            "patch mapped"
        );
        Ok(Self {
            runtime,
            image,
            patch,
            open: true,
        })
    }

    pub fn image(&self) -> ImageHandle {
        self.image
    }

    pub fn usage(&self) -> Usage {
        self.patch.usage
    }

    pub fn addressing(&self) -> PatchAddressing {
        self.patch.addressing
    }

    /// Mapped bytes, `dim_y` rows of `stride_y` bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.patch.data
    }

    /// Mutable mapped bytes; only write-only sessions hand them out.
    pub fn bytes_mut(&mut self) -> InteropResult<&mut [u8]> {
        if self.patch.usage != Usage::WriteOnly {
            return Err(InteropError::validation(
                "read-only session cannot be written",
            ));
        }
        Ok(&mut self.patch.data)
    }

    /// Copy the mapped rows into `host`, `stride_y` bytes per row.
    pub fn copy_in(&self, host: &mut HostMatrix) -> InteropResult<()> {
        let addressing = self.addressing();
        let row_len = row_copy_len(&addressing, host)?;
        let data = self.bytes();
        for y in 0..addressing.dim_y {
            let src = y as usize * addressing.stride_y;
            host.row_with_stride_mut(y)[..row_len].copy_from_slice(&data[src..src + row_len]);
        }
        Ok(())
    }

    /// Copy `host` rows into the mapped patch, `stride_y` bytes per row.
    pub fn copy_out(&mut self, host: &HostMatrix) -> InteropResult<()> {
        let addressing = self.addressing();
        let row_len = row_copy_len(&addressing, host)?;
        let data = self.bytes_mut()?;
        for y in 0..addressing.dim_y {
            let dst = y as usize * addressing.stride_y;
            data[dst..dst + row_len].copy_from_slice(&host.row_with_stride(y)[..row_len]);
        }
        Ok(())
    }

    /// Unmap now and report the runtime's status.
    pub fn close(mut self) -> InteropResult<()> {
        match self.take_patch() {
            Some(patch) => self
                .runtime
                .unmap_image_patch(self.image, patch)
                .map_err(|status| InteropError::mapping("unmap_image_patch", status)),
            None => Ok(()),
        }
    }

    fn take_patch(&mut self) -> Option<MappedPatch> {
        if !self.open {
            return None;
        }
        self.open = false;
        Some(MappedPatch {
            map_id: self.patch.map_id,
            usage: self.patch.usage,
            addressing: self.patch.addressing,
            data: std::mem::take(&mut self.patch.data),
        })
    }
}

impl<R: VisionRuntime + ?Sized> Drop for PatchSession<'_, R> {
    fn drop(&mut self) {
        if let Some(patch) = self.take_patch()
            && let Err(status) = self.runtime.unmap_image_patch(self.image, patch)
        {
            tracing::warn!(%status, image = self.image.raw(), "unmap during drop failed");
        }
    }
}

/// Bytes to copy per row: the full `stride_y`, bounded by what a host row holds.
fn row_copy_len(addressing: &PatchAddressing, host: &HostMatrix) -> InteropResult<usize> {
    if addressing.stride_x != 1 && addressing.stride_x != 3 {
        return Err(InteropError::AddressingUnsupported {
            stride_x: addressing.stride_x,
        });
    }
    if addressing.stride_x != host.elem().size() {
        return Err(InteropError::validation(format!(
            "patch stride_x {} does not match host element {:?}",
            addressing.stride_x,
            host.elem()
        )));
    }
    if host.width() != addressing.dim_x || host.height() != addressing.dim_y {
        return Err(InteropError::validation(format!(
            "host matrix is {}x{}, patch is {}x{}",
            host.width(),
            host.height(),
            addressing.dim_x,
            addressing.dim_y
        )));
    }
    let row_len = addressing.stride_y.min(host.stride());
    if row_len < host.row_bytes() {
        return Err(InteropError::validation(format!(
            "patch stride_y {} cannot hold a {}-byte row",
            addressing.stride_y,
            host.row_bytes()
        )));
    }
    Ok(row_len)
}

#[cfg(test)]
#[path = "../../tests/unit/patch/session.rs"]
mod tests;
