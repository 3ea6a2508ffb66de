use crate::{
    foundation::error::{InteropError, InteropResult},
    format::table::ElemType,
};

/// Dense row-major pixel buffer owned by the host side.
///
/// Rows start every `stride` bytes. The first `width * elem.size()` bytes of a
/// row are pixels, anything after that is padding and is carried along
/// untouched by the copy routines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostMatrix {
    width: u32,
    height: u32,
    elem: ElemType,
    stride: usize,
    data: Vec<u8>,
}

impl HostMatrix {
    /// Zeroed matrix with tightly packed rows.
    pub fn new(width: u32, height: u32, elem: ElemType) -> Self {
        let stride = width as usize * elem.size();
        Self {
            width,
            height,
            elem,
            stride,
            data: vec![0; stride * height as usize],
        }
    }

    /// Zeroed matrix whose rows are `stride` bytes apart.
    pub fn with_stride(
        width: u32,
        height: u32,
        elem: ElemType,
        stride: usize,
    ) -> InteropResult<Self> {
        check_stride(width, elem, stride)?;
        let len = stride
            .checked_mul(height as usize)
            .ok_or_else(|| InteropError::validation("matrix size overflows usize"))?;
        Ok(Self {
            width,
            height,
            elem,
            stride,
            data: vec![0; len],
        })
    }

    /// Matrix where every element byte is `value`.
    pub fn filled(width: u32, height: u32, elem: ElemType, value: u8) -> Self {
        let mut m = Self::new(width, height, elem);
        m.data.fill(value);
        m
    }

    /// Wrap existing bytes. `data` must hold at least `stride * height` bytes;
    /// anything beyond that is dropped.
    pub fn from_bytes(
        width: u32,
        height: u32,
        elem: ElemType,
        stride: usize,
        mut data: Vec<u8>,
    ) -> InteropResult<Self> {
        check_stride(width, elem, stride)?;
        let required = stride
            .checked_mul(height as usize)
            .ok_or_else(|| InteropError::validation("matrix size overflows usize"))?;
        if data.len() < required {
            return Err(InteropError::validation(format!(
                "matrix data is {} bytes, {required} required",
                data.len()
            )));
        }
        data.truncate(required);
        Ok(Self {
            width,
            height,
            elem,
            stride,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn elem(&self) -> ElemType {
        self.elem
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Visible bytes per row, `width * elem.size()`.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.elem.size()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// All rows, padding included.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pixel bytes of row `y`, padding excluded.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = self.row_start(y);
        &self.data[start..start + self.row_bytes()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = self.row_start(y);
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    /// Full `stride` bytes of row `y`, padding included.
    pub fn row_with_stride(&self, y: u32) -> &[u8] {
        let start = self.row_start(y);
        &self.data[start..start + self.stride]
    }

    pub fn row_with_stride_mut(&mut self, y: u32) -> &mut [u8] {
        let start = self.row_start(y);
        let stride = self.stride;
        &mut self.data[start..start + stride]
    }

    /// Bytes of the element at `(x, y)`, or `None` outside the matrix.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let size = self.elem.size();
        let start = y as usize * self.stride + x as usize * size;
        self.data.get(start..start + size)
    }

    /// Replicate a gray matrix into a tightly packed three-channel one.
    pub fn gray_to_rgb(&self) -> InteropResult<HostMatrix> {
        if self.elem != ElemType::U8C1 {
            return Err(InteropError::unsupported_format(format!(
                "gray promotion expects {:?}, got {:?}",
                ElemType::U8C1,
                self.elem
            )));
        }
        let mut out = HostMatrix::new(self.width, self.height, ElemType::U8C3);
        for y in 0..self.height {
            let src = self.row(y);
            for (dst, &v) in out.row_mut(y).chunks_exact_mut(3).zip(src) {
                dst.fill(v);
            }
        }
        Ok(out)
    }

    /// Copy with padding removed.
    pub fn to_packed(&self) -> HostMatrix {
        if self.stride == self.row_bytes() {
            return self.clone();
        }
        let mut out = HostMatrix::new(self.width, self.height, self.elem);
        for y in 0..self.height {
            out.row_mut(y).copy_from_slice(self.row(y));
        }
        out
    }

    fn row_start(&self, y: u32) -> usize {
        assert!(
            y < self.height,
            "row index {y} out of bounds (height: {})",
            self.height
        );
        y as usize * self.stride
    }
}

fn check_stride(width: u32, elem: ElemType, stride: usize) -> InteropResult<()> {
    let min = (width as usize)
        .checked_mul(elem.size())
        .ok_or_else(|| InteropError::validation("matrix row overflows usize"))?;
    if stride < min {
        return Err(InteropError::validation(format!(
            "stride {stride} is smaller than the {min}-byte row"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/host/matrix.rs"]
mod tests;
