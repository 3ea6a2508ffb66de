use crate::foundation::error::{InteropError, InteropResult};

/// Pixel formats a vision image can be created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum VisionFormat {
    /// 8-bit single-channel gray.
    U8,
    /// 24-bit interleaved R, G, B.
    Rgb,
    /// 16-bit signed single channel.
    S16,
}

impl VisionFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::Rgb => 3,
            Self::S16 => 2,
        }
    }

    /// FourCC code the runtime reports for this format.
    pub const fn fourcc(self) -> [u8; 4] {
        match self {
            Self::U8 => *b"U008",
            Self::Rgb => *b"RGB2",
            Self::S16 => *b"S016",
        }
    }
}

/// Element layouts of a [`crate::HostMatrix`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ElemType {
    U8C1,
    U8C3,
    S16C1,
    /// Two `f32` channels, the layout of remap coordinate fields.
    F32C2,
}

impl ElemType {
    /// Bytes per element (all channels).
    pub const fn size(self) -> usize {
        match self {
            Self::U8C1 => 1,
            Self::U8C3 => 3,
            Self::S16C1 => 2,
            Self::F32C2 => 8,
        }
    }

    pub const fn channels(self) -> usize {
        match self {
            Self::U8C1 | Self::S16C1 => 1,
            Self::U8C3 => 3,
            Self::F32C2 => 2,
        }
    }

    /// Type code used by persisted matrix nodes (`dt` field).
    pub const fn type_code(self) -> &'static str {
        match self {
            Self::U8C1 => "u",
            Self::U8C3 => "3u",
            Self::S16C1 => "s",
            Self::F32C2 => "2f",
        }
    }

    pub fn from_type_code(code: &str) -> Option<Self> {
        match code {
            "u" => Some(Self::U8C1),
            "3u" => Some(Self::U8C3),
            "s" => Some(Self::S16C1),
            "2f" => Some(Self::F32C2),
            _ => None,
        }
    }
}

/// Host element layout for a vision format. Only the gray/RGB bijection is defined.
pub fn to_host(format: VisionFormat) -> InteropResult<ElemType> {
    match format {
        VisionFormat::U8 => Ok(ElemType::U8C1),
        VisionFormat::Rgb => Ok(ElemType::U8C3),
        VisionFormat::S16 => Err(InteropError::unsupported_format(format!(
            "vision format {format:?} has no host element type"
        ))),
    }
}

/// Vision format for a host element layout. Only the gray/RGB bijection is defined.
pub fn to_vision(elem: ElemType) -> InteropResult<VisionFormat> {
    match elem {
        ElemType::U8C1 => Ok(VisionFormat::U8),
        ElemType::U8C3 => Ok(VisionFormat::Rgb),
        ElemType::S16C1 | ElemType::F32C2 => Err(InteropError::unsupported_format(format!(
            "host element type {elem:?} has no vision format"
        ))),
    }
}

/// Vision format used when importing a persisted matrix. One-way: `S16C1 -> S16`.
pub fn document_import_format(elem: ElemType) -> InteropResult<VisionFormat> {
    match elem {
        ElemType::S16C1 => Ok(VisionFormat::S16),
        other => Err(InteropError::unsupported_format(format!(
            "document matrices must be {:?}, got {other:?}",
            ElemType::S16C1
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/table.rs"]
mod tests;
