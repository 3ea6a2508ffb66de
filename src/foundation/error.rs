use std::fmt;

/// Convenience result type used across the crate.
pub type InteropResult<T> = Result<T, InteropError>;

/// Numeric status reported by a [`crate::VisionRuntime`] call.
///
/// Zero is success, negative values are failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

impl Status {
    pub const SUCCESS: Status = Status(0);
    pub const FAILURE: Status = Status(-1);
    pub const ERROR_NOT_SUPPORTED: Status = Status(-3);
    pub const ERROR_NO_MEMORY: Status = Status(-8);
    pub const ERROR_INVALID_PARAMETERS: Status = Status(-10);
    pub const ERROR_INVALID_REFERENCE: Status = Status(-12);
    pub const ERROR_INVALID_FORMAT: Status = Status(-14);
    pub const ERROR_INVALID_DIMENSION: Status = Status(-15);
    pub const ERROR_MULTIPLE_WRITERS: Status = Status(-23);
    pub const ERROR_REFERENCE_NONZERO: Status = Status(-24);

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    fn name(self) -> &'static str {
        match self {
            Self::SUCCESS => "success",
            Self::FAILURE => "failure",
            Self::ERROR_NOT_SUPPORTED => "not supported",
            Self::ERROR_NO_MEMORY => "no memory",
            Self::ERROR_INVALID_PARAMETERS => "invalid parameters",
            Self::ERROR_INVALID_REFERENCE => "invalid reference",
            Self::ERROR_INVALID_FORMAT => "invalid format",
            Self::ERROR_INVALID_DIMENSION => "invalid dimension",
            Self::ERROR_MULTIPLE_WRITERS => "multiple writers",
            Self::ERROR_REFERENCE_NONZERO => "reference nonzero",
            _ => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

/// Error taxonomy of the interchange layer. Nothing here is fatal; callers decide.
#[derive(thiserror::Error, Debug)]
pub enum InteropError {
    /// Format pair absent from the format table, or an input format the
    /// operation does not accept.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The runtime refused to map or unmap a patch.
    #[error("mapping failure: {op} returned {status}")]
    Mapping { op: &'static str, status: Status },

    /// The mapped patch uses a pixel stride the copy routines cannot walk.
    #[error("addressing not supported: stride_x = {stride_x}")]
    AddressingUnsupported { stride_x: usize },

    /// The codec could not produce a matrix.
    #[error("decode error: {0}")]
    Decode(String),

    /// The codec could not write a matrix.
    #[error("encode error: {0}")]
    Encode(String),

    /// Any other runtime call reported a non-success status.
    #[error("runtime error: {op} returned {status}")]
    Runtime { op: &'static str, status: Status },

    /// A persisted-data lookup failed.
    #[error("document error: {0}")]
    Document(String),

    /// Caller-supplied values are inconsistent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InteropError {
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn mapping(op: &'static str, status: Status) -> Self {
        Self::Mapping { op, status }
    }

    pub fn runtime(op: &'static str, status: Status) -> Self {
        Self::Runtime { op, status }
    }

    /// Numeric runtime status carried by this error, if any.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Mapping { status, .. } | Self::Runtime { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
