use nutframe_io::ReadError;

/// Errors that can occur while decoding a frame record.
///
/// Every variant is fatal for the current decode call; no partial frame is
/// ever returned.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The record violates the frame structure (illegal code, out-of-range
    /// index, feature unavailable in this container version, ...).
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// The input ended before the record was complete.
    #[error("frame truncated ({needed} more bytes expected)")]
    Truncated { needed: usize },

    /// The computed payload size exceeds the configured maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: u64, max: usize },

    /// An I/O error occurred while reading the record.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedFrame(message.into())
    }
}

impl From<ReadError> for FrameError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Truncated { needed } => FrameError::Truncated { needed },
            ReadError::Io(io) => FrameError::Io(io),
            other @ (ReadError::VarintOverflow | ReadError::FieldTooLong { .. }) => {
                FrameError::MalformedFrame(other.to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
