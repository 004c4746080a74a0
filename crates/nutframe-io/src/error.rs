/// Errors that can occur while reading primitive NUT fields.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The input ended before the requested bytes were available.
    #[error("input truncated ({needed} more bytes expected)")]
    Truncated { needed: usize },

    /// A variable-length integer does not fit in 64 bits.
    #[error("variable-length integer overflows 64 bits")]
    VarintOverflow,

    /// A length-prefixed field exceeds the configured maximum.
    #[error("field too long ({len} bytes, max {max})")]
    FieldTooLong { len: u64, max: usize },

    /// An I/O error occurred on the underlying source.
    #[error("read I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReadError>;
