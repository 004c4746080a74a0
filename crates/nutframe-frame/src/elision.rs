use bytes::Bytes;

use crate::error::{FrameError, Result};

/// Payload prefixes factored out of frame data.
///
/// Index 0 is always the empty prefix, so frames that do not use elision
/// (and every frame above the elision size limit) read their payload whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElisionTable {
    headers: Vec<Bytes>,
}

impl ElisionTable {
    pub fn new() -> Self {
        Self {
            headers: vec![Bytes::new()],
        }
    }

    /// Append a prefix and return its index.
    pub fn push(&mut self, header: impl Into<Bytes>) -> usize {
        self.headers.push(header.into());
        self.headers.len() - 1
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Never true: the empty prefix at index 0 is always present.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Look up a prefix, failing with `MalformedFrame` for unknown indices.
    pub fn get(&self, header_idx: usize) -> Result<&Bytes> {
        self.headers.get(header_idx).ok_or_else(|| {
            FrameError::malformed(format!(
                "illegal header index {header_idx}, must be < {}",
                self.headers.len()
            ))
        })
    }
}

impl Default for ElisionTable {
    fn default() -> Self {
        Self::new()
    }
}
