use std::io::{ErrorKind, Read};

use crate::error::{ReadError, Result};
use crate::traits::NutRead;

/// Default maximum length of a single length-prefixed field: 1 MiB.
pub const DEFAULT_MAX_FIELD_LEN: usize = 1024 * 1024;

/// Configuration for the primitive reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Maximum length accepted for a `vb` field. Default: 1 MiB.
    pub max_field_len: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }
}

/// Reads NUT primitive fields from any `Read` source.
///
/// Blocks until the requested bytes arrive; a source that reaches EOF early
/// yields [`ReadError::Truncated`]. Wrap unbuffered sources (files, sockets)
/// in a `BufReader`, since varints are consumed one byte at a time.
pub struct NutDataReader<R> {
    inner: R,
    offset: u64,
    config: ReaderConfig,
}

impl<R: Read> NutDataReader<R> {
    /// Create a new reader with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, ReaderConfig::default())
    }

    /// Create a new reader with explicit configuration.
    pub fn with_config(inner: R, config: ReaderConfig) -> Self {
        Self {
            inner,
            offset: 0,
            config,
        }
    }

    /// Read one byte, or `None` on a clean EOF before any byte of it.
    ///
    /// Record-level loops use this to tell "no more records" apart from a
    /// record cut short.
    pub fn try_read_u8(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ReadError::Io(err)),
            }
        }
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

impl<R: Read> NutRead for NutDataReader<R> {
    fn read_u8(&mut self) -> Result<u8> {
        self.try_read_u8()?.ok_or(ReadError::Truncated { needed: 1 })
    }

    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    tracing::trace!(
                        offset = self.offset,
                        missing = buf.len() - filled,
                        "source exhausted mid-field"
                    );
                    return Err(ReadError::Truncated {
                        needed: buf.len() - filled,
                    });
                }
                Ok(n) => {
                    filled += n;
                    self.offset += n as u64;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ReadError::Io(err)),
            }
        }
        Ok(())
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn max_field_len(&self) -> usize {
        self.config.max_field_len
    }
}

impl<R> std::fmt::Debug for NutDataReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NutDataReader")
            .field("offset", &self.offset)
            .field("config", &self.config)
            .finish()
    }
}
