//! Primitive NUT bitstream reading.
//!
//! Provides the low-level field decoders every NUT structure is built from:
//! - `v`: unsigned variable-length integers (7 bits per byte, high bit = more)
//! - `s`: signed variable-length integers
//! - `vb`: length-prefixed byte strings
//! - fixed 32-bit big-endian values (checksums)
//!
//! This is the lowest layer of nutframe. Everything else builds on top of
//! the [`NutRead`] trait provided here.

pub mod error;
pub mod reader;
pub mod traits;
pub mod wire;

pub use error::{ReadError, Result};
pub use reader::{NutDataReader, ReaderConfig, DEFAULT_MAX_FIELD_LEN};
pub use traits::NutRead;
