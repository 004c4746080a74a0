//! Frame-code default table.
//!
//! Each record starts with one byte selecting a [`FrameCode`]: the values
//! used for every field the record does not code explicitly.

use crate::error::{FrameError, Result};
use crate::flags::FrameFlags;

/// Number of frame codes (one per byte value).
pub const FRAME_CODE_COUNT: usize = 256;

/// `'N'`, the first byte of every startcode. Never a frame code.
pub const SYNC_CODE: u8 = b'N';

/// Defaults for one frame code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCode {
    pub flags: FrameFlags,
    pub stream_id: usize,
    pub data_size_lsb: u64,
    pub data_size_mul: u64,
    pub header_idx: usize,
    pub pts_delta: i64,
    pub reserved_count: u64,
}

impl FrameCode {
    /// A code that may not appear in the bitstream.
    pub const INVALID: FrameCode = FrameCode {
        flags: FrameFlags::INVALID,
        stream_id: 0,
        data_size_lsb: 0,
        data_size_mul: 1,
        header_idx: 0,
        pts_delta: 0,
        reserved_count: 0,
    };

    pub fn is_invalid(&self) -> bool {
        self.flags.contains(FrameFlags::INVALID)
    }
}

impl Default for FrameCode {
    fn default() -> Self {
        Self::INVALID
    }
}

/// The 256-entry frame-code table of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCodeTable {
    codes: Box<[FrameCode; FRAME_CODE_COUNT]>,
}

impl FrameCodeTable {
    /// A table where every code is invalid.
    pub fn new() -> Self {
        Self {
            codes: Box::new([FrameCode::INVALID; FRAME_CODE_COUNT]),
        }
    }

    /// Define the defaults for `code`.
    ///
    /// The sync code can only ever hold an invalid entry.
    pub fn set(&mut self, code: u8, entry: FrameCode) -> Result<()> {
        if code == SYNC_CODE && !entry.is_invalid() {
            return Err(FrameError::malformed(format!(
                "frame code {code:#04x} is reserved for startcodes"
            )));
        }
        self.codes[usize::from(code)] = entry;
        Ok(())
    }

    pub fn get(&self, code: u8) -> &FrameCode {
        &self.codes[usize::from(code)]
    }

    /// Iterate over `(code, entry)` pairs that are not invalid.
    pub fn valid_codes(&self) -> impl Iterator<Item = (u8, &FrameCode)> + '_ {
        (0..=u8::MAX)
            .zip(self.codes.iter())
            .filter(|(_, entry)| !entry.is_invalid())
    }
}

impl Default for FrameCodeTable {
    fn default() -> Self {
        Self::new()
    }
}
