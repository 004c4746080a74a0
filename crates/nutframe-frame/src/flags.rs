use crate::error::{FrameError, Result};

bitflags::bitflags! {
    /// Per-record frame flags.
    ///
    /// Base flags come from the frame-code table; `CODED` records XOR an
    /// explicit value into them. Bits 2 and 9 are undefined.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FrameFlags: u64 {
        /// Keyframe.
        const KEY = 1 << 0;
        /// End of relevance for the stream.
        const EOR = 1 << 1;
        /// An explicit coded pts follows.
        const CODED_PTS = 1 << 3;
        /// An explicit stream id follows.
        const STREAM_ID = 1 << 4;
        /// A size multiplier follows.
        const SIZE_MSB = 1 << 5;
        /// A header checksum follows.
        const CHECKSUM = 1 << 6;
        /// An explicit reserved-field count follows.
        const RESERVED = 1 << 7;
        /// Side data and metadata precede the payload.
        const SM_DATA = 1 << 8;
        /// An explicit elision header index follows.
        const HEADER_IDX = 1 << 10;
        /// A match-time delta follows.
        const MATCH_TIME = 1 << 11;
        /// Coded flags follow and are XORed into the base flags.
        const CODED = 1 << 12;
        /// The frame code may not be used.
        const INVALID = 1 << 13;
    }
}

impl FrameFlags {
    /// Build flags from a wire value, rejecting undefined bits.
    pub fn from_wire(raw: u64) -> Result<Self> {
        Self::from_bits(raw).ok_or_else(|| {
            FrameError::malformed(format!(
                "undefined frame flag bits {:#x}",
                raw & !Self::all().bits()
            ))
        })
    }

    /// Apply coded flags read from a `CODED` record.
    pub fn xor_coded(self, coded: u64) -> Result<Self> {
        Self::from_wire(self.bits() ^ coded)
    }

    /// Flag names joined with `|`, or `-` when empty.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        self.iter_names()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join("|")
    }
}
