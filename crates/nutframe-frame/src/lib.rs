//! NUT frame record decoding.
//!
//! This is the core value-add layer of nutframe. Every frame record starts
//! with a one-byte frame code selecting a row of defaults; the record then
//! carries only the fields its flags say are present:
//! - coded flags, stream id, coded pts, size msb, match time, header index,
//!   reserved fields and a header checksum, each optional
//! - an optional side-data/metadata block (`SM_DATA`, version 4+)
//! - the payload, minus any prefix stored in the elision table
//!
//! Timestamps are reconstructed against the per-stream `last_pts` held in
//! [`StreamRegistry`], so frames of a stream must be decoded in order.

pub mod code;
pub mod codec;
pub mod elision;
pub mod error;
pub mod flags;
pub mod metadata;
pub mod stream;
pub mod timestamp;

pub use code::{FrameCode, FrameCodeTable, FRAME_CODE_COUNT, SYNC_CODE};
pub use codec::{
    decode_frame, Frame, FrameConfig, FrameDecoder, DEFAULT_MAX_METADATA_ENTRIES,
    DEFAULT_MAX_PAYLOAD, ELISION_SIZE_LIMIT, MIN_SM_DATA_VERSION,
};
pub use elision::ElisionTable;
pub use error::{FrameError, Result};
pub use flags::FrameFlags;
pub use metadata::{
    decode_metadata, Fraction, Metadata, MetadataDecoder, MetadataValue, RawTimestamp,
    ResolvedTimestamp, TimeBase,
};
pub use stream::{StreamRegistry, StreamState, MAX_MSB_PTS_SHIFT};
pub use timestamp::reconstruct_pts;
