use bytes::{Bytes, BytesMut};
use nutframe_io::NutRead;

use crate::code::{FrameCodeTable, SYNC_CODE};
use crate::elision::ElisionTable;
use crate::error::{FrameError, Result};
use crate::flags::FrameFlags;
use crate::metadata::{Metadata, MetadataDecoder};
use crate::stream::StreamRegistry;
use crate::timestamp::reconstruct_pts;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Default maximum entries per side-data or metadata block.
pub const DEFAULT_MAX_METADATA_ENTRIES: u64 = 4096;

/// Frames larger than this never use an elision prefix.
pub const ELISION_SIZE_LIMIT: u64 = 4096;

/// First container version allowing `SM_DATA` frames.
pub const MIN_SM_DATA_VERSION: u32 = 4;

/// A decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The stream this frame belongs to.
    pub stream_id: usize,
    /// Effective flags after applying coded flags.
    pub flags: FrameFlags,
    /// Presentation timestamp in the stream's time base.
    pub pts: i64,
    /// Payload, elision prefix included.
    pub payload: Bytes,
    /// Side data block (`SM_DATA` frames only).
    pub side_data: Option<Metadata>,
    /// Metadata block (`SM_DATA` frames only).
    pub meta_data: Option<Metadata>,
    /// Header checksum as read; not verified.
    pub header_checksum: Option<u32>,
}

impl Frame {
    pub fn is_keyframe(&self) -> bool {
        self.flags.contains(FrameFlags::KEY)
    }

    pub fn is_end_of_relevance(&self) -> bool {
        self.flags.contains(FrameFlags::EOR)
    }
}

/// Configuration for frame decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Maximum entries per metadata block. Default: 4096.
    pub max_metadata_entries: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            max_metadata_entries: DEFAULT_MAX_METADATA_ENTRIES,
        }
    }
}

/// Decodes frame records against a container's tables.
///
/// Holds the read-only tables; per-stream state is passed to each call.
#[derive(Debug, Clone, Copy)]
pub struct FrameDecoder<'a> {
    codes: &'a FrameCodeTable,
    elision: &'a ElisionTable,
    version: u32,
    config: FrameConfig,
}

impl<'a> FrameDecoder<'a> {
    /// Create a decoder with default configuration.
    pub fn new(codes: &'a FrameCodeTable, elision: &'a ElisionTable, version: u32) -> Self {
        Self::with_config(codes, elision, version, FrameConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(
        codes: &'a FrameCodeTable,
        elision: &'a ElisionTable,
        version: u32,
        config: FrameConfig,
    ) -> Self {
        Self {
            codes,
            elision,
            version,
            config,
        }
    }

    /// Current decoder configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Decode the record following frame code `code`.
    ///
    /// `reader` must be positioned just after the code byte. On success the
    /// stream's `last_pts` is advanced to the frame's pts; on error no state
    /// is changed, though the reader may have consumed part of the record.
    pub fn decode<R: NutRead + ?Sized>(
        &self,
        code: u8,
        streams: &mut StreamRegistry,
        reader: &mut R,
    ) -> Result<Frame> {
        if code == SYNC_CODE {
            return Err(FrameError::malformed(format!(
                "illegal frame code {code:#04x} (startcode prefix)"
            )));
        }

        let defaults = self.codes.get(code);
        if defaults.is_invalid() {
            return Err(FrameError::malformed(format!(
                "frame code {code:#04x} is marked invalid"
            )));
        }

        let mut flags = defaults.flags;
        if flags.contains(FrameFlags::CODED) {
            let coded = reader.read_uvarint()?;
            flags = flags.xor_coded(coded)?;
        }

        if flags.contains(FrameFlags::SM_DATA) && self.version < MIN_SM_DATA_VERSION {
            return Err(FrameError::malformed(format!(
                "side data and metadata require version {MIN_SM_DATA_VERSION}, container is version {}",
                self.version
            )));
        }

        let stream_id = if flags.contains(FrameFlags::STREAM_ID) {
            read_index(reader)?
        } else {
            defaults.stream_id
        };
        let stream = streams.get_mut(stream_id)?;

        let pts = if flags.contains(FrameFlags::CODED_PTS) {
            let coded_pts = reader.read_uvarint()?;
            reconstruct_pts(coded_pts, stream.msb_pts_shift(), stream.last_pts())?
        } else {
            stream
                .last_pts()
                .checked_add(defaults.pts_delta)
                .ok_or_else(|| FrameError::malformed("pts overflow"))?
        };

        let mut size = defaults.data_size_lsb;
        if flags.contains(FrameFlags::SIZE_MSB) {
            let msb = reader.read_uvarint()?;
            size = msb
                .checked_mul(defaults.data_size_mul)
                .and_then(|extra| extra.checked_add(size))
                .ok_or_else(|| FrameError::malformed("frame size overflow"))?;
        }

        if flags.contains(FrameFlags::MATCH_TIME) {
            let match_time_delta = reader.read_svarint()?;
            tracing::trace!(match_time_delta, "match time delta ignored");
        }

        let mut header_idx = if flags.contains(FrameFlags::HEADER_IDX) {
            read_index(reader)?
        } else {
            defaults.header_idx
        };

        let reserved_count = if flags.contains(FrameFlags::RESERVED) {
            reader.read_uvarint()?
        } else {
            defaults.reserved_count
        };
        for _ in 0..reserved_count {
            reader.read_uvarint()?;
        }

        let header_checksum = if flags.contains(FrameFlags::CHECKSUM) {
            let checksum = reader.read_fixed_u32()?;
            tracing::trace!(checksum, "header checksum not verified");
            Some(checksum)
        } else {
            None
        };

        if size > ELISION_SIZE_LIMIT {
            header_idx = 0;
        }
        let prefix = self.elision.get(header_idx)?;

        let (side_data, meta_data) = if flags.contains(FrameFlags::SM_DATA) {
            let start = reader.offset();
            let blocks = MetadataDecoder::new(self.config.max_metadata_entries);
            let side_data = blocks.decode(reader)?;
            let meta_data = blocks.decode(reader)?;
            let consumed = reader.offset() - start;
            size = size.checked_sub(consumed).ok_or_else(|| {
                FrameError::malformed(format!(
                    "metadata blocks ({consumed} bytes) exceed frame size {size}"
                ))
            })?;
            (Some(side_data), Some(meta_data))
        } else {
            (None, None)
        };

        let max = self.config.max_payload_size;
        let size = usize::try_from(size)
            .ok()
            .filter(|size| *size <= max)
            .ok_or(FrameError::PayloadTooLarge { size, max })?;
        if prefix.len() > size {
            return Err(FrameError::malformed(format!(
                "elision header {header_idx} ({} bytes) longer than payload ({size} bytes)",
                prefix.len()
            )));
        }

        let mut payload = BytesMut::zeroed(size);
        payload[..prefix.len()].copy_from_slice(prefix);
        reader.read_exact_into(&mut payload[prefix.len()..])?;

        stream.record_pts(pts);

        let frame = Frame {
            stream_id,
            flags,
            pts,
            payload: payload.freeze(),
            side_data,
            meta_data,
            header_checksum,
        };
        tracing::debug!(
            code,
            stream_id,
            pts,
            size,
            flags = %flags.describe(),
            "decoded frame"
        );
        Ok(frame)
    }
}

/// Decode one frame record with default configuration.
///
/// Equivalent to `FrameDecoder::new(codes, elision, version).decode(..)`.
pub fn decode_frame<R: NutRead + ?Sized>(
    code: u8,
    codes: &FrameCodeTable,
    streams: &mut StreamRegistry,
    version: u32,
    elision: &ElisionTable,
    reader: &mut R,
) -> Result<Frame> {
    FrameDecoder::new(codes, elision, version).decode(code, streams, reader)
}

fn read_index<R: NutRead + ?Sized>(reader: &mut R) -> Result<usize> {
    // anything past usize is out of range for every table
    Ok(usize::try_from(reader.read_uvarint()?).unwrap_or(usize::MAX))
}
