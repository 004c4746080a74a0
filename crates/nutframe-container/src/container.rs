use std::io::Read;
use std::path::Path;

use nutframe_frame::{
    ElisionTable, Frame, FrameCode, FrameCodeTable, FrameConfig, FrameDecoder, FrameFlags,
    StreamRegistry, TimeBase, SYNC_CODE,
};
use nutframe_io::NutRead;

use crate::config::LoadConfig;
use crate::description::{ContainerDescription, FrameCodeDescription};
use crate::error::{ContainerError, Result};

/// Decoding tables and stream state built from a description.
#[derive(Debug, Clone)]
pub struct Container {
    version: u32,
    time_bases: Vec<TimeBase>,
    codes: FrameCodeTable,
    elision: ElisionTable,
    streams: StreamRegistry,
    frame_config: FrameConfig,
}

impl Container {
    /// Build from a JSON string with default limits.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_config(json, &LoadConfig::default())
    }

    /// Build from a JSON string with explicit limits.
    pub fn from_json_with_config(json: &str, config: &LoadConfig) -> Result<Self> {
        if json.len() > config.max_description_size {
            return Err(ContainerError::LoadFailed(format!(
                "description too large ({} bytes, max {})",
                json.len(),
                config.max_description_size
            )));
        }
        let description: ContainerDescription = serde_json::from_str(json)?;
        Self::from_description(&description, config)
    }

    /// Load a description file with default limits.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_path_with_config(path, &LoadConfig::default())
    }

    /// Load a description file with explicit limits.
    pub fn from_path_with_config(path: &Path, config: &LoadConfig) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|err| {
            ContainerError::LoadFailed(format!("failed opening {}: {err}", path.display()))
        })?;

        let max_bytes = config.max_description_size;
        let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
        let mut content = String::new();
        file.take(read_limit)
            .read_to_string(&mut content)
            .map_err(|err| {
                ContainerError::LoadFailed(format!("failed reading {}: {err}", path.display()))
            })?;

        tracing::debug!(
            path = %path.display(),
            bytes = content.len(),
            "loaded container description"
        );
        Self::from_json_with_config(&content, config)
    }

    /// Build from an already-parsed description.
    pub fn from_description(
        description: &ContainerDescription,
        config: &LoadConfig,
    ) -> Result<Self> {
        if description.streams.len() > config.max_streams {
            return Err(ContainerError::InvalidDescription(format!(
                "{} streams exceed configured max ({})",
                description.streams.len(),
                config.max_streams
            )));
        }
        if description.elision_headers.len() > config.max_elision_headers {
            return Err(ContainerError::InvalidDescription(format!(
                "{} elision headers exceed configured max ({})",
                description.elision_headers.len(),
                config.max_elision_headers
            )));
        }

        let time_bases = description
            .time_bases
            .iter()
            .map(|[numerator, denominator]| {
                if *numerator == 0 || *denominator == 0 {
                    return Err(ContainerError::InvalidDescription(format!(
                        "time base {numerator}/{denominator} must be non-zero"
                    )));
                }
                Ok(TimeBase {
                    numerator: *numerator,
                    denominator: *denominator,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut streams = StreamRegistry::new();
        for stream in &description.streams {
            streams
                .add_stream(stream.msb_pts_shift, stream.last_pts)
                .map_err(|err| ContainerError::InvalidDescription(err.to_string()))?;
        }

        let mut elision = ElisionTable::new();
        for header in &description.elision_headers {
            if header.len() > config.max_elision_header_len {
                return Err(ContainerError::InvalidDescription(format!(
                    "elision header of {} bytes exceeds configured max ({})",
                    header.len(),
                    config.max_elision_header_len
                )));
            }
            elision.push(header.clone());
        }

        let mut codes = FrameCodeTable::new();
        for row in &description.frame_codes {
            apply_code_row(&mut codes, row)?;
        }

        Ok(Self {
            version: description.version,
            time_bases,
            codes,
            elision,
            streams,
            frame_config: FrameConfig::default(),
        })
    }

    /// Replace the frame decoding configuration.
    pub fn with_frame_config(mut self, frame_config: FrameConfig) -> Self {
        self.frame_config = frame_config;
        self
    }

    /// Decode the record following `code`, updating stream state.
    pub fn decode_frame<R: NutRead + ?Sized>(
        &mut self,
        code: u8,
        reader: &mut R,
    ) -> nutframe_frame::Result<Frame> {
        let decoder =
            FrameDecoder::with_config(&self.codes, &self.elision, self.version, self.frame_config);
        decoder.decode(code, &mut self.streams, reader)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn time_bases(&self) -> &[TimeBase] {
        &self.time_bases
    }

    pub fn codes(&self) -> &FrameCodeTable {
        &self.codes
    }

    pub fn elision(&self) -> &ElisionTable {
        &self.elision
    }

    pub fn streams(&self) -> &StreamRegistry {
        &self.streams
    }

    pub fn streams_mut(&mut self) -> &mut StreamRegistry {
        &mut self.streams
    }
}

fn apply_code_row(codes: &mut FrameCodeTable, row: &FrameCodeDescription) -> Result<()> {
    let [first, last] = row.codes;
    if first > last {
        return Err(ContainerError::InvalidDescription(format!(
            "frame code range {first}..={last} is empty"
        )));
    }
    if first == SYNC_CODE && last == SYNC_CODE {
        return Err(ContainerError::InvalidDescription(format!(
            "frame code {SYNC_CODE} is reserved for startcodes"
        )));
    }

    let mut flags = FrameFlags::empty();
    for name in &row.flags {
        flags |= FrameFlags::from_name(name).ok_or_else(|| {
            ContainerError::InvalidDescription(format!("unknown frame flag {name:?}"))
        })?;
    }

    let entry = FrameCode {
        flags,
        stream_id: row.stream_id,
        data_size_lsb: row.data_size_lsb,
        data_size_mul: row.data_size_mul,
        header_idx: row.header_idx,
        pts_delta: row.pts_delta,
        reserved_count: row.reserved_count,
    };

    for code in first..=last {
        if code == SYNC_CODE {
            tracing::debug!(first, last, "frame code range skips startcode prefix");
            continue;
        }
        codes
            .set(code, entry)
            .map_err(|err| ContainerError::InvalidDescription(err.to_string()))?;
    }
    Ok(())
}
