use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use nutframe_frame::{Frame, FrameCode, Metadata, MetadataValue, TimeBase};
use serde::Serialize;

const PREVIEW_BYTES: usize = 16;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
pub struct FrameOutput {
    pub index: u64,
    pub offset: u64,
    pub code: u8,
    pub stream_id: usize,
    pub pts: i64,
    pub flags: String,
    pub keyframe: bool,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_checksum: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_data: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<BTreeMap<String, String>>,
    pub payload: String,
}

impl FrameOutput {
    pub fn new(index: u64, offset: u64, code: u8, frame: &Frame, time_bases: &[TimeBase]) -> Self {
        Self {
            index,
            offset,
            code,
            stream_id: frame.stream_id,
            pts: frame.pts,
            flags: frame.flags.describe(),
            keyframe: frame.is_keyframe(),
            size: frame.payload.len(),
            header_checksum: frame.header_checksum,
            side_data: frame
                .side_data
                .as_ref()
                .map(|data| render_metadata(data, time_bases)),
            meta_data: frame
                .meta_data
                .as_ref()
                .map(|data| render_metadata(data, time_bases)),
            payload: payload_preview(frame.payload.as_ref()),
        }
    }
}

/// Prints decoded frames; `Table` buffers rows until [`FramePrinter::finish`].
pub struct FramePrinter {
    format: OutputFormat,
    table: Option<Table>,
}

impl FramePrinter {
    pub fn new(format: OutputFormat) -> Self {
        let table = matches!(format, OutputFormat::Table).then(|| {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "#", "OFFSET", "CODE", "STREAM", "PTS", "FLAGS", "SIZE", "METADATA",
                    "PAYLOAD",
                ]);
            table
        });
        Self { format, table }
    }

    pub fn print(&mut self, out: &FrameOutput, frame: &Frame) {
        match self.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Table => {
                if let Some(table) = self.table.as_mut() {
                    table.add_row(vec![
                        out.index.to_string(),
                        out.offset.to_string(),
                        out.code.to_string(),
                        out.stream_id.to_string(),
                        out.pts.to_string(),
                        out.flags.clone(),
                        out.size.to_string(),
                        metadata_summary(out),
                        out.payload.clone(),
                    ]);
                }
            }
            OutputFormat::Pretty => {
                println!(
                    "#{} offset={} code={} stream={} pts={} flags={} size={} payload={}",
                    out.index,
                    out.offset,
                    out.code,
                    out.stream_id,
                    out.pts,
                    out.flags,
                    out.size,
                    out.payload
                );
                let blocks = [("side", &out.side_data), ("meta", &out.meta_data)];
                for (label, block) in blocks {
                    for (name, value) in block.iter().flatten() {
                        println!("    {label} {name}={value}");
                    }
                }
            }
            OutputFormat::Raw => {
                print_raw(frame.payload.as_ref());
            }
        }
    }

    pub fn finish(self) {
        if let Some(table) = self.table {
            println!("{table}");
        }
    }
}

#[derive(Serialize)]
pub struct CodeOutput {
    pub code: u8,
    pub flags: String,
    pub stream_id: usize,
    pub data_size_lsb: u64,
    pub data_size_mul: u64,
    pub header_idx: usize,
    pub pts_delta: i64,
    pub reserved_count: u64,
}

impl CodeOutput {
    pub fn new(code: u8, entry: &FrameCode) -> Self {
        Self {
            code,
            flags: entry.flags.describe(),
            stream_id: entry.stream_id,
            data_size_lsb: entry.data_size_lsb,
            data_size_mul: entry.data_size_mul,
            header_idx: entry.header_idx,
            pts_delta: entry.pts_delta,
            reserved_count: entry.reserved_count,
        }
    }
}

pub fn print_codes(rows: &[CodeOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "CODE", "FLAGS", "STREAM", "SIZE_LSB", "SIZE_MUL", "HEADER", "PTS_DELTA",
                    "RESERVED",
                ]);
            for row in rows {
                table.add_row(vec![
                    row.code.to_string(),
                    row.flags.clone(),
                    row.stream_id.to_string(),
                    row.data_size_lsb.to_string(),
                    row.data_size_mul.to_string(),
                    row.header_idx.to_string(),
                    row.pts_delta.to_string(),
                    row.reserved_count.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in rows {
                println!(
                    "code={} flags={} stream={} size={}+n*{} header={} pts_delta={} reserved={}",
                    row.code,
                    row.flags,
                    row.stream_id,
                    row.data_size_lsb,
                    row.data_size_mul,
                    row.header_idx,
                    row.pts_delta,
                    row.reserved_count
                );
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn render_metadata(data: &Metadata, time_bases: &[TimeBase]) -> BTreeMap<String, String> {
    data.iter()
        .map(|(name, value)| (name.clone(), render_value(value, time_bases)))
        .collect()
}

fn render_value(value: &MetadataValue, time_bases: &[TimeBase]) -> String {
    match value {
        MetadataValue::RawTimestamp(raw) => match raw.resolve(time_bases) {
            Some(resolved) => format!(
                "{}*{}/{}",
                resolved.ticks, resolved.time_base.numerator, resolved.time_base.denominator
            ),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}

fn metadata_summary(out: &FrameOutput) -> String {
    [&out.side_data, &out.meta_data]
        .into_iter()
        .flatten()
        .flat_map(|block| block.iter())
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn payload_preview(payload: &[u8]) -> String {
    let hex = payload
        .iter()
        .take(PREVIEW_BYTES)
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ");
    if payload.len() > PREVIEW_BYTES {
        format!("{hex} ..")
    } else {
        hex
    }
}
