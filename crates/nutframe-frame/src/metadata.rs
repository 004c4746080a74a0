//! Side-data and metadata blocks embedded in `SM_DATA` frames.
//!
//! A block is a count followed by named, type-tagged values:
//!
//! ```text
//! count v
//! repeat count:
//!     name  vb
//!     type  s     -1 text | -2 key,value | -3 integer | -4 timestamp
//!                 < -4 fraction (denominator = -type - 4) | >= 0 literal
//!     value ...
//! ```

use std::collections::BTreeMap;
use std::fmt;

use nutframe_io::NutRead;

use crate::error::{FrameError, Result};

/// Decoded block, sorted by name. Later duplicates replace earlier ones.
pub type Metadata = BTreeMap<String, MetadataValue>;

const TYPE_TEXT: i64 = -1;
const TYPE_KEY_VALUE: i64 = -2;
const TYPE_INTEGER: i64 = -3;
const TYPE_TIMESTAMP: i64 = -4;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    /// UTF-8 text (`-1`).
    Text(String),
    /// A key/value pair of strings (`-2`).
    KeyEqualsValue { key: String, value: String },
    /// A signed integer (`-3`), or a non-negative type tag used as a literal.
    Integer(i64),
    /// A timestamp still coded against the container's time-base list (`-4`).
    RawTimestamp(RawTimestamp),
    /// A rational number (type below `-4`).
    Fraction(Fraction),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Text(text) => f.write_str(text),
            MetadataValue::KeyEqualsValue { key, value } => write!(f, "{key}={value}"),
            MetadataValue::Integer(value) => write!(f, "{value}"),
            MetadataValue::RawTimestamp(raw) => write!(f, "t:{}", raw.0),
            MetadataValue::Fraction(fraction) => write!(f, "{fraction}"),
        }
    }
}

/// Unreduced rational value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: u64,
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A container time base, `numerator / denominator` seconds per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBase {
    pub numerator: u64,
    pub denominator: u64,
}

/// Universal timestamp as coded on the wire: `value * count + time_base_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTimestamp(pub u64);

/// A raw timestamp split into its time base and tick count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimestamp {
    pub time_base_id: usize,
    pub time_base: TimeBase,
    pub ticks: u64,
}

impl RawTimestamp {
    /// Split against the container's time-base list.
    ///
    /// Returns `None` for an empty list.
    pub fn resolve(&self, time_bases: &[TimeBase]) -> Option<ResolvedTimestamp> {
        let count = time_bases.len() as u64;
        if count == 0 {
            return None;
        }
        let time_base_id = (self.0 % count) as usize;
        Some(ResolvedTimestamp {
            time_base_id,
            time_base: time_bases[time_base_id],
            ticks: self.0 / count,
        })
    }
}

impl ResolvedTimestamp {
    pub fn as_secs_f64(&self) -> f64 {
        if self.time_base.denominator == 0 {
            return 0.0;
        }
        self.ticks as f64 * self.time_base.numerator as f64 / self.time_base.denominator as f64
    }
}

/// Decodes metadata blocks with an upper bound on the entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataDecoder {
    pub max_entries: u64,
}

impl MetadataDecoder {
    pub fn new(max_entries: u64) -> Self {
        Self { max_entries }
    }

    /// Decode one block from `reader`.
    pub fn decode<R: NutRead + ?Sized>(&self, reader: &mut R) -> Result<Metadata> {
        let count = reader.read_uvarint()?;
        if count > self.max_entries {
            return Err(FrameError::malformed(format!(
                "metadata block has {count} entries, max {}",
                self.max_entries
            )));
        }

        let mut data = Metadata::new();
        for _ in 0..count {
            let name = read_text(reader)?;
            let value = read_value(reader)?;
            data.insert(name, value);
        }
        Ok(data)
    }
}

/// Decode one block with the default entry limit.
pub fn decode_metadata<R: NutRead + ?Sized>(reader: &mut R) -> Result<Metadata> {
    MetadataDecoder::new(crate::codec::DEFAULT_MAX_METADATA_ENTRIES).decode(reader)
}

fn read_value<R: NutRead + ?Sized>(reader: &mut R) -> Result<MetadataValue> {
    let tag = reader.read_svarint()?;
    let value = match tag {
        TYPE_TEXT => MetadataValue::Text(read_text(reader)?),
        TYPE_KEY_VALUE => {
            let key = read_text(reader)?;
            let value = read_text(reader)?;
            MetadataValue::KeyEqualsValue { key, value }
        }
        TYPE_INTEGER => MetadataValue::Integer(reader.read_svarint()?),
        TYPE_TIMESTAMP => MetadataValue::RawTimestamp(RawTimestamp(reader.read_uvarint()?)),
        tag if tag < TYPE_TIMESTAMP => MetadataValue::Fraction(Fraction {
            numerator: reader.read_svarint()?,
            denominator: tag.unsigned_abs() - 4,
        }),
        literal => MetadataValue::Integer(literal),
    };
    Ok(value)
}

/// Invalid UTF-8 sequences become U+FFFD; writers are not required to emit UTF-8.
fn read_text<R: NutRead + ?Sized>(reader: &mut R) -> Result<String> {
    let bytes = reader.read_length_prefixed_bytes()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
