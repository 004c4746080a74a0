//! JSON shape of a container description.
//!
//! ```json
//! {
//!   "version": 4,
//!   "time_bases": [[1, 1000]],
//!   "streams": [{ "msb_pts_shift": 7 }],
//!   "elision_headers": [[0, 0, 1]],
//!   "frame_codes": [
//!     { "codes": [1, 10], "flags": ["KEY"], "data_size_lsb": 10, "pts_delta": 1 }
//!   ]
//! }
//! ```

use serde::Deserialize;

/// A whole container: version, time bases, streams and frame-code table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerDescription {
    pub version: u32,
    /// `[numerator, denominator]` pairs.
    #[serde(default)]
    pub time_bases: Vec<[u64; 2]>,
    pub streams: Vec<StreamDescription>,
    /// Elision headers for indices 1.. (index 0 is always empty).
    #[serde(default)]
    pub elision_headers: Vec<Vec<u8>>,
    pub frame_codes: Vec<FrameCodeDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamDescription {
    pub msb_pts_shift: u8,
    /// Starting `last_pts`, e.g. the global timestamp of the first syncpoint.
    #[serde(default)]
    pub last_pts: i64,
}

/// Defaults shared by an inclusive range of frame codes.
///
/// A range covering `'N'` (78) skips it; `'N'` alone is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameCodeDescription {
    /// `[first, last]`, inclusive.
    pub codes: [u8; 2],
    /// Flag names, e.g. `["KEY", "CODED_PTS"]`.
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub stream_id: usize,
    #[serde(default)]
    pub data_size_lsb: u64,
    #[serde(default = "default_size_mul")]
    pub data_size_mul: u64,
    #[serde(default)]
    pub header_idx: usize,
    #[serde(default)]
    pub pts_delta: i64,
    #[serde(default)]
    pub reserved_count: u64,
}

fn default_size_mul() -> u64 {
    1
}
