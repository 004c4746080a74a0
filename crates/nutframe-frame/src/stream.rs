use crate::error::{FrameError, Result};

/// Largest supported `msb_pts_shift`; `2^62` still fits an `i64` timestamp.
pub const MAX_MSB_PTS_SHIFT: u8 = 62;

/// Decoding state of one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamState {
    stream_id: usize,
    msb_pts_shift: u8,
    last_pts: i64,
}

impl StreamState {
    pub fn stream_id(&self) -> usize {
        self.stream_id
    }

    pub fn msb_pts_shift(&self) -> u8 {
        self.msb_pts_shift
    }

    /// Timestamp of the last frame decoded on this stream.
    pub fn last_pts(&self) -> i64 {
        self.last_pts
    }

    pub(crate) fn record_pts(&mut self, pts: i64) {
        self.last_pts = pts;
    }
}

/// Per-stream state indexed by stream id.
///
/// The decoder borrows the registry mutably for each frame and writes the
/// reconstructed pts back exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamRegistry {
    streams: Vec<StreamState>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next stream and return its id.
    pub fn add_stream(&mut self, msb_pts_shift: u8, last_pts: i64) -> Result<usize> {
        if msb_pts_shift > MAX_MSB_PTS_SHIFT {
            return Err(FrameError::malformed(format!(
                "msb_pts_shift {msb_pts_shift} exceeds {MAX_MSB_PTS_SHIFT}"
            )));
        }
        let stream_id = self.streams.len();
        self.streams.push(StreamState {
            stream_id,
            msb_pts_shift,
            last_pts,
        });
        Ok(stream_id)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn get(&self, stream_id: usize) -> Option<&StreamState> {
        self.streams.get(stream_id)
    }

    /// Mutable access, failing with `MalformedFrame` for unknown ids.
    pub fn get_mut(&mut self, stream_id: usize) -> Result<&mut StreamState> {
        let count = self.streams.len();
        self.streams.get_mut(stream_id).ok_or_else(|| {
            FrameError::malformed(format!(
                "illegal stream id {stream_id}, must be < {count}"
            ))
        })
    }

    /// Overwrite `last_pts`, e.g. from a syncpoint's global timestamp.
    pub fn reset_last_pts(&mut self, stream_id: usize, pts: i64) -> Result<()> {
        self.get_mut(stream_id)?.record_pts(pts);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StreamState> {
        self.streams.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_assigned_in_order() {
        let mut streams = StreamRegistry::new();
        assert_eq!(streams.add_stream(7, 0).unwrap(), 0);
        assert_eq!(streams.add_stream(16, 90).unwrap(), 1);
        assert_eq!(streams.len(), 2);
        assert_eq!(streams.get(1).unwrap().last_pts(), 90);
        assert_eq!(streams.get(1).unwrap().msb_pts_shift(), 16);
    }

    #[test]
    fn shift_out_of_range_rejected() {
        let mut streams = StreamRegistry::new();
        assert!(streams.add_stream(MAX_MSB_PTS_SHIFT, 0).is_ok());
        assert!(streams.add_stream(MAX_MSB_PTS_SHIFT + 1, 0).is_err());
    }

    #[test]
    fn unknown_stream_is_malformed() {
        let mut streams = StreamRegistry::new();
        streams.add_stream(7, 0).unwrap();
        let err = streams.get_mut(1).unwrap_err();
        assert!(matches!(err, FrameError::MalformedFrame(msg) if msg.contains("must be < 1")));
    }

    #[test]
    fn reset_last_pts() {
        let mut streams = StreamRegistry::new();
        streams.add_stream(7, 0).unwrap();
        streams.reset_last_pts(0, 4000).unwrap();
        assert_eq!(streams.get(0).unwrap().last_pts(), 4000);
        assert!(streams.reset_last_pts(3, 1).is_err());
    }
}
