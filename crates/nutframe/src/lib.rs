//! Frame-level decoding for the NUT multimedia container.
//!
//! nutframe turns the bytes following a frame code into a [`frame::Frame`]:
//! flags, stream id, reconstructed timestamp, side data, metadata and
//! payload.
//!
//! # Crate Structure
//!
//! - [`io`]: variable-length integer and byte-field reading
//! - [`frame`]: frame-code tables, stream state and the frame decoder
//! - [`container`]: JSON container descriptions (behind `container` feature)

/// Re-export reader types.
pub mod io {
    pub use nutframe_io::*;
}

/// Re-export frame types.
pub mod frame {
    pub use nutframe_frame::*;
}

/// Re-export container types (requires `container` feature).
#[cfg(feature = "container")]
pub mod container {
    pub use nutframe_container::*;
}

#[cfg(all(test, feature = "container"))]
mod tests {
    use std::io::Cursor;

    use super::container::Container;
    use super::io::NutDataReader;

    #[test]
    fn decodes_through_facade() {
        let mut container = Container::from_json(
            r#"{"version":3,"streams":[{"msb_pts_shift":7}],
                "frame_codes":[{"codes":[1,1],"flags":["KEY"],"data_size_lsb":2,"pts_delta":1}]}"#,
        )
        .unwrap();
        let mut reader = NutDataReader::new(Cursor::new(b"hi".to_vec()));
        let frame = container.decode_frame(1, &mut reader).unwrap();
        assert!(frame.is_keyframe());
        assert_eq!(frame.payload.as_ref(), b"hi");
    }
}
