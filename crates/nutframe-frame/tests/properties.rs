use std::io::Cursor;

use bytes::{BufMut, BytesMut};
use nutframe_frame::{
    decode_frame, decode_metadata, reconstruct_pts, ElisionTable, FrameCode, FrameCodeTable,
    FrameError, FrameFlags, MetadataValue, StreamRegistry,
};
use nutframe_io::wire::{put_bytes, put_svarint, put_uvarint};
use nutframe_io::{NutDataReader, NutRead};
use proptest::prelude::*;

const CODE: u8 = 0x20;

fn table_with(entry: FrameCode) -> FrameCodeTable {
    let mut codes = FrameCodeTable::new();
    codes.set(CODE, entry).expect("code 0x20 is definable");
    codes
}

fn streams(count: usize) -> StreamRegistry {
    let mut streams = StreamRegistry::new();
    for _ in 0..count {
        streams.add_stream(7, 0).expect("shift 7 is valid");
    }
    streams
}

fn elision(count: usize) -> ElisionTable {
    let mut table = ElisionTable::new();
    for i in 1..count {
        table.push(vec![i as u8]);
    }
    table
}

fn reader(wire: &[u8]) -> NutDataReader<Cursor<Vec<u8>>> {
    NutDataReader::new(Cursor::new(wire.to_vec()))
}

proptest! {
    #[test]
    fn truncated_pts_is_nearest_congruent_value(
        shift in 1u8..=24,
        last_pts in -1_000_000_000_000i64..1_000_000_000_000,
        seed in any::<u64>(),
    ) {
        let window = 1u64 << shift;
        let coded = seed % window;
        let half = ((window - 1) / 2) as i64;

        let pts = reconstruct_pts(coded, shift, last_pts).unwrap();

        prop_assert_eq!(pts.rem_euclid(window as i64), coded as i64);
        prop_assert!(pts >= last_pts - half);
        prop_assert!(pts <= last_pts + half + 1);
    }

    #[test]
    fn full_pts_ignores_last_pts(
        shift in 0u8..=32,
        last_pts in any::<i32>(),
        value in 0u64..(1 << 40),
    ) {
        let window = 1u64 << shift;
        let pts = reconstruct_pts(value + window, shift, i64::from(last_pts)).unwrap();
        prop_assert_eq!(pts, value as i64);
    }

    #[test]
    fn stream_id_valid_iff_below_count(count in 1usize..8, stream_id in 0u64..16) {
        let codes = table_with(FrameCode {
            flags: FrameFlags::STREAM_ID,
            data_size_lsb: 1,
            ..FrameCode::INVALID
        });
        let mut streams = streams(count);
        let mut wire = BytesMut::new();
        put_uvarint(&mut wire, stream_id);
        wire.put_u8(0);

        let result = decode_frame(CODE, &codes, &mut streams, 4, &ElisionTable::new(), &mut reader(&wire));
        if (stream_id as usize) < count {
            prop_assert_eq!(result.unwrap().stream_id, stream_id as usize);
        } else {
            prop_assert!(matches!(result, Err(FrameError::MalformedFrame(_))));
        }
    }

    #[test]
    fn header_idx_valid_iff_below_table_size(
        table_size in 1usize..6,
        header_idx in 0u64..10,
        large in any::<bool>(),
    ) {
        let size: u64 = if large { 4097 } else { 16 };
        let codes = table_with(FrameCode {
            flags: FrameFlags::HEADER_IDX,
            data_size_lsb: size,
            ..FrameCode::INVALID
        });
        let mut streams = streams(1);
        let mut wire = BytesMut::new();
        put_uvarint(&mut wire, header_idx);
        wire.put_slice(&vec![0xee; size as usize]);

        let result = decode_frame(CODE, &codes, &mut streams, 4, &elision(table_size), &mut reader(&wire));
        if large {
            let frame = result.unwrap();
            prop_assert_eq!(frame.payload.len(), size as usize);
            prop_assert_eq!(frame.payload[0], 0xee);
        } else if (header_idx as usize) < table_size {
            let frame = result.unwrap();
            prop_assert_eq!(frame.payload.len(), size as usize);
            if header_idx > 0 {
                prop_assert_eq!(frame.payload[0], header_idx as u8);
            }
        } else {
            prop_assert!(matches!(result, Err(FrameError::MalformedFrame(_))));
        }
    }

    #[test]
    fn side_data_before_version_four_always_fails(
        version in 0u32..4,
        trailing in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let codes = table_with(FrameCode {
            flags: FrameFlags::SM_DATA | FrameFlags::SIZE_MSB,
            data_size_lsb: 8,
            ..FrameCode::INVALID
        });
        let mut streams = streams(1);
        let result = decode_frame(CODE, &codes, &mut streams, version, &ElisionTable::new(), &mut reader(&trailing));
        prop_assert!(matches!(result, Err(FrameError::MalformedFrame(_))));
        prop_assert_eq!(streams.get(0).unwrap().last_pts(), 0);
    }

    #[test]
    fn integer_metadata_round_trips(value in (i64::MIN + 1)..=i64::MAX) {
        let mut wire = BytesMut::new();
        put_uvarint(&mut wire, 1);
        put_bytes(&mut wire, b"v");
        put_svarint(&mut wire, -3);
        put_svarint(&mut wire, value);

        let data = decode_metadata(&mut reader(&wire)).unwrap();
        prop_assert_eq!(&data["v"], &MetadataValue::Integer(value));
    }
}

#[test]
fn worked_timestamp_example() {
    // delta = 1000 - 127 = 873, (130 - 873) mod 256 = 25
    assert_eq!(reconstruct_pts(130, 8, 1000).unwrap(), 898);
}

#[test]
fn fraction_tag_minus_six() {
    let mut wire = BytesMut::new();
    put_uvarint(&mut wire, 1);
    put_bytes(&mut wire, b"ratio");
    put_svarint(&mut wire, -6);
    put_svarint(&mut wire, 3);

    let data = decode_metadata(&mut reader(&wire)).unwrap();
    let MetadataValue::Fraction(fraction) = &data["ratio"] else {
        panic!("expected a fraction, got {:?}", data["ratio"]);
    };
    assert_eq!((fraction.numerator, fraction.denominator), (3, 2));
}

#[test]
fn key_only_frame_reads_base_size_from_stream() {
    let codes = table_with(FrameCode {
        flags: FrameFlags::KEY,
        data_size_lsb: 10,
        ..FrameCode::INVALID
    });
    let mut streams = streams(1);
    let wire: Vec<u8> = (0u8..10).collect();
    let mut r = reader(&wire);

    let frame = decode_frame(CODE, &codes, &mut streams, 3, &ElisionTable::new(), &mut r).unwrap();
    assert_eq!(frame.payload.as_ref(), wire.as_slice());
    assert_eq!(r.offset(), 10);
}
