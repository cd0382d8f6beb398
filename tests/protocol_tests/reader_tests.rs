//! Tests for the Frame Reader
//!
//! These tests verify:
//! - Heartbeat / data classification
//! - Route and sequence extraction
//! - Zero, oversized and truncated frames
//! - Sequential reads of several frames from one stream

use std::io::{Cursor, ErrorKind};

use bytes::Bytes;
use framewire::packer::{UnbindPacker, UnbindRequest, UnbindResponse};
use framewire::pool::{self, BufferPool};
use framewire::protocol::{pack_heartbeat, route, FrameReader, Packet, HEARTBEAT_BIT, SIZE_BYTES};
use framewire::{Packer, WireError, WriterStrategy};

// =============================================================================
// Helper Functions
// =============================================================================

fn heartbeat_bytes() -> Vec<u8> {
    pack_heartbeat(&WriterStrategy::Sequential).unwrap().to_vec()
}

fn request_bytes(seq: u64, uid: i64) -> Vec<u8> {
    UnbindPacker::new()
        .pack_request(&UnbindRequest { seq, uid })
        .unwrap()
        .to_vec()
}

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn test_read_heartbeat() {
    let reader = FrameReader::new();
    let mut stream = Cursor::new(heartbeat_bytes());

    let packet = reader.read_packet(&mut stream).unwrap();

    assert!(packet.is_heartbeat());
    assert_eq!(packet.route(), None);
    assert_eq!(packet.seq(), None);
    assert_eq!(packet.header(), HEARTBEAT_BIT);
    assert_eq!(&packet.data()[..], &[0, 0, 0, 1, HEARTBEAT_BIT]);
}

#[test]
fn test_read_data_frame() {
    let reader = FrameReader::new();
    let raw = request_bytes(42, 1001);
    let mut stream = Cursor::new(raw.clone());

    match reader.read_packet(&mut stream).unwrap() {
        Packet::Data { route: code, seq, data } => {
            assert_eq!(code, route::UNBIND_REQ);
            assert_eq!(seq, 42);
            assert_eq!(&data[..], &raw[..]);
        }
        other => panic!("Expected data frame, got {:?}", other),
    }
}

#[test]
fn test_header_without_flags_reads_as_data() {
    let reader = FrameReader::new();
    let mut raw = request_bytes(9, 3);
    raw[4] = 0x00;
    let mut stream = Cursor::new(raw);

    let packet = reader.read_packet(&mut stream).unwrap();

    assert!(!packet.is_heartbeat());
    assert_eq!(packet.header(), 0x00);
    assert_eq!(packet.route(), Some(route::UNBIND_REQ));
    assert_eq!(packet.seq(), Some(9));
}

#[test]
fn test_both_flags_read_as_heartbeat() {
    let reader = FrameReader::new();
    let mut stream = Cursor::new(vec![0u8, 0, 0, 1, 0x03]);

    assert!(reader.read_packet(&mut stream).unwrap().is_heartbeat());
}

#[test]
fn test_data_frame_feeds_packer() {
    let reader = FrameReader::new();
    let packer = UnbindPacker::new();
    let res = packer
        .pack_response(&UnbindResponse { seq: 7, code: -3 })
        .unwrap();
    let mut stream = Cursor::new(res.to_vec());

    let packet = reader.read_packet(&mut stream).unwrap();
    assert_eq!(packet.route(), Some(route::UNBIND_RES));

    let decoded = packer.unpack_response(packet.data()).unwrap();
    assert_eq!(decoded, UnbindResponse { seq: 7, code: -3 });
}

#[test]
fn test_read_multiple_frames_in_order() {
    let reader = FrameReader::new();
    let mut wire = Vec::new();
    wire.extend(request_bytes(1, 10));
    wire.extend(heartbeat_bytes());
    wire.extend(request_bytes(2, 20));
    let mut stream = Cursor::new(wire);

    assert_eq!(reader.read_packet(&mut stream).unwrap().seq(), Some(1));
    assert!(reader.read_packet(&mut stream).unwrap().is_heartbeat());
    assert_eq!(reader.read_packet(&mut stream).unwrap().seq(), Some(2));

    let err = reader.read_packet(&mut stream).unwrap_err();
    assert!(err.is_transport());
}

// =============================================================================
// Malformed Frame Tests
// =============================================================================

#[test]
fn test_zero_size_rejected_without_payload_read() {
    let reader = FrameReader::new();
    let mut stream = Cursor::new(vec![0u8, 0, 0, 0, 0xAA, 0xBB]);

    let err = reader.read_packet(&mut stream).unwrap_err();

    assert!(err.is_malformed());
    assert_eq!(stream.position(), 4);
}

#[test]
fn test_oversized_frame_rejected() {
    let reader = FrameReader::new().with_max_frame_size(64);
    let mut stream = Cursor::new(vec![0u8, 0, 0x01, 0x00, 0x01]);

    let err = reader.read_packet(&mut stream).unwrap_err();

    assert!(err.is_malformed());
    assert!(err.to_string().contains("exceeds maximum"));
    assert_eq!(stream.position(), 4);
}

#[test]
fn test_short_data_frame_rejected() {
    let reader = FrameReader::new();
    // size = 3: header (data) + route + 1 stray byte, no room for a sequence
    let mut stream = Cursor::new(vec![0u8, 0, 0, 3, 0x01, 0x05, 0x00]);

    let err = reader.read_packet(&mut stream).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_truncated_size_is_transport_error() {
    let reader = FrameReader::new();
    let mut stream = Cursor::new(vec![0u8, 0]);

    match reader.read_packet(&mut stream) {
        Err(WireError::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("Expected IO error, got {:?}", other),
    }
}

#[test]
fn test_truncated_payload_is_transport_error() {
    let reader = FrameReader::new();
    let mut raw = request_bytes(5, 5);
    raw.truncate(raw.len() - 3);
    let mut stream = Cursor::new(raw);

    let err = reader.read_packet(&mut stream).unwrap_err();
    assert!(err.is_transport());
    assert!(err.is_disconnect());
}

#[test]
fn test_empty_stream() {
    let reader = FrameReader::new();
    let mut stream = Cursor::new(Vec::<u8>::new());

    assert!(reader.read_packet(&mut stream).unwrap_err().is_transport());
}

// =============================================================================
// Scratch Pool Tests
// =============================================================================

#[test]
fn test_scratch_returned_on_every_path() {
    let pool = BufferPool::new(4);
    let reader = FrameReader::with_pool(pool.clone()).unwrap();

    let mut ok = Cursor::new(heartbeat_bytes());
    reader.read_packet(&mut ok).unwrap();

    let mut zero = Cursor::new(vec![0u8, 0, 0, 0]);
    reader.read_packet(&mut zero).unwrap_err();

    let mut short = Cursor::new(vec![0u8]);
    reader.read_packet(&mut short).unwrap_err();

    let stats = pool.stats();
    assert_eq!(stats.allocated, 1);
    assert_eq!(stats.reused, 2);
    assert_eq!(stats.released, 3);
    assert_eq!(stats.idle, 1);
}

#[test]
fn test_default_reader_uses_shared_scratch_pool() {
    let shared = pool::global().pool(SIZE_BYTES).unwrap();
    let before = shared.stats().released;

    let mut stream = Cursor::new(heartbeat_bytes());
    FrameReader::new().read_packet(&mut stream).unwrap();

    // Other tests share this pool, so only a lower bound holds
    assert!(shared.stats().released > before);
}

#[test]
fn test_with_pool_rejects_wrong_length() {
    let err = FrameReader::with_pool(BufferPool::new(8)).unwrap_err();
    assert!(matches!(err, WireError::Config(_)));
}

// =============================================================================
// Packet Tests
// =============================================================================

#[test]
fn test_from_frame_checks_size_field() {
    let mut raw = heartbeat_bytes();
    raw.push(0);

    let err = Packet::from_frame(Bytes::from(raw)).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_from_frame_rejects_too_short() {
    assert!(Packet::from_frame(Bytes::from_static(&[0, 0, 0])).is_err());
}
