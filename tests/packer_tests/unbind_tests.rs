//! Tests for the Unbind Packer
//!
//! These tests verify:
//! - Request/response round trips under both writers
//! - Exact-length validation on unpack
//! - Tail-anchored status code decoding
//! - Pool usage and registry wiring

use framewire::packer::unbind::{REQUEST_BYTES, RESPONSE_BYTES};
use framewire::packer::{UnbindPacker, UnbindRequest, UnbindResponse};
use framewire::pool::{self, PoolRegistry};
use framewire::protocol::{route, DATA_BIT, HEADER_OFFSET, ROUTE_OFFSET};
use framewire::{Packer, WireError, WriterStrategy};

// =============================================================================
// Helper Functions
// =============================================================================

fn packers() -> [UnbindPacker; 2] {
    [
        UnbindPacker::with_writer(WriterStrategy::Sequential),
        UnbindPacker::with_writer(WriterStrategy::Typed),
    ]
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_request_scenario() {
    let packer = UnbindPacker::new();
    let buf = packer
        .pack_request(&UnbindRequest { seq: 42, uid: 1001 })
        .unwrap();

    let req = packer.unpack_request(&buf).unwrap();
    assert_eq!(req, UnbindRequest { seq: 42, uid: 1001 });
}

#[test]
fn test_response_scenario() {
    let packer = UnbindPacker::new();
    let buf = packer
        .pack_response(&UnbindResponse { seq: 42, code: 0 })
        .unwrap();

    let res = packer.unpack_response(&buf).unwrap();
    assert_eq!(res.code, 0);
    assert_eq!(res.seq, 42);
}

#[test]
fn test_round_trip_extremes() {
    let requests = [
        UnbindRequest { seq: 0, uid: 0 },
        UnbindRequest { seq: u64::MAX, uid: i64::MIN },
        UnbindRequest { seq: 1, uid: -1 },
        UnbindRequest { seq: 0x8000_0000_0000_0000, uid: i64::MAX },
    ];
    let responses = [
        UnbindResponse { seq: 0, code: i16::MIN },
        UnbindResponse { seq: u64::MAX, code: i16::MAX },
        UnbindResponse { seq: 9, code: -1 },
    ];

    for packer in packers() {
        for req in requests {
            let buf = packer.pack_request(&req).unwrap();
            assert_eq!(packer.unpack_request(&buf).unwrap(), req);
        }
        for res in responses {
            let buf = packer.pack_response(&res).unwrap();
            assert_eq!(packer.unpack_response(&buf).unwrap(), res);
        }
    }
}

#[test]
fn test_writers_agree() {
    let [seq_packer, typed_packer] = packers();
    let req = UnbindRequest { seq: 77, uid: -4242 };
    let res = UnbindResponse { seq: 77, code: 404 };

    assert_eq!(
        seq_packer.pack_request(&req).unwrap().to_vec(),
        typed_packer.pack_request(&req).unwrap().to_vec()
    );
    assert_eq!(
        seq_packer.pack_response(&res).unwrap().to_vec(),
        typed_packer.pack_response(&res).unwrap().to_vec()
    );
}

// =============================================================================
// Frame Layout Tests
// =============================================================================

#[test]
fn test_packed_frames_are_full_length() {
    let packer = UnbindPacker::new();

    let req = packer.pack_request(&UnbindRequest { seq: 1, uid: 2 }).unwrap();
    assert_eq!(req.len(), REQUEST_BYTES);
    assert_eq!(req.capacity(), REQUEST_BYTES);
    assert_eq!(&req[..4], &((REQUEST_BYTES - 4) as u32).to_be_bytes());
    assert_eq!(req[HEADER_OFFSET], DATA_BIT);
    assert_eq!(req[ROUTE_OFFSET] as i8, route::UNBIND_REQ);

    let res = packer.pack_response(&UnbindResponse { seq: 1, code: 2 }).unwrap();
    assert_eq!(res.len(), RESPONSE_BYTES);
    assert_eq!(&res[..4], &((RESPONSE_BYTES - 4) as u32).to_be_bytes());
    assert_eq!(res[ROUTE_OFFSET] as i8, route::UNBIND_RES);
}

#[test]
fn test_route_codes() {
    let packer = UnbindPacker::new();
    assert_eq!(packer.request_route(), route::UNBIND_REQ);
    assert_eq!(packer.response_route(), route::UNBIND_RES);
}

#[test]
fn test_response_code_read_from_tail() {
    let packer = UnbindPacker::new();
    let mut raw = packer
        .pack_response(&UnbindResponse { seq: 3, code: 0x0102 })
        .unwrap()
        .to_vec();

    // Scribble over everything but the last two bytes
    let tail = raw.len() - 2;
    for b in &mut raw[..tail] {
        *b = 0xEE;
    }

    let res = packer.unpack_response(&raw).unwrap();
    assert_eq!(res.code, 0x0102);
}

// =============================================================================
// Length Validation Tests
// =============================================================================

#[test]
fn test_unpack_request_rejects_wrong_lengths() {
    let packer = UnbindPacker::new();
    let good = packer
        .pack_request(&UnbindRequest { seq: 1, uid: 1 })
        .unwrap()
        .to_vec();

    let mut long = good.clone();
    long.push(0);

    for data in [&[][..], &good[..1], &good[..REQUEST_BYTES - 1], &long[..]] {
        match packer.unpack_request(data) {
            Err(WireError::MalformedFrame(_)) => {}
            other => panic!("len {}: expected malformed, got {:?}", data.len(), other),
        }
    }
}

#[test]
fn test_unpack_response_rejects_wrong_lengths() {
    let packer = UnbindPacker::new();
    let good = packer
        .pack_response(&UnbindResponse { seq: 1, code: 1 })
        .unwrap()
        .to_vec();

    let mut long = good.clone();
    long.extend_from_slice(&[0, 0]);

    for data in [&[][..], &good[..RESPONSE_BYTES - 1], &long[..]] {
        assert!(packer.unpack_response(data).unwrap_err().is_malformed());
    }
}

#[test]
fn test_request_is_not_a_response() {
    let packer = UnbindPacker::new();
    let req = packer.pack_request(&UnbindRequest { seq: 1, uid: 1 }).unwrap();

    assert!(packer.unpack_response(&req).is_err());
}

// =============================================================================
// Pool Tests
// =============================================================================

#[test]
fn test_explicit_registry_pools() {
    let registry = PoolRegistry::new([REQUEST_BYTES, RESPONSE_BYTES]);
    let packer = UnbindPacker::with_registry(&registry, WriterStrategy::Typed).unwrap();

    for seq in 0..3 {
        packer
            .pack_request(&UnbindRequest { seq, uid: 1 })
            .unwrap()
            .release();
    }

    let stats = packer.request_pool().stats();
    assert_eq!(stats.allocated, 1);
    assert_eq!(stats.reused, 2);
    assert_eq!(packer.response_pool().stats().allocated, 0);
}

#[test]
fn test_default_packer_uses_shared_pools() {
    let packer = UnbindPacker::new();
    let registry = pool::global();

    assert!(packer.request_pool().same_pool(&registry.pool(REQUEST_BYTES).unwrap()));
    assert!(packer.response_pool().same_pool(&registry.pool(RESPONSE_BYTES).unwrap()));
}

#[test]
fn test_registry_missing_length() {
    let registry = PoolRegistry::new([REQUEST_BYTES]);
    let err = UnbindPacker::with_registry(&registry, WriterStrategy::Sequential).err();

    assert!(matches!(err, Some(WireError::Config(_))));
}
