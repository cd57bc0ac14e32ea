//! Fuzz target for Address parsing
//!
//! Address parsing feeds on sniffed advertising data, so it must tolerate
//! arbitrary garbage: no panics, no partial values, only `Some`/`None`.
//!
//! The fuzzer also checks the round-trip law on every accepted input.

#![no_main]

use btmesh_proto::Address;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Byte-slice intake: only exact 6-byte slices are accepted
    let from_bytes = Address::from_bytes(data);
    assert_eq!(from_bytes.is_some(), data.len() == 6);

    // Textual intake: must never panic, and accepted values round-trip
    if let Ok(text) = core::str::from_utf8(data) {
        if let Some(addr) = Address::parse(text) {
            assert_eq!(Address::parse(&addr.to_string()), Some(addr));
            assert_eq!(Address::parse(&addr.format_with('-')), Some(addr));
        }
    }
});
