//! Arbitrary bytes through the tagged-value decoder alone.

#![no_main]

use libfuzzer_sys::fuzz_target;
use spyglass_proto::{decode_value, ByteCursor};

fuzz_target!(|data: &[u8]| {
    let mut cur = ByteCursor::new(data);
    if let Ok(value) = decode_value(&mut cur) {
        assert!(cur.position() <= data.len());
        let _ = value.to_json();
    }
});
