//! Arbitrary bytes through the full frame parse path.
//!
//! Whatever the input, parsing must not panic, read out of bounds, or
//! allocate past the documented caps, and the JSON projection of any
//! successfully parsed packet must be total.

#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use spyglass_proto::{Frame, ParsedPacket};

fuzz_target!(|data: &[u8]| {
    let Ok(frame) = Frame::from_wire(Bytes::copy_from_slice(data)) else {
        return;
    };

    if let Ok(packet) = ParsedPacket::parse(&frame) {
        let json = packet.data().to_json();
        assert!(!json.is_empty());

        // The raw bytes for forwarding are untouched by the decode.
        assert_eq!(packet.raw().as_ref(), data);
    }
});
