//! Builders for on-wire packet bytes.
//!
//! These produce the exact byte layout the game emits, so tests can drive
//! the proxy with realistic traffic without hand-assembling hex.

use spyglass_proto::{Frame, PacketFlags, ValueMap};

/// Wrap `payload` in a length-prefixed frame.
#[must_use]
pub fn frame(payload: &[u8]) -> Vec<u8> {
    Frame::from_payload(payload).as_bytes().to_vec()
}

/// An uncompressed packet: flags 0, message type, optional map body.
#[must_use]
pub fn packet(message_type: u8, data: Option<&ValueMap>) -> Vec<u8> {
    let mut payload = vec![PacketFlags::empty().to_byte(), message_type];
    if let Some(map) = data {
        map.encode(&mut payload);
    }
    frame(&payload)
}

/// An LZ4-compressed packet with the little-endian size field.
#[must_use]
pub fn compressed_packet(message_type: u8, data: Option<&ValueMap>) -> Vec<u8> {
    let mut body = vec![message_type];
    if let Some(map) = data {
        map.encode(&mut body);
    }
    let compressed = lz4_flex::block::compress(&body);

    let mut payload = vec![PacketFlags::LZ4.to_byte()];
    payload.extend_from_slice(&(body.len() as u32).to_le_bytes());
    payload.extend_from_slice(&compressed);
    frame(&payload)
}

/// A packet carrying a CRC field (the proxy skips it unverified).
#[must_use]
pub fn crc_packet(message_type: u8, crc: u32, data: Option<&ValueMap>) -> Vec<u8> {
    let mut payload = vec![PacketFlags::CRC32.to_byte()];
    payload.extend_from_slice(&crc.to_be_bytes());
    payload.push(message_type);
    if let Some(map) = data {
        map.encode(&mut payload);
    }
    frame(&payload)
}
