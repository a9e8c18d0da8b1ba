//! Top-level packet decoding.
//!
//! A frame payload, after the header is stripped and the body decompressed
//! if needed, is a 1-byte message type followed by an optional map. Parsing
//! produces a [`ParsedPacket`]: an immutable snapshot the observer renders
//! to JSON and then discards. The raw frame bytes are retained alongside
//! the tree so the forwarder path never depends on parse success.

use bytes::Bytes;

use crate::{
    cursor::ByteCursor,
    errors::Result,
    flags::PacketFlags,
    frame::Frame,
    header::split_payload,
    value::{decode_map, Value},
};

/// A fully decoded packet.
///
/// Constructed only by [`ParsedPacket::parse`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPacket {
    message_type: u8,
    data: Value,
    flags: PacketFlags,
    raw: Bytes,
}

impl ParsedPacket {
    /// Decode a complete frame.
    ///
    /// The frame's bytes are only read, never modified; on failure the
    /// frame remains valid for forwarding.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`](crate::DecodeError): a truncated header or map
    /// count, an oversize size field or map count, a corrupt LZ4 block, or
    /// an empty post-header payload.
    pub fn parse(frame: &Frame) -> Result<Self> {
        let (header, body) = split_payload(frame.payload())?;

        let mut cur = ByteCursor::new(&body);
        let message_type = cur.read_u8()?;

        let data = if cur.is_empty() {
            Value::Null
        } else {
            Value::Map(decode_map(&mut cur)?)
        };

        Ok(Self { message_type, data, flags: header.flags, raw: frame.to_bytes() })
    }

    /// The 1-byte opcode following the header.
    #[must_use]
    pub fn message_type(&self) -> u8 {
        self.message_type
    }

    /// The decoded document tree ([`Value::Null`] when the packet carried
    /// no map).
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The header flag byte, unknown bits included.
    #[must_use]
    pub fn flags(&self) -> PacketFlags {
        self.flags
    }

    /// The original on-wire bytes, length prefix included.
    #[must_use]
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DecodeError;

    fn parse_payload(payload: &[u8]) -> Result<ParsedPacket> {
        ParsedPacket::parse(&Frame::from_payload(payload))
    }

    #[test]
    fn empty_map_packet() {
        // Flags 0, message_type 42, map with 0 entries.
        let packet = parse_payload(&[0x00, 0x2A, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(packet.message_type(), 42);
        assert_eq!(packet.data().to_json(), "{}");
        assert_eq!(packet.flags(), PacketFlags::empty());
    }

    #[test]
    fn single_int_field() {
        // {"hp": 100} under message_type 1.
        let payload = [
            0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x02, 0x68, 0x70, 0x02, 0x00, 0x00,
            0x00, 0x64,
        ];
        let packet = parse_payload(&payload).unwrap();
        assert_eq!(packet.message_type(), 1);
        assert_eq!(packet.data().to_json(), r#"{"hp":100}"#);
    }

    #[test]
    fn nested_bool_array() {
        // {"ok": [true, false, true]} under message_type 5.
        let payload = [
            0x00, 0x05, 0x00, 0x00, 0x00, 0x01, 0x00, 0x02, 0x6F, 0x6B, 0x07, 0x00, 0x00,
            0x00, 0x03, 0x01, 0x01, 0x01, 0x00, 0x01, 0x01,
        ];
        let packet = parse_payload(&payload).unwrap();
        assert_eq!(packet.message_type(), 5);
        assert_eq!(packet.data().to_json(), r#"{"ok":[true,false,true]}"#);
    }

    #[test]
    fn compressed_empty_body_is_empty() {
        // LZ4 flag, zero uncompressed size, no block.
        let payload = [0x04, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(parse_payload(&payload), Err(DecodeError::Empty));
    }

    #[test]
    fn oversize_uncompressed_size() {
        // LZ4 flag, advertised size just over 16.7 MB.
        let payload = [0x04, 0x01, 0x00, 0x00, 0x01];
        assert!(matches!(parse_payload(&payload), Err(DecodeError::Oversize { .. })));
    }

    #[test]
    fn truncated_value_becomes_null_but_parse_succeeds() {
        // Value tag 2 with only two of four body bytes.
        let payload = [
            0x00, 0x09, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x78, 0x02, 0x00, 0x00,
        ];
        let packet = parse_payload(&payload).unwrap();
        assert_eq!(packet.message_type(), 9);

        let Value::Map(map) = packet.data() else {
            panic!("expected a map, got {:?}", packet.data());
        };
        assert_eq!(map.get(b"x"), Some(&Value::Null));
        assert_eq!(packet.data().to_json(), r#"{"x":null}"#);
    }

    #[test]
    fn message_type_only_packet_has_null_data() {
        let packet = parse_payload(&[0x00, 0x07]).unwrap();
        assert_eq!(packet.message_type(), 7);
        assert!(packet.data().is_null());
    }

    #[test]
    fn compressed_packet_round_trip() {
        let body = {
            let mut b = vec![0x2A];
            b.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
            b.extend_from_slice(&[0x00, 0x02, b'h', b'p', 0x02, 0x00, 0x00, 0x00, 0x64]);
            b
        };
        let compressed = lz4_flex::block::compress(&body);

        let mut payload = vec![0x04];
        payload.extend_from_slice(&(body.len() as u32).to_le_bytes());
        payload.extend_from_slice(&compressed);

        let packet = parse_payload(&payload).unwrap();
        assert_eq!(packet.message_type(), 42);
        assert!(packet.flags().contains(PacketFlags::LZ4));
        assert_eq!(packet.data().to_json(), r#"{"hp":100}"#);
    }

    #[test]
    fn raw_bytes_are_retained_verbatim() {
        let payload = [0x00, 0x2A, 0x00, 0x00, 0x00, 0x00];
        let frame = Frame::from_payload(&payload);
        let packet = ParsedPacket::parse(&frame).unwrap();
        assert_eq!(packet.raw(), &frame.to_bytes());
    }

    #[test]
    fn garbage_after_message_type_fails_at_the_map_count() {
        // Two trailing bytes cannot hold a map count.
        let payload = [0x00, 0x2A, 0x01, 0x02];
        assert!(matches!(parse_payload(&payload), Err(DecodeError::Truncated { .. })));
    }
}
