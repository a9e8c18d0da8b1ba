//! Packet header parsing and body decompression.
//!
//! The payload of a frame starts with a variable-length header:
//!
//! ```text
//! [flags: 1 byte] [crc32: 4 bytes, if CRC32 flag] [size: 4 bytes LE, if LZ4 flag] [body]
//! ```
//!
//! The CRC field is skipped unread; the game client does not rely on the
//! proxy validating it and forwarding is byte-exact either way. When the
//! LZ4 flag is set, the body is a raw LZ4 block and the size field gives
//! the exact decompressed length, capped at [`PacketHeader::MAX_UNCOMPRESSED_SIZE`]
//! to stop a hostile peer from requesting an arbitrary allocation.

use crate::{
    cursor::ByteCursor,
    errors::{DecodeError, Result},
    flags::PacketFlags,
};

/// Parsed packet header: the flag byte plus the optional size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Flag byte, unknown bits included
    pub flags: PacketFlags,

    /// Advertised decompressed size (present only when the LZ4 flag is set)
    pub uncompressed_size: Option<u32>,
}

impl PacketHeader {
    /// Hard cap on the advertised decompressed size (10 MB).
    pub const MAX_UNCOMPRESSED_SIZE: u32 = 10_000_000;
}

/// Split a frame payload into its header and (decompressed) body.
///
/// `input` is everything after the 4-byte length prefix. The returned body
/// is the bytes the value decoder consumes: the literal remainder for plain
/// packets, or the decompressed block for LZ4 packets.
///
/// # Errors
///
/// - [`DecodeError::Truncated`] if the flag byte, CRC field, or size field
///   is cut short.
/// - [`DecodeError::Oversize`] if the advertised decompressed size exceeds
///   [`PacketHeader::MAX_UNCOMPRESSED_SIZE`].
/// - [`DecodeError::Corrupt`] if LZ4 decompression fails or produces more
///   bytes than advertised.
/// - [`DecodeError::Empty`] if nothing is left after the header.
pub fn split_payload(input: &[u8]) -> Result<(PacketHeader, Vec<u8>)> {
    // Flag byte plus at least one payload byte.
    if input.len() < 2 {
        return Err(DecodeError::Truncated { needed: 2, remaining: input.len() });
    }

    let mut cur = ByteCursor::new(input);

    let flags = PacketFlags::from_byte(cur.read_u8()?);

    if flags.contains(PacketFlags::CRC32) {
        // Skipped unverified.
        cur.read_bytes(4)?;
    }

    let (header, body) = if flags.contains(PacketFlags::LZ4) {
        let size = cur.read_u32_le()?;
        if size > PacketHeader::MAX_UNCOMPRESSED_SIZE {
            return Err(DecodeError::Oversize {
                size: u64::from(size),
                max: u64::from(PacketHeader::MAX_UNCOMPRESSED_SIZE),
            });
        }

        let compressed = cur.read_bytes(cur.remaining())?;
        let body = decompress_block(compressed, size as usize)?;

        (PacketHeader { flags, uncompressed_size: Some(size) }, body)
    } else {
        let rest = cur.read_bytes(cur.remaining())?;
        (PacketHeader { flags, uncompressed_size: None }, rest.to_vec())
    };

    if body.is_empty() {
        return Err(DecodeError::Empty);
    }

    Ok((header, body))
}

/// Decompress a raw LZ4 block into a buffer of exactly `size` bytes.
///
/// A block that decodes to fewer bytes than advertised is padded with
/// zeroes up to `size`; one that decodes to more is rejected as corrupt.
fn decompress_block(compressed: &[u8], size: usize) -> Result<Vec<u8>> {
    if compressed.is_empty() {
        return if size == 0 {
            Ok(Vec::new())
        } else {
            Err(DecodeError::Corrupt("empty compressed block".to_string()))
        };
    }

    let mut body = lz4_flex::block::decompress(compressed, size)
        .map_err(|e| DecodeError::Corrupt(e.to_string()))?;

    if body.len() > size {
        return Err(DecodeError::Corrupt(format!(
            "decompressed {} bytes but header advertised {size}",
            body.len()
        )));
    }
    body.resize(size, 0);

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_body_passes_through() {
        let input = [0x00, 0x2A, 0x01, 0x02];
        let (header, body) = split_payload(&input).unwrap();
        assert_eq!(header.flags, PacketFlags::empty());
        assert_eq!(header.uncompressed_size, None);
        assert_eq!(body, vec![0x2A, 0x01, 0x02]);
    }

    #[test]
    fn crc_field_is_skipped_unread() {
        let input = [0x08, 0xDE, 0xAD, 0xBE, 0xEF, 0x2A, 0x07];
        let (header, body) = split_payload(&input).unwrap();
        assert!(header.flags.contains(PacketFlags::CRC32));
        assert_eq!(body, vec![0x2A, 0x07]);
    }

    #[test]
    fn missing_crc_is_truncated() {
        let input = [0x08, 0xDE, 0xAD];
        assert!(matches!(split_payload(&input), Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn lz4_round_trip() {
        let original = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let compressed = lz4_flex::block::compress(&original);

        let mut input = vec![0x04];
        input.extend_from_slice(&(original.len() as u32).to_le_bytes());
        input.extend_from_slice(&compressed);

        let (header, body) = split_payload(&input).unwrap();
        assert!(header.flags.contains(PacketFlags::LZ4));
        assert_eq!(header.uncompressed_size, Some(original.len() as u32));
        assert_eq!(body, original);
    }

    #[test]
    fn crc_and_lz4_together() {
        let original = b"combined header fields".to_vec();
        let compressed = lz4_flex::block::compress(&original);

        let mut input = vec![0x0C, 0, 0, 0, 0];
        input.extend_from_slice(&(original.len() as u32).to_le_bytes());
        input.extend_from_slice(&compressed);

        let (_, body) = split_payload(&input).unwrap();
        assert_eq!(body, original);
    }

    #[test]
    fn oversize_advertised_size_is_rejected() {
        // 0x01000001 little-endian: just over 16.7 MB.
        let input = [0x04, 0x01, 0x00, 0x00, 0x01];
        assert_eq!(
            split_payload(&input),
            Err(DecodeError::Oversize {
                size: 0x0100_0001,
                max: u64::from(PacketHeader::MAX_UNCOMPRESSED_SIZE),
            })
        );
    }

    #[test]
    fn missing_size_field_is_truncated() {
        let input = [0x04, 0x00, 0x00];
        assert!(matches!(split_payload(&input), Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn garbage_block_is_corrupt() {
        let mut input = vec![0x04];
        input.extend_from_slice(&64u32.to_le_bytes());
        input.extend_from_slice(&[0xFF; 8]);
        assert!(matches!(split_payload(&input), Err(DecodeError::Corrupt(_))));
    }

    #[test]
    fn empty_block_with_advertised_size_is_corrupt() {
        let mut input = vec![0x04];
        input.extend_from_slice(&16u32.to_le_bytes());
        assert!(matches!(split_payload(&input), Err(DecodeError::Corrupt(_))));
    }

    #[test]
    fn inputs_below_the_header_minimum_are_truncated() {
        assert!(matches!(split_payload(&[]), Err(DecodeError::Truncated { .. })));
        assert_eq!(
            split_payload(&[0x00]),
            Err(DecodeError::Truncated { needed: 2, remaining: 1 })
        );
    }

    #[test]
    fn crc_header_leaving_nothing_is_empty() {
        assert_eq!(split_payload(&[0x08, 1, 2, 3, 4]), Err(DecodeError::Empty));
    }

    #[test]
    fn lz4_zero_size_decompresses_to_empty() {
        // Flags + zero size field, no block: decompression succeeds with
        // zero bytes, then the empty-payload check fires.
        let input = [0x04, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(split_payload(&input), Err(DecodeError::Empty));
    }
}
