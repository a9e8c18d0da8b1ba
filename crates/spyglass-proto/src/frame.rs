//! Frame type for the length-prefixed wire stream.
//!
//! A `Frame` is the unit the proxy forwards: a 4-byte big-endian length `N`
//! followed by exactly `N` payload bytes. The prefix is retained so the
//! forwarder can write the frame back out byte-for-byte.
//!
//! # Invariants
//!
//! - **Prefix Consistency**: the length prefix always agrees with the number
//!   of payload bytes. [`Frame::from_wire`] verifies this; [`Frame::from_payload`]
//!   computes the prefix itself so a mismatch cannot be constructed.
//!
//! - **Immutability**: a frame never changes after construction. Decoding a
//!   frame borrows its bytes and leaves them intact, so forwarding is safe
//!   even when decoding fails halfway through.

use bytes::Bytes;

use crate::errors::{DecodeError, Result};

/// Size of the big-endian length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// A complete on-wire frame: length prefix plus payload.
///
/// The backing buffer is a [`Bytes`] handle, so cloning a frame (to hand a
/// copy to the decoder while the original is forwarded) is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    wire: Bytes,
}

impl Frame {
    /// Validate raw wire bytes as a single complete frame.
    ///
    /// The input must be exactly one frame: 4 prefix bytes plus as many
    /// payload bytes as the prefix declares. Trailing or missing bytes are
    /// rejected, so a frame that round-trips through here is guaranteed to
    /// satisfy `length(frame) == 4 + read_u32_be(frame[0..4])`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Truncated`] if the input is shorter than the
    /// prefix requires, or [`DecodeError::Oversize`] if it is longer.
    pub fn from_wire(wire: Bytes) -> Result<Self> {
        if wire.len() < LENGTH_PREFIX_SIZE {
            return Err(DecodeError::Truncated {
                needed: LENGTH_PREFIX_SIZE,
                remaining: wire.len(),
            });
        }

        let declared = u32::from_be_bytes([wire[0], wire[1], wire[2], wire[3]]) as usize;
        let actual = wire.len() - LENGTH_PREFIX_SIZE;

        if actual < declared {
            return Err(DecodeError::Truncated { needed: declared - actual, remaining: 0 });
        }
        if actual > declared {
            return Err(DecodeError::Oversize { size: actual as u64, max: declared as u64 });
        }

        Ok(Self { wire })
    }

    /// Build a frame around `payload`, computing the length prefix.
    ///
    /// # Panics
    ///
    /// Panics if `payload.len() > u32::MAX`. In practice this cannot happen:
    /// slices are bounded by `isize::MAX` and callers build test payloads
    /// far below the 4 GB prefix limit.
    #[must_use]
    pub fn from_payload(payload: &[u8]) -> Self {
        let len = u32::try_from(payload.len()).expect("payload exceeds length prefix range");
        let mut wire = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
        wire.extend_from_slice(&len.to_be_bytes());
        wire.extend_from_slice(payload);
        Self { wire: Bytes::from(wire) }
    }

    /// Full wire bytes, prefix included. This is what the forwarder writes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.wire
    }

    /// Payload bytes after the length prefix.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.wire[LENGTH_PREFIX_SIZE..]
    }

    /// Total length on the wire (prefix + payload).
    #[must_use]
    pub fn len(&self) -> usize {
        self.wire.len()
    }

    /// True only for the degenerate zero-payload frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wire.len() == LENGTH_PREFIX_SIZE
    }

    /// Shared handle to the raw bytes, for retention alongside a decode.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        self.wire.clone()
    }
}
