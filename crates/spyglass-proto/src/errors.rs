//! Error types for the intercepted wire format.
//!
//! The decoder exposes a small, closed taxonomy. Every failure mode of
//! `ParsedPacket::parse` maps to exactly one of these variants, and the
//! forwarder treats all of them the same way: log a parse-error record and
//! keep forwarding bytes.

use thiserror::Error;

/// Errors raised while decoding a single frame.
///
/// Decoding is per-frame: a `DecodeError` never carries connection state and
/// never poisons subsequent frames on the same stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before a required field was complete.
    #[error("input truncated: needed {needed} more bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the current field still required
        needed: usize,
        /// Bytes actually left in the input
        remaining: usize,
    },

    /// An advertised length or count exceeded its hard cap.
    #[error("advertised size {size} exceeds limit {max}")]
    Oversize {
        /// The advertised value
        size: u64,
        /// The cap it violated
        max: u64,
    },

    /// LZ4 block decompression failed.
    #[error("lz4 decompression failed: {0}")]
    Corrupt(String),

    /// The payload after the header was empty.
    #[error("empty payload after header")]
    Empty,
}

/// Convenient Result type alias for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;
