//! # Spyglass Protocol: Wire Format
//!
//! Decoder for the length-framed binary protocol spoken between the game
//! client and its server. The proxy forwards frames untouched and uses this
//! crate purely as an observer: every frame is decoded into a document tree
//! and rendered as a JSON diagnostic line.
//!
//! ## Wire layout
//!
//! ```text
//! [length: u32 BE] [flags: u8] [crc32?: 4] [size?: u32 LE] [message_type: u8] [map?]
//! ```
//!
//! The body after the header may be LZ4 block-compressed (flag `0x04`); the
//! optional CRC field (flag `0x08`) is skipped unverified. The map is the
//! recursive tagged format implemented in [`value`].
//!
//! ## Handling untrusted input
//!
//! Everything entering this crate comes from a network peer and is treated
//! as hostile:
//!
//! - **Bounded reads**: all parsing goes through [`ByteCursor`], which never
//!   reads outside its span and never advances on failure.
//! - **Size caps**: decompression output is capped at 10 MB, collection
//!   counts at 10,000 entries, key lengths at 1,000,000 bytes. Advertised
//!   values above a cap are rejected before any allocation.
//! - **Lenient below the frame**: a malformed sub-value decodes to `Null`
//!   instead of failing the packet, so one bad field does not erase an
//!   otherwise useful log line. The failure boundary is the frame.
//! - **Pass-through safety**: decoding borrows the frame bytes and never
//!   mutates them; the forwarder writes the original bytes regardless of
//!   the decode outcome.
//!
//! This crate is pure and synchronous: no I/O, no shared state, safe to
//! call from any number of workers on disjoint frames.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cursor;
pub mod errors;
pub mod flags;
pub mod frame;
pub mod header;
mod json;
pub mod packet;
pub mod value;

pub use cursor::ByteCursor;
pub use errors::{DecodeError, Result};
pub use flags::PacketFlags;
pub use frame::{Frame, LENGTH_PREFIX_SIZE};
pub use header::{split_payload, PacketHeader};
pub use packet::ParsedPacket;
pub use value::{
    decode_map, decode_value, ByteString, Value, ValueMap, MAX_COLLECTION_ENTRIES,
    MAX_KEY_LENGTH,
};
