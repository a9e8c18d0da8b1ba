//! Packet header flags.
//!
//! The first payload byte of every frame is a flag bitset that controls how
//! the rest of the header is laid out. Only two bits are assigned; the rest
//! are reserved by the game protocol and carried through untouched.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Packet feature flags (8 bits)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PacketFlags: u8 {
        /// Body after the header is LZ4 block-compressed
        const LZ4 = 0x04;

        /// A 4-byte CRC32 field follows the flag byte (skipped unverified)
        const CRC32 = 0x08;
    }
}

impl PacketFlags {
    /// Create flags from the raw wire byte.
    ///
    /// This function is **infallible**: all 256 byte values are valid.
    /// Unknown bits are preserved for diagnostics but have no behavioural
    /// effect, so a newer peer setting reserved bits cannot break parsing.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }

    /// Convert to the raw wire byte, unknown bits included.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        self.bits()
    }
}

impl Default for PacketFlags {
    fn default() -> Self {
        Self::empty()
    }
}
