//! Recursive tagged-value decoder and the document tree it produces.
//!
//! Every packet body is a 1-byte message type followed by an optional map
//! encoded in the game's tagged format. A value is a 1-byte tag and a
//! tag-specific body:
//!
//! | Tag | Kind       | Body                                  |
//! |-----|------------|---------------------------------------|
//! | 0   | Null       | (none)                                |
//! | 1   | Bool       | 1 byte, non-zero = true               |
//! | 2   | Int32      | 4 bytes BE, two's complement          |
//! | 3   | Int64      | 8 bytes BE, two's complement          |
//! | 4   | Float64    | 8 bytes BE, IEEE-754 bits             |
//! | 5   | String     | u16 BE length, then raw bytes         |
//! | 6   | Map        | u32 BE count, then key/value pairs    |
//! | 7   | Array      | u32 BE count, then values             |
//! | 8   | LongString | u32 BE length, then raw bytes         |
//!
//! # Lenient decoding
//!
//! The decoder is deliberately forgiving below the frame boundary: a value
//! whose body is cut short becomes [`Value::Null`] rather than failing the
//! whole packet, and an unknown tag is Null consuming only the tag byte.
//! One malformed field must not erase an otherwise useful packet log.
//!
//! The hard failures are reserved for maps: a map whose count field is
//! missing fails as `Truncated`, and a count above
//! [`MAX_COLLECTION_ENTRIES`] fails as `Oversize`. Those propagate up and
//! fail the frame decode, matching the behaviour observed from the game.

use std::fmt;

use bytes::Bytes;

use crate::{
    cursor::ByteCursor,
    errors::{DecodeError, Result},
};

/// Hard cap on map and array entry counts.
pub const MAX_COLLECTION_ENTRIES: u32 = 10_000;

/// Hard cap on decoded map key length in bytes.
pub const MAX_KEY_LENGTH: u32 = 1_000_000;

/// Key lengths above this are read as the high half of a 32-bit length.
pub const LONG_KEY_THRESHOLD: u16 = 32_766;

/// Key substituted for empty (or unreadable) wire keys.
pub const UNKNOWN_KEY: &[u8] = b"unknown";

mod tag {
    pub const NULL: u8 = 0;
    pub const BOOL: u8 = 1;
    pub const INT32: u8 = 2;
    pub const INT64: u8 = 3;
    pub const FLOAT64: u8 = 4;
    pub const STRING: u8 = 5;
    pub const MAP: u8 = 6;
    pub const ARRAY: u8 = 7;
    pub const LONG_STRING: u8 = 8;
}

/// A length-prefixed byte string off the wire.
///
/// The protocol does not guarantee UTF-8, so string payloads and map keys
/// are kept as raw bytes. The JSON projection deals with the consequences.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteString(Bytes);

impl ByteString {
    /// Copy `bytes` into an owned byte string.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }

    /// The raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the string has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        Self::from_slice(s.as_bytes())
    }
}

impl From<String> for ByteString {
    fn from(s: String) -> Self {
        Self(Bytes::from(s.into_bytes()))
    }
}

impl PartialEq<&str> for ByteString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// A node in the decoded document tree.
///
/// The tree is a value type: once decoding returns it, nothing mutates it.
/// `Float64` keeps the exact wire bits, so `PartialEq` (and round-trip
/// tests) compare bit-derived values rather than formatted text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Tag 0, or any value the lenient decoder refused
    Null,
    /// Tag 1
    Bool(bool),
    /// Tag 2
    Int32(i32),
    /// Tag 3
    Int64(i64),
    /// Tag 4
    Float64(f64),
    /// Tags 5 and 8
    String(ByteString),
    /// Tag 6
    Map(ValueMap),
    /// Tag 7
    Array(Vec<Value>),
}

impl Value {
    /// True for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Encode this value in the wire format.
    ///
    /// Strings at or below `u16::MAX` bytes use the short form (tag 5),
    /// longer ones the long form (tag 8), so decoding the result gives back
    /// an equal tree. Production code never calls this; the harness and the
    /// round-trip properties do.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Value::Null => buf.push(tag::NULL),
            Value::Bool(b) => {
                buf.push(tag::BOOL);
                buf.push(u8::from(*b));
            },
            Value::Int32(v) => {
                buf.push(tag::INT32);
                buf.extend_from_slice(&v.to_be_bytes());
            },
            Value::Int64(v) => {
                buf.push(tag::INT64);
                buf.extend_from_slice(&v.to_be_bytes());
            },
            Value::Float64(v) => {
                buf.push(tag::FLOAT64);
                buf.extend_from_slice(&v.to_bits().to_be_bytes());
            },
            Value::String(s) => {
                if let Ok(len) = u16::try_from(s.len()) {
                    buf.push(tag::STRING);
                    buf.extend_from_slice(&len.to_be_bytes());
                } else {
                    buf.push(tag::LONG_STRING);
                    buf.extend_from_slice(&(s.len() as u32).to_be_bytes());
                }
                buf.extend_from_slice(s.as_bytes());
            },
            Value::Map(map) => {
                buf.push(tag::MAP);
                map.encode(buf);
            },
            Value::Array(items) => {
                buf.push(tag::ARRAY);
                buf.extend_from_slice(&(items.len() as u32).to_be_bytes());
                for item in items {
                    item.encode(buf);
                }
            },
        }
    }
}

/// An insertion-ordered map of byte-string keys to values.
///
/// The wire format does not guarantee unique keys; duplicates collapse to
/// the last written value, keeping the slot of the first occurrence.
/// Insertion order is preserved so the JSON rendering of a packet is stable
/// across runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueMap {
    entries: Vec<(ByteString, Value)>,
}

impl ValueMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair; an existing key is overwritten in place.
    pub fn insert(&mut self, key: ByteString, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a key by its raw bytes.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k.as_bytes() == key).map(|(_, v)| v)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(ByteString, Value)> {
        self.entries.iter()
    }

    /// Encode the count and entries in the wire format (no leading tag).
    ///
    /// Keys longer than [`LONG_KEY_THRESHOLD`] are not representable: the
    /// two-short long form always decodes above [`MAX_KEY_LENGTH`], so no
    /// conforming encoder can emit one.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());
        for (key, value) in &self.entries {
            debug_assert!(key.len() <= LONG_KEY_THRESHOLD as usize);
            buf.extend_from_slice(&(key.len() as u16).to_be_bytes());
            buf.extend_from_slice(key.as_bytes());
            value.encode(buf);
        }
    }
}

impl FromIterator<(ByteString, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (ByteString, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Decode one tagged value from the cursor.
///
/// Returns `Ok(Value::Null)` for an exhausted cursor, an unknown tag, or a
/// tag whose body is truncated; the cursor is left positioned after
/// whatever prefix of the value was readable.
///
/// # Errors
///
/// Only a nested map can fail the decode (truncated or oversize count);
/// see [`decode_map`].
pub fn decode_value(cur: &mut ByteCursor<'_>) -> Result<Value> {
    let Ok(tag_byte) = cur.read_u8() else {
        return Ok(Value::Null);
    };

    let value = match tag_byte {
        tag::NULL => Value::Null,
        tag::BOOL => match cur.read_u8() {
            Ok(b) => Value::Bool(b != 0),
            Err(_) => Value::Null,
        },
        tag::INT32 => match cur.read_u32_be() {
            Ok(v) => Value::Int32(v as i32),
            Err(_) => Value::Null,
        },
        tag::INT64 => match cur.read_u64_be() {
            Ok(v) => Value::Int64(v as i64),
            Err(_) => Value::Null,
        },
        tag::FLOAT64 => match cur.read_u64_be() {
            Ok(bits) => Value::Float64(f64::from_bits(bits)),
            Err(_) => Value::Null,
        },
        tag::STRING => match cur.read_u16_be() {
            Ok(len) => read_string(cur, len as usize).map_or(Value::Null, Value::String),
            Err(_) => Value::Null,
        },
        tag::LONG_STRING => match cur.read_u32_be() {
            Ok(len) => read_string(cur, len as usize).map_or(Value::Null, Value::String),
            Err(_) => Value::Null,
        },
        tag::MAP => Value::Map(decode_map(cur)?),
        tag::ARRAY => {
            let Ok(count) = cur.read_u32_be() else {
                return Ok(Value::Null);
            };
            if count > MAX_COLLECTION_ENTRIES {
                // The array is refused as a whole.
                return Ok(Value::Null);
            }
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                if cur.is_empty() {
                    break;
                }
                items.push(decode_value(cur)?);
            }
            Value::Array(items)
        },
        _ => Value::Null,
    };

    Ok(value)
}

/// Decode a map body: a u32 BE entry count followed by key/value pairs.
///
/// Decoding stops early, keeping the entries read so far, when the cursor
/// runs out or a key length exceeds [`MAX_KEY_LENGTH`]. An empty key is
/// replaced with `"unknown"`; duplicate keys collapse, last write wins.
///
/// # Errors
///
/// - [`DecodeError::Truncated`] if the count field itself is cut short.
/// - [`DecodeError::Oversize`] if the count exceeds
///   [`MAX_COLLECTION_ENTRIES`].
pub fn decode_map(cur: &mut ByteCursor<'_>) -> Result<ValueMap> {
    let count = cur.read_u32_be()?;
    if count > MAX_COLLECTION_ENTRIES {
        return Err(DecodeError::Oversize {
            size: u64::from(count),
            max: u64::from(MAX_COLLECTION_ENTRIES),
        });
    }

    let mut map = ValueMap::new();

    for _ in 0..count {
        if cur.is_empty() {
            break;
        }

        let Ok(hi) = cur.read_u16_be() else {
            break;
        };
        let key_len = if hi > LONG_KEY_THRESHOLD {
            // High 16 bits of a 32-bit length; the low half follows.
            let Ok(lo) = cur.read_u16_be() else {
                break;
            };
            (u32::from(hi) << 16) | u32::from(lo)
        } else {
            u32::from(hi)
        };

        if key_len > MAX_KEY_LENGTH {
            break;
        }

        let mut key = read_string(cur, key_len as usize).unwrap_or_default();
        if key.is_empty() {
            key = ByteString::from_slice(UNKNOWN_KEY);
        }

        let value = decode_value(cur)?;
        map.insert(key, value);
    }

    Ok(map)
}

fn read_string(cur: &mut ByteCursor<'_>, len: usize) -> Option<ByteString> {
    cur.read_bytes(len).ok().map(ByteString::from_slice)
}
