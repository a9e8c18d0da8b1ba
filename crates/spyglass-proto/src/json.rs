//! Diagnostic JSON projection of the document tree.
//!
//! This is not a general-purpose JSON encoder. It renders a decoded packet
//! for a human reading a log line, it is total (never fails, never
//! allocates beyond the output), and it is byte-oriented: wire strings are
//! not guaranteed UTF-8, so escaping works on bytes.
//!
//! Rendering rules:
//! - `Null` → `null`, `Bool` → `true`/`false`, integers → decimal digits.
//! - `Float64` → decimal with at least one fractional digit.
//! - Strings: bytes below 32 are dropped except `\t`, `\n`, `\r` which pass
//!   through literally; `"` and `\` gain a backslash; everything else is
//!   emitted verbatim.
//! - Map keys are quoted verbatim, unescaped.

use crate::value::{ByteString, Value};

impl Value {
    /// Render the tree as a JSON string.
    ///
    /// Byte sequences that are not valid UTF-8 surface as U+FFFD
    /// replacement characters; use [`Value::to_json_bytes`] for the exact
    /// byte-level projection.
    #[must_use]
    pub fn to_json(&self) -> String {
        String::from_utf8_lossy(&self.to_json_bytes()).into_owned()
    }

    /// Render the tree as raw JSON bytes, non-UTF-8 content verbatim.
    #[must_use]
    pub fn to_json_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        write_value(self, &mut out);
        out
    }
}

fn write_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Int32(v) => out.extend_from_slice(v.to_string().as_bytes()),
        Value::Int64(v) => out.extend_from_slice(v.to_string().as_bytes()),
        Value::Float64(v) => write_float(*v, out),
        Value::String(s) => write_escaped(s, out),
        Value::Map(map) => {
            out.push(b'{');
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                out.push(b'"');
                out.extend_from_slice(key.as_bytes());
                out.extend_from_slice(b"\":");
                write_value(value, out);
            }
            out.push(b'}');
        },
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out);
            }
            out.push(b']');
        },
    }
}

fn write_float(v: f64, out: &mut Vec<u8>) {
    if v.is_finite() && v.fract() == 0.0 {
        out.extend_from_slice(format!("{v:.1}").as_bytes());
    } else {
        out.extend_from_slice(v.to_string().as_bytes());
    }
}

fn write_escaped(s: &ByteString, out: &mut Vec<u8>) {
    out.push(b'"');
    for &byte in s.as_bytes() {
        if byte >= 32 || byte == b'\t' || byte == b'\n' || byte == b'\r' {
            if byte == b'"' || byte == b'\\' {
                out.push(b'\\');
            }
            out.push(byte);
        }
    }
    out.push(b'"');
}

#[cfg(test)]
mod tests {
    use crate::value::{ByteString, Value, ValueMap};

    fn map(entries: Vec<(&str, Value)>) -> Value {
        Value::Map(
            entries.into_iter().map(|(k, v)| (ByteString::from(k), v)).collect::<ValueMap>(),
        )
    }

    #[test]
    fn scalars() {
        assert_eq!(Value::Null.to_json(), "null");
        assert_eq!(Value::Bool(true).to_json(), "true");
        assert_eq!(Value::Bool(false).to_json(), "false");
        assert_eq!(Value::Int32(-42).to_json(), "-42");
        assert_eq!(Value::Int64(1 << 40).to_json(), "1099511627776");
    }

    #[test]
    fn floats_always_carry_a_fractional_digit() {
        assert_eq!(Value::Float64(100.0).to_json(), "100.0");
        assert_eq!(Value::Float64(-0.5).to_json(), "-0.5");
        assert_eq!(Value::Float64(0.0).to_json(), "0.0");
        assert_eq!(Value::Float64(2.25).to_json(), "2.25");
    }

    #[test]
    fn string_escaping() {
        let s = |bytes: &[u8]| Value::String(ByteString::from_slice(bytes)).to_json();

        assert_eq!(s(b"plain"), "\"plain\"");
        assert_eq!(s(b"say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(s(b"back\\slash"), "\"back\\\\slash\"");
        // Tab, newline, carriage return pass through literally.
        assert_eq!(s(b"a\tb\nc\rd"), "\"a\tb\nc\rd\"");
        // Other control bytes are dropped.
        assert_eq!(s(b"a\x00b\x1Fc"), "\"abc\"");
    }

    #[test]
    fn containers_preserve_order() {
        let value = map(vec![
            ("hp", Value::Int32(100)),
            ("ok", Value::Array(vec![Value::Bool(true), Value::Bool(false)])),
            ("name", Value::String(ByteString::from("aya"))),
        ]);
        assert_eq!(
            value.to_json(),
            r#"{"hp":100,"ok":[true,false],"name":"aya"}"#
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(map(vec![]).to_json(), "{}");
        assert_eq!(Value::Array(vec![]).to_json(), "[]");
    }

    #[test]
    fn non_utf8_bytes_are_replaced_in_string_output() {
        let value = Value::String(ByteString::from_slice(&[0xFF, b'o', b'k']));
        assert_eq!(value.to_json(), "\"\u{FFFD}ok\"");

        let bytes = value.to_json_bytes();
        assert_eq!(bytes, vec![b'"', 0xFF, b'o', b'k', b'"']);
    }

    #[test]
    fn projection_is_total_on_deep_nesting() {
        let mut value = Value::Int32(1);
        for _ in 0..96 {
            value = Value::Array(vec![value]);
        }
        let json = value.to_json();
        assert!(json.starts_with("[[[["));
        assert!(json.ends_with("]]]]"));
        assert_eq!(json.len(), 96 * 2 + 1);
    }
}
