//! Canonical CBOR encoder.
//!
//! Output is always a single definite-length data item: maps sorted by the
//! bytewise order of their encoded keys, floats packed into the smallest
//! width that reconstitutes the exact value, NaN collapsed to `0xf97e00`,
//! and strings emitted as the byte-string major type.

use half::f16;
use serde_json::Value;

use crate::constants::{
    CANONICAL_NAN, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGATIVE, MAJOR_UNSIGNED,
};
use crate::value::CborValue;

#[derive(Debug, Default, Clone, Copy)]
pub struct CborEncoder;

impl CborEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes an untyped JSON value as a single canonical data item.
    ///
    /// Total: every number a `serde_json::Number` can hold has an encoding
    /// (full u64 range included; only the decoder narrows to int64).
    pub fn encode(&self, value: &Value) -> Vec<u8> {
        let mut out = Vec::new();
        write_json(&mut out, value);
        out
    }

    /// Encodes a decoded wire value, NaN and infinities included.
    pub fn encode_value(&self, value: &CborValue) -> Vec<u8> {
        let mut out = Vec::new();
        write_value(&mut out, value);
        out
    }
}

pub(crate) fn write_uint_major(out: &mut Vec<u8>, major: u8, n: u64) {
    let major_bits = major << 5;
    if n <= 23 {
        out.push(major_bits | (n as u8));
    } else if n <= 0xff {
        out.push(major_bits | 24);
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(major_bits | 25);
        out.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        out.push(major_bits | 26);
        out.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        out.push(major_bits | 27);
        out.extend_from_slice(&n.to_be_bytes());
    }
}

pub(crate) fn write_signed(out: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        write_uint_major(out, MAJOR_UNSIGNED, n as u64);
    } else {
        let encoded = (-1i128 - n as i128) as u64;
        write_uint_major(out, MAJOR_NEGATIVE, encoded);
    }
}

/// Strings are written under the byte-string major type: text strings must
/// be valid UTF-8, byte strings carry no such obligation and transcode
/// safely through systems that could inject invalid sequences.
pub(crate) fn write_str(out: &mut Vec<u8>, value: &str) {
    let utf8 = value.as_bytes();
    write_uint_major(out, MAJOR_BYTES, utf8.len() as u64);
    out.extend_from_slice(utf8);
}

/// Packs a float into the smallest of half, single, or double precision
/// that reconstitutes the exact value. Every NaN becomes the canonical
/// half-precision quiet NaN.
pub(crate) fn write_f64(out: &mut Vec<u8>, value: f64) {
    if value.is_nan() {
        out.extend_from_slice(&CANONICAL_NAN);
        return;
    }
    let half = f16::from_f64(value);
    if f64::from(half) == value {
        out.push(0xf9);
        out.extend_from_slice(&half.to_be_bytes());
        return;
    }
    let single = value as f32;
    if f64::from(single) == value {
        out.push(0xfa);
        out.extend_from_slice(&single.to_be_bytes());
        return;
    }
    out.push(0xfb);
    out.extend_from_slice(&value.to_be_bytes());
}

/// Writes a map header plus entries sorted by the bytewise order of their
/// encoded keys. Keys are byte strings, so this is the length-first
/// core-deterministic ordering.
fn write_map_entries(out: &mut Vec<u8>, entries: Vec<(Vec<u8>, Vec<u8>)>) {
    let mut entries = entries;
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    write_uint_major(out, MAJOR_MAP, entries.len() as u64);
    for (key, value) in entries {
        out.extend_from_slice(&key);
        out.extend_from_slice(&value);
    }
}

fn write_json(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => out.push(0xf6),
        Value::Bool(b) => out.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                write_signed(out, i);
            } else if let Some(u) = n.as_u64() {
                write_uint_major(out, MAJOR_UNSIGNED, u);
            } else {
                // serde_json numbers are always finite.
                write_f64(out, n.as_f64().unwrap_or_default());
            }
        }
        Value::String(s) => write_str(out, s),
        Value::Array(items) => {
            write_uint_major(out, MAJOR_ARRAY, items.len() as u64);
            for item in items {
                write_json(out, item);
            }
        }
        Value::Object(map) => {
            let entries = map
                .iter()
                .map(|(k, v)| {
                    let mut key = Vec::new();
                    write_str(&mut key, k);
                    let mut val = Vec::new();
                    write_json(&mut val, v);
                    (key, val)
                })
                .collect();
            write_map_entries(out, entries);
        }
    }
}

fn write_value(out: &mut Vec<u8>, value: &CborValue) {
    match value {
        CborValue::Null => out.push(0xf6),
        CborValue::Bool(b) => out.push(if *b { 0xf5 } else { 0xf4 }),
        CborValue::Integer(i) => write_signed(out, *i),
        CborValue::Float(f) => write_f64(out, *f),
        CborValue::Str(s) => write_str(out, s),
        CborValue::Array(items) => {
            write_uint_major(out, MAJOR_ARRAY, items.len() as u64);
            for item in items {
                write_value(out, item);
            }
        }
        CborValue::Map(map) => {
            let entries = map
                .iter()
                .map(|(k, v)| {
                    let mut key = Vec::new();
                    write_str(&mut key, k);
                    let mut val = Vec::new();
                    write_value(&mut val, v);
                    (key, val)
                })
                .collect();
            write_map_entries(out, entries);
        }
    }
}
