//! Validating CBOR decoder.
//!
//! Accepts any well-formed item the profile admits, including
//! indefinite-length items and tagged items produced by other encoders, and
//! normalises them: both string major types become strings, tags 0 and 1
//! become RFC 3339 strings, all other tags are transparent. Inputs that
//! cannot round-trip losslessly on the untyped pathway are rejected outright:
//! duplicate map keys, invalid UTF-8, integers outside int64, non-string map
//! keys, simple values other than false/true/null, and inputs exceeding the
//! depth and size limits of the decode mode.

use chrono::{DateTime, SecondsFormat};
use half::f16;

use crate::constants::{
    BREAK, INDEFINITE, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGATIVE, MAJOR_TAG, MAJOR_TEXT,
    MAJOR_UNSIGNED, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, TAG_TIME_EPOCH, TAG_TIME_TEXT,
};
use crate::error::CborError;
use crate::modes::DecodeMode;
use crate::value::CborValue;

pub struct CborDecoder {
    mode: DecodeMode,
}

impl CborDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self { mode }
    }

    /// Decodes the input as exactly one data item; trailing bytes are an
    /// error.
    pub fn decode(&self, input: &[u8]) -> Result<CborValue, CborError> {
        let (value, consumed) = self.decode_first(input)?;
        if consumed != input.len() {
            return Err(CborError::TrailingData);
        }
        Ok(value)
    }

    /// Decodes the first complete data item, returning it with the number of
    /// bytes consumed. A truncated item reports
    /// [`CborError::UnexpectedEof`], which is how the framer distinguishes
    /// "need more bytes" from malformed input.
    pub fn decode_first(&self, input: &[u8]) -> Result<(CborValue, usize), CborError> {
        let mut cursor = Cursor {
            data: input,
            x: 0,
            mode: self.mode,
        };
        let value = cursor.read_any(0)?;
        Ok((value, cursor.x))
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    x: usize,
    mode: DecodeMode,
}

impl<'a> Cursor<'a> {
    #[inline]
    fn check(&self, n: usize) -> Result<(), CborError> {
        if self.data.len().saturating_sub(self.x) < n {
            Err(CborError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.data.get(self.x).copied()
    }

    #[inline]
    fn u8(&mut self) -> Result<u8, CborError> {
        self.check(1)?;
        let v = self.data[self.x];
        self.x += 1;
        Ok(v)
    }

    #[inline]
    fn u16(&mut self) -> Result<u16, CborError> {
        self.check(2)?;
        let v = u16::from_be_bytes([self.data[self.x], self.data[self.x + 1]]);
        self.x += 2;
        Ok(v)
    }

    #[inline]
    fn u32(&mut self) -> Result<u32, CborError> {
        self.check(4)?;
        let v = u32::from_be_bytes([
            self.data[self.x],
            self.data[self.x + 1],
            self.data[self.x + 2],
            self.data[self.x + 3],
        ]);
        self.x += 4;
        Ok(v)
    }

    #[inline]
    fn u64(&mut self) -> Result<u64, CborError> {
        self.check(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.data[self.x..self.x + 8]);
        self.x += 8;
        Ok(u64::from_be_bytes(buf))
    }

    #[inline]
    fn bytes(&mut self, n: usize) -> Result<&'a [u8], CborError> {
        self.check(n)?;
        let slice = &self.data[self.x..self.x + n];
        self.x += n;
        Ok(slice)
    }

    /// Reads the argument encoded in the additional-information bits.
    fn read_arg(&mut self, info: u8) -> Result<u64, CborError> {
        match info {
            0..=23 => Ok(u64::from(info)),
            24 => self.u8().map(u64::from),
            25 => self.u16().map(u64::from),
            26 => self.u32().map(u64::from),
            27 => self.u64(),
            _ => Err(CborError::Malformed {
                reason: "reserved additional information",
            }),
        }
    }

    fn read_len(&mut self, info: u8) -> Result<usize, CborError> {
        let n = self.read_arg(info)?;
        usize::try_from(n).map_err(|_| CborError::UnexpectedEof)
    }

    fn check_elements(&self, n: usize) -> Result<(), CborError> {
        if n > self.mode.max_container_elements {
            Err(CborError::MaxElementsExceeded {
                max: self.mode.max_container_elements,
            })
        } else {
            Ok(())
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), CborError> {
        if depth >= self.mode.max_nesting_depth {
            Err(CborError::MaxDepthExceeded {
                max: self.mode.max_nesting_depth,
            })
        } else {
            Ok(())
        }
    }

    fn read_any(&mut self, depth: usize) -> Result<CborValue, CborError> {
        // Containers check their own depth; this bounds tag chains.
        if depth > self.mode.max_nesting_depth {
            return Err(CborError::MaxDepthExceeded {
                max: self.mode.max_nesting_depth,
            });
        }
        let ib = self.u8()?;
        let major = ib >> 5;
        let info = ib & 0x1f;
        match major {
            MAJOR_UNSIGNED => {
                let n = self.read_arg(info)?;
                i64::try_from(n)
                    .map(CborValue::Integer)
                    .map_err(|_| CborError::IntegerOutOfRange)
            }
            MAJOR_NEGATIVE => {
                let n = self.read_arg(info)?;
                if n > i64::MAX as u64 {
                    Err(CborError::IntegerOutOfRange)
                } else {
                    Ok(CborValue::Integer(-1 - n as i64))
                }
            }
            MAJOR_BYTES => self.read_string(info, MAJOR_BYTES).map(CborValue::Str),
            MAJOR_TEXT => self.read_string(info, MAJOR_TEXT).map(CborValue::Str),
            MAJOR_ARRAY => self.read_array(info, depth),
            MAJOR_MAP => self.read_map(info, depth),
            MAJOR_TAG => self.read_tagged(info, depth),
            _ => self.read_simple(info),
        }
    }

    /// Both string major types normalise to a string. Text strings are
    /// validated as RFC 8949 requires; byte strings must also form valid
    /// UTF-8 because the untyped value model has nowhere else to put them.
    fn read_string(&mut self, info: u8, major: u8) -> Result<String, CborError> {
        if info == INDEFINITE {
            let mut buf = Vec::new();
            loop {
                if self.peek() == Some(BREAK) {
                    self.x += 1;
                    break;
                }
                let ib = self.u8()?;
                if ib >> 5 != major || (ib & 0x1f) == INDEFINITE {
                    return Err(CborError::Malformed {
                        reason: "string chunk must be a definite-length string of the same type",
                    });
                }
                let len = self.read_len(ib & 0x1f)?;
                buf.extend_from_slice(self.bytes(len)?);
            }
            String::from_utf8(buf).map_err(|_| CborError::InvalidUtf8)
        } else {
            let len = self.read_len(info)?;
            let bytes = self.bytes(len)?;
            std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| CborError::InvalidUtf8)
        }
    }

    fn read_array(&mut self, info: u8, depth: usize) -> Result<CborValue, CborError> {
        self.check_depth(depth)?;
        let mut items = Vec::new();
        if info == INDEFINITE {
            loop {
                if self.peek() == Some(BREAK) {
                    self.x += 1;
                    break;
                }
                self.check_elements(items.len() + 1)?;
                items.push(self.read_any(depth + 1)?);
            }
        } else {
            let len = self.read_len(info)?;
            self.check_elements(len)?;
            items.reserve(len);
            for _ in 0..len {
                items.push(self.read_any(depth + 1)?);
            }
        }
        Ok(CborValue::Array(items))
    }

    fn read_map(&mut self, info: u8, depth: usize) -> Result<CborValue, CborError> {
        self.check_depth(depth)?;
        let mut entries: Vec<(String, CborValue)> = Vec::new();
        if info == INDEFINITE {
            loop {
                if self.peek() == Some(BREAK) {
                    self.x += 1;
                    break;
                }
                self.check_elements(entries.len() + 1)?;
                self.read_map_entry(&mut entries, depth)?;
            }
        } else {
            let len = self.read_len(info)?;
            self.check_elements(len)?;
            entries.reserve(len);
            for _ in 0..len {
                self.read_map_entry(&mut entries, depth)?;
            }
        }
        Ok(CborValue::Map(entries))
    }

    fn read_map_entry(
        &mut self,
        entries: &mut Vec<(String, CborValue)>,
        depth: usize,
    ) -> Result<(), CborError> {
        let key = match self.read_any(depth + 1)? {
            CborValue::Str(s) => s,
            _ => return Err(CborError::InvalidMapKey),
        };
        // Duplicates are well-formed but invalid, and never acceptable. The
        // check runs after string normalisation, so the same key under both
        // string major types is still a duplicate.
        if entries.iter().any(|(existing, _)| *existing == key) {
            return Err(CborError::DuplicateMapKey { key });
        }
        let value = self.read_any(depth + 1)?;
        entries.push((key, value));
        Ok(())
    }

    fn read_tagged(&mut self, info: u8, depth: usize) -> Result<CborValue, CborError> {
        let tag = self.read_arg(info)?;
        match tag {
            TAG_TIME_TEXT => match self.read_any(depth + 1)? {
                CborValue::Str(s) => Ok(CborValue::Str(s)),
                _ => Err(CborError::InvalidTime {
                    reason: "tag 0 content must be a string".to_owned(),
                }),
            },
            TAG_TIME_EPOCH => {
                let dt = match self.read_any(depth + 1)? {
                    CborValue::Integer(secs) => DateTime::from_timestamp(secs, 0),
                    CborValue::Float(epoch) => fractional_epoch(epoch)
                        .and_then(|(secs, nanos)| DateTime::from_timestamp(secs, nanos)),
                    _ => {
                        return Err(CborError::InvalidTime {
                            reason: "tag 1 content must be a number".to_owned(),
                        })
                    }
                };
                let dt = dt.ok_or_else(|| CborError::InvalidTime {
                    reason: "epoch seconds out of range".to_owned(),
                })?;
                Ok(CborValue::Str(
                    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                ))
            }
            // The self-describing tag and every unrecognised tag are
            // transparent.
            _ => self.read_any(depth + 1),
        }
    }

    fn read_simple(&mut self, info: u8) -> Result<CborValue, CborError> {
        match info {
            SIMPLE_FALSE => Ok(CborValue::Bool(false)),
            SIMPLE_TRUE => Ok(CborValue::Bool(true)),
            SIMPLE_NULL => Ok(CborValue::Null),
            // undefined (23) and the unassigned simple values.
            0..=19 | 23 => Err(CborError::UnsupportedSimpleValue { value: info }),
            24 => {
                let value = self.u8()?;
                Err(CborError::UnsupportedSimpleValue { value })
            }
            25 => {
                let bits = self.u16()?;
                Ok(CborValue::Float(f64::from(f16::from_bits(bits))))
            }
            26 => {
                let bits = self.u32()?;
                Ok(CborValue::Float(f64::from(f32::from_bits(bits))))
            }
            27 => {
                let bits = self.u64()?;
                Ok(CborValue::Float(f64::from_bits(bits)))
            }
            28..=30 => Err(CborError::Malformed {
                reason: "reserved additional information",
            }),
            _ => Err(CborError::Malformed {
                reason: "unexpected break code",
            }),
        }
    }
}

/// Splits fractional epoch seconds into whole seconds and nanoseconds.
fn fractional_epoch(epoch: f64) -> Option<(i64, u32)> {
    if !epoch.is_finite() || epoch < i64::MIN as f64 || epoch > i64::MAX as f64 {
        return None;
    }
    let secs = epoch.floor();
    let nanos = ((epoch - secs) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        (secs as i64).checked_add(1).map(|s| (s, 0))
    } else {
        Some((secs as i64, nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::CborDecoder;
    use crate::error::CborError;
    use crate::modes;
    use crate::value::CborValue;

    fn decode(h: &str) -> Result<CborValue, CborError> {
        CborDecoder::new(modes::LAX).decode(&hex::decode(h).unwrap())
    }

    fn str_val(s: &str) -> CborValue {
        CborValue::Str(s.to_owned())
    }

    #[test]
    fn integers_decode_to_int64() {
        assert_eq!(decode("00").unwrap(), CborValue::Integer(0));
        assert_eq!(decode("1819").unwrap(), CborValue::Integer(25));
        assert_eq!(
            decode("1b7fffffffffffffff").unwrap(),
            CborValue::Integer(i64::MAX)
        );
        assert_eq!(decode("3863").unwrap(), CborValue::Integer(-100));
        assert_eq!(
            decode("3b7fffffffffffffff").unwrap(),
            CborValue::Integer(i64::MIN)
        );
    }

    #[test]
    fn integers_outside_int64_are_rejected() {
        // 18446744073709551615 and -18446744073709551616.
        for h in ["1bffffffffffffffff", "1b8000000000000000", "3bffffffffffffffff", "3b8000000000000000"] {
            assert!(
                matches!(decode(h), Err(CborError::IntegerOutOfRange)),
                "for {h}"
            );
        }
    }

    #[test]
    fn both_string_major_types_normalise_to_strings() {
        assert_eq!(decode("60").unwrap(), str_val(""));
        assert_eq!(decode("6449455446").unwrap(), str_val("IETF"));
        assert_eq!(decode("40").unwrap(), str_val(""));
        assert_eq!(decode("4449455446").unwrap(), str_val("IETF"));
        assert_eq!(decode("62c3bc").unwrap(), str_val("ü"));
        assert_eq!(decode("44f0908591").unwrap(), str_val("𐅑"));
    }

    #[test]
    fn invalid_utf8_is_rejected_in_either_major_type() {
        // Strings beginning with continuation byte 0x80.
        assert!(matches!(decode("6180"), Err(CborError::InvalidUtf8)));
        assert!(matches!(decode("4180"), Err(CborError::InvalidUtf8)));
    }

    #[test]
    fn indefinite_length_items_are_accepted() {
        // (_ "strea", "ming")
        assert_eq!(
            decode("7f657374726561646d696e67ff").unwrap(),
            str_val("streaming")
        );
        // (_ h'0102', h'030405')
        assert_eq!(
            decode("5f42010243030405ff").unwrap(),
            str_val("\u{1}\u{2}\u{3}\u{4}\u{5}")
        );
        // [_ 1, [2, 3], [_ 4, 5]]
        assert_eq!(
            decode("9f018202039f0405ffff").unwrap(),
            CborValue::Array(vec![
                CborValue::Integer(1),
                CborValue::Array(vec![CborValue::Integer(2), CborValue::Integer(3)]),
                CborValue::Array(vec![CborValue::Integer(4), CborValue::Integer(5)]),
            ])
        );
        // {_ "a": 1, "b": [_ 2, 3]}
        assert_eq!(
            decode("bf61610161629f0203ffff").unwrap(),
            CborValue::Map(vec![
                ("a".to_owned(), CborValue::Integer(1)),
                (
                    "b".to_owned(),
                    CborValue::Array(vec![CborValue::Integer(2), CborValue::Integer(3)])
                ),
            ])
        );
    }

    #[test]
    fn duplicate_map_keys_are_rejected() {
        assert!(matches!(
            decode("a2616101616102"),
            Err(CborError::DuplicateMapKey { key }) if key == "a"
        ));
        // Same key under byte-string and text-string major types.
        assert!(matches!(
            decode("a2416101616102"),
            Err(CborError::DuplicateMapKey { key }) if key == "a"
        ));
    }

    #[test]
    fn non_string_map_keys_are_rejected() {
        // {1: 2, 3: 4}
        assert!(matches!(decode("a201020304"), Err(CborError::InvalidMapKey)));
    }

    #[test]
    fn simple_values_other_than_false_true_null_are_rejected() {
        assert_eq!(decode("f4").unwrap(), CborValue::Bool(false));
        assert_eq!(decode("f5").unwrap(), CborValue::Bool(true));
        assert_eq!(decode("f6").unwrap(), CborValue::Null);
        for (h, value) in [("f7", 23u8), ("f0", 16), ("f820", 32), ("f8ff", 255)] {
            assert!(
                matches!(decode(h), Err(CborError::UnsupportedSimpleValue { value: v }) if v == value),
                "for {h}"
            );
        }
    }

    #[test]
    fn floats_widen_to_f64() {
        assert_eq!(decode("f93c00").unwrap(), CborValue::Float(1.0));
        assert_eq!(decode("f9c400").unwrap(), CborValue::Float(-4.0));
        assert_eq!(decode("fa47c35000").unwrap(), CborValue::Float(100000.0));
        assert_eq!(
            decode("fb3ff199999999999a").unwrap(),
            CborValue::Float(1.1)
        );
        assert_eq!(decode("f97c00").unwrap(), CborValue::Float(f64::INFINITY));
        match decode("f97e00").unwrap() {
            CborValue::Float(f) => assert!(f.is_nan()),
            other => panic!("expected NaN, got {other:?}"),
        }
    }

    #[test]
    fn time_tags_decode_to_rfc3339_strings() {
        assert_eq!(
            decode("c074323031332d30332d32315432303a30343a30305a").unwrap(),
            str_val("2013-03-21T20:04:00Z")
        );
        assert_eq!(
            decode("c11a514b67b0").unwrap(),
            str_val("2013-03-21T20:04:00Z")
        );
        assert_eq!(
            decode("c1fb41d452d9ec200000").unwrap(),
            str_val("2013-03-21T20:04:00.500Z")
        );
        assert!(matches!(
            decode("c001"),
            Err(CborError::InvalidTime { .. })
        ));
    }

    #[test]
    fn unrecognised_tags_are_transparent() {
        // 23(h'01020304') — the tag is skipped, the content is normalised.
        assert_eq!(
            decode("d74401020304").unwrap(),
            str_val("\u{1}\u{2}\u{3}\u{4}")
        );
        // An inner self-describing tag is skipped like any other.
        assert_eq!(decode("d9d9f700").unwrap(), CborValue::Integer(0));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let ok = "81".repeat(63) + "80";
        assert!(decode(&ok).is_ok());
        let too_deep = "81".repeat(64) + "80";
        assert!(matches!(
            decode(&too_deep),
            Err(CborError::MaxDepthExceeded { max: 64 })
        ));
    }

    #[test]
    fn element_limit_is_enforced() {
        let ok = format!("990400{}", "00".repeat(1024));
        assert!(decode(&ok).is_ok());
        let too_many = format!("990401{}", "00".repeat(1025));
        assert!(matches!(
            decode(&too_many),
            Err(CborError::MaxElementsExceeded { max: 1024 })
        ));
    }

    #[test]
    fn trailing_and_truncated_input_are_distinct_errors() {
        assert!(matches!(decode("0001"), Err(CborError::TrailingData)));
        assert!(matches!(decode("1903"), Err(CborError::UnexpectedEof)));
        assert!(matches!(decode(""), Err(CborError::UnexpectedEof)));
        assert!(matches!(
            decode("ff"),
            Err(CborError::Malformed { .. })
        ));
    }
}
