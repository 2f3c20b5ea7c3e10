use apimachinery_cbor::CborError;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

const JSON_NULL: &[u8] = b"null";
const CBOR_NULL: &[u8] = &[0xf6];

/// An opaque pre-encoded JSON payload.
///
/// The bytes are never interpreted except to transcode into or out of CBOR
/// by round-tripping through an untyped value. Empty bytes are the null
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJson {
    pub raw: Vec<u8>,
}

impl RawJson {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The stored bytes as-is, or the `null` literal when empty.
    pub fn to_json(&self) -> Vec<u8> {
        if self.raw.is_empty() {
            JSON_NULL.to_vec()
        } else {
            self.raw.clone()
        }
    }

    /// Stores the bytes verbatim; the `null` literal stores the empty
    /// payload.
    pub fn from_json(data: &[u8]) -> Self {
        if data.is_empty() || data == JSON_NULL {
            Self::default()
        } else {
            Self::new(data)
        }
    }

    /// Transcodes the stored JSON into a canonical CBOR data item.
    pub fn to_cbor(&self) -> Result<Vec<u8>, CborError> {
        if self.raw.is_empty() {
            return Ok(CBOR_NULL.to_vec());
        }
        let value: Value = serde_json::from_slice(&self.raw)?;
        apimachinery_cbor::to_vec(&value)
    }

    /// Transcodes a CBOR data item into stored JSON bytes.
    pub fn from_cbor(data: &[u8]) -> Result<Self, CborError> {
        if data == CBOR_NULL {
            return Ok(Self::default());
        }
        let value: Value = apimachinery_cbor::from_slice(data)?;
        Ok(Self {
            raw: serde_json::to_vec(&value)?,
        })
    }
}

impl Serialize for RawJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.raw.is_empty() {
            return serializer.serialize_unit();
        }
        let value: Value = serde_json::from_slice(&self.raw).map_err(S::Error::custom)?;
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawJson {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Self {
            raw: serde_json::to_vec(&value).map_err(D::Error::custom)?,
        })
    }
}
