//! Marshal helpers for values that are not runtime objects.
//!
//! Custom codecs (the schema union types among them) encode nested values
//! with these; the output is a bare canonical data item without the
//! self-describing prefix.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::decoder::CborDecoder;
use crate::encoder::CborEncoder;
use crate::error::CborError;
use crate::modes;

/// Encodes any serializable value as a single canonical data item.
pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>, CborError> {
    let untyped = serde_json::to_value(value)?;
    Ok(CborEncoder::new().encode(&untyped))
}

/// Decodes a single data item into a concrete type. A self-describing tag
/// prefix is accepted and stripped like any other tag.
pub fn from_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, CborError> {
    let untyped = CborDecoder::new(modes::LAX).decode(data)?.into_json()?;
    Ok(serde_json::from_value(untyped)?)
}

#[cfg(test)]
mod tests {
    use super::{from_slice, to_vec};

    #[test]
    fn values_round_trip_without_the_prefix() {
        let bytes = to_vec(&serde_json::json!({"x": 1})).unwrap();
        assert_eq!(hex::encode(&bytes), "a1417801");
        let back: serde_json::Value = from_slice(&bytes).unwrap();
        assert_eq!(back, serde_json::json!({"x": 1}));
    }

    #[test]
    fn typed_values_round_trip() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Point {
            x: i64,
            y: i64,
        }
        let p = Point { x: 1, y: -2 };
        let bytes = to_vec(&p).unwrap();
        assert_eq!(from_slice::<Point>(&bytes).unwrap(), p);
    }
}
