use serde_json::{Map, Number, Value};

use crate::error::CborError;

/// A decoded CBOR data item, normalised into the profile this serializer
/// admits.
///
/// Exists as a separate tree from `serde_json::Value` so that NaN and the
/// infinities survive decode intact; JSON numbers cannot carry them. The
/// conversion to JSON is the lossy boundary and fails loudly on such floats.
/// Map entries preserve wire order; duplicates are rejected during decode,
/// never here.
#[derive(Debug, Clone, PartialEq)]
pub enum CborValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    Array(Vec<CborValue>),
    Map(Vec<(String, CborValue)>),
}

impl CborValue {
    /// Converts into an untyped JSON value.
    pub fn into_json(self) -> Result<Value, CborError> {
        Ok(match self {
            CborValue::Null => Value::Null,
            CborValue::Bool(b) => Value::Bool(b),
            CborValue::Integer(i) => Value::Number(i.into()),
            CborValue::Float(f) => Number::from_f64(f)
                .map(Value::Number)
                .ok_or(CborError::NonFiniteFloat(f))?,
            CborValue::Str(s) => Value::String(s),
            CborValue::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(item.into_json()?);
                }
                Value::Array(out)
            }
            CborValue::Map(entries) => {
                let mut out = Map::new();
                for (key, value) in entries {
                    out.insert(key, value.into_json()?);
                }
                Value::Object(out)
            }
        })
    }
}
