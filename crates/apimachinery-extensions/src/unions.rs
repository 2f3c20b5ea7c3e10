//! The polymorphic schema unions.
//!
//! Each union is a tagged variant type that serializes as whichever case is
//! inhabited, with no wrapper object. The serde impls carry the dispatch
//! rules for both wire formats: the JSON text and the CBOR item present the
//! same shapes (map, boolean, array, null), so a single visitor serves both.

use apimachinery_cbor::CborError;
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::JsonSchema;

/// Either a nested schema or a bare boolean "allows" flag.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOrBool {
    Schema(Box<JsonSchema>),
    Allows(bool),
}

impl Default for SchemaOrBool {
    fn default() -> Self {
        SchemaOrBool::Allows(true)
    }
}

impl SchemaOrBool {
    /// Whether the union permits; holding a schema always permits.
    pub fn allows(&self) -> bool {
        match self {
            SchemaOrBool::Schema(_) => true,
            SchemaOrBool::Allows(b) => *b,
        }
    }

    pub fn schema(&self) -> Option<&JsonSchema> {
        match self {
            SchemaOrBool::Schema(s) => Some(s),
            SchemaOrBool::Allows(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        if data.is_empty() {
            return Ok(SchemaOrBool::Allows(false));
        }
        serde_json::from_slice(data)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, CborError> {
        apimachinery_cbor::to_vec(self)
    }

    pub fn from_cbor(data: &[u8]) -> Result<Self, CborError> {
        apimachinery_cbor::from_slice(data)
    }
}

impl Serialize for SchemaOrBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaOrBool::Schema(schema) => schema.serialize(serializer),
            SchemaOrBool::Allows(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for SchemaOrBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaOrBoolVisitor;

        impl<'de> Visitor<'de> for SchemaOrBoolVisitor {
            type Value = SchemaOrBool;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("boolean or JSON schema")
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(SchemaOrBool::Allows(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                let schema = JsonSchema::deserialize(MapAccessDeserializer::new(map))?;
                Ok(SchemaOrBool::Schema(Box::new(schema)))
            }
        }

        deserializer.deserialize_any(SchemaOrBoolVisitor)
    }
}

/// Either a nested schema or an ordered list of property names. Null when
/// neither is set.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOrStringArray {
    Schema(Box<JsonSchema>),
    Properties(Vec<String>),
}

impl Default for SchemaOrStringArray {
    fn default() -> Self {
        SchemaOrStringArray::Properties(Vec::new())
    }
}

impl SchemaOrStringArray {
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, CborError> {
        apimachinery_cbor::to_vec(self)
    }

    pub fn from_cbor(data: &[u8]) -> Result<Self, CborError> {
        apimachinery_cbor::from_slice(data)
    }
}

impl Serialize for SchemaOrStringArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaOrStringArray::Properties(p) if !p.is_empty() => p.serialize(serializer),
            SchemaOrStringArray::Schema(schema) => schema.serialize(serializer),
            SchemaOrStringArray::Properties(_) => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for SchemaOrStringArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaOrStringArrayVisitor;

        impl<'de> Visitor<'de> for SchemaOrStringArrayVisitor {
            type Value = SchemaOrStringArray;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("JSON schema, array of strings, or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                let schema = JsonSchema::deserialize(MapAccessDeserializer::new(map))?;
                Ok(SchemaOrStringArray::Schema(Box::new(schema)))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
                let properties = Vec::<String>::deserialize(SeqAccessDeserializer::new(seq))?;
                Ok(SchemaOrStringArray::Properties(properties))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(SchemaOrStringArray::default())
            }
        }

        deserializer.deserialize_any(SchemaOrStringArrayVisitor)
    }
}

/// Either a single schema or an ordered list of schemas.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOrArray {
    Schema(Option<Box<JsonSchema>>),
    Schemas(Vec<JsonSchema>),
}

impl Default for SchemaOrArray {
    fn default() -> Self {
        SchemaOrArray::Schema(None)
    }
}

impl SchemaOrArray {
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, CborError> {
        apimachinery_cbor::to_vec(self)
    }

    pub fn from_cbor(data: &[u8]) -> Result<Self, CborError> {
        apimachinery_cbor::from_slice(data)
    }
}

impl Serialize for SchemaOrArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // A non-empty sequence wins; an empty one falls back to the
            // (absent) single schema, which is null.
            SchemaOrArray::Schemas(s) if !s.is_empty() => s.serialize(serializer),
            SchemaOrArray::Schema(Some(schema)) => schema.serialize(serializer),
            _ => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for SchemaOrArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaOrArrayVisitor;

        impl<'de> Visitor<'de> for SchemaOrArrayVisitor {
            type Value = SchemaOrArray;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("JSON schema, array of schemas, or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                let schema = JsonSchema::deserialize(MapAccessDeserializer::new(map))?;
                Ok(SchemaOrArray::Schema(Some(Box::new(schema))))
            }

            // An empty array stays the sequence case.
            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
                let schemas = Vec::<JsonSchema>::deserialize(SeqAccessDeserializer::new(seq))?;
                Ok(SchemaOrArray::Schemas(schemas))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(SchemaOrArray::Schema(None))
            }
        }

        deserializer.deserialize_any(SchemaOrArrayVisitor)
    }
}
