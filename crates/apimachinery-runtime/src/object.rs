use std::any::Any;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, GroupVersionKind, Unstructured};

/// Capability surface a wire serializer needs from an object.
///
/// Serializers never type-switch on concrete objects; they probe the three
/// optional capabilities in order (unstructured content, custom CBOR codec,
/// value conversion) and fall through to the next one.
pub trait RuntimeObject: Any + Send + std::fmt::Debug {
    /// The object's current group/version/kind, fields left empty when the
    /// object does not carry them.
    fn gvk(&self) -> GroupVersionKind;

    fn set_gvk(&mut self, gvk: &GroupVersionKind);

    /// The concrete type's name, used in not-registered errors.
    fn type_name(&self) -> &'static str;

    /// Present when the object is a dynamically keyed mapping rather than a
    /// registered structure.
    fn as_unstructured(&self) -> Option<&Unstructured> {
        None
    }

    fn as_unstructured_mut(&mut self) -> Option<&mut Unstructured> {
        None
    }

    /// Present when the object produces its own CBOR serialization. The
    /// returned bytes must form a single canonical data item without the
    /// self-describing prefix.
    fn marshal_cbor(&self) -> Option<Result<Vec<u8>, Error>> {
        None
    }

    /// Serializes the object to an untyped value.
    fn to_value(&self) -> Result<Value, Error>;

    /// Replaces the object's contents from a decoded untyped value.
    ///
    /// When `strict` is set, returns the paths of map keys that had no
    /// corresponding field in the destination; the object is populated either
    /// way.
    fn set_from_value(&mut self, value: Value, strict: bool) -> Result<Vec<String>, Error>;

    fn as_any(&self) -> &dyn Any;
}

/// Serializes a typed object to an untyped value. Typed [`RuntimeObject`]
/// impls delegate `to_value` here.
pub fn typed_to_value<T: Serialize>(obj: &T) -> Result<Value, Error> {
    Ok(serde_json::to_value(obj)?)
}

/// Populates a typed object from an untyped value, collecting unknown-field
/// paths in the same pass when `strict` is set. Typed [`RuntimeObject`] impls
/// delegate `set_from_value` here.
pub fn typed_from_value<T: DeserializeOwned>(
    value: Value,
    strict: bool,
) -> Result<(T, Vec<String>), Error> {
    if strict {
        let mut unknown = Vec::new();
        let obj = serde_ignored::deserialize(value, |path| unknown.push(path.to_string()))?;
        Ok((obj, unknown))
    } else {
        Ok((serde_json::from_value(value)?, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::typed_from_value;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Widget {
        #[serde(default)]
        size: i64,
    }

    #[test]
    fn strict_reports_unknown_fields_and_still_populates() {
        let value = json!({"size": 3, "colour": "red", "nested": {"x": 1}});
        let (widget, unknown) = typed_from_value::<Widget>(value, true).unwrap();
        assert_eq!(widget, Widget { size: 3 });
        assert_eq!(unknown, vec!["colour".to_owned(), "nested".to_owned()]);
    }

    #[test]
    fn lax_ignores_unknown_fields() {
        let value = json!({"size": 3, "colour": "red"});
        let (widget, unknown) = typed_from_value::<Widget>(value, false).unwrap();
        assert_eq!(widget, Widget { size: 3 });
        assert!(unknown.is_empty());
    }
}
