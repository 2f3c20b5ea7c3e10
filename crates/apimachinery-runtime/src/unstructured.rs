use std::any::Any;

use serde_json::{Map, Value};

use crate::{Error, GroupVersionKind, RuntimeObject};

/// An object whose content is a dynamically keyed mapping rather than a
/// registered structure.
///
/// The group/version/kind is not stored separately; it is derived from the
/// `apiVersion` and `kind` entries of the mapping on every read, so the
/// mapping is always the single source of truth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unstructured {
    content: Map<String, Value>,
}

impl Unstructured {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_content(content: Map<String, Value>) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.content
    }

    pub fn into_content(self) -> Map<String, Value> {
        self.content
    }

    fn str_entry(&self, key: &str) -> &str {
        match self.content.get(key) {
            Some(Value::String(s)) => s,
            _ => "",
        }
    }
}

impl RuntimeObject for Unstructured {
    fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::from_api_version(self.str_entry("apiVersion"), self.str_entry("kind"))
    }

    fn set_gvk(&mut self, gvk: &GroupVersionKind) {
        self.content
            .insert("apiVersion".to_owned(), Value::String(gvk.api_version()));
        self.content
            .insert("kind".to_owned(), Value::String(gvk.kind.clone()));
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_unstructured(&self) -> Option<&Unstructured> {
        Some(self)
    }

    fn as_unstructured_mut(&mut self) -> Option<&mut Unstructured> {
        Some(self)
    }

    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Object(self.content.clone()))
    }

    fn set_from_value(&mut self, value: Value, _strict: bool) -> Result<Vec<String>, Error> {
        // Every key is legal in a dynamic mapping, so strictness never
        // produces unknown-field reports here.
        match value {
            Value::Object(content) => {
                self.content = content;
                Ok(Vec::new())
            }
            other => Err(Error::InvalidObject {
                reason: format!("expected a map, got {other}"),
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Unstructured;
    use crate::{GroupVersionKind, RuntimeObject};

    #[test]
    fn gvk_tracks_the_mapping() {
        let mut obj = Unstructured::new();
        assert!(obj.gvk().is_empty());

        obj.set_gvk(&GroupVersionKind::new("g", "v", "K"));
        assert_eq!(obj.content().get("apiVersion"), Some(&json!("g/v")));
        assert_eq!(obj.content().get("kind"), Some(&json!("K")));
        assert_eq!(obj.gvk(), GroupVersionKind::new("g", "v", "K"));

        obj.content_mut().remove("kind");
        assert_eq!(obj.gvk().kind, "");
    }

    #[test]
    fn set_from_value_requires_a_map() {
        let mut obj = Unstructured::new();
        assert!(obj.set_from_value(json!([1, 2]), false).is_err());
        obj.set_from_value(json!({"a": 1}), true).unwrap();
        assert_eq!(obj.content().get("a"), Some(&json!(1)));
    }
}
