use serde::{Deserialize, Serialize};

use crate::GroupVersionKind;

/// The `apiVersion`/`kind` field pair carried by every typed wire object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMeta {
    #[serde(
        default,
        rename = "apiVersion",
        skip_serializing_if = "String::is_empty"
    )]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl TypeMeta {
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::from_api_version(&self.api_version, &self.kind)
    }

    pub fn set_gvk(&mut self, gvk: &GroupVersionKind) {
        self.api_version = gvk.api_version();
        self.kind = gvk.kind.clone();
    }
}

impl From<&GroupVersionKind> for TypeMeta {
    fn from(gvk: &GroupVersionKind) -> Self {
        Self {
            api_version: gvk.api_version(),
            kind: gvk.kind.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TypeMeta;
    use crate::GroupVersionKind;

    #[test]
    fn empty_fields_are_omitted() {
        let empty = serde_json::to_value(TypeMeta::default()).unwrap();
        assert_eq!(empty, serde_json::json!({}));

        let mut tm = TypeMeta::default();
        tm.set_gvk(&GroupVersionKind::new("a", "b", "c"));
        assert_eq!(
            serde_json::to_value(&tm).unwrap(),
            serde_json::json!({"apiVersion": "a/b", "kind": "c"})
        );
    }
}
