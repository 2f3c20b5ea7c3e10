use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the schema of a wire object within the type registry.
///
/// Empty strings mean "unset". Equality is field-wise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Splits a serialized `apiVersion` value into group and version. A value
    /// without a `/` is a version in the legacy (empty) group.
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version, kind),
            None => Self::new("", api_version, kind),
        }
    }

    /// The serialized `apiVersion` form: `group/version`, or just `version`
    /// when the group is empty.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.version.is_empty() && self.kind.is_empty()
    }

    /// Fills unset fields from `default`.
    ///
    /// An empty kind always takes the default kind. Group and version are
    /// filled together when both are empty; a lone empty version is filled
    /// only when the groups already agree, so a caller's default for one
    /// group never leaks a version into another.
    pub fn with_defaults(&self, default: &GroupVersionKind) -> GroupVersionKind {
        let mut actual = self.clone();
        if actual.kind.is_empty() {
            actual.kind = default.kind.clone();
        }
        if actual.version.is_empty() && actual.group.is_empty() {
            actual.group = default.group.clone();
            actual.version = default.version.clone();
        }
        if actual.version.is_empty() && actual.group == default.group {
            actual.version = default.version.clone();
        }
        actual
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}
