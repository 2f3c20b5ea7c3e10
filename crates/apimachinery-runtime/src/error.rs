use std::fmt;

use thiserror::Error;

/// Fatal errors surfaced by the runtime machinery and its serializers.
#[derive(Debug, Error)]
pub enum Error {
    /// The wire item carries no kind and no default resolves it. `data` is a
    /// diagnostic rendering of the offending bytes.
    #[error("object kind is missing in {data}")]
    MissingKind { data: String },

    /// Symmetric to [`Error::MissingKind`] for the version field.
    #[error("object version is missing in {data}")]
    MissingVersion { data: String },

    /// A type or kind was presented that the registry does not know.
    #[error("{name} is not registered")]
    NotRegistered { name: String },

    /// An object's content is structurally unusable for the requested
    /// operation (for example a non-map value decoded into an unstructured
    /// object).
    #[error("invalid object: {reason}")]
    InvalidObject { reason: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Non-fatal report of unknown fields seen during a strict decode.
///
/// The decoded payload is still populated when this is returned; callers may
/// consume the object and surface the warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictDecodingError {
    unknown_fields: Vec<String>,
}

impl StrictDecodingError {
    pub fn new(unknown_fields: Vec<String>) -> Self {
        Self { unknown_fields }
    }

    /// Dotted paths of the map keys that had no corresponding field in the
    /// destination structure.
    pub fn unknown_fields(&self) -> &[String] {
        &self.unknown_fields
    }
}

impl fmt::Display for StrictDecodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strict decoding error: ")?;
        for (i, field) in self.unknown_fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "unknown field {field:?}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StrictDecodingError {}
