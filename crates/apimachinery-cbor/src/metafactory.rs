use apimachinery_runtime::{GroupVersionKind, TypeMeta};

use crate::decoder::CborDecoder;
use crate::error::CborError;
use crate::modes;
use crate::value::CborValue;

/// Extracts the logical type of a wire item before the full decode.
pub trait MetaFactory: Send + Sync {
    /// Returns the group/version/kind of the wire-format object.
    fn interpret(&self, data: &[u8]) -> Result<GroupVersionKind, CborError>;
}

/// Reads the `apiVersion` and `kind` entries of the top-level map, ignoring
/// every other field.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMetaFactory;

impl MetaFactory for DefaultMetaFactory {
    fn interpret(&self, data: &[u8]) -> Result<GroupVersionKind, CborError> {
        let value = CborDecoder::new(modes::LAX).decode(data).map_err(|e| {
            CborError::GvkInterpret {
                reason: e.to_string(),
            }
        })?;
        let CborValue::Map(entries) = value else {
            return Err(CborError::GvkInterpret {
                reason: "top-level value is not a map".to_owned(),
            });
        };
        // Only the two naming entries are read; every other field keeps
        // whatever shape it has, conversions included.
        let mut type_meta = TypeMeta::default();
        for (key, value) in entries {
            match (key.as_str(), value) {
                ("apiVersion", CborValue::Str(s)) => type_meta.api_version = s,
                ("kind", CborValue::Str(s)) => type_meta.kind = s,
                _ => {}
            }
        }
        Ok(type_meta.gvk())
    }
}
