//! The CBOR runtime-object serializer.

use std::io::Write;
use std::sync::Arc;

use apimachinery_runtime::{
    Error as RuntimeError, GroupVersionKind, ObjectCreator, ObjectTyper, RuntimeObject,
    StrictDecodingError,
};
use log::debug;
use serde_json::Value;

use crate::constants::SELF_DESCRIBED_PREFIX;
use crate::decoder::CborDecoder;
use crate::diagnostic::diagnostic;
use crate::encoder::CborEncoder;
use crate::error::CborError;
use crate::metafactory::{DefaultMetaFactory, MetaFactory};
use crate::modes;

/// Identifier under which this codec appears in caches keyed on codec
/// identity.
pub const IDENTIFIER: &str = "cbor";

/// Media type on the HTTP surface.
pub const MEDIA_TYPE: &str = "application/cbor";

/// CBOR is a binary encoding.
pub const ENCODES_AS_TEXT: bool = false;

/// Encodes and decodes runtime objects as self-described canonical CBOR.
///
/// Holds no per-call state; a single instance is safe for concurrent use as
/// long as its typer and creator are.
pub struct CborSerializer {
    meta_factory: Box<dyn MetaFactory>,
    typer: Arc<dyn ObjectTyper>,
    creator: Arc<dyn ObjectCreator>,
    strict: bool,
}

impl CborSerializer {
    pub fn new(typer: Arc<dyn ObjectTyper>, creator: Arc<dyn ObjectCreator>) -> Self {
        Self::with_meta_factory(Box::new(DefaultMetaFactory), typer, creator, false)
    }

    /// A serializer whose decodes report unknown fields alongside the
    /// decoded payload.
    pub fn strict(typer: Arc<dyn ObjectTyper>, creator: Arc<dyn ObjectCreator>) -> Self {
        Self::with_meta_factory(Box::new(DefaultMetaFactory), typer, creator, true)
    }

    pub fn with_meta_factory(
        meta_factory: Box<dyn MetaFactory>,
        typer: Arc<dyn ObjectTyper>,
        creator: Arc<dyn ObjectCreator>,
        strict: bool,
    ) -> Self {
        Self {
            meta_factory,
            typer,
            creator,
            strict,
        }
    }

    pub fn identifier(&self) -> &'static str {
        IDENTIFIER
    }

    /// True iff the bytes begin with the self-describing tag. CBOR without
    /// the tag is simply not recognised by this serializer.
    pub fn recognizes_data(&self, data: &[u8]) -> bool {
        data.starts_with(&SELF_DESCRIBED_PREFIX)
    }

    /// Writes the self-describing tag followed by a single canonical data
    /// item. If the writer fails on the tag, no payload bytes are emitted.
    pub fn encode(&self, obj: &dyn RuntimeObject, writer: &mut dyn Write) -> Result<(), CborError> {
        writer.write_all(&SELF_DESCRIBED_PREFIX)?;
        if let Some(unstructured) = obj.as_unstructured() {
            let bytes = CborEncoder::new().encode(&Value::Object(unstructured.content().clone()));
            writer.write_all(&bytes)?;
            return Ok(());
        }
        if let Some(custom) = obj.marshal_cbor() {
            writer.write_all(&custom?)?;
            return Ok(());
        }
        let value = obj.to_value()?;
        writer.write_all(&CborEncoder::new().encode(&value))?;
        Ok(())
    }

    /// Decodes into a freshly constructed registered object.
    ///
    /// The wire GVK is extracted first, defaulted against `default_gvk`, and
    /// must then carry a non-empty kind and version to key the registry
    /// lookup. The strict warning, when present, accompanies a fully
    /// populated object.
    pub fn decode(
        &self,
        data: &[u8],
        default_gvk: Option<&GroupVersionKind>,
    ) -> Result<
        (
            Box<dyn RuntimeObject>,
            GroupVersionKind,
            Option<StrictDecodingError>,
        ),
        CborError,
    > {
        let mut actual = self.meta_factory.interpret(data)?;
        if let Some(default) = default_gvk {
            let defaulted = actual.with_defaults(default);
            if defaulted != actual {
                debug!("wire gvk {actual} defaulted to {defaulted}");
            }
            actual = defaulted;
        }
        require_kind_and_version(&actual, data)?;
        let mut obj = self.creator.new_object(&actual)?;
        let warning = self.populate(data, obj.as_mut())?;
        Ok((obj, actual, warning))
    }

    /// Decodes into a caller-provided object.
    ///
    /// An unstructured target is populated directly from the content mapping
    /// and reports the GVK the mapping claims, which must be complete. Any
    /// other target must be known to the registry; its registered GVK then
    /// backs the defaulting.
    pub fn decode_into(
        &self,
        data: &[u8],
        default_gvk: Option<&GroupVersionKind>,
        into: &mut dyn RuntimeObject,
    ) -> Result<(GroupVersionKind, Option<StrictDecodingError>), CborError> {
        let mut actual = self.meta_factory.interpret(data)?;
        if let Some(default) = default_gvk {
            actual = actual.with_defaults(default);
        }

        if into.as_unstructured().is_some() {
            let warning = self.populate(data, into)?;
            let actual = into.gvk();
            require_kind_and_version(&actual, data)?;
            return Ok((actual, warning));
        }

        let kinds = self.typer.object_kinds(into)?;
        if let Some(registered) = kinds.first() {
            actual = actual.with_defaults(registered);
        }
        require_kind_and_version(&actual, data)?;
        let warning = self.populate(data, into)?;
        Ok((actual, warning))
    }

    fn populate(
        &self,
        data: &[u8],
        into: &mut dyn RuntimeObject,
    ) -> Result<Option<StrictDecodingError>, CborError> {
        let mode = if self.strict { modes::STRICT } else { modes::LAX };
        let value = CborDecoder::new(mode).decode(data)?.into_json()?;
        let unknown = into.set_from_value(value, mode.reject_unknown_fields)?;
        if unknown.is_empty() {
            Ok(None)
        } else {
            debug!(
                "strict decoding of a {} produced {} unknown field(s)",
                into.gvk(),
                unknown.len()
            );
            Ok(Some(StrictDecodingError::new(unknown)))
        }
    }
}

/// An effective GVK must name a kind and a version before it can key a
/// registry dispatch or be surfaced to the caller.
fn require_kind_and_version(actual: &GroupVersionKind, data: &[u8]) -> Result<(), CborError> {
    if actual.kind.is_empty() {
        return Err(RuntimeError::MissingKind {
            data: diagnostic(data),
        }
        .into());
    }
    if actual.version.is_empty() {
        return Err(RuntimeError::MissingVersion {
            data: diagnostic(data),
        }
        .into());
    }
    Ok(())
}
