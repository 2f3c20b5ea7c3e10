//! Schema types used by extension-resource definitions.
//!
//! The interesting part is the wire format: [`SchemaOrBool`],
//! [`SchemaOrStringArray`] and [`SchemaOrArray`] are unions that serialize
//! as whichever case is inhabited (a JSON schema object, a boolean, an
//! array), and [`RawJson`] is an opaque pre-encoded JSON payload that is
//! transcoded, never interpreted. Every type round-trips equivalently
//! through JSON and CBOR.

mod raw;
mod schema;
mod unions;

pub use raw::RawJson;
pub use schema::JsonSchema;
pub use unions::{SchemaOrArray, SchemaOrBool, SchemaOrStringArray};
