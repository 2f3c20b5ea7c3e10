//! Self-describing CBOR serialization for runtime objects (RFC 8949).
//!
//! The serializer emits a canonical, cross-format-interoperable CBOR profile:
//! definite lengths only, deterministically sorted maps, floats packed into
//! the smallest width that preserves their value, and strings carried as the
//! byte-string major type. Every emitted stream is prefixed with the
//! three-byte self-describing tag `0xd9 0xd9 0xf7`.
//!
//! Decoding accepts a wider set of well-formed inputs (indefinite lengths,
//! either string major type, tagged items) and normalises them into the
//! canonical profile on re-encode, while rejecting inputs that cannot be
//! represented losslessly on the untyped pathway: duplicate map keys,
//! invalid UTF-8, integers outside the signed 64-bit range, non-string map
//! keys, and simple values other than false/true/null.

mod constants;
mod decoder;
mod diagnostic;
mod direct;
mod encoder;
mod error;
mod framer;
mod metafactory;
pub mod modes;
mod serializer;
mod value;

pub use constants::SELF_DESCRIBED_PREFIX;
pub use decoder::CborDecoder;
pub use diagnostic::diagnostic;
pub use direct::{from_slice, to_vec};
pub use encoder::CborEncoder;
pub use error::CborError;
pub use framer::CborFramer;
pub use metafactory::{DefaultMetaFactory, MetaFactory};
pub use serializer::{CborSerializer, ENCODES_AS_TEXT, IDENTIFIER, MEDIA_TYPE};
pub use value::CborValue;
