//! Runtime object machinery shared by the wire serializers.
//!
//! The pieces here are deliberately small: a group/version/kind triple for
//! identifying object schemas, a capability trait ([`RuntimeObject`]) that
//! serializers dispatch on, a dynamic [`Unstructured`] object backed by an
//! untyped mapping, and a [`Registry`] that maps kinds to constructors.

mod error;
mod gvk;
mod object;
mod registry;
mod type_meta;
mod unstructured;

pub use error::{Error, StrictDecodingError};
pub use gvk::GroupVersionKind;
pub use object::{typed_from_value, typed_to_value, RuntimeObject};
pub use registry::{ObjectCreator, ObjectTyper, Registry};
pub use type_meta::TypeMeta;
pub use unstructured::Unstructured;
