use thiserror::Error;

/// Errors produced while encoding or decoding CBOR wire items.
///
/// Decode errors are fatal to the call; none are retried. The strict
/// unknown-field condition is not an error here — it travels as a
/// [`StrictDecodingError`](apimachinery_runtime::StrictDecodingError)
/// warning alongside the decoded payload.
#[derive(Debug, Error)]
pub enum CborError {
    #[error("cbor: unexpected end of input")]
    UnexpectedEof,

    #[error("cbor: invalid UTF-8 string")]
    InvalidUtf8,

    #[error("cbor: found duplicate map key {key:?}")]
    DuplicateMapKey { key: String },

    #[error("cbor: exceeded maximum nesting depth of {max}")]
    MaxDepthExceeded { max: usize },

    #[error("cbor: container exceeds maximum of {max} elements")]
    MaxElementsExceeded { max: usize },

    #[error("cbor: integer value out of int64 range")]
    IntegerOutOfRange,

    #[error("cbor: unsupported simple value {value}")]
    UnsupportedSimpleValue { value: u8 },

    #[error("cbor: map key must be a string")]
    InvalidMapKey,

    #[error("cbor: invalid time value: {reason}")]
    InvalidTime { reason: String },

    #[error("cbor: extraneous data after top-level value")]
    TrailingData,

    #[error("cbor: malformed input: {reason}")]
    Malformed { reason: &'static str },

    /// A decoded float has no representation on the untyped (JSON-parity)
    /// pathway.
    #[error("cbor: float {0} cannot be represented in an untyped value")]
    NonFiniteFloat(f64),

    #[error("unable to determine group/version/kind: {reason}")]
    GvkInterpret { reason: String },

    #[error(transparent)]
    Runtime(#[from] apimachinery_runtime::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
