//! Encode and decode profiles.
//!
//! The encoder has a single canonical profile with no knobs: definite
//! lengths, maps sorted by the bytewise order of their encoded keys, floats
//! packed into the smallest width that reconstitutes the exact value, every
//! NaN collapsed to the canonical half-precision quiet NaN, and strings
//! emitted as the byte-string major type (text strings must be valid UTF-8;
//! byte strings carry no such obligation and transcode safely through
//! systems that could otherwise inject invalid sequences).
//!
//! Decoding comes in two profiles, [`STRICT`] and [`LAX`], differing only in
//! whether map keys without a corresponding field in the destination
//! structure are reported. Both are immutable process-wide configuration
//! handles, safe to share freely.

/// Maximum nesting depth accepted by the decoder. Deeper inputs are
/// rejected; observed production objects stay well below this.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum number of elements accepted per array or map.
pub const MAX_CONTAINER_ELEMENTS: usize = 1024;

/// Decode-side configuration handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeMode {
    /// Report map keys that have no corresponding field in the destination
    /// structure. The payload is populated either way; the report is a
    /// warning, not a failure.
    pub reject_unknown_fields: bool,
    pub max_nesting_depth: usize,
    pub max_container_elements: usize,
}

/// Strict profile: unknown fields are reported alongside the decoded
/// payload.
pub const STRICT: DecodeMode = DecodeMode {
    reject_unknown_fields: true,
    max_nesting_depth: MAX_NESTING_DEPTH,
    max_container_elements: MAX_CONTAINER_ELEMENTS,
};

/// Lax profile: unknown fields are silently ignored. Everything else is
/// identical to [`STRICT`]; inputs rejected by one are rejected by both.
pub const LAX: DecodeMode = DecodeMode {
    reject_unknown_fields: false,
    max_nesting_depth: MAX_NESTING_DEPTH,
    max_container_elements: MAX_CONTAINER_ELEMENTS,
};
