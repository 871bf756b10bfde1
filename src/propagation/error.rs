use thiserror::Error;

/// Reasons a carrier value can fail to decode into a `SpanContext`.
///
/// These never cross the propagator boundary as control flow: every
/// extraction failure degrades to "no span context found" and the caller's
/// ambient context passes through unchanged. The kinds exist so internal
/// logging (and direct users of the id codecs) can say *why* a header was
/// dropped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PropagationError {
    /// An identifier string has the wrong length.
    #[error("identifier has the wrong length")]
    InvalidLength,

    /// An identifier string contains a character outside lowercase hex.
    #[error("identifier contains a non lowercase-hex character")]
    InvalidCharacter,

    /// The `x-b3-sampled` header is not one of `0`, `1`, `true`, `false`.
    #[error("invalid x-b3-sampled header")]
    InvalidSampledHeader,

    /// The `x-b3-traceid` header does not decode as a trace id.
    #[error("invalid x-b3-traceid header")]
    InvalidTraceIdHeader,

    /// The `x-b3-spanid` header does not decode as a span id.
    #[error("invalid x-b3-spanid header")]
    InvalidSpanIdHeader,

    /// The `x-b3-parentspanid` header does not decode as a span id.
    #[error("invalid x-b3-parentspanid header")]
    InvalidParentSpanIdHeader,

    /// Exactly one of `x-b3-traceid` and `x-b3-spanid` is present; the pair
    /// is all-or-nothing.
    #[error("invalid scope, trace id and span id must appear together")]
    InvalidScope,

    /// A parent span id was sent without the trace id/span id pair.
    #[error("invalid scope, parent span id requires trace id and span id")]
    InvalidScopeParent,

    /// The carrier holds no span identity (for example a sampling decision
    /// with no ids, or zero-valued ids).
    #[error("header carries no span identity")]
    EmptyContext,

    /// The sampling position of a `b3` single header is not `0`, `1` or `d`.
    #[error("invalid sampled byte in b3 header")]
    InvalidSampledByte,

    /// The trace id position of a `b3` single header does not decode.
    #[error("invalid trace id in b3 header")]
    InvalidTraceIdValue,

    /// The span id position of a `b3` single header does not decode.
    #[error("invalid span id in b3 header")]
    InvalidSpanIdValue,

    /// The parent span id position of a `b3` single header does not decode.
    #[error("invalid parent span id in b3 header")]
    InvalidParentSpanIdValue,

    /// A `traceparent` header does not match the versioned grammar.
    #[error("malformed traceparent header")]
    MalformedHeader,

    /// A `traceparent` version of 255, which is reserved.
    #[error("unsupported traceparent version")]
    UnsupportedVersion,
}
