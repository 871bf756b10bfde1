use crate::trace::{SpanId, TraceFlags, TraceId};

/// Opaque vendor-specific trace configuration, carried verbatim.
///
/// This corresponds to the W3C `tracestate` header. The value is not parsed
/// or validated here; whatever arrives on an inbound hop is forwarded
/// unchanged on the outbound one.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TraceState(Option<String>);

impl TraceState {
    /// The empty `TraceState`, as a constant.
    pub const NONE: TraceState = TraceState(None);

    /// Wrap a raw `tracestate` header value. An empty value is normalized to
    /// [`TraceState::NONE`].
    pub fn from_header<T: Into<String>>(header: T) -> Self {
        let header = header.into();
        if header.is_empty() {
            TraceState(None)
        } else {
            TraceState(Some(header))
        }
    }

    /// The raw header value, or `""` when empty.
    pub fn header(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    /// Returns `true` if no tracestate is being carried.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Immutable identity of a point in a distributed trace.
///
/// A `SpanContext` is a back-reference only: it carries the ids and flags
/// needed to link a remote parent, not any ownership of a span. It is
/// constructed either locally for a new trace or by successful extraction
/// from a carrier, and is freely copyable and compared by value.
#[derive(Clone, Debug, PartialEq, Hash, Eq)]
pub struct SpanContext {
    trace_id: TraceId,
    span_id: SpanId,
    trace_flags: TraceFlags,
    is_remote: bool,
    trace_state: TraceState,
}

impl SpanContext {
    /// An invalid span context, returned on any parse failure.
    pub const NONE: SpanContext = SpanContext {
        trace_id: TraceId::INVALID,
        span_id: SpanId::INVALID,
        trace_flags: TraceFlags::NOT_SAMPLED,
        is_remote: false,
        trace_state: TraceState::NONE,
    };

    /// Create an invalid empty span context.
    pub fn empty_context() -> Self {
        SpanContext::NONE
    }

    /// Construct a new `SpanContext`.
    pub fn new(
        trace_id: TraceId,
        span_id: SpanId,
        trace_flags: TraceFlags,
        is_remote: bool,
        trace_state: TraceState,
    ) -> Self {
        SpanContext {
            trace_id,
            span_id,
            trace_flags,
            is_remote,
            trace_state,
        }
    }

    /// The [`TraceId`] for this span context.
    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// The [`SpanId`] for this span context.
    pub fn span_id(&self) -> SpanId {
        self.span_id
    }

    /// The flags carried alongside the ids.
    ///
    /// Flags never affect validity; a context with exotic flag bits but zero
    /// ids is still invalid.
    pub fn trace_flags(&self) -> TraceFlags {
        self.trace_flags
    }

    /// Returns `true` if the span context has a valid (non-zero) `trace_id`
    /// and a valid (non-zero) `span_id`.
    pub fn is_valid(&self) -> bool {
        self.trace_id != TraceId::INVALID && self.span_id != SpanId::INVALID
    }

    /// Returns `true` if the span context was propagated from a remote
    /// parent.
    pub fn is_remote(&self) -> bool {
        self.is_remote
    }

    /// Returns `true` if the `sampled` trace flag is set.
    pub fn is_sampled(&self) -> bool {
        self.trace_flags.is_sampled()
    }

    /// A reference to the span context's [`TraceState`].
    pub fn trace_state(&self) -> &TraceState {
        &self.trace_state
    }
}
