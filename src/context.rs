//! Ambient context threaded through propagator calls.

use crate::trace::SpanContext;

static NONE_SPAN_CONTEXT: SpanContext = SpanContext::NONE;

/// An immutable, execution-scoped value carrying the propagated trace
/// identity.
///
/// Extraction threads a `Context` through each propagator: a propagator that
/// finds a valid [`SpanContext`] in the carrier returns a new context
/// embedding it, while a propagator that finds nothing returns its input
/// unchanged. The context is a value type; cloning is cheap and there is no
/// shared mutable state behind it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    span_context: Option<SpanContext>,
}

impl Context {
    /// Create an empty context with no trace identity.
    pub fn new() -> Self {
        Context::default()
    }

    /// Return a copy of this context embedding the given remote
    /// [`SpanContext`].
    pub fn with_remote_span_context(&self, span_context: SpanContext) -> Self {
        Context {
            span_context: Some(span_context),
        }
    }

    /// The [`SpanContext`] carried by this context.
    ///
    /// Returns [`SpanContext::NONE`] if no identity has been attached.
    pub fn span_context(&self) -> &SpanContext {
        self.span_context.as_ref().unwrap_or(&NONE_SPAN_CONTEXT)
    }

    /// Returns `true` if a remote [`SpanContext`] has been attached to this
    /// context.
    pub fn has_remote_span_context(&self) -> bool {
        self.span_context.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{SpanId, TraceFlags, TraceId, TraceState};

    #[test]
    fn empty_context_has_invalid_span_context() {
        let cx = Context::new();
        assert!(!cx.has_remote_span_context());
        assert_eq!(cx.span_context(), &SpanContext::NONE);
        assert!(!cx.span_context().is_valid());
    }

    #[test]
    fn with_remote_span_context_does_not_mutate_original() {
        let cx = Context::new();
        let span_context = SpanContext::new(
            TraceId::from(1),
            SpanId::from(1),
            TraceFlags::SAMPLED,
            true,
            TraceState::NONE,
        );
        let derived = cx.with_remote_span_context(span_context.clone());

        assert!(!cx.has_remote_span_context());
        assert_eq!(derived.span_context(), &span_context);
    }
}
