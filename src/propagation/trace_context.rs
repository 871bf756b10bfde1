//! # W3C Trace Context Propagator
//!
//! Propagates `SpanContext`s over the [W3C TraceContext] `traceparent` and
//! `tracestate` headers. The `traceparent` header carries the versioned
//! identity:
//!
//! ```text
//! {version:2}-{trace_id:32}-{span_id:16}-{trace_flags:2}
//! ```
//!
//! The `tracestate` header is vendor data and is carried verbatim, without
//! interpretation.
//!
//! [W3C TraceContext]: https://www.w3.org/TR/trace-context/

use crate::{
    propagation::{
        text_map_propagator::FieldIter, Extractor, Injector, PropagationError, TextMapPropagator,
    },
    trace::{SpanContext, SpanId, TraceFlags, TraceId, TraceState},
    Context,
};
use std::sync::OnceLock;

const SUPPORTED_VERSION: u8 = 0;
const MAX_VERSION: u8 = 254;
const TRACEPARENT_HEADER: &str = "traceparent";
const TRACESTATE_HEADER: &str = "tracestate";

// TODO Replace this with LazyLock once MSRV is 1.80+
static TRACE_CONTEXT_HEADER_FIELDS: OnceLock<[String; 2]> = OnceLock::new();

fn trace_context_header_fields() -> &'static [String; 2] {
    TRACE_CONTEXT_HEADER_FIELDS
        .get_or_init(|| [TRACEPARENT_HEADER.to_owned(), TRACESTATE_HEADER.to_owned()])
}

// `u8::from_str_radix` alone would accept a leading sign and uppercase.
fn is_lowercase_hex(part: &str, len: usize) -> bool {
    part.len() == len && part.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Propagates trace identity over the `traceparent` and `tracestate` headers.
#[derive(Clone, Debug, Default)]
pub struct TraceContextPropagator {
    _private: (),
}

impl TraceContextPropagator {
    /// Create a new `TraceContextPropagator`.
    pub fn new() -> Self {
        TraceContextPropagator { _private: () }
    }

    fn extract_span_context(
        &self,
        extractor: &dyn Extractor,
    ) -> Result<SpanContext, PropagationError> {
        let header_value = extractor
            .get(TRACEPARENT_HEADER)
            .map(|v| v.trim())
            .ok_or(PropagationError::EmptyContext)?;
        // Future versions may append `-`-separated sections; a trailing
        // delimiter on its own is tolerated.
        let parts = header_value
            .trim_end_matches('-')
            .split_terminator('-')
            .collect::<Vec<&str>>();
        if parts.len() < 4 {
            return Err(PropagationError::MalformedHeader);
        }

        let version_part = parts[0];
        if !is_lowercase_hex(version_part, 2) {
            return Err(PropagationError::MalformedHeader);
        }
        let version = u8::from_str_radix(version_part, 16)
            .map_err(|_| PropagationError::MalformedHeader)?;
        if version > MAX_VERSION {
            return Err(PropagationError::UnsupportedVersion);
        }
        if version == SUPPORTED_VERSION && parts.len() != 4 {
            return Err(PropagationError::MalformedHeader);
        }

        let trace_id =
            TraceId::from_hex(parts[1]).map_err(|_| PropagationError::MalformedHeader)?;
        let span_id = SpanId::from_hex(parts[2]).map_err(|_| PropagationError::MalformedHeader)?;

        let flags_part = parts[3];
        if !is_lowercase_hex(flags_part, 2) {
            return Err(PropagationError::MalformedHeader);
        }
        let opts =
            u8::from_str_radix(flags_part, 16).map_err(|_| PropagationError::MalformedHeader)?;
        // Only the sampled bit is defined in version 0; a version-0 sender
        // setting anything else is malformed, anyone newer gets masked.
        if version == SUPPORTED_VERSION && opts > 2 {
            return Err(PropagationError::MalformedHeader);
        }
        let trace_flags = TraceFlags::new(opts) & TraceFlags::SAMPLED;

        let trace_state = match extractor.get(TRACESTATE_HEADER) {
            Some(state) => TraceState::from_header(state),
            None => TraceState::NONE,
        };

        let span_context = SpanContext::new(trace_id, span_id, trace_flags, true, trace_state);

        if span_context.is_valid() {
            Ok(span_context)
        } else {
            Err(PropagationError::MalformedHeader)
        }
    }
}

impl TextMapPropagator for TraceContextPropagator {
    /// Writes the `traceparent` (and, when non-empty, `tracestate`) headers
    /// into the injector.
    fn inject_context(&self, cx: &Context, injector: &mut dyn Injector) {
        let span_context = cx.span_context();
        if !span_context.is_valid() {
            return;
        }

        let header_value = format!(
            "{:02x}-{}-{}-{:02x}",
            SUPPORTED_VERSION,
            span_context.trace_id(),
            span_context.span_id(),
            span_context.trace_flags() & TraceFlags::SAMPLED
        );
        injector.set(TRACEPARENT_HEADER, header_value);
        if !span_context.trace_state().is_empty() {
            injector.set(
                TRACESTATE_HEADER,
                span_context.trace_state().header().to_owned(),
            );
        }
    }

    /// Reads the `traceparent` and `tracestate` headers and, if they decode,
    /// returns `cx` with the remote span context embedded.
    fn extract_with_context(&self, cx: &Context, extractor: &dyn Extractor) -> Context {
        match self.extract_span_context(extractor) {
            Ok(span_context) => cx.with_remote_span_context(span_context),
            Err(reason) => {
                hop_debug!(name: "traceparent.extract.dropped", reason = reason.to_string());
                cx.clone()
            }
        }
    }

    fn fields(&self) -> FieldIter<'_> {
        FieldIter::new(trace_context_header_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TRACE_ID: u128 = 0x4bf9_2f35_77b3_4da6_a3ce_929d_0e0e_4736;
    const SPAN_ID: u64 = 0x00f0_67aa_0ba9_02b7;

    fn span_context(flags: TraceFlags, state: &str) -> SpanContext {
        SpanContext::new(
            TraceId::from(TRACE_ID),
            SpanId::from(SPAN_ID),
            flags,
            true,
            TraceState::from_header(state),
        )
    }

    #[rustfmt::skip]
    fn extract_data() -> Vec<(&'static str, &'static str, SpanContext)> {
        vec![
            ("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01", "foo=bar", span_context(TraceFlags::SAMPLED, "foo=bar")),
            ("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-00", "foo=bar", span_context(TraceFlags::default(), "foo=bar")),
            ("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01", "", span_context(TraceFlags::SAMPLED, "")),
            ("02-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01", "", span_context(TraceFlags::SAMPLED, "")), // future version, parseable
            ("02-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01-what-the-future-will-be-like", "", span_context(TraceFlags::SAMPLED, "")), // future version with extra sections
            ("02-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-09", "", span_context(TraceFlags::SAMPLED, "")), // future flags masked to the sampled bit
            ("02-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-08", "", span_context(TraceFlags::default(), "")),
            ("  00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01  ", "foo=bar", span_context(TraceFlags::SAMPLED, "foo=bar")), // surrounding whitespace
            ("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01", "foo=bar,baz=qux", span_context(TraceFlags::SAMPLED, "foo=bar,baz=qux")), // tracestate carried verbatim
        ]
    }

    #[rustfmt::skip]
    fn extract_invalid_data() -> Vec<(&'static str, &'static str)> {
        vec![
            ("0000-00000000000000000000000000000000-0000000000000000-01", "version too long"),
            ("ff-00000000000000000000000000000000-0000000000000000-09", "version 255 is reserved"),
            ("00-ab00000000000000000000000000000000-cd00000000000000-01", "trace id too long"),
            ("00-ab0000000000000000000000000000-cd00000000000000-01", "trace id too short"),
            ("00-00000000000000000000000000000000-cd00000000000000-01", "zero trace id"),
            ("00-ab000000000000000000000000000000-0000000000000000-01", "zero span id"),
            ("00-ab000000000000000000000000000000-cd0000000000000000-01", "span id too long"),
            ("00-ab000000000000000000000000000000-cd00000000000000-0100", "flags too long"),
            ("00-ab000000000000000000000000000000-cd00000000000000-09", "version 0 cannot carry flags above 2"),
            ("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01-extra", "version 0 allows exactly four sections"),
            ("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7", "missing flags"),
            ("00-qw000000000000000000000000000000-cd00000000000000-01", "trace id is not hex"),
            ("00-ab000000000000000000000000000000-qw00000000000000-01", "span id is not hex"),
            ("00-AB000000000000000000000000000000-cd00000000000000-01", "upper case trace id"),
            ("00-ab000000000000000000000000000000-CD00000000000000-01", "upper case span id"),
            ("0A-ab000000000000000000000000000000-cd00000000000000-01", "upper case version"),
            ("00-ab000000000000000000000000000000-cd00000000000000-0G", "flags are not hex"),
            ("", "empty header"),
            ("---", "nothing but delimiters"),
        ]
    }

    #[test]
    fn extract_w3c() {
        let propagator = TraceContextPropagator::new();

        for (traceparent, tracestate, expected_context) in extract_data() {
            let mut extractor = HashMap::new();
            extractor.insert(TRACEPARENT_HEADER.to_string(), traceparent.to_string());
            extractor.insert(TRACESTATE_HEADER.to_string(), tracestate.to_string());

            assert_eq!(
                propagator.extract(&extractor).span_context(),
                &expected_context,
                "traceparent: {traceparent:?}"
            );
        }
    }

    #[test]
    fn extract_w3c_rejects_malformed_headers() {
        let propagator = TraceContextPropagator::new();

        for (invalid_header, reason) in extract_invalid_data() {
            let mut extractor = HashMap::new();
            extractor.insert(TRACEPARENT_HEADER.to_string(), invalid_header.to_string());

            assert_eq!(
                propagator.extract(&extractor).span_context(),
                &SpanContext::empty_context(),
                "{reason}: {invalid_header:?}"
            );
        }
    }

    #[test]
    fn extract_w3c_missing_header_leaves_ambient_context_alone() {
        let propagator = TraceContextPropagator::new();
        let ambient =
            Context::new().with_remote_span_context(span_context(TraceFlags::SAMPLED, ""));

        let extractor: HashMap<String, String> = HashMap::new();
        let result = propagator.extract_with_context(&ambient, &extractor);
        assert_eq!(result.span_context(), ambient.span_context());
    }

    #[test]
    fn extract_w3c_tracestate_without_traceparent_is_ignored() {
        let propagator = TraceContextPropagator::new();

        let mut extractor = HashMap::new();
        extractor.insert(TRACESTATE_HEADER.to_string(), "foo=bar".to_string());
        assert_eq!(
            propagator.extract(&extractor).span_context(),
            &SpanContext::empty_context()
        );
    }

    #[test]
    fn inject_w3c() {
        let propagator = TraceContextPropagator::new();

        let data: Vec<(&str, Option<&str>, SpanContext)> = vec![
            (
                "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
                Some("foo=bar"),
                span_context(TraceFlags::SAMPLED, "foo=bar"),
            ),
            (
                "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-00",
                None,
                span_context(TraceFlags::default(), ""),
            ),
            (
                // Vendor flag bits are not written out.
                "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
                None,
                span_context(TraceFlags::new(0xff), ""),
            ),
        ];

        for (expected_traceparent, expected_tracestate, context) in data {
            let mut injector: HashMap<String, String> = HashMap::new();
            propagator.inject_context(
                &Context::new().with_remote_span_context(context),
                &mut injector,
            );

            assert_eq!(
                Extractor::get(&injector, TRACEPARENT_HEADER),
                Some(expected_traceparent)
            );
            assert_eq!(
                Extractor::get(&injector, TRACESTATE_HEADER),
                expected_tracestate
            );
        }
    }

    #[test]
    fn inject_w3c_invalid_context_writes_nothing() {
        let propagator = TraceContextPropagator::new();

        let invalid = SpanContext::new(
            TraceId::INVALID,
            SpanId::from(SPAN_ID),
            TraceFlags::SAMPLED,
            true,
            TraceState::NONE,
        );
        let mut injector: HashMap<String, String> = HashMap::new();
        propagator.inject_context(
            &Context::new().with_remote_span_context(invalid),
            &mut injector,
        );
        assert!(injector.is_empty());

        propagator.inject_context(&Context::new(), &mut injector);
        assert!(injector.is_empty());
    }

    #[test]
    fn test_get_fields() {
        let propagator = TraceContextPropagator::new();
        assert_eq!(
            propagator.fields().collect::<Vec<&str>>(),
            vec![TRACEPARENT_HEADER, TRACESTATE_HEADER]
        );
    }
}
