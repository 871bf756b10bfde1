//! # B3 Propagator
//!
//! Propagates `SpanContext`s using [B3 headers], in either of the two wire
//! encodings:
//!
//! 1. Single header:
//!    `b3: {trace_id}-{span_id}[-{sampling_state}[-{parent_span_id}]]`
//! 2. Multiple headers:
//!    `x-b3-traceid`, `x-b3-spanid`, `x-b3-parentspanid`, `x-b3-sampled`,
//!    `x-b3-flags`
//!
//! The injection encoding is selected with [`B3Encoding`]; extraction always
//! tries the single header first and falls back to the multiple headers.
//!
//! [B3 headers]: https://github.com/openzipkin/b3-propagation

use crate::{
    propagation::{
        text_map_propagator::FieldIter, Extractor, Injector, PropagationError, TextMapPropagator,
    },
    trace::{SpanContext, SpanId, TraceFlags, TraceId, TraceState},
    Context,
};

const B3_SINGLE_HEADER: &str = "b3";
// HTTP and gRPC transports disagree on the canonical casing (X-B3-TraceId vs
// x-b3-traceid); lowercase is used since the transport is unknown and the
// HashMap carriers lowercase their keys anyway.
const B3_DEBUG_FLAG_HEADER: &str = "x-b3-flags";
const B3_TRACE_ID_HEADER: &str = "x-b3-traceid";
const B3_SPAN_ID_HEADER: &str = "x-b3-spanid";
const B3_SAMPLED_HEADER: &str = "x-b3-sampled";
const B3_PARENT_SPAN_ID_HEADER: &str = "x-b3-parentspanid";

/// Sentinel flag: no sampling decision was carried at all. Distinct from an
/// explicit "not sampled", which B3 transmits as `0`.
pub const TRACE_FLAG_DEFERRED: TraceFlags = TraceFlags::new(0x02);
/// Flag set when the B3 debug flag (`x-b3-flags: 1` or a `d` sampling byte)
/// was carried.
pub const TRACE_FLAG_DEBUG: TraceFlags = TraceFlags::new(0x04);

lazy_static::lazy_static! {
    static ref B3_SINGLE_FIELDS: [String; 1] = [B3_SINGLE_HEADER.to_string()];
    static ref B3_MULTI_FIELDS: [String; 4] = [B3_TRACE_ID_HEADER.to_string(), B3_SPAN_ID_HEADER.to_string(), B3_SAMPLED_HEADER.to_string(), B3_DEBUG_FLAG_HEADER.to_string()];
    static ref B3_SINGLE_AND_MULTI_FIELDS: [String; 5] = [B3_SINGLE_HEADER.to_string(), B3_TRACE_ID_HEADER.to_string(), B3_SPAN_ID_HEADER.to_string(), B3_SAMPLED_HEADER.to_string(), B3_DEBUG_FLAG_HEADER.to_string()];
}

/// B3Encoding is a bitmask selecting the injection encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum B3Encoding {
    /// Transmit tracing information via the `X-B3-*` multiple headers. This
    /// is the default.
    MultipleHeader = 1,
    /// Transmit tracing information via the single `b3` header.
    SingleHeader = 2,
    /// Transmit via both the single header and the multiple headers. When
    /// both are present on extraction, the single header takes precedence.
    SingleAndMultiHeader = 3,
}

impl B3Encoding {
    /// Returns `true` if this encoding includes `other`.
    pub fn support(&self, other: &Self) -> bool {
        (*self as u8) & (*other as u8) == (*other as u8)
    }
}

/// Extracts and injects `SpanContext`s using B3 headers.
#[derive(Clone, Debug)]
pub struct B3Propagator {
    inject_encoding: B3Encoding,
}

impl Default for B3Propagator {
    fn default() -> Self {
        B3Propagator {
            inject_encoding: B3Encoding::MultipleHeader,
        }
    }
}

impl B3Propagator {
    /// Create a new `B3Propagator` that injects the multiple-header
    /// encoding.
    pub fn new() -> Self {
        B3Propagator::default()
    }

    /// Create a new `B3Propagator` with the given injection encoding.
    pub fn with_encoding(encoding: B3Encoding) -> Self {
        B3Propagator {
            inject_encoding: encoding,
        }
    }

    /// Parse the sampling state of the multiple-header encoding. Absence and
    /// the empty string both mean "no decision carried".
    fn extract_sampled_state(sampled: &str) -> Result<TraceFlags, PropagationError> {
        match sampled {
            "" => Ok(TRACE_FLAG_DEFERRED),
            "0" | "false" => Ok(TraceFlags::NOT_SAMPLED),
            "1" | "true" => Ok(TraceFlags::SAMPLED),
            _ => Err(PropagationError::InvalidSampledHeader),
        }
    }

    /// Extract a `SpanContext` from the five discrete `x-b3-*` headers.
    fn extract_multi_header(
        &self,
        extractor: &dyn Extractor,
    ) -> Result<SpanContext, PropagationError> {
        let mut required_count = 0;
        let mut trace_id = TraceId::INVALID;
        let mut span_id = SpanId::INVALID;

        if let Some(trace) = extractor.get(B3_TRACE_ID_HEADER).filter(|v| !v.is_empty()) {
            required_count += 1;
            trace_id = TraceId::from_hex_padded(trace)
                .map_err(|_| PropagationError::InvalidTraceIdHeader)?;
        }
        if let Some(span) = extractor.get(B3_SPAN_ID_HEADER).filter(|v| !v.is_empty()) {
            required_count += 1;
            span_id =
                SpanId::from_hex(span).map_err(|_| PropagationError::InvalidSpanIdHeader)?;
        }
        // The trace id/span id pair is all-or-nothing.
        if required_count == 1 {
            return Err(PropagationError::InvalidScope);
        }

        if let Some(parent) = extractor
            .get(B3_PARENT_SPAN_ID_HEADER)
            .filter(|v| !v.is_empty())
        {
            if required_count != 2 {
                return Err(PropagationError::InvalidScopeParent);
            }
            // Validated for well-formedness only; B3 parents are not stored.
            SpanId::from_hex(parent).map_err(|_| PropagationError::InvalidParentSpanIdHeader)?;
        }

        let sampled = Self::extract_sampled_state(extractor.get(B3_SAMPLED_HEADER).unwrap_or(""))?;

        // The debug flag implies a sampling decision and wins over an
        // explicit x-b3-sampled: 0 deny. Any other x-b3-flags value is
        // ignored.
        let trace_flags = match extractor.get(B3_DEBUG_FLAG_HEADER) {
            Some("1") => TRACE_FLAG_DEBUG | TraceFlags::SAMPLED,
            _ => sampled,
        };

        let span_context =
            SpanContext::new(trace_id, span_id, trace_flags, true, TraceState::NONE);

        if span_context.is_valid() {
            Ok(span_context)
        } else {
            Err(PropagationError::EmptyContext)
        }
    }

    /// Extract a `SpanContext` from the single `b3` header.
    ///
    /// The grammar is positional: `{32-hex}-{16-hex}[-{0|1|d}[-{16-hex}]]`
    /// with a 16-hex legacy trace id also accepted, or a bare sampling byte.
    fn extract_single_header(
        &self,
        extractor: &dyn Extractor,
    ) -> Result<SpanContext, PropagationError> {
        let header = extractor
            .get(B3_SINGLE_HEADER)
            .ok_or(PropagationError::EmptyContext)?;
        if header.is_empty() {
            return Err(PropagationError::EmptyContext);
        }
        if !header.is_ascii() {
            return Err(PropagationError::InvalidCharacter);
        }

        if header.len() == 1 {
            // A sampling decision with no identity attached.
            return match header {
                "0" | "1" | "d" => Err(PropagationError::EmptyContext),
                _ => Err(PropagationError::InvalidSampledByte),
            };
        }

        // A bare id without a delimiter is ambiguous between the 64-bit and
        // 128-bit forms and is rejected.
        if header.len() == 16 || header.len() == 32 {
            return Err(PropagationError::InvalidScope);
        }

        let (trace_str, rest) = if header.len() > 16 && header.as_bytes()[16] == b'-' {
            (&header[..16], &header[17..])
        } else if header.len() > 32 && header.as_bytes()[32] == b'-' {
            (&header[..32], &header[33..])
        } else {
            return Err(PropagationError::InvalidScope);
        };
        let trace_id = TraceId::from_hex_padded(trace_str)
            .map_err(|_| PropagationError::InvalidTraceIdValue)?;

        if rest.len() < 16 {
            return Err(PropagationError::InvalidSpanIdValue);
        }
        let span_id =
            SpanId::from_hex(&rest[..16]).map_err(|_| PropagationError::InvalidSpanIdValue)?;

        let tail = &rest[16..];
        let trace_flags = if tail.is_empty() {
            TRACE_FLAG_DEFERRED
        } else {
            let tail = tail
                .strip_prefix('-')
                .ok_or(PropagationError::InvalidSampledByte)?;
            let sampling = match tail.len() {
                1 => tail,
                // `{0|1|d}-{16-hex parent}`; the parent is validated for
                // well-formedness and discarded.
                18 => {
                    let parent = tail[1..]
                        .strip_prefix('-')
                        .ok_or(PropagationError::InvalidParentSpanIdValue)?;
                    SpanId::from_hex(parent)
                        .map_err(|_| PropagationError::InvalidParentSpanIdValue)?;
                    &tail[..1]
                }
                _ => return Err(PropagationError::InvalidSampledByte),
            };
            match sampling {
                "0" => TraceFlags::NOT_SAMPLED,
                "1" => TraceFlags::SAMPLED,
                "d" => TRACE_FLAG_DEBUG,
                _ => return Err(PropagationError::InvalidSampledByte),
            }
        };

        let span_context =
            SpanContext::new(trace_id, span_id, trace_flags, true, TraceState::NONE);

        if span_context.is_valid() {
            Ok(span_context)
        } else {
            Err(PropagationError::EmptyContext)
        }
    }
}

impl TextMapPropagator for B3Propagator {
    fn inject_context(&self, context: &Context, injector: &mut dyn Injector) {
        let span_context = context.span_context();
        if !span_context.is_valid() {
            // An invalid identity injects nothing at all.
            return;
        }

        let flags = span_context.trace_flags();
        let is_deferred = flags & TRACE_FLAG_DEFERRED == TRACE_FLAG_DEFERRED;
        let is_debug = flags & TRACE_FLAG_DEBUG == TRACE_FLAG_DEBUG;

        if self.inject_encoding.support(&B3Encoding::SingleHeader) {
            let mut value = format!("{}-{}", span_context.trace_id(), span_context.span_id());
            if !is_deferred {
                let flag = if is_debug {
                    "d"
                } else if flags.is_sampled() {
                    "1"
                } else {
                    "0"
                };
                value = format!("{value}-{flag}");
            }
            injector.set(B3_SINGLE_HEADER, value);
        }
        if self.inject_encoding.support(&B3Encoding::MultipleHeader) {
            injector.set(B3_TRACE_ID_HEADER, span_context.trace_id().to_string());
            injector.set(B3_SPAN_ID_HEADER, span_context.span_id().to_string());

            if is_debug {
                injector.set(B3_DEBUG_FLAG_HEADER, "1".to_string());
            } else if !is_deferred {
                let sampled = if flags.is_sampled() { "1" } else { "0" };
                injector.set(B3_SAMPLED_HEADER, sampled.to_string());
            }
        }
    }

    fn extract_with_context(&self, cx: &Context, extractor: &dyn Extractor) -> Context {
        // The single header takes precedence; any single-header failure
        // (including its absence) falls back to the multiple headers.
        let extracted = self
            .extract_single_header(extractor)
            .or_else(|_| self.extract_multi_header(extractor));

        match extracted {
            Ok(span_context) => cx.with_remote_span_context(span_context),
            Err(reason) => {
                hop_debug!(name: "b3.extract.dropped", reason = reason.to_string());
                cx.clone()
            }
        }
    }

    fn fields(&self) -> FieldIter<'_> {
        let field_slice = if self
            .inject_encoding
            .support(&B3Encoding::SingleAndMultiHeader)
        {
            B3_SINGLE_AND_MULTI_FIELDS.as_ref()
        } else if self.inject_encoding.support(&B3Encoding::SingleHeader) {
            B3_SINGLE_FIELDS.as_ref()
        } else {
            B3_MULTI_FIELDS.as_ref()
        };

        FieldIter::new(field_slice)
    }
}
