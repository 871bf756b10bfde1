//! Context propagation for distributed traces.
//!
//! A request that crosses a process boundary keeps its place in a trace only
//! if the caller writes the trace identity into the transport (usually HTTP
//! headers) and the callee reads it back out. This crate implements that
//! hop: an immutable [`SpanContext`] identity (trace id, span id, sampling
//! flags), the two common wire codecs for it, and the plumbing to run several
//! codecs over one carrier without them clobbering each other.
//!
//! - [`propagation::trace_context::TraceContextPropagator`] speaks the
//!   [W3C TraceContext] `traceparent`/`tracestate` headers.
//! - [`propagation::b3::B3Propagator`] speaks the Zipkin [B3] headers, in
//!   both the single-header and multi-header encodings.
//! - [`propagation::TextMapCompositePropagator`] chains propagators so that
//!   the first codec to find a valid identity wins and later misses cannot
//!   erase it.
//!
//! Extraction never fails loudly: a malformed inbound header yields the
//! ambient [`Context`] unchanged, and the request simply starts a new,
//! unlinked trace. Injection of an invalid context writes no headers at all.
//!
//! All propagators are pure, immutable values; `inject`/`extract` may be
//! called concurrently from any number of threads without locking.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use tracehop::propagation::trace_context::TraceContextPropagator;
//! use tracehop::propagation::TextMapPropagator;
//! use tracehop::trace::{SpanContext, SpanId, TraceFlags, TraceId, TraceState};
//! use tracehop::Context;
//!
//! let propagator = TraceContextPropagator::new();
//! let cx = Context::new().with_remote_span_context(SpanContext::new(
//!     TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap(),
//!     SpanId::from_hex("00f067aa0ba902b7").unwrap(),
//!     TraceFlags::SAMPLED,
//!     true,
//!     TraceState::NONE,
//! ));
//!
//! // Outbound: write the identity into the carrier.
//! let mut headers = HashMap::new();
//! propagator.inject_context(&cx, &mut headers);
//! assert_eq!(
//!     headers.get("traceparent").map(String::as_str),
//!     Some("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
//! );
//!
//! // Inbound: read it back out on the other side of the hop.
//! let extracted = propagator.extract(&headers);
//! assert_eq!(extracted.span_context(), cx.span_context());
//! ```
//!
//! [W3C TraceContext]: https://www.w3.org/TR/trace-context/
//! [B3]: https://github.com/openzipkin/b3-propagation
//!
//! ## Feature flags
//!
//! * `internal-logs` (default): report extraction failures through
//!   [`tracing`](https://crates.io/crates/tracing) at debug level.
//!
//! [`SpanContext`]: trace::SpanContext
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(test, deny(warnings))]

#[macro_use]
mod macros;

mod context;

pub use context::Context;

pub mod global;

pub mod propagation;

pub mod trace;

#[doc(hidden)]
#[cfg(feature = "internal-logs")]
pub mod _private {
    pub use tracing::{debug, warn};
}
