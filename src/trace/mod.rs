//! Trace identity types.
//!
//! A point in a distributed trace is identified by a 16-byte [`TraceId`], an
//! 8-byte [`SpanId`], and a one-byte [`TraceFlags`] bitmask. [`SpanContext`]
//! bundles the three into the immutable value that propagators move across
//! process boundaries.

mod ids;
mod span_context;

pub use ids::{SpanId, TraceFlags, TraceId};
pub use span_context::{SpanContext, TraceState};
