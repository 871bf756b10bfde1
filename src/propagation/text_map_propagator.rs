//! The propagator seam: inject, extract, and declared header fields.

use crate::{
    propagation::{Extractor, Injector},
    Context,
};
use std::fmt::Debug;
use std::slice;

/// Methods to inject and extract a trace identity as text into carriers that
/// travel in-band across process boundaries.
///
/// Propagators hold only immutable configuration, so a single instance may
/// serve any number of threads concurrently.
pub trait TextMapPropagator: Debug {
    /// Encode the span context of the given [`Context`] into the
    /// [`Injector`].
    ///
    /// Injection never fails. An invalid span context writes nothing.
    fn inject_context(&self, cx: &Context, injector: &mut dyn Injector);

    /// Retrieve a span context from the [`Extractor`], starting from an
    /// empty ambient context.
    fn extract(&self, extractor: &dyn Extractor) -> Context {
        self.extract_with_context(&Context::new(), extractor)
    }

    /// Retrieve a span context from the [`Extractor`], threading the given
    /// ambient context.
    ///
    /// If the carrier holds a valid span context for this format, the
    /// returned context embeds it; otherwise `cx` is returned unchanged.
    fn extract_with_context(&self, cx: &Context, extractor: &dyn Extractor) -> Context;

    /// The header names this propagator reads and writes, for carrier
    /// iteration purposes.
    fn fields(&self) -> FieldIter<'_>;
}

/// An iterator over the header fields declared by a propagator.
#[derive(Debug)]
pub struct FieldIter<'a>(slice::Iter<'a, String>);

impl<'a> FieldIter<'a> {
    /// Create a new `FieldIter` from a slice of field names.
    pub fn new(fields: &'a [String]) -> Self {
        FieldIter(fields.iter())
    }
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|field| field.as_str())
    }
}

static NOOP_FIELDS: [String; 0] = [];

/// A propagator that performs no propagation at all.
///
/// Used as the process-wide default until a real propagator is installed.
#[derive(Clone, Debug, Default)]
pub struct NoopTextMapPropagator {
    _private: (),
}

impl NoopTextMapPropagator {
    /// Create a new noop propagator.
    pub fn new() -> Self {
        NoopTextMapPropagator { _private: () }
    }
}

impl TextMapPropagator for NoopTextMapPropagator {
    fn inject_context(&self, _cx: &Context, _injector: &mut dyn Injector) {
        // no-op
    }

    fn extract_with_context(&self, cx: &Context, _extractor: &dyn Extractor) -> Context {
        cx.clone()
    }

    fn fields(&self) -> FieldIter<'_> {
        FieldIter::new(&NOOP_FIELDS)
    }
}
