//! Composition of multiple propagators over one carrier.

use crate::{
    propagation::{text_map_propagator::FieldIter, Extractor, Injector, TextMapPropagator},
    Context,
};

/// A propagator that chains multiple [`TextMapPropagator`]s together over a
/// single carrier.
///
/// Injection calls every propagator in order; each writes its own disjoint
/// header keys and must not interfere with the others. Extraction threads
/// the same ambient context through every propagator in order: a propagator
/// that finds a valid span context embeds it, one that finds nothing passes
/// its input through unchanged. The net effect is that the first propagator
/// to find a valid span context wins, and later misses cannot erase it.
#[derive(Debug)]
pub struct TextMapCompositePropagator {
    propagators: Vec<Box<dyn TextMapPropagator + Send + Sync>>,
    fields: Vec<String>,
}

impl TextMapCompositePropagator {
    /// Constructs a new propagator out of instances of
    /// [`TextMapPropagator`], preserving their order.
    pub fn new(propagators: Vec<Box<dyn TextMapPropagator + Send + Sync>>) -> Self {
        let mut fields = Vec::<String>::new();
        for propagator in &propagators {
            for field in propagator.fields() {
                if !fields.iter().any(|existing| existing == field) {
                    fields.push(field.to_string());
                }
            }
        }

        TextMapCompositePropagator {
            propagators,
            fields,
        }
    }
}

impl TextMapPropagator for TextMapCompositePropagator {
    fn inject_context(&self, context: &Context, injector: &mut dyn Injector) {
        for propagator in &self.propagators {
            propagator.inject_context(context, injector)
        }
    }

    fn extract_with_context(&self, cx: &Context, extractor: &dyn Extractor) -> Context {
        self.propagators
            .iter()
            .fold(cx.clone(), |current_cx, propagator| {
                propagator.extract_with_context(&current_cx, extractor)
            })
    }

    fn fields(&self) -> FieldIter<'_> {
        FieldIter::new(self.fields.as_slice())
    }
}
