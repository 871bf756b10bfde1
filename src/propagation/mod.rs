//! Carrier abstractions and propagators.
//!
//! A propagator is a codec: it serializes a [`SpanContext`] into a carrier's
//! string key/value representation on the way out and deserializes it on the
//! way in. Carriers are supplied by the caller through the [`Injector`] and
//! [`Extractor`] traits, which any string-keyed map (HTTP headers, gRPC
//! metadata, environment variables) can implement.
//!
//! [`SpanContext`]: crate::trace::SpanContext

use std::collections::HashMap;
use std::env;

pub mod b3;
pub mod composite;
mod error;
pub mod text_map_propagator;
pub mod trace_context;

pub use composite::TextMapCompositePropagator;
pub use error::PropagationError;
pub use text_map_propagator::{FieldIter, NoopTextMapPropagator, TextMapPropagator};

/// Injector provides an interface for adding fields to an underlying carrier
/// like a header map.
pub trait Injector {
    /// Add a key and value to the carrier.
    fn set(&mut self, key: &str, value: String);
}

/// Extractor provides an interface for reading fields from an underlying
/// carrier like a header map.
pub trait Extractor {
    /// Get a value for a key from the carrier, or `None` if absent.
    fn get(&self, key: &str) -> Option<&str>;

    /// Collect all the keys from the carrier.
    fn keys(&self) -> Vec<&str>;
}

impl<S: std::hash::BuildHasher> Injector for HashMap<String, String, S> {
    /// Set a key and value in the HashMap.
    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_lowercase(), value);
    }
}

impl<S: std::hash::BuildHasher> Extractor for HashMap<String, String, S> {
    /// Get a value for a key from the HashMap.
    fn get(&self, key: &str) -> Option<&str> {
        self.get(&key.to_lowercase()).map(|v| v.as_str())
    }

    /// Collect all the keys from the HashMap.
    fn keys(&self) -> Vec<&str> {
        self.keys().map(|k| k.as_str()).collect::<Vec<_>>()
    }
}

/// Injector for `std::process::Command` that sets environment variables for
/// child processes.
///
/// Keys are converted to uppercase.
impl Injector for std::process::Command {
    fn set(&mut self, key: &str, value: String) {
        self.env(key.to_uppercase(), value);
    }
}

/// Extractor over a snapshot of the process environment.
///
/// Keys are case-insensitive; the snapshot is taken at construction time.
#[derive(Debug)]
pub struct EnvExtractor {
    vars: HashMap<String, String>,
}

impl EnvExtractor {
    /// Create a new extractor that reads from the current environment
    /// variables.
    pub fn new() -> Self {
        EnvExtractor {
            vars: env::vars().map(|(k, v)| (k.to_lowercase(), v)).collect(),
        }
    }
}

impl Default for EnvExtractor {
    fn default() -> Self {
        EnvExtractor::new()
    }
}

impl Extractor for EnvExtractor {
    fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(&key.to_lowercase()).map(|v| v.as_str())
    }

    fn keys(&self) -> Vec<&str> {
        self.vars.keys().map(|k| k.as_str()).collect()
    }
}
