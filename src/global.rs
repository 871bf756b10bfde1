//! Process-wide default propagator.
//!
//! Application owners install a propagator once at startup with
//! [`set_text_map_propagator`]; library code then propagates through
//! [`get_text_map_propagator`] without needing the concrete type. Until one
//! is installed, the default is a [`NoopTextMapPropagator`] that reads and
//! writes nothing.
//!
//! ```
//! use tracehop::global;
//! use tracehop::propagation::trace_context::TraceContextPropagator;
//! use std::collections::HashMap;
//!
//! global::set_text_map_propagator(TraceContextPropagator::new());
//!
//! let headers: HashMap<String, String> = HashMap::new();
//! let cx = global::get_text_map_propagator(|propagator| propagator.extract(&headers));
//! ```

use crate::propagation::{NoopTextMapPropagator, TextMapPropagator};
use std::sync::{OnceLock, RwLock};

/// The current global propagator, lazily initialized to a noop.
static GLOBAL_TEXT_MAP_PROPAGATOR: OnceLock<
    RwLock<Box<dyn TextMapPropagator + Send + Sync>>,
> = OnceLock::new();

/// Fallback used if the propagator lock was poisoned by a panicking writer.
static DEFAULT_TEXT_MAP_PROPAGATOR: OnceLock<NoopTextMapPropagator> = OnceLock::new();

fn global_text_map_propagator() -> &'static RwLock<Box<dyn TextMapPropagator + Send + Sync>> {
    GLOBAL_TEXT_MAP_PROPAGATOR
        .get_or_init(|| RwLock::new(Box::new(NoopTextMapPropagator::new())))
}

/// Sets the given [`TextMapPropagator`] as the process-wide default.
pub fn set_text_map_propagator<P: TextMapPropagator + Send + Sync + 'static>(propagator: P) {
    let mut global_propagator = match global_text_map_propagator().write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *global_propagator = Box::new(propagator);
}

/// Executes a closure with a reference to the process-wide default
/// [`TextMapPropagator`].
pub fn get_text_map_propagator<T, F>(mut f: F) -> T
where
    F: FnMut(&dyn TextMapPropagator) -> T,
{
    match global_text_map_propagator().read() {
        Ok(propagator) => f(&**propagator),
        Err(_) => {
            hop_warn!(
                name: "global.propagator.lock_poisoned",
                message = "falling back to the noop propagator"
            );
            f(DEFAULT_TEXT_MAP_PROPAGATOR.get_or_init(NoopTextMapPropagator::new))
        }
    }
}
