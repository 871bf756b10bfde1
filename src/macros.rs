#![allow(unused_macros)]
//! Internal logging macros.
//!
//! Extraction failures are an expected outcome, not an error the caller sees,
//! so they are reported through `tracing` only when the `internal-logs`
//! feature is enabled. These macros are for use inside this crate; they are
//! not a general logging facility.

/// Log a debug-level event with the crate as the target.
macro_rules! hop_debug {
    (name: $name:expr $(, $key:ident = $value:expr)* $(,)?) => {
        #[cfg(feature = "internal-logs")]
        {
            $crate::_private::debug!(name: $name, target: env!("CARGO_PKG_NAME"), $($key = $value,)* "");
        }

        #[cfg(not(feature = "internal-logs"))]
        {
            let _ = ($name $(, $value)*); // Compiler will optimize this out as it's unused.
        }
    };
}

/// Log a warning-level event with the crate as the target.
macro_rules! hop_warn {
    (name: $name:expr $(, $key:ident = $value:expr)* $(,)?) => {
        #[cfg(feature = "internal-logs")]
        {
            $crate::_private::warn!(name: $name, target: env!("CARGO_PKG_NAME"), $($key = $value,)* "");
        }

        #[cfg(not(feature = "internal-logs"))]
        {
            let _ = ($name $(, $value)*); // Compiler will optimize this out as it's unused.
        }
    };
}
