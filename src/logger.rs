// Logging compiles to nothing unless the `logger` feature is enabled. As a
// library we leave level filtering to whichever `log` backend the caller
// installs.

#[cfg(feature = "logger")]
pub use log::{debug, info, trace};

/// Returns true if the trace log level is enabled
#[cfg(feature = "logger")]
#[must_use]
pub fn trace_enabled() -> bool {
    log::log_enabled!(log::Level::Trace)
}

#[cfg(not(feature = "logger"))]
pub use noop_logger::{debug, info, trace, trace_enabled};

#[cfg(not(feature = "logger"))]
mod noop_logger {
    #[macro_export]
    #[doc(hidden)]
    macro_rules! __hashed_trie_noop {
        ($($arg:tt)+) => {
            if $crate::logger::trace_enabled() {
                // Never taken; keeps the arguments "used" for lints.
                let _ = format!($($arg)+);
            }
        };
    }

    pub use __hashed_trie_noop as debug;
    pub use __hashed_trie_noop as info;
    pub use __hashed_trie_noop as trace;

    /// `trace_enabled` for a noop logger is always false
    #[inline]
    #[must_use]
    pub const fn trace_enabled() -> bool {
        false
    }
}
