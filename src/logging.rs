//! Verbose diagnostics handle passed to every component at construction.
//!
//! Events are emitted through `tracing`; the handle only decides whether the
//! chatty per-decision traces are produced. Warnings are never gated.

/// Verbosity switch injected into the enumerator, provider, bridge and orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugLog {
    enabled: bool,
}

impl DebugLog {
    /// Create a handle with verbose tracing switched on or off.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Handle that suppresses verbose traces.
    pub const fn quiet() -> Self {
        Self::new(false)
    }

    /// Whether verbose decision traces should be emitted.
    pub const fn enabled(&self) -> bool {
        self.enabled
    }
}

/// Emit a `tracing::debug!` event only when the given [`DebugLog`] is enabled.
macro_rules! verbose {
    ($log:expr, $($arg:tt)+) => {
        if $log.enabled() {
            ::tracing::debug!($($arg)+);
        }
    };
}

pub(crate) use verbose;
