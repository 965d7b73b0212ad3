//! Internal logging helpers for structured specfilter events.

/// Single tracing target for the compiler.
pub(crate) const LOG_TARGET: &str = "specfilter";
