//! Tracing and logging setup shared by the storefront binaries.

/// Initialize process-wide tracing, picking the output format from
/// `STOREFRONT_LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{LOG_FORMAT_VAR, LogFormat};
