//! Process-wide tracing setup.

/// Initialize tracing/logging for the process.
///
/// `default_level` is used when `RUST_LOG` is not set. Safe to call multiple
/// times; subsequent calls are no-ops.
pub fn init(default_level: &str, format: LogFormat) {
    self::tracing::init(default_level, format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;
