//! Tracing/logging setup shared by larder binaries.

/// Tracing configuration (filters, formatter).
pub mod tracing;

/// Initialize process-wide tracing with the default filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}
