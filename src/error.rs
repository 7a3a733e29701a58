use thiserror::Error;

/// Errors returned by [`TDigest`](crate::TDigest) operations.
///
/// Every variant describes a caller mistake; none of them leave the digest in
/// a modified state.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// A sample value was NaN or infinite.
    #[error("sample value must be finite, got {0}")]
    InvalidValue(f64),

    /// A sample weight was not a positive, finite number.
    #[error("sample weight must be positive and finite, got {0}")]
    InvalidWeight(f64),

    /// A quantile level was outside of `[0, 1]`.
    #[error("quantile level must be in [0, 1], got {0}")]
    InvalidQuantile(f64),

    /// The compression factor was not a positive, finite number.
    #[error("compression must be positive and finite, got {0}")]
    InvalidCompression(f64),

    /// A capacity setting was zero, or too large to allocate.
    #[error("{name} must be at least 1 and fit in memory, got {value}")]
    InvalidCapacity {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: usize,
    },
}
