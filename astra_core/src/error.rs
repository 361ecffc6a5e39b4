// astra_core/src/error.rs

use thiserror::Error;

/// Errors raised while building a sensor from its parameters.
///
/// Every variant describes a degenerate configuration. None of them can occur
/// once a sensor has been constructed: per-tick "failures" (blinded sensor,
/// no visible target) are reported through the validity flag instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{what} must not be a zero-length vector")]
    ZeroLengthVector { what: &'static str },

    #[error("{what} has a non-finite component")]
    NonFiniteVector { what: &'static str },

    #[error("noise standard deviation for {what} must be finite and non-negative, got {value}")]
    InvalidNoise { what: &'static str, value: f64 },

    #[error("step period must be positive and finite, got {0} s")]
    InvalidStepPeriod(f64),

    #[error("output delay must be non-negative and finite, got {0} s")]
    InvalidDelay(f64),

    #[error("output delay of {delay_s} s needs more buffer slots than allowed at a {step_s} s step")]
    DelayTooLong { delay_s: f64, step_s: f64 },

    #[error("output interval must be at least one tick")]
    ZeroOutputInterval,

    #[error("prescaler must be at least one base tick")]
    ZeroPrescaler,

    #[error("{what} must lie in [{min}, {max}] rad, got {value}")]
    AngleOutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("angular rate limit must be non-negative, got {0} rad/s")]
    InvalidRateLimit(f64),

    #[error("occluding body radius must be positive, got {0} m")]
    InvalidBodyRadius(f64),

    #[error("target identifier filter must name at least one constellation")]
    EmptyTargetFilter,
}
