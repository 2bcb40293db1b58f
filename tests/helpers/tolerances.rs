//! Tolerance constants for value-space comparisons.

/// Conversions that should be mathematically exact up to rounding.
pub const FLOAT_EPSILON: f64 = 1e-9;

/// Skewed round trips (`powf` in both directions).
pub const SKEW_EPSILON: f64 = 1e-6;
