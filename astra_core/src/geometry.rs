// astra_core/src/geometry.rs

//! Small vector helpers shared by the visibility engines and noise synthesis.

use crate::error::ConfigError;
use nalgebra::{Unit, Vector3};

/// Below this norm a vector is considered degenerate.
pub const MIN_NORM: f64 = 1e-12;

/// Normalizes a configuration vector, rejecting zero-length or non-finite input.
pub fn checked_unit(v: &Vector3<f64>, what: &'static str) -> Result<Unit<Vector3<f64>>, ConfigError> {
    if !v.iter().all(|c| c.is_finite()) {
        return Err(ConfigError::NonFiniteVector { what });
    }
    Unit::try_new(*v, MIN_NORM).ok_or(ConfigError::ZeroLengthVector { what })
}

/// Rejects non-finite configuration vectors without normalizing them.
pub fn checked_finite(v: &Vector3<f64>, what: &'static str) -> Result<Vector3<f64>, ConfigError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(*v)
    } else {
        Err(ConfigError::NonFiniteVector { what })
    }
}

/// Angle between two vectors in [0, pi].
///
/// Returns `None` when either vector is degenerate; callers treat that as
/// "no information this tick" rather than an error.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let a = Unit::try_new(*a, MIN_NORM)?;
    let b = Unit::try_new(*b, MIN_NORM)?;
    Some(a.into_inner().dot(&b.into_inner()).clamp(-1.0, 1.0).acos())
}

/// Builds two unit vectors that complete `axis` into a right-handed orthonormal triad
/// `(axis, first, second)`.
///
/// The helper axis is the canonical axis least aligned with `axis`, so a boresight
/// along +X yields (+Y, +Z) and one along +Z yields (+X, +Y).
pub fn orthonormal_pair(axis: &Unit<Vector3<f64>>) -> (Unit<Vector3<f64>>, Unit<Vector3<f64>>) {
    let a = axis.into_inner();
    let helper = if a.x.abs() <= a.y.abs() && a.x.abs() <= a.z.abs() {
        Vector3::x()
    } else if a.y.abs() <= a.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    // The helper is never parallel to a unit axis, so the projection is non-zero.
    let first = Unit::new_normalize(helper - a * helper.dot(&a));
    let second = Unit::new_normalize(a.cross(&first.into_inner()));
    (first, second)
}

/// Validates a half-angle in radians against `[0, max]`.
pub fn checked_half_angle(value: f64, max: f64, what: &'static str) -> Result<f64, ConfigError> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::AngleOutOfRange {
            what,
            value,
            min: 0.0,
            max,
        })
    }
}
