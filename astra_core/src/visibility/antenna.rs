// astra_core/src/visibility/antenna.rs

use super::{RejectionCounts, TargetObservation};
use crate::constants::WGS84_EQUATORIAL_RADIUS_M;
use crate::error::ConfigError;
use crate::geometry::{checked_finite, checked_half_angle, checked_unit, MIN_NORM};
use crate::types::{TargetCatalog, TruthStateProvider};
use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;
use std::fmt;

// =========================================================================
// == Target Filter ==
// =========================================================================

/// Accepts targets whose identifier starts with one of a set of constellation letters.
///
/// `"G"` accepts GPS only, `"GE"` accepts GPS and Galileo, and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFilter {
    letters: String,
}

impl TargetFilter {
    pub fn new(letters: &str) -> Result<Self, ConfigError> {
        if letters.is_empty() {
            return Err(ConfigError::EmptyTargetFilter);
        }
        Ok(Self {
            letters: letters.to_owned(),
        })
    }

    /// Empty identifiers are never accepted.
    pub fn accepts(&self, id: &str) -> bool {
        id.chars().next().is_some_and(|c| self.letters.contains(c))
    }

    pub fn as_str(&self) -> &str {
        &self.letters
    }
}

impl fmt::Display for TargetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters)
    }
}

// =========================================================================
// == Sphere Occlusion ==
// =========================================================================

/// Whether the straight segment from `antenna_i` to `target_i` clears a sphere of
/// `radius` centred at the inertial origin.
///
/// When the two position vectors lie in the same half-space the segment cannot pass
/// behind the sphere and the test is skipped. Otherwise the sphere centre is projected
/// onto the segment and the closest-approach distance compared against `radius`.
pub fn line_of_sight_clear(antenna_i: &Vector3<f64>, target_i: &Vector3<f64>, radius: f64) -> bool {
    if antenna_i.dot(target_i) > 0.0 {
        return true;
    }
    let los = target_i - antenna_i;
    let range = los.norm();
    if range < MIN_NORM {
        return antenna_i.norm() >= radius;
    }
    let direction = los / range;
    let along = (-antenna_i).dot(&direction).clamp(0.0, range);
    let closest = antenna_i + direction * along;
    closest.norm() >= radius
}

// =========================================================================
// == Cone + Occlusion Model ==
// =========================================================================

/// Field-of-view cone around the antenna boresight, with the earth as an occluding sphere.
#[derive(Debug, Clone)]
pub struct ConeOcclusionModel {
    q_b2c: UnitQuaternion<f64>,
    boresight_b: Unit<Vector3<f64>>,
    mount_offset_b: Vector3<f64>,
    half_angle_rad: f64,
    cos_half_angle: f64,
    filter: TargetFilter,
    occluder_radius_m: f64,
}

impl ConeOcclusionModel {
    pub fn new(
        q_b2c: &UnitQuaternion<f64>,
        boresight_c: &Vector3<f64>,
        mount_offset_b: &Vector3<f64>,
        half_angle_rad: f64,
        filter: TargetFilter,
    ) -> Result<Self, ConfigError> {
        let boresight_c = checked_unit(boresight_c, "antenna boresight")?;
        let mount_offset_b = checked_finite(mount_offset_b, "antenna mount offset")?;
        let half_angle_rad = checked_half_angle(half_angle_rad, PI, "antenna half-cone angle")?;
        Ok(Self {
            q_b2c: *q_b2c,
            boresight_b: q_b2c * boresight_c,
            mount_offset_b,
            half_angle_rad,
            cos_half_angle: half_angle_rad.cos(),
            filter,
            occluder_radius_m: WGS84_EQUATORIAL_RADIUS_M,
        })
    }

    /// Replaces the default WGS84 occluding sphere.
    pub fn with_occluder_radius(mut self, radius_m: f64) -> Result<Self, ConfigError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(ConfigError::InvalidBodyRadius(radius_m));
        }
        self.occluder_radius_m = radius_m;
        Ok(self)
    }

    pub fn half_angle_rad(&self) -> f64 {
        self.half_angle_rad
    }

    pub fn filter(&self) -> &TargetFilter {
        &self.filter
    }

    pub fn occluder_radius_m(&self) -> f64 {
        self.occluder_radius_m
    }

    /// Tests every catalog target and returns the visible ones plus rejection counts.
    ///
    /// The cone and occlusion tests are independent; both are evaluated for every
    /// compatible target and a target is visible only if it passes both.
    pub fn scan(
        &self,
        truth: &dyn TruthStateProvider,
        catalog: Option<&dyn TargetCatalog>,
    ) -> (Vec<TargetObservation>, RejectionCounts) {
        let mut visible = Vec::new();
        let mut counts = RejectionCounts::default();
        let Some(catalog) = catalog else {
            return (visible, counts);
        };

        let state = truth.true_state();
        let q_i2c = state.attitude_i2b * self.q_b2c;
        let boresight_i = (state.attitude_i2b * self.boresight_b).into_inner();
        let antenna_i = state.position_i + state.attitude_i2b * self.mount_offset_b;

        for index in 0..catalog.len() {
            let id = catalog.id(index);
            if !self.filter.accepts(id) {
                counts.filtered += 1;
                continue;
            }
            let target_i = catalog.position_i(index);
            let los_i = target_i - antenna_i;
            let range = los_i.norm();

            // A target on top of the antenna has no direction; it cannot be inside the cone.
            let in_cone = range >= MIN_NORM && boresight_i.dot(&(los_i / range)) > self.cos_half_angle;
            let clear = line_of_sight_clear(&antenna_i, &target_i, self.occluder_radius_m);

            if !in_cone {
                counts.outside_fov += 1;
            }
            if !clear {
                counts.occluded += 1;
            }
            if in_cone && clear {
                let los_c = q_i2c.inverse_transform_vector(&los_i);
                visible.push(TargetObservation {
                    id: id.to_owned(),
                    azimuth_rad: los_c.y.atan2(los_c.x),
                    elevation_rad: los_c.z.atan2(los_c.x.hypot(los_c.y)),
                    range_m: range,
                });
            }
        }
        (visible, counts)
    }
}

// =========================================================================
// == Hemisphere Model ==
// =========================================================================

/// The simplest antenna: it sees the sky whenever its boresight points away from
/// the earth's centre, i.e. `dot(position_i, boresight_i) > 0`.
#[derive(Debug, Clone)]
pub struct HemisphereModel {
    boresight_b: Unit<Vector3<f64>>,
}

impl HemisphereModel {
    pub fn new(q_b2c: &UnitQuaternion<f64>, boresight_c: &Vector3<f64>) -> Result<Self, ConfigError> {
        let boresight_c = checked_unit(boresight_c, "antenna boresight")?;
        Ok(Self {
            boresight_b: q_b2c * boresight_c,
        })
    }

    pub fn facing_sky(&self, truth: &dyn TruthStateProvider) -> bool {
        let state = truth.true_state();
        let boresight_i = state.attitude_i2b * self.boresight_b;
        state.position_i.dot(&boresight_i.into_inner()) > 0.0
    }
}
