// astra_core/src/visibility/exclusion.rs

use crate::constants::EARTH_EQUATORIAL_RADIUS_M;
use crate::error::ConfigError;
use crate::geometry::{angle_between, checked_half_angle, checked_unit};
use crate::judgement::{Criterion, CriterionSignal};
use crate::types::{CelestialBody, TruthStateProvider};
use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// The cone around one body inside which the sensor is blinded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionZone {
    pub body: CelestialBody,
    /// Minimum allowed separation between the boresight and the body's limb [rad].
    pub half_angle_rad: f64,
    /// Physical radius of the body [m]. Zero treats the body as a point source.
    pub apparent_radius_m: f64,
}

impl ExclusionZone {
    pub fn point(body: CelestialBody, half_angle_rad: f64) -> Self {
        Self {
            body,
            half_angle_rad,
            apparent_radius_m: 0.0,
        }
    }

    /// The standard earth zone, sized by the equatorial radius.
    pub fn earth(half_angle_rad: f64) -> Self {
        Self {
            body: CelestialBody::Earth,
            half_angle_rad,
            apparent_radius_m: EARTH_EQUATORIAL_RADIUS_M,
        }
    }

    /// Angular half-size of the body seen from `range_m` away.
    pub fn apparent_half_angle(&self, range_m: f64) -> f64 {
        if self.apparent_radius_m > 0.0 {
            self.apparent_radius_m.atan2(range_m)
        } else {
            0.0
        }
    }

    /// Whether a body at `position_b` (relative to the spacecraft, body frame) blinds a
    /// boresight pointing along `sight_b`.
    ///
    /// A degenerate body vector carries no direction and never blinds the sensor.
    pub fn blinds(&self, sight_b: &Vector3<f64>, position_b: &Vector3<f64>) -> bool {
        match angle_between(sight_b, position_b) {
            Some(center_angle) => {
                let edge_angle = center_angle - self.apparent_half_angle(position_b.norm());
                edge_angle < self.half_angle_rad
            }
            None => false,
        }
    }
}

/// Exclusion-cone visibility for attitude sensors.
#[derive(Debug, Clone)]
pub struct ExclusionConeModel {
    sight_b: Unit<Vector3<f64>>,
    zones: Vec<ExclusionZone>,
    rate_limit_rad_s: f64,
}

impl ExclusionConeModel {
    /// `boresight_c` is the sight direction in the sensor frame, `q_b2c` the mount.
    pub fn new(
        q_b2c: &UnitQuaternion<f64>,
        boresight_c: &Vector3<f64>,
        zones: Vec<ExclusionZone>,
        rate_limit_rad_s: f64,
    ) -> Result<Self, ConfigError> {
        let boresight_c = checked_unit(boresight_c, "boresight")?;
        for zone in &zones {
            checked_half_angle(zone.half_angle_rad, PI, "exclusion half-angle")?;
            if !zone.apparent_radius_m.is_finite() || zone.apparent_radius_m < 0.0 {
                return Err(ConfigError::InvalidBodyRadius(zone.apparent_radius_m));
            }
        }
        if rate_limit_rad_s.is_nan() || rate_limit_rad_s < 0.0 {
            return Err(ConfigError::InvalidRateLimit(rate_limit_rad_s));
        }
        Ok(Self {
            sight_b: q_b2c * boresight_c,
            zones,
            rate_limit_rad_s,
        })
    }

    /// Boresight expressed in the body frame.
    pub fn sight_b(&self) -> &Unit<Vector3<f64>> {
        &self.sight_b
    }

    pub fn zones(&self) -> &[ExclusionZone] {
        &self.zones
    }

    /// One signal per exclusion zone, followed by the angular-rate signal.
    pub fn judge(&self, truth: &dyn TruthStateProvider) -> Vec<CriterionSignal> {
        let sight_b = self.sight_b.into_inner();
        let mut signals: Vec<CriterionSignal> = self
            .zones
            .iter()
            .map(|zone| {
                let position_b = truth.celestial_position_b(zone.body);
                CriterionSignal::new(Criterion::Exclusion(zone.body), zone.blinds(&sight_b, &position_b))
            })
            .collect();

        let rate = truth.true_state().angular_velocity_b.norm();
        signals.push(CriterionSignal::new(Criterion::AngularRate, rate > self.rate_limit_rad_s));
        signals
    }
}
