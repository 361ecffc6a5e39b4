// astra_sim/src/simulation/core/truth.rs

//! A closed-form stand-in for the dynamics: circular orbits, constant-rate attitude,
//! and a sun and moon held at fixed inertial directions.

use astra_core::constants::{ASTRONOMICAL_UNIT_M, EARTH_GRAVITATIONAL_CONSTANT_M3_S2, EARTH_MOON_DISTANCE_M};
use astra_core::prelude::*;
use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::error::SimError;
use crate::simulation::config::structs::{ConstellationConfig, EnvironmentConfig, OrbitConfig, SpacecraftConfig};

// =========================================================================
// == Circular Orbit ==
// =========================================================================

#[derive(Debug, Clone, Copy)]
pub struct CircularOrbit {
    radius_m: f64,
    /// In-plane unit vectors: ascending node and 90 deg ahead of it.
    node_i: Vector3<f64>,
    ahead_i: Vector3<f64>,
    phase0_rad: f64,
    mean_motion_rad_s: f64,
}

impl CircularOrbit {
    pub fn new(radius_m: f64, inclination_rad: f64, raan_rad: f64, phase0_rad: f64) -> Self {
        let plane = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), raan_rad)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), inclination_rad);
        Self {
            radius_m,
            node_i: plane * Vector3::x(),
            ahead_i: plane * Vector3::y(),
            phase0_rad,
            mean_motion_rad_s: (EARTH_GRAVITATIONAL_CONSTANT_M3_S2 / radius_m.powi(3)).sqrt(),
        }
    }

    pub fn from_config(config: &OrbitConfig) -> Self {
        Self::new(
            config.radius_m,
            config.inclination_deg.to_radians(),
            config.raan_deg.to_radians(),
            config.phase_deg.to_radians(),
        )
    }

    /// Inertial position at `t` seconds [m].
    pub fn position(&self, t: f64) -> Vector3<f64> {
        let u = self.phase0_rad + self.mean_motion_rad_s * t;
        (self.node_i * u.cos() + self.ahead_i * u.sin()) * self.radius_m
    }

    pub fn period_s(&self) -> f64 {
        std::f64::consts::TAU / self.mean_motion_rad_s
    }
}

// =========================================================================
// == Spacecraft Truth ==
// =========================================================================

/// The truth-state provider the scheduler hands to every sensor.
#[derive(Debug, Clone)]
pub struct AnalyticTruth {
    orbit: CircularOrbit,
    initial_attitude_i2b: UnitQuaternion<f64>,
    angular_velocity_b: Vector3<f64>,
    sun_direction_i: Unit<Vector3<f64>>,
    moon_direction_i: Unit<Vector3<f64>>,
    time_s: f64,
    state: TrueState,
}

impl AnalyticTruth {
    pub fn new(spacecraft: &SpacecraftConfig, environment: &EnvironmentConfig) -> Result<Self, SimError> {
        let direction = |v: &Vector3<f64>, what: &str| {
            Unit::try_new(*v, astra_core::geometry::MIN_NORM)
                .ok_or_else(|| SimError::Scenario(format!("{what} direction must not be zero")))
        };
        let mut truth = Self {
            orbit: CircularOrbit::from_config(&spacecraft.orbit),
            initial_attitude_i2b: spacecraft.attitude.initial_deg,
            angular_velocity_b: spacecraft.attitude.angular_velocity_deg_s.map(f64::to_radians),
            sun_direction_i: direction(&environment.sun_direction, "sun")?,
            moon_direction_i: direction(&environment.moon_direction, "moon")?,
            time_s: 0.0,
            state: TrueState::default(),
        };
        truth.advance_to(0.0);
        Ok(truth)
    }

    /// Recomputes the truth snapshot for simulated time `t`.
    pub fn advance_to(&mut self, t: f64) {
        self.time_s = t;
        // Constant body rate: q(t) = q0 * exp(w_b * t).
        let rotation = UnitQuaternion::from_scaled_axis(self.angular_velocity_b * t);
        self.state = TrueState {
            position_i: self.orbit.position(t),
            attitude_i2b: self.initial_attitude_i2b * rotation,
            angular_velocity_b: self.angular_velocity_b,
        };
    }

    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    pub fn orbit(&self) -> &CircularOrbit {
        &self.orbit
    }

    fn body_position_i(&self, body: CelestialBody) -> Vector3<f64> {
        match body {
            CelestialBody::Sun => self.sun_direction_i.into_inner() * ASTRONOMICAL_UNIT_M,
            CelestialBody::Earth => Vector3::zeros(),
            CelestialBody::Moon => self.moon_direction_i.into_inner() * EARTH_MOON_DISTANCE_M,
        }
    }
}

impl TruthStateProvider for AnalyticTruth {
    fn true_state(&self) -> TrueState {
        self.state
    }

    fn celestial_position_b(&self, body: CelestialBody) -> Vector3<f64> {
        let relative_i = self.body_position_i(body) - self.state.position_i;
        self.state.attitude_i2b.inverse_transform_vector(&relative_i)
    }
}

// =========================================================================
// == Navigation Constellation ==
// =========================================================================

#[derive(Debug, Clone)]
struct NavigationSatellite {
    id: String,
    orbit: CircularOrbit,
}

/// Every navigation satellite in the scenario, with positions cached per tick.
#[derive(Debug, Clone, Default)]
pub struct GnssConstellation {
    satellites: Vec<NavigationSatellite>,
    positions_i: Vec<Vector3<f64>>,
}

impl GnssConstellation {
    /// Spreads each shell's planes evenly in RAAN and its satellites evenly in phase,
    /// with a half-slot offset between adjacent planes.
    pub fn from_config(shells: &[ConstellationConfig]) -> Self {
        let mut satellites = Vec::new();
        for shell in shells {
            let planes = shell.planes;
            let per_plane = shell.satellites_per_plane;
            let slot = std::f64::consts::TAU / f64::from(per_plane);
            for plane in 0..planes {
                let raan = std::f64::consts::TAU * f64::from(plane) / f64::from(planes);
                for k in 0..per_plane {
                    let phase = slot * (f64::from(k) + 0.5 * f64::from(plane % 2));
                    let number = plane * per_plane + k + 1;
                    satellites.push(NavigationSatellite {
                        id: format!("{}{:02}", shell.prefix, number),
                        orbit: CircularOrbit::new(shell.radius_m, shell.inclination_deg.to_radians(), raan, phase),
                    });
                }
            }
        }
        let mut constellation = Self {
            positions_i: vec![Vector3::zeros(); satellites.len()],
            satellites,
        };
        constellation.advance_to(0.0);
        constellation
    }

    pub fn advance_to(&mut self, t: f64) {
        for (position, satellite) in self.positions_i.iter_mut().zip(&self.satellites) {
            *position = satellite.orbit.position(t);
        }
    }
}

impl TargetCatalog for GnssConstellation {
    fn len(&self) -> usize {
        self.satellites.len()
    }

    fn id(&self, index: usize) -> &str {
        &self.satellites[index].id
    }

    fn position_i(&self, index: usize) -> Vector3<f64> {
        self.positions_i[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::structs::AttitudeConfig;
    use approx::assert_abs_diff_eq;

    #[test]
    fn circular_orbit_keeps_radius_and_period() {
        let orbit = CircularOrbit::new(7.0e6, 0.9, 0.3, 0.1);
        for t in [0.0, 100.0, 2500.0] {
            assert_abs_diff_eq!(orbit.position(t).norm(), 7.0e6, epsilon = 1e-3);
        }
        let period = orbit.period_s();
        assert_abs_diff_eq!(orbit.position(period), orbit.position(0.0), epsilon = 1e-3);
        // Roughly 97 minutes in low earth orbit.
        assert!((5_500.0..6_000.0).contains(&period));
    }

    #[test]
    fn earth_is_opposite_the_position_in_body_frame() {
        let spacecraft = SpacecraftConfig {
            orbit: OrbitConfig {
                radius_m: 7.0e6,
                inclination_deg: 0.0,
                raan_deg: 0.0,
                phase_deg: 0.0,
            },
            attitude: AttitudeConfig {
                initial_deg: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2),
                angular_velocity_deg_s: Vector3::zeros(),
            },
        };
        let truth = AnalyticTruth::new(&spacecraft, &EnvironmentConfig::default()).unwrap();
        // Spacecraft on +X inertial; body +X is inertial +Y, so inertial -X is body +Y.
        let earth_b = truth.celestial_position_b(CelestialBody::Earth);
        assert_abs_diff_eq!(earth_b, Vector3::new(0.0, 7.0e6, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn constant_body_rate_integrates_attitude() {
        let mut spacecraft = SpacecraftConfig::default();
        spacecraft.attitude.angular_velocity_deg_s = Vector3::new(0.0, 0.0, 1.0);
        let mut truth = AnalyticTruth::new(&spacecraft, &EnvironmentConfig::default()).unwrap();
        truth.advance_to(90.0);
        let state = truth.true_state();
        assert_abs_diff_eq!(state.attitude_i2b * Vector3::x(), Vector3::y(), epsilon = 1e-12);
        assert_abs_diff_eq!(state.angular_velocity_b.z, 1f64.to_radians(), epsilon = 1e-15);
    }

    #[test]
    fn zero_sun_direction_is_rejected() {
        let environment = EnvironmentConfig {
            sun_direction: Vector3::zeros(),
            ..EnvironmentConfig::default()
        };
        assert!(AnalyticTruth::new(&SpacecraftConfig::default(), &environment).is_err());
    }

    #[test]
    fn constellation_ids_and_radii() {
        let constellation = GnssConstellation::from_config(&[ConstellationConfig {
            prefix: "G".to_string(),
            planes: 6,
            satellites_per_plane: 4,
            radius_m: 2.656e7,
            inclination_deg: 55.0,
        }]);
        assert_eq!(constellation.len(), 24);
        assert_eq!(constellation.id(0), "G01");
        assert_eq!(constellation.id(23), "G24");
        for i in 0..constellation.len() {
            assert_abs_diff_eq!(constellation.position_i(i).norm(), 2.656e7, epsilon = 1e-3);
        }
    }
}
