// astra_core/src/types.rs

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Truth State ---

/// A read-only snapshot of the spacecraft's exact physical state for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrueState {
    /// Spacecraft centre of mass in the inertial frame [m].
    pub position_i: Vector3<f64>,
    /// Inertial-to-body attitude. Maps body components onto inertial ones:
    /// `v_i = attitude_i2b * v_b`.
    pub attitude_i2b: UnitQuaternion<f64>,
    /// Angular velocity of the body frame, expressed in the body frame [rad/s].
    pub angular_velocity_b: Vector3<f64>,
}

impl Default for TrueState {
    fn default() -> Self {
        Self {
            position_i: Vector3::zeros(),
            attitude_i2b: UnitQuaternion::identity(),
            angular_velocity_b: Vector3::zeros(),
        }
    }
}

/// The named bodies a sensor can be blinded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CelestialBody {
    Sun,
    Earth,
    Moon,
}

impl CelestialBody {
    pub const ALL: [CelestialBody; 3] = [CelestialBody::Sun, CelestialBody::Earth, CelestialBody::Moon];

    pub fn as_str(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "sun",
            CelestialBody::Earth => "earth",
            CelestialBody::Moon => "moon",
        }
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Core Traits for External Collaborators ---

/// The contract for whatever owns the truth state (a propagator, a replay, a test mock).
/// Sensors only ever read from it.
pub trait TruthStateProvider {
    /// The current truth snapshot.
    fn true_state(&self) -> TrueState;

    /// Position of `body` relative to the spacecraft, expressed in the body frame [m].
    fn celestial_position_b(&self, body: CelestialBody) -> Vector3<f64>;
}

/// A catalog of candidate targets (e.g. GNSS satellites) for cone-model antennas.
pub trait TargetCatalog {
    /// Number of targets in the catalog.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifier of the target at `index`, e.g. `"G07"`.
    fn id(&self, index: usize) -> &str;

    /// Inertial position of the target at `index` [m].
    fn position_i(&self, index: usize) -> Vector3<f64>;
}

/// Everything a sensor may look at during one tick.
/// Created by the scheduler and borrowed for the duration of the tick only.
#[derive(Clone, Copy)]
pub struct SensorContext<'a> {
    pub truth: &'a dyn TruthStateProvider,
    pub catalog: Option<&'a dyn TargetCatalog>,
}

impl<'a> SensorContext<'a> {
    pub fn new(truth: &'a dyn TruthStateProvider) -> Self {
        Self {
            truth,
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a dyn TargetCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }
}
