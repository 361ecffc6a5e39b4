// astra_sim/src/simulation/config/structs.rs

use astra_core::constants::WGS84_EQUATORIAL_RADIUS_M;
use astra_core::types::CelestialBody;
use figment::value::Value;
use nalgebra::{UnitQuaternion, Vector3};
use serde::Deserialize;

use crate::simulation::utils::serde_helpers;

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// The scenario file as read from disk. Sensor entries are kept as raw values
/// until their `from` references have been resolved against the catalog.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct RawScenario {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: SimulationSection,
    #[serde(default)]
    pub spacecraft: SpacecraftConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    // The TOML has `[[sensors]]`, each possibly a `{ from = "sensors.xyz" }` reference.
    #[serde(default)]
    pub sensors: Vec<Value>,
}

/// The fully resolved scenario.
#[derive(Debug, Clone, Default)]
pub struct ScenarioConfig {
    pub simulation: SimulationSection,
    pub spacecraft: SpacecraftConfig,
    pub environment: EnvironmentConfig,
    pub sensors: Vec<SensorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    /// Master seed every sensor's noise seeds are drawn from.
    #[serde(default)]
    pub seed: u64,
    /// Simulated time span [s].
    pub duration_s: f64,
    /// Period of the base tick every sensor prescaler divides [s].
    pub base_step_s: f64,
    /// Write a telemetry row every this many base ticks.
    #[serde(default = "default_log_every")]
    pub log_every: u32,
}

fn identity_rotation() -> UnitQuaternion<f64> {
    UnitQuaternion::identity()
}

fn zero_vector() -> Vector3<f64> {
    Vector3::zeros()
}

fn unit_x() -> Vector3<f64> {
    Vector3::x()
}

fn unit_z() -> Vector3<f64> {
    Vector3::z()
}

fn default_log_every() -> u32 {
    1
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            seed: 0,
            duration_s: 600.0,
            base_step_s: 0.1,
            log_every: 10,
        }
    }
}

// =========================================================================
// == Spacecraft & Environment ==
// =========================================================================

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SpacecraftConfig {
    #[serde(default)]
    pub orbit: OrbitConfig,
    #[serde(default)]
    pub attitude: AttitudeConfig,
}

/// A circular orbit about the earth's centre.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrbitConfig {
    pub radius_m: f64,
    #[serde(default)]
    pub inclination_deg: f64,
    #[serde(default)]
    pub raan_deg: f64,
    /// Argument of latitude at t = 0.
    #[serde(default)]
    pub phase_deg: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius_m: 6_378_137.0 + 550_000.0,
            inclination_deg: 97.6,
            raan_deg: 0.0,
            phase_deg: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttitudeConfig {
    /// Initial inertial-to-body attitude as `[roll, pitch, yaw]` in degrees.
    #[serde(with = "serde_helpers::quat_from_euler_deg", default = "identity_rotation")]
    pub initial_deg: UnitQuaternion<f64>,
    /// Constant body rate [deg/s].
    #[serde(with = "serde_helpers::vec3_f64_from_array", default = "zero_vector")]
    pub angular_velocity_deg_s: Vector3<f64>,
}

impl Default for AttitudeConfig {
    fn default() -> Self {
        Self {
            initial_deg: UnitQuaternion::identity(),
            angular_velocity_deg_s: Vector3::zeros(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Inertial direction of the sun; held fixed for the run.
    #[serde(with = "serde_helpers::vec3_f64_from_array", default = "default_sun_direction")]
    pub sun_direction: Vector3<f64>,
    /// Inertial direction of the moon; held fixed for the run.
    #[serde(with = "serde_helpers::vec3_f64_from_array", default = "default_moon_direction")]
    pub moon_direction: Vector3<f64>,
    #[serde(default)]
    pub constellations: Vec<ConstellationConfig>,
}

fn default_sun_direction() -> Vector3<f64> {
    Vector3::x()
}

fn default_moon_direction() -> Vector3<f64> {
    Vector3::new(-1.0, 1.0, 0.0)
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            sun_direction: default_sun_direction(),
            moon_direction: default_moon_direction(),
            constellations: Vec::new(),
        }
    }
}

/// A Walker-style shell of navigation satellites in circular orbits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstellationConfig {
    /// Single-letter system prefix used in satellite identifiers, e.g. `"G"`.
    pub prefix: String,
    pub planes: u32,
    pub satellites_per_plane: u32,
    pub radius_m: f64,
    pub inclination_deg: f64,
}

// =========================================================================
// == Sensors ==
// =========================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")] // This tells serde to use the "kind" field to decide which enum variant to parse
#[serde(rename_all = "PascalCase")]
pub enum SensorConfig {
    StarTracker(StarTrackerConfig),
    GnssReceiver(GnssReceiverConfig),
}

impl SensorConfig {
    pub fn get_kind_str(&self) -> &str {
        match self {
            SensorConfig::StarTracker(_) => "StarTracker",
            SensorConfig::GnssReceiver(_) => "GnssReceiver",
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            SensorConfig::StarTracker(c) => c.id,
            SensorConfig::GnssReceiver(c) => c.id,
        }
    }
}

fn default_prescaler() -> u32 {
    1
}

fn default_output_interval() -> u32 {
    1
}

/// Latency and cadence settings shared by every sensor kind.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Run on every n-th base tick.
    #[serde(default = "default_prescaler")]
    pub prescaler: u32,
    #[serde(default)]
    pub output_delay_s: f64,
    #[serde(default = "default_output_interval")]
    pub output_interval: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            prescaler: default_prescaler(),
            output_delay_s: 0.0,
            output_interval: default_output_interval(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExclusionZoneConfig {
    pub body: CelestialBody,
    pub half_angle_deg: f64,
    /// Defaults to the equatorial radius for the earth and a point source otherwise.
    pub apparent_radius_m: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StarTrackerConfig {
    pub id: u32,
    #[serde(with = "serde_helpers::quat_from_euler_deg", default = "identity_rotation")]
    pub mount_rotation_deg: UnitQuaternion<f64>,
    #[serde(with = "serde_helpers::vec3_f64_from_array", default = "unit_x")]
    pub sight_direction: Vector3<f64>,
    #[serde(default)]
    pub cross_sight_std_arcsec: f64,
    #[serde(default)]
    pub along_sight_std_arcsec: f64,
    #[serde(default)]
    pub exclusion: Vec<ExclusionZoneConfig>,
    /// Capture rate limit [deg/s]. Omitted means unlimited.
    pub angular_rate_limit_deg_s: Option<f64>,
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "model")]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub enum AntennaConfig {
    Hemisphere,
    Cone {
        half_angle_deg: f64,
        /// Constellation letters the receiver tracks, e.g. `"GE"`.
        targets: String,
        #[serde(default = "default_occluder_radius")]
        occluder_radius_m: f64,
    },
}

fn default_occluder_radius() -> f64 {
    WGS84_EQUATORIAL_RADIUS_M
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GnssReceiverConfig {
    pub id: u32,
    #[serde(with = "serde_helpers::quat_from_euler_deg", default = "identity_rotation")]
    pub mount_rotation_deg: UnitQuaternion<f64>,
    #[serde(with = "serde_helpers::vec3_f64_from_array", default = "unit_z")]
    pub boresight: Vector3<f64>,
    #[serde(with = "serde_helpers::vec3_f64_from_array", default = "zero_vector")]
    pub mount_offset_m: Vector3<f64>,
    pub antenna: AntennaConfig,
    #[serde(with = "serde_helpers::vec3_f64_from_array", default = "zero_vector")]
    pub position_std_m: Vector3<f64>,
    #[serde(default)]
    pub timing: TimingConfig,
}
