// astra_core/src/sensors/star_tracker.rs

use super::{LogField, Sample, Sensor, SensorPipeline, TimingParams};
use crate::error::ConfigError;
use crate::geometry::checked_unit;
use crate::judgement::ValidityFlag;
use crate::noise::{AttitudeNoise, SeedSource};
use crate::types::SensorContext;
use crate::visibility::{ExclusionConeModel, ExclusionZone, VisibilityModel};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Construction parameters for a [`StarTracker`]. Angles are in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct StarTrackerParams {
    /// Body-to-sensor mount rotation: `v_b = q_b2c * v_c`.
    pub q_b2c: UnitQuaternion<f64>,
    /// Line of sight in the sensor frame.
    pub sight_c: Vector3<f64>,
    /// Standard deviation of the tilt of the boresight [rad].
    pub cross_sight_std_rad: f64,
    /// Standard deviation of the roll about the boresight [rad].
    pub along_sight_std_rad: f64,
    pub exclusion_zones: Vec<ExclusionZone>,
    /// Above this body rate the tracker loses lock [rad/s]. Infinite disables the check.
    pub angular_rate_limit_rad_s: f64,
    pub timing: TimingParams,
}

impl Default for StarTrackerParams {
    fn default() -> Self {
        Self {
            q_b2c: UnitQuaternion::identity(),
            sight_c: Vector3::x(),
            cross_sight_std_rad: 0.0,
            along_sight_std_rad: 0.0,
            exclusion_zones: Vec::new(),
            angular_rate_limit_rad_s: f64::INFINITY,
            timing: TimingParams::default(),
        }
    }
}

/// An attitude sensor reporting the inertial-to-sensor quaternion.
#[derive(Debug, Clone)]
pub struct StarTracker {
    id: u32,
    name: String,
    q_b2c: UnitQuaternion<f64>,
    noise: AttitudeNoise,
    pipeline: SensorPipeline<Quaternion<f64>>,
}

impl StarTracker {
    /// Draws the noise seeds from `seeds` in the order phase, cross-boresight, along-sight.
    pub fn new(id: u32, params: &StarTrackerParams, seeds: &mut SeedSource) -> Result<Self, ConfigError> {
        let sight_c = checked_unit(&params.sight_c, "star tracker sight direction")?;
        let model = ExclusionConeModel::new(
            &params.q_b2c,
            &params.sight_c,
            params.exclusion_zones.clone(),
            params.angular_rate_limit_rad_s,
        )?;
        let noise = AttitudeNoise::new(sight_c, params.cross_sight_std_rad, params.along_sight_std_rad, seeds)?;
        let name = format!("stt{id}");
        let pipeline = SensorPipeline::new(name.clone(), VisibilityModel::ExclusionCone(model), &params.timing)?;
        Ok(Self {
            id,
            name,
            q_b2c: params.q_b2c,
            noise,
            pipeline,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// The published measurement, or the all-zero sentinel.
    pub fn measured_quaternion_i2c(&self) -> &Quaternion<f64> {
        self.pipeline.output()
    }

    /// The published measurement as a rotation, `None` while it holds the sentinel.
    pub fn measured_attitude(&self) -> Option<UnitQuaternion<f64>> {
        let q = self.pipeline.output();
        if q.is_unavailable() {
            None
        } else {
            Some(UnitQuaternion::new_normalize(*q))
        }
    }

    pub fn noise_seeds(&self) -> [u64; 3] {
        self.noise.seeds()
    }

    pub fn pipeline(&self) -> &SensorPipeline<Quaternion<f64>> {
        &self.pipeline
    }
}

impl Sensor for StarTracker {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self, ctx: &SensorContext<'_>) {
        let q_b2c = self.q_b2c;
        let noise = &mut self.noise;
        self.pipeline
            .step(ctx, |truth| noise.perturb(&(truth.attitude_i2b * q_b2c)).into_inner());
    }

    fn log_header(&self) -> Vec<String> {
        let prefix = format!("{}_measured_quaternion_i2c", self.name);
        let mut header: Vec<String> = ["x", "y", "z", "w"]
            .iter()
            .map(|axis| format!("{prefix}({axis})"))
            .collect();
        header.push(format!("{}_error_flag", self.name));
        header
    }

    fn log_values(&self) -> Vec<LogField> {
        let q = self.pipeline.output();
        vec![
            LogField::Float(q.i),
            LogField::Float(q.j),
            LogField::Float(q.k),
            LogField::Float(q.w),
            LogField::Flag(self.pipeline.validity().is_invalid()),
        ]
    }

    fn validity(&self) -> &ValidityFlag {
        self.pipeline.validity()
    }

    /// Attitude sensors have no target catalog.
    fn visible_count(&self) -> usize {
        self.pipeline.visible_count()
    }
}
