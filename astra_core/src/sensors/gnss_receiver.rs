// astra_core/src/sensors/gnss_receiver.rs

use super::{LogField, Sensor, SensorPipeline, TimingParams};
use crate::constants::WGS84_EQUATORIAL_RADIUS_M;
use crate::error::ConfigError;
use crate::judgement::ValidityFlag;
use crate::noise::{PositionNoise, SeedSource};
use crate::types::SensorContext;
use crate::visibility::{ConeOcclusionModel, HemisphereModel, TargetFilter, TargetObservation, VisibilityModel};
use nalgebra::{UnitQuaternion, Vector3};

/// How the receiver antenna decides whether it can see the constellation.
#[derive(Debug, Clone, PartialEq)]
pub enum AntennaPattern {
    /// Visible whenever the boresight points away from the earth's centre.
    Hemisphere,
    /// Per-satellite cone field of view with earth occlusion.
    Cone {
        half_angle_rad: f64,
        /// Constellation letters the receiver tracks, e.g. `"GE"`.
        target_filter: String,
        occluder_radius_m: f64,
    },
}

/// Construction parameters for a [`GnssReceiver`].
#[derive(Debug, Clone, PartialEq)]
pub struct GnssReceiverParams {
    /// Body-to-antenna mount rotation: `v_b = q_b2c * v_c`.
    pub q_b2c: UnitQuaternion<f64>,
    /// Antenna boresight in the antenna frame.
    pub boresight_c: Vector3<f64>,
    /// Antenna phase centre relative to the centre of mass, body frame [m].
    pub mount_offset_b: Vector3<f64>,
    pub antenna: AntennaPattern,
    /// Per-axis position noise [m].
    pub position_std_m: Vector3<f64>,
    pub timing: TimingParams,
}

impl Default for GnssReceiverParams {
    fn default() -> Self {
        Self {
            q_b2c: UnitQuaternion::identity(),
            boresight_c: Vector3::z(),
            mount_offset_b: Vector3::zeros(),
            antenna: AntennaPattern::Cone {
                half_angle_rad: std::f64::consts::FRAC_PI_2,
                target_filter: "G".to_string(),
                occluder_radius_m: WGS84_EQUATORIAL_RADIUS_M,
            },
            position_std_m: Vector3::zeros(),
            timing: TimingParams::default(),
        }
    }
}

/// A position sensor reporting the spacecraft's inertial position whenever at
/// least one satellite (or the open sky, for the hemisphere pattern) is visible.
#[derive(Debug, Clone)]
pub struct GnssReceiver {
    id: u32,
    name: String,
    noise: PositionNoise,
    pipeline: SensorPipeline<Vector3<f64>>,
}

impl GnssReceiver {
    /// Draws three seeds from `seeds`, one per position axis.
    pub fn new(id: u32, params: &GnssReceiverParams, seeds: &mut SeedSource) -> Result<Self, ConfigError> {
        let model = match &params.antenna {
            AntennaPattern::Hemisphere => VisibilityModel::Hemisphere(HemisphereModel::new(&params.q_b2c, &params.boresight_c)?),
            AntennaPattern::Cone {
                half_angle_rad,
                target_filter,
                occluder_radius_m,
            } => VisibilityModel::ConeOcclusion(
                ConeOcclusionModel::new(
                    &params.q_b2c,
                    &params.boresight_c,
                    &params.mount_offset_b,
                    *half_angle_rad,
                    TargetFilter::new(target_filter)?,
                )?
                .with_occluder_radius(*occluder_radius_m)?,
            ),
        };
        let noise = PositionNoise::new(params.position_std_m, seeds)?;
        let name = format!("gnss{id}");
        let pipeline = SensorPipeline::new(name.clone(), model, &params.timing)?;
        Ok(Self {
            id,
            name,
            noise,
            pipeline,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// The published position fix, or the zero vector.
    pub fn position_i(&self) -> &Vector3<f64> {
        self.pipeline.output()
    }

    /// Satellites seen on the most recent tick, in the antenna frame.
    pub fn visible_targets(&self) -> &[TargetObservation] {
        &self.pipeline.last_visibility().targets
    }

    pub fn noise_seeds(&self) -> [u64; 3] {
        self.noise.seeds()
    }

    pub fn pipeline(&self) -> &SensorPipeline<Vector3<f64>> {
        &self.pipeline
    }
}

impl Sensor for GnssReceiver {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self, ctx: &SensorContext<'_>) {
        let noise = &mut self.noise;
        self.pipeline.step(ctx, |truth| noise.apply(&truth.position_i));
    }

    fn log_header(&self) -> Vec<String> {
        let mut header: Vec<String> = ["x", "y", "z"]
            .iter()
            .map(|axis| format!("{}_position_eci({axis})[m]", self.name))
            .collect();
        header.push(format!("{}_vis_flag", self.name));
        header.push(format!("{}_vis_num", self.name));
        header
    }

    fn log_values(&self) -> Vec<LogField> {
        let p = self.pipeline.output();
        vec![
            LogField::Float(p.x),
            LogField::Float(p.y),
            LogField::Float(p.z),
            LogField::Flag(self.pipeline.validity().is_valid()),
            LogField::Count(self.pipeline.visible_count()),
        ]
    }

    fn validity(&self) -> &ValidityFlag {
        self.pipeline.validity()
    }

    fn visible_count(&self) -> usize {
        self.pipeline.visible_count()
    }
}
