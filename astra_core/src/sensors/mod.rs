// astra_core/src/sensors/mod.rs

use crate::delay::{DelayBuffer, DelayTiming, OutputThrottle};
use crate::error::ConfigError;
use crate::judgement::{JudgementAggregator, ValidityFlag};
use crate::types::{SensorContext, TrueState};
use crate::visibility::{VisibilityModel, VisibilityResult};
use downcast_rs::{impl_downcast, Downcast};
use dyn_clone::DynClone;
use nalgebra::{Quaternion, Vector3};
use std::fmt::{self, Debug};

pub mod gnss_receiver;
pub mod star_tracker;

pub use gnss_receiver::{AntennaPattern, GnssReceiver, GnssReceiverParams};
pub use star_tracker::{StarTracker, StarTrackerParams};

// =========================================================================
// == Sensor Capability ==
// =========================================================================

/// One value in a telemetry row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogField {
    Float(f64),
    Flag(bool),
    Count(usize),
}

impl fmt::Display for LogField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogField::Float(v) => write!(f, "{v}"),
            LogField::Flag(b) => f.write_str(if *b { "1" } else { "0" }),
            LogField::Count(n) => write!(f, "{n}"),
        }
    }
}

/// The contract every simulated sensor fulfils towards the scheduler and the logger.
///
/// Header and value accessors are side-effect free; calling them any number of
/// times between ticks returns identical results.
pub trait Sensor: DynClone + Downcast + Debug + Send + Sync {
    /// Unique instance name, used in log messages.
    fn name(&self) -> &str;

    /// Runs one tick of the sensor against the current truth.
    fn tick(&mut self, ctx: &SensorContext<'_>);

    /// Column names, in the same order as [`Sensor::log_values`].
    fn log_header(&self) -> Vec<String>;

    /// The currently published output, one field per header column.
    fn log_values(&self) -> Vec<LogField>;

    /// The validity flag published on the last refresh.
    fn validity(&self) -> &ValidityFlag;

    /// Number of visible targets published on the last refresh.
    fn visible_count(&self) -> usize;
}

// This macro automatically generates the implementation of `Clone` for `Box<dyn Sensor>`.
dyn_clone::clone_trait_object!(Sensor);
impl_downcast!(Sensor);

// =========================================================================
// == Shared Pipeline ==
// =========================================================================

/// A measurement type that can stand in for "no measurement".
pub trait Sample: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The sentinel written while the sensor cannot see.
    fn unavailable() -> Self;

    fn is_unavailable(&self) -> bool {
        *self == Self::unavailable()
    }
}

/// Position fixes use the exact zero vector.
impl Sample for Vector3<f64> {
    fn unavailable() -> Self {
        Vector3::zeros()
    }
}

/// Attitude measurements use the all-zero quaternion, which no rotation can produce.
impl Sample for Quaternion<f64> {
    fn unavailable() -> Self {
        Quaternion::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Timing parameters common to every sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingParams {
    /// The sensor's own step period [s] (base step times prescaler).
    pub step_period_s: f64,
    /// Latency between a sample being taken and it becoming readable [s].
    pub output_delay_s: f64,
    /// Number of sensor ticks between output refreshes.
    pub output_interval: u32,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            step_period_s: 0.1,
            output_delay_s: 0.0,
            output_interval: 1,
        }
    }
}

/// The per-tick sequence shared by every sensor: visibility, synthesis or sentinel,
/// delay, and on interval boundaries judgement plus output refresh.
#[derive(Debug, Clone)]
pub struct SensorPipeline<T: Sample> {
    label: String,
    visibility: VisibilityModel,
    timing: DelayTiming,
    buffer: DelayBuffer<T>,
    throttle: OutputThrottle,
    output: T,
    validity: ValidityFlag,
    published_count: usize,
    last_visibility: VisibilityResult,
    ticks: u64,
}

impl<T: Sample> SensorPipeline<T> {
    pub fn new(label: impl Into<String>, visibility: VisibilityModel, params: &TimingParams) -> Result<Self, ConfigError> {
        let timing = DelayTiming::new(params.step_period_s, params.output_delay_s)?;
        let throttle = OutputThrottle::new(params.output_interval)?;
        Ok(Self {
            label: label.into(),
            visibility,
            timing,
            buffer: DelayBuffer::new(timing.capacity, T::unavailable()),
            throttle,
            output: T::unavailable(),
            validity: ValidityFlag::unjudged(),
            published_count: 0,
            last_visibility: VisibilityResult::default(),
            ticks: 0,
        })
    }

    /// Runs one tick. `synthesize` is only called when the geometry allows a
    /// measurement; otherwise the sentinel is written.
    ///
    /// Returns `true` when the externally visible output was refreshed.
    pub fn step<F>(&mut self, ctx: &SensorContext<'_>, synthesize: F) -> bool
    where
        F: FnOnce(&TrueState) -> T,
    {
        let truth = ctx.truth.true_state();
        let result = self.visibility.evaluate(ctx);

        let sample = if result.visible {
            synthesize(&truth)
        } else {
            T::unavailable()
        };
        self.buffer.push(sample);

        let refreshed = self.throttle.tick();
        if refreshed {
            let flag = JudgementAggregator::aggregate(&result.signals);
            if flag.is_invalid() != self.validity.is_invalid() || self.ticks == 0 {
                tracing::debug!(
                    sensor = %self.label,
                    tick = self.ticks,
                    valid = flag.is_valid(),
                    raised = ?flag.raised_criteria().map(|c| c.to_string()).collect::<Vec<_>>(),
                    "validity changed"
                );
            }
            // An invalid refresh never exposes an older fix next to its flag.
            self.output = if flag.is_invalid() {
                T::unavailable()
            } else {
                self.buffer.delayed(self.timing.delay_ticks).clone()
            };
            self.validity = flag;
            self.published_count = result.visible_count();
        }

        self.last_visibility = result;
        self.ticks += 1;
        refreshed
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn output(&self) -> &T {
        &self.output
    }

    pub fn validity(&self) -> &ValidityFlag {
        &self.validity
    }

    pub fn visible_count(&self) -> usize {
        self.published_count
    }

    /// The geometry evaluated on the most recent tick, refresh or not.
    pub fn last_visibility(&self) -> &VisibilityResult {
        &self.last_visibility
    }

    pub fn visibility_model(&self) -> &VisibilityModel {
        &self.visibility
    }

    pub fn timing(&self) -> DelayTiming {
        self.timing
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
