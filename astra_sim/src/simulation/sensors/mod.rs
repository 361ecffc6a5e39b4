// astra_sim/src/simulation/sensors/mod.rs

//! Builders that turn resolved sensor configs into running `astra_core` sensors.

pub mod gnss_receiver;
pub mod star_tracker;

use astra_core::prelude::*;

use crate::error::SimError;
use crate::simulation::config::structs::{SensorConfig, TimingConfig};
use crate::simulation::core::scheduler::SensorSlot;

/// Builds every sensor in scenario order, drawing noise seeds from `seeds`.
///
/// Seeds are drawn in the same order as the sensors appear in the scenario,
/// so the same master seed reproduces the same noise.
pub fn build_sensors(configs: &[SensorConfig], base_step_s: f64, seeds: &mut SeedSource) -> Result<Vec<SensorSlot>, SimError> {
    configs
        .iter()
        .map(|config| match config {
            SensorConfig::StarTracker(c) => star_tracker::build(c, base_step_s, seeds),
            SensorConfig::GnssReceiver(c) => gnss_receiver::build(c, base_step_s, seeds),
        })
        .collect()
}

/// Converts scheduler-level timing into the sensor's own timing parameters.
pub(crate) fn timing_params(timing: &TimingConfig, base_step_s: f64) -> Result<(Prescaler, TimingParams), ConfigError> {
    let prescaler = Prescaler::new(timing.prescaler)?;
    let params = TimingParams {
        step_period_s: prescaler.step_period_s(base_step_s),
        output_delay_s: timing.output_delay_s,
        output_interval: timing.output_interval,
    };
    Ok((prescaler, params))
}
