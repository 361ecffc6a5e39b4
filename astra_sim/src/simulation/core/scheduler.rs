// astra_sim/src/simulation/core/scheduler.rs

//! The base-tick loop: advances the truth, runs every sensor whose prescaler
//! fires, and logs telemetry.

use astra_core::prelude::*;
use std::io;

use super::telemetry::TelemetryWriter;
use super::truth::{AnalyticTruth, GnssConstellation};
use crate::error::SimError;
use crate::simulation::config::structs::ScenarioConfig;
use crate::simulation::sensors::build_sensors;

/// A sensor together with the rate at which the scheduler runs it.
#[derive(Debug, Clone)]
pub struct SensorSlot {
    prescaler: Prescaler,
    sensor: Box<dyn Sensor>,
    ticks: u64,
    valid_ticks: u64,
}

impl SensorSlot {
    pub fn new(prescaler: Prescaler, sensor: Box<dyn Sensor>) -> Self {
        Self {
            prescaler,
            sensor,
            ticks: 0,
            valid_ticks: 0,
        }
    }

    pub fn prescaler(&self) -> Prescaler {
        self.prescaler
    }

    pub fn sensor(&self) -> &dyn Sensor {
        self.sensor.as_ref()
    }
}

/// Per-sensor counters gathered over a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSummary {
    pub name: String,
    /// Times the sensor itself ran.
    pub ticks: u64,
    /// Sensor ticks after which the published flag was valid.
    pub valid_ticks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub base_ticks: u64,
    pub rows_logged: u64,
    pub sensors: Vec<SensorSummary>,
}

pub struct Scheduler {
    base_step_s: f64,
    total_ticks: u64,
    log_every: u32,
    base_tick: u64,
    truth: AnalyticTruth,
    constellation: GnssConstellation,
    slots: Vec<SensorSlot>,
}

impl Scheduler {
    /// Builds the truth, the constellation, and every sensor from a resolved scenario.
    pub fn from_scenario(scenario: &ScenarioConfig) -> Result<Self, SimError> {
        let sim = &scenario.simulation;
        let truth = AnalyticTruth::new(&scenario.spacecraft, &scenario.environment)?;
        let constellation = GnssConstellation::from_config(&scenario.environment.constellations);
        tracing::info!(
            "Scenario: orbit period {:.1} s, {} navigation satellite(s), master seed {}",
            truth.orbit().period_s(),
            constellation.len(),
            sim.seed
        );

        let mut seeds = SeedSource::new(sim.seed);
        let slots = build_sensors(&scenario.sensors, sim.base_step_s, &mut seeds)?;

        // Tick 0 is t = 0, so a run covers duration / step + 1 base ticks.
        let total_ticks = (sim.duration_s / sim.base_step_s + 1e-9).floor() as u64 + 1;
        Ok(Self {
            base_step_s: sim.base_step_s,
            total_ticks,
            log_every: sim.log_every,
            base_tick: 0,
            truth,
            constellation,
            slots,
        })
    }

    pub fn slots(&self) -> &[SensorSlot] {
        &self.slots
    }

    pub fn sensors(&self) -> impl Iterator<Item = &dyn Sensor> + '_ {
        self.slots.iter().map(SensorSlot::sensor)
    }

    pub fn base_tick(&self) -> u64 {
        self.base_tick
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn elapsed_s(&self) -> f64 {
        self.base_tick as f64 * self.base_step_s
    }

    /// Advances one base tick. Returns the simulated time the tick ran at.
    pub fn step(&mut self) -> f64 {
        let t = self.elapsed_s();
        self.truth.advance_to(t);
        self.constellation.advance_to(t);

        let ctx = SensorContext::new(&self.truth).with_catalog(&self.constellation);
        for slot in &mut self.slots {
            if !slot.prescaler.fires(self.base_tick) {
                continue;
            }
            slot.sensor.tick(&ctx);
            slot.ticks += 1;
            if slot.sensor.validity().is_valid() {
                slot.valid_ticks += 1;
            }
        }
        self.base_tick += 1;
        t
    }

    /// Runs every remaining base tick, writing a row every `log_every` ticks.
    pub fn run<W: io::Write>(&mut self, telemetry: &mut TelemetryWriter<W>) -> Result<RunSummary, SimError> {
        tracing::info!(
            "Running {} base tick(s) of {} s with {} sensor(s)",
            self.total_ticks,
            self.base_step_s,
            self.slots.len()
        );
        telemetry.write_header(self.sensors())?;

        while self.base_tick < self.total_ticks {
            let tick = self.base_tick;
            let t = self.step();
            if tick % u64::from(self.log_every) == 0 {
                telemetry.write_row(t, self.sensors())?;
            }
        }
        telemetry.flush()?;

        let summary = self.summary(telemetry.rows());
        for sensor in &summary.sensors {
            tracing::info!(
                "  {}: {} tick(s), valid after {}",
                sensor.name,
                sensor.ticks,
                sensor.valid_ticks
            );
        }
        Ok(summary)
    }

    fn summary(&self, rows_logged: u64) -> RunSummary {
        RunSummary {
            base_ticks: self.base_tick,
            rows_logged,
            sensors: self
                .slots
                .iter()
                .map(|slot| SensorSummary {
                    name: slot.sensor.name().to_string(),
                    ticks: slot.ticks,
                    valid_ticks: slot.valid_ticks,
                })
                .collect(),
        }
    }
}
