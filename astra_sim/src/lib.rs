// astra_sim/src/lib.rs

// This prelude is for convenience for other files WITHIN the astra_sim crate.
pub mod prelude;

pub mod cli;
pub mod error;
pub mod simulation;

use std::io;

use crate::error::SimError;
use crate::simulation::config::ScenarioConfig;
use crate::simulation::core::scheduler::{RunSummary, Scheduler};
use crate::simulation::core::telemetry::TelemetryWriter;

/// Builds a scheduler for `scenario` and runs it to completion, streaming telemetry into `out`.
pub fn run_scenario<W: io::Write>(scenario: &ScenarioConfig, out: W) -> Result<(RunSummary, W), SimError> {
    let mut scheduler = Scheduler::from_scenario(scenario)?;
    let mut telemetry = TelemetryWriter::new(out);
    let summary = scheduler.run(&mut telemetry)?;
    Ok((summary, telemetry.into_inner()?))
}
