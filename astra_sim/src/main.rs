// astra_sim/src/main.rs

use astra_sim::cli::Cli;
use astra_sim::error::SimError;
use astra_sim::simulation::config::load_scenario;
use astra_sim::simulation::core::scheduler::{RunSummary, Scheduler};
use astra_sim::simulation::core::telemetry::TelemetryWriter;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // Logs go to stderr so CSV on stdout stays clean.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,astra_sim=debug,astra_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<RunSummary, SimError> {
    let mut scenario = load_scenario(&cli.scenario, &cli.catalog)?;
    cli.apply_overrides(&mut scenario);

    let mut scheduler = Scheduler::from_scenario(&scenario)?;
    match &cli.output {
        Some(path) => scheduler.run(&mut TelemetryWriter::create(path)?),
        None => scheduler.run(&mut TelemetryWriter::new(io::stdout().lock())),
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(summary) => {
            tracing::info!(
                "Simulation finished: {} base tick(s), {} row(s) logged",
                summary.base_ticks,
                summary.rows_logged
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
