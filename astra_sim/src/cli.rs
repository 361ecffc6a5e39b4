use clap::Parser;
use std::path::PathBuf;

use crate::simulation::config::ScenarioConfig;

/// Astra: a spacecraft attitude and navigation sensor simulator.
///
/// This struct defines the command-line arguments that can be passed to any
/// binary application that uses the Astra simulation library.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/leo_showcase.toml")]
    pub scenario: PathBuf,

    /// Directory holding the prefab catalog.
    #[arg(short, long, default_value = "assets/catalog")]
    pub catalog: PathBuf,

    /// Write telemetry CSV here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the scenario's master seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the scenario's duration [s].
    #[arg(long)]
    pub duration: Option<f64>,
}

impl Cli {
    /// Applies the command-line overrides on top of a loaded scenario.
    pub fn apply_overrides(&self, scenario: &mut ScenarioConfig) {
        if let Some(seed) = self.seed {
            tracing::info!("Overriding master seed: {} -> {}", scenario.simulation.seed, seed);
            scenario.simulation.seed = seed;
        }
        if let Some(duration) = self.duration {
            tracing::info!(
                "Overriding duration: {} s -> {} s",
                scenario.simulation.duration_s,
                duration
            );
            scenario.simulation.duration_s = duration;
        }
    }
}
