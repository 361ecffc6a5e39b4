// astra_sim/src/simulation/core/mod.rs

pub mod scheduler;
pub mod telemetry;
pub mod truth;
