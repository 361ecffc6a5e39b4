// astra_sim/src/prelude.rs

// Re-export the entire astra_core prelude so you can easily access
// pure types like `Sensor`, `StarTracker`, `SeedSource`, etc.
pub use astra_core::prelude::*;

// Re-export common simulation-specific types for easy access.
pub use crate::error::SimError;
pub use crate::simulation::config::structs::*;
pub use crate::simulation::config::{load_catalog_from_disk, load_scenario, resolve_scenario, PrefabCatalog};
pub use crate::simulation::core::scheduler::{RunSummary, Scheduler, SensorSlot, SensorSummary};
pub use crate::simulation::core::telemetry::TelemetryWriter;
pub use crate::simulation::core::truth::{AnalyticTruth, CircularOrbit, GnssConstellation};
