// astra_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::sensors::{LogField, Sample, Sensor};
pub use crate::types::{CelestialBody, SensorContext, TargetCatalog, TrueState, TruthStateProvider};

// --- Scheduling, Noise & Errors ---
pub use crate::clock::Prescaler;
pub use crate::error::ConfigError;
pub use crate::noise::SeedSource;

// --- Pipeline building blocks ---
pub use crate::delay::{DelayBuffer, DelayTiming, OutputThrottle};
pub use crate::judgement::{Criterion, CriterionSignal, JudgementAggregator, ValidityFlag};
pub use crate::visibility::{ExclusionZone, TargetFilter, TargetObservation, VisibilityModel, VisibilityResult};

// --- Concrete sensors ---
pub use crate::sensors::{AntennaPattern, GnssReceiver, GnssReceiverParams, SensorPipeline, StarTracker, StarTrackerParams, TimingParams};
