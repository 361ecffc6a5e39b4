// astra_core/src/visibility/mod.rs

//! Line-of-sight geometry: decides, every tick, whether a sensor can see what it
//! needs to see.
//!
//! The geometry model is a closed set of variants. A sensor stores one
//! [`VisibilityModel`] and the variant is matched exactly once per tick in
//! [`VisibilityModel::evaluate`].

pub mod antenna;
pub mod exclusion;

pub use antenna::{line_of_sight_clear, ConeOcclusionModel, HemisphereModel, TargetFilter};
pub use exclusion::{ExclusionConeModel, ExclusionZone};

use crate::judgement::{Criterion, CriterionSignal};
use crate::types::SensorContext;

/// Direction and range of one visible target, expressed in the sensor frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetObservation {
    pub id: String,
    /// `atan2(y, x)` of the line of sight in the sensor frame [rad].
    pub azimuth_rad: f64,
    /// Angle of the line of sight above the sensor x-y plane [rad].
    pub elevation_rad: f64,
    /// Distance from the sensor to the target [m].
    pub range_m: f64,
}

/// Per-tick diagnostic counts for catalog-driven models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    /// Targets whose identifier failed the compatibility filter.
    pub filtered: usize,
    /// Compatible targets outside the cone.
    pub outside_fov: usize,
    /// Compatible targets hidden behind the occluding sphere.
    pub occluded: usize,
}

/// Outcome of one visibility evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisibilityResult {
    /// `true` when no criterion was raised.
    pub visible: bool,
    /// Every target that passed all tests (empty for models without a catalog).
    pub targets: Vec<TargetObservation>,
    /// The criterion outcomes the judgement is built from.
    pub signals: Vec<CriterionSignal>,
    pub rejections: RejectionCounts,
}

impl VisibilityResult {
    fn from_signals(signals: Vec<CriterionSignal>) -> Self {
        Self {
            visible: signals.iter().all(|s| !s.raised),
            targets: Vec::new(),
            signals,
            rejections: RejectionCounts::default(),
        }
    }

    fn from_targets(targets: Vec<TargetObservation>, rejections: RejectionCounts) -> Self {
        let none_visible = targets.is_empty();
        Self {
            visible: !none_visible,
            targets,
            signals: vec![CriterionSignal::new(Criterion::NoVisibleTarget, none_visible)],
            rejections,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.targets.len()
    }
}

/// The geometry model a sensor uses.
#[derive(Debug, Clone)]
pub enum VisibilityModel {
    /// Star-tracker pattern: sun/earth/moon exclusion cones plus a rate limit.
    ExclusionCone(ExclusionConeModel),
    /// Receiver-antenna pattern: cone field of view with sphere occlusion over a catalog.
    ConeOcclusion(ConeOcclusionModel),
    /// Antenna sees the sky whenever it faces away from the occluding body.
    Hemisphere(HemisphereModel),
}

impl VisibilityModel {
    pub fn evaluate(&self, ctx: &SensorContext<'_>) -> VisibilityResult {
        match self {
            VisibilityModel::ExclusionCone(model) => VisibilityResult::from_signals(model.judge(ctx.truth)),
            VisibilityModel::ConeOcclusion(model) => {
                let (targets, rejections) = model.scan(ctx.truth, ctx.catalog);
                VisibilityResult::from_targets(targets, rejections)
            }
            VisibilityModel::Hemisphere(model) => {
                let facing_sky = model.facing_sky(ctx.truth);
                VisibilityResult::from_signals(vec![CriterionSignal::new(Criterion::NoVisibleTarget, !facing_sky)])
            }
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            VisibilityModel::ExclusionCone(_) => "ExclusionCone",
            VisibilityModel::ConeOcclusion(_) => "ConeOcclusion",
            VisibilityModel::Hemisphere(_) => "Hemisphere",
        }
    }
}
