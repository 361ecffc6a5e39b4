// astra_core/src/judgement.rs

use crate::types::CelestialBody;
use std::fmt;

/// One independent reason a sensor can be invalid on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// The boresight is inside the exclusion cone of a body.
    Exclusion(CelestialBody),
    /// The body angular rate exceeds the sensor's capture limit.
    AngularRate,
    /// No catalog target passes the field-of-view and occlusion tests.
    NoVisibleTarget,
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Exclusion(body) => write!(f, "{body}_exclusion"),
            Criterion::AngularRate => f.write_str("angular_rate"),
            Criterion::NoVisibleTarget => f.write_str("no_visible_target"),
        }
    }
}

/// The 0/1 outcome of one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriterionSignal {
    pub criterion: Criterion,
    pub raised: bool,
}

impl CriterionSignal {
    pub fn new(criterion: Criterion, raised: bool) -> Self {
        Self { criterion, raised }
    }

    fn as_count(&self) -> u32 {
        u32::from(self.raised)
    }
}

/// The aggregate validity of a sensor plus the per-criterion diagnostics it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityFlag {
    invalid: bool,
    signals: Vec<CriterionSignal>,
}

impl ValidityFlag {
    /// The state before the first judgement: invalid, with no diagnostics.
    pub fn unjudged() -> Self {
        Self {
            invalid: true,
            signals: Vec::new(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn is_valid(&self) -> bool {
        !self.invalid
    }

    pub fn signals(&self) -> &[CriterionSignal] {
        &self.signals
    }

    /// Outcome of a single criterion, or `None` if this sensor does not evaluate it.
    pub fn raised(&self, criterion: Criterion) -> Option<bool> {
        self.signals
            .iter()
            .find(|s| s.criterion == criterion)
            .map(|s| s.raised)
    }

    /// Criteria that contributed to an invalid judgement.
    pub fn raised_criteria(&self) -> impl Iterator<Item = Criterion> + '_ {
        self.signals.iter().filter(|s| s.raised).map(|s| s.criterion)
    }
}

impl Default for ValidityFlag {
    fn default() -> Self {
        Self::unjudged()
    }
}

/// Combines criterion signals into a [`ValidityFlag`].
///
/// The flag is invalid iff the sum of raised signals is greater than zero. There is
/// no hysteresis: every call is a full recomputation from the signals it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct JudgementAggregator;

impl JudgementAggregator {
    pub fn aggregate(signals: &[CriterionSignal]) -> ValidityFlag {
        let total: u32 = signals.iter().map(CriterionSignal::as_count).sum();
        ValidityFlag {
            invalid: total > 0,
            signals: signals.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_raised_signal_is_valid() {
        let flag = JudgementAggregator::aggregate(&[
            CriterionSignal::new(Criterion::Exclusion(CelestialBody::Sun), false),
            CriterionSignal::new(Criterion::AngularRate, false),
        ]);
        assert!(flag.is_valid());
        assert_eq!(flag.raised(Criterion::AngularRate), Some(false));
        assert_eq!(flag.raised(Criterion::NoVisibleTarget), None);
    }

    #[test]
    fn any_raised_signal_is_invalid() {
        let flag = JudgementAggregator::aggregate(&[
            CriterionSignal::new(Criterion::Exclusion(CelestialBody::Sun), false),
            CriterionSignal::new(Criterion::Exclusion(CelestialBody::Moon), true),
            CriterionSignal::new(Criterion::AngularRate, false),
        ]);
        assert!(flag.is_invalid());
        let raised: Vec<Criterion> = flag.raised_criteria().collect();
        assert_eq!(raised, vec![Criterion::Exclusion(CelestialBody::Moon)]);
    }

    #[test]
    fn aggregation_has_no_memory() {
        let invalid = JudgementAggregator::aggregate(&[CriterionSignal::new(Criterion::AngularRate, true)]);
        assert!(invalid.is_invalid());
        let valid = JudgementAggregator::aggregate(&[CriterionSignal::new(Criterion::AngularRate, false)]);
        assert!(valid.is_valid());
    }

    #[test]
    fn unjudged_flag_is_invalid() {
        let flag = ValidityFlag::default();
        assert!(flag.is_invalid());
        assert!(flag.signals().is_empty());
    }

    #[test]
    fn criterion_names() {
        assert_eq!(Criterion::Exclusion(CelestialBody::Earth).to_string(), "earth_exclusion");
        assert_eq!(Criterion::NoVisibleTarget.to_string(), "no_visible_target");
    }
}
