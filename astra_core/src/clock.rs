// astra_core/src/clock.rs

use crate::error::ConfigError;

/// The scheduler contract for one sensor: it runs on every `period`-th base tick.
///
/// The scheduler that owns the base tick counter lives outside this crate; it only
/// asks each sensor's prescaler whether the sensor fires on the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prescaler {
    period: u32,
}

impl Prescaler {
    pub fn new(period: u32) -> Result<Self, ConfigError> {
        if period == 0 {
            return Err(ConfigError::ZeroPrescaler);
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    /// Whether the sensor executes on `base_tick`. Tick 0 always fires.
    pub fn fires(&self, base_tick: u64) -> bool {
        base_tick % u64::from(self.period) == 0
    }

    /// The sensor's own step period given the scheduler's base step.
    pub fn step_period_s(&self, base_step_s: f64) -> f64 {
        base_step_s * f64::from(self.period)
    }
}

impl Default for Prescaler {
    fn default() -> Self {
        Self { period: 1 }
    }
}
