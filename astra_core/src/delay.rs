// astra_core/src/delay.rs

//! Latency emulation and output-rate throttling.
//!
//! A sensor writes one sample per tick into a [`DelayBuffer`]. An independent
//! [`OutputThrottle`] decides on which ticks the externally visible output is
//! refreshed; on those ticks the output is read `delay_ticks` samples back.

use crate::error::ConfigError;

/// Guards `floor(2 * delay / step)` against representation error, e.g. 2.0 / 0.1.
const TICK_ROUNDING_SLACK: f64 = 1e-9;

/// Largest ring a sensor may allocate; longer delays are rejected at construction.
pub const MAX_DELAY_CAPACITY: usize = 1 << 20;

// =========================================================================
// == Timing ==
// =========================================================================

/// Derived buffer geometry for a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayTiming {
    /// Ring capacity: `max(1, floor(2 * delay / step))`.
    pub capacity: usize,
    /// Latency in ticks: `round(delay / step)`, clamped to `capacity - 1`.
    pub delay_ticks: usize,
}

impl DelayTiming {
    pub fn new(step_period_s: f64, output_delay_s: f64) -> Result<Self, ConfigError> {
        if !step_period_s.is_finite() || step_period_s <= 0.0 {
            return Err(ConfigError::InvalidStepPeriod(step_period_s));
        }
        if !output_delay_s.is_finite() || output_delay_s < 0.0 {
            return Err(ConfigError::InvalidDelay(output_delay_s));
        }
        let ratio = output_delay_s / step_period_s;
        let slots = (2.0 * ratio + TICK_ROUNDING_SLACK).floor();
        if slots > MAX_DELAY_CAPACITY as f64 {
            return Err(ConfigError::DelayTooLong {
                delay_s: output_delay_s,
                step_s: step_period_s,
            });
        }
        let capacity = (slots as usize).max(1);
        let delay_ticks = (ratio.round() as usize).min(capacity - 1);
        Ok(Self { capacity, delay_ticks })
    }
}

// =========================================================================
// == Ring Index ==
// =========================================================================

/// A position in a ring of fixed, non-zero length. All arithmetic wraps, so an
/// index obtained from it is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingIndex {
    pos: usize,
    len: usize,
}

impl RingIndex {
    /// `len` must be non-zero; [`DelayTiming`] guarantees this for sensor buffers.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "RingIndex length must be greater than 0");
        Self { pos: 0, len }
    }

    pub fn get(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn advance(&mut self) {
        self.pos = (self.pos + 1) % self.len;
    }

    /// The index `steps` positions behind the current one, wrapped into range.
    pub fn back(&self, steps: usize) -> usize {
        let len = self.len as i64;
        (self.pos as i64 - (steps as i64 % len)).rem_euclid(len) as usize
    }
}

// =========================================================================
// == Delay Buffer ==
// =========================================================================

/// A fixed-capacity circular history of samples.
#[derive(Debug, Clone)]
pub struct DelayBuffer<T> {
    slots: Vec<T>,
    cursor: RingIndex,
}

impl<T: Clone> DelayBuffer<T> {
    /// Creates a buffer with every slot holding `fill`.
    pub fn new(capacity: usize, fill: T) -> Self {
        Self {
            slots: vec![fill; capacity],
            cursor: RingIndex::new(capacity),
        }
    }

    /// Writes `sample` at the cursor, then advances the cursor.
    pub fn push(&mut self, sample: T) {
        self.slots[self.cursor.get()] = sample;
        self.cursor.advance();
    }

    /// The sample written `delay_ticks` pushes ago (0 = the most recent push).
    ///
    /// This is the slot at `cursor - delay_ticks - 1`.
    pub fn delayed(&self, delay_ticks: usize) -> &T {
        &self.slots[self.cursor.back(delay_ticks + 1)]
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The slot the next push will write to.
    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }
}

// =========================================================================
// == Output Throttle ==
// =========================================================================

/// Counts ticks modulo the output interval. The first tick is a refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputThrottle {
    interval: u32,
    count: u32,
}

impl OutputThrottle {
    pub fn new(interval: u32) -> Result<Self, ConfigError> {
        if interval == 0 {
            return Err(ConfigError::ZeroOutputInterval);
        }
        Ok(Self { interval, count: 0 })
    }

    /// Advances the counter; returns `true` on interval boundaries.
    pub fn tick(&mut self) -> bool {
        let boundary = self.count == 0;
        self.count = (self.count + 1) % self.interval;
        boundary
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_for_reference_example() {
        let timing = DelayTiming::new(0.1, 1.0).unwrap();
        assert_eq!(timing.capacity, 20);
        assert_eq!(timing.delay_ticks, 10);
    }

    #[test]
    fn zero_delay_gives_single_slot() {
        let timing = DelayTiming::new(0.1, 0.0).unwrap();
        assert_eq!(timing, DelayTiming { capacity: 1, delay_ticks: 0 });
    }

    #[test]
    fn sub_step_delay_is_clamped_into_buffer() {
        // round(0.5) = 1 tick, but floor(2 * 0.5) = 1 slot: the delay cannot exceed capacity - 1.
        let timing = DelayTiming::new(0.2, 0.1).unwrap();
        assert_eq!(timing.capacity, 1);
        assert_eq!(timing.delay_ticks, 0);
    }

    #[test]
    fn invalid_timing_is_rejected() {
        assert_eq!(DelayTiming::new(0.0, 1.0), Err(ConfigError::InvalidStepPeriod(0.0)));
        assert_eq!(DelayTiming::new(-0.1, 1.0), Err(ConfigError::InvalidStepPeriod(-0.1)));
        assert_eq!(DelayTiming::new(0.1, -1.0), Err(ConfigError::InvalidDelay(-1.0)));
        assert!(DelayTiming::new(0.1, f64::NAN).is_err());
    }

    #[test]
    fn oversized_delay_is_rejected_before_allocation() {
        assert_eq!(
            DelayTiming::new(0.1, 1e300),
            Err(ConfigError::DelayTooLong { delay_s: 1e300, step_s: 0.1 })
        );
        // The largest accepted ring still builds.
        let step = 1.0;
        let timing = DelayTiming::new(step, (MAX_DELAY_CAPACITY / 2) as f64).unwrap();
        assert_eq!(timing.capacity, MAX_DELAY_CAPACITY);
        assert!(DelayTiming::new(step, (MAX_DELAY_CAPACITY / 2 + 1) as f64).is_err());
    }

    #[test]
    fn ring_index_wraps_backwards_without_negative_values() {
        let mut idx = RingIndex::new(4);
        assert_eq!(idx.back(1), 3);
        idx.advance();
        idx.advance();
        assert_eq!(idx.get(), 2);
        assert_eq!(idx.back(0), 2);
        assert_eq!(idx.back(2), 0);
        assert_eq!(idx.back(3), 3);
        assert_eq!(idx.back(11), 3);
        idx.advance();
        idx.advance();
        assert_eq!(idx.get(), 0);
    }

    #[test]
    fn delayed_read_matches_reference_example() {
        // Step 0.1 s, delay 1.0 s, interval 5: the refresh at cursor 5 reads slot 14,
        // which still holds the sample from the previous wrap.
        let timing = DelayTiming::new(0.1, 1.0).unwrap();
        let mut buffer = DelayBuffer::new(timing.capacity, -1_i64);
        for tag in 0..20 {
            buffer.push(tag);
        }
        assert_eq!(buffer.cursor(), 0);
        for tag in 100..105 {
            buffer.push(tag);
        }
        assert_eq!(buffer.cursor(), 5);
        assert_eq!(*buffer.delayed(timing.delay_ticks), 14);
    }

    #[test]
    fn delayed_read_lags_by_delay_ticks() {
        let mut buffer = DelayBuffer::new(8, 0_u64);
        for tick in 0..50_u64 {
            buffer.push(tick);
            if tick >= 3 {
                assert_eq!(*buffer.delayed(3), tick - 3);
            }
            assert_eq!(*buffer.delayed(0), tick);
        }
    }

    #[test]
    fn throttle_fires_on_first_tick_then_every_interval() {
        let mut throttle = OutputThrottle::new(5).unwrap();
        let boundaries: Vec<usize> = (0..16).filter(|_| throttle.tick()).collect();
        assert_eq!(boundaries, vec![0, 5, 10, 15]);
    }

    #[test]
    fn throttle_rejects_zero_interval() {
        assert_eq!(OutputThrottle::new(0), Err(ConfigError::ZeroOutputInterval));
    }
}
