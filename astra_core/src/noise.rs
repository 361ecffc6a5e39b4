// astra_core/src/noise.rs

//! Stochastic measurement synthesis.
//!
//! Every error axis owns its own seeded generator. Seeds are drawn once, at
//! construction, from an explicit [`SeedSource`]; nothing here touches a global
//! or thread-local RNG, so two sensors built from the same master seed and fed the
//! same truth sequence produce bit-identical samples.

use crate::constants::TAU;
use crate::error::ConfigError;
use crate::geometry::orthonormal_pair;
use nalgebra::{Unit, UnitQuaternion, Vector3};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

// =========================================================================
// == Seed Issuing ==
// =========================================================================

/// Issues seeds for noise generators from one master seed.
///
/// Hand the same `SeedSource` to sensors in the same order and they get the same
/// seeds; this replaces a process-wide seed counter.
#[derive(Debug, Clone)]
pub struct SeedSource {
    rng: ChaCha8Rng,
}

impl SeedSource {
    pub fn new(master_seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(master_seed),
        }
    }

    /// Draws the next seed from the stream.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

// =========================================================================
// == Scalar Channels ==
// =========================================================================

/// A zero-mean Gaussian process for one error axis.
#[derive(Debug, Clone)]
pub struct GaussianChannel {
    seed: u64,
    std_dev: f64,
    rng: ChaCha8Rng,
    dist: Normal<f64>,
}

impl GaussianChannel {
    pub fn new(std_dev: f64, seed: u64, what: &'static str) -> Result<Self, ConfigError> {
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(ConfigError::InvalidNoise { what, value: std_dev });
        }
        let dist = Normal::new(0.0, std_dev).map_err(|_| ConfigError::InvalidNoise { what, value: std_dev })?;
        Ok(Self {
            seed,
            std_dev,
            rng: ChaCha8Rng::seed_from_u64(seed),
            dist,
        })
    }

    pub fn sample(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

/// A uniformly distributed phase in `[0, 2pi)`.
#[derive(Debug, Clone)]
pub struct UniformPhase {
    seed: u64,
    rng: ChaCha8Rng,
}

impl UniformPhase {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn sample(&mut self) -> f64 {
        TAU * self.rng.gen::<f64>()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

// =========================================================================
// == Attitude Noise ==
// =========================================================================

/// Perturbs a sensor attitude with an along-sight rotation and a cross-boresight tilt.
#[derive(Debug, Clone)]
pub struct AttitudeNoise {
    /// Boresight in the sensor frame.
    sight_c: Unit<Vector3<f64>>,
    /// First and second directions orthogonal to the boresight, sensor frame.
    first_orthogonal_c: Unit<Vector3<f64>>,
    second_orthogonal_c: Unit<Vector3<f64>>,
    phase: UniformPhase,
    cross_sight: GaussianChannel,
    along_sight: GaussianChannel,
}

impl AttitudeNoise {
    /// Draws three seeds from `seeds`: phase, cross-boresight, along-sight (in that order).
    pub fn new(
        sight_c: Unit<Vector3<f64>>,
        cross_sight_std_rad: f64,
        along_sight_std_rad: f64,
        seeds: &mut SeedSource,
    ) -> Result<Self, ConfigError> {
        let (first_orthogonal_c, second_orthogonal_c) = orthonormal_pair(&sight_c);
        Ok(Self {
            sight_c,
            first_orthogonal_c,
            second_orthogonal_c,
            phase: UniformPhase::new(seeds.next_seed()),
            cross_sight: GaussianChannel::new(cross_sight_std_rad, seeds.next_seed(), "cross-boresight error")?,
            along_sight: GaussianChannel::new(along_sight_std_rad, seeds.next_seed(), "along-sight error")?,
        })
    }

    /// Applies `q_i2c * q_along * q_cross`.
    ///
    /// Both perturbations are expressed in the sensor frame, so they are
    /// right-multiplied onto the true sensor attitude.
    pub fn perturb(&mut self, q_i2c: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        let q_along = UnitQuaternion::from_axis_angle(&self.sight_c, self.along_sight.sample());

        let phase = self.phase.sample();
        let tilt_axis = Unit::new_normalize(
            self.first_orthogonal_c.into_inner() * phase.cos() + self.second_orthogonal_c.into_inner() * phase.sin(),
        );
        let q_cross = UnitQuaternion::from_axis_angle(&tilt_axis, self.cross_sight.sample());

        q_i2c * q_along * q_cross
    }

    /// Seeds in draw order: phase, cross-boresight, along-sight.
    pub fn seeds(&self) -> [u64; 3] {
        [self.phase.seed(), self.cross_sight.seed(), self.along_sight.seed()]
    }
}

// =========================================================================
// == Position Noise ==
// =========================================================================

/// Independent per-axis Gaussian noise added to a position.
#[derive(Debug, Clone)]
pub struct PositionNoise {
    axes: [GaussianChannel; 3],
}

impl PositionNoise {
    /// Draws three seeds from `seeds`, one per axis (x, y, z).
    pub fn new(std_dev_m: Vector3<f64>, seeds: &mut SeedSource) -> Result<Self, ConfigError> {
        Ok(Self {
            axes: [
                GaussianChannel::new(std_dev_m.x, seeds.next_seed(), "position x")?,
                GaussianChannel::new(std_dev_m.y, seeds.next_seed(), "position y")?,
                GaussianChannel::new(std_dev_m.z, seeds.next_seed(), "position z")?,
            ],
        })
    }

    pub fn apply(&mut self, true_position: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(
            true_position.x + self.axes[0].sample(),
            true_position.y + self.axes[1].sample(),
            true_position.z + self.axes[2].sample(),
        )
    }

    pub fn seeds(&self) -> [u64; 3] {
        [self.axes[0].seed(), self.axes[1].seed(), self.axes[2].seed()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn seed_source_is_reproducible() {
        let mut a = SeedSource::new(42);
        let mut b = SeedSource::new(42);
        let seq_a: Vec<u64> = (0..8).map(|_| a.next_seed()).collect();
        let seq_b: Vec<u64> = (0..8).map(|_| b.next_seed()).collect();
        assert_eq!(seq_a, seq_b);

        let mut c = SeedSource::new(43);
        assert_ne!(seq_a[0], c.next_seed());
    }

    #[test]
    fn negative_or_nan_noise_is_rejected() {
        assert!(matches!(
            GaussianChannel::new(-1.0, 0, "x"),
            Err(ConfigError::InvalidNoise { what: "x", .. })
        ));
        assert!(GaussianChannel::new(f64::NAN, 0, "x").is_err());
        assert!(GaussianChannel::new(f64::INFINITY, 0, "x").is_err());
    }

    #[test]
    fn zero_noise_returns_true_position_exactly() {
        let mut noise = PositionNoise::new(Vector3::zeros(), &mut SeedSource::new(1)).unwrap();
        let truth = Vector3::new(7_000_000.0, -12.5, 3.25);
        assert_eq!(noise.apply(&truth), truth);
    }

    #[test]
    fn identical_seeds_give_identical_position_samples() {
        let sigma = Vector3::new(5.0, 6.0, 7.0);
        let mut a = PositionNoise::new(sigma, &mut SeedSource::new(9)).unwrap();
        let mut b = PositionNoise::new(sigma, &mut SeedSource::new(9)).unwrap();
        assert_eq!(a.seeds(), b.seeds());
        let truth = Vector3::new(1.0, 2.0, 3.0);
        for _ in 0..100 {
            assert_eq!(a.apply(&truth), b.apply(&truth));
        }
    }

    #[test]
    fn position_noise_statistics_match_configuration() {
        let mut noise = PositionNoise::new(Vector3::new(2.0, 0.0, 10.0), &mut SeedSource::new(3)).unwrap();
        let n = 20_000;
        let samples: Vec<Vector3<f64>> = (0..n).map(|_| noise.apply(&Vector3::zeros())).collect();
        let mean = samples.iter().sum::<Vector3<f64>>() / n as f64;
        let var = samples
            .iter()
            .map(|s| (s - mean).component_mul(&(s - mean)))
            .sum::<Vector3<f64>>()
            / n as f64;
        assert_abs_diff_eq!(mean.x, 0.0, epsilon = 0.1);
        assert_eq!(var.y, 0.0);
        assert_abs_diff_eq!(var.x.sqrt(), 2.0, epsilon = 0.1);
        assert_abs_diff_eq!(var.z.sqrt(), 10.0, epsilon = 0.5);
    }

    #[test]
    fn zero_attitude_noise_is_identity() {
        let mut noise = AttitudeNoise::new(Vector3::x_axis(), 0.0, 0.0, &mut SeedSource::new(5)).unwrap();
        let q = UnitQuaternion::from_euler_angles(0.1, -0.4, 2.0);
        assert_abs_diff_eq!(noise.perturb(&q).angle_to(&q), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn along_sight_noise_keeps_boresight_fixed() {
        let mut noise = AttitudeNoise::new(Vector3::x_axis(), 0.0, 0.01, &mut SeedSource::new(5)).unwrap();
        let q = UnitQuaternion::from_euler_angles(0.3, 0.2, -1.0);
        for _ in 0..50 {
            let noisy = noise.perturb(&q);
            assert_abs_diff_eq!(noisy * Vector3::x(), q * Vector3::x(), epsilon = 1e-12);
        }
    }

    #[test]
    fn cross_sight_noise_tilts_boresight_by_sampled_angle() {
        let sigma = 1e-3;
        let mut noise = AttitudeNoise::new(Vector3::z_axis(), sigma, 0.0, &mut SeedSource::new(11)).unwrap();
        let q = UnitQuaternion::identity();
        let mut max_tilt: f64 = 0.0;
        for _ in 0..1_000 {
            let noisy = noise.perturb(&q);
            let tilt = (noisy * Vector3::z()).angle(&Vector3::z());
            max_tilt = max_tilt.max(tilt);
        }
        assert!(max_tilt > 0.0);
        assert!(max_tilt < 6.0 * sigma);
    }
}
