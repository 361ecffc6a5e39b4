// astra_sim/src/simulation/sensors/star_tracker.rs

use astra_core::prelude::*;

use crate::error::SimError;
use crate::simulation::config::structs::{ExclusionZoneConfig, StarTrackerConfig};
use crate::simulation::core::scheduler::SensorSlot;

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

fn exclusion_zone(config: &ExclusionZoneConfig) -> ExclusionZone {
    let half_angle_rad = config.half_angle_deg.to_radians();
    match (config.body, config.apparent_radius_m) {
        (body, Some(radius)) => ExclusionZone {
            body,
            half_angle_rad,
            apparent_radius_m: radius,
        },
        (CelestialBody::Earth, None) => ExclusionZone::earth(half_angle_rad),
        (body, None) => ExclusionZone::point(body, half_angle_rad),
    }
}

/// Converts a star tracker config (degrees, arcseconds) into core parameters (radians).
pub fn params(config: &StarTrackerConfig, base_step_s: f64) -> Result<(Prescaler, StarTrackerParams), ConfigError> {
    let (prescaler, timing) = super::timing_params(&config.timing, base_step_s)?;
    let params = StarTrackerParams {
        q_b2c: config.mount_rotation_deg,
        sight_c: config.sight_direction,
        cross_sight_std_rad: config.cross_sight_std_arcsec * ARCSEC_TO_RAD,
        along_sight_std_rad: config.along_sight_std_arcsec * ARCSEC_TO_RAD,
        exclusion_zones: config.exclusion.iter().map(exclusion_zone).collect(),
        angular_rate_limit_rad_s: config
            .angular_rate_limit_deg_s
            .map_or(f64::INFINITY, f64::to_radians),
        timing,
    };
    Ok((prescaler, params))
}

pub fn build(config: &StarTrackerConfig, base_step_s: f64, seeds: &mut SeedSource) -> Result<SensorSlot, SimError> {
    let name = format!("stt{}", config.id);
    let (prescaler, params) = params(config, base_step_s).map_err(|e| SimError::sensor(&name, e))?;
    let sensor = StarTracker::new(config.id, &params, seeds).map_err(|e| SimError::sensor(&name, e))?;

    tracing::info!(
        "  -> Built star tracker '{}' (prescaler {}, {} exclusion zone(s), seeds {:?})",
        name,
        prescaler.period(),
        params.exclusion_zones.len(),
        sensor.noise_seeds()
    );
    Ok(SensorSlot::new(prescaler, Box::new(sensor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::structs::TimingConfig;
    use approx::assert_relative_eq;
    use astra_core::constants::EARTH_EQUATORIAL_RADIUS_M;
    use nalgebra::{UnitQuaternion, Vector3};

    fn config() -> StarTrackerConfig {
        StarTrackerConfig {
            id: 2,
            mount_rotation_deg: UnitQuaternion::identity(),
            sight_direction: Vector3::x(),
            cross_sight_std_arcsec: 3600.0,
            along_sight_std_arcsec: 36.0,
            exclusion: vec![
                ExclusionZoneConfig {
                    body: CelestialBody::Sun,
                    half_angle_deg: 30.0,
                    apparent_radius_m: None,
                },
                ExclusionZoneConfig {
                    body: CelestialBody::Earth,
                    half_angle_deg: 20.0,
                    apparent_radius_m: None,
                },
                ExclusionZoneConfig {
                    body: CelestialBody::Moon,
                    half_angle_deg: 10.0,
                    apparent_radius_m: Some(1.7374e6),
                },
            ],
            angular_rate_limit_deg_s: None,
            timing: TimingConfig::default(),
        }
    }

    #[test]
    fn units_are_converted_to_radians() {
        let (_, params) = params(&config(), 0.1).unwrap();
        assert_relative_eq!(params.cross_sight_std_rad, 1f64.to_radians(), epsilon = 1e-15);
        assert_relative_eq!(params.along_sight_std_rad, 0.01f64.to_radians(), epsilon = 1e-15);
        assert!(params.angular_rate_limit_rad_s.is_infinite());
        assert_relative_eq!(params.exclusion_zones[0].half_angle_rad, 30f64.to_radians());
    }

    #[test]
    fn zone_radius_defaults_depend_on_body() {
        let (_, params) = params(&config(), 0.1).unwrap();
        let radii: Vec<f64> = params.exclusion_zones.iter().map(|z| z.apparent_radius_m).collect();
        assert_eq!(radii, vec![0.0, EARTH_EQUATORIAL_RADIUS_M, 1.7374e6]);
    }

    #[test]
    fn rate_limit_is_converted_when_given() {
        let mut config = config();
        config.angular_rate_limit_deg_s = Some(2.0);
        let (_, params) = params(&config, 0.1).unwrap();
        assert_relative_eq!(params.angular_rate_limit_rad_s, 2f64.to_radians());
    }

    #[test]
    fn builds_a_named_sensor() {
        let slot = build(&config(), 0.1, &mut SeedSource::new(1)).unwrap();
        assert_eq!(slot.sensor().name(), "stt2");
        assert!(slot.sensor().downcast_ref::<StarTracker>().is_some());
    }

    #[test]
    fn bad_half_angle_is_reported_against_the_sensor() {
        let mut config = config();
        config.exclusion[0].half_angle_deg = 270.0;
        let err = build(&config, 0.1, &mut SeedSource::new(1)).unwrap_err();
        assert!(matches!(err, SimError::Sensor { ref sensor, .. } if sensor == "stt2"));
    }
}
