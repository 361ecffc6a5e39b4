// astra_sim/src/simulation/sensors/gnss_receiver.rs

use astra_core::prelude::*;

use crate::error::SimError;
use crate::simulation::config::structs::{AntennaConfig, GnssReceiverConfig};
use crate::simulation::core::scheduler::SensorSlot;

pub fn params(config: &GnssReceiverConfig, base_step_s: f64) -> Result<(Prescaler, GnssReceiverParams), ConfigError> {
    let (prescaler, timing) = super::timing_params(&config.timing, base_step_s)?;
    let antenna = match &config.antenna {
        AntennaConfig::Hemisphere => AntennaPattern::Hemisphere,
        AntennaConfig::Cone {
            half_angle_deg,
            targets,
            occluder_radius_m,
        } => AntennaPattern::Cone {
            half_angle_rad: half_angle_deg.to_radians(),
            target_filter: targets.clone(),
            occluder_radius_m: *occluder_radius_m,
        },
    };
    let params = GnssReceiverParams {
        q_b2c: config.mount_rotation_deg,
        boresight_c: config.boresight,
        mount_offset_b: config.mount_offset_m,
        antenna,
        position_std_m: config.position_std_m,
        timing,
    };
    Ok((prescaler, params))
}

pub fn build(config: &GnssReceiverConfig, base_step_s: f64, seeds: &mut SeedSource) -> Result<SensorSlot, SimError> {
    let name = format!("gnss{}", config.id);
    let (prescaler, params) = params(config, base_step_s).map_err(|e| SimError::sensor(&name, e))?;
    let sensor = GnssReceiver::new(config.id, &params, seeds).map_err(|e| SimError::sensor(&name, e))?;

    let pattern = match &params.antenna {
        AntennaPattern::Hemisphere => "hemisphere".to_string(),
        AntennaPattern::Cone {
            half_angle_rad,
            target_filter,
            ..
        } => format!("cone {:.1} deg tracking '{}'", half_angle_rad.to_degrees(), target_filter),
    };
    tracing::info!(
        "  -> Built GNSS receiver '{}' ({}, prescaler {}, seeds {:?})",
        name,
        pattern,
        prescaler.period(),
        sensor.noise_seeds()
    );
    Ok(SensorSlot::new(prescaler, Box::new(sensor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::structs::TimingConfig;
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};

    fn config(antenna: AntennaConfig) -> GnssReceiverConfig {
        GnssReceiverConfig {
            id: 1,
            mount_rotation_deg: UnitQuaternion::identity(),
            boresight: Vector3::z(),
            mount_offset_m: Vector3::new(0.0, 0.0, 0.5),
            antenna,
            position_std_m: Vector3::new(3.0, 3.0, 5.0),
            timing: TimingConfig {
                prescaler: 10,
                output_delay_s: 1.0,
                output_interval: 1,
            },
        }
    }

    #[test]
    fn cone_antenna_is_converted() {
        let (prescaler, params) = params(
            &config(AntennaConfig::Cone {
                half_angle_deg: 80.0,
                targets: "GE".to_string(),
                occluder_radius_m: 6.4e6,
            }),
            0.1,
        )
        .unwrap();
        assert_eq!(prescaler.period(), 10);
        assert_relative_eq!(params.timing.step_period_s, 1.0, epsilon = 1e-12);
        let AntennaPattern::Cone {
            half_angle_rad,
            target_filter,
            occluder_radius_m,
        } = params.antenna
        else {
            panic!("expected a cone antenna");
        };
        assert_relative_eq!(half_angle_rad, 80f64.to_radians());
        assert_eq!(target_filter, "GE");
        assert_eq!(occluder_radius_m, 6.4e6);
    }

    #[test]
    fn builds_a_named_sensor() {
        let slot = build(&config(AntennaConfig::Hemisphere), 0.1, &mut SeedSource::new(1)).unwrap();
        assert_eq!(slot.sensor().name(), "gnss1");
        assert_eq!(slot.prescaler().period(), 10);
    }

    #[test]
    fn empty_target_filter_is_reported_against_the_sensor() {
        let antenna = AntennaConfig::Cone {
            half_angle_deg: 80.0,
            targets: String::new(),
            occluder_radius_m: 6.4e6,
        };
        let err = build(&config(antenna), 0.1, &mut SeedSource::new(1)).unwrap_err();
        assert!(matches!(
            err,
            SimError::Sensor { ref sensor, source: ConfigError::EmptyTargetFilter } if sensor == "gnss1"
        ));
    }
}
