// astra_sim/src/simulation/config/mod.rs

//! This module handles loading, resolving, and validating all simulation
//! configuration from disk, including the prefab catalog system.

mod catalog;
mod resolver;

pub mod structs;

use figment::{
    providers::{Format, Toml},
    Figment,
};
use std::path::Path;

use crate::error::SimError;
pub use catalog::{load_catalog_from_disk, PrefabCatalog};
pub use structs::{RawScenario, ScenarioConfig, SensorConfig};

/// Loads a scenario file and resolves its sensors against the catalog at `catalog_path`.
pub fn load_scenario(scenario_path: &Path, catalog_path: &Path) -> Result<ScenarioConfig, SimError> {
    if !scenario_path.exists() {
        return Err(SimError::MissingScenario(scenario_path.to_path_buf()));
    }
    tracing::info!("Loading scenario from: {:?}", scenario_path);
    let catalog = load_catalog_from_disk(catalog_path);
    resolve_scenario(Figment::new().merge(Toml::file(scenario_path)), &catalog)
}

/// Extracts a scenario from any figment and resolves it.
pub fn resolve_scenario(figment: Figment, catalog: &PrefabCatalog) -> Result<ScenarioConfig, SimError> {
    let raw: RawScenario = figment.extract()?;

    // --- Resolve each sensor against the catalog ---
    let mut sensors = Vec::with_capacity(raw.sensors.len());
    for sensor_value in &raw.sensors {
        let resolved_value = resolver::resolve_sensor_value(sensor_value, catalog)?;
        let sensor_config: SensorConfig = resolved_value.deserialize()?;
        tracing::info!(
            "Resolved sensor: {} #{}",
            sensor_config.get_kind_str(),
            sensor_config.id()
        );
        sensors.push(sensor_config);
    }

    let scenario = ScenarioConfig {
        simulation: raw.simulation,
        spacecraft: raw.spacecraft,
        environment: raw.environment,
        sensors,
    };
    validate(&scenario)?;
    Ok(scenario)
}

/// Checks the cross-field constraints serde cannot express.
fn validate(scenario: &ScenarioConfig) -> Result<(), SimError> {
    let sim = &scenario.simulation;
    if !(sim.base_step_s.is_finite() && sim.base_step_s > 0.0) {
        return Err(SimError::Scenario(format!(
            "base_step_s must be positive, got {}",
            sim.base_step_s
        )));
    }
    if !(sim.duration_s.is_finite() && sim.duration_s >= 0.0) {
        return Err(SimError::Scenario(format!(
            "duration_s must be non-negative, got {}",
            sim.duration_s
        )));
    }
    if sim.log_every == 0 {
        return Err(SimError::Scenario("log_every must be at least 1".to_string()));
    }
    let radius = scenario.spacecraft.orbit.radius_m;
    if !(radius.is_finite() && radius > 0.0) {
        return Err(SimError::Scenario(format!("orbit radius must be positive, got {radius}")));
    }

    // Telemetry columns are named after kind and id, so those pairs must be unique.
    let mut seen = std::collections::HashSet::new();
    for sensor in &scenario.sensors {
        if !seen.insert((sensor.get_kind_str().to_string(), sensor.id())) {
            return Err(SimError::Scenario(format!(
                "duplicate {} id {}",
                sensor.get_kind_str(),
                sensor.id()
            )));
        }
    }

    for constellation in &scenario.environment.constellations {
        if constellation.prefix.chars().count() != 1 {
            return Err(SimError::Scenario(format!(
                "constellation prefix must be a single letter, got '{}'",
                constellation.prefix
            )));
        }
        if constellation.planes == 0 || constellation.satellites_per_plane == 0 {
            return Err(SimError::Scenario(format!(
                "constellation '{}' needs at least one plane and one satellite per plane",
                constellation.prefix
            )));
        }
        if !(constellation.radius_m.is_finite() && constellation.radius_m > 0.0) {
            return Err(SimError::Scenario(format!(
                "constellation '{}' radius must be positive, got {}",
                constellation.prefix, constellation.radius_m
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra_core::types::CelestialBody;
    use structs::AntennaConfig;

    const SCENARIO: &str = r#"
        [simulation]
        seed = 7
        duration_s = 10.0
        base_step_s = 0.1

        [[sensors]]
        kind = "StarTracker"
        id = 0
        cross_sight_std_arcsec = 5.0
        exclusion = [{ body = "Sun", half_angle_deg = 30.0 }]

        [[sensors]]
        from = "sensors.patch"
        id = 1
    "#;

    fn catalog() -> PrefabCatalog {
        let mut catalog = PrefabCatalog::default();
        let patch = Figment::from(Toml::string(
            r#"
            kind = "GnssReceiver"
            id = 99
            antenna = { model = "Cone", half_angle_deg = 70.0, targets = "GE" }
            "#,
        ))
        .extract()
        .unwrap();
        catalog.0.insert("sensors.patch".to_string(), patch);
        catalog
    }

    #[test]
    fn resolves_inline_and_prefab_sensors() {
        let scenario = resolve_scenario(Figment::from(Toml::string(SCENARIO)), &catalog()).unwrap();
        assert_eq!(scenario.simulation.seed, 7);
        assert_eq!(scenario.sensors.len(), 2);

        let SensorConfig::StarTracker(stt) = &scenario.sensors[0] else {
            panic!("expected a star tracker");
        };
        assert_eq!(stt.exclusion[0].body, CelestialBody::Sun);
        assert_eq!(stt.timing.prescaler, 1);

        let SensorConfig::GnssReceiver(gnss) = &scenario.sensors[1] else {
            panic!("expected a GNSS receiver");
        };
        assert_eq!(gnss.id, 1);
        assert!(matches!(&gnss.antenna, AntennaConfig::Cone { targets, .. } if targets == "GE"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let source = format!("{SCENARIO}\n[spacecraft]\nmass_kg = 50.0\n");
        assert!(matches!(
            resolve_scenario(Figment::from(Toml::string(&source)), &catalog()),
            Err(SimError::Figment(_))
        ));
    }

    #[test]
    fn duplicate_sensor_ids_are_rejected() {
        let source = SCENARIO.replace("id = 1", "id = 99").replace("id = 0", "id = 5")
            + "\n[[sensors]]\nfrom = \"sensors.patch\"\n";
        assert!(matches!(
            resolve_scenario(Figment::from(Toml::string(&source)), &catalog()),
            Err(SimError::Scenario(_))
        ));
    }

    #[test]
    fn misspelled_antenna_key_is_rejected() {
        let source = SCENARIO.to_string()
            + "\n[[sensors]]\nkind = \"GnssReceiver\"\nid = 8\n\
               antenna = { model = \"Cone\", half_angle_deg = 70.0, targets = \"G\", occluder_radius = 1.0 }\n";
        assert!(matches!(
            resolve_scenario(Figment::from(Toml::string(&source)), &catalog()),
            Err(SimError::Figment(_))
        ));
    }

    #[test]
    fn nan_orbit_radius_is_rejected() {
        let source = SCENARIO.to_string() + "\n[spacecraft.orbit]\nradius_m = nan\n";
        assert!(matches!(
            resolve_scenario(Figment::from(Toml::string(&source)), &catalog()),
            Err(SimError::Scenario(_))
        ));
    }

    #[test]
    fn empty_constellation_shell_is_rejected() {
        for shell in ["planes = 0\nsatellites_per_plane = 4", "planes = 6\nsatellites_per_plane = 0"] {
            let source = format!(
                "{SCENARIO}\n[[environment.constellations]]\nprefix = \"G\"\n{shell}\n\
                 radius_m = 26560000.0\ninclination_deg = 55.0\n"
            );
            assert!(
                matches!(
                    resolve_scenario(Figment::from(Toml::string(&source)), &catalog()),
                    Err(SimError::Scenario(_))
                ),
                "{shell}"
            );
        }
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let source = SCENARIO.replace("base_step_s = 0.1", "base_step_s = 0.0");
        assert!(matches!(
            resolve_scenario(Figment::from(Toml::string(&source)), &catalog()),
            Err(SimError::Scenario(_))
        ));
    }
}
