// astra_sim/src/simulation/config/resolver.rs

use super::catalog::PrefabCatalog;
use crate::error::SimError;
use figment::value::{Dict, Tag, Value};

/// Resolves every `{ from = "..." }` reference inside a sensor entry.
pub fn resolve_sensor_value(sensor_value: &Value, catalog: &PrefabCatalog) -> Result<Value, SimError> {
    resolve_value_recursively(sensor_value, catalog, &mut Vec::new())
}

/// Merges `override_dict` into `base`, recursing into nested tables.
fn deep_merge(base: &mut Dict, override_dict: &Dict) {
    for (key, override_val) in override_dict {
        // The reference itself is metadata, not data.
        if key == "from" {
            continue;
        }

        // A nested `from` replaces the whole subtree instead of merging into it.
        if override_val.as_dict().is_some_and(|d| d.contains_key("from")) {
            base.insert(key.clone(), override_val.clone());
            continue;
        }

        if let Some(base_val) = base.get_mut(key) {
            if let (Some(base_sub_dict), Some(override_sub_dict)) = (base_val.as_dict(), override_val.as_dict()) {
                let mut new_sub_dict = base_sub_dict.clone();
                deep_merge(&mut new_sub_dict, override_sub_dict);
                *base_val = Value::Dict(Tag::Default, new_sub_dict);
                continue;
            }
        }
        base.insert(key.clone(), override_val.clone());
    }
}

/// Pre-order traversal: resolve the current node first, then its children.
/// `chain` holds the prefab keys currently being expanded, to catch cycles.
fn resolve_value_recursively(value: &Value, catalog: &PrefabCatalog, chain: &mut Vec<String>) -> Result<Value, SimError> {
    let current_node = match value.as_dict() {
        Some(dict) => match dict.get("from").and_then(|v| v.as_str()) {
            Some(from_key) => {
                if chain.iter().any(|k| k == from_key) {
                    return Err(SimError::PrefabCycle(from_key.to_string()));
                }
                let base_prefab_data = catalog
                    .get(from_key)
                    .ok_or_else(|| SimError::PrefabNotFound(from_key.to_string()))?;

                chain.push(from_key.to_string());
                let resolved_base = resolve_value_recursively(base_prefab_data, catalog, chain)?;
                chain.pop();

                let mut final_dict = resolved_base
                    .into_dict()
                    .ok_or_else(|| SimError::PrefabNotATable(from_key.to_string()))?;
                deep_merge(&mut final_dict, dict);
                Value::Dict(Tag::Default, final_dict)
            }
            None => value.clone(),
        },
        None => value.clone(),
    };

    match &current_node {
        Value::Dict(tag, dict) => {
            let mut new_dict = Dict::new();
            for (key, val) in dict.iter() {
                if key == "from" {
                    continue;
                }
                new_dict.insert(key.clone(), resolve_value_recursively(val, catalog, chain)?);
            }
            Ok(Value::Dict(*tag, new_dict))
        }
        Value::Array(tag, arr) => {
            let mut resolved_arr = Vec::with_capacity(arr.len());
            for item in arr {
                resolved_arr.push(resolve_value_recursively(item, catalog, chain)?);
            }
            Ok(Value::Array(*tag, resolved_arr))
        }
        _ => Ok(current_node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Toml};
    use figment::Figment;

    fn parse(source: &str) -> Value {
        Figment::from(Toml::string(source)).extract::<Value>().unwrap()
    }

    fn catalog() -> PrefabCatalog {
        let mut catalog = PrefabCatalog::default();
        catalog.0.insert(
            "sensors.base".to_string(),
            parse(
                r#"
                kind = "GnssReceiver"
                id = 0
                [antenna]
                model = "Cone"
                half_angle_deg = 80.0
                targets = "G"
                [timing]
                prescaler = 10
                output_interval = 1
                "#,
            ),
        );
        catalog.0.insert("sensors.derived".to_string(), parse(r#"from = "sensors.base""#));
        catalog.0.insert("sensors.loop_a".to_string(), parse(r#"from = "sensors.loop_b""#));
        catalog.0.insert("sensors.loop_b".to_string(), parse(r#"from = "sensors.loop_a""#));
        catalog
    }

    fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
        path.iter().try_fold(value, |v, key| v.as_dict()?.get(*key))
    }

    #[test]
    fn overrides_merge_into_nested_tables() {
        let entry = parse(
            r#"
            from = "sensors.derived"
            id = 3
            [timing]
            output_interval = 5
            "#,
        );
        let resolved = resolve_sensor_value(&entry, &catalog()).unwrap();
        assert!(lookup(&resolved, &["from"]).is_none());
        assert_eq!(lookup(&resolved, &["id"]).and_then(Value::to_i128), Some(3));
        assert_eq!(lookup(&resolved, &["timing", "prescaler"]).and_then(Value::to_i128), Some(10));
        assert_eq!(lookup(&resolved, &["timing", "output_interval"]).and_then(Value::to_i128), Some(5));
        assert_eq!(lookup(&resolved, &["antenna", "targets"]).and_then(Value::as_str), Some("G"));
    }

    #[test]
    fn missing_prefab_is_an_error() {
        let entry = parse(r#"from = "sensors.nope""#);
        assert!(matches!(
            resolve_sensor_value(&entry, &catalog()),
            Err(SimError::PrefabNotFound(key)) if key == "sensors.nope"
        ));
    }

    #[test]
    fn cyclic_prefabs_are_rejected() {
        let entry = parse(r#"from = "sensors.loop_a""#);
        assert!(matches!(resolve_sensor_value(&entry, &catalog()), Err(SimError::PrefabCycle(_))));
    }

    #[test]
    fn plain_values_pass_through() {
        let entry = parse(r#"kind = "StarTracker""#);
        let resolved = resolve_sensor_value(&entry, &catalog()).unwrap();
        assert_eq!(lookup(&resolved, &["kind"]).and_then(Value::as_str), Some("StarTracker"));
    }
}
