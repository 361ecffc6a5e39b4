// astra_sim/src/simulation/config/catalog.rs

//! The prefab catalog: reusable sensor definitions loaded from disk.

use figment::{
    providers::{Format, Toml},
    value::Value,
    Figment,
};
use std::{collections::HashMap, path::Path};
use walkdir::WalkDir;

/// The entire parsed catalog of prefabs.
/// The key is a namespace string (e.g., "sensors.star_tracker_default") and
/// the value is the raw, parsed TOML data for that prefab.
#[derive(Default, Debug, Clone)]
pub struct PrefabCatalog(pub HashMap<String, Value>);

impl PrefabCatalog {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Walks `catalog_path`, parses every `.toml` file, and keys it by its relative path.
///
/// A missing directory yields an empty catalog. A file that fails to parse is
/// skipped with an error log; scenarios referencing it fail later during resolution.
pub fn load_catalog_from_disk(catalog_path: &Path) -> PrefabCatalog {
    let mut catalog = PrefabCatalog::default();
    if !catalog_path.exists() {
        tracing::warn!(
            "Catalog directory not found at {:?}, no prefabs will be loaded.",
            catalog_path
        );
        return catalog;
    }

    tracing::info!("Loading prefab catalog from: {:?}", catalog_path);

    for entry in WalkDir::new(catalog_path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| !e.file_type().is_dir() && e.path().extension().is_some_and(|ext| ext == "toml"))
    {
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(catalog_path) else {
            continue;
        };
        // Create a key like "sensors.star_tracker_default" from the path.
        let key = relative
            .with_extension("")
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, ".");

        match Figment::new().merge(Toml::file(path)).extract::<Value>() {
            Ok(data) => {
                tracing::info!("Loaded catalog item: '{}'", key);
                catalog.0.insert(key, data);
            }
            Err(e) => {
                tracing::error!("Failed to load catalog item from {:?}: {}", path, e);
            }
        }
    }
    catalog
}
