//! Physical store records and the locator data file that defines them.
//!
//! The two stores, the default store, the postal-prefix fallback threshold,
//! and the served-locality allow-list are data, loaded from
//! `config/locator.yaml` so tests can swap in synthetic sets.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One of the retailer's physical stores.
///
/// This is also the record persisted as the client's selected store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Messaging handle (international phone digits) used for contact links.
    pub contact_handle: String,
}

impl Store {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Postal-prefix heuristic used when the client's address cannot be geocoded.
///
/// Prefixes at or above `threshold` map to the first store, everything else to
/// the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixFallback {
    pub threshold: u32,
}

#[derive(Debug, Deserialize)]
struct LocatorFile {
    #[serde(default = "default_country")]
    country: String,
    default_store: String,
    prefix_fallback: PrefixFallback,
    stores: Vec<Store>,
    service_area: Vec<String>,
}

fn default_country() -> String {
    "Brasil".to_string()
}

/// Validated locator data: exactly two stores, a default store, the prefix
/// fallback, and the served-locality allow-list.
#[derive(Debug, Clone)]
pub struct LocatorData {
    country: String,
    stores: [Store; 2],
    default_index: usize,
    prefix_fallback: PrefixFallback,
    service_area: Vec<String>,
}

impl LocatorData {
    /// Builds locator data from its parts, applying the same validation as
    /// [`load_locator_data`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the stores, default store, or
    /// allow-list are inconsistent.
    pub fn new(
        country: impl Into<String>,
        stores: Vec<Store>,
        default_store: &str,
        prefix_fallback: PrefixFallback,
        service_area: Vec<String>,
    ) -> Result<Self, ConfigError> {
        validate_stores(&stores)?;

        let default_index = stores
            .iter()
            .position(|s| s.id == default_store)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "default_store '{default_store}' does not match any store id"
                ))
            })?;

        if service_area.is_empty() {
            return Err(ConfigError::Validation(
                "service_area must list at least one locality".to_string(),
            ));
        }
        if service_area.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "service_area entries must be non-empty".to_string(),
            ));
        }

        let stores: [Store; 2] = stores
            .try_into()
            .map_err(|_| ConfigError::Validation("exactly two stores are required".to_string()))?;

        Ok(Self {
            country: country.into(),
            stores,
            default_index,
            prefix_fallback,
            service_area,
        })
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Both stores, in configured order. Order matters: the first store wins
    /// distance ties and owns the upper postal-prefix range.
    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    #[must_use]
    pub fn first(&self) -> &Store {
        &self.stores[0]
    }

    #[must_use]
    pub fn second(&self) -> &Store {
        &self.stores[1]
    }

    #[must_use]
    pub fn default_store(&self) -> &Store {
        &self.stores[self.default_index]
    }

    #[must_use]
    pub fn store(&self, id: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn prefix_fallback(&self) -> PrefixFallback {
        self.prefix_fallback
    }

    #[must_use]
    pub fn service_area(&self) -> &[String] {
        &self.service_area
    }
}

/// Load and validate locator data from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_locator_data(path: &Path) -> Result<LocatorData, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocatorFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_locator_data(&content)
}

fn parse_locator_data(content: &str) -> Result<LocatorData, ConfigError> {
    let file: LocatorFile = serde_yaml::from_str(content)?;
    LocatorData::new(
        file.country,
        file.stores,
        &file.default_store,
        file.prefix_fallback,
        file.service_area,
    )
}

fn validate_stores(stores: &[Store]) -> Result<(), ConfigError> {
    if stores.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "exactly two stores are required, found {}",
            stores.len()
        )));
    }

    let mut seen_ids = HashSet::new();
    for store in stores {
        if store.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store id must be non-empty".to_string(),
            ));
        }
        if !seen_ids.insert(store.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store id: '{}'",
                store.id
            )));
        }
        if !(-90.0..=90.0).contains(&store.latitude)
            || !(-180.0..=180.0).contains(&store.longitude)
        {
            return Err(ConfigError::Validation(format!(
                "store '{}' has out-of-range coordinates ({}, {})",
                store.id, store.latitude, store.longitude
            )));
        }
        if store.contact_handle.is_empty()
            || !store.contact_handle.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::Validation(format!(
                "store '{}' contact_handle must be digits only",
                store.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
