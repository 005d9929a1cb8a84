//! Picks one of the two stores for a client.

use serde::Serialize;
use valdir_core::{Coordinate, LocatorData, Store};

use crate::distance::haversine_km;
use crate::geocode::GeocodeOutcome;

/// How a store was chosen. Anything but `Distance` is an approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionBasis {
    /// Nearest store by great-circle distance.
    Distance { km: f64 },
    /// The client could not be geocoded; chosen by postal prefix.
    PostalPrefix { prefix: u32 },
    /// The geocoder was unavailable; the configured default.
    Default,
}

impl SelectionBasis {
    #[must_use]
    pub fn is_approximate(&self) -> bool {
        !matches!(self, SelectionBasis::Distance { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub store: Store,
    pub basis: SelectionBasis,
}

pub struct StoreSelector<'a> {
    data: &'a LocatorData,
}

impl<'a> StoreSelector<'a> {
    #[must_use]
    pub fn new(data: &'a LocatorData) -> Self {
        Self { data }
    }

    /// The nearer store; ties go to the first store.
    #[must_use]
    pub fn nearest(&self, client: Coordinate) -> Selection {
        let first = self.data.first();
        let second = self.data.second();
        let d_first = haversine_km(client, first.coordinate());
        let d_second = haversine_km(client, second.coordinate());
        tracing::debug!(
            first = %first.id,
            d_first,
            second = %second.id,
            d_second,
            "store distances"
        );

        let (store, km) = if d_first <= d_second {
            (first, d_first)
        } else {
            (second, d_second)
        };
        Selection {
            store: store.clone(),
            basis: SelectionBasis::Distance { km },
        }
    }

    /// Prefixes at or above the threshold map to the first store, everything
    /// else to the second.
    #[must_use]
    pub fn by_postal_prefix(&self, prefix: u32) -> Selection {
        let store = if prefix >= self.data.prefix_fallback().threshold {
            self.data.first()
        } else {
            self.data.second()
        };
        Selection {
            store: store.clone(),
            basis: SelectionBasis::PostalPrefix { prefix },
        }
    }

    #[must_use]
    pub fn default_store(&self) -> Selection {
        Selection {
            store: self.data.default_store().clone(),
            basis: SelectionBasis::Default,
        }
    }

    /// Always yields exactly one store for a geocoding outcome.
    #[must_use]
    pub fn select(&self, outcome: &GeocodeOutcome, postal_prefix: u32) -> Selection {
        match outcome {
            GeocodeOutcome::Located(coordinate) => self.nearest(*coordinate),
            GeocodeOutcome::NoMatch => self.by_postal_prefix(postal_prefix),
            GeocodeOutcome::Unavailable(_) => self.default_store(),
        }
    }
}
