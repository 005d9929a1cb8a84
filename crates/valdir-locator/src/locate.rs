//! The postal-code to store pipeline.

use std::sync::Arc;

use serde::Serialize;
use valdir_core::{Address, LocatorData, PostalCode, Store};

use crate::address::{AddressLookup, AddressSource};
use crate::error::LocateError;
use crate::flow::FlowPhase;
use crate::geocode::{GeocodeOutcome, Geocoder};
use crate::select::{SelectionBasis, StoreSelector};
use crate::service_area::ServiceArea;

/// A store proposed for a postal code, awaiting the shopper's confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSuggestion {
    pub postal_code: PostalCode,
    pub address: Address,
    pub store: Store,
    pub basis: SelectionBasis,
}

/// Runs lookup, service-area check, geocoding and selection in sequence.
#[derive(Clone)]
pub struct Locator {
    data: Arc<LocatorData>,
    area: ServiceArea,
    addresses: Arc<dyn AddressSource>,
    geocoder: Arc<dyn Geocoder>,
}

impl Locator {
    pub fn new(
        data: Arc<LocatorData>,
        addresses: Arc<dyn AddressSource>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        let area = ServiceArea::from_locator(&data);
        Self {
            data,
            area,
            addresses,
            geocoder,
        }
    }

    #[must_use]
    pub fn data(&self) -> &LocatorData {
        &self.data
    }

    /// # Errors
    ///
    /// See [`Locator::locate_with`].
    pub async fn locate(&self, raw: &str) -> Result<StoreSuggestion, LocateError> {
        self.locate_with(raw, |_| {}).await
    }

    /// Suggests a store for the postal code in `raw`, reporting each stage
    /// to `on_phase` as it starts.
    ///
    /// No external call is made for malformed input, and the geocoder is not
    /// called for areas outside the service area.
    ///
    /// # Errors
    ///
    /// - [`LocateError::InvalidFormat`] unless `raw` holds exactly 8 digits.
    /// - [`LocateError::NotFound`] if the lookup service knows no address.
    /// - [`LocateError::AreaNotServed`] if the address's locality is not served.
    /// - [`LocateError::LookupFailed`] if the lookup service call failed.
    pub async fn locate_with<F>(
        &self,
        raw: &str,
        mut on_phase: F,
    ) -> Result<StoreSuggestion, LocateError>
    where
        F: FnMut(FlowPhase) + Send,
    {
        on_phase(FlowPhase::Validating);
        let postal_code = PostalCode::parse(raw)?;

        on_phase(FlowPhase::LookingUpAddress);
        let address = match self
            .addresses
            .lookup(&postal_code)
            .await
            .map_err(LocateError::LookupFailed)?
        {
            AddressLookup::Found(address) => address,
            AddressLookup::NotFound => {
                return Err(LocateError::NotFound {
                    postal_code: postal_code.to_string(),
                })
            }
        };

        if !self.area.is_served(&address.locality) {
            tracing::info!(
                postal_code = %postal_code,
                locality = %address.locality,
                "locality outside service area"
            );
            return Err(LocateError::AreaNotServed { address });
        }

        on_phase(FlowPhase::Geocoding);
        let query = address.geocoding_query(self.data.country());
        let outcome = self.geocoder.geocode(&query).await;
        if let GeocodeOutcome::Unavailable(reason) = &outcome {
            tracing::warn!(
                postal_code = %postal_code,
                reason = %reason,
                "geocoding unavailable, falling back to default store"
            );
        }

        on_phase(FlowPhase::SelectingStore);
        let prefix = address.postal_prefix().unwrap_or_else(|| postal_code.prefix());
        let selection = StoreSelector::new(&self.data).select(&outcome, prefix);
        tracing::info!(
            postal_code = %postal_code,
            store = %selection.store.id,
            basis = ?selection.basis,
            "store suggested"
        );

        Ok(StoreSuggestion {
            postal_code,
            address,
            store: selection.store,
            basis: selection.basis,
        })
    }
}
