//! Store locator: postal code to nearest store.
//!
//! The pipeline is postal-code validation, address lookup, service-area
//! check, geocoding, distance comparison, and store selection. It runs on a
//! single task with sequential awaits. [`LocatorFlow`] drives it
//! interactively and persists the shopper's choice.

pub mod address;
pub mod distance;
pub mod error;
pub mod flow;
pub mod geocode;
mod http;
pub mod locate;
pub mod select;
pub mod service_area;

pub use address::{AddressLookup, AddressSource, ViaCepClient};
pub use distance::haversine_km;
pub use error::{FlowError, LocateError, LocatorError};
pub use flow::{FlowPhase, FlowState, LocatorFlow};
pub use geocode::{GeocodeOutcome, Geocoder, NominatimClient};
pub use locate::{Locator, StoreSuggestion};
pub use select::{Selection, SelectionBasis, StoreSelector};
pub use service_area::ServiceArea;
