use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use valdir_core::{
    ClientStorage, Coordinate, LocatorData, MemoryStorage, PostalCode, PrefixFallback,
};

use super::*;
use crate::address::{AddressLookup, AddressSource};
use crate::error::LocatorError;
use crate::geocode::{GeocodeOutcome, Geocoder};

struct FakeAddresses {
    locality: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl AddressSource for FakeAddresses {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<AddressLookup, LocatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if postal_code.digits() == "99999999" {
            return Ok(AddressLookup::NotFound);
        }
        Ok(AddressLookup::Found(Address {
            postal_code: postal_code.to_string(),
            street: "Rua Teste".to_string(),
            neighborhood: "Centro".to_string(),
            locality: self.locality.to_string(),
            region: "SC".to_string(),
        }))
    }
}

struct FakeGeocoder {
    outcome: GeocodeOutcome,
    calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, _query: &str) -> GeocodeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

fn store(id: &str, lat: f64, lng: f64) -> Store {
    Store {
        id: id.to_string(),
        name: id.to_string(),
        address: String::new(),
        postal_code: String::new(),
        latitude: lat,
        longitude: lng,
        contact_handle: "5547999254612".to_string(),
    }
}

fn data() -> Arc<LocatorData> {
    Arc::new(
        LocatorData::new(
            "Brasil",
            vec![
                store("cordeiros", -26.9147, -48.6897),
                store("sao-vicente", -26.9283, -48.7125),
            ],
            "cordeiros",
            PrefixFallback { threshold: 88310 },
            vec!["Itajaí".to_string(), "Navegantes".to_string()],
        )
        .unwrap(),
    )
}

struct Harness {
    addresses: Arc<FakeAddresses>,
    geocoder: Arc<FakeGeocoder>,
    storage: Arc<dyn ClientStorage>,
    locator: Locator,
}

impl Harness {
    fn new(locality: &'static str, outcome: GeocodeOutcome) -> Self {
        let addresses = Arc::new(FakeAddresses {
            locality,
            calls: AtomicUsize::new(0),
        });
        let geocoder = Arc::new(FakeGeocoder {
            outcome,
            calls: AtomicUsize::new(0),
        });
        let locator = Locator::new(data(), addresses.clone(), geocoder.clone());
        Self {
            addresses,
            geocoder,
            storage: Arc::new(MemoryStorage::new()),
            locator,
        }
    }

    fn flow(&self) -> LocatorFlow<'_> {
        LocatorFlow::new(&self.locator, SelectedStoreState::new(Arc::clone(&self.storage)))
    }

    fn persisted(&self) -> Option<String> {
        SelectedStoreState::new(Arc::clone(&self.storage))
            .read()
            .unwrap()
            .map(|s| s.id)
    }
}

#[tokio::test]
async fn open_without_selection_awaits_postal_code() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    assert_eq!(flow.open().unwrap(), &FlowState::AwaitingPostalCode);
}

#[tokio::test]
async fn invalid_format_makes_no_lookup_call() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    flow.open().unwrap();

    let state = flow.submit_postal_code("8831-00").await.unwrap();
    assert_eq!(state, &FlowState::AwaitingPostalCode);
    assert!(matches!(
        flow.last_error(),
        Some(LocateError::InvalidFormat(_))
    ));
    assert_eq!(h.addresses.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn not_found_returns_to_postal_code_entry() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    flow.open().unwrap();

    flow.submit_postal_code("99999-999").await.unwrap();
    assert_eq!(flow.state(), &FlowState::AwaitingPostalCode);
    assert!(matches!(flow.last_error(), Some(LocateError::NotFound { .. })));
    assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn no_geocoder_match_uses_prefix_then_confirms() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    flow.open().unwrap();

    let state = flow.submit_postal_code("88310002").await.unwrap().clone();
    let FlowState::AwaitingConfirmation {
        candidate,
        suggestion: Some(suggestion),
    } = &state
    else {
        panic!("expected a suggestion, got {state:?}");
    };
    assert_eq!(candidate.id, "cordeiros");
    assert_eq!(suggestion.postal_code.to_string(), "88310-002");
    assert_eq!(
        suggestion.basis,
        crate::select::SelectionBasis::PostalPrefix { prefix: 88310 }
    );

    flow.confirm().unwrap();
    assert_eq!(h.persisted().as_deref(), Some("cordeiros"));
    assert_eq!(
        flow.phases(),
        &[
            FlowPhase::Idle,
            FlowPhase::AwaitingPostalCode,
            FlowPhase::Validating,
            FlowPhase::LookingUpAddress,
            FlowPhase::Geocoding,
            FlowPhase::SelectingStore,
            FlowPhase::AwaitingConfirmation,
            FlowPhase::Persisted,
        ]
    );
}

#[tokio::test]
async fn geocoded_client_gets_nearest_store() {
    let h = Harness::new(
        "Itajaí",
        GeocodeOutcome::Located(Coordinate::new(-26.93, -48.715)),
    );
    let mut flow = h.flow();
    flow.open().unwrap();
    flow.submit_postal_code("88309-202").await.unwrap();
    flow.confirm().unwrap();
    assert_eq!(h.persisted().as_deref(), Some("sao-vicente"));
}

#[tokio::test]
async fn geocoder_unavailable_falls_back_to_default() {
    let h = Harness::new("Itajaí", GeocodeOutcome::Unavailable("boom".into()));
    let mut flow = h.flow();
    flow.open().unwrap();
    flow.submit_postal_code("88309-202").await.unwrap();
    assert!(flow.last_error().is_none());
    flow.confirm().unwrap();
    assert_eq!(h.persisted().as_deref(), Some("cordeiros"));
}

#[tokio::test]
async fn area_not_served_override_persists_default_without_geocoding() {
    let h = Harness::new("São Paulo", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    flow.open().unwrap();

    let state = flow.submit_postal_code("01310100").await.unwrap();
    assert!(matches!(state, FlowState::AreaNotServed { address } if address.locality == "São Paulo"));

    flow.continue_anyway().unwrap();
    assert_eq!(h.persisted().as_deref(), Some("cordeiros"));
    assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 0);
    assert!(!flow.phases().contains(&FlowPhase::Geocoding));
}

#[tokio::test]
async fn retry_after_area_not_served() {
    let h = Harness::new("São Paulo", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    flow.open().unwrap();
    flow.submit_postal_code("01310100").await.unwrap();
    assert_eq!(flow.retry().unwrap(), &FlowState::AwaitingPostalCode);
}

#[tokio::test]
async fn skip_persists_default_store() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    flow.open().unwrap();
    flow.continue_anyway().unwrap();
    assert_eq!(h.persisted().as_deref(), Some("cordeiros"));
    assert_eq!(h.addresses.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn reopening_with_selection_lands_on_store_switch_view() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    {
        let mut flow = h.flow();
        flow.open().unwrap();
        flow.continue_anyway().unwrap();
    }

    let mut flow = h.flow();
    let state = flow.open().unwrap();
    assert!(matches!(
        state,
        FlowState::AwaitingConfirmation { candidate, suggestion: None } if candidate.id == "cordeiros"
    ));

    flow.choose_store("sao-vicente").unwrap();
    flow.confirm().unwrap();
    assert_eq!(h.persisted().as_deref(), Some("sao-vicente"));
}

#[tokio::test]
async fn change_postal_code_from_confirmation() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    flow.open().unwrap();
    flow.submit_postal_code("88310002").await.unwrap();
    assert_eq!(
        flow.change_postal_code().unwrap(),
        &FlowState::AwaitingPostalCode
    );
}

#[tokio::test]
async fn choose_unknown_store_is_rejected() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    flow.open().unwrap();
    flow.submit_postal_code("88310002").await.unwrap();
    let err = flow.choose_store("matriz").unwrap_err();
    assert!(matches!(err, FlowError::UnknownStore(id) if id == "matriz"));
}

#[tokio::test]
async fn close_requires_a_persisted_selection() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    flow.open().unwrap();
    assert!(matches!(flow.close(), Err(FlowError::SelectionRequired)));

    flow.continue_anyway().unwrap();
    assert_eq!(flow.close().unwrap(), &FlowState::Idle);
}

#[tokio::test]
async fn operations_out_of_order_are_rejected() {
    let h = Harness::new("Itajaí", GeocodeOutcome::NoMatch);
    let mut flow = h.flow();
    assert!(matches!(
        flow.confirm(),
        Err(FlowError::InvalidTransition { .. })
    ));
    assert!(matches!(
        flow.submit_postal_code("88310002").await,
        Err(FlowError::InvalidTransition { .. })
    ));
    flow.open().unwrap();
    assert!(matches!(flow.retry(), Err(FlowError::InvalidTransition { .. })));
}
