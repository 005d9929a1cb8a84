//! End-to-end locator runs against the shipped locator data with both
//! external services mocked.

use std::path::Path;
use std::sync::Arc;

use valdir_core::{
    load_locator_data, ClientStorage, LocatorData, MemoryStorage, SelectedStoreState,
};
use valdir_locator::{
    FlowPhase, FlowState, LocateError, Locator, LocatorFlow, NominatimClient,
    SelectionBasis, ViaCepClient,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn locator_data() -> Arc<LocatorData> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("locator.yaml");
    Arc::new(load_locator_data(&path).expect("failed to load locator.yaml"))
}

fn locator(server: &MockServer) -> Locator {
    let addresses = ViaCepClient::with_base_url(&format!("{}/ws", server.uri()), None)
        .expect("client construction should not fail");
    let geocoder = NominatimClient::with_base_url(&server.uri(), "ValdirMoveis/1.0", None)
        .expect("client construction should not fail");
    Locator::new(locator_data(), Arc::new(addresses), Arc::new(geocoder))
}

async fn mount_viacep(server: &MockServer, digits: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/ws/{digits}/json/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn itajai_without_geocoder_match_resolves_to_cordeiros() {
    let server = MockServer::start().await;
    mount_viacep(
        &server,
        "88310002",
        serde_json::json!({
            "cep": "88310-002",
            "logradouro": "Rua Doutor Reinaldo Schmithausen",
            "bairro": "Cordeiros",
            "localidade": "Itajaí",
            "uf": "SC"
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let locator = locator(&server);
    let storage: Arc<dyn ClientStorage> = Arc::new(MemoryStorage::new());
    let mut flow = LocatorFlow::new(&locator, SelectedStoreState::new(Arc::clone(&storage)));

    flow.open().unwrap();
    let state = flow.submit_postal_code("88310002").await.unwrap();
    let FlowState::AwaitingConfirmation {
        candidate,
        suggestion: Some(suggestion),
    } = state
    else {
        panic!("expected a suggestion, got {state:?}");
    };
    assert_eq!(suggestion.postal_code.to_string(), "88310-002");
    assert_eq!(candidate.id, "cordeiros");
    assert_eq!(suggestion.basis, SelectionBasis::PostalPrefix { prefix: 88310 });

    flow.confirm().unwrap();
    let persisted = SelectedStoreState::new(storage).read().unwrap().unwrap();
    assert_eq!(persisted.name, "Cordeiros");
    assert_eq!(flow.phases().last(), Some(&FlowPhase::Persisted));
}

#[tokio::test]
async fn sao_paulo_is_not_served_and_override_skips_geocoding() {
    let server = MockServer::start().await;
    mount_viacep(
        &server,
        "01310100",
        serde_json::json!({
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP"
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let locator = locator(&server);
    let storage: Arc<dyn ClientStorage> = Arc::new(MemoryStorage::new());
    let mut flow = LocatorFlow::new(&locator, SelectedStoreState::new(Arc::clone(&storage)));

    flow.open().unwrap();
    let state = flow.submit_postal_code("01310100").await.unwrap();
    assert!(matches!(state, FlowState::AreaNotServed { .. }));

    flow.continue_anyway().unwrap();
    let persisted = SelectedStoreState::new(storage).read().unwrap().unwrap();
    assert_eq!(persisted.id, "cordeiros");
}

#[tokio::test]
async fn geocoded_sao_vicente_client_gets_sao_vicente() {
    let server = MockServer::start().await;
    mount_viacep(
        &server,
        "88309202",
        serde_json::json!({
            "cep": "88309-202",
            "logradouro": "Rua Estefano José Vanolli",
            "bairro": "São Vicente",
            "localidade": "Itajaí",
            "uf": "SC"
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "-26.9280", "lon": "-48.7120"}
        ])))
        .mount(&server)
        .await;

    let suggestion = locator(&server).locate("88309-202").await.unwrap();
    assert_eq!(suggestion.store.id, "sao-vicente");
    assert!(matches!(suggestion.basis, SelectionBasis::Distance { km } if km < 1.0));
}

#[tokio::test]
async fn geocoder_outage_falls_back_to_default_store() {
    let server = MockServer::start().await;
    mount_viacep(
        &server,
        "88309202",
        serde_json::json!({
            "cep": "88309-202",
            "logradouro": "Rua Estefano José Vanolli",
            "bairro": "São Vicente",
            "localidade": "Itajaí",
            "uf": "SC"
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let suggestion = locator(&server).locate("88309202").await.unwrap();
    assert_eq!(suggestion.store.id, "cordeiros");
    assert_eq!(suggestion.basis, SelectionBasis::Default);
}

#[tokio::test]
async fn lookup_outage_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = locator(&server).locate("88310002").await.unwrap_err();
    assert!(matches!(err, LocateError::LookupFailed(_)), "got {err:?}");
    assert_eq!(err.code(), "lookup_failed");
}

#[tokio::test]
async fn short_code_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = locator(&server).locate("8831000").await.unwrap_err();
    assert!(matches!(err, LocateError::InvalidFormat(_)));
}
