//! Postal-code to address lookup against the ViaCEP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use valdir_core::{Address, PostalCode};

use crate::error::LocatorError;
use crate::http::{build_client, get_json, normalise_base_url};

const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressLookup {
    Found(Address),
    /// The service knows no address for this postal code.
    NotFound,
}

/// Resolves a postal code into a structured address.
#[async_trait]
pub trait AddressSource: Send + Sync {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<AddressLookup, LocatorError>;
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

impl From<ViaCepResponse> for Address {
    fn from(r: ViaCepResponse) -> Self {
        Address {
            postal_code: r.cep,
            street: r.logradouro,
            neighborhood: r.bairro,
            locality: r.localidade,
            region: r.uf,
        }
    }
}

/// Client for `GET {base}/{digits}/json/`.
pub struct ViaCepClient {
    client: Client,
    base_url: Url,
}

impl ViaCepClient {
    /// # Errors
    ///
    /// Returns [`LocatorError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout: Option<Duration>) -> Result<Self, LocatorError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Creates a client against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`LocatorError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Result<Self, LocatorError> {
        Ok(Self {
            client: build_client(None, timeout)?,
            base_url: normalise_base_url(base_url)?,
        })
    }

    fn lookup_url(&self, postal_code: &PostalCode) -> Result<Url, LocatorError> {
        self.base_url
            .join(&format!("{}/json/", postal_code.digits()))
            .map_err(|e| LocatorError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

/// The service flags unknown codes with `"erro": true`, and some deployments
/// send the string `"true"` instead.
fn is_not_found(body: &Value) -> bool {
    match body.get("erro") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[async_trait]
impl AddressSource for ViaCepClient {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<AddressLookup, LocatorError> {
        let url = self.lookup_url(postal_code)?;
        let body = get_json(&self.client, &url).await?;

        if is_not_found(&body) {
            tracing::info!(postal_code = %postal_code, "postal code not found");
            return Ok(AddressLookup::NotFound);
        }

        let response: ViaCepResponse =
            serde_json::from_value(body).map_err(|e| LocatorError::Deserialize {
                context: format!("address lookup({postal_code})"),
                source: e,
            })?;
        let address = Address::from(response);
        tracing::debug!(
            postal_code = %postal_code,
            locality = %address.locality,
            region = %address.region,
            "resolved address"
        );
        Ok(AddressLookup::Found(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_url_appends_digits_and_json() {
        let client = ViaCepClient::with_base_url("https://viacep.com.br/ws", None).unwrap();
        let code = PostalCode::parse("88310-002").unwrap();
        assert_eq!(
            client.lookup_url(&code).unwrap().as_str(),
            "https://viacep.com.br/ws/88310002/json/"
        );
    }

    #[test]
    fn not_found_flag_accepts_bool_and_string() {
        assert!(is_not_found(&serde_json::json!({"erro": true})));
        assert!(is_not_found(&serde_json::json!({"erro": "true"})));
        assert!(!is_not_found(&serde_json::json!({"erro": false})));
        assert!(!is_not_found(&serde_json::json!({"cep": "88310-002"})));
    }
}
