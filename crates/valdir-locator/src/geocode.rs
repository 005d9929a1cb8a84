//! Free-text address geocoding against a Nominatim search endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use valdir_core::Coordinate;

use crate::error::LocatorError;
use crate::http::{build_client, get_json, normalise_base_url};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Result of a geocoding attempt. Never an error: callers fall back on
/// anything other than [`GeocodeOutcome::Located`].
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Located(Coordinate),
    /// The service answered but had no usable candidate.
    NoMatch,
    /// The service could not be reached or returned garbage.
    Unavailable(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> GeocodeOutcome;
}

pub struct NominatimClient {
    client: Client,
    base_url: Url,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`LocatorError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, LocatorError> {
        Self::with_base_url(DEFAULT_BASE_URL, user_agent, timeout)
    }

    /// The service requires clients to identify themselves, so every request
    /// carries `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`LocatorError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        base_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, LocatorError> {
        Ok(Self {
            client: build_client(Some(user_agent), timeout)?,
            base_url: normalise_base_url(base_url)?,
        })
    }

    fn search_url(&self, query: &str) -> Result<Url, LocatorError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| LocatorError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("limit", "1");
        Ok(url)
    }

    async fn search(&self, query: &str) -> Result<Value, LocatorError> {
        let url = self.search_url(query)?;
        get_json(&self.client, &url).await
    }
}

/// Reads the top candidate's `lat`/`lon`, which the service sends as
/// strings.
fn top_candidate(body: &Value) -> Option<Coordinate> {
    let first = body.as_array()?.first()?;
    let latitude = coordinate_field(first.get("lat")?)?;
    let longitude = coordinate_field(first.get("lon")?)?;
    Some(Coordinate::new(latitude, longitude))
}

fn coordinate_field(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> GeocodeOutcome {
        match self.search(query).await {
            Ok(body) => match top_candidate(&body) {
                Some(coordinate) => {
                    tracing::debug!(
                        latitude = coordinate.latitude,
                        longitude = coordinate.longitude,
                        "geocoded address"
                    );
                    GeocodeOutcome::Located(coordinate)
                }
                None => {
                    tracing::info!(query, "geocoder returned no usable candidate");
                    GeocodeOutcome::NoMatch
                }
            },
            Err(e) => {
                tracing::warn!(query, error = %e, "geocoder unavailable");
                GeocodeOutcome::Unavailable(e.to_string())
            }
        }
    }
}
