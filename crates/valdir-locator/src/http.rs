use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::LocatorError;

const DEFAULT_USER_AGENT: &str = "ValdirMoveis/1.0";

/// Builds a `reqwest` client. No request timeout is applied unless one is
/// given.
pub(crate) fn build_client(
    user_agent: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Client, LocatorError> {
    let mut builder = Client::builder().user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Parses `base_url`, ensuring it ends with exactly one slash so relative
/// joins append to the path instead of replacing its last segment.
pub(crate) fn normalise_base_url(base_url: &str) -> Result<Url, LocatorError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| LocatorError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Sends a GET request, asserts a 2xx status, and parses the body as JSON.
pub(crate) async fn get_json(client: &Client, url: &Url) -> Result<serde_json::Value, LocatorError> {
    let response = client.get(url.clone()).send().await?;
    let response = response.error_for_status()?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| LocatorError::Deserialize {
        context: url.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalise_adds_single_trailing_slash() {
        let url = normalise_base_url("https://viacep.com.br/ws").unwrap();
        assert_eq!(url.as_str(), "https://viacep.com.br/ws/");
        let url = normalise_base_url("https://viacep.com.br/ws///").unwrap();
        assert_eq!(url.as_str(), "https://viacep.com.br/ws/");
    }

    #[test]
    fn normalise_rejects_garbage() {
        let err = normalise_base_url("not a url").unwrap_err();
        assert!(matches!(err, LocatorError::InvalidBaseUrl { .. }));
    }
}
