//! HTTP client for the managed backend's PostgREST interface.
//!
//! Every request carries the project's anon key both as `apikey` and as a
//! bearer token. Non-2xx responses are decoded from PostgREST's error body
//! into [`BackendError::Api`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use valdir_core::{AdminUser, Product, ProductDraft};

use crate::error::BackendError;

const PRODUCTS_TABLE: &str = "produtos";
const USERS_TABLE: &str = "usuarios";

/// Client for the products and users tables.
///
/// Use [`BackendClient::new`] with the project URL; in tests point it at a
/// wiremock server.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidBaseUrl`] if `base_url` does not parse
    /// or `api_key` is not a valid header value, or [`BackendError::Http`] if
    /// the `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let invalid = |reason: String| BackendError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key).map_err(|e| invalid(e.to_string()))?;
        key.set_sensitive(true);
        headers.insert("apikey", key);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| invalid(e.to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent("valdir-backend/0.1");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn table_url(&self, table: &str, params: &[(&str, &str)]) -> Result<Url, BackendError> {
        let mut url = self
            .base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| BackendError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Sends the request and maps non-2xx statuses to [`BackendError::Api`].
    async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message, hint) = match serde_json::from_str::<PostgrestError>(&body) {
            Ok(err) => {
                let message = match (err.message, err.details) {
                    (Some(m), Some(d)) if !d.is_empty() => format!("{m} ({d})"),
                    (Some(m), _) => m,
                    (None, Some(d)) => d,
                    (None, None) => status.to_string(),
                };
                (err.code, message, err.hint)
            }
            Err(_) if body.trim().is_empty() => (None, status.to_string(), None),
            Err(_) => (None, body, None),
        };
        tracing::warn!(status = status.as_u16(), ?code, %message, "backend request failed");
        Err(BackendError::Api {
            status: status.as_u16(),
            code,
            message,
            hint,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, BackendError> {
        let body = Self::send(request).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Api`] if the backend rejects the query.
    /// - [`BackendError::Http`] on network failure.
    /// - [`BackendError::Deserialize`] if rows do not match [`Product`].
    pub async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let url = self.table_url(
            PRODUCTS_TABLE,
            &[("select", "*"), ("order", "created_at.desc")],
        )?;
        let products: Vec<Product> =
            Self::send_json(self.request(Method::GET, url), "list_products").await?;
        tracing::debug!(count = products.len(), "fetched products");
        Ok(products)
    }

    /// # Errors
    ///
    /// Same as [`BackendClient::list_products`].
    pub async fn get_product(&self, id: i64) -> Result<Option<Product>, BackendError> {
        let filter = format!("eq.{id}");
        let url = self.table_url(PRODUCTS_TABLE, &[("select", "*"), ("id", &filter)])?;
        let rows: Vec<Product> = Self::send_json(
            self.request(Method::GET, url),
            &format!("get_product(id={id})"),
        )
        .await?;
        Ok(rows.into_iter().next())
    }

    /// Inserts a product and returns the stored row.
    ///
    /// # Errors
    ///
    /// - [`BackendError::InvalidDraft`] if the draft fails validation.
    /// - [`BackendError::EmptyInsert`] if the backend returned no row.
    /// - Otherwise as [`BackendClient::list_products`].
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, BackendError> {
        let draft = draft.normalized()?;
        let url = self.table_url(PRODUCTS_TABLE, &[("select", "*")])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&draft);
        let rows: Vec<Product> = Self::send_json(request, "create_product").await?;
        let product = rows
            .into_iter()
            .next()
            .ok_or(BackendError::EmptyInsert)?;
        tracing::info!(id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Overwrites the editable fields of product `id`. Blank optional fields
    /// are cleared; images are left as they are.
    ///
    /// # Errors
    ///
    /// - [`BackendError::InvalidDraft`] if the draft fails validation.
    /// - [`BackendError::NoRowsAffected`] if no row was updated.
    /// - Otherwise as [`BackendClient::list_products`].
    pub async fn update_product(
        &self,
        id: i64,
        draft: ProductDraft,
    ) -> Result<Product, BackendError> {
        let draft = ProductDraft {
            images: None,
            ..draft.normalized()?
        };
        let filter = format!("eq.{id}");
        let url = self.table_url(PRODUCTS_TABLE, &[("id", &filter), ("select", "*")])?;
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&draft);
        let rows: Vec<Product> =
            Self::send_json(request, &format!("update_product(id={id})")).await?;
        match rows.into_iter().next() {
            Some(product) => {
                tracing::info!(id, "product updated");
                Ok(product)
            }
            None => {
                tracing::warn!(id, "update matched no rows");
                Err(BackendError::NoRowsAffected { id })
            }
        }
    }

    /// # Errors
    ///
    /// - [`BackendError::Api`] if the backend rejects the delete.
    /// - [`BackendError::Http`] on network failure.
    pub async fn delete_product(&self, id: i64) -> Result<(), BackendError> {
        let filter = format!("eq.{id}");
        let url = self.table_url(PRODUCTS_TABLE, &[("id", &filter)])?;
        Self::send(self.request(Method::DELETE, url)).await?;
        tracing::info!(id, "product deleted");
        Ok(())
    }

    /// Looks up the admin with these credentials. Exactly one row must match.
    ///
    /// # Errors
    ///
    /// - [`BackendError::InvalidCredentials`] unless exactly one user matches.
    /// - Otherwise as [`BackendClient::list_products`].
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminUser, BackendError> {
        let email_filter = format!("eq.{email}");
        let password_filter = format!("eq.{password}");
        let url = self.table_url(
            USERS_TABLE,
            &[
                ("select", "*"),
                ("email", &email_filter),
                ("senha", &password_filter),
            ],
        )?;
        let mut rows: Vec<AdminUser> =
            Self::send_json(self.request(Method::GET, url), "authenticate").await?;
        if rows.len() != 1 {
            tracing::info!(email, matches = rows.len(), "login rejected");
            return Err(BackendError::InvalidCredentials);
        }
        let user = rows.remove(0);
        tracing::info!(email, "admin authenticated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(base, "anon-key", None).expect("client construction should not fail")
    }

    #[test]
    fn table_url_joins_rest_path_and_params() {
        let url = client("https://abc.supabase.co")
            .table_url("produtos", &[("select", "*"), ("id", "eq.7")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/rest/v1/produtos?select=*&id=eq.7"
        );
    }

    #[test]
    fn table_url_without_params_has_no_query() {
        let url = client("https://abc.supabase.co/").table_url("usuarios", &[]).unwrap();
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/usuarios");
    }

    #[test]
    fn new_rejects_invalid_url() {
        let err = BackendClient::new("nope", "k", None).err().expect("should fail");
        assert!(matches!(err, BackendError::InvalidBaseUrl { .. }));
    }
}
