use thiserror::Error;
use valdir_core::products::DraftError;

/// Errors returned by the managed backend client.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid backend URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The backend answered with a non-2xx status.
    #[error("backend error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        hint: Option<String>,
    },

    /// An update matched no row. Usually a row-level security policy.
    #[error("no rows updated for product {id}; check the table's access policies")]
    NoRowsAffected { id: i64 },

    /// An insert returned no row, usually for the same reason.
    #[error("insert returned no row; check the table's access policies")]
    EmptyInsert,

    #[error("Email ou senha incorretos")]
    InvalidCredentials,

    #[error("invalid product: {0}")]
    InvalidDraft(#[from] DraftError),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
