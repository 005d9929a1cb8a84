use thiserror::Error;
use valdir_core::{Address, InvalidPostalCode};

/// Errors returned by the address lookup and geocoding HTTP clients.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Network or TLS failure, or a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a postal code did not produce a store suggestion.
///
/// Geocoding failures never appear here; they degrade to a fallback store.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("Digite um CEP válido com 8 dígitos ({0})")]
    InvalidFormat(#[from] InvalidPostalCode),

    #[error("CEP {postal_code} não encontrado")]
    NotFound { postal_code: String },

    #[error("Ainda não atendemos {}", address.locality)]
    AreaNotServed { address: Address },

    #[error("Erro ao buscar CEP. Tente novamente. ({0})")]
    LookupFailed(#[source] LocatorError),
}

impl LocateError {
    /// Stable machine-readable code, used by the HTTP API.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            LocateError::InvalidFormat(_) => "invalid_postal_code",
            LocateError::NotFound { .. } => "postal_code_not_found",
            LocateError::AreaNotServed { .. } => "area_not_served",
            LocateError::LookupFailed(_) => "lookup_failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },

    #[error("unknown store id: {0}")]
    UnknownStore(String),

    #[error("a store must be selected before closing")]
    SelectionRequired,

    #[error(transparent)]
    Storage(#[from] valdir_core::StorageError),
}
