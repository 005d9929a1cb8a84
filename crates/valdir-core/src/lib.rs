pub mod address;
mod app_config;
pub mod catalog;
mod config;
pub mod contact;
pub mod postal;
pub mod products;
pub mod state;
pub mod storage;
pub mod stores;
pub mod text;
pub mod users;

pub use address::Address;
pub use app_config::{AppConfig, Environment};
pub use catalog::{Category, SearchScope, CATEGORIES};
pub use config::{load_app_config, load_app_config_from_env};
pub use postal::{format_postal_code, InvalidPostalCode, PostalCode};
pub use products::{format_brl, DraftError, PriceDisplay, Product, ProductDraft};
pub use state::{
    should_prompt_for_store, SelectedStoreState, SessionState, SELECTED_STORE_KEY, SESSION_USER_KEY,
};
pub use storage::{ClientStorage, FileStorage, MemoryStorage, StorageError};
pub use stores::{load_locator_data, Coordinate, LocatorData, PrefixFallback, Store};
pub use text::fold_key;
pub use users::{AdminUser, UserId};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read locator data file {path}: {source}")]
    LocatorFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locator data file: {0}")]
    LocatorFileParse(#[from] serde_yaml::Error),

    #[error("locator data validation failed: {0}")]
    Validation(String),
}
