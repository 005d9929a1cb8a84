//! Typed holders for the values kept in client storage.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::{ClientStorage, StorageError};
use crate::stores::Store;
use crate::users::AdminUser;

/// Storage key holding the shopper's chosen store.
pub const SELECTED_STORE_KEY: &str = "valdir_loja";
/// Storage key holding the logged-in admin.
pub const SESSION_USER_KEY: &str = "valdir_user";

/// A single JSON value under one storage key.
#[derive(Clone)]
struct JsonSlot {
    storage: Arc<dyn ClientStorage>,
    key: &'static str,
}

impl JsonSlot {
    fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.storage.get(self.key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "ignoring unreadable stored value");
                Ok(None)
            }
        }
    }

    fn write<T: Serialize>(&self, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: self.key.to_string(),
            source,
        })?;
        self.storage.set(self.key, &raw)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(self.key)
    }
}

/// The persisted store selection. At most one exists per client; writing
/// replaces it.
#[derive(Clone)]
pub struct SelectedStoreState {
    slot: JsonSlot,
}

impl SelectedStoreState {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            slot: JsonSlot {
                storage,
                key: SELECTED_STORE_KEY,
            },
        }
    }

    /// The stored selection. A value that no longer parses counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage cannot be read.
    pub fn read(&self) -> Result<Option<Store>, StorageError> {
        self.slot.read()
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if storage cannot be written.
    pub fn write(&self, store: &Store) -> Result<(), StorageError> {
        tracing::debug!(store = %store.id, "persisting selected store");
        self.slot.write(store)
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if storage cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.slot.clear()
    }
}

/// The logged-in admin session.
#[derive(Clone)]
pub struct SessionState {
    slot: JsonSlot,
}

impl SessionState {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            slot: JsonSlot {
                storage,
                key: SESSION_USER_KEY,
            },
        }
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if storage cannot be read.
    pub fn read(&self) -> Result<Option<AdminUser>, StorageError> {
        self.slot.read()
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if storage cannot be written.
    pub fn write(&self, user: &AdminUser) -> Result<(), StorageError> {
        self.slot.write(user)
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if storage cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.slot.clear()
    }
}

/// Whether the storefront should open the locator prompt on start: only when
/// no store is stored, no product deep link is being opened, and no admin is
/// logged in.
#[must_use]
pub fn should_prompt_for_store(
    has_selection: bool,
    opening_product_link: bool,
    admin_logged_in: bool,
) -> bool {
    !has_selection && !opening_product_link && !admin_logged_in
}
