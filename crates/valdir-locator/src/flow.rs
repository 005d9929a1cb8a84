//! Interactive store-locator flow.
//!
//! Wraps [`Locator`] with the steps a shopper goes through: enter a postal
//! code, review the suggested store, optionally switch to the other store,
//! then confirm. Confirmation persists the store through
//! [`SelectedStoreState`].

use serde::Serialize;
use valdir_core::{Address, SelectedStoreState, Store};

use crate::error::{FlowError, LocateError};
use crate::locate::{Locator, StoreSuggestion};

/// Every phase the flow can pass through, including the transient ones
/// entered while a postal code is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    Idle,
    AwaitingPostalCode,
    Validating,
    LookingUpAddress,
    AreaNotServed,
    Geocoding,
    SelectingStore,
    AwaitingConfirmation,
    Persisted,
}

/// The resting states of the flow between shopper actions.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Idle,
    AwaitingPostalCode,
    AreaNotServed {
        address: Address,
    },
    /// `suggestion` is `None` in the store-switch view, opened with a store
    /// already persisted.
    AwaitingConfirmation {
        candidate: Store,
        suggestion: Option<StoreSuggestion>,
    },
    Persisted {
        store: Store,
    },
}

impl FlowState {
    #[must_use]
    pub fn phase(&self) -> FlowPhase {
        match self {
            FlowState::Idle => FlowPhase::Idle,
            FlowState::AwaitingPostalCode => FlowPhase::AwaitingPostalCode,
            FlowState::AreaNotServed { .. } => FlowPhase::AreaNotServed,
            FlowState::AwaitingConfirmation { .. } => FlowPhase::AwaitingConfirmation,
            FlowState::Persisted { .. } => FlowPhase::Persisted,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::AwaitingPostalCode => "awaiting a postal code",
            FlowState::AreaNotServed { .. } => "the area is not served",
            FlowState::AwaitingConfirmation { .. } => "awaiting confirmation",
            FlowState::Persisted { .. } => "persisted",
        }
    }
}

pub struct LocatorFlow<'a> {
    locator: &'a Locator,
    selection: SelectedStoreState,
    state: FlowState,
    phases: Vec<FlowPhase>,
    last_error: Option<LocateError>,
}

impl<'a> LocatorFlow<'a> {
    #[must_use]
    pub fn new(locator: &'a Locator, selection: SelectedStoreState) -> Self {
        Self {
            locator,
            selection,
            state: FlowState::Idle,
            phases: vec![FlowPhase::Idle],
            last_error: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Phases entered so far, oldest first.
    #[must_use]
    pub fn phases(&self) -> &[FlowPhase] {
        &self.phases
    }

    /// The error from the last postal-code submission, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&LocateError> {
        self.last_error.as_ref()
    }

    fn enter(&mut self, state: FlowState) -> &FlowState {
        let phase = state.phase();
        tracing::debug!(?phase, "locator flow phase");
        self.phases.push(phase);
        self.state = state;
        &self.state
    }

    fn invalid(&self, operation: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            operation,
            state: self.state.name(),
        }
    }

    /// Starts the flow: the store-switch view when a store is already
    /// persisted, postal-code entry otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless idle or persisted, or
    /// [`FlowError::Storage`] if the stored selection cannot be read.
    pub fn open(&mut self) -> Result<&FlowState, FlowError> {
        if !matches!(self.state, FlowState::Idle | FlowState::Persisted { .. }) {
            return Err(self.invalid("open"));
        }
        self.last_error = None;
        let next = match self.selection.read()? {
            Some(store) => FlowState::AwaitingConfirmation {
                candidate: store,
                suggestion: None,
            },
            None => FlowState::AwaitingPostalCode,
        };
        Ok(self.enter(next))
    }

    /// Resolves `raw` to a suggested store.
    ///
    /// Lands in `AwaitingConfirmation` on success and `AreaNotServed` for
    /// unserved localities. Other failures return to `AwaitingPostalCode`
    /// with the reason in [`LocatorFlow::last_error`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless awaiting a postal code.
    pub async fn submit_postal_code(&mut self, raw: &str) -> Result<&FlowState, FlowError> {
        if self.state != FlowState::AwaitingPostalCode {
            return Err(self.invalid("submit a postal code"));
        }
        self.last_error = None;

        let locator = self.locator;
        let phases = &mut self.phases;
        let result = locator
            .locate_with(raw, |phase| {
                tracing::debug!(?phase, "locator flow phase");
                phases.push(phase);
            })
            .await;

        let next = match result {
            Ok(suggestion) => FlowState::AwaitingConfirmation {
                candidate: suggestion.store.clone(),
                suggestion: Some(suggestion),
            },
            Err(LocateError::AreaNotServed { address }) => FlowState::AreaNotServed { address },
            Err(e) => {
                tracing::info!(error = %e, "postal code rejected");
                self.last_error = Some(e);
                FlowState::AwaitingPostalCode
            }
        };
        Ok(self.enter(next))
    }

    /// Replaces the candidate with the store `store_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless awaiting confirmation,
    /// or [`FlowError::UnknownStore`] for an unknown id.
    pub fn choose_store(&mut self, store_id: &str) -> Result<&FlowState, FlowError> {
        if !matches!(self.state, FlowState::AwaitingConfirmation { .. }) {
            return Err(self.invalid("choose a store"));
        }
        let store = self
            .locator
            .data()
            .store(store_id)
            .cloned()
            .ok_or_else(|| FlowError::UnknownStore(store_id.to_string()))?;
        if let FlowState::AwaitingConfirmation { candidate, .. } = &mut self.state {
            tracing::debug!(store = %store.id, "candidate store changed");
            *candidate = store;
        }
        Ok(&self.state)
    }

    /// Persists the candidate store.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless awaiting confirmation,
    /// or [`FlowError::Storage`] if the selection cannot be written.
    pub fn confirm(&mut self) -> Result<&FlowState, FlowError> {
        let FlowState::AwaitingConfirmation { candidate, .. } = &self.state else {
            return Err(self.invalid("confirm"));
        };
        let store = candidate.clone();
        self.selection.write(&store)?;
        Ok(self.enter(FlowState::Persisted { store }))
    }

    /// Skips postal-code entry, or overrides an unserved area, by persisting
    /// the default store without geocoding.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless awaiting a postal code
    /// or in an unserved area, or [`FlowError::Storage`] on write failure.
    pub fn continue_anyway(&mut self) -> Result<&FlowState, FlowError> {
        if !matches!(
            self.state,
            FlowState::AwaitingPostalCode | FlowState::AreaNotServed { .. }
        ) {
            return Err(self.invalid("continue anyway"));
        }
        let store = self.locator.data().default_store().clone();
        self.selection.write(&store)?;
        self.last_error = None;
        Ok(self.enter(FlowState::Persisted { store }))
    }

    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless the area is not served.
    pub fn retry(&mut self) -> Result<&FlowState, FlowError> {
        if !matches!(self.state, FlowState::AreaNotServed { .. }) {
            return Err(self.invalid("retry"));
        }
        Ok(self.enter(FlowState::AwaitingPostalCode))
    }

    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless awaiting confirmation.
    pub fn change_postal_code(&mut self) -> Result<&FlowState, FlowError> {
        if !matches!(self.state, FlowState::AwaitingConfirmation { .. }) {
            return Err(self.invalid("change the postal code"));
        }
        self.last_error = None;
        Ok(self.enter(FlowState::AwaitingPostalCode))
    }

    /// Dismisses the flow. Only allowed once a store has been persisted.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::SelectionRequired`] when no store is persisted,
    /// or [`FlowError::Storage`] if the selection cannot be read.
    pub fn close(&mut self) -> Result<&FlowState, FlowError> {
        if self.selection.read()?.is_none() {
            return Err(FlowError::SelectionRequired);
        }
        Ok(self.enter(FlowState::Idle))
    }
}

#[cfg(test)]
#[path = "flow_test.rs"]
mod tests;
