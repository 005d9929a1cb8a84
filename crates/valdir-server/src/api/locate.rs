use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use valdir_locator::{LocateError, StoreSuggestion};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LocateRequest {
    pub postal_code: String,
}

#[derive(Debug, Serialize)]
pub(super) struct LocateResponse {
    #[serde(flatten)]
    suggestion: StoreSuggestion,
    /// True when the store was picked without coordinates.
    approximate: bool,
}

/// Runs the locator pipeline for one postal code. Nothing is persisted
/// server-side; the caller stores the chosen store itself.
pub(super) async fn locate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LocateRequest>,
) -> Result<Json<ApiResponse<LocateResponse>>, ApiError> {
    match state.locator.locate(&body.postal_code).await {
        Ok(suggestion) => {
            let approximate = suggestion.basis.is_approximate();
            Ok(Json(ApiResponse::new(
                LocateResponse {
                    suggestion,
                    approximate,
                },
                req_id.0,
            )))
        }
        Err(e) => {
            if matches!(e, LocateError::LookupFailed(_)) {
                tracing::warn!(error = %e, "postal code lookup failed");
            }
            Err(ApiError::new(req_id.0, e.code(), e.to_string()))
        }
    }
}
