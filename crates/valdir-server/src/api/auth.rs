use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use valdir_core::AdminUser;

use crate::middleware::RequestId;

use super::{map_backend_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Checks admin credentials against the users table. The session itself is
/// kept by the caller.
pub(super) async fn login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AdminUser>>, ApiError> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "email and password are required",
        ));
    }

    let user = state
        .backend
        .authenticate(email, &body.password)
        .await
        .map_err(|e| map_backend_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(user, req_id.0)))
}
