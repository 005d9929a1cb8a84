use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use valdir_core::{catalog::visible_categories, Category, Store};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct StoreList {
    default_store: String,
    stores: Vec<Store>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CategoryQuery {
    /// Include the categories only shown on small screens.
    #[serde(default)]
    pub compact: bool,
}

pub(super) async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<StoreList>> {
    let data = state.locator.data();
    Json(ApiResponse::new(
        StoreList {
            default_store: data.default_store().id.clone(),
            stores: data.stores().to_vec(),
        },
        req_id.0,
    ))
}

pub(super) async fn list_categories(
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CategoryQuery>,
) -> Json<ApiResponse<Vec<Category>>> {
    Json(ApiResponse::new(
        visible_categories(query.compact).copied().collect(),
        req_id.0,
    ))
}
