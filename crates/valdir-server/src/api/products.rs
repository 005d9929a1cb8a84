use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use valdir_core::{
    catalog::toggle_category,
    contact::{interest_message, messaging_link, product_share_url},
    format_brl, PriceDisplay, Product, ProductDraft, SearchScope, Store,
};

use crate::middleware::RequestId;

use super::{map_backend_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    #[serde(flatten)]
    product: Product,
    reference: String,
    /// Price to show: the sale price when one applies.
    price_label: String,
    /// Struck-through original price, present only for sales.
    original_price_label: Option<String>,
    effective_price: Option<Decimal>,
    share_url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub search: Option<String>,
    /// Category id; replaces `search`, or clears it when they are equal.
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct InterestQuery {
    pub store: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct InterestLink {
    store: Store,
    message: String,
    url: String,
}

fn to_item(product: Product, scope: SearchScope, site_url: &str) -> ProductItem {
    let display = product.price_display();
    let on_request = scope.on_request_label();
    let (original_price_label, effective_price) = match display {
        PriceDisplay::OnRequest => (None, None),
        PriceDisplay::Regular(price) => (None, Some(price)),
        PriceDisplay::Sale { original, sale } => (Some(format_brl(original)), Some(sale)),
    };
    ProductItem {
        reference: product.reference(),
        price_label: display.current_label(on_request),
        original_price_label,
        effective_price,
        share_url: product_share_url(site_url, product.id),
        product,
    }
}

async fn search(
    state: &AppState,
    req_id: &RequestId,
    query: &ProductQuery,
    scope: SearchScope,
) -> Result<Vec<ProductItem>, ApiError> {
    let products = state
        .backend
        .list_products()
        .await
        .map_err(|e| map_backend_error(req_id.0.clone(), &e))?;

    let search = query.search.as_deref().unwrap_or_default();
    let term = match query.category.as_deref() {
        Some(category) => toggle_category(search, category),
        None => search.to_string(),
    };

    Ok(products
        .into_iter()
        .filter(|p| scope.matches(p, &term))
        .map(|p| to_item(p, scope, &state.site_url))
        .collect())
}

async fn fetch_product(state: &AppState, req_id: &RequestId, id: i64) -> Result<Product, ApiError> {
    state
        .backend
        .get_product(id)
        .await
        .map_err(|e| map_backend_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", format!("product {id} not found")))
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let data = search(&state, &req_id, &query, SearchScope::Storefront).await?;
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let product = fetch_product(&state, &req_id, id).await?;
    let item = to_item(product, SearchScope::Storefront, &state.site_url);
    Ok(Json(ApiResponse::new(item, req_id.0)))
}

/// Messaging link for a product, addressed to the requested store or the
/// default one.
pub(super) async fn interest_link(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(query): Query<InterestQuery>,
) -> Result<Json<ApiResponse<InterestLink>>, ApiError> {
    let data = state.locator.data();
    let store = match query.store.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(store_id) => data.store(store_id).ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("unknown store '{store_id}'"),
            )
        })?,
        None => data.default_store(),
    }
    .clone();

    let product = fetch_product(&state, &req_id, id).await?;
    let message = interest_message(&product);
    let url = messaging_link(&store.contact_handle, &message);

    Ok(Json(ApiResponse::new(
        InterestLink {
            store,
            message,
            url,
        },
        req_id.0,
    )))
}

pub(super) async fn admin_list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let data = search(&state, &req_id, &query, SearchScope::Admin).await?;
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(super) async fn admin_get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let product = fetch_product(&state, &req_id, id).await?;
    let item = to_item(product, SearchScope::Admin, &state.site_url);
    Ok(Json(ApiResponse::new(item, req_id.0)))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<ApiResponse<ProductItem>>), ApiError> {
    let product = state
        .backend
        .create_product(draft)
        .await
        .map_err(|e| map_backend_error(req_id.0.clone(), &e))?;
    let item = to_item(product, SearchScope::Admin, &state.site_url);
    Ok((StatusCode::CREATED, Json(ApiResponse::new(item, req_id.0))))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let product = state
        .backend
        .update_product(id, draft)
        .await
        .map_err(|e| map_backend_error(req_id.0.clone(), &e))?;
    let item = to_item(product, SearchScope::Admin, &state.site_url);
    Ok(Json(ApiResponse::new(item, req_id.0)))
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .backend
        .delete_product(id)
        .await
        .map_err(|e| map_backend_error(req_id.0, &e))?;
    Ok(StatusCode::NO_CONTENT)
}
