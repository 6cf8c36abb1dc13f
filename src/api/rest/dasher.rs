use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::rest::AppJson;
use crate::error::AppError;
use crate::lifecycle::coordinator::{ClaimedOrder, TokenPreview};
use crate::models::order::Order;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dasher/accept", post(accept_order))
        .route("/dasher/accept/:token", post(accept_order_with_token))
        .route("/dasher/verify/:token", get(verify_token))
        .route("/dasher/update-status", patch(update_status))
        .route("/dasher/update-status/:token", patch(update_status_with_token))
        .route("/dasher/orders", get(dasher_orders))
}

#[derive(Deserialize)]
struct AcceptRequest {
    dasher_email: String,
    order_number: String,
}

async fn accept_order(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<AcceptRequest>,
) -> Result<Json<Value>, AppError> {
    let claimed = state
        .coordinator
        .claim_for_dasher(&payload.dasher_email, &payload.order_number)?;

    Ok(Json(accepted_body(&claimed)))
}

async fn accept_order_with_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let claimed = state.coordinator.claim_with_token(&token)?;

    Ok(Json(accepted_body(&claimed)))
}

fn accepted_body(claimed: &ClaimedOrder) -> Value {
    json!({
        "message": "Order accepted successfully",
        "order_number": claimed.order.order_number,
        "status": claimed.order.status,
        "dasher_name": claimed.dasher.name,
    })
}

async fn verify_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<TokenPreview>, AppError> {
    Ok(Json(state.coordinator.verify_token(&token)?))
}

#[derive(Deserialize)]
struct UpdateStatusRequest {
    dasher_email: String,
    order_number: String,
    status: String,
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let order = state.coordinator.update_status_for_dasher(
        &payload.dasher_email,
        &payload.order_number,
        &payload.status,
    )?;

    Ok(Json(updated_body(&order)))
}

#[derive(Deserialize)]
struct TokenStatusRequest {
    status: String,
}

async fn update_status_with_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    AppJson(payload): AppJson<TokenStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let order = state
        .coordinator
        .update_status_with_token(&token, &payload.status)?;

    Ok(Json(updated_body(&order)))
}

fn updated_body(order: &Order) -> Value {
    json!({
        "message": "Status updated successfully",
        "order_number": order.order_number,
        "status": order.status,
    })
}

#[derive(Deserialize)]
struct DasherOrdersQuery {
    email: Option<String>,
}

async fn dasher_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DasherOrdersQuery>,
) -> Result<Json<Value>, AppError> {
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::Validation("email parameter required".to_string()))?;

    let orders = state.coordinator.orders_for_dasher(email);

    Ok(Json(json!({ "orders": orders })))
}
