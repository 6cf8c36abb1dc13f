use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde_json::json;

use crate::api::rest::AppJson;
use crate::error::AppError;
use crate::lifecycle::coordinator::NewOrder;
use crate::models::order::Order;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/:order_number", get(get_order))
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<NewOrder>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.coordinator.create_order(payload)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "order_number": order.order_number,
            "message": "Order created successfully",
        })),
    ))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(order_number): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = state.store.get_order_by_number(&order_number)?;

    Ok(Json(order))
}
