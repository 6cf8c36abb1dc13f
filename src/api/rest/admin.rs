use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::rest::AppJson;
use crate::error::AppError;
use crate::models::dasher::Dasher;
use crate::models::order::OrderStatus;
use crate::scraper::run_scrape;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/dashers", get(list_dashers).post(create_dasher))
        .route("/admin/orders", get(list_orders))
        .route("/admin/scrape-menu", post(trigger_scrape))
}

async fn list_dashers(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "dashers": state.store.list_dashers() }))
}

#[derive(Deserialize)]
struct NewDasher {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

async fn create_dasher(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<NewDasher>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty());
    let (Some(name), Some(email)) = (name, email) else {
        return Err(AppError::Validation("name and email required".to_string()));
    };

    let dasher = Dasher {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        phone: payload.phone.clone().filter(|phone| !phone.trim().is_empty()),
        active: true,
        created_at: Utc::now(),
    };
    state.store.insert_dasher(dasher.clone())?;

    Ok((StatusCode::CREATED, Json(json!({ "dasher": dasher }))))
}

#[derive(Deserialize)]
struct OrdersQuery {
    status: Option<String>,
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|status| !status.is_empty())
        .map(|raw| {
            OrderStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown status: {raw}")))
        })
        .transpose()?;

    Ok(Json(json!({ "orders": state.store.list_orders(filter) })))
}

async fn trigger_scrape(State(state): State<Arc<AppState>>) -> Json<Value> {
    tokio::spawn(run_scrape(
        state.store.clone(),
        state.metrics.clone(),
        state.config.clone(),
    ));

    Json(json!({ "message": "Menu scraper started" }))
}
