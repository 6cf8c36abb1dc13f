use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/menu", get(list_menu))
        .route("/menu/locations", get(list_locations))
        .route("/menu/categories", get(list_categories))
}

#[derive(Deserialize)]
struct MenuQuery {
    hall_id: Option<String>,
    meal_type: Option<String>,
}

async fn list_menu(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MenuQuery>,
) -> Json<Value> {
    let options = state
        .store
        .list_menu(query.hall_id.as_deref(), query.meal_type.as_deref());

    Json(json!({ "menu_options": options }))
}

async fn list_locations(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "locations": state.store.menu_locations() }))
}

#[derive(Deserialize)]
struct CategoriesQuery {
    hall_id: Option<String>,
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoriesQuery>,
) -> Json<Value> {
    let categories = state.store.menu_categories(query.hall_id.as_deref());

    Json(json!({ "categories": categories }))
}
