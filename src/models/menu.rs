use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// A dining hall represented in the current catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HallLocation {
    pub id: String,
    pub name: String,
}

/// One item the catalog currently offers at a dining hall, for one meal
/// period. Rows are replaced wholesale per hall on every scrape.
#[derive(Debug, Clone, Serialize)]
pub struct MenuOption {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub hall_id: String,
    pub hall_name: String,
    pub meal_type: String,
    /// Upstream nutrition blob, passed through untyped.
    pub nutrition: Value,
    pub allergens: Vec<String>,
    pub tags: Vec<String>,
    pub available_today: bool,
    pub scraped_at: DateTime<Utc>,
}
