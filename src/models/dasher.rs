use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A courier registered to receive order offers. Only active dashers are
/// fanned out to when a new order arrives, but an inactive dasher may
/// still claim by identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dasher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
