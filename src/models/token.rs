use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One-time acceptance credential minted per (order, dasher) pair at
/// order creation. The token string itself is the lookup key; a token is
/// consumed exactly once, by the claim it wins.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptanceToken {
    pub token: String,
    pub order_id: Uuid,
    pub dasher_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl AcceptanceToken {
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
