use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::models::token::AcceptanceToken;

use super::{OrderStore, StoreError};

impl OrderStore {
    pub fn insert_token(&self, token: AcceptanceToken) -> Result<(), StoreError> {
        match self.inner.tokens.entry(token.token.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateToken),
            Entry::Vacant(slot) => {
                slot.insert(token);
                Ok(())
            }
        }
    }

    /// Resolves a token for claiming. It must exist and be unexpired; a
    /// token that was already consumed still resolves, and the claim's
    /// compare-and-set decides the race.
    pub fn get_valid_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AcceptanceToken, StoreError> {
        let entry = self.inner.tokens.get(token).ok_or(StoreError::TokenInvalid)?;
        if entry.value().is_expired(now) {
            return Err(StoreError::TokenInvalid);
        }
        Ok(entry.value().clone())
    }

    /// Resolves a token for the status-update path. It must have been
    /// consumed by a winning claim; expiry no longer applies once the
    /// dasher holds the order.
    pub fn get_used_token(&self, token: &str) -> Result<AcceptanceToken, StoreError> {
        let entry = self.inner.tokens.get(token).ok_or(StoreError::TokenInvalid)?;
        if !entry.value().is_used() {
            return Err(StoreError::TokenInvalid);
        }
        Ok(entry.value().clone())
    }

    pub fn mark_token_used(&self, token: &str, now: DateTime<Utc>) {
        if let Some(mut entry) = self.inner.tokens.get_mut(token) {
            entry.value_mut().used_at = Some(now);
        }
    }

    /// Every token minted for one order.
    pub fn tokens_for_order(&self, order_id: Uuid) -> Vec<AcceptanceToken> {
        self.inner
            .tokens
            .iter()
            .filter(|entry| entry.value().order_id == order_id)
            .map(|entry| entry.value().clone())
            .collect()
    }
}
