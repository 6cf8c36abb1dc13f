use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::models::dasher::Dasher;

use super::{OrderStore, StoreError};

impl OrderStore {
    /// Registers a dasher, enforcing email uniqueness.
    pub fn insert_dasher(&self, dasher: Dasher) -> Result<(), StoreError> {
        match self.inner.dasher_emails.entry(dasher.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateDasherEmail),
            Entry::Vacant(slot) => {
                slot.insert(dasher.id);
                self.inner.dashers.insert(dasher.id, dasher);
                Ok(())
            }
        }
    }

    pub fn get_dasher(&self, dasher_id: Uuid) -> Result<Dasher, StoreError> {
        self.inner
            .dashers
            .get(&dasher_id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::DasherNotFound)
    }

    pub fn dasher_by_email(&self, email: &str) -> Option<Dasher> {
        let dasher_id = self
            .inner
            .dasher_emails
            .get(email)
            .map(|entry| *entry.value())?;
        self.inner
            .dashers
            .get(&dasher_id)
            .map(|entry| entry.value().clone())
    }

    /// Every registered dasher, in name order.
    pub fn list_dashers(&self) -> Vec<Dasher> {
        let mut dashers: Vec<Dasher> = self
            .inner
            .dashers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        dashers.sort_by(|a, b| a.name.cmp(&b.name));
        dashers
    }

    /// Dashers eligible for new-order offers, in name order.
    pub fn active_dashers(&self) -> Vec<Dasher> {
        let mut dashers: Vec<Dasher> = self
            .inner
            .dashers
            .iter()
            .filter(|entry| entry.value().active)
            .map(|entry| entry.value().clone())
            .collect();

        dashers.sort_by(|a, b| a.name.cmp(&b.name));
        dashers
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::dasher::Dasher;
    use crate::store::{OrderStore, StoreError};

    fn sample_dasher(name: &str, email: &str, active: bool) -> Dasher {
        Dasher {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = OrderStore::new();
        store
            .insert_dasher(sample_dasher("Avery", "avery@example.edu", true))
            .unwrap();

        let result = store.insert_dasher(sample_dasher("Other", "avery@example.edu", true));
        assert!(matches!(result, Err(StoreError::DuplicateDasherEmail)));
        assert_eq!(store.dasher_count(), 1);
    }

    #[test]
    fn active_dashers_excludes_inactive() {
        let store = OrderStore::new();
        store
            .insert_dasher(sample_dasher("Zoe", "zoe@example.edu", true))
            .unwrap();
        store
            .insert_dasher(sample_dasher("Avery", "avery@example.edu", false))
            .unwrap();
        store
            .insert_dasher(sample_dasher("Micah", "micah@example.edu", true))
            .unwrap();

        let active = store.active_dashers();
        let names: Vec<&str> = active.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Micah", "Zoe"]);

        assert_eq!(store.list_dashers().len(), 3);
    }

    #[test]
    fn dasher_by_email_resolves_exact_match() {
        let store = OrderStore::new();
        let dasher = sample_dasher("Avery", "avery@example.edu", true);
        let dasher_id = dasher.id;
        store.insert_dasher(dasher).unwrap();

        assert_eq!(
            store.dasher_by_email("avery@example.edu").map(|d| d.id),
            Some(dasher_id)
        );
        assert!(store.dasher_by_email("nobody@example.edu").is_none());
    }
}
