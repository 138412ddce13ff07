use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use validator::{Validate, ValidationError};

use super::StoragePort;
use crate::error::{AppError, AppResult};
use crate::utils::validation::field_error;

pub const SEARCH_DRAFT_KEY: &str = "hotelSearch";
pub const SEARCH_DRAFT_EVENT: &str = "hotelSearchUpdate";

/// Hotel search form as last entered by the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "check_stay_dates", skip_on_field_errors = false))]
pub struct SearchDraft {
    pub destination: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[validate(range(min = 1, message = "At least one room is required"))]
    pub rooms: u32,
    #[validate(range(min = 1, message = "At least one guest is required"))]
    pub guests: u32,
}

impl Default for SearchDraft {
    fn default() -> Self {
        Self {
            destination: String::new(),
            check_in: None,
            check_out: None,
            rooms: 1,
            guests: 2,
        }
    }
}

impl SearchDraft {
    pub fn nights(&self) -> Option<i64> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some((check_out - check_in).num_days()),
            _ => None,
        }
    }
}

fn check_stay_dates(draft: &SearchDraft) -> Result<(), ValidationError> {
    match draft.nights() {
        Some(nights) if nights <= 0 => Err(field_error(
            "checkOut",
            "Check-out must be after check-in",
        )),
        _ => Ok(()),
    }
}

/// Persists the search draft and notifies listeners on every change.
pub struct SearchDraftStore {
    storage: Arc<dyn StoragePort>,
    updates: broadcast::Sender<SearchDraft>,
}

impl SearchDraftStore {
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        let (updates, _) = broadcast::channel(64);
        Self { storage, updates }
    }

    /// Current draft; a missing or unreadable entry yields the defaults.
    pub fn load(&self) -> SearchDraft {
        match self.storage.get(SEARCH_DRAFT_KEY) {
            Ok(Some(raw)) => serde_json::from_value(raw).unwrap_or_else(|e| {
                tracing::warn!(key = SEARCH_DRAFT_KEY, error = %e, "Discarding unreadable search draft");
                SearchDraft::default()
            }),
            Ok(None) => SearchDraft::default(),
            Err(e) => {
                tracing::warn!(key = SEARCH_DRAFT_KEY, error = %e, "Search draft unavailable");
                SearchDraft::default()
            }
        }
    }

    pub fn save(&self, draft: SearchDraft) -> AppResult<SearchDraft> {
        draft.validate()?;
        let raw = serde_json::to_value(&draft)
            .map_err(|e| AppError::Internal(format!("Failed to encode search draft: {}", e)))?;
        self.storage.set(SEARCH_DRAFT_KEY, raw)?;
        self.publish(&draft);
        Ok(draft)
    }

    pub fn clear(&self) -> AppResult<SearchDraft> {
        self.storage.remove(SEARCH_DRAFT_KEY)?;
        let draft = SearchDraft::default();
        self.publish(&draft);
        Ok(draft)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchDraft> {
        self.updates.subscribe()
    }

    fn publish(&self, draft: &SearchDraft) {
        // No subscribers is not an error.
        let listeners = self.updates.send(draft.clone()).unwrap_or(0);
        tracing::debug!(event = SEARCH_DRAFT_EVENT, listeners, "Search draft updated");
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, SearchDraftStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = SearchDraftStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let (storage, store) = store();
        assert_eq!(store.load(), SearchDraft::default());

        storage.set(SEARCH_DRAFT_KEY, json!("garbage")).unwrap();
        assert_eq!(store.load().guests, 2);
    }

    #[tokio::test]
    async fn test_save_persists_and_broadcasts() {
        let (storage, store) = store();
        let mut updates = store.subscribe();

        let draft = SearchDraft {
            destination: "Goa".to_string(),
            check_in: NaiveDate::from_ymd_opt(2025, 3, 1),
            check_out: NaiveDate::from_ymd_opt(2025, 3, 4),
            ..Default::default()
        };
        store.save(draft.clone()).unwrap();

        assert_eq!(updates.recv().await.unwrap(), draft);
        assert_eq!(
            storage.get(SEARCH_DRAFT_KEY).unwrap().unwrap()["checkIn"],
            json!("2025-03-01")
        );
        assert_eq!(store.load().nights(), Some(3));
    }

    #[test]
    fn test_checkout_before_checkin_is_rejected() {
        let (storage, store) = store();
        let draft = SearchDraft {
            check_in: NaiveDate::from_ymd_opt(2025, 3, 4),
            check_out: NaiveDate::from_ymd_opt(2025, 3, 4),
            ..Default::default()
        };

        let err = store.save(draft).unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields.get("checkOut"), Some("Check-out must be after check-in"));
                assert_eq!(fields.len(), 1);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(storage.get(SEARCH_DRAFT_KEY).unwrap(), None);
    }

    #[test]
    fn test_field_and_date_errors_reported_together() {
        let draft = SearchDraft {
            check_in: NaiveDate::from_ymd_opt(2025, 3, 4),
            check_out: NaiveDate::from_ymd_opt(2025, 3, 1),
            rooms: 0,
            ..Default::default()
        };

        match AppError::from(draft.validate().unwrap_err()) {
            AppError::Validation(fields) => {
                assert_eq!(fields.get("rooms"), Some("At least one room is required"));
                assert!(fields.get("checkOut").is_some());
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clear_broadcasts_defaults() {
        let (_, store) = store();
        store
            .save(SearchDraft {
                destination: "Manali".to_string(),
                ..Default::default()
            })
            .unwrap();
        let mut updates = store.subscribe();

        store.clear().unwrap();
        assert_eq!(updates.recv().await.unwrap(), SearchDraft::default());
        assert_eq!(store.load(), SearchDraft::default());
    }
}
