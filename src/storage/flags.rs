use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::StoragePort;
use crate::entities::BookingType;
use crate::error::{AppError, AppResult};
use crate::utils::validation::not_blank;

pub const SIGNUP_BANNER_KEY: &str = "signup-banner-closed-session";
pub const PENDING_BOOKING_KEY: &str = "pendingBooking";

/// Remembers that the visitor dismissed the sign-up banner this session.
pub struct SignupBanner {
    storage: Arc<dyn StoragePort>,
}

impl SignupBanner {
    pub fn new(session_storage: Arc<dyn StoragePort>) -> Self {
        Self {
            storage: session_storage,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.storage.get(SIGNUP_BANNER_KEY), Ok(Some(Value::Bool(true))))
    }

    pub fn close(&self) -> AppResult<()> {
        self.storage.set(SIGNUP_BANNER_KEY, Value::Bool(true))
    }
}

/// Booking the visitor started before being sent to sign in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PendingBooking {
    pub booking_type: BookingType,
    // Explicit so field errors use the wire name.
    #[serde(rename = "itemId")]
    #[validate(custom(function = "not_blank", message = "Item is required"))]
    pub item_id: String,
    /// Form fields (dates, rooms, people) carried through untouched.
    #[serde(flatten)]
    pub form: Map<String, Value>,
}

pub struct PendingBookingStore {
    storage: Arc<dyn StoragePort>,
}

impl PendingBookingStore {
    pub fn new(local_storage: Arc<dyn StoragePort>) -> Self {
        Self {
            storage: local_storage,
        }
    }

    pub fn stash(&self, pending: &PendingBooking) -> AppResult<()> {
        pending.validate()?;
        let raw = serde_json::to_value(pending)
            .map_err(|e| AppError::Internal(format!("Failed to encode pending booking: {}", e)))?;
        self.storage.set(PENDING_BOOKING_KEY, raw)
    }

    pub fn peek(&self) -> AppResult<Option<PendingBooking>> {
        let Some(raw) = self.storage.get(PENDING_BOOKING_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_value(raw) {
            Ok(pending) => Ok(Some(pending)),
            Err(e) => {
                tracing::warn!(key = PENDING_BOOKING_KEY, error = %e, "Discarding unreadable pending booking");
                Ok(None)
            }
        }
    }

    /// Reads and removes the stashed booking; a second take yields nothing.
    pub fn take(&self) -> AppResult<Option<PendingBooking>> {
        let pending = self.peek()?;
        self.storage.remove(PENDING_BOOKING_KEY)?;
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_banner_flag() {
        let banner = SignupBanner::new(Arc::new(MemoryStorage::new()));
        assert!(!banner.is_closed());
        banner.close().unwrap();
        assert!(banner.is_closed());
    }

    #[test]
    fn test_take_consumes_pending_booking() {
        let store = PendingBookingStore::new(Arc::new(MemoryStorage::new()));
        let pending: PendingBooking = serde_json::from_value(json!({
            "bookingType": "HOTEL",
            "itemId": "h1",
            "startDate": "2025-03-01",
            "rooms": 2
        }))
        .unwrap();

        store.stash(&pending).unwrap();
        assert_eq!(store.peek().unwrap().as_ref(), Some(&pending));

        let taken = store.take().unwrap().unwrap();
        assert_eq!(taken.form.get("rooms"), Some(&json!(2)));
        assert_eq!(store.take().unwrap(), None);
    }

    #[test]
    fn test_stash_requires_item() {
        let store = PendingBookingStore::new(Arc::new(MemoryStorage::new()));
        let pending = PendingBooking {
            booking_type: BookingType::Activity,
            item_id: String::new(),
            form: Map::new(),
        };
        match store.stash(&pending) {
            Err(AppError::Validation(fields)) => {
                assert_eq!(fields.get("itemId"), Some("Item is required"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.peek().unwrap(), None);
    }
}
