//! View caches for the console screens.
//!
//! A board mirrors one upstream collection, derives filtered views from it
//! and applies mutation results in place. Locks are never held across an
//! upstream call.

pub mod bookings;
pub mod catalog;
pub mod my_bookings;
pub mod notices;

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{AppError, AppResult};

pub use bookings::{BookingBoard, BookingBoardView, BookingRow, StatusCounts};
pub use catalog::{CatalogBoard, CatalogRow, CatalogView};
pub use my_bookings::my_bookings;
pub use notices::{NoticeSnapshot, Notices};

pub(crate) use crate::utils::lock;

/// Ids with a mutation currently awaiting the upstream.
pub(crate) struct InFlightSet<K> {
    ids: Arc<Mutex<HashSet<K>>>,
}

impl<K: Eq + Hash + Clone> InFlightSet<K> {
    pub fn new() -> Self {
        Self {
            ids: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Marks `id` as in flight until the returned guard drops.
    pub fn acquire(&self, id: &K) -> AppResult<InFlight<K>> {
        if !lock(&self.ids).insert(id.clone()) {
            return Err(AppError::Conflict(
                "An update for this record is already in progress".to_string(),
            ));
        }
        Ok(InFlight {
            ids: Arc::clone(&self.ids),
            id: id.clone(),
        })
    }

    pub fn contains(&self, id: &K) -> bool {
        lock(&self.ids).contains(id)
    }
}

pub(crate) struct InFlight<K: Eq + Hash> {
    ids: Arc<Mutex<HashSet<K>>>,
    id: K,
}

impl<K: Eq + Hash> Drop for InFlight<K> {
    fn drop(&mut self) {
        lock(&self.ids).remove(&self.id);
    }
}

/// Raises a loading flag until dropped.
pub(crate) struct Loading<'a>(&'a AtomicBool);

impl<'a> Loading<'a> {
    pub fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_marker_blocks_same_id_only() {
        let set = InFlightSet::new();
        let a = set.acquire(&"a".to_string()).unwrap();
        assert!(set.acquire(&"a".to_string()).is_err());
        let _b = set.acquire(&"b".to_string()).unwrap();
        drop(a);
        assert!(!set.contains(&"a".to_string()));
        assert!(set.contains(&"b".to_string()));
    }

    #[test]
    fn test_loading_flag_resets_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _loading = Loading::start(&flag);
            assert!(flag.load(Ordering::SeqCst));
        }
        assert!(!flag.load(Ordering::SeqCst));
    }
}
