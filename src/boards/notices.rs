use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::utils::lock;

/// Banner texts currently shown on a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoticeSnapshot {
    pub success: Option<String>,
    pub error: Option<String>,
}

#[derive(Default)]
struct NoticeState {
    success: Option<(Uuid, String)>,
    error: Option<String>,
}

/// Success notice with auto-dismiss plus a sticky error banner.
///
/// The dismiss timer belongs to the board: a newer notice or dropping the
/// board aborts it.
pub struct Notices {
    state: Arc<Mutex<NoticeState>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    ttl: Duration,
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(NoticeState::default())),
            timer: Mutex::new(None),
            ttl,
        }
    }

    /// Shows `message` until the dismiss delay elapses. Must run inside a
    /// tokio runtime.
    pub fn success(&self, message: impl Into<String>) {
        let id = Uuid::new_v4();
        lock(&self.state).success = Some((id, message.into()));

        let state = Arc::clone(&self.state);
        let ttl = self.ttl;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut state = lock(&state);
            if matches!(&state.success, Some((current, _)) if *current == id) {
                state.success = None;
            }
        });

        if let Some(previous) = lock(&self.timer).replace(handle) {
            previous.abort();
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        lock(&self.state).error = Some(message.into());
    }

    pub fn clear_error(&self) {
        lock(&self.state).error = None;
    }

    pub fn snapshot(&self) -> NoticeSnapshot {
        let state = lock(&self.state);
        NoticeSnapshot {
            success: state.success.as_ref().map(|(_, message)| message.clone()),
            error: state.error.clone(),
        }
    }
}

impl Drop for Notices {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_success_dismisses_after_ttl() {
        let notices = Notices::new(Duration::from_millis(3000));
        notices.success("Booking confirmed successfully");
        assert_eq!(
            notices.snapshot().success.as_deref(),
            Some("Booking confirmed successfully")
        );

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert!(notices.snapshot().success.is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(notices.snapshot().success, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_notice_restarts_timer() {
        let notices = Notices::new(Duration::from_millis(3000));
        notices.success("first");
        tokio::time::sleep(Duration::from_millis(2000)).await;
        notices.success("second");

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(notices.snapshot().success.as_deref(), Some("second"));

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(notices.snapshot().success, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_is_sticky_until_cleared() {
        let notices = Notices::new(Duration::from_millis(10));
        notices.error("Failed to load bookings");
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(notices.snapshot().error.as_deref(), Some("Failed to load bookings"));
        notices.clear_error();
        assert_eq!(notices.snapshot(), NoticeSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending_timer() {
        let notices = Notices::new(Duration::from_millis(50));
        notices.success("saved");
        let state = Arc::clone(&notices.state);
        drop(notices);
        tokio::time::sleep(Duration::from_millis(100)).await;
        // The aborted timer never ran, so the last message is still there.
        assert!(lock(&state).success.is_some());
    }
}
