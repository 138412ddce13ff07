use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use serde::Serialize;

use super::{lock, InFlightSet, Loading, NoticeSnapshot, Notices};
use crate::api::ApiClient;
use crate::entities::booking::BookingFacet;
use crate::entities::{Booking, BookingId, BookingStatus, BookingType};
use crate::error::{AppError, AppResult};
use crate::listing::{ListState, ListView, ViewParams};
use crate::utils::merge_by_id;

pub const LOAD_FALLBACK: &str = "Failed to load bookings";
pub const UPDATE_FALLBACK: &str = "Failed to update booking";

#[derive(Debug, Clone, Serialize)]
pub struct BookingRow {
    #[serde(flatten)]
    pub booking: Booking,
    /// Statuses the admin may move this booking to. Empty once terminal.
    pub actions: Vec<BookingStatus>,
    pub updating: bool,
    pub menu_open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    fn tally(bookings: &[Booking]) -> Self {
        bookings.iter().fold(
            StatusCounts {
                total: bookings.len(),
                ..Default::default()
            },
            |mut counts, booking| {
                match booking.status {
                    BookingStatus::Pending => counts.pending += 1,
                    BookingStatus::Confirmed => counts.confirmed += 1,
                    BookingStatus::Cancelled => counts.cancelled += 1,
                }
                counts
            },
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingBoardView {
    #[serde(flatten)]
    pub list: ListView<BookingRow>,
    pub loading: bool,
    pub counts: StatusCounts,
    pub notices: NoticeSnapshot,
}

/// The admin dashboard's booking list and its status workflow.
pub struct BookingBoard {
    api: ApiClient,
    bookings: RwLock<Vec<Booking>>,
    list: Mutex<ListState<BookingFacet>>,
    loading: AtomicBool,
    updating: InFlightSet<BookingId>,
    open_menu: Mutex<Option<BookingId>>,
    notices: Notices,
}

impl BookingBoard {
    pub fn new(api: ApiClient, page_size: usize, notice_ttl: Duration) -> Self {
        Self {
            api,
            bookings: RwLock::new(Vec::new()),
            list: Mutex::new(ListState::new(page_size)),
            loading: AtomicBool::new(false),
            updating: InFlightSet::new(),
            open_menu: Mutex::new(None),
            notices: Notices::new(notice_ttl),
        }
    }

    /// Replaces the cache with the upstream's current bookings.
    ///
    /// On failure the previous cache stays and the error banner is raised.
    pub async fn refresh(
        &self,
        kind: Option<BookingType>,
        status: Option<BookingStatus>,
    ) -> AppResult<usize> {
        let _loading = Loading::start(&self.loading);

        match self.api.admin_bookings(kind, status).await {
            Ok(bookings) => {
                let count = bookings.len();
                *self.bookings.write().unwrap_or_else(PoisonError::into_inner) = bookings;
                self.notices.clear_error();
                tracing::debug!(count, "Admin bookings refreshed");
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "Failed to refresh admin bookings");
                self.notices.error(err.user_message(LOAD_FALLBACK));
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> Vec<Booking> {
        self.bookings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn find(&self, id: &BookingId) -> Option<Booking> {
        self.bookings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|b| &b.id == id)
            .cloned()
    }

    pub fn is_updating(&self, id: &BookingId) -> bool {
        self.updating.contains(id)
    }

    /// Derives the visible page, feeding `params` into the board's list state.
    pub fn view(&self, params: &ViewParams) -> BookingBoardView {
        let bookings = self.snapshot();
        let list = {
            let mut state = lock(&self.list);
            params.apply_to::<Booking>(&mut state);
            state.render(&bookings)
        };
        let menu = lock(&self.open_menu).clone();

        BookingBoardView {
            list: list.map(|booking| self.row(booking, menu.as_ref())),
            loading: self.loading.load(Ordering::SeqCst),
            counts: StatusCounts::tally(&bookings),
            notices: self.notices.snapshot(),
        }
    }

    fn row(&self, booking: Booking, menu: Option<&BookingId>) -> BookingRow {
        BookingRow {
            actions: booking.status.next_states().to_vec(),
            updating: self.is_updating(&booking.id),
            menu_open: menu == Some(&booking.id),
            booking,
        }
    }

    /// Moves a pending booking to `target` through the upstream API.
    ///
    /// Only one transition per booking may be in flight; other bookings are
    /// unaffected. The cache changes only after the upstream accepted.
    pub async fn transition(&self, id: &BookingId, target: BookingStatus) -> AppResult<Booking> {
        if target == BookingStatus::Pending {
            return Err(AppError::BadRequest(
                "Bookings can only be confirmed or cancelled".to_string(),
            ));
        }

        // Status is read under the marker so a finished update is always seen.
        let _in_flight = self.updating.acquire(id)?;

        let current = self
            .find(id)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if !current.status.can_transition_to(target) {
            return Err(AppError::Conflict(format!(
                "Booking is already {}",
                current.status.as_str().to_lowercase()
            )));
        }

        match self.api.update_booking_status(id, target).await {
            Ok(_) => {
                let updated = {
                    let mut bookings = self.bookings.write().unwrap_or_else(PoisonError::into_inner);
                    let merged = merge_by_id(&bookings, id.as_str(), |b| b.with_status(target));
                    *bookings = merged;
                    bookings.iter().find(|b| &b.id == id).cloned()
                };

                self.close_menu(id);
                self.notices.clear_error();
                self.notices.success(match target {
                    BookingStatus::Confirmed => "Booking confirmed successfully",
                    _ => "Booking cancelled successfully",
                });
                tracing::info!(booking_id = %id, status = %target, "Booking status updated");

                // A refresh may have dropped the row meanwhile.
                Ok(updated.unwrap_or_else(|| current.with_status(target)))
            }
            Err(err) => {
                tracing::warn!(
                    booking_id = %id,
                    status = %target,
                    kind = err.kind(),
                    error = %err,
                    "Booking status update failed"
                );
                self.notices.error(err.user_message(UPDATE_FALLBACK));
                Err(err)
            }
        }
    }

    /// Opens the action menu of a pending booking, closing any other.
    pub fn open_menu(&self, id: &BookingId) -> AppResult<()> {
        let booking = self
            .find(id)
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
        if booking.status.is_terminal() {
            return Err(AppError::Conflict(
                "No actions available for this booking".to_string(),
            ));
        }
        *lock(&self.open_menu) = Some(id.clone());
        Ok(())
    }

    pub fn close_menu(&self, id: &BookingId) {
        let mut menu = lock(&self.open_menu);
        if menu.as_ref() == Some(id) {
            *menu = None;
        }
    }

    pub fn dismiss_error(&self) {
        self.notices.clear_error();
    }

    pub fn notices(&self) -> NoticeSnapshot {
        self.notices.snapshot()
    }
}
