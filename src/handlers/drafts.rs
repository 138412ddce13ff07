use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::Serialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::error::AppResult;
use crate::storage::search_draft::SEARCH_DRAFT_EVENT;
use crate::storage::{PendingBooking, SearchDraft};
use crate::AppState;

// ============ Search draft ============

pub async fn get_search_draft(State(state): State<AppState>) -> Json<SearchDraft> {
    Json(state.search_draft.load())
}

pub async fn save_search_draft(
    State(state): State<AppState>,
    Json(draft): Json<SearchDraft>,
) -> AppResult<Json<SearchDraft>> {
    Ok(Json(state.search_draft.save(draft)?))
}

pub async fn clear_search_draft(State(state): State<AppState>) -> AppResult<Json<SearchDraft>> {
    Ok(Json(state.search_draft.clear()?))
}

fn draft_event(draft: &SearchDraft) -> Event {
    let data = serde_json::to_string(draft).unwrap_or_default();
    Event::default().event(SEARCH_DRAFT_EVENT).data(data)
}

/// Stream of `hotelSearchUpdate` events, starting with the current draft
pub async fn search_draft_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.search_draft.subscribe();
    let current = state.search_draft.load();

    let initial = tokio_stream::once(Ok::<_, Infallible>(draft_event(&current)));
    let live = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(draft) => Some(Ok(draft_event(&draft))),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::debug!(skipped, "Search draft listener lagged");
            None
        }
    });

    Sse::new(initial.chain(live)).keep_alive(KeepAlive::default())
}

// ============ Sign-up banner ============

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub closed: bool,
}

pub async fn signup_banner(State(state): State<AppState>) -> Json<BannerResponse> {
    Json(BannerResponse {
        closed: state.signup_banner.is_closed(),
    })
}

pub async fn close_signup_banner(State(state): State<AppState>) -> AppResult<Json<BannerResponse>> {
    state.signup_banner.close()?;
    Ok(Json(BannerResponse { closed: true }))
}

// ============ Pending booking ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingBookingResponse {
    pub pending_booking: Option<PendingBooking>,
}

/// Keep a booking intent across the sign-in redirect
pub async fn stash_pending_booking(
    State(state): State<AppState>,
    Json(pending): Json<PendingBooking>,
) -> AppResult<Json<PendingBookingResponse>> {
    state.pending_booking.stash(&pending)?;
    Ok(Json(PendingBookingResponse {
        pending_booking: Some(pending),
    }))
}

/// Hand the stashed intent back once, after sign-in
pub async fn take_pending_booking(
    State(state): State<AppState>,
) -> AppResult<Json<PendingBookingResponse>> {
    Ok(Json(PendingBookingResponse {
        pending_booking: state.pending_booking.take()?,
    }))
}
