use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::boards::{my_bookings, BookingBoardView, BookingRow};
use crate::entities::{Booking, BookingId, BookingStatus, BookingType};
use crate::error::{AppError, AppResult};
use crate::listing::{self, ListView, ViewParams, ALL};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
}

fn optional<T: std::str::FromStr<Err = String>>(raw: Option<&str>) -> AppResult<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case(ALL) => Ok(None),
        Some(value) => value.parse().map(Some).map_err(AppError::BadRequest),
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub count: usize,
}

/// Refetch the admin booking list from the upstream
pub async fn refresh_admin_bookings(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> AppResult<Json<RefreshResponse>> {
    let kind: Option<BookingType> = optional(query.kind.as_deref())?;
    let status: Option<BookingStatus> = optional(query.status.as_deref())?;
    let count = state.bookings.refresh(kind, status).await?;
    Ok(Json(RefreshResponse { count }))
}

/// Derived admin board view
pub async fn admin_bookings(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> AppResult<Json<BookingBoardView>> {
    let params = ViewParams::from_query(raw)?;
    Ok(Json(state.bookings.view(&params)))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub booking: BookingRow,
}

/// Confirm or cancel a pending booking
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<StatusResponse>> {
    let id = BookingId::new(id);
    let booking = state.bookings.transition(&id, payload.status).await?;

    Ok(Json(StatusResponse {
        booking: BookingRow {
            actions: booking.status.next_states().to_vec(),
            updating: state.bookings.is_updating(&booking.id),
            menu_open: false,
            booking,
        },
    }))
}

pub async fn open_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    state.bookings.open_menu(&BookingId::new(id))?;
    Ok(Json(serde_json::json!({ "menuOpen": true })))
}

pub async fn close_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    state.bookings.close_menu(&BookingId::new(id));
    Json(serde_json::json!({ "menuOpen": false }))
}

pub async fn dismiss_error(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.bookings.dismiss_error();
    Json(serde_json::json!({ "notices": state.bookings.notices() }))
}

/// Combined hotel and activity bookings of the signed-in user
pub async fn my_bookings_view(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> AppResult<Json<ListView<Booking>>> {
    let params = ViewParams::from_query(raw)?;
    let bookings = my_bookings(&state.api).await;
    let query = params.to_query::<Booking>(state.config.page_size);
    Ok(Json(listing::apply(&bookings, &query)))
}
