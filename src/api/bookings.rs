use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::{ApiClient, ApiRequest};
use crate::entities::{Booking, BookingId, BookingStatus, BookingType};
use crate::error::{AppError, AppResult};
use crate::listing::ALL;

pub const ADMIN_BOOKINGS_PATH: &str = "/api/admin/booking";

/// Minimum reply of the status endpoint. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn user_bookings_path(kind: BookingType) -> String {
    format!("/api/bookings/{}", kind.as_str())
}

pub fn booking_status_path(id: &BookingId) -> String {
    format!("{}/{}", ADMIN_BOOKINGS_PATH, id)
}

impl ApiClient {
    /// Bookings of the signed-in user for one vertical.
    pub async fn user_bookings(&self, kind: BookingType) -> AppResult<Vec<Booking>> {
        self.fetch_list(ApiRequest::get(user_bookings_path(kind))).await
    }

    /// Admin view over all bookings; `None` means "all".
    pub async fn admin_bookings(
        &self,
        kind: Option<BookingType>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let request = ApiRequest::get(ADMIN_BOOKINGS_PATH)
            .query("type", kind.map(BookingType::as_str).unwrap_or(ALL))
            .query("status", status.map(BookingStatus::as_str).unwrap_or(ALL));
        self.fetch_list(request).await
    }

    /// Asks the API to move a booking to `status`.
    ///
    /// A 2xx reply with `success: false`, or one that is not a status object,
    /// is a rejection just like a non-2xx one.
    pub async fn update_booking_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> AppResult<StatusAck> {
        let request = ApiRequest::new(Method::PATCH, booking_status_path(id))
            .json(json!({ "status": status }));
        let response = self.exchange(request).await?;

        // An unreadable acknowledgement is a bare rejection.
        let ack: StatusAck = serde_json::from_value(response.body).map_err(|e| {
            tracing::warn!(booking_id = %id, status = response.status, error = %e, "Unreadable status reply");
            AppError::Upstream {
                status: response.status,
                message: None,
            }
        })?;

        if !ack.success {
            return Err(AppError::Upstream {
                status: response.status,
                message: ack.message,
            });
        }
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::{MockTransport, Reply};

    #[tokio::test]
    async fn test_admin_bookings_sends_all_sentinels() {
        let transport = Arc::new(MockTransport::new().on(
            Method::GET,
            ADMIN_BOOKINGS_PATH,
            Reply::Status(200, json!({ "data": [] })),
        ));
        let client = ApiClient::new(transport.clone());

        client.admin_bookings(None, Some(BookingStatus::Pending)).await.unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(
            requests[0].query,
            vec![
                ("type".to_string(), "all".to_string()),
                ("status".to_string(), "PENDING".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_status_update_body_and_rejection() {
        let id = BookingId::new("bk_1");
        let transport = Arc::new(MockTransport::new().on(
            Method::PATCH,
            &booking_status_path(&id),
            Reply::Status(200, json!({ "success": false })),
        ));
        let client = ApiClient::new(transport.clone());

        let err = client
            .update_booking_status(&id, BookingStatus::Confirmed)
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Failed to update booking"), "Failed to update booking");

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].body, Some(json!({ "status": "CONFIRMED" })));
    }

    #[tokio::test]
    async fn test_unreadable_status_reply_is_bare_rejection() {
        let id = BookingId::new("bk_2");
        for body in [json!(null), json!(""), json!(["ok"])] {
            let transport = Arc::new(MockTransport::new().on(
                Method::PATCH,
                &booking_status_path(&id),
                Reply::Status(200, body),
            ));
            let client = ApiClient::new(transport);

            let err = client
                .update_booking_status(&id, BookingStatus::Cancelled)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Upstream { status: 200, message: None }));
            assert_eq!(err.user_message("Failed to update booking"), "Failed to update booking");
        }
    }
}
