use crate::api::ApiClient;
use crate::entities::{Booking, BookingType};

/// Hotel and activity bookings of the signed-in user, newest first.
///
/// A failed sub-fetch contributes nothing instead of failing the whole view.
pub async fn my_bookings(api: &ApiClient) -> Vec<Booking> {
    let (hotels, activities) = tokio::join!(
        api.user_bookings(BookingType::Hotel),
        api.user_bookings(BookingType::Activity),
    );

    let mut combined = Vec::new();
    for (kind, result) in [(BookingType::Hotel, hotels), (BookingType::Activity, activities)] {
        match result {
            Ok(bookings) => combined.extend(bookings),
            Err(err) => {
                tracing::warn!(
                    booking_type = kind.as_str(),
                    kind = err.kind(),
                    error = %err,
                    "User bookings unavailable, showing none"
                );
            }
        }
    }

    combined.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    combined
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::api::mock::{MockTransport, Reply};
    use crate::entities::booking::fixtures::hotel_booking;
    use crate::entities::BookingStatus;

    #[tokio::test]
    async fn test_failed_sub_fetch_degrades_to_empty() {
        let booking = hotel_booking("bk_1", "Azure Paradise Resort", BookingStatus::Pending);
        let transport = Arc::new(
            MockTransport::new()
                .on(Method::GET, "/api/bookings/hotel", Reply::Status(200, json!([booking])))
                .on(Method::GET, "/api/bookings/activity", Reply::Status(401, json!({}))),
        );

        let bookings = my_bookings(&ApiClient::new(transport)).await;
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id.as_str(), "bk_1");
    }

    #[tokio::test]
    async fn test_combined_list_is_newest_first() {
        let mut older = hotel_booking("bk_old", "Hill Lodge", BookingStatus::Confirmed);
        older.created_at = "2025-01-01T00:00:00Z".parse().unwrap();
        let mut newer = hotel_booking("bk_new", "Lake Cottage", BookingStatus::Pending);
        newer.created_at = "2025-03-01T00:00:00Z".parse().unwrap();

        let transport = Arc::new(
            MockTransport::new()
                .on(Method::GET, "/api/bookings/hotel", Reply::Status(200, json!([older])))
                .on(
                    Method::GET,
                    "/api/bookings/activity",
                    Reply::Status(200, json!({ "data": [newer] })),
                ),
        );

        let bookings = my_bookings(&ApiClient::new(transport)).await;
        let ids: Vec<&str> = bookings.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["bk_new", "bk_old"]);
    }

    #[tokio::test]
    async fn test_transport_failure_on_both_yields_empty() {
        let transport = Arc::new(
            MockTransport::new()
                .on(Method::GET, "/api/bookings/hotel", Reply::Fail("connection refused".into()))
                .on(Method::GET, "/api/bookings/activity", Reply::Fail("connection refused".into())),
        );
        assert!(my_bookings(&ApiClient::new(transport)).await.is_empty());
    }
}
