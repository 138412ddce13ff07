use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, Identified};
use crate::listing::Listable;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Confirmed and cancelled bookings expose no further actions.
    pub fn is_terminal(self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    /// Statuses reachable from `self` through an admin action.
    pub fn next_states(self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed | BookingStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: BookingStatus) -> bool {
        self.next_states().contains(&target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingType {
    Hotel,
    Activity,
}

impl BookingType {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingType::Hotel => "hotel",
            BookingType::Activity => "activity",
        }
    }
}

impl FromStr for BookingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hotel" => Ok(BookingType::Hotel),
            "activity" => Ok(BookingType::Activity),
            other => Err(format!("unknown booking type: {other}")),
        }
    }
}

/// Kind-specific booking fields, discriminated by `bookingType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "bookingType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingDetails {
    #[serde(rename_all = "camelCase")]
    Hotel {
        start_date: String,
        end_date: String,
        nights: u32,
        rooms: u32,
    },
    #[serde(rename_all = "camelCase")]
    Activity {
        date: String,
        people: u32,
        duration: String,
    },
}

impl BookingDetails {
    pub fn booking_type(&self) -> BookingType {
        match self {
            BookingDetails::Hotel { .. } => BookingType::Hotel,
            BookingDetails::Activity { .. } => BookingType::Activity,
        }
    }
}

/// Mirror of an upstream booking record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    #[serde(flatten)]
    pub details: BookingDetails,
    pub item_id: String,
    pub item_name: String,
    pub item_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_image: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub price_per_unit: Amount,
    pub total_price: Amount,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn booking_type(&self) -> BookingType {
        self.details.booking_type()
    }

    pub fn with_status(&self, status: BookingStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

impl Identified for Booking {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFacet {
    Type,
    Status,
}

impl Listable for Booking {
    type Facet = BookingFacet;

    const FACETS: &'static [(&'static str, BookingFacet)] =
        &[("type", BookingFacet::Type), ("status", BookingFacet::Status)];

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.item_name, &self.user_email, &self.user_name]
    }

    fn facet_value(&self, facet: BookingFacet) -> String {
        match facet {
            BookingFacet::Type => self.booking_type().as_str().to_string(),
            BookingFacet::Status => self.status.as_str().to_ascii_lowercase(),
        }
    }

    fn price(&self) -> Option<f64> {
        self.total_price.value()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn hotel_booking(id: &str, item_name: &str, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::new(id),
            details: BookingDetails::Hotel {
                start_date: "2025-03-01".to_string(),
                end_date: "2025-03-04".to_string(),
                nights: 3,
                rooms: 1,
            },
            item_id: format!("hotel-{id}"),
            item_name: item_name.to_string(),
            item_location: "Goa".to_string(),
            item_image: None,
            user_id: "user-1".to_string(),
            user_name: "Asha Rao".to_string(),
            user_email: "asha@example.com".to_string(),
            user_phone: "9876543210".to_string(),
            price_per_unit: Amount::new("1200"),
            total_price: Amount::new("3600"),
            status,
            payment_id: None,
            created_at: "2025-02-01T10:00:00Z".parse().expect("timestamp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOTEL_JSON: &str = r#"{
        "id": "bk_1",
        "bookingType": "HOTEL",
        "itemId": "h_9",
        "itemName": "Azure Paradise Resort",
        "itemLocation": "Goa",
        "userId": "u_1",
        "userName": "Asha",
        "userEmail": "a@x.com",
        "userPhone": "9876543210",
        "pricePerUnit": 1200,
        "totalPrice": "3600.00",
        "status": "PENDING",
        "createdAt": "2025-02-01T10:00:00.000Z",
        "startDate": "2025-03-01",
        "endDate": "2025-03-04",
        "nights": 3,
        "rooms": 1
    }"#;

    const ACTIVITY_JSON: &str = r#"{
        "id": "bk_2",
        "bookingType": "ACTIVITY",
        "itemId": "a_4",
        "itemName": "City Tour",
        "itemLocation": "Jaipur",
        "itemImage": "https://cdn.example.com/tour.jpg",
        "userId": "u_2",
        "userName": "Ravi",
        "userEmail": "b@x.com",
        "userPhone": "9123456780",
        "pricePerUnit": "650",
        "totalPrice": "1300",
        "status": "CONFIRMED",
        "paymentId": "pay_77",
        "createdAt": "2025-02-03T08:30:00Z",
        "date": "2025-03-10",
        "people": 2,
        "duration": "4 hours"
    }"#;

    #[test]
    fn test_decodes_hotel_booking() {
        let booking: Booking = serde_json::from_str(HOTEL_JSON).unwrap();
        assert_eq!(booking.booking_type(), BookingType::Hotel);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.total_price.value(), Some(3600.0));
        match booking.details {
            BookingDetails::Hotel { nights, rooms, .. } => {
                assert_eq!(nights, 3);
                assert_eq!(rooms, 1);
            }
            BookingDetails::Activity { .. } => panic!("expected hotel details"),
        }
    }

    #[test]
    fn test_decodes_activity_booking() {
        let booking: Booking = serde_json::from_str(ACTIVITY_JSON).unwrap();
        assert_eq!(booking.booking_type(), BookingType::Activity);
        assert_eq!(booking.payment_id.as_deref(), Some("pay_77"));
        assert_eq!(booking.facet_value(BookingFacet::Status), "confirmed");
        assert_eq!(booking.facet_value(BookingFacet::Type), "activity");
    }

    #[test]
    fn test_serializes_discriminant() {
        let booking: Booking = serde_json::from_str(HOTEL_JSON).unwrap();
        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["bookingType"], "HOTEL");
        assert_eq!(value["startDate"], "2025-03-01");
        assert_eq!(value["status"], "PENDING");
    }

    #[test]
    fn test_only_pending_has_next_states() {
        assert_eq!(BookingStatus::Pending.next_states().len(), 2);
        assert!(BookingStatus::Confirmed.next_states().is_empty());
        assert!(BookingStatus::Cancelled.next_states().is_empty());
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("confirmed".parse(), Ok(BookingStatus::Confirmed));
        assert!("done".parse::<BookingStatus>().is_err());
    }
}
