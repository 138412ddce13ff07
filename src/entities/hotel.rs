use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Amount, Identified};
use crate::api::catalog::CatalogResource;
use crate::listing::Listable;
use crate::utils::validation::{not_blank, price_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub price: Amount,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HotelDraft {
    #[validate(custom(function = "not_blank", message = "Hotel name is required"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Location is required"))]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "price_text"))]
    pub price: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

impl Identified for Hotel {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelFacet {
    Location,
    Availability,
}

impl Listable for Hotel {
    type Facet = HotelFacet;

    const FACETS: &'static [(&'static str, HotelFacet)] = &[
        ("location", HotelFacet::Location),
        ("availability", HotelFacet::Availability),
    ];

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.location]
    }

    fn facet_value(&self, facet: HotelFacet) -> String {
        match facet {
            HotelFacet::Location => self.location.to_lowercase(),
            HotelFacet::Availability => availability_label(self.available).to_string(),
        }
    }

    fn price(&self) -> Option<f64> {
        self.price.value()
    }

    fn rating(&self) -> Option<f64> {
        Some(self.rating)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl CatalogResource for Hotel {
    type Draft = HotelDraft;

    const PATH: &'static str = "/api/hotels";
    const NAME: &'static str = "Hotel";
    const COLLECTION: &'static str = "hotels";
    const VISIBILITY_FIELD: Option<&'static str> = Some("available");

    fn visibility(&self) -> Option<bool> {
        Some(self.available)
    }

    fn with_visibility(&self, visible: bool) -> Self {
        Self {
            available: visible,
            ..self.clone()
        }
    }
}

pub(crate) fn availability_label(available: bool) -> &'static str {
    if available { "available" } else { "unavailable" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::FieldErrors;

    #[test]
    fn test_draft_requires_core_fields() {
        let fields = FieldErrors::from(&HotelDraft::default().validate().unwrap_err());
        assert_eq!(fields.get("name"), Some("Hotel name is required"));
        assert_eq!(fields.get("location"), Some("Location is required"));
        assert_eq!(fields.get("price"), Some("Price is required"));
    }

    #[test]
    fn test_draft_rating_out_of_range() {
        let draft = HotelDraft {
            name: "Azure Paradise Resort".to_string(),
            location: "Goa".to_string(),
            price: "1200".to_string(),
            rating: Some(5.5),
            ..Default::default()
        };
        let fields = FieldErrors::from(&draft.validate().unwrap_err());
        assert_eq!(fields.get("rating"), Some("Rating must be between 0 and 5"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_draft_accepts_currency_price() {
        let draft = HotelDraft {
            name: "Azure Paradise Resort".to_string(),
            location: "Goa".to_string(),
            price: "₹1200".to_string(),
            rating: Some(4.5),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_missing_flags_default_to_available() {
        let hotel: Hotel = serde_json::from_str(
            r#"{"id":"h1","name":"Sea View","location":"Kochi","price":"₹980","createdAt":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(hotel.available);
        assert_eq!(hotel.facet_value(HotelFacet::Availability), "available");
        assert_eq!(hotel.price(), Some(980.0));
    }
}
