use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::hotel::availability_label;
use super::{Amount, Identified};
use crate::api::catalog::CatalogResource;
use crate::listing::Listable;
use crate::utils::validation::{not_blank, price_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub location: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: Amount,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDraft {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Location is required"))]
    pub location: String,
    #[validate(custom(function = "not_blank", message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "price_text"))]
    pub price: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

impl Identified for Activity {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityFacet {
    Category,
    Location,
    Availability,
}

impl Listable for Activity {
    type Facet = ActivityFacet;

    const FACETS: &'static [(&'static str, ActivityFacet)] = &[
        ("category", ActivityFacet::Category),
        ("location", ActivityFacet::Location),
        ("availability", ActivityFacet::Availability),
    ];

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.location, &self.category]
    }

    fn facet_value(&self, facet: ActivityFacet) -> String {
        match facet {
            ActivityFacet::Category => self.category.to_lowercase(),
            ActivityFacet::Location => self.location.to_lowercase(),
            ActivityFacet::Availability => availability_label(self.available).to_string(),
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

impl CatalogResource for Activity {
    type Draft = ActivityDraft;

    const PATH: &'static str = "/api/activity-management";
    const NAME: &'static str = "Activity";
    const COLLECTION: &'static str = "activities";
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::FieldErrors;

    #[test]
    fn test_category_facet_is_lowercased() {
        let activity: Activity = serde_json::from_str(
            r#"{"id":"a1","title":"Scuba Dive","location":"Andaman","category":"Adventure","price":"₹4,500","createdAt":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(activity.facet_value(ActivityFacet::Category), "adventure");
        assert_eq!(activity.price(), Some(4500.0));
    }

    #[test]
    fn test_draft_rejects_non_numeric_price() {
        let draft = ActivityDraft {
            title: "Scuba Dive".to_string(),
            location: "Andaman".to_string(),
            category: "Adventure".to_string(),
            price: "call us".to_string(),
            ..Default::default()
        };
        let fields = FieldErrors::from(&draft.validate().unwrap_err());
        assert_eq!(fields.get("price"), Some("Price must be a number"));
        assert_eq!(fields.len(), 1);
    }
}
