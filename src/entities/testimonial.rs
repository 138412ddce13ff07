use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Identified;
use super::blog::publication_label;
use crate::api::catalog::CatalogResource;
use crate::listing::Listable;
use crate::utils::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub message: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialDraft {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[validate(custom(function = "not_blank", message = "Message is required"))]
    pub message: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl Identified for Testimonial {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestimonialFacet {
    Status,
    Rating,
}

impl Listable for Testimonial {
    type Facet = TestimonialFacet;

    const FACETS: &'static [(&'static str, TestimonialFacet)] = &[
        ("status", TestimonialFacet::Status),
        ("rating", TestimonialFacet::Rating),
    ];

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.location, &self.message]
    }

    fn facet_value(&self, facet: TestimonialFacet) -> String {
        match facet {
            TestimonialFacet::Status => publication_label(self.published).to_string(),
            TestimonialFacet::Rating => self.rating.to_string(),
        }
    }

    fn rating(&self) -> Option<f64> {
        Some(f64::from(self.rating))
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl CatalogResource for Testimonial {
    type Draft = TestimonialDraft;

    const PATH: &'static str = "/api/testimonials";
    const NAME: &'static str = "Testimonial";
    const COLLECTION: &'static str = "testimonials";
    const VISIBILITY_FIELD: Option<&'static str> = Some("published");

    fn visibility(&self) -> Option<bool> {
        Some(self.published)
    }

    fn with_visibility(&self, visible: bool) -> Self {
        Self {
            published: visible,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let mut draft = TestimonialDraft {
            name: "Meera".to_string(),
            message: "Seamless houseboat booking".to_string(),
            rating: 0,
            ..Default::default()
        };
        assert!(draft.validate().is_err());
        draft.rating = 5;
        assert!(draft.validate().is_ok());
        draft.rating = 6;
        assert!(draft.validate().is_err());
    }
}
