use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Identified, NoFacet};
use crate::api::catalog::CatalogResource;
use crate::listing::Listable;
use crate::utils::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogDraft {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[validate(custom(function = "not_blank", message = "Content is required"))]
    pub content: String,
    #[validate(custom(function = "not_blank", message = "Category is required"))]
    pub category: String,
    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl Identified for Blog {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogFacet {
    Category,
    Status,
}

impl Listable for Blog {
    type Facet = BlogFacet;

    const FACETS: &'static [(&'static str, BlogFacet)] =
        &[("category", BlogFacet::Category), ("status", BlogFacet::Status)];

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.excerpt, &self.author]
    }

    fn facet_value(&self, facet: BlogFacet) -> String {
        match facet {
            BlogFacet::Category => self.category.to_lowercase(),
            BlogFacet::Status => publication_label(self.published).to_string(),
        }
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl CatalogResource for Blog {
    type Draft = BlogDraft;

    const PATH: &'static str = "/api/blogs";
    const NAME: &'static str = "Blog";
    const COLLECTION: &'static str = "blogs";
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogCategoryDraft {
    #[validate(custom(function = "not_blank", message = "Category name is required"))]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl Identified for BlogCategory {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Listable for BlogCategory {
    type Facet = NoFacet;

    const FACETS: &'static [(&'static str, NoFacet)] = &[];

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.slug]
    }

    fn facet_value(&self, facet: NoFacet) -> String {
        match facet {}
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl CatalogResource for BlogCategory {
    type Draft = BlogCategoryDraft;

    const PATH: &'static str = "/api/blogs/categories";
    const NAME: &'static str = "Category";
    const COLLECTION: &'static str = "categories";
    const VISIBILITY_FIELD: Option<&'static str> = None;

    fn visibility(&self) -> Option<bool> {
        None
    }

    fn with_visibility(&self, _visible: bool) -> Self {
        self.clone()
    }
}

pub(crate) fn publication_label(published: bool) -> &'static str {
    if published { "published" } else { "draft" }
}
