use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use validator::Validate;

use super::{encode, ApiClient, ApiRequest};
use crate::entities::Identified;
use crate::error::{AppError, AppResult};
use crate::listing::Listable;

/// An admin-managed listing reachable under a REST collection path.
pub trait CatalogResource:
    Listable + Identified + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Payload for create and update forms.
    type Draft: Validate + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Upstream collection path, e.g. `/api/hotels`.
    const PATH: &'static str;
    /// Display name used in notices.
    const NAME: &'static str;
    /// Plural noun used in load failures.
    const COLLECTION: &'static str;
    /// JSON field carrying the availability/publication flag.
    const VISIBILITY_FIELD: Option<&'static str>;

    fn visibility(&self) -> Option<bool>;

    fn with_visibility(&self, visible: bool) -> Self;
}

fn item_path<R: CatalogResource>(id: &str) -> String {
    format!("{}/{}", R::PATH, id)
}

impl ApiClient {
    pub async fn list_catalog<R: CatalogResource>(&self) -> AppResult<Vec<R>> {
        self.fetch_list(ApiRequest::get(R::PATH)).await
    }

    pub async fn create_catalog<R: CatalogResource>(&self, draft: &R::Draft) -> AppResult<()> {
        draft.validate()?;
        let request = ApiRequest::new(Method::POST, R::PATH).json(encode(draft)?);
        self.call(request).await.map(drop)
    }

    pub async fn update_catalog<R: CatalogResource>(
        &self,
        id: &str,
        draft: &R::Draft,
    ) -> AppResult<()> {
        draft.validate()?;
        let request = ApiRequest::new(Method::PUT, item_path::<R>(id)).json(encode(draft)?);
        self.call(request).await.map(drop)
    }

    pub async fn set_catalog_visibility<R: CatalogResource>(
        &self,
        id: &str,
        visible: bool,
    ) -> AppResult<()> {
        let field = R::VISIBILITY_FIELD.ok_or_else(|| {
            AppError::BadRequest(format!("{} has no visibility toggle", R::NAME))
        })?;
        let mut body = Map::new();
        body.insert(field.to_string(), json!(visible));

        let request = ApiRequest::new(Method::PATCH, item_path::<R>(id)).json(Value::Object(body));
        self.call(request).await.map(drop)
    }

    pub async fn delete_catalog<R: CatalogResource>(&self, id: &str) -> AppResult<()> {
        let request = ApiRequest::new(Method::DELETE, item_path::<R>(id));
        self.call(request).await.map(drop)
    }
}
