use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use serde::Serialize;

use super::{lock, InFlightSet, Loading, NoticeSnapshot, Notices};
use crate::api::catalog::CatalogResource;
use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::listing::{ListState, ListView, Listable, ViewParams};
use crate::utils::merge_by_id;

pub const MUTATION_FALLBACK: &str = "Operation failed";

#[derive(Debug, Clone, Serialize)]
pub struct CatalogRow<R> {
    #[serde(flatten)]
    pub item: R,
    pub updating: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView<R> {
    #[serde(flatten)]
    pub list: ListView<CatalogRow<R>>,
    pub loading: bool,
    pub notices: NoticeSnapshot,
}

/// Cache and CRUD panel for one catalog collection.
///
/// Create, update and delete refetch the whole collection afterwards;
/// visibility toggles patch the cached record in place.
pub struct CatalogBoard<R: CatalogResource> {
    api: ApiClient,
    items: RwLock<Vec<R>>,
    list: Mutex<ListState<<R as Listable>::Facet>>,
    loading: AtomicBool,
    loaded: AtomicBool,
    updating: InFlightSet<String>,
    notices: Notices,
}

impl<R: CatalogResource> CatalogBoard<R> {
    pub fn new(api: ApiClient, page_size: usize, notice_ttl: Duration) -> Self {
        Self {
            api,
            items: RwLock::new(Vec::new()),
            list: Mutex::new(ListState::new(page_size)),
            loading: AtomicBool::new(false),
            loaded: AtomicBool::new(false),
            updating: InFlightSet::new(),
            notices: Notices::new(notice_ttl),
        }
    }

    pub async fn refresh(&self) -> AppResult<usize> {
        let _loading = Loading::start(&self.loading);

        match self.api.list_catalog::<R>().await {
            Ok(items) => {
                let count = items.len();
                *self.items.write().unwrap_or_else(PoisonError::into_inner) = items;
                self.loaded.store(true, Ordering::SeqCst);
                self.notices.clear_error();
                tracing::debug!(resource = R::NAME, count, "Catalog refreshed");
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(resource = R::NAME, kind = err.kind(), error = %err, "Catalog refresh failed");
                self.notices
                    .error(err.user_message(&format!("Failed to load {}", R::COLLECTION)));
                Err(err)
            }
        }
    }

    /// Fetches the collection unless a refresh already succeeded.
    pub async fn ensure_loaded(&self) -> AppResult<()> {
        if !self.loaded.load(Ordering::SeqCst) {
            self.refresh().await?;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<R> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn view(&self, params: &ViewParams) -> CatalogView<R> {
        let items = self.snapshot();
        let list = {
            let mut state = lock(&self.list);
            params.apply_to::<R>(&mut state);
            state.render(&items)
        };

        CatalogView {
            list: list.map(|item| CatalogRow {
                updating: self.updating.contains(&item.id().to_string()),
                item,
            }),
            loading: self.loading.load(Ordering::SeqCst),
            notices: self.notices.snapshot(),
        }
    }

    pub async fn create(&self, draft: &R::Draft) -> AppResult<()> {
        let result = self.api.create_catalog::<R>(draft).await;
        self.after_mutation(result, "created").await
    }

    pub async fn update(&self, id: &str, draft: &R::Draft) -> AppResult<()> {
        let _in_flight = self.updating.acquire(&id.to_string())?;
        let result = self.api.update_catalog::<R>(id, draft).await;
        self.after_mutation(result, "updated").await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let _in_flight = self.updating.acquire(&id.to_string())?;
        let result = self.api.delete_catalog::<R>(id).await;
        self.after_mutation(result, "deleted").await
    }

    async fn after_mutation(&self, result: AppResult<()>, verb: &str) -> AppResult<()> {
        match result {
            Ok(()) => {
                self.notices.success(format!("{} {} successfully", R::NAME, verb));
                tracing::info!(resource = R::NAME, action = verb, "Catalog mutation applied");
                // A failed refetch raises its own banner; the mutation itself stands.
                let _ = self.refresh().await;
                Ok(())
            }
            Err(err) => {
                if !matches!(err, AppError::Validation(_)) {
                    tracing::warn!(resource = R::NAME, action = verb, kind = err.kind(), error = %err, "Catalog mutation failed");
                    self.notices.error(err.user_message(MUTATION_FALLBACK));
                }
                Err(err)
            }
        }
    }

    /// Sets availability/publication and patches the cached record. `None`
    /// flips the cached flag.
    pub async fn set_visibility(&self, id: &str, visible: Option<bool>) -> AppResult<R> {
        // The cached record is read under the marker.
        let _in_flight = self.updating.acquire(&id.to_string())?;

        let current = self
            .snapshot()
            .into_iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("{} not found", R::NAME)))?;
        let visible = visible.unwrap_or_else(|| !current.visibility().unwrap_or(false));

        if let Err(err) = self.api.set_catalog_visibility::<R>(id, visible).await {
            tracing::warn!(resource = R::NAME, id, kind = err.kind(), error = %err, "Visibility toggle failed");
            self.notices.error(err.user_message(MUTATION_FALLBACK));
            return Err(err);
        }

        let updated = {
            let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
            let merged = merge_by_id(&items, id, |item| item.with_visibility(visible));
            *items = merged;
            items.iter().find(|item| item.id() == id).cloned()
        };
        self.notices.success(format!("{} updated successfully", R::NAME));

        Ok(updated.unwrap_or_else(|| current.with_visibility(visible)))
    }

    pub fn dismiss_error(&self) {
        self.notices.clear_error();
    }

    pub fn notices(&self) -> NoticeSnapshot {
        self.notices.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::api::mock::{MockTransport, Reply};
    use crate::entities::{Blog, Hotel, HotelDraft};

    fn hotels() -> serde_json::Value {
        json!([
            {"id": "h1", "name": "Azure Paradise Resort", "location": "Goa", "price": "₹1,200", "rating": 4.6, "createdAt": "2025-01-02T00:00:00Z"},
            {"id": "h2", "name": "Lake Cottage", "location": "Nainital", "price": "₹650", "rating": 4.1, "available": false, "createdAt": "2025-01-03T00:00:00Z"},
            {"id": "h3", "name": "Hill Lodge", "location": "Manali", "price": "₹980", "rating": 3.8, "createdAt": "2025-01-01T00:00:00Z"}
        ])
    }

    fn board(transport: Arc<MockTransport>) -> CatalogBoard<Hotel> {
        CatalogBoard::new(ApiClient::new(transport), 12, Duration::from_millis(3000))
    }

    #[tokio::test]
    async fn test_view_sorts_and_filters_hotels() {
        let transport = Arc::new(MockTransport::new().on(
            Method::GET,
            "/api/hotels",
            Reply::Status(200, hotels()),
        ));
        let board = board(transport);
        board.refresh().await.unwrap();

        let params = ViewParams {
            sort: Some(crate::listing::SortKey::LowToHigh),
            facets: vec![("availability".to_string(), "available".to_string())],
            ..Default::default()
        };
        let view = board.view(&params);
        let ids: Vec<&str> = view.list.items.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(ids, vec!["h3", "h1"]);
    }

    #[tokio::test]
    async fn test_toggle_patches_in_place_without_refetch() {
        let transport = Arc::new(
            MockTransport::new()
                .on(Method::GET, "/api/hotels", Reply::Status(200, hotels()))
                .on(Method::PATCH, "/api/hotels/h2", Reply::Status(200, json!({ "success": true }))),
        );
        let board = board(transport.clone());
        board.refresh().await.unwrap();

        let updated = board.set_visibility("h2", Some(true)).await.unwrap();

        assert!(updated.available);
        assert!(board.snapshot()[1].available);
        assert_eq!(transport.count(&Method::GET, "/api/hotels"), 1);
        assert_eq!(
            board.notices().success.as_deref(),
            Some("Hotel updated successfully")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_toggles_patch_once() {
        let transport = Arc::new(
            MockTransport::new()
                .on(Method::GET, "/api/hotels", Reply::Status(200, hotels()))
                .on_delayed(
                    Method::PATCH,
                    "/api/hotels/h1",
                    Duration::from_millis(100),
                    Reply::Status(200, json!({ "success": true })),
                ),
        );
        let board = board(transport.clone());
        board.refresh().await.unwrap();

        let (first, second) = tokio::join!(board.set_visibility("h1", Some(false)), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            board.set_visibility("h1", Some(true)).await
        });

        assert!(!first.unwrap().available);
        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert!(!board.snapshot()[0].available);
        assert_eq!(transport.count(&Method::PATCH, "/api/hotels/h1"), 1);

        let missing = board.set_visibility("h9", Some(true)).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
        assert!(!board.updating.contains(&"h9".to_string()));

        // Without an explicit value the flag read under the marker is flipped.
        assert!(board.set_visibility("h1", None).await.unwrap().available);
        assert!(!board.set_visibility("h1", None).await.unwrap().available);
        assert_eq!(transport.count(&Method::PATCH, "/api/hotels/h1"), 3);
    }

    #[tokio::test]
    async fn test_create_refetches_collection() {
        let transport = Arc::new(
            MockTransport::new()
                .on(Method::GET, "/api/hotels", Reply::Status(200, hotels()))
                .on(Method::POST, "/api/hotels", Reply::Status(201, json!({ "id": "h4" }))),
        );
        let board = board(transport.clone());

        let draft = HotelDraft {
            name: "Desert Camp".to_string(),
            location: "Jaisalmer".to_string(),
            price: "₹2,100".to_string(),
            ..Default::default()
        };
        board.create(&draft).await.unwrap();

        assert_eq!(transport.count(&Method::GET, "/api/hotels"), 1);
        assert_eq!(board.snapshot().len(), 3);
        assert_eq!(
            board.notices().success.as_deref(),
            Some("Hotel created successfully")
        );
    }

    #[tokio::test]
    async fn test_failed_delete_uses_fallback_and_keeps_cache() {
        let transport = Arc::new(
            MockTransport::new()
                .on(Method::GET, "/api/hotels", Reply::Status(200, hotels()))
                .on(Method::DELETE, "/api/hotels/h1", Reply::Status(500, json!({}))),
        );
        let board = board(transport.clone());
        board.refresh().await.unwrap();

        assert!(board.delete("h1").await.is_err());

        assert_eq!(board.notices().error.as_deref(), Some(MUTATION_FALLBACK));
        assert_eq!(board.snapshot().len(), 3);
        assert_eq!(transport.count(&Method::GET, "/api/hotels"), 1);
    }

    #[tokio::test]
    async fn test_ensure_loaded_fetches_once() {
        let transport = Arc::new(MockTransport::new().on(
            Method::GET,
            "/api/hotels",
            Reply::Status(200, hotels()),
        ));
        let board = board(transport.clone());

        board.ensure_loaded().await.unwrap();
        board.ensure_loaded().await.unwrap();
        assert_eq!(transport.count(&Method::GET, "/api/hotels"), 1);
    }

    #[tokio::test]
    async fn test_blog_publish_toggle() {
        let transport = Arc::new(
            MockTransport::new()
                .on(
                    Method::GET,
                    "/api/blogs",
                    Reply::Status(200, json!({ "data": [
                        {"id": "b1", "title": "Monsoon in Kerala", "category": "Guides", "createdAt": "2025-01-01T00:00:00Z"}
                    ]})),
                )
                .on(Method::PATCH, "/api/blogs/b1", Reply::Status(200, json!({}))),
        );
        let board: CatalogBoard<Blog> =
            CatalogBoard::new(ApiClient::new(transport), 12, Duration::from_millis(3000));
        board.refresh().await.unwrap();

        let blog = board.set_visibility("b1", Some(true)).await.unwrap();
        assert!(blog.published);

        let missing = board.set_visibility("nope", Some(true)).await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));
    }
}
