pub mod api;
pub mod boards;
pub mod config;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use api::{ApiClient, Transport};
use boards::{BookingBoard, CatalogBoard};
use entities::{Activity, Blog, BlogCategory, Hotel, Testimonial};
use session::Session;
use storage::{
    JsonFileStorage, MemoryStorage, PendingBookingStore, SearchDraftStore, SignupBanner,
    StoragePort,
};

pub use config::Config;
pub use error::{AppError, AppResult};

/// One cache per admin catalog panel.
pub struct Catalogs {
    pub hotels: CatalogBoard<Hotel>,
    pub activities: CatalogBoard<Activity>,
    pub blogs: CatalogBoard<Blog>,
    pub categories: CatalogBoard<BlogCategory>,
    pub testimonials: CatalogBoard<Testimonial>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub session: Arc<Session>,
    pub bookings: Arc<BookingBoard>,
    pub catalogs: Arc<Catalogs>,
    pub search_draft: Arc<SearchDraftStore>,
    pub signup_banner: Arc<SignupBanner>,
    pub pending_booking: Arc<PendingBookingStore>,
}

impl AppState {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> AppResult<Self> {
        let local: Arc<dyn StoragePort> = match &config.local_storage_path {
            Some(path) => Arc::new(JsonFileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        Ok(Self::with_storage(config, transport, local))
    }

    pub fn with_storage(
        config: Config,
        transport: Arc<dyn Transport>,
        local: Arc<dyn StoragePort>,
    ) -> Self {
        let api = ApiClient::new(transport);
        let page_size = config.page_size;
        let ttl = config.notice_ttl();
        let session_storage: Arc<dyn StoragePort> = Arc::new(MemoryStorage::new());

        let catalogs = Catalogs {
            hotels: CatalogBoard::new(api.clone(), page_size, ttl),
            activities: CatalogBoard::new(api.clone(), page_size, ttl),
            blogs: CatalogBoard::new(api.clone(), page_size, ttl),
            categories: CatalogBoard::new(api.clone(), page_size, ttl),
            testimonials: CatalogBoard::new(api.clone(), page_size, ttl),
        };

        Self {
            bookings: Arc::new(BookingBoard::new(api.clone(), page_size, ttl)),
            catalogs: Arc::new(catalogs),
            session: Arc::new(Session::new()),
            search_draft: Arc::new(SearchDraftStore::new(local.clone())),
            signup_banner: Arc::new(SignupBanner::new(session_storage)),
            pending_booking: Arc::new(PendingBookingStore::new(local)),
            api,
            config,
        }
    }
}
