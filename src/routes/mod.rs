use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::entities::{Activity, Blog, BlogCategory, Hotel, Testimonial};
use crate::handlers::catalog::Panel;
use crate::handlers::{self, auth, bookings, catalog, drafts};
use crate::middleware::access::{require_admin, require_user};
use crate::AppState;

/// Public view and admin CRUD routes for one catalog resource
fn catalog_routes<R: Panel>(segment: &str) -> (Router<AppState>, Router<AppState>) {
    let public = Router::new().route(&format!("/{segment}"), get(catalog::list::<R>));

    let admin = Router::new()
        .route(&format!("/{segment}"), post(catalog::create::<R>))
        .route(&format!("/{segment}/refresh"), post(catalog::refresh::<R>))
        .route(
            &format!("/{segment}/{{id}}"),
            put(catalog::update::<R>).delete(catalog::delete::<R>),
        )
        .route(
            &format!("/{segment}/{{id}}/visibility"),
            patch(catalog::set_visibility::<R>),
        );

    (public, admin)
}

pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/admin-login", post(auth::admin_login))
        .route("/admin-logout", post(auth::admin_logout))
        .route("/verify", get(auth::verify))
        .route("/user/login", post(auth::user_login))
        .route("/user/register", post(auth::user_register))
        .route("/user/google", post(auth::user_google));

    // Visitor state, usable before sign-in
    let mut public_routes = Router::new()
        .route(
            "/search-draft",
            get(drafts::get_search_draft)
                .put(drafts::save_search_draft)
                .delete(drafts::clear_search_draft),
        )
        .route("/search-draft/events", get(drafts::search_draft_events))
        .route(
            "/signup-banner",
            get(drafts::signup_banner).post(drafts::close_signup_banner),
        )
        .route("/pending-booking", put(drafts::stash_pending_booking));

    let mut admin_routes = Router::new()
        .route("/bookings", get(bookings::admin_bookings))
        .route("/bookings/refresh", post(bookings::refresh_admin_bookings))
        .route("/bookings/error", delete(bookings::dismiss_error))
        .route("/bookings/{id}/status", patch(bookings::update_status))
        .route(
            "/bookings/{id}/menu",
            post(bookings::open_menu).delete(bookings::close_menu),
        );

    for (public, admin) in [
        catalog_routes::<Hotel>("hotels"),
        catalog_routes::<Activity>("activities"),
        catalog_routes::<Blog>("blogs"),
        catalog_routes::<BlogCategory>("blog-categories"),
        catalog_routes::<Testimonial>("testimonials"),
    ] {
        public_routes = public_routes.merge(public);
        admin_routes = admin_routes.merge(admin);
    }

    let admin_routes =
        admin_routes.layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let user_routes = Router::new()
        .route("/bookings", get(bookings::my_bookings_view))
        .route("/pending-booking/take", post(drafts::take_pending_booking))
        .layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api", public_routes.merge(user_routes))
        .with_state(state)
}
