use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::catalog::CatalogResource;
use crate::boards::{CatalogBoard, CatalogView, NoticeSnapshot};
use crate::entities::{Activity, Blog, BlogCategory, Hotel, Testimonial};
use crate::error::AppResult;
use crate::listing::ViewParams;
use crate::AppState;

/// Resources with an admin panel of their own.
pub trait Panel: CatalogResource {
    fn board(state: &AppState) -> &CatalogBoard<Self>;
}

impl Panel for Hotel {
    fn board(state: &AppState) -> &CatalogBoard<Self> {
        &state.catalogs.hotels
    }
}

impl Panel for Activity {
    fn board(state: &AppState) -> &CatalogBoard<Self> {
        &state.catalogs.activities
    }
}

impl Panel for Blog {
    fn board(state: &AppState) -> &CatalogBoard<Self> {
        &state.catalogs.blogs
    }
}

impl Panel for BlogCategory {
    fn board(state: &AppState) -> &CatalogBoard<Self> {
        &state.catalogs.categories
    }
}

impl Panel for Testimonial {
    fn board(state: &AppState) -> &CatalogBoard<Self> {
        &state.catalogs.testimonials
    }
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub count: usize,
    pub notices: NoticeSnapshot,
}

fn mutation_response<R: Panel>(board: &CatalogBoard<R>) -> Json<MutationResponse> {
    Json(MutationResponse {
        count: board.snapshot().len(),
        notices: board.notices(),
    })
}

/// Public listing view; loads the collection on first use.
///
/// A failed load still renders the view, with the error banner set.
pub async fn list<R: Panel>(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> AppResult<Json<CatalogView<R>>> {
    let params = ViewParams::from_query(raw)?;
    let board = R::board(&state);
    let _ = board.ensure_loaded().await;
    Ok(Json(board.view(&params)))
}

pub async fn refresh<R: Panel>(State(state): State<AppState>) -> AppResult<Json<MutationResponse>> {
    let board = R::board(&state);
    board.refresh().await?;
    Ok(mutation_response(board))
}

pub async fn create<R: Panel>(
    State(state): State<AppState>,
    Json(draft): Json<R::Draft>,
) -> AppResult<Json<MutationResponse>> {
    let board = R::board(&state);
    board.create(&draft).await?;
    Ok(mutation_response(board))
}

pub async fn update<R: Panel>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<R::Draft>,
) -> AppResult<Json<MutationResponse>> {
    let board = R::board(&state);
    board.update(&id, &draft).await?;
    Ok(mutation_response(board))
}

pub async fn delete<R: Panel>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MutationResponse>> {
    let board = R::board(&state);
    board.delete(&id).await?;
    Ok(mutation_response(board))
}

#[derive(Debug, Default, Deserialize)]
pub struct VisibilityRequest {
    /// Target flag; omitted means flip the current one.
    pub visible: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct VisibilityResponse<R> {
    pub item: R,
    pub notices: NoticeSnapshot,
}

pub async fn set_visibility<R: Panel>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Option<Json<VisibilityRequest>>,
) -> AppResult<Json<VisibilityResponse<R>>> {
    let board = R::board(&state);
    let requested = payload.and_then(|Json(body)| body.visible);

    let item = board.set_visibility(&id, requested).await?;
    Ok(Json(VisibilityResponse {
        item,
        notices: board.notices(),
    }))
}
