use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{FoodFacts, FoodSummary, ReloadResponse, SearchParams, SearchResponse};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition", get(search))
        .route("/nutrition/reload", post(reload))
        .route("/nutrition/:key", get(detail))
}

/// GET /nutrition?q=
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let catalog = state.nutrition.get().await?;
    let items: Vec<FoodSummary> = catalog
        .search(&params.q)
        .into_iter()
        .map(FoodSummary::from)
        .collect();
    Ok(Json(SearchResponse { items }))
}

/// GET /nutrition/:key
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<FoodFacts>> {
    let catalog = state.nutrition.get().await?;
    let record = catalog
        .find(&key)
        .ok_or_else(|| AppError::NotFound("Food item not found.".into()))?;
    Ok(Json(FoodFacts::from(record)))
}

/// POST /nutrition/reload (admin)
#[instrument(skip(state))]
pub async fn reload(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<ReloadResponse>> {
    if !user.admin {
        return Err(AppError::Forbidden);
    }
    let catalog = state.nutrition.reload().await?;
    info!(user_id = %user.id, items = catalog.len(), "nutrition catalog reloaded");
    Ok(Json(ReloadResponse { count: catalog.len() }))
}
