use axum::{routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, state::AppState};

/// Public part of the session returned to the client.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub admin: bool,
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument]
pub async fn get_me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id,
        admin: user.admin,
    })
}
