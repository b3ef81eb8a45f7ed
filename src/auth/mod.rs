use crate::state::AppState;
use axum::Router;

mod claims;
pub mod handlers;
pub mod jwt;

pub use jwt::{AuthUser, MaybeUser};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::me_routes())
}
