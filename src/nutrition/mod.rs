pub mod catalog;
pub mod dto;
pub mod fuzzy;
pub mod handlers;
pub mod record;

use crate::state::AppState;
use axum::Router;

pub use catalog::{HttpDataset, NutritionCatalog};

pub fn router() -> Router<AppState> {
    handlers::nutrition_routes()
}
