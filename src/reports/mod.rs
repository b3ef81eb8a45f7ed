pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{MemoryReportStore, PgReportStore, ReportStore};

pub fn router() -> Router<AppState> {
    handlers::report_routes()
}
