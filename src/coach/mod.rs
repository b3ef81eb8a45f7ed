pub mod client;
pub mod dto;
pub mod handlers;
mod prompts;

use crate::state::AppState;
use axum::Router;

pub use client::{OpenAiSummarizer, Summarizer};

pub fn router() -> Router<AppState> {
    handlers::coach_routes()
}
