use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{
    client::{ChatMessage, PromptKind},
    dto::{DailyAnalysisRequest, ReplyResponse, WeeklyAnalysisRequest},
};
use crate::{
    error::{AppError, AppJson, AppResult},
    state::AppState,
};

pub fn coach_routes() -> Router<AppState> {
    Router::new()
        .route("/daily-report", post(daily_report))
        .route("/weekly-report", post(weekly_report))
        .route("/assistant", post(assistant))
}

/// POST /daily-report { summary } -> { reply }
#[instrument(skip(state, payload))]
pub async fn daily_report(
    State(state): State<AppState>,
    AppJson(payload): AppJson<DailyAnalysisRequest>,
) -> AppResult<Json<ReplyResponse>> {
    let reply = state.summarizer.analyze_day(&payload.summary).await?;
    Ok(Json(ReplyResponse { reply }))
}

/// POST /weekly-report { weeklySummary } -> { reply }
#[instrument(skip(state, payload))]
pub async fn weekly_report(
    State(state): State<AppState>,
    AppJson(payload): AppJson<WeeklyAnalysisRequest>,
) -> AppResult<Json<ReplyResponse>> {
    let reply = state.summarizer.analyze_week(&payload.weekly_summary).await?;
    Ok(Json(ReplyResponse { reply }))
}

/// POST /assistant { messages: [{role, content}, ...] } -> { reply }
///
/// The whole conversation is forwarded each time; the coach prompt is prepended server-side.
#[instrument(skip(state, payload))]
pub async fn assistant(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Json<ReplyResponse>> {
    let Some(raw) = payload.get("messages").filter(|m| m.is_array()) else {
        warn!("assistant request without messages array");
        return Err(AppError::BadRequest("Messages array required".into()));
    };
    let messages: Vec<ChatMessage> = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::BadRequest(format!("invalid message: {e}")))?;

    info!(turns = messages.len(), "assistant request");
    let reply = state.summarizer.complete(PromptKind::Chat, messages).await?;
    Ok(Json(ReplyResponse { reply }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{app::build_app, coach::client::fake::FakeSummarizer, state::AppState};

    async fn post_json(state: AppState, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let res = build_app(state)
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn daily_report_returns_reply() {
        let fake = Arc::new(FakeSummarizer::default());
        let state = AppState::fake().with_summarizer(fake.clone());
        let (status, body) = post_json(
            state,
            "/api/v1/daily-report",
            serde_json::json!({"summary": "DAILY REPORT INPUT DATA"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["reply"].as_str().unwrap().starts_with("Daily"));
        assert_eq!(fake.calls()[0].1[0].content, "DAILY REPORT INPUT DATA");
    }

    #[tokio::test]
    async fn weekly_report_failure_is_500_with_error_body() {
        let state = AppState::fake().with_summarizer(Arc::new(FakeSummarizer::failing()));
        let (status, body) = post_json(
            state,
            "/api/v1/weekly-report",
            serde_json::json!({"weeklySummary": "a\n\n---\n\nb"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn missing_field_is_json_error() {
        let fake = Arc::new(FakeSummarizer::default());
        let state = AppState::fake().with_summarizer(fake.clone());
        let (status, body) = post_json(state, "/api/v1/daily-report", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("summary"));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let res = build_app(AppState::fake())
            .oneshot(
                Request::post("/api/v1/weekly-report")
                    .header("content-type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn assistant_requires_messages_array() {
        let (status, body) = post_json(
            AppState::fake(),
            "/api/v1/assistant",
            serde_json::json!({"messages": "hello"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Messages array required");
    }

    #[tokio::test]
    async fn assistant_forwards_conversation() {
        let fake = Arc::new(FakeSummarizer::default());
        let state = AppState::fake().with_summarizer(fake.clone());
        let (status, _) = post_json(
            state,
            "/api/v1/assistant",
            serde_json::json!({"messages": [
                {"role": "user", "content": "how much protein?"},
                {"role": "assistant", "content": "about 1.6 g/kg"},
                {"role": "user", "content": "and on rest days?"}
            ]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let calls = fake.calls();
        assert_eq!(calls[0].0, super::PromptKind::Chat);
        assert_eq!(calls[0].1.len(), 3);
    }
}
