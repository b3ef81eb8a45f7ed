use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{DailySubmitResponse, DayInputs, ReadinessResponse},
    repo_types::{DailyReport, DateKey},
    services::{self, Readiness},
};
use crate::{
    auth::{AuthUser, MaybeUser},
    coach::dto::ReplyResponse,
    error::{AppJson, AppResult},
    state::AppState,
};

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/daily", post(submit_daily).get(list_daily))
        .route("/reports/readiness", get(readiness))
        .route("/reports/weekly", post(generate_weekly))
}

/// POST /reports/daily
///
/// Anonymous callers still get the analysis; only persistence is skipped.
#[instrument(skip(state, inputs))]
pub async fn submit_daily(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    AppJson(inputs): AppJson<DayInputs>,
) -> AppResult<Json<DailySubmitResponse>> {
    let outcome = services::submit(
        state.reports.as_ref(),
        user.map(|u| u.id),
        &inputs,
        DateKey::today(),
    )
    .await?;

    let reply = state.summarizer.analyze_day(&outcome.summary).await?;

    Ok(Json(DailySubmitResponse {
        accepted: outcome.accepted,
        weekly_ready: outcome.weekly_ready,
        date_key: outcome.date_key,
        reply,
    }))
}

/// GET /reports/daily
#[instrument(skip(state))]
pub async fn list_daily(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<DailyReport>>> {
    let reports = services::list_reports(state.reports.as_ref(), user.id).await?;
    Ok(Json(reports))
}

/// GET /reports/readiness
#[instrument(skip(state))]
pub async fn readiness(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Json<ReadinessResponse>> {
    let readiness = match user {
        Some(u) => services::check_readiness(state.reports.as_ref(), u.id).await?,
        None => Readiness::NoDays,
    };
    Ok(Json(ReadinessResponse {
        state: readiness.name(),
        days: readiness.days(),
        ready: readiness.is_ready(),
    }))
}

/// POST /reports/weekly
#[instrument(skip(state))]
pub async fn generate_weekly(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ReplyResponse>> {
    let reply = services::generate_weekly(
        state.reports.as_ref(),
        state.summarizer.as_ref(),
        user.id,
    )
    .await?;
    Ok(Json(ReplyResponse { reply }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        app::build_app,
        auth::jwt::JwtKeys,
        coach::client::fake::FakeSummarizer,
        reports::repo::ReportStore,
        state::AppState,
    };

    use super::DateKey;

    async fn call(
        state: &AppState,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let res = build_app(state.clone()).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn token_for(state: &AppState, user: Uuid) -> String {
        JwtKeys::from_ref(state).sign(user, false).unwrap()
    }

    #[tokio::test]
    async fn anonymous_daily_submit_is_not_accepted() {
        let state = AppState::fake();
        let (status, body) = call(
            &state,
            "POST",
            "/api/v1/reports/daily",
            None,
            Some(serde_json::json!({"sleep_time": "23:00"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["accepted"], false);
        assert_eq!(body["weekly_ready"], false);
        assert!(body["reply"].is_string());
    }

    #[tokio::test]
    async fn malformed_daily_submit_is_json_error() {
        let state = AppState::fake();
        let req = Request::post("/api/v1/reports/daily")
            .header("content-type", "application/json")
            .body(Body::from("{\"sleep_time\": "))
            .unwrap();
        let res = build_app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn authenticated_submit_persists_todays_record() {
        let state = AppState::fake();
        let user = Uuid::new_v4();
        let token = token_for(&state, user);

        let (status, body) = call(
            &state,
            "POST",
            "/api/v1/reports/daily",
            Some(&token),
            Some(serde_json::json!({"food_summary": "oats", "meals_count": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["accepted"], true);
        assert_eq!(body["date_key"], DateKey::today().as_str());

        let stored = state.reports.list_all(user).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].summary.contains("- Meals count: 3"));
    }

    #[tokio::test]
    async fn readiness_for_anonymous_and_ready_users() {
        let state = AppState::fake();
        let (_, body) = call(&state, "GET", "/api/v1/reports/readiness", None, None).await;
        assert_eq!(body["state"], "no_days");
        assert_eq!(body["ready"], false);

        let user = Uuid::new_v4();
        for d in 1..=7 {
            let k = DateKey::parse(&format!("2025-05-{:02}", d)).unwrap();
            state.reports.upsert(user, &k, "s").await.unwrap();
        }
        let token = token_for(&state, user);
        let (_, body) = call(&state, "GET", "/api/v1/reports/readiness", Some(&token), None).await;
        assert_eq!(body["state"], "ready");
        assert_eq!(body["days"], 7);
        assert_eq!(body["ready"], true);
    }

    #[tokio::test]
    async fn weekly_with_six_days_is_conflict_and_skips_summarizer() {
        let fake = Arc::new(FakeSummarizer::default());
        let state = AppState::fake().with_summarizer(fake.clone());
        let user = Uuid::new_v4();
        for d in 1..=6 {
            let k = DateKey::parse(&format!("2025-05-{:02}", d)).unwrap();
            state.reports.upsert(user, &k, "s").await.unwrap();
        }
        let token = token_for(&state, user);

        let (status, body) = call(&state, "POST", "/api/v1/reports/weekly", Some(&token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("6 of 7"));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn weekly_requires_session() {
        let state = AppState::fake();
        let (status, _) = call(&state, "POST", "/api/v1/reports/weekly", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn history_is_oldest_first() {
        let state = AppState::fake();
        let user = Uuid::new_v4();
        for d in ["2025-04-02", "2025-04-01"] {
            state
                .reports
                .upsert(user, &DateKey::parse(d).unwrap(), d)
                .await
                .unwrap();
        }
        let token = token_for(&state, user);
        let (status, body) = call(&state, "GET", "/api/v1/reports/daily", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["date_key"], "2025-04-01");
        assert_eq!(body[1]["date_key"], "2025-04-02");
    }
}
