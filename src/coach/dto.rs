use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DailyAnalysisRequest {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyAnalysisRequest {
    #[serde(rename = "weeklySummary")]
    pub weekly_summary: String,
}

#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub reply: String,
}
