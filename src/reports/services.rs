use std::fmt::Write as _;

use tracing::{debug, info};
use uuid::Uuid;

use super::{
    dto::DayInputs,
    repo::ReportStore,
    repo_types::{DailyReport, DateKey},
};
use crate::{
    coach::Summarizer,
    error::{AppError, AppResult},
};

/// Distinct daily records needed before a weekly rollup is allowed.
pub const WEEKLY_THRESHOLD: usize = 7;
pub const ROLLUP_SEPARATOR: &str = "\n\n---\n\n";

/// Per-user rollup state, derived from the number of stored days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    NoDays,
    Accumulating(usize),
    Ready(usize),
}

impl Readiness {
    pub fn from_count(days: usize) -> Self {
        match days {
            0 => Readiness::NoDays,
            n if n < WEEKLY_THRESHOLD => Readiness::Accumulating(n),
            n => Readiness::Ready(n),
        }
    }

    pub fn is_ready(self) -> bool {
        matches!(self, Readiness::Ready(_))
    }

    pub fn days(self) -> usize {
        match self {
            Readiness::NoDays => 0,
            Readiness::Accumulating(n) | Readiness::Ready(n) => n,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Readiness::NoDays => "no_days",
            Readiness::Accumulating(_) => "accumulating",
            Readiness::Ready(_) => "ready",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub accepted: bool,
    pub weekly_ready: bool,
    pub date_key: DateKey,
    pub summary: String,
}

/// Renders the day's inputs into the labeled text stored as the record's summary.
pub fn render_summary(inputs: &DayInputs) -> String {
    fn v(field: &Option<String>) -> &str {
        field.as_deref().unwrap_or("")
    }

    let sections: [(&str, Vec<(&str, &Option<String>)>); 6] = [
        (
            "Sleep",
            vec![
                ("Sleep time", &inputs.sleep_time),
                ("Wake time", &inputs.wake_time),
                ("Sleep quality", &inputs.sleep_quality),
            ],
        ),
        (
            "Nutrition",
            vec![
                ("Food summary", &inputs.food_summary),
                ("Meals count", &inputs.meals_count),
                ("Sugar level", &inputs.sugar_level),
                ("Water intake cups", &inputs.water_cups),
            ],
        ),
        (
            "Exercise",
            vec![
                ("Exercise type", &inputs.exercise_type),
                ("Exercise duration", &inputs.exercise_duration),
                ("Exercise intensity", &inputs.exercise_intensity),
            ],
        ),
        (
            "Mood & Energy",
            vec![
                ("Energy level", &inputs.energy_level),
                ("Mood level", &inputs.mood_level),
            ],
        ),
        (
            "Symptoms",
            vec![
                ("Felt pain", &inputs.felt_pain),
                ("Pain location", &inputs.pain_location),
            ],
        ),
        (
            "Personal Health Data",
            vec![
                ("Diabetes", &inputs.diabetes),
                ("Hypertension", &inputs.hypertension),
                ("Joint issues", &inputs.joint_issues),
                ("Food allergies", &inputs.food_allergies),
            ],
        ),
    ];

    let mut out = String::from("DAILY REPORT INPUT DATA\n");
    for (title, lines) in sections {
        let _ = writeln!(out, "\n{title}:");
        for (label, value) in lines {
            let _ = writeln!(out, "- {label}: {}", v(value));
        }
    }
    let _ = write!(out, "\nAdditional Notes:\n{}", v(&inputs.extra_notes));
    out
}

/// Persists today's report for the session user and recounts their days.
///
/// Without a session nothing is written and the outcome is not accepted.
/// The upsert and the recount are two separate calls; a concurrent submit can
/// make `weekly_ready` lag by one request, the stored days are unaffected.
pub async fn submit(
    store: &dyn ReportStore,
    session: Option<Uuid>,
    inputs: &DayInputs,
    today: DateKey,
) -> anyhow::Result<SubmitOutcome> {
    let summary = render_summary(inputs);

    let Some(user_id) = session else {
        debug!(date_key = %today, "anonymous submit, skipping persistence");
        return Ok(SubmitOutcome {
            accepted: false,
            weekly_ready: false,
            date_key: today,
            summary,
        });
    };

    store.upsert(user_id, &today, &summary).await?;
    let days = store.count(user_id).await?;
    let readiness = Readiness::from_count(days);

    info!(user_id = %user_id, date_key = %today, days, state = readiness.name(), "daily report stored");
    Ok(SubmitOutcome {
        accepted: true,
        weekly_ready: readiness.is_ready(),
        date_key: today,
        summary,
    })
}

/// Fresh read of the user's day count. Never cached.
pub async fn check_readiness(store: &dyn ReportStore, user_id: Uuid) -> anyhow::Result<Readiness> {
    let days = store.count(user_id).await?;
    Ok(Readiness::from_count(days))
}

/// All of the user's daily reports, oldest first.
pub async fn list_reports(store: &dyn ReportStore, user_id: Uuid) -> anyhow::Result<Vec<DailyReport>> {
    let mut reports = store.list_all(user_id).await?;
    reports.sort_by(|a, b| a.date_key.cmp(&b.date_key));
    Ok(reports)
}

/// Joins every stored summary in date order, or fails when fewer than seven days exist.
pub async fn build_weekly_payload(store: &dyn ReportStore, user_id: Uuid) -> AppResult<String> {
    let reports = list_reports(store, user_id).await?;
    if reports.len() < WEEKLY_THRESHOLD {
        return Err(AppError::InsufficientDays {
            found: reports.len(),
        });
    }

    let payload = reports
        .into_iter()
        .map(|r| r.summary)
        .collect::<Vec<_>>()
        .join(ROLLUP_SEPARATOR);
    Ok(payload)
}

/// Gate, assemble and hand the payload to the summarizer. Its prose is returned untouched.
pub async fn generate_weekly(
    store: &dyn ReportStore,
    summarizer: &dyn Summarizer,
    user_id: Uuid,
) -> AppResult<String> {
    let payload = build_weekly_payload(store, user_id).await?;
    info!(user_id = %user_id, chars = payload.len(), "weekly rollup requested");
    let reply = summarizer.analyze_week(&payload).await?;
    Ok(reply)
}
