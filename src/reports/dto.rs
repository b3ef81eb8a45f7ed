use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::repo_types::DateKey;

/// Structured wellness inputs for one day. Nothing is range-checked or required here;
/// absent values render as empty placeholders.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DayInputs {
    // Sleep
    #[serde(deserialize_with = "lenient_text")]
    pub sleep_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub wake_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sleep_quality: Option<String>,

    // Nutrition
    #[serde(deserialize_with = "lenient_text")]
    pub food_summary: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub meals_count: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sugar_level: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub water_cups: Option<String>,

    // Exercise
    #[serde(deserialize_with = "lenient_text")]
    pub exercise_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub exercise_duration: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub exercise_intensity: Option<String>,

    // Mood & energy, 1-5
    #[serde(deserialize_with = "lenient_text")]
    pub energy_level: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub mood_level: Option<String>,

    // Symptoms
    #[serde(deserialize_with = "lenient_text")]
    pub felt_pain: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub pain_location: Option<String>,

    // Personal health data
    #[serde(deserialize_with = "lenient_text")]
    pub diabetes: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub hypertension: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub joint_issues: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub food_allergies: Option<String>,

    #[serde(deserialize_with = "lenient_text")]
    pub extra_notes: Option<String>,
}

/// Accepts strings, numbers and booleans (`Yes`/`No`) for any text field.
fn lenient_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(if b { "Yes" } else { "No" }.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Serialize)]
pub struct DailySubmitResponse {
    pub accepted: bool,
    pub weekly_ready: bool,
    pub date_key: DateKey,
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub state: &'static str,
    pub days: usize,
    pub ready: bool,
}
