use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{macros::format_description, Date, OffsetDateTime};

/// Zero-padded `YYYY-MM-DD` day identifier. Lexicographic order equals chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(String);

impl DateKey {
    pub fn from_date(date: Date) -> Self {
        Self(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ))
    }

    /// Key for the current UTC calendar day.
    pub fn today() -> Self {
        Self::from_date(OffsetDateTime::now_utc().date())
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let date = Date::parse(s, format_description!("[year]-[month]-[day]"))?;
        Ok(Self::from_date(date))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DateKey {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(k: DateKey) -> Self {
        k.0
    }
}

#[derive(Debug, FromRow)]
pub struct DailyReportRow {
    pub date_key: String,
    pub summary: String,
    pub created_at: OffsetDateTime,
}

/// One user's report for one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub date_key: DateKey,
    pub summary: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime, // server-assigned
}

impl From<DailyReportRow> for DailyReport {
    fn from(r: DailyReportRow) -> Self {
        Self {
            // rows are only ever written through DateKey
            date_key: DateKey(r.date_key),
            summary: r.summary,
            created_at: r.created_at,
        }
    }
}
