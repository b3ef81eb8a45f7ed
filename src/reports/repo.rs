use std::collections::{BTreeMap, HashMap};

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::{DailyReport, DailyReportRow, DateKey};

/// Keyed document store for daily reports: `(user_id, "dailyReports", date_key)`.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Full overwrite of summary and timestamp. `created_at` is assigned by the store.
    async fn upsert(&self, user_id: Uuid, date_key: &DateKey, summary: &str) -> anyhow::Result<()>;
    async fn list_all(&self, user_id: Uuid) -> anyhow::Result<Vec<DailyReport>>;
    async fn count(&self, user_id: Uuid) -> anyhow::Result<usize>;
}

#[derive(Clone)]
pub struct PgReportStore {
    db: PgPool,
}

impl PgReportStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn upsert(&self, user_id: Uuid, date_key: &DateKey, summary: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO daily_reports (user_id, date_key, summary, created_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id, date_key)
            DO UPDATE SET summary = EXCLUDED.summary, created_at = now()
            "#,
        )
        .bind(user_id)
        .bind(date_key.as_str())
        .bind(summary)
        .execute(&self.db)
        .await
        .with_context(|| format!("upsert daily report {}", date_key))?;
        Ok(())
    }

    async fn list_all(&self, user_id: Uuid) -> anyhow::Result<Vec<DailyReport>> {
        let rows = sqlx::query_as::<_, DailyReportRow>(
            r#"
            SELECT date_key, summary, created_at
              FROM daily_reports
             WHERE user_id = $1
             ORDER BY date_key
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list daily reports")?;
        Ok(rows.into_iter().map(DailyReport::from).collect())
    }

    async fn count(&self, user_id: Uuid) -> anyhow::Result<usize> {
        let (n,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM daily_reports WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .context("count daily reports")?;
        Ok(n.max(0) as usize)
    }
}

/// Process-local store used when no database is configured.
#[derive(Default)]
pub struct MemoryReportStore {
    users: RwLock<HashMap<Uuid, BTreeMap<DateKey, DailyReport>>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn upsert(&self, user_id: Uuid, date_key: &DateKey, summary: &str) -> anyhow::Result<()> {
        let report = DailyReport {
            date_key: date_key.clone(),
            summary: summary.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.users
            .write()
            .await
            .entry(user_id)
            .or_default()
            .insert(date_key.clone(), report);
        Ok(())
    }

    async fn list_all(&self, user_id: Uuid) -> anyhow::Result<Vec<DailyReport>> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .map(|days| days.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn count(&self, user_id: Uuid) -> anyhow::Result<usize> {
        Ok(self.users.read().await.get(&user_id).map_or(0, BTreeMap::len))
    }
}
