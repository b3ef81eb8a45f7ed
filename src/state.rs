use std::{sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::{
    coach::{OpenAiSummarizer, Summarizer},
    config::AppConfig,
    nutrition::{HttpDataset, NutritionCatalog},
    reports::{MemoryReportStore, PgReportStore, ReportStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub reports: Arc<dyn ReportStore>,
    pub summarizer: Arc<dyn Summarizer>,
    pub nutrition: NutritionCatalog,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let reports: Arc<dyn ReportStore> = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new().max_connections(10).connect(url).await?;
                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    warn!(error = %e, "migrations folder not found or migration failed; continuing");
                }
                info!("report store: postgres");
                Arc::new(PgReportStore::new(db))
            }
            None => {
                warn!("DATABASE_URL not set; daily reports are kept in memory only");
                Arc::new(MemoryReportStore::new())
            }
        };

        let summarizer = Arc::new(OpenAiSummarizer::new(&config.llm)?) as Arc<dyn Summarizer>;

        let nutrition = NutritionCatalog::new(
            Arc::new(HttpDataset::new(config.nutrition.data_url.clone())?),
            Duration::from_secs(config.nutrition.cache_ttl_secs),
        );

        Ok(Self {
            config,
            reports,
            summarizer,
            nutrition,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::{
            coach::client::fake::FakeSummarizer,
            config::{JwtConfig, LlmConfig, NutritionConfig},
            nutrition::catalog::fake::{sample_records, StaticDataset},
        };

        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
            },
            llm: LlmConfig {
                api_key: "fake".into(),
                base_url: "http://fake.local/v1".into(),
                model: "fake-model".into(),
            },
            nutrition: NutritionConfig {
                data_url: "http://fake.local/nutrition.json".into(),
                cache_ttl_secs: 3600,
            },
        });

        Self {
            config,
            reports: Arc::new(MemoryReportStore::new()),
            summarizer: Arc::new(FakeSummarizer::default()),
            nutrition: NutritionCatalog::new(
                Arc::new(StaticDataset::new(sample_records())),
                Duration::from_secs(3600),
            ),
        }
    }

    #[cfg(test)]
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }
}
