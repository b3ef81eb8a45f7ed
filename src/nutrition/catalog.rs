use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use super::{fuzzy::FuzzyIndex, record::NutritionRecord};

/// Number of items shown when the query is empty.
pub const BROWSE_LIMIT: usize = 20;

/// The loaded dataset together with its name index.
#[derive(Debug)]
pub struct Catalog {
    records: Vec<NutritionRecord>,
    index: FuzzyIndex,
}

impl Catalog {
    pub fn new(records: Vec<NutritionRecord>) -> Self {
        let names: Vec<Option<String>> = records.iter().map(|r| r.name()).collect();
        let index = FuzzyIndex::build(names.iter().map(|n| n.as_deref()));
        Self { records, index }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Blank query browses the first `BROWSE_LIMIT` items in dataset order;
    /// anything else is a ranked fuzzy match on the name.
    pub fn search(&self, query: &str) -> Vec<&NutritionRecord> {
        let query = query.trim();
        if query.is_empty() {
            return self.records.iter().take(BROWSE_LIMIT).collect();
        }
        self.index
            .search(query)
            .into_iter()
            .filter_map(|hit| self.records.get(hit.index))
            .collect()
    }

    pub fn find(&self, key: &str) -> Option<&NutritionRecord> {
        self.records.iter().find(|r| r.matches_key(key))
    }
}

/// Where the raw dataset comes from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Vec<NutritionRecord>>;
}

/// JSON array of flat objects served over HTTP. One retry on failure.
#[derive(Debug, Clone)]
pub struct HttpDataset {
    client: Client,
    url: String,
}

impl HttpDataset {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().build().context("build http client")?,
            url: url.into(),
        })
    }

    async fn fetch_once(&self) -> anyhow::Result<Vec<NutritionRecord>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("request nutrition dataset")?
            .error_for_status()
            .context("nutrition dataset status")?;

        let body: Value = response.json().await.context("decode nutrition dataset")?;
        parse_dataset(body)
    }
}

#[async_trait]
impl DatasetSource for HttpDataset {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> anyhow::Result<Vec<NutritionRecord>> {
        match self.fetch_once().await {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(error = %e, "dataset fetch failed; retrying once");
                self.fetch_once().await
            }
        }
    }
}

/// Non-object entries are skipped.
pub fn parse_dataset(body: Value) -> anyhow::Result<Vec<NutritionRecord>> {
    let Value::Array(items) = body else {
        anyhow::bail!("nutrition dataset is not a JSON array");
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(NutritionRecord::new(map)),
            _ => None,
        })
        .collect())
}

struct Loaded {
    catalog: Arc<Catalog>,
    loaded_at: Instant,
}

/// Lazily fetched, time-cached catalog shared by all requests.
#[derive(Clone)]
pub struct NutritionCatalog {
    source: Arc<dyn DatasetSource>,
    ttl: Duration,
    loaded: Arc<RwLock<Option<Loaded>>>,
}

impl NutritionCatalog {
    pub fn new(source: Arc<dyn DatasetSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            loaded: Arc::new(RwLock::new(None)),
        }
    }

    fn fresh(&self, slot: &Option<Loaded>) -> Option<Arc<Catalog>> {
        slot.as_ref()
            .filter(|l| l.loaded_at.elapsed() < self.ttl)
            .map(|l| l.catalog.clone())
    }

    /// Current catalog, fetching when absent or older than the TTL. A failed
    /// refresh keeps serving the previous copy.
    pub async fn get(&self) -> anyhow::Result<Arc<Catalog>> {
        if let Some(c) = self.fresh(&*self.loaded.read().await) {
            return Ok(c);
        }

        let mut slot = self.loaded.write().await;
        if let Some(c) = self.fresh(&slot) {
            return Ok(c);
        }

        match self.source.fetch().await {
            Ok(records) => Ok(Self::install(&mut slot, records)),
            Err(e) => match slot.as_ref() {
                Some(stale) => {
                    warn!(error = %e, "dataset refresh failed; serving cached copy");
                    Ok(stale.catalog.clone())
                }
                None => Err(e),
            },
        }
    }

    /// Drops the cached copy and fetches again.
    pub async fn reload(&self) -> anyhow::Result<Arc<Catalog>> {
        let mut slot = self.loaded.write().await;
        let records = self.source.fetch().await?;
        Ok(Self::install(&mut slot, records))
    }

    fn install(slot: &mut Option<Loaded>, records: Vec<NutritionRecord>) -> Arc<Catalog> {
        let catalog = Arc::new(Catalog::new(records));
        info!(items = catalog.len(), "nutrition catalog loaded");
        *slot = Some(Loaded {
            catalog: catalog.clone(),
            loaded_at: Instant::now(),
        });
        catalog
    }
}

#[cfg(test)]
pub mod fake {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use super::*;

    /// In-process dataset; counts fetches and can be switched to fail.
    #[derive(Default)]
    pub struct StaticDataset {
        pub records: Mutex<Vec<NutritionRecord>>,
        pub fetches: AtomicUsize,
        pub fail: Mutex<bool>,
    }

    impl StaticDataset {
        pub fn new(records: Vec<NutritionRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                ..Self::default()
            }
        }

        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        pub fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl DatasetSource for StaticDataset {
        async fn fetch(&self) -> anyhow::Result<Vec<NutritionRecord>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if *self.fail.lock().unwrap() {
                anyhow::bail!("static dataset down");
            }
            Ok(self.records.lock().unwrap().clone())
        }
    }

    pub fn sample_records() -> Vec<NutritionRecord> {
        parse_dataset(serde_json::json!([
            {"ID": 1, "Name": "Chicken Breast", "Food Group": "Meats", "Protein (g)": 31, "Fat (g)": "3.6", "Carbohydrate (g)": 0, "Sodium (mg)": 74},
            {"ID": 2, "Name": "Brown Rice", "Food Group": "Grains", "Protein (g)": 2.6, "Fat (g)": 0.9, "Carbohydrate (g)": 23, "Vitamin D (mcg)": "NULL"},
            {"ID": 3, "Name": "Apple", "Food Group": "Fruits", "Protein (g)": 0.3, "Carbohydrate (g)": 14, "Sugars (g)": 10.4},
            {"ID": 4, "Name": "Beef Liver", "Food Group": "Meats", "Protein (g)": 20.4, "Iron, Fe (mg)": 4.9},
            {"ID": 5, "Name": "Whole Milk", "Food Group": "Dairy", "Protein (g)": 3.2, "Calcium (mg)": 113}
        ]))
        .unwrap_or_default()
    }
}
