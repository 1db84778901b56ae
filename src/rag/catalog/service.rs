//! Cached catalog snapshot with filtering and ranking

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::errors::Result;
use crate::rag::catalog::ranker::ResourceCatalogRanker;
use crate::store::CatalogSource;
use crate::types::{ResourceRecord, StageOutcome};

/// Catalog source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub table: String,
    pub max_records: usize,
    /// Lifetime of a fetched snapshot
    pub cache_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            table: "Source repository".to_string(),
            max_records: 100,
            cache_ttl_secs: 3600,
        }
    }
}

/// Ranked resources and how the fetch went
#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub resources: Vec<ResourceRecord>,
    pub outcome: StageOutcome,
}

/// Resource catalog backed by an external table
pub struct ResourceCatalog {
    source: Arc<dyn CatalogSource>,
    ranker: ResourceCatalogRanker,
    snapshots: TtlCache<String, Arc<Vec<ResourceRecord>>>,
    config: CatalogConfig,
}

impl ResourceCatalog {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_config(source, CatalogConfig::default())
    }

    pub fn with_config(source: Arc<dyn CatalogSource>, config: CatalogConfig) -> Self {
        Self {
            source,
            ranker: ResourceCatalogRanker::new(),
            snapshots: TtlCache::new(Duration::from_secs(config.cache_ttl_secs)),
            config,
        }
    }

    /// Current catalog snapshot, fetched at most once per time-to-live.
    /// Failed fetches are not cached.
    pub async fn snapshot(&self) -> Result<Arc<Vec<ResourceRecord>>> {
        if let Some(snapshot) = self.snapshots.get(&self.config.table) {
            debug!(table = %self.config.table, "Catalog snapshot cache hit");
            return Ok(snapshot);
        }

        let records = self
            .source
            .fetch_catalog(&self.config.table, self.config.max_records)
            .await?;

        let snapshot = Arc::new(records);
        self.snapshots.set(self.config.table.clone(), snapshot.clone());
        Ok(snapshot)
    }

    /// Filtered, ranked resources with a typed outcome
    pub async fn listing(&self, filter_value: Option<&str>) -> CatalogListing {
        match self.snapshot().await {
            Ok(snapshot) => {
                let resources = self.ranker.rank(&snapshot, filter_value);
                let outcome = StageOutcome::from_count(resources.len());
                CatalogListing { resources, outcome }
            }
            Err(e) => {
                warn!(error = %e, table = %self.config.table, "Catalog fetch failed");
                CatalogListing {
                    resources: Vec::new(),
                    outcome: StageOutcome::Failed(e.to_string()),
                }
            }
        }
    }

    /// Filtered, ranked resources; empty when the catalog is unavailable
    pub async fn resources(&self, filter_value: Option<&str>) -> Vec<ResourceRecord> {
        self.listing(filter_value).await.resources
    }

    /// Drop the cached snapshot so the next call refetches
    pub fn invalidate(&self) {
        self.snapshots.clear();
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticCatalog(Vec<ResourceRecord>);

    #[async_trait]
    impl CatalogSource for StaticCatalog {
        async fn fetch_catalog(&self, _table: &str, _max: usize) -> Result<Vec<ResourceRecord>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_catalog_config_default() {
        let config = CatalogConfig::default();
        assert_eq!(config.table, "Source repository");
        assert_eq!(config.max_records, 100);
        assert_eq!(config.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_empty_catalog_is_empty_outcome() {
        let catalog = ResourceCatalog::new(Arc::new(StaticCatalog(Vec::new())));
        let listing = tokio_test::block_on(catalog.listing(None));
        assert!(listing.resources.is_empty());
        assert_eq!(listing.outcome, StageOutcome::Empty);
    }

    #[test]
    fn test_snapshot_shared_between_calls() {
        let catalog = ResourceCatalog::new(Arc::new(StaticCatalog(vec![ResourceRecord::default()])));
        let first = tokio_test::block_on(catalog.snapshot()).unwrap();
        let second = tokio_test::block_on(catalog.snapshot()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
