//! Airtable client for the resource catalog

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::{Result, RetrievalError};
use crate::store::CatalogSource;
use crate::types::ResourceRecord;

const AIRTABLE_API: &str = "https://api.airtable.com/v0";

/// Airtable returns at most this many records per page
const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<AirtableRecord>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Catalog source backed by one Airtable base
pub struct AirtableCatalog {
    client: Client,
    api_url: String,
    token: String,
    base_id: String,
}

impl AirtableCatalog {
    pub fn new(token: impl Into<String>, base_id: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            api_url: AIRTABLE_API.to_string(),
            token: token.into(),
            base_id: base_id.into(),
        })
    }

    /// Point the client at a different API root (proxies, tests)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| RetrievalError::ConfigError(format!("Invalid Airtable URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| RetrievalError::ConfigError("Airtable URL cannot be a base".to_string()))?
            .push(&self.base_id)
            .push(table);

        Ok(url)
    }

    async fn fetch_page(
        &self,
        url: &Url,
        max_records: usize,
        offset: Option<&str>,
    ) -> Result<ListResponse> {
        let mut query = vec![
            ("maxRecords", max_records.to_string()),
            ("pageSize", max_records.min(PAGE_SIZE).to_string()),
        ];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::backend("airtable", status.as_u16(), body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogSource for AirtableCatalog {
    async fn fetch_catalog(&self, table: &str, max_records: usize) -> Result<Vec<ResourceRecord>> {
        if max_records == 0 {
            return Ok(Vec::new());
        }

        let url = self.table_url(table)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let page = self.fetch_page(&url, max_records, offset.as_deref()).await?;
            debug!(table, count = page.records.len(), "Fetched catalog page");

            records.extend(page.records.iter().map(|r| ResourceRecord::from_fields(&r.fields)));

            match page.offset {
                Some(next) if records.len() < max_records => offset = Some(next),
                _ => break,
            }
        }

        records.truncate(max_records);
        info!(table, count = records.len(), "Fetched resource catalog");
        Ok(records)
    }
}
