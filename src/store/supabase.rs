//! Supabase (PostgREST) client for the PDF and web-page stores

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::SupabaseConfig;
use crate::errors::{Result, RetrievalError};
use crate::store::{escape_like, MatchField, PageChunk, PassageStore, SitePages};
use crate::types::{EmbeddingVector, PassageKind, StoreRecord};

const PDF_COLUMNS: &str = "id,title,content,associated_url,metadata,ecr_metadata";
const WEB_COLUMNS: &str = "id,title,content,url,metadata";

/// HTTP client for a Supabase project
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_key: String,
    config: SupabaseConfig,
}

#[derive(Debug, Deserialize)]
struct UrlRow {
    #[serde(default)]
    url: Option<String>,
}

impl SupabaseStore {
    /// Create a new client for `base_url` (e.g. https://xyz.supabase.co)
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        config: SupabaseConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            config,
        })
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    fn table(&self, store: PassageKind) -> &str {
        match store {
            PassageKind::Pdf => &self.config.pdf_table,
            PassageKind::Web => &self.config.web_table,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::backend("supabase", status.as_u16(), body));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PassageStore for SupabaseStore {
    async fn vector_search(
        &self,
        store: PassageKind,
        embedding: &EmbeddingVector,
        match_count: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<StoreRecord>> {
        let function = match store {
            PassageKind::Pdf => &self.config.pdf_match_function,
            PassageKind::Web => &self.config.web_match_function,
        };

        let mut body = json!({
            "query_embedding": embedding.as_slice(),
            "match_count": match_count,
        });
        if let Some(threshold) = threshold {
            body["match_threshold"] = json!(threshold);
        }
        if store == PassageKind::Web {
            body["filter"] = json!({});
        }

        debug!(%store, function = %function, match_count, "Supabase vector search");

        let response = self
            .authorized(self.client.post(self.rest_url(&format!("rpc/{}", function))))
            .json(&body)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn substring_search(
        &self,
        store: PassageKind,
        field: MatchField,
        pattern: &str,
        limit: usize,
    ) -> Result<Vec<StoreRecord>> {
        let columns = match store {
            PassageKind::Pdf => PDF_COLUMNS,
            PassageKind::Web => WEB_COLUMNS,
        };
        let filter = format!("ilike.*{}*", escape_like(pattern));
        let limit = limit.to_string();

        debug!(%store, column = field.column(), pattern, "Supabase substring search");

        let response = self
            .authorized(self.client.get(self.rest_url(self.table(store))))
            .query(&[
                ("select", columns),
                (field.column(), filter.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        Self::read_json(response).await
    }
}

#[async_trait]
impl SitePages for SupabaseStore {
    async fn list_page_urls(&self, source: &str) -> Result<Vec<String>> {
        let source_filter = format!("eq.{}", source);

        let response = self
            .authorized(self.client.get(self.rest_url(&self.config.web_table)))
            .query(&[("select", "url"), ("metadata->>source", source_filter.as_str())])
            .send()
            .await?;

        let rows: Vec<UrlRow> = Self::read_json(response).await?;
        Ok(rows.into_iter().filter_map(|row| row.url).collect())
    }

    async fn page_chunks(&self, url: &str, source: &str) -> Result<Vec<PageChunk>> {
        let url_filter = format!("eq.{}", url);
        let source_filter = format!("eq.{}", source);

        let response = self
            .authorized(self.client.get(self.rest_url(&self.config.web_table)))
            .query(&[
                ("select", "title,content,chunk_number"),
                ("url", url_filter.as_str()),
                ("metadata->>source", source_filter.as_str()),
                ("order", "chunk_number"),
            ])
            .send()
            .await?;

        Self::read_json(response).await
    }
}
