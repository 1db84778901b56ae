// End-to-end retrieval pipeline: wiring of clients, engine, catalog and pages
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{Config, Credentials};
use crate::embedding::{EmbeddingBackend, EmbeddingProvider, OpenAiEmbeddingBackend};
use crate::errors::Result;
use crate::rag::catalog::{CatalogListing, ResourceCatalog};
use crate::rag::context::{passages_to_json, render_resources};
use crate::rag::pages::PageLibrary;
use crate::rag::retrieval::{HybridSearchEngine, SearchReport};
use crate::store::{AirtableCatalog, CatalogSource, PassageStore, SitePages, SupabaseStore};
use crate::types::Passage;

/// Retrieval surface exposed to the conversational layer
pub struct RetrievalPipeline {
    engine: HybridSearchEngine,
    catalog: ResourceCatalog,
    pages: PageLibrary,
}

impl RetrievalPipeline {
    /// Assemble from already-built components
    pub fn from_parts(engine: HybridSearchEngine, catalog: ResourceCatalog, pages: PageLibrary) -> Self {
        Self {
            engine,
            catalog,
            pages,
        }
    }

    /// Assemble from collaborator clients
    pub fn with_clients(
        config: &Config,
        backend: Arc<dyn EmbeddingBackend>,
        store: Arc<dyn PassageStore>,
        pages: Arc<dyn SitePages>,
        catalog: Arc<dyn CatalogSource>,
    ) -> Self {
        let embeddings = Arc::new(EmbeddingProvider::new(
            backend,
            config.embedding.dimension,
            config.embedding.cache_capacity,
        ));

        Self {
            engine: HybridSearchEngine::with_config(embeddings, store, config.search.clone()),
            catalog: ResourceCatalog::with_config(catalog, config.catalog.clone()),
            pages: PageLibrary::new(
                pages,
                config.supabase.docs_source.clone(),
                Duration::from_secs(config.cache.page_ttl_secs),
            ),
        }
    }

    /// Build the production clients (OpenAI, Supabase, Airtable)
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self> {
        let api_key = Credentials::require(&credentials.openai_api_key, Credentials::OPENAI_API_KEY)?;
        let supabase_url = Credentials::require(&credentials.supabase_url, Credentials::SUPABASE_URL)?;
        let supabase_key = Credentials::require(
            &credentials.supabase_service_key,
            Credentials::SUPABASE_SERVICE_KEY,
        )?;
        let airtable_token =
            Credentials::require(&credentials.airtable_token, Credentials::AIRTABLE_TOKEN)?;
        let airtable_base =
            Credentials::require(&credentials.airtable_base_id, Credentials::AIRTABLE_BASE_ID)?;

        let backend = Arc::new(OpenAiEmbeddingBackend::new(&config.embedding, api_key)?);
        let supabase = Arc::new(SupabaseStore::new(
            supabase_url,
            supabase_key,
            config.supabase.clone(),
        )?);
        let catalog = Arc::new(AirtableCatalog::new(airtable_token, airtable_base)?);

        info!(model = %config.embedding.model, "Retrieval pipeline configured");

        Ok(Self::with_clients(
            config,
            backend,
            supabase.clone(),
            supabase,
            catalog,
        ))
    }

    pub async fn search(&self, query: &str) -> Vec<Passage> {
        self.engine.search(query).await
    }

    pub async fn search_detailed(&self, query: &str) -> SearchReport {
        self.engine.search_detailed(query).await
    }

    pub async fn search_with_timeout(&self, query: &str, timeout: Duration) -> SearchReport {
        self.engine.search_with_timeout(query, timeout).await
    }

    /// Search and serialize the passages for the prompt
    pub async fn search_json(&self, query: &str) -> Result<String> {
        passages_to_json(&self.search(query).await)
    }

    pub async fn resources(&self, filter_value: Option<&str>) -> CatalogListing {
        self.catalog.listing(filter_value).await
    }

    /// Markdown digest of the ranked resources, or a notice when none match
    pub async fn resource_digest(&self, filter_value: Option<&str>) -> String {
        let listing = self.resources(filter_value).await;
        if listing.resources.is_empty() {
            return "No resources found in the database.".to_string();
        }
        render_resources(&listing.resources)
    }

    pub async fn list_documentation_pages(&self) -> Vec<String> {
        self.pages.list_documentation_pages().await
    }

    pub async fn page_content(&self, url: &str) -> Result<String> {
        self.pages.page_content(url).await
    }

    pub fn engine(&self) -> &HybridSearchEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn pages(&self) -> &PageLibrary {
        &self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_credentials() {
        let credentials = Credentials {
            openai_api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let err = RetrievalPipeline::from_config(&Config::default(), &credentials)
            .err()
            .unwrap();
        assert!(err.to_string().contains("SUPABASE_URL"));
    }

    #[test]
    fn test_from_config_with_all_credentials() {
        let credentials = Credentials {
            openai_api_key: Some("sk-test".to_string()),
            supabase_url: Some("https://project.supabase.co".to_string()),
            supabase_service_key: Some("service".to_string()),
            airtable_token: Some("pat".to_string()),
            airtable_base_id: Some("app".to_string()),
        };
        let pipeline = RetrievalPipeline::from_config(&Config::default(), &credentials).unwrap();
        assert_eq!(pipeline.engine().config().match_count, 10);
        assert_eq!(pipeline.pages().source(), "MedTechONE_docs");
    }
}
