//! Configuration for the retrieval engine
//!
//! Tunables live in `~/.medtechone/config.toml`. Credentials never live in
//! the file; they are read from the environment into `Credentials`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::embedding::DEFAULT_CACHE_CAPACITY;
use crate::errors::RetrievalError;
use crate::rag::catalog::CatalogConfig;
use crate::rag::retrieval::SearchConfig;
use crate::types::DEFAULT_EMBEDDING_DIM;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Embedding backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    pub model: String,
    pub dimension: usize,
    /// Number of memoized query embeddings
    pub cache_capacity: usize,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/embeddings".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: DEFAULT_EMBEDDING_DIM,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            timeout_secs: 30,
        }
    }
}

/// Names of the Supabase tables and match functions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub pdf_table: String,
    pub web_table: String,
    pub pdf_match_function: String,
    pub web_match_function: String,
    /// `metadata->>source` tag of crawled documentation pages
    pub docs_source: String,
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            pdf_table: "pdf_documents".to_string(),
            web_table: "site_pages".to_string(),
            pdf_match_function: "match_pdf_documents".to_string(),
            web_match_function: "match_site_pages".to_string(),
            docs_source: "MedTechONE_docs".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Derived-content cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of assembled page text
    pub page_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { page_ttl_secs: 3600 }
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".medtechone").join("config.toml"))
    }
}

/// Service credentials read from the environment
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    pub airtable_token: Option<String>,
    pub airtable_base_id: Option<String>,
}

impl Credentials {
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    pub const SUPABASE_URL: &'static str = "SUPABASE_URL";
    pub const SUPABASE_SERVICE_KEY: &'static str = "SUPABASE_SERVICE_KEY";
    pub const AIRTABLE_TOKEN: &'static str = "AIRTABLE_TOKEN";
    pub const AIRTABLE_BASE_ID: &'static str = "AIRTABLE_BASE_ID";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build credentials from any key lookup; blank values count as missing
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            openai_api_key: get(Self::OPENAI_API_KEY),
            supabase_url: get(Self::SUPABASE_URL),
            supabase_service_key: get(Self::SUPABASE_SERVICE_KEY),
            airtable_token: get(Self::AIRTABLE_TOKEN),
            airtable_base_id: get(Self::AIRTABLE_BASE_ID),
        }
    }

    /// Return a credential or a configuration error naming the variable
    pub fn require<'a>(
        value: &'a Option<String>,
        name: &str,
    ) -> std::result::Result<&'a str, RetrievalError> {
        value
            .as_deref()
            .ok_or_else(|| RetrievalError::ConfigError(format!("{} is not set", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.embedding.dimension, 1536);
        assert_eq!(config.embedding.cache_capacity, 1000);
        assert_eq!(config.search.match_count, 10);
        assert_eq!(config.catalog.table, "Source repository");
        assert_eq!(config.catalog.max_records, 100);
        assert_eq!(config.cache.page_ttl_secs, 3600);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.supabase.pdf_match_function, "match_pdf_documents");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[search]\nmatch_count = 5\n\n[embedding]\nmodel = \"text-embedding-3-large\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.match_count, 5);
        assert_eq!(config.search.keyword_limit, 10);
        assert_eq!(config.embedding.model, "text-embedding-3-large");
        assert_eq!(config.embedding.dimension, 1536);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.catalog.max_records = 25;
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.catalog.max_records, 25);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search\nmatch_count = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_credentials_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("AIRTABLE_TOKEN", "  "),
        ]
        .into_iter()
        .collect();

        let creds = Credentials::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(creds.openai_api_key.as_deref(), Some("sk-test"));
        assert!(creds.airtable_token.is_none());
        assert!(creds.supabase_service_key.is_none());

        let err = Credentials::require(&creds.supabase_service_key, Credentials::SUPABASE_SERVICE_KEY)
            .unwrap_err();
        assert!(err.to_string().contains("SUPABASE_SERVICE_KEY"));
    }
}
