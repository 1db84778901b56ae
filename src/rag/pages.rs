// Documentation page library backed by the crawled site pages
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::errors::Result;
use crate::store::SitePages;

/// Lists crawled documentation pages and reassembles them from chunks
pub struct PageLibrary {
    pages: Arc<dyn SitePages>,
    source: String,
    assembled: TtlCache<String, String>,
}

impl PageLibrary {
    /// `source` is the crawl tag the pages were ingested under
    pub fn new(pages: Arc<dyn SitePages>, source: impl Into<String>, ttl: Duration) -> Self {
        Self {
            pages,
            source: source.into(),
            assembled: TtlCache::new(ttl),
        }
    }

    /// Sorted unique page URLs; empty when the store is unavailable
    pub async fn list_documentation_pages(&self) -> Vec<String> {
        match self.pages.list_page_urls(&self.source).await {
            Ok(urls) => urls.into_iter().collect::<BTreeSet<_>>().into_iter().collect(),
            Err(e) => {
                warn!(error = %e, "Listing documentation pages failed");
                Vec::new()
            }
        }
    }

    /// Full text of a page: a title heading followed by every chunk in order
    pub async fn page_content(&self, url: &str) -> Result<String> {
        if let Some(text) = self.assembled.get(&url.to_string()) {
            debug!(url, "Page cache hit");
            return Ok(text);
        }

        let chunks = self.pages.page_chunks(url, &self.source).await?;
        let Some(first) = chunks.first() else {
            return Ok(format!("No content found for URL: {}", url));
        };

        let title = first.title.as_deref().unwrap_or_default();
        let page_title = title.split(" - ").next().unwrap_or(title);

        let mut parts = vec![format!("# {}\n", page_title)];
        parts.extend(chunks.iter().map(|c| c.content.clone().unwrap_or_default()));

        let text = parts.join("\n\n");
        self.assembled.set(url.to_string(), text.clone());
        Ok(text)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
