//! Filtering and ranking of catalog resources

use crate::types::ResourceRecord;

/// Ranks catalog resources by ECR relevance
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceCatalogRanker;

impl ResourceCatalogRanker {
    pub fn new() -> Self {
        Self
    }

    /// Keep the records matching `filter_value` (if any, case-insensitive
    /// substring of title, description, topics or theme) and order them by
    /// relevance score, highest first. Equal scores keep catalog order.
    pub fn rank(&self, records: &[ResourceRecord], filter_value: Option<&str>) -> Vec<ResourceRecord> {
        let needle = filter_value
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let mut retained: Vec<ResourceRecord> = records
            .iter()
            .filter(|record| {
                needle
                    .as_deref()
                    .map_or(true, |needle| record.matches_filter(needle))
            })
            .cloned()
            .collect();

        // sort_by is stable
        retained.sort_by(|a, b| {
            b.ecr_metadata
                .relevance_score
                .cmp(&a.ecr_metadata.relevance_score)
        });

        retained
    }
}
