// Cross-store ranking of retrieved passages
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::warn;

use crate::types::{Passage, PassageKind, StoreRecord};

/// Passages from one store, deduplicated by id in first-seen order
#[derive(Debug, Clone, Default)]
pub struct UniquePassages {
    seen: HashSet<String>,
    passages: Vec<Passage>,
}

impl UniquePassages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert and append store rows, skipping ids already present.
    /// Returns the number of passages actually added.
    pub fn extend(&mut self, kind: PassageKind, records: Vec<StoreRecord>) -> usize {
        let mut added = 0;
        for record in records {
            let Some(passage) = Passage::from_record(kind, record) else {
                warn!(store = %kind, "Dropping store record without id");
                continue;
            };
            if self.seen.insert(passage.id.clone()) {
                self.passages.push(passage);
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn into_vec(self) -> Vec<Passage> {
        self.passages
    }
}

/// Merge per-store results and order them by similarity, best first.
///
/// Unscored passages rank as similarity 0 and stay in the output. The sort
/// is stable, so equal scores keep merge order (PDF before web).
pub fn merge_and_rank(stores: Vec<UniquePassages>) -> Vec<Passage> {
    let mut merged: Vec<Passage> = stores.into_iter().flat_map(UniquePassages::into_vec).collect();
    rank_by_similarity(&mut merged);
    merged
}

/// Stable descending sort on `Passage::rank_score`
pub fn rank_by_similarity(passages: &mut [Passage]) {
    passages.sort_by(|a, b| {
        b.rank_score()
            .partial_cmp(&a.rank_score())
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, similarity: Option<f64>) -> StoreRecord {
        let record = StoreRecord::new(id, format!("title {id}"), "content");
        match similarity {
            Some(s) => record.with_similarity(s),
            None => record,
        }
    }

    #[test]
    fn test_extend_deduplicates_by_id() {
        let mut pdf = UniquePassages::new();
        assert_eq!(pdf.extend(PassageKind::Pdf, vec![record("1", Some(0.9)), record("2", None)]), 2);
        assert_eq!(pdf.extend(PassageKind::Pdf, vec![record("2", None), record("3", None)]), 1);
        assert_eq!(pdf.len(), 3);

        let ids: Vec<String> = pdf.into_vec().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_extend_skips_records_without_id() {
        let mut web = UniquePassages::new();
        let added = web.extend(PassageKind::Web, vec![StoreRecord::default(), record("a", None)]);
        assert_eq!(added, 1);
    }

    #[test]
    fn test_merge_orders_by_similarity_with_missing_as_zero() {
        let mut pdf = UniquePassages::new();
        pdf.extend(PassageKind::Pdf, vec![record("p1", Some(0.9)), record("p2", None)]);
        let mut web = UniquePassages::new();
        web.extend(PassageKind::Web, vec![record("w1", Some(0.95))]);

        let ranked = merge_and_rank(vec![pdf, web]);
        let order: Vec<(&str, PassageKind)> =
            ranked.iter().map(|p| (p.id.as_str(), p.kind)).collect();
        assert_eq!(
            order,
            vec![
                ("w1", PassageKind::Web),
                ("p1", PassageKind::Pdf),
                ("p2", PassageKind::Pdf)
            ]
        );
    }

    #[test]
    fn test_ties_keep_merge_order() {
        let mut pdf = UniquePassages::new();
        pdf.extend(PassageKind::Pdf, vec![record("p1", Some(0.5)), record("p2", Some(0.5))]);
        let mut web = UniquePassages::new();
        web.extend(PassageKind::Web, vec![record("w1", Some(0.5))]);

        let ids: Vec<String> = merge_and_rank(vec![pdf, web]).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p1", "p2", "w1"]);
    }

    #[test]
    fn test_same_id_in_both_stores_is_kept() {
        let mut pdf = UniquePassages::new();
        pdf.extend(PassageKind::Pdf, vec![record("1", Some(0.4))]);
        let mut web = UniquePassages::new();
        web.extend(PassageKind::Web, vec![record("1", Some(0.6))]);

        assert_eq!(merge_and_rank(vec![pdf, web]).len(), 2);
    }
}
