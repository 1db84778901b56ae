//! Passage and embedding types
//!
//! Store rows arrive as loosely-shaped JSON (`StoreRecord`) and are converted
//! into `Passage` values at the boundary, so the ranking code only sees
//! well-formed passages.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Dimension of `text-embedding-3-small` vectors
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Which content store a passage came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassageKind {
    /// Chunk of an ingested PDF document
    Pdf,
    /// Chunk of a crawled web page
    Web,
}

impl PassageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassageKind::Pdf => "pdf",
            PassageKind::Web => "web",
        }
    }
}

impl fmt::Display for PassageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-length embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Zero-filled vector used when the embedding backend is unavailable
    pub fn zeros(dimension: usize) -> Self {
        Self(vec![0.0; dimension])
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

/// Raw row returned by a passage store (vector match or substring match)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreRecord {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub associated_url: Option<String>,
    #[serde(default)]
    pub similarity: Option<f64>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub ecr_metadata: Option<Value>,
}

impl StoreRecord {
    /// Minimal record, mostly useful for fakes and tests
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = Some(similarity);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Ids are bigint columns in some stores and uuids in others
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A retrieved unit of text with provenance and similarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PassageKind,
    pub title: String,
    pub content: String,
    #[serde(rename = "url")]
    pub source_url: String,
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub source_metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecr_metadata: Option<Map<String, Value>>,
}

impl Passage {
    /// Convert a store row. Rows without an id cannot be deduplicated and are
    /// rejected.
    pub fn from_record(kind: PassageKind, record: StoreRecord) -> Option<Self> {
        let id = record.id?;

        let source_url = match kind {
            PassageKind::Pdf => record.associated_url.or(record.url),
            PassageKind::Web => record.url.or(record.associated_url),
        }
        .unwrap_or_default();

        let ecr_metadata = match kind {
            PassageKind::Pdf => record.ecr_metadata.and_then(into_object),
            PassageKind::Web => None,
        };

        Some(Self {
            id,
            kind,
            title: record.title.unwrap_or_default(),
            content: record.content.unwrap_or_default(),
            source_url,
            similarity: record.similarity,
            source_metadata: record.metadata.and_then(into_object).unwrap_or_default(),
            ecr_metadata,
        })
    }

    /// Score used for ordering; unscored (and non-finite) passages rank as 0
    pub fn rank_score(&self) -> f64 {
        self.similarity.filter(|s| s.is_finite()).unwrap_or(0.0)
    }
}

fn into_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_vector_has_dimension() {
        let v = EmbeddingVector::zeros(DEFAULT_EMBEDDING_DIM);
        assert_eq!(v.dimension(), 1536);
        assert!(v.is_zero());
    }

    #[test]
    fn test_store_record_numeric_id() {
        let record: StoreRecord = serde_json::from_value(json!({
            "id": 42,
            "title": "Clinical trials guide",
            "content": "Phase I",
            "associated_url": "https://medtechone-learning.com/clinical-trials",
            "similarity": 0.81
        }))
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.similarity, Some(0.81));
    }

    #[test]
    fn test_pdf_passage_uses_associated_url_and_ecr_metadata() {
        let record: StoreRecord = serde_json::from_value(json!({
            "id": "7",
            "title": "Usability",
            "content": "IEC 62366",
            "associated_url": "https://medtechone-learning.com/usability",
            "metadata": {"source": "MedTechONE_design_docs"},
            "ecr_metadata": {"development_stage": "prototype"}
        }))
        .unwrap();

        let passage = Passage::from_record(PassageKind::Pdf, record).unwrap();
        assert_eq!(passage.kind, PassageKind::Pdf);
        assert_eq!(passage.source_url, "https://medtechone-learning.com/usability");
        assert_eq!(passage.similarity, None);
        assert_eq!(
            passage.ecr_metadata.unwrap().get("development_stage"),
            Some(&json!("prototype"))
        );
        assert_eq!(
            passage.source_metadata.get("source"),
            Some(&json!("MedTechONE_design_docs"))
        );
    }

    #[test]
    fn test_web_passage_drops_ecr_metadata() {
        let mut record = StoreRecord::new("1", "Data", "GDPR").with_url("https://x/data");
        record.ecr_metadata = Some(json!({"complexity_level": "high"}));
        let passage = Passage::from_record(PassageKind::Web, record).unwrap();
        assert_eq!(passage.source_url, "https://x/data");
        assert!(passage.ecr_metadata.is_none());
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        let record = StoreRecord {
            title: Some("orphan".to_string()),
            ..Default::default()
        };
        assert!(Passage::from_record(PassageKind::Pdf, record).is_none());
    }

    #[test]
    fn test_passage_serializes_type_and_url() {
        let passage = Passage::from_record(
            PassageKind::Web,
            StoreRecord::new("3", "Software", "IEC 62304")
                .with_url("https://medtechone-learning.com/software")
                .with_similarity(0.5),
        )
        .unwrap();
        let value = serde_json::to_value(&passage).unwrap();
        assert_eq!(value["type"], "web");
        assert_eq!(value["url"], "https://medtechone-learning.com/software");
        assert!(value.get("ecr_metadata").is_none());
    }

    #[test]
    fn test_rank_score_defaults_to_zero() {
        let mut passage =
            Passage::from_record(PassageKind::Pdf, StoreRecord::new("1", "t", "c")).unwrap();
        assert_eq!(passage.rank_score(), 0.0);
        passage.similarity = Some(f64::NAN);
        assert_eq!(passage.rank_score(), 0.0);
        passage.similarity = Some(0.42);
        assert_eq!(passage.rank_score(), 0.42);
    }
}
