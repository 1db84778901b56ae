//! Catalog resource records with ECR metadata
//!
//! Catalog rows are free-form field maps. Conversion happens once, here,
//! and fills every missing ECR field with its default so ranking and
//! rendering never have to look anything up.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Relevance assumed for resources that carry no score
pub const DEFAULT_RELEVANCE_SCORE: u8 = 3;
pub const MIN_RELEVANCE_SCORE: u8 = 1;
pub const MAX_RELEVANCE_SCORE: u8 = 5;

/// Catalog column names
pub mod fields {
    pub const TITLE: &str = "Title";
    pub const AUTHOR: &str = "Author";
    pub const DESCRIPTION: &str = "Description";
    pub const LINK: &str = "Link to Resource (Hyperlink)";
    pub const RESOURCE_TYPE: &str = "Type of Resource";
    pub const ACCESS_TYPE: &str = "Access Type";
    pub const TOPICS: &str = "Topics";
    pub const THEME: &str = "Theme";
    pub const RELEVANCE_SCORE: &str = "ECR_Relevance_Score";
    pub const DEVELOPMENT_STAGE: &str = "Development_Stage";
    pub const ESTIMATED_TIME: &str = "Estimated_Time";
    pub const COMPLEXITY_LEVEL: &str = "Complexity_Level";
    pub const PREREQUISITES: &str = "Prerequisites";
    pub const KEY_LEARNINGS: &str = "Key_Learnings";
    pub const COMMON_PITFALLS: &str = "Common_Pitfalls";
}

/// Early-career-researcher annotations attached to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcrMetadata {
    /// 1 (marginal) to 5 (essential)
    pub relevance_score: u8,
    pub development_stage: String,
    pub estimated_time: String,
    pub complexity_level: String,
    pub prerequisites: Vec<String>,
    pub key_learnings: Vec<String>,
    pub common_pitfalls: Vec<String>,
}

impl Default for EcrMetadata {
    fn default() -> Self {
        Self {
            relevance_score: DEFAULT_RELEVANCE_SCORE,
            development_stage: "all".to_string(),
            estimated_time: "unknown".to_string(),
            complexity_level: "medium".to_string(),
            prerequisites: Vec::new(),
            key_learnings: Vec::new(),
            common_pitfalls: Vec::new(),
        }
    }
}

/// External resource from the catalog
///
/// Text fields hold what the catalog provided (empty when absent); display
/// placeholders are applied by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRecord {
    pub title: String,
    pub author: String,
    pub description: String,
    pub link: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub access_type: String,
    pub topics: Vec<String>,
    pub theme: Vec<String>,
    pub ecr_metadata: EcrMetadata,
}

impl ResourceRecord {
    /// Build a record from a catalog field map
    pub fn from_fields(record: &Map<String, Value>) -> Self {
        let defaults = EcrMetadata::default();

        let ecr_metadata = EcrMetadata {
            relevance_score: relevance_field(record.get(fields::RELEVANCE_SCORE)),
            development_stage: text_field(record, fields::DEVELOPMENT_STAGE)
                .unwrap_or(defaults.development_stage),
            estimated_time: text_field(record, fields::ESTIMATED_TIME)
                .unwrap_or(defaults.estimated_time),
            complexity_level: text_field(record, fields::COMPLEXITY_LEVEL)
                .unwrap_or(defaults.complexity_level),
            prerequisites: list_field(record, fields::PREREQUISITES),
            key_learnings: list_field(record, fields::KEY_LEARNINGS),
            common_pitfalls: list_field(record, fields::COMMON_PITFALLS),
        };

        Self {
            title: text_field(record, fields::TITLE).unwrap_or_default(),
            author: text_field(record, fields::AUTHOR).unwrap_or_default(),
            description: text_field(record, fields::DESCRIPTION).unwrap_or_default(),
            link: text_field(record, fields::LINK).unwrap_or_default(),
            resource_type: text_field(record, fields::RESOURCE_TYPE).unwrap_or_default(),
            access_type: text_field(record, fields::ACCESS_TYPE).unwrap_or_default(),
            topics: list_field(record, fields::TOPICS),
            theme: list_field(record, fields::THEME),
            ecr_metadata,
        }
    }

    /// Case-insensitive substring match over title, description, topics and
    /// theme. `needle` must already be lowercased.
    pub fn matches_filter(&self, needle: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(needle);

        contains(&self.title)
            || contains(&self.description)
            || self.topics.iter().any(|t| contains(t))
            || self.theme.iter().any(|t| contains(t))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        other => scalar_text(other),
    }
}

/// Multi-select columns come back as arrays; single-line ones as strings
fn list_field(record: &Map<String, Value>, key: &str) -> Vec<String> {
    match record.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
        None => Vec::new(),
    }
}

fn relevance_field(value: Option<&Value>) -> u8 {
    let score = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match score {
        Some(s) if s.is_finite() => s
            .round()
            .clamp(MIN_RELEVANCE_SCORE as f64, MAX_RELEVANCE_SCORE as f64) as u8,
        _ => DEFAULT_RELEVANCE_SCORE,
    }
}
