//! Keyword derivation for the substring fallback

/// Regulatory vocabulary searched even when absent from the query
pub const DEFAULT_BOOTSTRAP_TERMS: [&str; 4] = ["class", "classification", "device", "medical"];

/// Derive fallback keywords: the whole lowercased query, each lowercased
/// whitespace token, then the bootstrap terms. Order is preserved,
/// duplicates and blanks are dropped.
pub fn derive_keywords(query: &str, bootstrap_terms: &[String]) -> Vec<String> {
    let lowered = query.trim().to_lowercase();

    let candidates = std::iter::once(lowered.clone())
        .chain(lowered.split_whitespace().map(str::to_string))
        .chain(bootstrap_terms.iter().map(|t| t.trim().to_lowercase()));

    let mut keywords: Vec<String> = Vec::new();
    for candidate in candidates {
        if !candidate.is_empty() && !keywords.contains(&candidate) {
            keywords.push(candidate);
        }
    }
    keywords
}
