use std::collections::HashSet;

use crate::models::TitleRecord;
use crate::services::catalog::Catalog;

/// Case-insensitive search over catalog titles and descriptions
///
/// Results follow catalog order and list each title once, even when it
/// appears in several categories. A blank query matches nothing.
pub fn search_titles(catalog: &dyn Catalog, query: &str) -> Vec<TitleRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let results: Vec<TitleRecord> = catalog
        .categories()
        .into_iter()
        .flat_map(|c| c.titles)
        .filter(|t| {
            t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
        })
        .filter(|t| seen.insert(t.id.clone()))
        .collect();

    tracing::debug!(query = %needle, matches = results.len(), "Title search");
    results
}
