use serde::Serialize;

use crate::models::{TitleId, TitleRecord};
use crate::services::catalog::Catalog;
use crate::services::engine::PreferenceEngine;

/// Titles that share a category with `id`
///
/// Uses the first category containing `id`, keeps catalog order, excludes the
/// title itself and stops at `limit`. An id missing from every category
/// yields no recommendations.
pub fn recommendations_for(catalog: &dyn Catalog, id: &TitleId, limit: usize) -> Vec<TitleRecord> {
    catalog
        .categories()
        .into_iter()
        .find(|c| c.titles.iter().any(|t| &t.id == id))
        .map(|c| {
            c.titles
                .into_iter()
                .filter(|t| &t.id != id)
                .take(limit)
                .collect()
        })
        .unwrap_or_default()
}

/// A "Because you watched ..." row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationRow {
    pub heading: String,
    pub source: TitleId,
    pub titles: Vec<TitleRecord>,
}

/// One recommendation row per recently watched title
///
/// Looks at the `rows` most recent continue-watching entries; rows that
/// would be empty are skipped rather than backfilled.
pub fn because_you_watched(
    engine: &PreferenceEngine,
    catalog: &dyn Catalog,
    rows: usize,
    limit: usize,
) -> Vec<RecommendationRow> {
    engine
        .sorted_continue_watching()
        .into_iter()
        .take(rows)
        .filter_map(|entry| {
            let titles = recommendations_for(catalog, entry.id(), limit);
            if titles.is_empty() {
                return None;
            }
            Some(RecommendationRow {
                heading: format!("Because you watched {}", entry.title.title),
                source: entry.title.id,
                titles,
            })
        })
        .collect()
}
