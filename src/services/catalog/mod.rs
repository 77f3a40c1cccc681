//! Read-only title catalog.
//!
//! The engine never depends on a concrete catalog: lookups for
//! recommendations, search and boundary validation all go through this trait.

use crate::models::{Category, TitleId, TitleKind, TitleRecord};

pub mod static_catalog;

pub use static_catalog::StaticCatalog;

/// Resolves title ids and exposes the ordered category rows
#[cfg_attr(test, mockall::automock)]
pub trait Catalog: Send + Sync {
    /// Canonical record for `id`, if the catalog knows it
    fn find_by_id(&self, id: &TitleId) -> Option<TitleRecord>;

    /// Categories in display order, each with titles in display order
    fn categories(&self) -> Vec<Category>;
}

/// Category names shown on the "New & Popular" page
pub const NEW_AND_POPULAR: [&str; 2] = ["Trending Now", "Popular on Netflix"];

/// Browse page a set of rows is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    TvShows,
    Movies,
    NewPopular,
}

/// Rows for a browse section
///
/// TV and movie pages keep only titles of that kind (untyped titles count as
/// movies) and drop rows left empty.
pub fn categories_for_section(catalog: &dyn Catalog, section: Section) -> Vec<Category> {
    let categories = catalog.categories();
    let kind = match section {
        Section::Home => return categories,
        Section::NewPopular => {
            return categories
                .into_iter()
                .filter(|c| NEW_AND_POPULAR.contains(&c.name.as_str()))
                .collect()
        }
        Section::TvShows => TitleKind::Tv,
        Section::Movies => TitleKind::Movie,
    };

    categories
        .into_iter()
        .map(|mut category| {
            category
                .titles
                .retain(|t| t.kind.unwrap_or(TitleKind::Movie) == kind);
            category
        })
        .filter(|c| !c.titles.is_empty())
        .collect()
}
