use std::path::Path;

use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{Category, TitleId, TitleRecord};

use super::Catalog;

/// On-disk catalog layout: either a bare list of categories or an object with
/// an optional featured (banner) title
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Full {
        #[serde(default)]
        featured: Option<TitleRecord>,
        categories: Vec<Category>,
    },
    Rows(Vec<Category>),
}

/// Immutable in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    featured: Option<TitleRecord>,
    categories: Vec<Category>,
}

impl StaticCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            featured: None,
            categories,
        }
    }

    pub fn with_featured(mut self, featured: TitleRecord) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let catalog = match serde_json::from_str::<CatalogFile>(json)? {
            CatalogFile::Full {
                featured,
                categories,
            } => Self {
                featured,
                categories,
            },
            CatalogFile::Rows(categories) => Self::new(categories),
        };
        tracing::info!(
            categories = catalog.categories.len(),
            titles = catalog.title_count(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Banner title, if the catalog defines one
    pub fn featured(&self) -> Option<&TitleRecord> {
        self.featured.as_ref()
    }

    /// Number of title slots across all rows (a title in two rows counts twice)
    pub fn title_count(&self) -> usize {
        self.categories.iter().map(|c| c.titles.len()).sum()
    }
}

impl Catalog for StaticCatalog {
    fn find_by_id(&self, id: &TitleId) -> Option<TitleRecord> {
        self.featured
            .iter()
            .chain(self.categories.iter().flat_map(|c| c.titles.iter()))
            .find(|t| &t.id == id)
            .cloned()
    }

    fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }
}
