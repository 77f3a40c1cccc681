use serde::{Deserialize, Serialize};

use super::TitleId;

/// Type of content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Tv,
    Movie,
}

/// A catalog entry for a movie or show
///
/// Records are immutable once loaded; the engine stores copies and never
/// writes back into the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleRecord {
    pub id: TitleId,
    /// Display name
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub cast: String,
    /// Comma-delimited genre names
    #[serde(default)]
    pub genres: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TitleKind>,
}

impl TitleRecord {
    /// Creates a record with only an id and display name set
    pub fn new(id: impl Into<TitleId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image: String::new(),
            description: String::new(),
            year: String::new(),
            cast: String::new(),
            genres: String::new(),
            rating: None,
            seasons: None,
            kind: None,
        }
    }

    /// Sets the content type
    pub fn with_kind(mut self, kind: TitleKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Genres split on commas, trimmed, blanks dropped
    pub fn genre_list(&self) -> Vec<&str> {
        self.genres
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect()
    }
}

/// A named, ordered row of catalog titles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(alias = "title")]
    pub name: String,
    #[serde(alias = "movies", default)]
    pub titles: Vec<TitleRecord>,
}

impl Category {
    pub fn new(name: impl Into<String>, titles: Vec<TitleRecord>) -> Self {
        Self {
            name: name.into(),
            titles,
        }
    }
}
