use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod title;
mod user_preferences;
mod watch;

pub use title::{Category, TitleKind, TitleRecord};
pub use user_preferences::{TitleSet, UserPreferences};
pub use watch::{clamp_progress, ContinueWatchingEntry, MAX_PROGRESS};

/// Identifier for a title, either the catalog's numeric id or a textual key
///
/// Serialized as the bare value (`7` or `"tt0903747"`), matching how the
/// catalog and persisted snapshots spell it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleId {
    Numeric(i64),
    Text(String),
}

impl TitleId {
    /// An id is usable unless it is a blank string
    pub fn is_usable(&self) -> bool {
        match self {
            TitleId::Numeric(_) => true,
            TitleId::Text(s) => !s.trim().is_empty(),
        }
    }
}

impl Display for TitleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TitleId::Numeric(id) => write!(f, "{}", id),
            TitleId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for TitleId {
    fn from(id: i64) -> Self {
        TitleId::Numeric(id)
    }
}

impl From<&str> for TitleId {
    fn from(id: &str) -> Self {
        TitleId::Text(id.to_string())
    }
}

impl From<String> for TitleId {
    fn from(id: String) -> Self {
        TitleId::Text(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_id_display_numeric() {
        assert_eq!(format!("{}", TitleId::Numeric(3)), "3");
    }

    #[test]
    fn test_title_id_display_text() {
        let id = TitleId::from("tt0903747");
        assert_eq!(format!("{}", id), "tt0903747");
    }

    #[test]
    fn test_title_id_serde_is_untagged() {
        let numeric = serde_json::to_string(&TitleId::Numeric(42)).unwrap();
        assert_eq!(numeric, "42");

        let text: TitleId = serde_json::from_str(r#""tt1375666""#).unwrap();
        assert_eq!(text, TitleId::Text("tt1375666".to_string()));

        let parsed: TitleId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, TitleId::Numeric(42));
    }

    #[test]
    fn test_negative_numeric_id_parses() {
        let parsed: TitleId = serde_json::from_str("-1").unwrap();
        assert_eq!(parsed, TitleId::Numeric(-1));
        assert!(parsed.is_usable());
    }

    #[test]
    fn test_blank_text_id_is_not_usable() {
        assert!(TitleId::Numeric(0).is_usable());
        assert!(TitleId::from("a").is_usable());
        assert!(!TitleId::from("").is_usable());
        assert!(!TitleId::from("   ").is_usable());
    }
}
