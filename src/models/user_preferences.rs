use serde::{Deserialize, Serialize};

use super::{ContinueWatchingEntry, TitleId, TitleRecord};

/// An insertion-ordered set of titles keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TitleSet {
    titles: Vec<TitleRecord>,
}

impl TitleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from a possibly duplicated list, keeping the first
    /// occurrence of each id
    pub fn from_records(records: Vec<TitleRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    pub fn contains(&self, id: &TitleId) -> bool {
        self.titles.iter().any(|t| &t.id == id)
    }

    /// Inserts the title unless its id is already present
    pub fn insert(&mut self, title: TitleRecord) -> bool {
        if self.contains(&title.id) {
            return false;
        }
        self.titles.push(title);
        true
    }

    /// Removes the title with the given id, if any
    pub fn remove(&mut self, id: &TitleId) -> bool {
        let before = self.titles.len();
        self.titles.retain(|t| &t.id != id);
        self.titles.len() != before
    }

    /// Flips membership; returns `true` when the title is now a member
    pub fn toggle(&mut self, title: &TitleRecord) -> bool {
        if self.remove(&title.id) {
            false
        } else {
            self.titles.push(title.clone());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TitleRecord> {
        self.titles.iter()
    }

    pub fn as_slice(&self) -> &[TitleRecord] {
        &self.titles
    }

    pub fn clear(&mut self) {
        self.titles.clear();
    }
}

/// The user's liked titles, saved list and in-progress viewing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPreferences {
    pub liked: TitleSet,
    pub my_list: TitleSet,
    /// Kept in insertion order; recency ordering is a derived view
    pub continue_watching: Vec<ContinueWatchingEntry>,
}

impl UserPreferences {
    /// Creates empty user preferences
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watch_entry(&self, id: &TitleId) -> Option<&ContinueWatchingEntry> {
        self.continue_watching.iter().find(|e| e.id() == id)
    }

    pub fn watch_entry_mut(&mut self, id: &TitleId) -> Option<&mut ContinueWatchingEntry> {
        self.continue_watching.iter_mut().find(|e| e.id() == id)
    }

    /// Replaces the in-progress list, dropping repeated ids (first wins)
    pub fn set_continue_watching(&mut self, entries: Vec<ContinueWatchingEntry>) {
        self.continue_watching.clear();
        for entry in entries {
            if self.watch_entry(entry.id()).is_none() {
                self.continue_watching.push(entry);
            }
        }
    }

    /// Removes the in-progress entry for `id`; returns whether one existed
    pub fn remove_watch_entry(&mut self, id: &TitleId) -> bool {
        let before = self.continue_watching.len();
        self.continue_watching.retain(|e| e.id() != id);
        self.continue_watching.len() != before
    }

    /// Latest `lastWatched` across all entries
    pub fn latest_watch_stamp(&self) -> Option<i64> {
        self.continue_watching.iter().map(|e| e.last_watched).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(id: i64, name: &str) -> TitleRecord {
        TitleRecord::new(id, name)
    }

    #[test]
    fn test_new_preferences() {
        let prefs = UserPreferences::new();
        assert!(prefs.liked.is_empty());
        assert!(prefs.my_list.is_empty());
        assert!(prefs.continue_watching.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut set = TitleSet::new();
        let dark = title(6, "Dark");

        assert!(set.toggle(&dark));
        assert!(set.contains(&dark.id));
        assert!(!set.toggle(&dark));
        assert!(!set.contains(&dark.id));
    }

    #[test]
    fn test_insert_ignores_duplicate_ids() {
        let mut set = TitleSet::new();
        assert!(set.insert(title(2, "The Crown")));
        assert!(!set.insert(title(2, "The Crown (renamed)")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].title, "The Crown");
    }

    #[test]
    fn test_from_records_dedupes_keeping_first() {
        let set = TitleSet::from_records(vec![
            title(1, "first"),
            title(2, "second"),
            title(1, "again"),
        ]);
        let names: Vec<_> = set.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_set_continue_watching_dedupes() {
        let mut prefs = UserPreferences::new();
        prefs.set_continue_watching(vec![
            ContinueWatchingEntry::new(title(1, "a"), 10, 5),
            ContinueWatchingEntry::new(title(1, "a"), 90, 9),
            ContinueWatchingEntry::new(title(2, "b"), 20, 7),
        ]);
        assert_eq!(prefs.continue_watching.len(), 2);
        assert_eq!(prefs.watch_entry(&TitleId::Numeric(1)).unwrap().progress, 10);
        assert_eq!(prefs.latest_watch_stamp(), Some(7));
    }

    #[test]
    fn test_remove_missing_watch_entry_is_noop() {
        let mut prefs = UserPreferences::new();
        prefs.set_continue_watching(vec![ContinueWatchingEntry::new(title(1, "a"), 10, 5)]);
        assert!(!prefs.remove_watch_entry(&TitleId::Numeric(99)));
        assert_eq!(prefs.continue_watching.len(), 1);
    }
}
