use crate::models::{ContinueWatchingEntry, TitleId, TitleRecord};
use crate::services::engine::PreferenceEngine;

/// Read-only views over the engine's collections
impl PreferenceEngine {
    pub fn is_liked(&self, id: &TitleId) -> bool {
        self.prefs.liked.contains(id)
    }

    pub fn is_in_list(&self, id: &TitleId) -> bool {
        self.prefs.my_list.contains(id)
    }

    pub fn is_in_progress(&self, id: &TitleId) -> bool {
        self.prefs.watch_entry(id).is_some()
    }

    pub fn liked(&self) -> &[TitleRecord] {
        self.prefs.liked.as_slice()
    }

    pub fn my_list(&self) -> &[TitleRecord] {
        self.prefs.my_list.as_slice()
    }

    /// In-progress entries in insertion order
    pub fn continue_watching(&self) -> &[ContinueWatchingEntry] {
        &self.prefs.continue_watching
    }

    /// Progress percentage for a title, if the user has started it
    pub fn progress_for(&self, id: &TitleId) -> Option<u8> {
        self.prefs.watch_entry(id).map(|e| e.progress)
    }

    /// In-progress entries, most recently watched first
    ///
    /// The sort is stable, so equal timestamps keep insertion order.
    pub fn sorted_continue_watching(&self) -> Vec<ContinueWatchingEntry> {
        let mut entries = self.prefs.continue_watching.clone();
        entries.sort_by(|a, b| b.last_watched.cmp(&a.last_watched));
        entries
    }

    /// Caption shown above the saved list
    pub fn list_summary(&self) -> String {
        match self.prefs.my_list.len() {
            0 => "Your list is empty. Add titles to watch later.".to_string(),
            1 => "1 title in your list".to_string(),
            n => format!("{} titles in your list", n),
        }
    }
}
