use std::sync::Arc;

use crate::db::{StoreAdapter, StoreKey};
use crate::models::{ContinueWatchingEntry, TitleId, TitleRecord, TitleSet, UserPreferences};
use crate::services::clock::Clock;
use crate::services::notifications::{Notification, NotificationKind, Notifier};

/// Behavioural switches for the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// When set, liking a title also lists it (and vice versa); removals
    /// mirror the same way
    pub mirror_likes_and_list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shelf {
    Liked,
    MyList,
}

impl Shelf {
    fn key(self) -> StoreKey {
        match self {
            Shelf::Liked => StoreKey::LikedTitles,
            Shelf::MyList => StoreKey::MyListTitles,
        }
    }

    fn other(self) -> Shelf {
        match self {
            Shelf::Liked => Shelf::MyList,
            Shelf::MyList => Shelf::Liked,
        }
    }

    fn notification(self, member: bool) -> NotificationKind {
        match (self, member) {
            (Shelf::Liked, true) => NotificationKind::AddedToLikes,
            (Shelf::Liked, false) => NotificationKind::RemovedFromLikes,
            (Shelf::MyList, true) => NotificationKind::AddedToList,
            (Shelf::MyList, false) => NotificationKind::RemovedFromList,
        }
    }
}

/// Source of truth for liked titles, the saved list and in-progress viewing
///
/// Every mutation writes the affected collection through to the store before
/// returning, then notifies subscribers. A failed write never rolls back the
/// in-memory state.
pub struct PreferenceEngine {
    pub(crate) prefs: UserPreferences,
    store: StoreAdapter,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    options: EngineOptions,
    last_stamp: Option<i64>,
    persistence_degraded: bool,
}

impl PreferenceEngine {
    /// Creates an engine and loads whatever the store holds
    ///
    /// Missing or unreadable snapshots leave the matching collection empty.
    pub fn hydrate(
        store: StoreAdapter,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        options: EngineOptions,
    ) -> Self {
        let mut engine = Self {
            prefs: UserPreferences::new(),
            store,
            notifier,
            clock,
            options,
            last_stamp: None,
            persistence_degraded: false,
        };
        engine.load_all();
        tracing::info!(
            liked = engine.prefs.liked.len(),
            my_list = engine.prefs.my_list.len(),
            continue_watching = engine.prefs.continue_watching.len(),
            mirror = engine.options.mirror_likes_and_list,
            "Preferences hydrated"
        );
        engine
    }

    fn load_all(&mut self) {
        let liked: Vec<TitleRecord> = self.store.load_list(StoreKey::LikedTitles);
        let my_list: Vec<TitleRecord> = self.store.load_list(StoreKey::MyListTitles);
        let watching: Vec<ContinueWatchingEntry> = self.store.load_list(StoreKey::ContinueWatching);

        self.prefs.liked = TitleSet::from_records(liked);
        self.prefs.my_list = TitleSet::from_records(my_list);
        self.prefs.set_continue_watching(watching);

        let latest = self.prefs.latest_watch_stamp();
        self.last_stamp = match (self.last_stamp, latest) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Replaces in-memory state with what the store currently holds
    ///
    /// Used on an explicit cross-tab sync signal. Whatever was written last
    /// to the store wins.
    pub fn refresh_from_store(&mut self) {
        self.load_all();
        tracing::info!("Preferences refreshed from store");
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// True once any write has failed during this session
    pub fn persistence_degraded(&self) -> bool {
        self.persistence_degraded
    }

    /// Adds the title to the liked set, or removes it if already there
    pub fn toggle_liked(&mut self, title: &TitleRecord) -> &TitleSet {
        self.toggle_shelf(Shelf::Liked, title);
        &self.prefs.liked
    }

    /// Adds the title to the saved list, or removes it if already there
    pub fn toggle_in_list(&mut self, title: &TitleRecord) -> &TitleSet {
        self.toggle_shelf(Shelf::MyList, title);
        &self.prefs.my_list
    }

    fn shelf_mut(&mut self, shelf: Shelf) -> &mut TitleSet {
        match shelf {
            Shelf::Liked => &mut self.prefs.liked,
            Shelf::MyList => &mut self.prefs.my_list,
        }
    }

    fn shelf(&self, shelf: Shelf) -> &TitleSet {
        match shelf {
            Shelf::Liked => &self.prefs.liked,
            Shelf::MyList => &self.prefs.my_list,
        }
    }

    fn toggle_shelf(&mut self, shelf: Shelf, title: &TitleRecord) {
        if !title.id.is_usable() {
            tracing::warn!(shelf = ?shelf, "Ignoring toggle for title without a usable id");
            return;
        }

        let member = self.shelf_mut(shelf).toggle(title);
        tracing::info!(title_id = %title.id, shelf = ?shelf, member, "Toggled title");
        let saved = self.persist(shelf.key());
        self.notify_saved(shelf.notification(member), &title.title, saved);

        if self.options.mirror_likes_and_list {
            let other = shelf.other();
            let changed = if member {
                self.shelf_mut(other).insert(title.clone())
            } else {
                self.shelf_mut(other).remove(&title.id)
            };
            if changed {
                tracing::debug!(title_id = %title.id, shelf = ?other, member, "Mirrored toggle");
                let saved = self.persist(other.key());
                self.notify_saved(other.notification(member), &title.title, saved);
            }
        }
    }

    /// Records that the user started or resumed `title`
    ///
    /// An existing entry keeps its stored record and gets the new progress
    /// and a fresh timestamp; otherwise a new entry is appended.
    pub fn start_or_resume(&mut self, title: &TitleRecord, progress: i64) -> ContinueWatchingEntry {
        let stamp = self.next_stamp();
        if !title.id.is_usable() {
            tracing::warn!("Ignoring playback for title without a usable id");
            return ContinueWatchingEntry::new(title.clone(), progress, stamp);
        }

        let (entry, kind) = match self.prefs.watch_entry_mut(&title.id) {
            Some(existing) => {
                existing.touch(progress, stamp);
                (existing.clone(), NotificationKind::Resumed)
            }
            None => {
                let entry = ContinueWatchingEntry::new(title.clone(), progress, stamp);
                self.prefs.continue_watching.push(entry.clone());
                (entry, NotificationKind::Started)
            }
        };

        tracing::info!(
            title_id = %title.id,
            progress = entry.progress,
            resumed = kind == NotificationKind::Resumed,
            "Playback recorded"
        );
        let saved = self.persist(StoreKey::ContinueWatching);
        self.notify_saved(kind, &title.title, saved);
        entry
    }

    /// Updates progress of an existing entry; absent ids are ignored
    pub fn update_progress(&mut self, id: &TitleId, progress: i64) {
        if !self.is_in_progress(id) {
            tracing::debug!(title_id = %id, "Progress update for unknown title ignored");
            return;
        }
        let stamp = self.next_stamp();
        let Some(entry) = self.prefs.watch_entry_mut(id) else {
            return;
        };
        entry.touch(progress, stamp);
        let name = entry.title.title.clone();
        tracing::debug!(title_id = %id, progress = entry.progress, "Progress updated");
        if !self.persist(StoreKey::ContinueWatching) {
            self.notify(NotificationKind::SaveFailed, &name);
        }
    }

    /// Drops the entry for `id`; absent ids are ignored
    pub fn remove_from_continue_watching(&mut self, id: &TitleId) {
        let name = match self.prefs.watch_entry(id) {
            Some(entry) => entry.title.title.clone(),
            None => return,
        };
        self.prefs.remove_watch_entry(id);
        tracing::info!(title_id = %id, "Removed from continue watching");
        if !self.persist(StoreKey::ContinueWatching) {
            self.notify(NotificationKind::SaveFailed, &name);
        }
    }

    /// Empties every collection and deletes the stored snapshots
    pub fn clear_all(&mut self) {
        self.prefs = UserPreferences::new();
        let mut cleared = true;
        for key in StoreKey::ALL {
            if let Err(e) = self.store.remove(key) {
                tracing::error!(error = %e, key = %key, "Failed to delete preferences");
                cleared = false;
            }
        }
        if cleared {
            tracing::info!("Preferences cleared");
        } else {
            self.persistence_degraded = true;
            self.notify(NotificationKind::SaveFailed, "all titles");
        }
    }

    fn next_stamp(&mut self) -> i64 {
        let now = self.clock.now_millis();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn notify(&self, kind: NotificationKind, title: &str) {
        self.notifier.emit(Notification::new(kind, title));
    }

    /// Emits `kind`, followed by a save warning when the write behind it failed
    fn notify_saved(&self, kind: NotificationKind, title: &str, saved: bool) {
        self.notify(kind, title);
        if !saved {
            self.notify(NotificationKind::SaveFailed, title);
        }
    }

    /// Writes the collection behind `key`; returns false if the write failed
    fn persist(&mut self, key: StoreKey) -> bool {
        let result = match key {
            StoreKey::LikedTitles => self.store.save(key, self.shelf(Shelf::Liked)),
            StoreKey::MyListTitles => self.store.save(key, self.shelf(Shelf::MyList)),
            StoreKey::ContinueWatching => self.store.save(key, &self.prefs.continue_watching),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Failed to persist preferences");
                self.persistence_degraded = true;
                false
            }
        }
    }
}
