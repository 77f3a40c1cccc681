use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{Category, ContinueWatchingEntry, TitleId, TitleRecord};
use crate::services::{
    because_you_watched, categories_for_section, PreferenceEngine, RecommendationRow, Section,
};

use super::AppState;

/// Number of recent titles that get a "because you watched" row
const RECENT_ROWS: usize = 3;

// Response types

/// Per-title flags a card or modal renders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TitleState {
    pub id: TitleId,
    pub liked: bool,
    pub in_list: bool,
    pub progress: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeRows {
    pub continue_watching: Vec<ContinueWatchingEntry>,
    pub because_you_watched: Vec<RecommendationRow>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MyListPage {
    pub summary: String,
    pub titles: Vec<TitleRecord>,
    pub liked: Vec<TitleRecord>,
}

// Guards

fn ensure_session(state: &AppState) -> AppResult<()> {
    if state.session.is_active() {
        Ok(())
    } else {
        tracing::warn!("Rejected mutation without an active session");
        Err(AppError::SessionInactive)
    }
}

fn ensure_usable(id: &TitleId) -> AppResult<()> {
    if id.is_usable() {
        Ok(())
    } else {
        Err(AppError::InvalidInput("title id must not be blank".to_string()))
    }
}

/// Validates `id` and resolves it to the catalog's canonical record
fn resolve(state: &AppState, id: &TitleId) -> AppResult<TitleRecord> {
    ensure_usable(id)?;
    state
        .catalog
        .find_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("title {}", id)))
}

fn state_of(engine: &PreferenceEngine, id: &TitleId) -> TitleState {
    TitleState {
        id: id.clone(),
        liked: engine.is_liked(id),
        in_list: engine.is_in_list(id),
        progress: engine.progress_for(id),
    }
}

// Handlers

/// Likes or unlikes a catalog title
pub async fn toggle_like(state: &AppState, id: &TitleId) -> AppResult<TitleState> {
    ensure_session(state)?;
    let title = resolve(state, id)?;
    tracing::info!(title_id = %id, "Processing like toggle");

    let mut engine = state.engine.write().await;
    engine.toggle_liked(&title);
    Ok(state_of(&engine, id))
}

/// Adds a catalog title to the saved list, or removes it
pub async fn toggle_my_list(state: &AppState, id: &TitleId) -> AppResult<TitleState> {
    ensure_session(state)?;
    let title = resolve(state, id)?;
    tracing::info!(title_id = %id, "Processing list toggle");

    let mut engine = state.engine.write().await;
    engine.toggle_in_list(&title);
    Ok(state_of(&engine, id))
}

/// Starts or resumes playback of a catalog title
pub async fn play_title(
    state: &AppState,
    id: &TitleId,
    progress: i64,
) -> AppResult<ContinueWatchingEntry> {
    ensure_session(state)?;
    let title = resolve(state, id)?;
    tracing::info!(title_id = %id, progress, "Processing play");

    Ok(state.engine.write().await.start_or_resume(&title, progress))
}

/// Reports playback progress; unknown titles are ignored
pub async fn record_progress(state: &AppState, id: &TitleId, progress: i64) -> AppResult<()> {
    ensure_session(state)?;
    ensure_usable(id)?;

    state.engine.write().await.update_progress(id, progress);
    Ok(())
}

/// Removes a title from the continue-watching row
pub async fn dismiss_from_row(state: &AppState, id: &TitleId) -> AppResult<()> {
    ensure_session(state)?;
    ensure_usable(id)?;

    state.engine.write().await.remove_from_continue_watching(id);
    Ok(())
}

/// Current flags for one title
pub async fn title_state(state: &AppState, id: &TitleId) -> AppResult<TitleState> {
    ensure_usable(id)?;
    Ok(state_of(&*state.engine.read().await, id))
}

/// Everything the home page renders, top to bottom
pub async fn home_rows(state: &AppState) -> HomeRows {
    let engine = state.engine.read().await;
    HomeRows {
        continue_watching: engine.sorted_continue_watching(),
        because_you_watched: because_you_watched(
            &engine,
            state.catalog.as_ref(),
            RECENT_ROWS,
            state.recommendation_limit,
        ),
        categories: categories_for_section(state.catalog.as_ref(), Section::Home),
    }
}

/// The saved-list page
pub async fn my_list_page(state: &AppState) -> MyListPage {
    let engine = state.engine.read().await;
    MyListPage {
        summary: engine.list_summary(),
        titles: engine.my_list().to_vec(),
        liked: engine.liked().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StaticSession;
    use crate::db::{MemoryStore, StoreAdapter};
    use crate::services::{EngineOptions, ManualClock, Notifier, PreferenceEngine, StaticCatalog};
    use std::sync::Arc;

    fn state(session_active: bool) -> AppState {
        let engine = PreferenceEngine::hydrate(
            StoreAdapter::new(Arc::new(MemoryStore::new())),
            Notifier::new(),
            Arc::new(ManualClock::new(1_000)),
            EngineOptions::default(),
        );
        let catalog = StaticCatalog::new(vec![Category::new(
            "Trending Now",
            vec![TitleRecord::new(2i64, "The Crown"), TitleRecord::new(3i64, "Breaking Bad")],
        )]);
        AppState::new(
            engine,
            Arc::new(catalog),
            Arc::new(StaticSession::new(session_active)),
        )
    }

    #[tokio::test]
    async fn test_toggle_like_returns_fresh_state() {
        let state = state(true);
        let result = toggle_like(&state, &TitleId::Numeric(2)).await.unwrap();
        assert!(result.liked);
        assert!(!result.in_list);
        assert_eq!(result.progress, None);
    }

    #[tokio::test]
    async fn test_concurrent_toggles_report_their_own_outcome() {
        let state = state(true);
        let id = TitleId::Numeric(2);

        let (first, second) = tokio::join!(toggle_like(&state, &id), toggle_like(&state, &id));
        let mut flags = vec![first.unwrap().liked, second.unwrap().liked];
        flags.sort();

        assert_eq!(flags, vec![false, true]);
        assert!(!title_state(&state, &id).await.unwrap().liked);
    }

    #[tokio::test]
    async fn test_mutation_requires_session() {
        let state = state(false);
        let result = toggle_my_list(&state, &TitleId::Numeric(2)).await;
        assert!(matches!(result, Err(AppError::SessionInactive)));
        assert!(my_list_page(&state).await.titles.is_empty());
    }

    #[tokio::test]
    async fn test_blank_id_rejected() {
        let state = state(true);
        let result = play_title(&state, &TitleId::from(" "), 0).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unknown_id_not_found() {
        let state = state(true);
        let result = toggle_like(&state, &TitleId::Numeric(404)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_play_then_progress_then_dismiss() {
        let state = state(true);
        let id = TitleId::Numeric(3);

        let entry = play_title(&state, &id, 0).await.unwrap();
        assert_eq!(entry.title.title, "Breaking Bad");

        record_progress(&state, &id, 55).await.unwrap();
        assert_eq!(title_state(&state, &id).await.unwrap().progress, Some(55));

        dismiss_from_row(&state, &id).await.unwrap();
        assert_eq!(title_state(&state, &id).await.unwrap().progress, None);
    }

    #[tokio::test]
    async fn test_home_rows() {
        let state = state(true);
        play_title(&state, &TitleId::Numeric(2), 10).await.unwrap();

        let rows = home_rows(&state).await;
        assert_eq!(rows.continue_watching.len(), 1);
        assert_eq!(rows.because_you_watched.len(), 1);
        assert_eq!(rows.because_you_watched[0].heading, "Because you watched The Crown");
        assert_eq!(rows.categories.len(), 1);
    }
}
