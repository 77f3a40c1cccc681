pub mod catalog;
pub mod clock;
pub mod engine;
pub mod notifications;
pub mod queries;
pub mod recommendations;
pub mod title_search;

pub use catalog::{categories_for_section, Catalog, Section, StaticCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineOptions, PreferenceEngine};
pub use notifications::{Notification, NotificationKind, Notifier, SubscriptionId};
pub use recommendations::{because_you_watched, recommendations_for, RecommendationRow};
pub use title_search::search_titles;
