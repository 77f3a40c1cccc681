//! Preference and watch-state engine for a streaming front end.
//!
//! Tracks liked titles, the saved list and continue-watching progress,
//! persists them through a pluggable key-value store and notifies
//! subscribers of every transition.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, AppResult};
