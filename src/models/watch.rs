use serde::{Deserialize, Deserializer, Serialize};

use super::{TitleId, TitleRecord};

/// Upper bound of the progress percentage
pub const MAX_PROGRESS: u8 = 100;

/// Clamps an arbitrary progress value into `0..=100`
pub fn clamp_progress(progress: i64) -> u8 {
    progress.clamp(0, MAX_PROGRESS as i64) as u8
}

/// A title the user has started, with how far they got and when
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContinueWatchingEntry {
    #[serde(flatten)]
    pub title: TitleRecord,
    /// Percentage watched, always within `0..=100`
    #[serde(default, deserialize_with = "deserialize_progress")]
    pub progress: u8,
    /// Milliseconds since the Unix epoch of the last touch
    #[serde(rename = "lastWatched", default, deserialize_with = "deserialize_stamp")]
    pub last_watched: i64,
}

impl ContinueWatchingEntry {
    pub fn new(title: TitleRecord, progress: i64, last_watched: i64) -> Self {
        Self {
            title,
            progress: clamp_progress(progress),
            last_watched,
        }
    }

    pub fn id(&self) -> &TitleId {
        &self.title.id
    }

    /// Stores a new clamped progress and refreshes the timestamp
    pub fn touch(&mut self, progress: i64, now: i64) {
        self.progress = clamp_progress(progress);
        self.last_watched = now;
    }
}

// Snapshots written by older builds or edited by hand may hold fractional or
// out-of-range values.
fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(clamp_progress(raw.round() as i64))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStamp {
    Int(i64),
    Float(f64),
}

// Integral stamps keep full precision; floats are truncated and saturate at
// the i64 bounds.
fn deserialize_stamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawStamp::deserialize(deserializer)? {
        RawStamp::Int(stamp) => stamp,
        RawStamp::Float(stamp) if stamp.is_nan() => 0,
        RawStamp::Float(stamp) => stamp as i64,
    })
}
