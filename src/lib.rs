//! Leaderboard viewer core.
//!
//! Everything that can be reasoned about without a browser lives here: the
//! payload types, score/date formatting, URL fragment routing, the response
//! cache, the fetch sequencer and the view controller that ties them
//! together. The Yew front end in `main.rs` only wires DOM events into the
//! controller and renders the view model it produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod logger;
pub mod period;
pub mod route;
pub mod sequencer;
pub mod storage;
pub mod theme;
pub mod view;

/// Leaderboard category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Author,
    Gold,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Author, GameMode::Gold];

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Author => "author",
            GameMode::Gold => "gold",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "author" => Some(GameMode::Author),
            "gold" => Some(GameMode::Gold),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::Author => "Author",
            GameMode::Gold => "Gold",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub display_name: String,
    pub openplanet_id: String,
}

/// One ranked entry as returned by the leaderboard endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub rank: u32,
    pub player: Player,
    pub maps_completed: u32,
    pub maps_skipped: u32,
    /// Run time in milliseconds.
    pub score: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub scores: Vec<ScoreRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ScoreRow>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ScoreRow>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which of the two user-visible failure panels a fetch error maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Request,
    Response,
}

impl FailureKind {
    pub fn message(self) -> &'static str {
        match self {
            FailureKind::Request => "Failed to load leaderboard. Please try again later.",
            FailureKind::Response => "Something went wrong while reading the response.",
        }
    }
}

// Error type for a single leaderboard request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (offline, CORS, aborted).
    Transport(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The body could not be decoded into a `LeaderboardResponse`.
    Decode(String),
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Transport(_) | FetchError::Status(_) => FailureKind::Request,
            FetchError::Decode(_) => FailureKind::Response,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(message) => write!(f, "Request failed: {}", message),
            FetchError::Status(status) => write!(f, "Server responded with status {}", status),
            FetchError::Decode(message) => write!(f, "Unexpected response body: {}", message),
        }
    }
}

impl std::error::Error for FetchError {}

/// Digits shown after the seconds separator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScorePrecision {
    #[default]
    Centiseconds,
    Milliseconds,
}

impl ScorePrecision {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "centiseconds" | "cs" | "2" => Some(ScorePrecision::Centiseconds),
            "milliseconds" | "ms" | "3" => Some(ScorePrecision::Milliseconds),
            _ => None,
        }
    }
}

/// Format a millisecond score as `M:SS.CC` (or `S.CC` under a minute).
///
/// With [`ScorePrecision::Milliseconds`] the fraction keeps all three digits,
/// e.g. `2:05.340`. Fractions are truncated, never rounded.
pub fn format_score(ms: u64, precision: ScorePrecision) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let (fraction, width) = match precision {
        ScorePrecision::Centiseconds => ((ms % 1000) / 10, 2),
        ScorePrecision::Milliseconds => (ms % 1000, 3),
    };

    if minutes > 0 {
        format!("{}:{:02}.{:0width$}", minutes, seconds, fraction, width = width)
    } else {
        format!("{}.{:0width$}", seconds, fraction, width = width)
    }
}

/// Format a timestamp as `Mon D, YYYY` using its UTC calendar date.
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y").to_string()
}

/// Escape text for insertion into HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
