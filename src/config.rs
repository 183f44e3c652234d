//! Application-level configuration constants and page-supplied overrides.

use crate::period::YearMonth;
use crate::ScorePrecision;

// Backend
pub const LEADERBOARD_ENDPOINT: &str = "api/leaderboard";
pub const GAME_MODE_PARAM: &str = "game_mode";
pub const MONTH_PARAM: &str = "month";

// External links
pub const PROFILE_BASE_URL: &str = "https://trackmania.io/#/player/";

// Stat columns are only populated for runs on/after this UTC date (y, m, d)
pub const STATS_CUTOFF: (i32, u32, u32) = (2026, 2, 1);

// Oldest month offered in the archive list
pub const ARCHIVE_EPOCH: YearMonth = YearMonth::new_unchecked(2025, 12);

// Persistence
pub const THEME_STORAGE_KEY: &str = "theme";
pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const DARK_MODE_QUERY: &str = "(prefers-color-scheme: dark)";

// <meta name="..."> overrides read from the host page
pub const META_ENDPOINT: &str = "leaderboard-endpoint";
pub const META_SCORE_PRECISION: &str = "score-precision";
pub const META_ARCHIVE: &str = "archive";

/// Runtime settings for a viewer instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSettings {
    pub endpoint: String,
    pub precision: ScorePrecision,
    /// `None` disables the archive selector entirely.
    pub archive_epoch: Option<YearMonth>,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            endpoint: LEADERBOARD_ENDPOINT.to_string(),
            precision: ScorePrecision::default(),
            archive_epoch: Some(ARCHIVE_EPOCH),
        }
    }
}

impl ViewerSettings {
    /// Build settings from a meta-tag lookup, keeping defaults for anything
    /// missing, blank or unrecognized.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(endpoint) = lookup(META_ENDPOINT) {
            let trimmed = endpoint.trim();
            if !trimmed.is_empty() {
                settings.endpoint = trimmed.to_string();
            }
        }

        if let Some(raw) = lookup(META_SCORE_PRECISION) {
            match ScorePrecision::parse(&raw) {
                Some(precision) => settings.precision = precision,
                None => log::warn!("Ignoring unknown score precision {:?}", raw),
            }
        }

        if let Some(raw) = lookup(META_ARCHIVE) {
            match raw.trim() {
                "off" | "false" | "0" => settings.archive_epoch = None,
                "on" | "true" | "1" | "" => {}
                other => match other.parse::<YearMonth>() {
                    Ok(epoch) => settings.archive_epoch = Some(epoch),
                    Err(err) => log::warn!("Ignoring archive setting {:?}: {}", other, err),
                },
            }
        }

        settings
    }

    /// Read overrides from `<meta name="..." content="...">` tags.
    pub fn from_document() -> Self {
        let document = gloo_utils::document();
        Self::from_lookup(|name| {
            document
                .query_selector(&format!("meta[name=\"{}\"]", name))
                .ok()
                .flatten()
                .and_then(|meta| meta.get_attribute("content"))
        })
    }
}
