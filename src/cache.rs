//! Session cache for leaderboard responses.
//!
//! Responses are stored under `"{game_mode}:{resolved_month}"`, with an empty
//! month for the all-time board (e.g. `author:` or `gold:2026-01`). Entries
//! never expire within a page session; the key space is two modes times the
//! archive months, so the map stays small.
//!
//! # Cache Value Structure
//! - `Rc<LeaderboardResponse>`: the last successful payload for the key,
//!   shared with the view model instead of cloned per render.

use crate::period::YearMonth;
use crate::{GameMode, LeaderboardResponse};
use std::collections::HashMap;
use std::rc::Rc;

/// Cache key: `game_mode:resolved_month`
pub type CacheKey = String;

pub fn cache_key(game_mode: GameMode, month: Option<YearMonth>) -> CacheKey {
    match month {
        Some(month) => format!("{}:{}", game_mode, month),
        None => format!("{}:", game_mode),
    }
}

#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<CacheKey, Rc<LeaderboardResponse>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Rc<LeaderboardResponse>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: CacheKey, response: Rc<LeaderboardResponse>) {
        self.entries.insert(key, response);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
