//! URL fragment encoding of the view state: `#mode[/period]`.

use crate::period::Period;
use crate::GameMode;

/// What the viewer is currently showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViewState {
    pub game_mode: GameMode,
    pub period: Period,
}

impl ViewState {
    pub fn new(game_mode: GameMode, period: Period) -> Self {
        Self { game_mode, period }
    }

    /// Fragment without the leading `#`.
    pub fn to_fragment(&self) -> String {
        match self.period.segment() {
            Some(segment) => format!("{}/{}", self.game_mode, segment),
            None => self.game_mode.to_string(),
        }
    }

    /// Decode a fragment (with or without its `#`). Unknown modes fall back
    /// to author; a missing period means all time.
    pub fn from_fragment(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.is_empty() {
            return Self::default();
        }

        let mut segments = fragment.split('/');
        let game_mode = segments
            .next()
            .and_then(GameMode::parse)
            .unwrap_or_default();
        let period = Period::from_segment(segments.next().unwrap_or(""));

        Self { game_mode, period }
    }
}
