//! View model for the leaderboard panel.
//!
//! The controller turns a payload into a [`ViewStatus`]; the Yew layer only
//! decides which panel to show and drops [`rows_markup`] into the table body.

use crate::config::{PROFILE_BASE_URL, STATS_CUTOFF};
use crate::{
    escape_html, format_date, format_score, FailureKind, LeaderboardResponse, ScorePrecision,
    ScoreRow,
};
use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::rc::Rc;

/// Display-ready strings for one table row. Values are raw text; escaping
/// happens once, in [`RowView::to_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub rank: String,
    pub player_name: String,
    pub profile_url: String,
    /// Empty for runs that predate stat collection.
    pub maps_completed: String,
    pub maps_skipped: String,
    pub score: String,
    pub date: String,
}

impl RowView {
    pub fn from_score(row: &ScoreRow, precision: ScorePrecision) -> Self {
        let (maps_completed, maps_skipped) = if has_stats(row) {
            (row.maps_completed.to_string(), row.maps_skipped.to_string())
        } else {
            (String::new(), String::new())
        };

        Self {
            rank: row.rank.to_string(),
            player_name: row.player.display_name.clone(),
            profile_url: profile_url(&row.player.openplanet_id),
            maps_completed,
            maps_skipped,
            score: format_score(row.score, precision),
            date: format_date(&row.created_at),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            concat!(
                "<tr>",
                "<td class=\"col-rank\">{}</td>",
                "<td class=\"col-player\">",
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                "</td>",
                "<td class=\"col-maps\">{}</td>",
                "<td class=\"col-skipped\">{}</td>",
                "<td class=\"col-score\">{}</td>",
                "<td class=\"col-date\">{}</td>",
                "</tr>"
            ),
            escape_html(&self.rank),
            escape_html(&self.profile_url),
            escape_html(&self.player_name),
            escape_html(&self.maps_completed),
            escape_html(&self.maps_skipped),
            escape_html(&self.score),
            escape_html(&self.date),
        )
    }
}

/// Stats columns only exist for runs recorded on or after the cutoff date.
pub fn has_stats(row: &ScoreRow) -> bool {
    let (year, month, day) = STATS_CUTOFF;
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(cutoff) => row.created_at.date_naive() >= cutoff,
        None => true,
    }
}

/// Characters `encodeURIComponent` leaves as they are.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// External profile link for an opaque player id.
pub fn profile_url(openplanet_id: &str) -> String {
    format!("{}{}", PROFILE_BASE_URL, utf8_percent_encode(openplanet_id, URI_COMPONENT))
}

/// Markup for a full table body; rows keep the order they arrived in.
pub fn rows_markup(rows: &[RowView]) -> String {
    rows.iter().map(RowView::to_html).collect()
}

/// Which panel the leaderboard area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Failed(FailureKind),
    Empty,
    Table(Rc<Vec<RowView>>),
}

impl ViewStatus {
    pub fn from_response(response: &LeaderboardResponse, precision: ScorePrecision) -> Self {
        if response.scores.is_empty() {
            return ViewStatus::Empty;
        }
        let rows = response
            .scores
            .iter()
            .map(|row| RowView::from_score(row, precision))
            .collect();
        ViewStatus::Table(Rc::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn row(name: &str, created_at: &str, completed: u32, skipped: u32) -> ScoreRow {
        ScoreRow {
            rank: 1,
            player: Player {
                display_name: name.to_string(),
                openplanet_id: "6a1b3c".to_string(),
            },
            maps_completed: completed,
            maps_skipped: skipped,
            score: 125_340,
            created_at: created_at.parse().unwrap(),
        }
    }

    #[test]
    fn rows_before_cutoff_hide_stats() {
        let view = RowView::from_score(
            &row("old", "2026-01-31T23:59:59Z", 12, 3),
            ScorePrecision::Centiseconds,
        );
        assert_eq!(view.maps_completed, "");
        assert_eq!(view.maps_skipped, "");
        assert_eq!(view.score, "2:05.34");
    }

    #[test]
    fn rows_on_cutoff_show_stats() {
        let view = RowView::from_score(
            &row("new", "2026-02-01T00:00:00Z", 12, 3),
            ScorePrecision::Milliseconds,
        );
        assert_eq!(view.maps_completed, "12");
        assert_eq!(view.maps_skipped, "3");
        assert_eq!(view.score, "2:05.340");
        assert_eq!(view.date, "Feb 1, 2026");
    }

    #[test]
    fn markup_escapes_player_names() {
        let view = RowView::from_score(
            &row("<script>alert(1)</script>", "2026-03-01T00:00:00Z", 1, 0),
            ScorePrecision::Centiseconds,
        );
        let html = view.to_html();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("href=\"https://trackmania.io/#/player/6a1b3c\""));
    }

    #[test]
    fn profile_ids_are_url_encoded() {
        assert_eq!(
            profile_url("a/b#c"),
            "https://trackmania.io/#/player/a%2Fb%23c"
        );
        assert_eq!(profile_url("a b+c"), "https://trackmania.io/#/player/a%20b%2Bc");
        assert_eq!(profile_url("x-y_z.(1)"), "https://trackmania.io/#/player/x-y_z.(1)");
    }

    #[test]
    fn empty_scores_render_the_empty_state() {
        let status = ViewStatus::from_response(
            &LeaderboardResponse::default(),
            ScorePrecision::Centiseconds,
        );
        assert_eq!(status, ViewStatus::Empty);
    }

    #[test]
    fn rows_keep_server_order() {
        let mut second = row("second", "2026-03-01T00:00:00Z", 1, 0);
        second.rank = 2;
        let response = LeaderboardResponse {
            scores: vec![second, row("first", "2026-03-01T00:00:00Z", 1, 0)],
            ..Default::default()
        };
        let status = ViewStatus::from_response(&response, ScorePrecision::Centiseconds);
        let ViewStatus::Table(rows) = status else {
            panic!("expected a table");
        };
        assert_eq!(rows[0].player_name, "second");
        assert_eq!(rows[1].player_name, "first");
        assert_eq!(rows_markup(&rows).matches("<tr>").count(), 2);
    }
}
