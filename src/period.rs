//! Time-period filters: month tokens, the clock that resolves "current",
//! and the archive month list.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static MONTH_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").unwrap());

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, written `YYYY-MM` on the wire and in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Caller guarantees `month` is in `1..=12`.
    pub const fn new_unchecked(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Human label such as `Jan 2026`.
    pub fn label(self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMonthError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for ParseMonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMonthError::InvalidFormat(raw) => {
                write!(f, "Invalid month {:?}, expected YYYY-MM", raw)
            }
            ParseMonthError::InvalidMonth(m) => {
                write!(f, "Invalid month number: {} (must be 1-12)", m)
            }
        }
    }
}

impl std::error::Error for ParseMonthError {}

impl FromStr for YearMonth {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = MONTH_TOKEN_REGEX
            .captures(s)
            .ok_or_else(|| ParseMonthError::InvalidFormat(s.to_string()))?;
        let year: i32 = captures[1]
            .parse()
            .map_err(|_| ParseMonthError::InvalidFormat(s.to_string()))?;
        let month: u32 = captures[2]
            .parse()
            .map_err(|_| ParseMonthError::InvalidFormat(s.to_string()))?;
        YearMonth::new(year, month).ok_or(ParseMonthError::InvalidMonth(month))
    }
}

/// Time window a leaderboard is filtered to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Period {
    #[default]
    AllTime,
    /// The month the clock reports at the moment of resolution.
    Current,
    Month(YearMonth),
}

pub const CURRENT_TOKEN: &str = "current";

impl Period {
    /// Parse a URL segment. Empty means all time; anything that is neither
    /// `current` nor a valid `YYYY-MM` also falls back to all time.
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "" => Period::AllTime,
            CURRENT_TOKEN => Period::Current,
            other => match other.parse::<YearMonth>() {
                Ok(month) => Period::Month(month),
                Err(err) => {
                    log::warn!("{}; showing all time", err);
                    Period::AllTime
                }
            },
        }
    }

    /// URL segment for this period, `None` for all time.
    pub fn segment(&self) -> Option<String> {
        match self {
            Period::AllTime => None,
            Period::Current => Some(CURRENT_TOKEN.to_string()),
            Period::Month(month) => Some(month.to_string()),
        }
    }

    /// Concrete month to query, `None` for all time.
    pub fn resolve(&self, clock: &dyn Clock) -> Option<YearMonth> {
        match self {
            Period::AllTime => None,
            Period::Current => Some(clock.current_month()),
            Period::Month(month) => Some(*month),
        }
    }
}

/// Source of "now", reduced to the one thing the viewer needs.
pub trait Clock {
    fn current_month(&self) -> YearMonth;
}

/// Reads the UTC month from the browser's `Date`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn current_month(&self) -> YearMonth {
        let now = js_sys::Date::new_0();
        // getUTCMonth is zero-based
        YearMonth::new_unchecked(now.get_utc_full_year() as i32, now.get_utc_month() + 1)
    }
}

/// A clock pinned to one month.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub YearMonth);

impl Clock for FixedClock {
    fn current_month(&self) -> YearMonth {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub month: YearMonth,
    pub label: String,
}

/// Past months from the one before `current` back to `epoch`, newest first.
pub fn archive_months(epoch: YearMonth, current: YearMonth) -> Vec<ArchiveEntry> {
    let mut entries = Vec::new();
    let mut month = current.prev();
    while month >= epoch {
        entries.push(ArchiveEntry { month, label: month.label() });
        month = month.prev();
    }
    entries
}
