//! The view controller: state, cache and fetch sequencing in one place.
//!
//! All methods are synchronous and run on the UI thread. A method that needs
//! data returns a [`FetchPlan`]; when the plan is a request, the caller runs
//! it with [`execute`] and re-renders if the completion was applied.

use crate::api::{request_url, LeaderboardClient};
use crate::cache::{cache_key, ResponseCache};
use crate::config::ViewerSettings;
use crate::period::{archive_months, ArchiveEntry, Clock, Period, YearMonth};
use crate::route::ViewState;
use crate::sequencer::{FetchSequencer, FetchTicket};
use crate::view::ViewStatus;
use crate::{FetchError, GameMode, LeaderboardResponse};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// A network request the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// The view was rendered from cache; nothing to do.
    Cached,
    Request(PendingFetch),
}

/// Which button of the period toggle is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodChoice {
    AllTime,
    ThisMonth,
    Archive,
}

impl PeriodChoice {
    pub fn of(period: &Period) -> Self {
        match period {
            Period::AllTime => PeriodChoice::AllTime,
            Period::Current => PeriodChoice::ThisMonth,
            Period::Month(_) => PeriodChoice::Archive,
        }
    }
}

pub struct ViewController {
    settings: ViewerSettings,
    clock: Box<dyn Clock>,
    state: ViewState,
    cache: ResponseCache,
    sequencer: FetchSequencer,
    status: ViewStatus,
    archive: Vec<ArchiveEntry>,
    archive_open: bool,
}

impl ViewController {
    pub fn new(settings: ViewerSettings, clock: Box<dyn Clock>) -> Self {
        let archive = match settings.archive_epoch {
            Some(epoch) => archive_months(epoch, clock.current_month()),
            None => Vec::new(),
        };
        Self {
            settings,
            clock,
            state: ViewState::default(),
            cache: ResponseCache::new(),
            sequencer: FetchSequencer::new(),
            status: ViewStatus::Loading,
            archive,
            archive_open: false,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// Fragment for the current state, without `#`.
    pub fn fragment(&self) -> String {
        self.state.to_fragment()
    }

    /// The canonical fragment when `fragment` decoded to a different one,
    /// e.g. after an unknown mode or period fell back to a default. An empty
    /// fragment is left alone.
    pub fn rewritten_fragment(&self, fragment: &str) -> Option<String> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let canonical = self.fragment();
        (!fragment.is_empty() && fragment != canonical).then_some(canonical)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn archive_enabled(&self) -> bool {
        self.settings.archive_epoch.is_some()
    }

    pub fn archive_entries(&self) -> &[ArchiveEntry] {
        &self.archive
    }

    pub fn archive_open(&self) -> bool {
        self.archive_open
    }

    pub fn period_choice(&self) -> PeriodChoice {
        PeriodChoice::of(&self.state.period)
    }

    /// `Archive`, or the selected month's label while one is active.
    pub fn archive_label(&self) -> String {
        match self.state.period {
            Period::Month(month) => month.label(),
            _ => "Archive".to_string(),
        }
    }

    pub fn resolved_month(&self) -> Option<YearMonth> {
        self.state.period.resolve(self.clock.as_ref())
    }

    /// Adopt the state encoded in a URL fragment and load it.
    pub fn navigate(&mut self, fragment: &str) -> FetchPlan {
        self.state = ViewState::from_fragment(fragment);
        self.archive_open = false;
        debug!("Navigated to #{}", self.state.to_fragment());
        self.refresh()
    }

    /// `None` when `game_mode` is already showing.
    pub fn select_mode(&mut self, game_mode: GameMode) -> Option<FetchPlan> {
        if game_mode == self.state.game_mode {
            return None;
        }
        self.archive_open = false;
        self.state.game_mode = game_mode;
        Some(self.refresh())
    }

    /// Closes the archive list. `None` when re-selecting the active
    /// all-time/this-month choice; archive months always reload.
    pub fn select_period(&mut self, period: Period) -> Option<FetchPlan> {
        self.archive_open = false;
        if period == self.state.period && !matches!(period, Period::Month(_)) {
            return None;
        }
        self.state.period = period;
        Some(self.refresh())
    }

    pub fn toggle_archive(&mut self) -> bool {
        self.archive_open = !self.archive_open;
        self.archive_open
    }

    /// Returns whether anything changed.
    pub fn close_archive(&mut self) -> bool {
        std::mem::replace(&mut self.archive_open, false)
    }

    /// Show the current state, from cache when possible.
    ///
    /// Every call supersedes whatever is in flight, cache hits included, so a
    /// slow response for an older view can never replace this one.
    pub fn refresh(&mut self) -> FetchPlan {
        let month = self.resolved_month();
        let key = cache_key(self.state.game_mode, month);

        if let Some(cached) = self.cache.get(&key) {
            self.sequencer.supersede();
            debug!("Serving {} from cache", key);
            self.status = ViewStatus::from_response(&cached, self.settings.precision);
            return FetchPlan::Cached;
        }

        self.status = ViewStatus::Loading;
        let url = request_url(&self.settings.endpoint, self.state.game_mode, month);
        let ticket = self.sequencer.begin(key);
        info!("Fetching {} (generation {})", url, ticket.generation());
        FetchPlan::Request(PendingFetch { ticket, url })
    }

    /// Apply a finished request. Returns `false` when the ticket was
    /// superseded and the result discarded.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<LeaderboardResponse, FetchError>,
    ) -> bool {
        if !self.sequencer.is_current(&ticket) {
            debug!(
                "Dropping stale response for {} (generation {} < {})",
                ticket.key(),
                ticket.generation(),
                self.sequencer.generation()
            );
            return false;
        }

        match result {
            Ok(response) => {
                let response = Rc::new(response);
                let key = ticket.into_key();
                info!("Loaded {} scores for {}", response.scores.len(), key);
                self.cache.insert(key, response.clone());
                self.status = ViewStatus::from_response(&response, self.settings.precision);
            }
            Err(err) => {
                warn!("Leaderboard request for {} failed: {}", ticket.key(), err);
                self.status = ViewStatus::Failed(err.kind());
            }
        }
        true
    }
}

/// Perform `pending` with `client` and hand the result to the controller.
/// The controller is not borrowed while the request is in flight.
pub async fn execute(
    controller: Rc<RefCell<ViewController>>,
    client: Rc<dyn LeaderboardClient>,
    pending: PendingFetch,
) -> bool {
    let PendingFetch { ticket, url } = pending;
    let result = client.fetch(&url).await;
    controller.borrow_mut().complete(ticket, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::FixedClock;
    use crate::view::RowView;
    use crate::{FailureKind, Player, ScoreRow};
    use futures::channel::oneshot;
    use futures::executor::{LocalPool, LocalSpawner};
    use futures::future::LocalBoxFuture;
    use futures::task::LocalSpawnExt;
    use std::cell::Cell;

    type Reply = Result<LeaderboardResponse, FetchError>;

    /// Client whose requests stay pending until the test answers them.
    #[derive(Clone, Default)]
    struct ScriptedClient {
        requests: Rc<RefCell<Vec<(String, Option<oneshot::Sender<Reply>>)>>>,
    }

    impl ScriptedClient {
        fn urls(&self) -> Vec<String> {
            self.requests.borrow().iter().map(|(url, _)| url.clone()).collect()
        }

        fn answer(&self, index: usize, reply: Reply) {
            let sender = self.requests.borrow_mut()[index].1.take().unwrap();
            sender.send(reply).unwrap();
        }
    }

    impl LeaderboardClient for ScriptedClient {
        fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Reply> {
            let (tx, rx) = oneshot::channel();
            self.requests.borrow_mut().push((url.to_string(), Some(tx)));
            Box::pin(async move {
                rx.await
                    .unwrap_or_else(|_| Err(FetchError::Transport("dropped".into())))
            })
        }
    }

    struct Harness {
        pool: LocalPool,
        spawner: LocalSpawner,
        controller: Rc<RefCell<ViewController>>,
        client: ScriptedClient,
    }

    impl Harness {
        fn new() -> Self {
            let pool = LocalPool::new();
            let spawner = pool.spawner();
            let controller = ViewController::new(
                ViewerSettings::default(),
                Box::new(FixedClock(YearMonth::new_unchecked(2026, 3))),
            );
            Self {
                pool,
                spawner,
                controller: Rc::new(RefCell::new(controller)),
                client: ScriptedClient::default(),
            }
        }

        /// Spawn the request behind `plan`; the cell fills with whether the
        /// completion was applied.
        fn run(&mut self, plan: FetchPlan) -> Rc<Cell<Option<bool>>> {
            let applied = Rc::new(Cell::new(None));
            if let FetchPlan::Request(pending) = plan {
                let controller = self.controller.clone();
                let client: Rc<dyn LeaderboardClient> = Rc::new(self.client.clone());
                let slot = applied.clone();
                self.spawner
                    .spawn_local(async move {
                        slot.set(Some(execute(controller, client, pending).await));
                    })
                    .unwrap();
                self.pool.run_until_stalled();
            }
            applied
        }

        fn answer(&mut self, index: usize, reply: Reply) {
            self.client.answer(index, reply);
            self.pool.run_until_stalled();
        }

        fn names(&self) -> Vec<String> {
            match self.controller.borrow().status() {
                ViewStatus::Table(rows) => {
                    rows.iter().map(|r: &RowView| r.player_name.clone()).collect()
                }
                other => panic!("expected table, got {:?}", other),
            }
        }
    }

    fn board(names: &[&str]) -> LeaderboardResponse {
        let scores = names
            .iter()
            .enumerate()
            .map(|(i, name)| ScoreRow {
                rank: i as u32 + 1,
                player: Player {
                    display_name: name.to_string(),
                    openplanet_id: format!("id-{}", i),
                },
                maps_completed: 10,
                maps_skipped: 1,
                score: 90_000 + i as u64,
                created_at: "2026-02-10T12:00:00Z".parse().unwrap(),
            })
            .collect();
        LeaderboardResponse { scores, ..Default::default() }
    }

    #[test]
    fn first_load_requests_then_renders() {
        let mut h = Harness::new();
        let plan = h.controller.borrow_mut().navigate("#author");
        assert_eq!(*h.controller.borrow().status(), ViewStatus::Loading);

        let applied = h.run(plan);
        assert_eq!(h.client.urls(), ["api/leaderboard?game_mode=author"]);

        h.answer(0, Ok(board(&["alice", "bob"])));
        assert_eq!(applied.get(), Some(true));
        assert_eq!(h.names(), ["alice", "bob"]);
        assert_eq!(h.controller.borrow().cached_entries(), 1);
    }

    #[test]
    fn cache_hit_skips_the_network() {
        let mut h = Harness::new();
        let plan = h.controller.borrow_mut().navigate("author");
        h.run(plan);
        h.answer(0, Ok(board(&["alice"])));

        let plan = h.controller.borrow_mut().select_mode(GameMode::Gold).unwrap();
        h.run(plan);
        h.answer(1, Ok(board(&["goldie"])));

        let plan = h.controller.borrow_mut().select_mode(GameMode::Author).unwrap();
        assert_eq!(plan, FetchPlan::Cached);
        assert_eq!(h.client.urls().len(), 2);
        assert_eq!(h.names(), ["alice"]);
    }

    #[test]
    fn later_request_wins_when_earlier_finishes_last() {
        let mut h = Harness::new();
        let plan = h.controller.borrow_mut().navigate("author");
        let first = h.run(plan);
        let plan = h.controller.borrow_mut().select_mode(GameMode::Gold).unwrap();
        let second = h.run(plan);

        h.answer(1, Ok(board(&["goldie"])));
        h.answer(0, Ok(board(&["alice"])));

        assert_eq!(second.get(), Some(true));
        assert_eq!(first.get(), Some(false));
        assert_eq!(h.names(), ["goldie"]);
        assert_eq!(h.controller.borrow().cached_entries(), 1);
    }

    #[test]
    fn later_request_wins_when_earlier_finishes_first() {
        let mut h = Harness::new();
        let plan = h.controller.borrow_mut().navigate("author");
        let first = h.run(plan);
        let plan = h.controller.borrow_mut().select_mode(GameMode::Gold).unwrap();
        h.run(plan);

        h.answer(0, Ok(board(&["alice"])));
        assert_eq!(first.get(), Some(false));
        assert_eq!(*h.controller.borrow().status(), ViewStatus::Loading);

        h.answer(1, Ok(board(&["goldie"])));
        assert_eq!(h.names(), ["goldie"]);
    }

    #[test]
    fn cache_hit_supersedes_in_flight_request() {
        let mut h = Harness::new();
        let plan = h.controller.borrow_mut().navigate("gold");
        h.run(plan);
        h.answer(0, Ok(board(&["goldie"])));

        let plan = h.controller.borrow_mut().select_mode(GameMode::Author).unwrap();
        let stale = h.run(plan);
        let plan = h.controller.borrow_mut().select_mode(GameMode::Gold).unwrap();
        assert_eq!(plan, FetchPlan::Cached);

        h.answer(1, Ok(board(&["alice"])));
        assert_eq!(stale.get(), Some(false));
        assert_eq!(h.names(), ["goldie"]);
        assert_eq!(h.controller.borrow().cached_entries(), 1);
    }

    #[test]
    fn failures_map_to_two_panels() {
        let mut h = Harness::new();
        let plan = h.controller.borrow_mut().navigate("author");
        h.run(plan);
        h.answer(0, Err(FetchError::Status(503)));
        assert_eq!(
            *h.controller.borrow().status(),
            ViewStatus::Failed(FailureKind::Request)
        );

        let plan = h.controller.borrow_mut().select_mode(GameMode::Gold).unwrap();
        h.run(plan);
        h.answer(1, Err(FetchError::Decode("expected struct".into())));
        assert_eq!(
            *h.controller.borrow().status(),
            ViewStatus::Failed(FailureKind::Response)
        );
        assert_eq!(h.controller.borrow().cached_entries(), 0);
    }

    #[test]
    fn stale_failure_is_never_shown() {
        let mut h = Harness::new();
        let plan = h.controller.borrow_mut().navigate("author");
        h.run(plan);
        let plan = h.controller.borrow_mut().navigate("gold");
        h.run(plan);

        h.answer(1, Ok(board(&["goldie"])));
        h.answer(0, Err(FetchError::Transport("offline".into())));
        assert_eq!(h.names(), ["goldie"]);
    }

    #[test]
    fn failed_key_is_refetched_on_return() {
        let mut h = Harness::new();
        let plan = h.controller.borrow_mut().navigate("author");
        h.run(plan);
        h.answer(0, Err(FetchError::Status(500)));

        let plan = h.controller.borrow_mut().refresh();
        assert!(matches!(plan, FetchPlan::Request(_)));
        h.run(plan);
        h.answer(1, Ok(board(&[])));
        assert_eq!(*h.controller.borrow().status(), ViewStatus::Empty);
    }

    #[test]
    fn current_period_resolves_to_the_clock_month() {
        let h = Harness::new();
        h.controller.borrow_mut().navigate("gold");
        let plan = h.controller.borrow_mut().select_period(Period::Current).unwrap();
        let FetchPlan::Request(pending) = plan else {
            panic!("expected a request");
        };
        assert_eq!(pending.url, "api/leaderboard?game_mode=gold&month=2026-03");
        assert_eq!(pending.ticket.key(), "gold:2026-03");
        assert_eq!(h.controller.borrow().fragment(), "gold/current");
    }

    #[test]
    fn reselecting_active_choices_is_a_no_op() {
        let h = Harness::new();
        h.controller.borrow_mut().navigate("author");
        let mut controller = h.controller.borrow_mut();
        assert!(controller.select_mode(GameMode::Author).is_none());

        controller.toggle_archive();
        assert!(controller.select_period(Period::AllTime).is_none());
        assert!(!controller.archive_open());
    }

    #[test]
    fn archive_selection_closes_the_list_and_relabels() {
        let h = Harness::new();
        let mut controller = h.controller.borrow_mut();
        controller.navigate("author");

        let months: Vec<String> = controller
            .archive_entries()
            .iter()
            .map(|entry| entry.month.to_string())
            .collect();
        assert_eq!(months, ["2026-02", "2026-01", "2025-12"]);
        assert_eq!(controller.archive_label(), "Archive");

        assert!(controller.toggle_archive());
        let january = controller.archive_entries()[1].month;
        assert!(controller.select_period(Period::Month(january)).is_some());
        assert!(!controller.archive_open());
        assert_eq!(controller.period_choice(), PeriodChoice::Archive);
        assert_eq!(controller.archive_label(), "Jan 2026");
        assert_eq!(controller.fragment(), "author/2026-01");
        assert_eq!(controller.resolved_month(), Some(january));
    }

    #[test]
    fn navigation_closes_archive_and_decodes_fragment() {
        let h = Harness::new();
        let mut controller = h.controller.borrow_mut();
        controller.toggle_archive();
        controller.navigate("#gold/2025-12");
        assert!(!controller.archive_open());
        assert_eq!(controller.state().game_mode, GameMode::Gold);
        assert_eq!(controller.period_choice(), PeriodChoice::Archive);
        assert!(!controller.close_archive());
    }

    #[test]
    fn unknown_fragment_parts_are_rewritten() {
        let h = Harness::new();
        let mut controller = h.controller.borrow_mut();

        controller.navigate("#gold/garbage");
        assert_eq!(controller.period_choice(), PeriodChoice::AllTime);
        assert_eq!(controller.rewritten_fragment("#gold/garbage").as_deref(), Some("gold"));

        controller.navigate("#silver/current");
        assert_eq!(
            controller.rewritten_fragment("#silver/current").as_deref(),
            Some("author/current")
        );

        controller.navigate("#gold/2025-12");
        assert_eq!(controller.rewritten_fragment("#gold/2025-12"), None);

        controller.navigate("");
        assert_eq!(controller.rewritten_fragment(""), None);
    }

    #[test]
    fn archive_can_be_disabled() {
        let settings = ViewerSettings { archive_epoch: None, ..Default::default() };
        let controller = ViewController::new(
            settings,
            Box::new(FixedClock(YearMonth::new_unchecked(2026, 3))),
        );
        assert!(!controller.archive_enabled());
        assert!(controller.archive_entries().is_empty());
    }
}
