//! Pure Yew view components for the leaderboard page.
//!
//! Components only render props and emit callbacks; all state changes go
//! through the view controller owned by `App`.

use leaderboard_viewer::controller::PeriodChoice;
use leaderboard_viewer::period::{ArchiveEntry, YearMonth};
use leaderboard_viewer::theme::ThemeSetting;
use leaderboard_viewer::view::{rows_markup, ViewStatus};
use leaderboard_viewer::GameMode;
use std::rc::Rc;
use web_sys::HtmlTableSectionElement;
use yew::prelude::*;

fn display(visible: bool, mode: &str) -> String {
    if visible {
        format!("display: {}", mode)
    } else {
        "display: none".to_string()
    }
}

#[derive(Properties, PartialEq)]
pub struct ModeToggleProps {
    pub active: GameMode,
    pub onselect: Callback<GameMode>,
}

#[function_component(ModeToggle)]
pub fn mode_toggle(props: &ModeToggleProps) -> Html {
    html! {
        <div id="game-mode-toggle" class="toggle-group">
            { for GameMode::ALL.iter().map(|&mode| {
                let onselect = props.onselect.clone();
                html! {
                    <button
                        class={classes!("toggle-btn", (mode == props.active).then_some("active"))}
                        data-value={mode.as_str()}
                        onclick={Callback::from(move |_: MouseEvent| onselect.emit(mode))}
                    >
                        { mode.label() }
                    </button>
                }
            }) }
        </div>
    }
}

/// All time / this month / archive selector with its month dropdown.
#[derive(Properties, PartialEq)]
pub struct PeriodToggleProps {
    pub choice: PeriodChoice,
    pub archive_enabled: bool,
    pub archive_label: String,
    pub archive_open: bool,
    pub entries: Rc<Vec<ArchiveEntry>>,
    /// Resolved month of the current view, highlighted in the dropdown.
    pub selected: Option<YearMonth>,
    pub onchoose: Callback<PeriodChoice>,
    pub onarchive: Callback<YearMonth>,
    pub button_ref: NodeRef,
    pub list_ref: NodeRef,
}

#[function_component(PeriodToggle)]
pub fn period_toggle(props: &PeriodToggleProps) -> Html {
    let choice_button = |choice: PeriodChoice, value: &'static str, label: &'static str| {
        let onchoose = props.onchoose.clone();
        html! {
            <button
                class={classes!("toggle-btn", (props.choice == choice).then_some("active"))}
                data-value={value}
                onclick={Callback::from(move |_: MouseEvent| onchoose.emit(choice))}
            >
                { label }
            </button>
        }
    };

    let archive_active = props.choice == PeriodChoice::Archive;
    let on_archive_toggle = {
        let onchoose = props.onchoose.clone();
        Callback::from(move |_: MouseEvent| onchoose.emit(PeriodChoice::Archive))
    };

    html! {
        <div id="period-toggle" class="toggle-group">
            { choice_button(PeriodChoice::AllTime, "all", "All time") }
            { choice_button(PeriodChoice::ThisMonth, "month", "This month") }
            if props.archive_enabled {
                <div class="archive-wrap">
                    <button
                        ref={props.button_ref.clone()}
                        id="archive-btn"
                        class={classes!(
                            "toggle-btn",
                            "archive-btn",
                            archive_active.then_some("active"),
                            props.archive_open.then_some("open")
                        )}
                        data-value="archive"
                        aria-expanded={props.archive_open.to_string()}
                        onclick={on_archive_toggle}
                    >
                        <span class="archive-label">{ props.archive_label.clone() }</span>
                        <span class="archive-chevron"></span>
                    </button>
                    <div
                        ref={props.list_ref.clone()}
                        id="archive-dropdown"
                        class={classes!("archive-dropdown", props.archive_open.then_some("open"))}
                    >
                        { for props.entries.iter().map(|entry| {
                            let month = entry.month;
                            let onarchive = props.onarchive.clone();
                            let selected = (props.selected == Some(month)).then_some("selected");
                            let onclick =
                                Callback::from(move |_: MouseEvent| onarchive.emit(month));
                            html! {
                                <button
                                    class={classes!(selected)}
                                    data-month={month.to_string()}
                                    {onclick}
                                >
                                    { entry.label.clone() }
                                </button>
                            }
                        }) }
                    </div>
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ThemeToggleProps {
    pub setting: ThemeSetting,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(ThemeToggle)]
pub fn theme_toggle(props: &ThemeToggleProps) -> Html {
    html! {
        <button
            id="theme-toggle"
            class="theme-toggle"
            title={props.setting.title()}
            onclick={props.onclick.clone()}
        >
            { for ThemeSetting::CYCLE.iter().map(|&setting| html! {
                <span
                    class={classes!("theme-icon", (setting == props.setting).then_some("active"))}
                    data-theme={setting.as_str()}
                ></span>
            }) }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct LeaderboardPanelProps {
    pub status: ViewStatus,
}

/// Loading, error, empty and table states. Rows are written into the table
/// body as escaped markup whenever it changes.
#[function_component(LeaderboardPanel)]
pub fn leaderboard_panel(props: &LeaderboardPanelProps) -> Html {
    let body_ref = use_node_ref();
    {
        let body_ref = body_ref.clone();
        let markup = match &props.status {
            ViewStatus::Table(rows) => rows_markup(rows),
            _ => String::new(),
        };
        // The tbody is declared childless below, so Yew never diffs its
        // children and the escaped rows written here stay untouched.
        use_effect_with(markup, move |markup| {
            if let Some(body) = body_ref.cast::<HtmlTableSectionElement>() {
                body.set_inner_html(markup);
            }
            || ()
        });
    }

    let (loading, error, empty, table) = match &props.status {
        ViewStatus::Loading => (true, None, false, false),
        ViewStatus::Failed(kind) => (false, Some(kind.message()), false, false),
        ViewStatus::Empty => (false, None, true, false),
        ViewStatus::Table(_) => (false, None, false, true),
    };

    html! {
        <div class="leaderboard-panel">
            <div id="loading" class="loading" style={display(loading, "flex")}>
                <span class="spinner"></span>
                { "Loading leaderboard..." }
            </div>
            <div id="error" class="error" style={display(error.is_some(), "block")}>
                { error.unwrap_or_default() }
            </div>
            <div id="empty-state" class="empty-state" style={display(empty, "flex")}>
                <p>{ "No scores for this period yet." }</p>
            </div>
            <table id="leaderboard" style={display(table, "table")}>
                <thead>
                    <tr>
                        <th class="col-rank">{ "#" }</th>
                        <th class="col-player">{ "Player" }</th>
                        <th class="col-maps">{ "Maps" }</th>
                        <th class="col-skipped">{ "Skipped" }</th>
                        <th class="col-score">{ "Score" }</th>
                        <th class="col-date">{ "Date" }</th>
                    </tr>
                </thead>
                <tbody id="leaderboard-body" ref={body_ref}></tbody>
            </table>
        </div>
    }
}
