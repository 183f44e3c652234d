//! Leaderboard viewer front end using Yew.
//! Wires DOM events, the URL fragment and the theme toggle into the view
//! controller, and renders whatever view model it holds.

use leaderboard_viewer::api::{js_error_message, BrowserClient, LeaderboardClient};
use leaderboard_viewer::config::ViewerSettings;
use leaderboard_viewer::controller::{execute, FetchPlan, PeriodChoice, ViewController};
use leaderboard_viewer::period::{BrowserClock, Period, YearMonth};
use leaderboard_viewer::storage::LocalStore;
use leaderboard_viewer::theme::{DocumentTheme, ThemeController};
use leaderboard_viewer::{logger, GameMode};
use log::warn;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, Node};
use yew::prelude::*;

mod components;
mod hooks;

use components::{LeaderboardPanel, ModeToggle, PeriodToggle, ThemeToggle};

type SharedController = Rc<RefCell<ViewController>>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Navigate to the fragment currently in the address bar, rewriting it when
/// parts of it were not understood.
fn navigate(
    controller: &SharedController,
    client: &Rc<dyn LeaderboardClient>,
    redraw: &UseForceUpdateHandle,
) {
    let fragment = current_fragment();
    let plan = controller.borrow_mut().navigate(&fragment);
    if let Some(canonical) = controller.borrow().rewritten_fragment(&fragment) {
        write_fragment(&canonical);
    }
    dispatch(controller, client, plan, redraw);
}

/// Redraw for the new status, and for requests spawn the fetch and redraw
/// again if its result was applied.
fn dispatch(
    controller: &SharedController,
    client: &Rc<dyn LeaderboardClient>,
    plan: FetchPlan,
    redraw: &UseForceUpdateHandle,
) {
    redraw.force_update();
    if let FetchPlan::Request(pending) = plan {
        let controller = controller.clone();
        let client = client.clone();
        let redraw = redraw.clone();
        spawn_local(async move {
            if execute(controller, client, pending).await {
                redraw.force_update();
            }
        });
    }
}

fn current_fragment() -> String {
    gloo_utils::window().location().hash().unwrap_or_default()
}

/// Replace the fragment without adding a history entry or firing `hashchange`.
fn write_fragment(fragment: &str) {
    let url = format!("#{}", fragment);
    let result = gloo_utils::window()
        .history()
        .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&url)));
    if let Err(err) = result {
        warn!("Could not update URL: {}", js_error_message(err, "replaceState failed"));
    }
}

fn node_contains(node_ref: &NodeRef, target: Option<&Node>) -> bool {
    node_ref
        .get()
        .map(|node| node.contains(target))
        .unwrap_or(false)
}

// ──────────────────────────────────────────────────────────────────────────────

#[function_component]
pub fn App() -> Html {
    let redraw = use_force_update();
    let controller: SharedController = use_mut_ref(|| {
        ViewController::new(ViewerSettings::from_document(), Box::new(BrowserClock))
    });
    let theme =
        use_mut_ref(|| ThemeController::new(LocalStore, DocumentTheme, hooks::prefers_dark()));
    let client: Rc<dyn LeaderboardClient> = Rc::new(BrowserClient);
    let archive_button_ref = use_node_ref();
    let archive_list_ref = use_node_ref();

    // Load whatever the URL points at on mount
    {
        let controller = controller.clone();
        let client = client.clone();
        let redraw = redraw.clone();
        use_effect_with((), move |_| {
            navigate(&controller, &client, &redraw);
            || ()
        });
    }

    // Back/forward and hand-edited fragments
    {
        let controller = controller.clone();
        let client = client.clone();
        let redraw = redraw.clone();
        hooks::use_event_listener(
            Some(gloo_utils::window().into()),
            "hashchange",
            move |_: Event| navigate(&controller, &client, &redraw),
        );
    }

    // Clicks outside the archive list and its toggle close the list
    {
        let controller = controller.clone();
        let redraw = redraw.clone();
        let button_ref = archive_button_ref.clone();
        let list_ref = archive_list_ref.clone();
        hooks::use_event_listener(
            Some(gloo_utils::document().into()),
            "click",
            move |event: Event| {
                let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
                let inside = node_contains(&button_ref, target.as_ref())
                    || node_contains(&list_ref, target.as_ref());
                if !inside && controller.borrow_mut().close_archive() {
                    redraw.force_update();
                }
            },
        );
    }

    // OS theme changes matter only while the "system" setting is active
    {
        let theme = theme.clone();
        let redraw = redraw.clone();
        hooks::use_event_listener(
            hooks::dark_mode_query().map(Into::into),
            "change",
            move |_: Event| {
                if theme.borrow_mut().os_preference_changed(hooks::prefers_dark()) {
                    redraw.force_update();
                }
            },
        );
    }

    let on_mode = {
        let controller = controller.clone();
        let client = client.clone();
        let redraw = redraw.clone();
        Callback::from(move |game_mode: GameMode| {
            let plan = controller.borrow_mut().select_mode(game_mode);
            if let Some(plan) = plan {
                write_fragment(&controller.borrow().fragment());
                dispatch(&controller, &client, plan, &redraw);
            }
        })
    };

    let on_period = {
        let controller = controller.clone();
        let client = client.clone();
        let redraw = redraw.clone();
        Callback::from(move |choice: PeriodChoice| {
            let period = match choice {
                PeriodChoice::AllTime => Period::AllTime,
                PeriodChoice::ThisMonth => Period::Current,
                PeriodChoice::Archive => {
                    controller.borrow_mut().toggle_archive();
                    redraw.force_update();
                    return;
                }
            };
            let plan = controller.borrow_mut().select_period(period);
            match plan {
                Some(plan) => {
                    write_fragment(&controller.borrow().fragment());
                    dispatch(&controller, &client, plan, &redraw);
                }
                // still closes the archive list
                None => redraw.force_update(),
            }
        })
    };

    let on_archive_month = {
        let controller = controller.clone();
        let client = client.clone();
        let redraw = redraw.clone();
        Callback::from(move |month: YearMonth| {
            let plan = controller.borrow_mut().select_period(Period::Month(month));
            if let Some(plan) = plan {
                write_fragment(&controller.borrow().fragment());
                dispatch(&controller, &client, plan, &redraw);
            }
        })
    };

    let on_theme = {
        let theme = theme.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            theme.borrow_mut().cycle();
            redraw.force_update();
        })
    };

    let theme_setting = theme.borrow().setting();
    let view = controller.borrow();
    let state = view.state();

    html! {
        <div class="container">
            <header class="toolbar">
                <ModeToggle active={state.game_mode} onselect={on_mode} />
                <PeriodToggle
                    choice={view.period_choice()}
                    archive_enabled={view.archive_enabled()}
                    archive_label={view.archive_label()}
                    archive_open={view.archive_open()}
                    entries={Rc::new(view.archive_entries().to_vec())}
                    selected={view.resolved_month()}
                    onchoose={on_period}
                    onarchive={on_archive_month}
                    button_ref={archive_button_ref.clone()}
                    list_ref={archive_list_ref.clone()}
                />
                <ThemeToggle setting={theme_setting} onclick={on_theme} />
            </header>
            <LeaderboardPanel status={view.status().clone()} />
        </div>
    }
}

/// Entry point: installs the panic hook and logger, then mounts the app.
fn main() {
    console_error_panic_hook::set_once();
    logger::init(logger::default_level());
    yew::Renderer::<App>::new().render();
}
