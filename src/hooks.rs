use leaderboard_viewer::config::DARK_MODE_QUERY;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, MediaQueryList};
use yew::prelude::*;

/// Listen for `event` on `target` for as long as the component is mounted.
///
/// The handler is captured on the first render only, so it must reach
/// mutable state through shared handles (`Rc<RefCell<_>>`, force-update
/// handles) rather than through values that change between renders.
#[hook]
pub fn use_event_listener<F>(target: Option<EventTarget>, event: &'static str, handler: F)
where
    F: Fn(Event) + 'static,
{
    use_effect_with((), move |_| {
        let closure = Closure::<dyn Fn(Event)>::new(handler);
        if let Some(target) = &target {
            if target
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
                .is_err()
            {
                log::warn!("Could not listen for {} events", event);
            }
        }
        move || {
            if let Some(target) = &target {
                let _ = target
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            }
            drop(closure);
        }
    });
}

/// The `(prefers-color-scheme: dark)` query, when the browser supports it.
pub fn dark_mode_query() -> Option<MediaQueryList> {
    gloo_utils::window().match_media(DARK_MODE_QUERY).ok().flatten()
}

pub fn prefers_dark() -> bool {
    dark_mode_query().map(|query| query.matches()).unwrap_or(false)
}
