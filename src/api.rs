//! HTTP access to the leaderboard endpoint.

use crate::config::{GAME_MODE_PARAM, MONTH_PARAM};
use crate::period::YearMonth;
use crate::{FetchError, GameMode, LeaderboardResponse};
use futures::future::LocalBoxFuture;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Anything that can turn a request URL into a decoded leaderboard.
pub trait LeaderboardClient {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<LeaderboardResponse, FetchError>>;
}

/// `endpoint?game_mode=...[&month=YYYY-MM]`; no month means all time.
pub fn request_url(endpoint: &str, game_mode: GameMode, month: Option<YearMonth>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair(GAME_MODE_PARAM, game_mode.as_str());
    if let Some(month) = month {
        query.append_pair(MONTH_PARAM, &month.to_string());
    }
    format!("{}?{}", endpoint, query.finish())
}

/// `window.fetch` backed client.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClient;

impl LeaderboardClient for BrowserClient {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<LeaderboardResponse, FetchError>> {
        let url = url.to_string();
        Box::pin(async move { fetch_leaderboard(&url).await })
    }
}

async fn fetch_leaderboard(url: &str) -> Result<LeaderboardResponse, FetchError> {
    let response = JsFuture::from(gloo_utils::window().fetch_with_str(url))
        .await
        .map_err(|err| FetchError::Transport(js_error_message(err, "Request failed")))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|err| FetchError::Transport(js_error_message(err, "Not a Response")))?;
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let body = response
        .json()
        .map_err(|err| FetchError::Decode(js_error_message(err, "Body unavailable")))?;
    let value = JsFuture::from(body)
        .await
        .map_err(|err| FetchError::Decode(js_error_message(err, "Invalid JSON")))?;
    serde_wasm_bindgen::from_value(value).map_err(|err| FetchError::Decode(err.to_string()))
}

/// Best-effort message out of a thrown JS value.
pub fn js_error_message(err: JsValue, fallback: &str) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Ok(error) = err.dyn_into::<js_sys::Error>() {
        return error.message().into();
    }
    fallback.to_string()
}
