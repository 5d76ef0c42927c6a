//! HTTP API Client
//!
//! gloo-net calls against the biofeedback API. Errors use the core
//! `ClientError` so the shared session handles them the same way the CLI does.

use biofeedback::{BiofeedbackEntry, ClientError, DateRange};
use gloo_net::http::{Request, Response};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const API_URL_KEY: &str = "biofeedback_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(API_URL_KEY, url);
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

fn transport(e: gloo_net::Error) -> ClientError {
    ClientError::Transport(e.to_string())
}

async fn check(response: Response) -> Result<Response, ClientError> {
    if response.ok() {
        Ok(response)
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        web_sys::console::warn_1(&format!("API returned {}: {}", status, text).into());
        Err(ClientError::from_status(status, text))
    }
}

/// `GET /biofeedback` for a date range
pub async fn fetch_entries(range: &DateRange) -> Result<Vec<BiofeedbackEntry>, ClientError> {
    let url = format!("{}/biofeedback", get_api_base());
    let pairs = range.query_pairs();

    let response = Request::get(&url)
        .query(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .send()
        .await
        .map_err(transport)?;

    let body = check(response)
        .await?
        .text()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// `POST /biofeedback` with the body as typed
pub async fn submit_entry(
    body: &serde_json::Value,
    token: Option<String>,
) -> Result<(), ClientError> {
    let url = format!("{}/biofeedback", get_api_base());

    let mut builder = Request::post(&url);
    if let Some(token) = token {
        builder = builder.header("Authorization", &format!("Bearer {}", token));
    }

    let response = builder
        .json(body)
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;

    check(response).await.map(|_| ())
}

/// `POST /token` with form credentials
pub async fn issue_token(username: &str, password: &str) -> Result<String, ClientError> {
    let url = format!("{}/token", get_api_base());
    let form = format!(
        "username={}&password={}",
        String::from(js_sys::encode_uri_component(username)),
        String::from(js_sys::encode_uri_component(password)),
    );

    let response = Request::post(&url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(form)
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;

    let token: TokenResponse = check(response)
        .await?
        .json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))?;

    Ok(token.access_token)
}
