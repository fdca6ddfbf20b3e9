//! Response generation under a wall-clock budget

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use shopchat_core::{current_request_id, Result, ShopchatError};
use shopchat_core_types::correlation::FALLBACK_REQUEST_ID;

/// Produces the embedded app shell for a shop
#[async_trait]
pub trait ShellRenderer: Send + Sync {
    async fn render(&self, shop: Option<&str>) -> Result<String>;
}

/// Minimal embed shell: loads the platform's app bridge with the public API key.
#[derive(Debug, Clone)]
pub struct EmbedShell {
    api_key: String,
}

impl EmbedShell {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ShellRenderer for EmbedShell {
    async fn render(&self, shop: Option<&str>) -> Result<String> {
        let shop = shop.map(escape_html).unwrap_or_default();
        Ok(format!(
            "<!doctype html>\n<html>\n<head>\n\
             <meta name=\"shopify-api-key\" content=\"{}\">\n\
             <script src=\"https://cdn.shopify.com/shopifycloud/app-bridge.js\"></script>\n\
             </head>\n<body>\n<div id=\"app\" data-shop=\"{}\"></div>\n</body>\n</html>\n",
            escape_html(&self.api_key),
            shop
        ))
    }
}

/// Run `render`, failing with [`ShopchatError::Timeout`] once `timeout` elapses.
///
/// The render future is dropped on timeout.
pub async fn render_with_timeout<F, T>(timeout: Duration, render: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, render).await {
        Ok(result) => result,
        Err(_) => Err(ShopchatError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

/// The 503 page served when rendering did not finish in time.
pub fn fallback_response() -> Response {
    let id = current_request_id();
    let id = id.as_ref().map_or(FALLBACK_REQUEST_ID, |id| id.as_str());
    let body = format!(
        "<!doctype html>\n<html>\n<body>\n\
         <h1>Service temporarily unavailable</h1>\n\
         <p>Please retry in a moment. Reference: {}</p>\n\
         </body>\n</html>\n",
        escape_html(id)
    );
    (StatusCode::SERVICE_UNAVAILABLE, Html(body)).into_response()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
