use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::middleware::from_fn;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use shopchat_core::logging_facility::{self, EventScope, EventType};
use shopchat_core::{AppConfig, ShopchatError};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::outbound::CorrelatedClient;
use crate::render::{render_with_timeout, EmbedShell, ShellRenderer};
use crate::request_id::request_id_middleware;

/// Upper bound for the upstream reachability check
const UPSTREAM_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<dyn ShellRenderer>,
    pub render_timeout: Duration,
    /// Client for platform API calls made while serving a request
    pub http: CorrelatedClient,
    /// Platform endpoint polled by `/healthz/upstream`
    pub upstream_status_url: Option<String>,
}

impl AppState {
    pub fn new(renderer: Arc<dyn ShellRenderer>, render_timeout: Duration) -> Self {
        Self {
            renderer,
            render_timeout,
            http: CorrelatedClient::default(),
            upstream_status_url: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let state = Self::new(
            Arc::new(EmbedShell::new(config.api_key.clone())),
            config.ssr_timeout,
        );
        match &config.upstream_status_url {
            Some(url) => state.with_upstream_status_url(url.clone()),
            None => state,
        }
    }

    pub fn with_upstream_status_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_status_url = Some(url.into());
        self
    }

    pub fn with_http_client(mut self, http: CorrelatedClient) -> Self {
        self.http = http;
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct ShellParams {
    pub shop: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/healthz/upstream", get(upstream_health))
        .route("/app", get(app_shell))
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn upstream_health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let Some(url) = state.upstream_status_url.as_deref() else {
        return Ok(Json(json!({"status": "skipped"})));
    };

    let result = state
        .http
        .get(url)
        .timeout(UPSTREAM_CHECK_TIMEOUT)
        .send()
        .await
        .map_err(|e| ShopchatError::ExternalService(e.to_string()))
        .and_then(|response| {
            let status = response.status();
            if status.is_success() {
                Ok(status.as_u16())
            } else {
                Err(ShopchatError::ExternalService(format!(
                    "upstream answered {status}"
                )))
            }
        });

    match result {
        Ok(status) => Ok(Json(json!({"status": "ok", "upstreamStatus": status}))),
        Err(err) => {
            logging_facility::warn(
                "upstream status check failed",
                &json!({"errorName": err.code(), "errorMessage": err.to_string()}),
            );
            Err(err.into())
        }
    }
}

async fn app_shell(
    State(state): State<AppState>,
    Query(params): Query<ShellParams>,
) -> Result<Html<String>, AppError> {
    let mut scope = EventScope::new(EventType::Render, "embedded app shell rendered");
    if let Some(shop) = &params.shop {
        scope = scope.with_shop_domain(shop.clone());
    }

    let html = logging_facility::with_event_logging(scope, || {
        render_with_timeout(
            state.render_timeout,
            state.renderer.render(params.shop.as_deref()),
        )
    })
    .await?;

    Ok(Html(html))
}
