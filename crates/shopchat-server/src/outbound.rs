//! Outbound correlation
//!
//! Calls made through a [`CorrelatedClient`] carry the active request id as
//! `X-Request-Id` while propagation is installed. Installation is
//! process-wide and idempotent; [`PropagationHandle::disable`] turns it off
//! again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Client, IntoUrl, Method, Request, RequestBuilder, Response};
use serde::Serialize;
use shopchat_core::current_request_id;
use shopchat_core_types::correlation::REQUEST_ID_HEADER;

static INSTALLED: Lazy<Mutex<Option<PropagationHandle>>> = Lazy::new(|| Mutex::new(None));

/// Handle to the installed propagation
#[derive(Debug, Clone)]
pub struct PropagationHandle {
    active: Arc<AtomicBool>,
}

impl PropagationHandle {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// True if both handles refer to the same installation
    pub fn same_installation(&self, other: &PropagationHandle) -> bool {
        Arc::ptr_eq(&self.active, &other.active)
    }

    /// Stop stamping outbound requests. A later install starts a new installation.
    pub fn disable(&self) {
        self.active.store(false, Ordering::SeqCst);
        let mut slot = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|h| h.same_installation(self)) {
            *slot = None;
        }
    }
}

/// Turn on outbound propagation. Installing twice returns the same handle.
pub fn install_outbound_propagation() -> PropagationHandle {
    let mut slot = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(handle) = slot.as_ref().filter(|h| h.is_active()) {
        return handle.clone();
    }

    let handle = PropagationHandle {
        active: Arc::new(AtomicBool::new(true)),
    };
    *slot = Some(handle.clone());
    tracing::debug!("outbound request id propagation installed");
    handle
}

pub fn propagation_installed() -> bool {
    INSTALLED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(PropagationHandle::is_active)
}

/// Stamp the active request id onto `headers` unless the caller set one.
pub fn apply_correlation(headers: &mut HeaderMap) {
    if !propagation_installed() || headers.contains_key(REQUEST_ID_HEADER) {
        return;
    }
    let Some(id) = current_request_id() else {
        return;
    };
    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}

/// Shared HTTP client that forwards the request id
///
/// Every builder it hands out is a [`CorrelatedRequestBuilder`], so the id is
/// applied on `send` and `build` whichever way the call is written.
#[derive(Debug, Clone, Default)]
pub struct CorrelatedClient {
    inner: Client,
}

impl CorrelatedClient {
    pub fn new(inner: Client) -> Self {
        Self { inner }
    }

    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> CorrelatedRequestBuilder {
        CorrelatedRequestBuilder {
            client: self.inner.clone(),
            builder: self.inner.request(method, url),
        }
    }

    pub fn get<U: IntoUrl>(&self, url: U) -> CorrelatedRequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post<U: IntoUrl>(&self, url: U) -> CorrelatedRequestBuilder {
        self.request(Method::POST, url)
    }

    /// Send an already-built request, applying correlation first.
    pub async fn execute(&self, mut request: Request) -> reqwest::Result<Response> {
        apply_correlation(request.headers_mut());
        self.inner.execute(request).await
    }
}

/// Request builder that stamps the request id when the request is built
#[derive(Debug)]
#[must_use = "a request builder does nothing until it is sent"]
pub struct CorrelatedRequestBuilder {
    client: Client,
    builder: RequestBuilder,
}

impl CorrelatedRequestBuilder {
    pub fn header<K, V>(self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<axum::http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<axum::http::Error>,
    {
        self.map(|b| b.header(key, value))
    }

    pub fn query<T: Serialize + ?Sized>(self, query: &T) -> Self {
        self.map(|b| b.query(query))
    }

    pub fn json<T: Serialize + ?Sized>(self, json: &T) -> Self {
        self.map(|b| b.json(json))
    }

    pub fn body<T: Into<Body>>(self, body: T) -> Self {
        self.map(|b| b.body(body))
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        self.map(|b| b.timeout(timeout))
    }

    /// Build the request with correlation applied, without sending it.
    ///
    /// # Errors
    ///
    /// Fails if the URL or a header added earlier was invalid.
    pub fn build(self) -> reqwest::Result<Request> {
        let mut request = self.builder.build()?;
        apply_correlation(request.headers_mut());
        Ok(request)
    }

    /// # Errors
    ///
    /// Fails on a malformed request or a transport error.
    pub async fn send(self) -> reqwest::Result<Response> {
        let client = self.client.clone();
        let request = self.build()?;
        client.execute(request).await
    }

    fn map(self, f: impl FnOnce(RequestBuilder) -> RequestBuilder) -> Self {
        Self {
            client: self.client,
            builder: f(self.builder),
        }
    }
}
