//! Ambient request correlation
//!
//! The active [`RequestId`] lives in task-local storage, so it follows the
//! logical request across `.await` points without being threaded through
//! every call. Scopes nest; leaving a scope restores whatever was active
//! before it, on every exit path.
//!
//! `tokio::spawn` starts a fresh task with no context. Wrap the spawned
//! future in [`in_current_scope`] to carry the id along.

use std::future::Future;

use shopchat_core_types::RequestId;

tokio::task_local! {
    static CURRENT_REQUEST_ID: RequestId;
}

/// The id of the request currently executing, if any.
pub fn current_request_id() -> Option<RequestId> {
    CURRENT_REQUEST_ID.try_with(Clone::clone).ok()
}

/// Run `fut` with `id` as the current request id.
pub async fn with_request_id<F>(id: RequestId, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_REQUEST_ID.scope(id, fut).await
}

/// Run the closure `f` with `id` as the current request id.
pub fn with_request_id_sync<F, R>(id: RequestId, f: F) -> R
where
    F: FnOnce() -> R,
{
    CURRENT_REQUEST_ID.sync_scope(id, f)
}

/// Bind `fut` to the id active at the call site, for handing to `tokio::spawn`.
pub fn in_current_scope<F>(fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let id = current_request_id();
    async move {
        match id {
            Some(id) => CURRENT_REQUEST_ID.scope(id, fut).await,
            None => fut.await,
        }
    }
}
