//! Request id carried from an incoming request to the calls it makes

use std::future::Future;

/// Header carrying the request id, inbound and outbound
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Run `fut` with `request_id` as the current request id.
pub async fn with_request_id<F: Future>(request_id: String, fut: F) -> F::Output {
    REQUEST_ID.scope(request_id, fut).await
}

/// Id of the request being served, if the caller runs inside one.
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}
