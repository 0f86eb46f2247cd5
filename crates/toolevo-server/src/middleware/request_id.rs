//! Request ID middleware

use axum::{
    http::{HeaderValue, Request},
    response::Response,
};
use std::task::{Context, Poll};
use toolevo_core::with_request_id;
use tower::{Layer, Service};
use uuid::Uuid;

pub use toolevo_core::REQUEST_ID_HEADER;

/// Layer that adds request IDs
#[derive(Clone)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service that adds request IDs
#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        // Propagate a caller-supplied id, otherwise mint one.
        let header = match req.headers().get(REQUEST_ID_HEADER) {
            Some(existing) if !existing.is_empty() => existing.clone(),
            _ => {
                let minted = HeaderValue::from_str(&Uuid::new_v4().to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
                req.headers_mut().insert(REQUEST_ID_HEADER, minted.clone());
                minted
            }
        };

        // Store in extensions for handlers, and scope it for outbound service calls
        let request_id = header.to_str().unwrap_or("unknown").to_string();
        req.extensions_mut().insert(RequestId(request_id.clone()));

        let inner_clone = self.inner.clone();
        // Drive the service that was polled ready, keep the clone for next time.
        let mut inner = std::mem::replace(&mut self.inner, inner_clone);
        Box::pin(async move {
            let mut response = with_request_id(request_id, inner.call(req)).await?;
            response.headers_mut().insert(REQUEST_ID_HEADER, header);
            Ok(response)
        })
    }
}

/// Request ID extractor
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
