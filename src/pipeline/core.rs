use std::sync::Arc;
use std::time::{Duration, Instant};

use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::middleware::Middleware;

/// Maximum inline headers before heap allocation.
/// Most requests have ≤16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path.
///
/// Header names use `Arc<str>` instead of `String` because names repeat
/// across requests (Origin, Content-Type, ...) and `Arc::clone()` is an O(1)
/// atomic increment. Values stay `String` since they are per-request data.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// An inbound HTTP request as seen by the filter chain.
///
/// Carries only what policy evaluation and handler dispatch need: method,
/// path, headers, and an optional JSON body. The embedding server translates
/// its native request type into this before invoking [`Pipeline::handle`].
#[derive(Debug, Clone)]
pub struct FilterRequest {
    /// HTTP method (GET, POST, OPTIONS, ...)
    pub method: Method,
    /// Request path
    pub path: String,
    /// HTTP headers (stack-allocated for ≤16 headers)
    pub headers: HeaderVec,
    /// Request body parsed as JSON (if present)
    pub body: Option<Value>,
}

impl FilterRequest {
    /// Create a request from its parts.
    #[must_use]
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: HeaderVec,
        body: Option<Value>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
        }
    }

    /// Get a header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The response flowing back out through the filter chain.
#[derive(Debug, Clone, Serialize)]
pub struct FilterResponse {
    /// HTTP status code (200, 204, 404, ...)
    pub status: u16,
    /// HTTP response headers (stack-allocated for ≤16 headers)
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Value,
}

impl FilterResponse {
    /// Create a response with the given status, headers, and body.
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a `content-type` header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create an empty `204 No Content` response.
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(204, HeaderVec::new(), Value::Null)
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header (case-insensitive on the name).
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// The downstream application handler a [`Pipeline`] wraps.
pub type Handler = Box<dyn Fn(&FilterRequest) -> FilterResponse + Send + Sync>;

/// Explicit middleware chain around a single handler.
///
/// Built once at startup and shared read-only across all concurrently
/// handled requests; `handle()` takes `&self` and mutates nothing.
pub struct Pipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
    handler: Handler,
}

impl Pipeline {
    /// Wrap a handler function with an (initially empty) middleware chain.
    pub fn wrap<F>(handler: F) -> Self
    where
        F: Fn(&FilterRequest) -> FilterResponse + Send + Sync + 'static,
    {
        Self {
            middlewares: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Append a middleware. Middleware run in registration order.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Run one request through the chain.
    ///
    /// All `before()` hooks run even after one of them produced an early
    /// response, so side-effect middleware (metrics, tracing) still observe
    /// every request; only the first early response wins.
    pub fn handle(&self, req: &FilterRequest) -> FilterResponse {
        debug!(
            method = %req.method,
            path = %req.path,
            middleware_count = self.middlewares.len(),
            "Middleware before execution"
        );

        let mut early_resp: Option<FilterResponse> = None;
        for (idx, mw) in self.middlewares.iter().enumerate() {
            if early_resp.is_none() {
                early_resp = mw.before(req);
                if early_resp.is_some() {
                    debug!(
                        middleware_idx = idx,
                        middleware_name = std::any::type_name_of_val(mw.as_ref()),
                        "Middleware returned early response"
                    );
                }
            } else {
                mw.before(req);
            }
        }

        let (mut resp, latency) = if let Some(r) = early_resp {
            (r, Duration::from_millis(0))
        } else {
            info!(
                method = %req.method,
                path = %req.path,
                "Request dispatched to handler"
            );
            let start = Instant::now();
            let r = (self.handler)(req);
            (r, start.elapsed())
        };

        debug!(
            response_status = resp.status,
            latency_ms = latency.as_millis() as u64,
            "Middleware after execution"
        );

        for mw in &self.middlewares {
            mw.after(req, &mut resp, latency);
        }

        resp
    }
}
