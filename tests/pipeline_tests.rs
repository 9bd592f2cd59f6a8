use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use corsfilter::{FilterRequest, FilterResponse, HeaderVec, Middleware, Pipeline};
use http::Method;

fn get_request() -> FilterRequest {
    FilterRequest::new(Method::GET, "/api/x", HeaderVec::new(), None)
}

/// Records the order its hooks run in.
struct RecordingMiddleware {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Middleware for RecordingMiddleware {
    fn before(&self, _req: &FilterRequest) -> Option<FilterResponse> {
        self.log.lock().unwrap().push(format!("{}:before", self.name));
        None
    }

    fn after(&self, _req: &FilterRequest, _res: &mut FilterResponse, _latency: Duration) {
        self.log.lock().unwrap().push(format!("{}:after", self.name));
    }
}

/// Short-circuits every request with a fixed status.
struct ShortCircuitMiddleware {
    status: u16,
}

impl Middleware for ShortCircuitMiddleware {
    fn before(&self, _req: &FilterRequest) -> Option<FilterResponse> {
        Some(FilterResponse::new(
            self.status,
            HeaderVec::new(),
            serde_json::Value::Null,
        ))
    }
}

#[test]
fn test_handler_runs_when_no_middleware_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let pipeline = Pipeline::wrap(move |req| {
        seen.fetch_add(1, Ordering::SeqCst);
        FilterResponse::json(200, serde_json::json!({ "path": req.path }))
    });

    let resp = pipeline.handle(&get_request());
    assert_eq!(resp.status, 200);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(resp.get_header("content-type"), Some("application/json"));
}

#[test]
fn test_early_response_skips_handler_but_not_after_hooks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let mut pipeline = Pipeline::wrap(move |_req| {
        seen.fetch_add(1, Ordering::SeqCst);
        FilterResponse::json(200, serde_json::Value::Null)
    });

    let log = Arc::new(Mutex::new(Vec::new()));
    pipeline.add_middleware(Arc::new(ShortCircuitMiddleware { status: 204 }));
    pipeline.add_middleware(Arc::new(RecordingMiddleware {
        name: "rec",
        log: log.clone(),
    }));

    let resp = pipeline.handle(&get_request());
    assert_eq!(resp.status, 204);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    // The recorder still saw both hooks even though an earlier middleware
    // produced the response.
    assert_eq!(
        *log.lock().unwrap(),
        vec!["rec:before".to_string(), "rec:after".to_string()]
    );
}

#[test]
fn test_first_early_response_wins() {
    let mut pipeline =
        Pipeline::wrap(|_req| FilterResponse::json(200, serde_json::Value::Null));
    pipeline.add_middleware(Arc::new(ShortCircuitMiddleware { status: 401 }));
    pipeline.add_middleware(Arc::new(ShortCircuitMiddleware { status: 403 }));

    let resp = pipeline.handle(&get_request());
    assert_eq!(resp.status, 401);
}

#[test]
fn test_middleware_run_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut pipeline =
        Pipeline::wrap(|_req| FilterResponse::json(200, serde_json::Value::Null));
    for name in ["first", "second"] {
        pipeline.add_middleware(Arc::new(RecordingMiddleware {
            name,
            log: log.clone(),
        }));
    }

    pipeline.handle(&get_request());
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "first:before".to_string(),
            "second:before".to_string(),
            "first:after".to_string(),
            "second:after".to_string(),
        ]
    );
}

#[test]
fn test_request_header_lookup_is_case_insensitive() {
    let mut headers = HeaderVec::new();
    headers.push((Arc::from("X-Custom"), "value".to_string()));
    let req = FilterRequest::new(Method::GET, "/", headers, None);

    assert_eq!(req.get_header("x-custom"), Some("value"));
    assert_eq!(req.get_header("X-CUSTOM"), Some("value"));
    assert_eq!(req.get_header("missing"), None);
}

#[test]
fn test_set_header_replaces_case_insensitively() {
    let mut resp = FilterResponse::json(200, serde_json::Value::Null);
    resp.set_header("Vary", "Origin".to_string());
    resp.set_header("vary", "Accept-Encoding".to_string());

    assert_eq!(resp.get_header("VARY"), Some("Accept-Encoding"));
    assert_eq!(
        resp.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("vary"))
            .count(),
        1
    );
}

#[test]
fn test_no_content_response_shape() {
    let resp = FilterResponse::no_content();
    assert_eq!(resp.status, 204);
    assert!(resp.headers.is_empty());
    assert!(resp.body.is_null());
}
