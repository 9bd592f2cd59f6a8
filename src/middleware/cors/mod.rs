mod builder;

pub use builder::CorsFilterBuilder;

use std::sync::Arc;
use std::time::Duration;

use http::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::middleware::Middleware;
use crate::pipeline::{FilterRequest, FilterResponse, HeaderVec};
use crate::policy::{AllowedHeaders, CorsPolicy, PolicyError};

/// Outcome of evaluating one request against the policy.
///
/// Produced by [`CorsFilter::evaluate`]; the [`Middleware`] implementation
/// is a thin mapping of these variants onto the before/after hooks.
#[derive(Debug)]
pub enum CorsDecision {
    /// No `Origin` header: same-origin request, pass through unmodified
    NotCors,
    /// Origin (or preflight method/headers) not allowed.
    ///
    /// The downstream handler still executes; the filter withholds the
    /// allow headers and the browser enforces the block. Silent by design,
    /// not a reported error.
    Denied,
    /// Cross-origin request from an allowed origin: annotate the eventual
    /// response with this exact origin echo
    Allowed {
        /// The origin to echo in `Access-Control-Allow-Origin`
        origin: String,
    },
    /// Preflight from an allowed origin: terminal response, handler is
    /// never invoked
    Preflight(FilterResponse),
}

/// CORS policy filter.
///
/// Intercepts every request ahead of the application handler, evaluates
/// the `Origin` header and method against an immutable [`CorsPolicy`], and
/// either short-circuits preflight (`OPTIONS`) requests with a terminal
/// `204 No Content` or annotates the handler's response with CORS headers.
///
/// # Headers
///
/// - `Access-Control-Allow-Origin`: the request origin echoed exactly,
///   never the literal `*`
/// - `Access-Control-Allow-Credentials: true` when the policy enables
///   credentials
/// - `Access-Control-Allow-Methods`, `Access-Control-Allow-Headers`,
///   `Access-Control-Max-Age` on preflight responses only
/// - `Vary: Origin` on every response carrying an origin echo
#[derive(Debug)]
pub struct CorsFilter {
    policy: CorsPolicy,
}

impl CorsFilter {
    /// Wrap a policy in a filter, re-running startup validation.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] if the policy violates the
    /// credentialed-origin invariant.
    pub fn new(policy: CorsPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Build a filter from the `CORSFILTER_ALLOWED_ORIGINS` environment
    /// variable.
    ///
    /// # Errors
    ///
    /// Propagates every [`CorsPolicy::from_env`] error; all of them are
    /// startup-fatal.
    pub fn from_env() -> Result<Self, PolicyError> {
        Self::new(CorsPolicy::from_env()?)
    }

    /// The immutable policy this filter enforces.
    #[must_use]
    pub fn policy(&self) -> &CorsPolicy {
        &self.policy
    }

    /// Evaluate a request against the policy.
    ///
    /// Pure function of the policy and the request's method and headers;
    /// no shared mutable state, safe to call from any number of threads.
    #[must_use]
    pub fn evaluate(&self, req: &FilterRequest) -> CorsDecision {
        let origin = match req.get_header("origin") {
            Some(o) => o,
            None => {
                debug!(method = %req.method, path = %req.path, "no Origin header, passing through");
                return CorsDecision::NotCors;
            }
        };

        if !self.policy.allowed_origins.is_allowed(origin) {
            warn!(origin = %origin, method = %req.method, path = %req.path, "origin not allowed");
            return CorsDecision::Denied;
        }

        if req.method == Method::OPTIONS {
            match self.preflight_response(req, origin) {
                Some(resp) => CorsDecision::Preflight(resp),
                None => CorsDecision::Denied,
            }
        } else {
            CorsDecision::Allowed {
                origin: origin.to_string(),
            }
        }
    }

    /// Build the terminal preflight response for an allowed origin.
    ///
    /// Returns `None` when the preflight asks for a method or header the
    /// policy does not permit.
    fn preflight_response(&self, req: &FilterRequest, origin: &str) -> Option<FilterResponse> {
        if let Some(requested) = req.get_header("access-control-request-method") {
            let method = match requested.parse::<Method>() {
                Ok(m) => m,
                Err(_) => {
                    warn!(
                        requested_method = %requested,
                        "preflight requested an unparseable method"
                    );
                    return None;
                }
            };
            if !self.policy.allowed_methods.contains(&method) {
                warn!(
                    requested_method = %method,
                    "preflight requested a method outside the allowed list"
                );
                return None;
            }
        }

        let requested_headers = req.get_header("access-control-request-headers");
        if let Some(headers_str) = requested_headers {
            for header in headers_str.split(',').map(str::trim) {
                if !self.policy.allowed_headers.permits(header) {
                    warn!(
                        requested_header = %header,
                        "preflight requested a header outside the allowed list"
                    );
                    return None;
                }
            }
        }

        let mut headers = HeaderVec::new();
        headers.push((
            Arc::from("access-control-allow-origin"),
            origin.to_string(),
        ));
        if self.policy.allow_credentials {
            headers.push((
                Arc::from("access-control-allow-credentials"),
                "true".to_string(),
            ));
        }
        headers.push((
            Arc::from("access-control-allow-methods"),
            self.policy.methods_header_value(),
        ));
        match &self.policy.allowed_headers {
            // Wildcard policy echoes whatever the preflight asked for;
            // the header is omitted when nothing was requested.
            AllowedHeaders::Any => {
                if let Some(requested) = requested_headers {
                    headers.push((
                        Arc::from("access-control-allow-headers"),
                        requested.to_string(),
                    ));
                }
            }
            AllowedHeaders::List(allowed) => {
                headers.push((
                    Arc::from("access-control-allow-headers"),
                    allowed.join(", "),
                ));
            }
        }
        headers.push((
            Arc::from("access-control-max-age"),
            self.policy.max_age_seconds.to_string(),
        ));
        headers.push((Arc::from("vary"), "Origin".to_string()));

        Some(FilterResponse::new(204, headers, Value::Null))
    }
}

impl Middleware for CorsFilter {
    /// Short-circuit allowed preflight requests with a terminal 204.
    ///
    /// Everything else proceeds to the handler, including `OPTIONS`
    /// requests with no `Origin` header (plain same-origin OPTIONS) and
    /// requests from disallowed origins (denial is withholding headers,
    /// not blocking dispatch).
    fn before(&self, req: &FilterRequest) -> Option<FilterResponse> {
        match self.evaluate(req) {
            CorsDecision::Preflight(resp) => Some(resp),
            _ => None,
        }
    }

    /// Attach the origin echo to responses for allowed cross-origin
    /// requests. Same-origin and denied requests leave the response
    /// untouched.
    fn after(&self, req: &FilterRequest, res: &mut FilterResponse, _latency: Duration) {
        if let CorsDecision::Allowed { origin } = self.evaluate(req) {
            res.set_header("access-control-allow-origin", origin);
            if self.policy.allow_credentials {
                res.set_header("access-control-allow-credentials", "true".to_string());
            }
            res.set_header("vary", "Origin".to_string());
        }
    }
}
