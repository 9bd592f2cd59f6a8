//! # corsfilter
//!
//! A standalone CORS (Cross-Origin Resource Sharing) policy filter that
//! composes into an HTTP request pipeline ahead of application handlers.
//!
//! Per inbound request the filter evaluates the `Origin` header and method
//! against an immutable [`CorsPolicy`] and either short-circuits preflight
//! (`OPTIONS`) requests with a terminal `204 No Content` response, or
//! annotates the downstream handler's response with CORS headers. Requests
//! from origins the policy does not allow still reach the handler; the
//! filter simply withholds the allow headers and lets the browser enforce
//! the block.
//!
//! ## Modules
//!
//! - **[`policy`]** - Immutable CORS policy, configuration parsing, and
//!   startup validation
//! - **[`middleware`]** - The [`Middleware`] trait and the [`CorsFilter`]
//!   implementation
//! - **[`pipeline`]** - Request/response types and the explicit middleware
//!   chain the filter attaches to
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use corsfilter::{CorsFilter, CorsPolicy, FilterResponse, Pipeline};
//!
//! let policy = CorsPolicy::from_origins("http://localhost:5173")?;
//! let mut pipeline = Pipeline::wrap(|_req| {
//!     FilterResponse::json(200, serde_json::json!({ "ok": true }))
//! });
//! pipeline.add_middleware(Arc::new(CorsFilter::new(policy)?));
//! # Ok::<(), corsfilter::PolicyError>(())
//! ```
//!
//! ## Concurrency
//!
//! The policy is read-only after construction. [`CorsFilter`] is `Send +
//! Sync` and evaluation is a pure function of the policy and the request's
//! headers, so a single filter instance is shared via `Arc` across all
//! concurrently handled requests without locking.

pub mod middleware;
pub mod pipeline;
pub mod policy;

pub use middleware::{CorsDecision, CorsFilter, CorsFilterBuilder, Middleware};
pub use pipeline::{FilterRequest, FilterResponse, HeaderVec, Pipeline};
pub use policy::{AllowedHeaders, AllowedOrigins, CorsPolicy, PolicyError};
