//! # Pipeline Module
//!
//! Request/response types and the explicit middleware chain the CORS filter
//! composes into.
//!
//! The host web framework's routing and handler dispatch are out of scope
//! for this crate; [`Pipeline`] is the minimal seam they plug into. It wraps
//! a single handler function with an ordered list of middleware:
//!
//! 1. Every middleware's `before()` runs in registration order. The first
//!    one to return a response short-circuits the chain and the handler is
//!    never invoked (this is how CORS preflight terminates).
//! 2. Otherwise the handler produces the response.
//! 3. Every middleware's `after()` runs in registration order and may
//!    mutate the response headers in place (this is how CORS allow headers
//!    are attached).
//!
//! Headers are stored in a [`HeaderVec`], a stack-allocated vector of
//! `(Arc<str>, String)` pairs. Most requests carry few enough headers that
//! no heap allocation happens on the hot path, and `Arc<str>` keeps
//! repeated header names cheap to clone.

mod core;

pub use core::{FilterRequest, FilterResponse, Handler, HeaderVec, Pipeline, MAX_INLINE_HEADERS};
