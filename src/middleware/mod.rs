mod core;
mod cors;

pub use core::Middleware;
pub use cors::{CorsDecision, CorsFilter, CorsFilterBuilder};
