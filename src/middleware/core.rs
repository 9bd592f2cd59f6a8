use std::time::Duration;

use crate::pipeline::{FilterRequest, FilterResponse};

pub trait Middleware: Send + Sync {
    fn before(&self, _req: &FilterRequest) -> Option<FilterResponse> {
        None
    }
    fn after(&self, _req: &FilterRequest, _res: &mut FilterResponse, _latency: Duration) {}
}
