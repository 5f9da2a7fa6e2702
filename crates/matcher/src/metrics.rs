use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Sink for per-search observations.
///
/// Implementations receive one call per completed search with the sketch
/// id, end-to-end latency, candidates scanned and hits returned. They must
/// be cheap and non-blocking; searches call them on the hot path.
pub trait SearchMetrics: Send + Sync {
    fn record_search(&self, sketch_id: &str, latency: Duration, scanned: usize, hit_count: usize);
}

static METRICS: OnceCell<RwLock<Option<Arc<dyn SearchMetrics>>>> = OnceCell::new();

fn metrics_cell() -> &'static RwLock<Option<Arc<dyn SearchMetrics>>> {
    METRICS.get_or_init(|| RwLock::new(None))
}

/// Install or clear the process-wide metrics sink. Typically called once
/// during startup so every search shares the same backend.
pub fn set_search_metrics(metrics: Option<Arc<dyn SearchMetrics>>) {
    let mut guard = metrics_cell()
        .write()
        .expect("search metrics lock poisoned");
    *guard = metrics;
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn SearchMetrics>> {
    let guard = metrics_cell()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}
