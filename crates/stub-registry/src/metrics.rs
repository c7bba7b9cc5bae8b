//! Prometheus metrics for the stub registry.
//!
//! Tracks resolution outcomes, resolution latency and the number of stored stubs.
use crate::error::ErrorKind;
use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram, CounterVec, Encoder, Gauge,
    Histogram, TextEncoder,
};

lazy_static! {
    /// Resolutions by outcome
    pub static ref LOOKUPS_TOTAL: CounterVec = register_counter_vec!(
        "stub_registry_lookups_total",
        "Total number of stub resolutions",
        &["outcome"]  // outcome: found|similar|service_not_found|method_not_found|stub_not_found
    )
    .expect("lookup counter is registered once");

    /// Stubs currently stored, summed over every live resolver in the process
    pub static ref STUBS: Gauge = register_gauge!(
        "stub_registry_stubs",
        "Number of stubs currently stored"
    )
    .expect("stub gauge is registered once");

    /// Time spent resolving a query
    pub static ref LOOKUP_DURATION_SECONDS: Histogram = register_histogram!(
        "stub_registry_lookup_duration_seconds",
        "Histogram of stub resolution time in seconds",
        vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]
    )
    .expect("lookup histogram is registered once");
}

/// Outcome label of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Found,
    Similar,
    Failed(ErrorKind),
}

impl LookupOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupOutcome::Found => "found",
            LookupOutcome::Similar => "similar",
            LookupOutcome::Failed(kind) => kind.as_str(),
        }
    }
}

/// Collect and return all metrics in Prometheus text format
pub fn collect_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Helper to record one resolution
pub fn record_lookup(outcome: LookupOutcome, duration_secs: f64) {
    LOOKUPS_TOTAL.with_label_values(&[outcome.as_str()]).inc();
    LOOKUP_DURATION_SECONDS.observe(duration_secs);
}

/// Helper to account for stubs added to a resolver
pub fn add_stubs(count: usize) {
    STUBS.add(count as f64);
}

/// Helper to account for stubs removed from a resolver
pub fn remove_stubs(count: usize) {
    STUBS.sub(count as f64);
}
