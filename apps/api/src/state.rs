use std::sync::Arc;

use crate::config::Config;
use crate::prediction::metrics::CurrencyTable;
use crate::prediction::scorer::{RoleBenchmarks, SalaryScorer};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is loaded once at startup and shared read-only across
/// requests — no locking discipline is needed, and concurrent requests may
/// invoke the scorer simultaneously.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable salary scorer. Default: `LinearModelScorer` from the
    /// distilled model file; a fake substitutes in tests.
    pub scorer: Arc<dyn SalaryScorer>,
    /// Currency code → multiplier relative to the model's native currency.
    pub currencies: Arc<CurrencyTable>,
    /// Per-role market averages for the benchmark comparison.
    pub benchmarks: Arc<RoleBenchmarks>,
    /// The currency the model's raw output is denominated in.
    pub native_currency: String,
}
