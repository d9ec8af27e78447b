// Prediction pipeline: validation, insights, scoring, derived metrics,
// per-request orchestration, and CSV export.
// All scorer invocations go through the SalaryScorer trait — no module
// reaches into the model file directly.

pub mod export;
pub mod handlers;
pub mod insights;
pub mod metrics;
pub mod orchestrator;
pub mod scorer;
pub mod validation;
