//! Request orchestration — an explicit per-request state machine.
//!
//! Flow: `Received → Validated | Rejected`, then on the external trigger
//! `Validated → Predicting → Completed | Failed`. Validation failures keep
//! the gateway from ever being invoked; gateway or deriver failures
//! short-circuit with no record retained. Requests are independent units
//! with no shared mutable state — the scorer and tables they borrow are
//! read-only.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::prediction::insights::{generate_insights, Insight};
use crate::prediction::metrics::{derive_metrics, CurrencyTable, PredictionResult};
use crate::prediction::scorer::{BenchmarkComparison, RoleBenchmarks, SalaryScorer};
use crate::prediction::validation::{validate_profile, ValidationResult};

/// Lifecycle states of one prediction request. `Rejected`, `Completed`,
/// and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Received,
    Validated,
    Rejected,
    Predicting,
    Completed,
    Failed,
}

/// The terminal success record: prediction, derived metrics, benchmark,
/// insights, and an echo of the inputs. Owned exclusively by the request
/// that created it; only a `Completed` request yields one, and only a
/// record can be exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub request_id: Uuid,
    pub profile: Profile,
    pub prediction: PredictionResult,
    pub benchmark: Option<BenchmarkComparison>,
    pub insights: Vec<Insight>,
}

/// One prediction request moving through the state machine. Constructed
/// fresh per request; dropped when the request completes.
#[derive(Debug)]
pub struct PredictionRequest {
    id: Uuid,
    profile: Profile,
    state: RequestState,
    validation: Option<ValidationResult>,
    insights: Option<Vec<Insight>>,
    record: Option<PredictionRecord>,
}

impl PredictionRequest {
    pub fn new(profile: Profile) -> Self {
        PredictionRequest {
            id: Uuid::new_v4(),
            profile,
            state: RequestState::Received,
            validation: None,
            insights: None,
            record: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn record(&self) -> Option<&PredictionRecord> {
        self.record.as_ref()
    }

    /// `Received → Validated | Rejected`. Idempotent once run: repeated
    /// calls return the stored result without re-transitioning.
    pub fn validate(&mut self) -> ValidationResult {
        if let Some(result) = &self.validation {
            return result.clone();
        }
        let result = validate_profile(&self.profile);
        self.state = if result.is_valid {
            RequestState::Validated
        } else {
            warn!(
                request_id = %self.id,
                violations = result.violations.len(),
                "Profile rejected by validation"
            );
            RequestState::Rejected
        };
        self.validation = Some(result.clone());
        result
    }

    /// Computes insights for a validated profile. Optional and repeatable;
    /// a request may sit in `Validated` indefinitely while the caller
    /// re-reads these.
    pub fn insights(&mut self) -> Result<Vec<Insight>, AppError> {
        if self.state != RequestState::Validated {
            return Err(AppError::Validation(
                "Insights require a validated profile".to_string(),
            ));
        }
        if let Some(insights) = &self.insights {
            return Ok(insights.clone());
        }
        let insights = generate_insights(&self.profile);
        self.insights = Some(insights.clone());
        Ok(insights)
    }

    /// The explicit "predict now" trigger: `Validated → Predicting`, then
    /// `Completed` with the assembled record or `Failed` with no record.
    ///
    /// The scorer receives the profile with its original categorical
    /// labels; the deriver expands the returned native amount into the
    /// selected currency. Either failure surfaces as a structured error —
    /// a partially populated record never escapes.
    pub async fn predict(
        &mut self,
        scorer: &dyn SalaryScorer,
        currencies: &CurrencyTable,
        benchmarks: &RoleBenchmarks,
        currency_code: &str,
    ) -> Result<PredictionRecord, AppError> {
        if self.state != RequestState::Validated {
            return Err(AppError::Validation(
                "Prediction requires a validated profile".to_string(),
            ));
        }

        self.state = RequestState::Predicting;

        let base_amount = match scorer.score(&self.profile).await {
            Ok(amount) => amount,
            Err(e) => {
                self.state = RequestState::Failed;
                warn!(request_id = %self.id, error = %e, "Scorer invocation failed");
                return Err(e);
            }
        };

        let prediction = match derive_metrics(base_amount, currency_code, currencies) {
            Ok(result) => result,
            Err(e) => {
                self.state = RequestState::Failed;
                warn!(request_id = %self.id, error = %e, "Metric derivation failed");
                return Err(e);
            }
        };

        let benchmark = benchmarks.compare(base_amount, self.profile.job_title);
        let insights = self
            .insights
            .take()
            .unwrap_or_else(|| generate_insights(&self.profile));

        info!(
            request_id = %self.id,
            base_amount,
            currency = currency_code,
            "Prediction completed"
        );

        self.state = RequestState::Completed;
        let record = PredictionRecord {
            request_id: self.id,
            profile: self.profile,
            prediction,
            benchmark,
            insights,
        };
        self.record = Some(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{EducationLevel, Gender, JobTitle};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scorer stub that counts invocations and returns a fixed amount.
    struct SpyScorer {
        amount: f64,
        calls: AtomicUsize,
    }

    impl SpyScorer {
        fn new(amount: f64) -> Self {
            SpyScorer {
                amount,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SalaryScorer for SpyScorer {
        async fn score(&self, _profile: &Profile) -> Result<f64, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.amount)
        }
    }

    /// Scorer stub that always fails per-request.
    struct FailingScorer;

    #[async_trait]
    impl SalaryScorer for FailingScorer {
        async fn score(&self, _profile: &Profile) -> Result<f64, AppError> {
            Err(AppError::Scoring("model blew up".to_string()))
        }
    }

    fn make_profile(age: i32, years: i32) -> Profile {
        Profile {
            age,
            gender: Gender::Male,
            education_level: EducationLevel::Master,
            job_title: JobTitle::Developer,
            years_experience: years,
        }
    }

    fn make_benchmarks() -> RoleBenchmarks {
        RoleBenchmarks::from_averages(BTreeMap::from([("Developer".to_string(), 800_000.0)]))
    }

    #[test]
    fn test_new_request_starts_received() {
        let request = PredictionRequest::new(make_profile(30, 5));
        assert_eq!(request.state(), RequestState::Received);
        assert!(request.record().is_none());
    }

    #[test]
    fn test_valid_profile_transitions_to_validated() {
        let mut request = PredictionRequest::new(make_profile(30, 5));
        let result = request.validate();
        assert!(result.is_valid);
        assert_eq!(request.state(), RequestState::Validated);
    }

    #[test]
    fn test_invalid_profile_transitions_to_rejected() {
        let mut request = PredictionRequest::new(make_profile(20, 10));
        let result = request.validate();
        assert!(!result.is_valid);
        assert_eq!(request.state(), RequestState::Rejected);
    }

    #[tokio::test]
    async fn test_rejected_request_never_invokes_scorer() {
        let scorer = SpyScorer::new(500_000.0);
        let mut request = PredictionRequest::new(make_profile(20, 10));
        request.validate();

        let err = request
            .predict(
                &scorer,
                &CurrencyTable::builtin(),
                &make_benchmarks(),
                "INR",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(scorer.call_count(), 0);
        assert_eq!(request.state(), RequestState::Rejected);
    }

    #[tokio::test]
    async fn test_predict_without_validate_is_refused() {
        let scorer = SpyScorer::new(500_000.0);
        let mut request = PredictionRequest::new(make_profile(30, 5));

        let err = request
            .predict(
                &scorer,
                &CurrencyTable::builtin(),
                &make_benchmarks(),
                "INR",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(scorer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_predict_completes_with_record() {
        let scorer = SpyScorer::new(1_200_000.0);
        let mut request = PredictionRequest::new(make_profile(30, 5));
        request.validate();

        let record = request
            .predict(
                &scorer,
                &CurrencyTable::builtin(),
                &make_benchmarks(),
                "INR",
            )
            .await
            .unwrap();

        assert_eq!(request.state(), RequestState::Completed);
        assert_eq!(scorer.call_count(), 1);
        assert!((record.prediction.base_amount - 1_200_000.0).abs() < 1e-9);
        assert!((record.prediction.monthly - 100_000.0).abs() < 1e-9);
        assert_eq!(record.profile.age, 30);
        assert!(!record.insights.is_empty());

        let benchmark = record.benchmark.unwrap();
        assert!((benchmark.delta - 400_000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_scorer_failure_transitions_to_failed_with_no_record() {
        let mut request = PredictionRequest::new(make_profile(30, 5));
        request.validate();

        let err = request
            .predict(
                &FailingScorer,
                &CurrencyTable::builtin(),
                &make_benchmarks(),
                "INR",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Scoring(_)));
        assert_eq!(request.state(), RequestState::Failed);
        assert!(request.record().is_none());
    }

    #[tokio::test]
    async fn test_unknown_currency_transitions_to_failed_with_no_record() {
        let scorer = SpyScorer::new(500_000.0);
        let mut request = PredictionRequest::new(make_profile(30, 5));
        request.validate();

        let err = request
            .predict(
                &scorer,
                &CurrencyTable::builtin(),
                &make_benchmarks(),
                "JPY",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownCurrency(_)));
        assert_eq!(request.state(), RequestState::Failed);
        assert!(request.record().is_none());
    }

    #[test]
    fn test_insights_refused_before_validation() {
        let mut request = PredictionRequest::new(make_profile(30, 5));
        assert!(request.insights().is_err());
    }

    #[test]
    fn test_insights_available_while_validated() {
        let mut request = PredictionRequest::new(make_profile(30, 5));
        request.validate();
        let first = request.insights().unwrap();
        let second = request.insights().unwrap();
        assert_eq!(first, second);
        // Still Validated — insights do not trigger prediction.
        assert_eq!(request.state(), RequestState::Validated);
    }

    #[tokio::test]
    async fn test_record_carries_precomputed_insights() {
        let scorer = SpyScorer::new(900_000.0);
        let mut request = PredictionRequest::new(make_profile(30, 5));
        request.validate();
        let expected = request.insights().unwrap();

        let record = request
            .predict(
                &scorer,
                &CurrencyTable::builtin(),
                &make_benchmarks(),
                "USD",
            )
            .await
            .unwrap();
        assert_eq!(record.insights, expected);
    }
}
