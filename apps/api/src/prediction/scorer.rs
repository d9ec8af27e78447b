#![allow(dead_code)]

//! Salary scorer — pluggable, trait-based gateway to the trained model.
//!
//! Default: `LinearModelScorer`, a distilled coefficient file shipped with
//! the service (pure-Rust, deterministic, fully testable). The trait seam
//! means a remote or heavier backend can be swapped in at startup without
//! touching the orchestrator or handlers.
//!
//! `AppState` holds an `Arc<dyn SalaryScorer>`, constructed once in `main`.
//! Loading failure is fatal at process scope — no request can succeed
//! until it is resolved, so the process refuses to start.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::{EducationLevel, JobTitle, Profile};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The scorer capability: accepts a structured profile with its original
/// categorical labels and returns one non-negative annual amount in the
/// model's native currency. Feature encoding is the scorer's own concern.
///
/// No caching — every call re-invokes the scorer. Implementations must be
/// safe for concurrent read-only invocation.
#[async_trait]
pub trait SalaryScorer: Send + Sync {
    async fn score(&self, profile: &Profile) -> Result<f64, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Model file format
// ────────────────────────────────────────────────────────────────────────────

/// On-disk shape of the distilled model (`model/salary_model.json`):
/// per-job base salaries, per-education multiplicative factors, a per-year
/// experience rate, the native currency the outputs are denominated in,
/// and per-role market averages for the benchmark comparison.
#[derive(Debug, Clone, Deserialize)]
struct ModelFile {
    native_currency: String,
    job_base: BTreeMap<String, f64>,
    education_factor: BTreeMap<String, f64>,
    experience_rate: f64,
    role_averages: BTreeMap<String, f64>,
}

/// Per-role market averages in the native currency.
#[derive(Debug, Clone)]
pub struct RoleBenchmarks {
    averages: BTreeMap<String, f64>,
}

/// How a predicted amount sits against the market average for the role.
/// All amounts are in the native currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub role_average: f64,
    pub delta: f64,
    pub percent_of_average: f64,
}

impl RoleBenchmarks {
    /// Builds a benchmark table directly from per-role averages (native
    /// currency). The normal path loads these from the model file.
    pub fn from_averages(averages: BTreeMap<String, f64>) -> Self {
        RoleBenchmarks { averages }
    }

    /// Compares a native-currency base amount against the role's average.
    /// `None` when the model file carries no average for the role.
    pub fn compare(&self, base_amount: f64, job_title: JobTitle) -> Option<BenchmarkComparison> {
        let role_average = *self.averages.get(job_title.label())?;
        Some(BenchmarkComparison {
            role_average,
            delta: base_amount - role_average,
            percent_of_average: base_amount / role_average * 100.0,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LinearModelScorer — default bundled backend
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic scorer over the distilled coefficients:
///
/// `amount = job_base[title] × education_factor[level] × (1 + rate × years)`
///
/// Immutable after load; shared read-only across concurrent requests.
#[derive(Debug, Clone)]
pub struct LinearModelScorer {
    job_base: BTreeMap<String, f64>,
    education_factor: BTreeMap<String, f64>,
    experience_rate: f64,
}

const ALL_JOB_TITLES: &[JobTitle] = &[
    JobTitle::Developer,
    JobTitle::DataScientist,
    JobTitle::Manager,
    JobTitle::Analyst,
    JobTitle::Engineer,
];

const ALL_EDUCATION_LEVELS: &[EducationLevel] = &[
    EducationLevel::HighSchool,
    EducationLevel::Bachelor,
    EducationLevel::Master,
    EducationLevel::PhD,
];

impl LinearModelScorer {
    /// Loads and sanity-checks the model file.
    ///
    /// Every job title and education level in the closed sets must be
    /// covered with a positive coefficient, and the experience rate must
    /// be non-negative — otherwise a fitted model could emit negative
    /// salaries. Any failure here is `ScoringUnavailable`.
    ///
    /// Returns the scorer together with the native currency code and the
    /// role benchmarks declared by the file.
    pub fn load(path: &Path) -> Result<(Self, String, RoleBenchmarks), AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::ScoringUnavailable(format!(
                "Cannot read model file {}: {e}",
                path.display()
            ))
        })?;

        let file: ModelFile = serde_json::from_str(&raw).map_err(|e| {
            AppError::ScoringUnavailable(format!(
                "Model file {} is malformed: {e}",
                path.display()
            ))
        })?;

        for title in ALL_JOB_TITLES {
            match file.job_base.get(title.label()) {
                Some(base) if *base > 0.0 => {}
                Some(base) => {
                    return Err(AppError::ScoringUnavailable(format!(
                        "Model base salary for '{title}' must be positive, got {base}"
                    )))
                }
                None => {
                    return Err(AppError::ScoringUnavailable(format!(
                        "Model file is missing a base salary for '{title}'"
                    )))
                }
            }
        }

        for level in ALL_EDUCATION_LEVELS {
            match file.education_factor.get(level.label()) {
                Some(factor) if *factor > 0.0 => {}
                Some(factor) => {
                    return Err(AppError::ScoringUnavailable(format!(
                        "Model education factor for '{level}' must be positive, got {factor}"
                    )))
                }
                None => {
                    return Err(AppError::ScoringUnavailable(format!(
                        "Model file is missing an education factor for '{level}'"
                    )))
                }
            }
        }

        if file.experience_rate < 0.0 {
            return Err(AppError::ScoringUnavailable(format!(
                "Model experience rate must be non-negative, got {}",
                file.experience_rate
            )));
        }

        let scorer = LinearModelScorer {
            job_base: file.job_base,
            education_factor: file.education_factor,
            experience_rate: file.experience_rate,
        };
        let benchmarks = RoleBenchmarks {
            averages: file.role_averages,
        };

        Ok((scorer, file.native_currency, benchmarks))
    }

    fn score_sync(&self, profile: &Profile) -> Result<f64, AppError> {
        let base = self
            .job_base
            .get(profile.job_title.label())
            .ok_or_else(|| {
                AppError::Scoring(format!(
                    "No base salary for job title '{}'",
                    profile.job_title
                ))
            })?;
        let factor = self
            .education_factor
            .get(profile.education_level.label())
            .ok_or_else(|| {
                AppError::Scoring(format!(
                    "No education factor for '{}'",
                    profile.education_level
                ))
            })?;

        let amount =
            base * factor * (1.0 + self.experience_rate * f64::from(profile.years_experience));

        // The scorer contract is one non-negative finite number. A violation
        // is a per-request scoring failure, never a partial result.
        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::Scoring(format!(
                "Model produced an out-of-range amount: {amount}"
            )));
        }

        Ok(amount)
    }
}

#[async_trait]
impl SalaryScorer for LinearModelScorer {
    async fn score(&self, profile: &Profile) -> Result<f64, AppError> {
        self.score_sync(profile)
    }
}
