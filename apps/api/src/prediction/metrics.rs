//! Derived financial metrics — expands one annual amount into a
//! currency-converted set of period rates.
//!
//! All outputs keep full precision; rounding is a presentation concern.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Fixed conversion/division schedule.
pub const MONTHS_PER_YEAR: f64 = 12.0;
/// 40-hour week × 52-week year = 2080 working hours.
pub const WORK_HOURS_PER_YEAR: f64 = 40.0 * 52.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

// ────────────────────────────────────────────────────────────────────────────
// Currency table
// ────────────────────────────────────────────────────────────────────────────

/// Process-wide immutable map from currency code to the multiplicative
/// conversion factor relative to the model's native currency. Loaded once
/// at startup, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyTable(BTreeMap<String, f64>);

impl CurrencyTable {
    /// Static factors shipped with the service. The model output is
    /// denominated in INR.
    pub fn builtin() -> Self {
        CurrencyTable(BTreeMap::from([
            ("INR".to_string(), 1.0),
            ("USD".to_string(), 0.012),
            ("EUR".to_string(), 0.011),
            ("GBP".to_string(), 0.0095),
        ]))
    }

    /// Loads an override table from a JSON object of `code → factor`.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let map: BTreeMap<String, f64> = serde_json::from_str(&raw)?;
        Ok(CurrencyTable(map))
    }

    /// Startup validation: every factor positive, and the native currency
    /// present with factor 1.0.
    pub fn validate(&self, native_currency: &str) -> anyhow::Result<()> {
        for (code, factor) in &self.0 {
            anyhow::ensure!(
                *factor > 0.0,
                "Currency factor for {code} must be positive, got {factor}"
            );
        }
        match self.0.get(native_currency) {
            Some(factor) if (*factor - 1.0).abs() < f64::EPSILON => Ok(()),
            Some(factor) => anyhow::bail!(
                "Native currency {native_currency} must have factor 1.0, got {factor}"
            ),
            None => anyhow::bail!("Currency table is missing the native currency {native_currency}"),
        }
    }

    pub fn factor(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Derivation
// ────────────────────────────────────────────────────────────────────────────

/// A prediction expanded into display metrics. Owned exclusively by the
/// request that created it; full precision throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Annual amount in the model's native currency.
    pub base_amount: f64,
    pub currency_code: String,
    pub converted_amount: f64,
    pub monthly: f64,
    pub hourly: f64,
    pub daily: f64,
    pub generated_at: DateTime<Utc>,
}

/// Expands a native-currency annual amount into the selected currency's
/// period rates. Exact formulas:
///
/// - `converted = base × table[code]`
/// - `monthly = converted / 12`
/// - `hourly  = converted / 2080`
/// - `daily   = converted / 365`
///
/// Fails with `UnknownCurrency` when the code is absent — no partial
/// result is produced.
pub fn derive_metrics(
    base_amount: f64,
    currency_code: &str,
    table: &CurrencyTable,
) -> Result<PredictionResult, AppError> {
    let factor = table
        .factor(currency_code)
        .ok_or_else(|| AppError::UnknownCurrency(currency_code.to_string()))?;

    let converted_amount = base_amount * factor;

    Ok(PredictionResult {
        base_amount,
        currency_code: currency_code.to_string(),
        converted_amount,
        monthly: converted_amount / MONTHS_PER_YEAR,
        hourly: converted_amount / WORK_HOURS_PER_YEAR,
        daily: converted_amount / DAYS_PER_YEAR,
        generated_at: Utc::now(),
    })
}
