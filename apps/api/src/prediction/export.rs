//! Result export — flattens completed prediction records into CSV.
//!
//! One header row, one data row per completed prediction, full-precision
//! amounts, original category labels. This is the only artifact the
//! service produces; nothing is persisted server-side.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::prediction::orchestrator::PredictionRecord;

/// The flat export schema. Field order here is the column order.
#[derive(Debug, Serialize)]
struct ExportRow {
    timestamp: String,
    age: i32,
    gender: &'static str,
    education_level: &'static str,
    job_title: &'static str,
    years_experience: i32,
    base_amount: f64,
    currency_code: String,
    converted_amount: f64,
}

impl From<&PredictionRecord> for ExportRow {
    fn from(record: &PredictionRecord) -> Self {
        ExportRow {
            timestamp: record
                .prediction
                .generated_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            age: record.profile.age,
            gender: record.profile.gender.label(),
            education_level: record.profile.education_level.label(),
            job_title: record.profile.job_title.label(),
            years_experience: record.profile.years_experience,
            base_amount: record.prediction.base_amount,
            currency_code: record.prediction.currency_code.clone(),
            converted_amount: record.prediction.converted_amount,
        }
    }
}

/// Serializes completed records into CSV text (header + one row each).
pub fn render_csv(records: &[PredictionRecord]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(ExportRow::from(record))
            .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV serialization failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV writer flush failed: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV output was not UTF-8: {e}")))
}

/// Download filename: `salary_prediction_YYYYMMDD_HHMMSS.csv`.
pub fn report_filename(at: DateTime<Utc>) -> String {
    format!("salary_prediction_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{EducationLevel, Gender, JobTitle, Profile};
    use crate::prediction::metrics::PredictionResult;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn make_record() -> PredictionRecord {
        let generated_at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        PredictionRecord {
            request_id: Uuid::new_v4(),
            profile: Profile {
                age: 30,
                gender: Gender::Male,
                education_level: EducationLevel::HighSchool,
                job_title: JobTitle::DataScientist,
                years_experience: 5,
            },
            prediction: PredictionResult {
                base_amount: 1_200_000.0,
                currency_code: "USD".to_string(),
                converted_amount: 14_400.0,
                monthly: 1_200.0,
                hourly: 14_400.0 / 2080.0,
                daily: 14_400.0 / 365.0,
                generated_at,
            },
            benchmark: None,
            insights: vec![],
        }
    }

    #[test]
    fn test_header_matches_export_schema() {
        let csv = render_csv(&[make_record()]).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "timestamp,age,gender,education_level,job_title,years_experience,\
             base_amount,currency_code,converted_amount"
        );
    }

    #[test]
    fn test_one_row_per_record() {
        let csv = render_csv(&[make_record(), make_record()]).unwrap();
        assert_eq!(csv.lines().count(), 3); // header + 2 rows
    }

    #[test]
    fn test_row_uses_original_labels() {
        let csv = render_csv(&[make_record()]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("2025-03-14 09:26:53"));
        assert!(row.contains("Data Scientist"));
        assert!(row.contains("High School"));
        assert!(row.contains("1200000"));
        assert!(row.contains("USD"));
        assert!(row.contains("14400"));
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        // csv::Writer only emits a header once a record is serialized.
        let csv = render_csv(&[]).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_report_filename_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(report_filename(at), "salary_prediction_20250314_092653.csv");
    }
}
