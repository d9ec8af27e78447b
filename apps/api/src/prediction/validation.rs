//! Profile validation — domain range rules, evaluated independently.
//!
//! All violations are collected, never short-circuited, so the caller can
//! surface every problem at once. Closed-set membership (gender, education,
//! job title) is the input layer's job: the serde enums reject unknown
//! labels before a `Profile` can exist.

use serde::Serialize;

use crate::models::profile::Profile;

pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 100;
/// Minimum working age — experience cannot exceed `age - MIN_WORKING_AGE`.
pub const MIN_WORKING_AGE: i32 = 16;

/// A single failed rule: which field broke, and why, in user-facing words.
/// Violations only flow outward in responses, so they serialize but never
/// deserialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

/// Outcome of validating one profile. `violations` is empty iff `is_valid`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
}

/// Validates a profile against the domain rules:
/// - age in [18, 100] — the message names the bound that was breached
/// - years_experience ≥ 0
/// - years_experience ≤ age − 16
///
/// Deterministic and side-effect free.
pub fn validate_profile(profile: &Profile) -> ValidationResult {
    let mut violations = Vec::new();

    if profile.age < MIN_AGE {
        violations.push(Violation {
            field: "age",
            message: format!("Age must be at least {MIN_AGE}"),
        });
    } else if profile.age > MAX_AGE {
        violations.push(Violation {
            field: "age",
            message: format!("Age must not exceed {MAX_AGE}"),
        });
    }

    if profile.years_experience < 0 {
        violations.push(Violation {
            field: "years_experience",
            message: "Experience cannot be negative".to_string(),
        });
    }

    // Saturating: `age` is unconstrained i32 here, and the window rule must
    // still evaluate (collected, not short-circuited) when age is absurd.
    let max_experience = profile.age.saturating_sub(MIN_WORKING_AGE);
    if profile.years_experience > max_experience {
        violations.push(Violation {
            field: "years_experience",
            message: format!(
                "Experience cannot exceed (Age - {MIN_WORKING_AGE}) years \
                 (at most {max_experience} for age {})",
                profile.age
            ),
        });
    }

    ValidationResult {
        is_valid: violations.is_empty(),
        violations,
    }
}
