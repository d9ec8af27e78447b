//! Career insights — a declarative ordered rule table over the profile.
//!
//! Rules fire independently (except the mutually-exclusive experience
//! tiers) and in table order, so output ordering is fixed: tier first,
//! then education, then experience-to-age ratio. Each rule is a plain
//! predicate + message pair that can be unit-tested in isolation.
//!
//! Thresholds are empirical constants carried over from the trained
//! model's companion analysis — preserved as named constants, not
//! re-derived.

use serde::{Deserialize, Serialize};

use crate::models::profile::{EducationLevel, Profile};

/// Tier boundaries in years of experience (ascending).
pub const TIER_MID_JUNIOR_MIN: i32 = 2;
pub const TIER_EXPERIENCED_MIN: i32 = 5;
pub const TIER_SENIOR_EXPERT_MIN: i32 = 10;

/// Strict thresholds on the experience-to-age ratio. A ratio inside
/// [RATIO_GROWTH, RATIO_STRONG] produces no ratio insight.
pub const RATIO_STRONG: f64 = 0.8;
pub const RATIO_GROWTH: f64 = 0.3;

/// Experience-based qualitative bucket. Partitions [0, ∞) into four
/// disjoint intervals; a pure function of years of experience alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceTier {
    EntryLevel,
    MidJunior,
    Experienced,
    SeniorExpert,
}

impl ExperienceTier {
    pub fn from_years(years: i32) -> Self {
        if years < TIER_MID_JUNIOR_MIN {
            ExperienceTier::EntryLevel
        } else if years < TIER_EXPERIENCED_MIN {
            ExperienceTier::MidJunior
        } else if years < TIER_SENIOR_EXPERT_MIN {
            ExperienceTier::Experienced
        } else {
            ExperienceTier::SeniorExpert
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceTier::EntryLevel => "entry-level",
            ExperienceTier::MidJunior => "mid-junior",
            ExperienceTier::Experienced => "experienced",
            ExperienceTier::SeniorExpert => "senior-expert",
        }
    }
}

/// Which rule family produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    ExperienceTier,
    Education,
    ExperienceRatio,
}

/// One human-readable observation derived from the profile. Stateless and
/// regenerable at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

/// Experience-to-age ratio: years / (age − 18), defined as 0 at age 18.
pub fn experience_ratio(profile: &Profile) -> f64 {
    if profile.age > 18 {
        f64::from(profile.years_experience) / f64::from(profile.age - 18)
    } else {
        0.0
    }
}

struct InsightRule {
    kind: InsightKind,
    applies: fn(&Profile) -> bool,
    message: fn(&Profile) -> String,
}

/// Ordered rule table. Tier rules are mutually exclusive by construction
/// (`ExperienceTier::from_years` picks exactly one); everything else
/// fires independently.
const RULES: &[InsightRule] = &[
    InsightRule {
        kind: InsightKind::ExperienceTier,
        applies: |p| ExperienceTier::from_years(p.years_experience) == ExperienceTier::EntryLevel,
        message: |_| "Entry-level position - consider gaining more experience".to_string(),
    },
    InsightRule {
        kind: InsightKind::ExperienceTier,
        applies: |p| ExperienceTier::from_years(p.years_experience) == ExperienceTier::MidJunior,
        message: |_| "Mid-junior level - good growth potential".to_string(),
    },
    InsightRule {
        kind: InsightKind::ExperienceTier,
        applies: |p| ExperienceTier::from_years(p.years_experience) == ExperienceTier::Experienced,
        message: |_| "Experienced professional - strong market position".to_string(),
    },
    InsightRule {
        kind: InsightKind::ExperienceTier,
        applies: |p| ExperienceTier::from_years(p.years_experience) == ExperienceTier::SeniorExpert,
        message: |_| "Senior expert - premium salary expectations".to_string(),
    },
    InsightRule {
        kind: InsightKind::Education,
        applies: |p| p.education_level == EducationLevel::PhD,
        message: |_| "PhD qualification adds significant value".to_string(),
    },
    InsightRule {
        kind: InsightKind::Education,
        applies: |p| p.education_level == EducationLevel::Master,
        message: |_| "Master's degree provides competitive advantage".to_string(),
    },
    InsightRule {
        kind: InsightKind::ExperienceRatio,
        applies: |p| experience_ratio(p) > RATIO_STRONG,
        message: |_| "Excellent experience-to-age ratio".to_string(),
    },
    InsightRule {
        kind: InsightKind::ExperienceRatio,
        applies: |p| experience_ratio(p) < RATIO_GROWTH,
        message: |_| "Potential for rapid career growth".to_string(),
    },
];

/// Walks the rule table in order and collects every applicable insight.
/// Only meaningful on a profile that has already passed validation.
pub fn generate_insights(profile: &Profile) -> Vec<Insight> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(profile))
        .map(|rule| Insight {
            kind: rule.kind,
            message: (rule.message)(profile),
        })
        .collect()
}
