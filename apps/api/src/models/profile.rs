use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed gender set. Unknown labels are rejected at deserialization —
/// downstream stages never see an out-of-set value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The literal category label the trained model was fitted on.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Ordered education enumeration: High School < Bachelor < Master < PhD.
/// Ordering comes from declaration order via derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "High School")]
    HighSchool,
    Bachelor,
    Master,
    #[serde(rename = "PhD")]
    PhD,
}

impl EducationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::Bachelor => "Bachelor",
            EducationLevel::Master => "Master",
            EducationLevel::PhD => "PhD",
        }
    }
}

/// Closed job title set — the titles the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobTitle {
    Developer,
    #[serde(rename = "Data Scientist")]
    DataScientist,
    Manager,
    Analyst,
    Engineer,
}

impl JobTitle {
    pub fn label(&self) -> &'static str {
        match self {
            JobTitle::Developer => "Developer",
            JobTitle::DataScientist => "Data Scientist",
            JobTitle::Manager => "Manager",
            JobTitle::Analyst => "Analyst",
            JobTitle::Engineer => "Engineer",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for JobTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The professional profile submitted for a single prediction request.
///
/// Constructed fresh per request, immutable once handed to the pipeline,
/// discarded when the request completes. Categorical fields are closed
/// enums, so set membership is enforced by construction; the numeric
/// range rules live in `prediction::validation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub age: i32,
    pub gender: Gender,
    pub education_level: EducationLevel,
    pub job_title: JobTitle,
    pub years_experience: i32,
}
