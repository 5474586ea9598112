//! Symptom analysis domain types.
//!
//! These are the inputs and outputs of a single analysis call. Nothing here has identity or a
//! lifecycle beyond that call; storing results is the caller's concern.

use dx_types::Confidence;
use serde::{Deserialize, Serialize};

/// Interaction persona. Alters prompt framing and description wording, not the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Doctor,
    Patient,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Doctor => "doctor",
            Mode::Patient => "patient",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = crate::DxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doctor" => Ok(Mode::Doctor),
            "patient" => Ok(Mode::Patient),
            other => Err(crate::DxError::InvalidInput(format!(
                "mode must be \"doctor\" or \"patient\", got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = crate::DxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(crate::DxError::InvalidInput(format!(
                "gender must be male, female or other, got {other:?}"
            ))),
        }
    }
}

/// Optional patient attributes included in prompts when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
}

impl PatientInfo {
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.gender.is_none()
    }
}

/// Input to a single analysis call.
///
/// `symptoms` is not validated here; rejecting blank input belongs to the route layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomInput {
    pub symptoms: String,
    pub mode: Mode,
    pub patient_info: Option<PatientInfo>,
}

impl SymptomInput {
    pub fn new(symptoms: impl Into<String>, mode: Mode) -> Self {
        Self {
            symptoms: symptoms.into(),
            mode,
            patient_info: None,
        }
    }

    pub fn with_patient_info(mut self, info: PatientInfo) -> Self {
        self.patient_info = Some(info);
        self
    }
}

/// One entry in a ranked differential; position in the list is the rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisCandidate {
    pub name: String,
    pub description: String,
    pub confidence: Confidence,
    pub category: String,
    pub red_flags: Vec<String>,
    pub recommended_tests: Vec<String>,
}

/// The outcome of one analysis. Lists may be empty but are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub diagnoses: Vec<DiagnosisCandidate>,
    pub follow_up_questions: Vec<String>,
    pub red_flags: Vec<String>,
    pub recommended_tests: Vec<String>,
    pub overall_confidence: Confidence,
}
