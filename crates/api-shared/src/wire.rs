//! JSON request and response bodies.
//!
//! Field names are camelCase on the wire. Response lists are always present (`[]`, never
//! `null`). Mode and gender reuse the core enums, which only accept their lower-case names.

use dx_core::{
    AnalysisOutcome, DiagnosisCandidate, DxResult, Gender, Mode, NonEmptyText, PatientInfo,
    SlotStatus, SymptomInput,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfoReq {
    #[schema(minimum = 1)]
    pub age: Option<u32>,
    #[schema(value_type = Option<String>, example = "female")]
    pub gender: Option<Gender>,
}

impl From<PatientInfoReq> for PatientInfo {
    fn from(req: PatientInfoReq) -> Self {
        PatientInfo {
            // An age of zero is treated as "not given".
            age: req.age.filter(|a| *a > 0),
            gender: req.gender,
        }
    }
}

fn symptom_input(
    symptoms: &str,
    mode: Mode,
    patient_info: Option<PatientInfoReq>,
) -> DxResult<SymptomInput> {
    let symptoms = NonEmptyText::new(symptoms)?;
    let input = SymptomInput::new(symptoms.into_inner(), mode);
    Ok(match patient_info {
        Some(info) => input.with_patient_info(info.into()),
        None => input,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReq {
    #[schema(example = "Fever and joint pain for three days")]
    pub symptoms: String,
    #[schema(value_type = String, example = "doctor")]
    pub mode: Mode,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub patient_info: Option<PatientInfoReq>,
}

impl AnalyzeReq {
    /// Validate the request and convert it into core input. Blank symptoms are rejected.
    pub fn into_input(self) -> DxResult<SymptomInput> {
        symptom_input(&self.symptoms, self.mode, self.patient_info)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsReq {
    pub symptoms: String,
    #[schema(value_type = String, example = "patient")]
    pub mode: Mode,
    #[serde(default)]
    pub patient_info: Option<PatientInfoReq>,
}

impl QuestionsReq {
    pub fn into_input(self) -> DxResult<SymptomInput> {
        symptom_input(&self.symptoms, self.mode, self.patient_info)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionsRes {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EducationReq {
    #[schema(example = "Migraine")]
    pub diagnosis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EducationRes {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRes {
    pub name: String,
    pub description: String,
    #[schema(maximum = 100)]
    pub confidence: u8,
    pub category: String,
    pub red_flags: Vec<String>,
    pub recommended_tests: Vec<String>,
}

impl From<DiagnosisCandidate> for DiagnosisRes {
    fn from(d: DiagnosisCandidate) -> Self {
        DiagnosisRes {
            name: d.name,
            description: d.description,
            confidence: d.confidence.value(),
            category: d.category,
            red_flags: d.red_flags,
            recommended_tests: d.recommended_tests,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRes {
    pub diagnoses: Vec<DiagnosisRes>,
    pub follow_up_questions: Vec<String>,
    pub red_flags: Vec<String>,
    pub recommended_tests: Vec<String>,
    #[schema(maximum = 100)]
    pub overall_confidence: u8,
    /// `model`, `model_unstructured` or `demo`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl From<AnalysisOutcome> for AnalysisRes {
    fn from(outcome: AnalysisOutcome) -> Self {
        let result = outcome.result;
        AnalysisRes {
            diagnoses: result.diagnoses.into_iter().map(DiagnosisRes::from).collect(),
            follow_up_questions: result.follow_up_questions,
            red_flags: result.red_flags,
            recommended_tests: result.recommended_tests,
            overall_confidence: result.overall_confidence.value(),
            source: outcome.source.as_str().to_string(),
            session_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlotHealthRes {
    pub connected: bool,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SlotStatus> for SlotHealthRes {
    fn from(s: SlotStatus) -> Self {
        SlotHealthRes {
            connected: s.connected,
            model: s.model,
            error: s.error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelsHealthRes {
    pub reasoning: SlotHealthRes,
    pub chat: SlotHealthRes,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    pub checked_at: String,
    pub models: ModelsHealthRes,
}
