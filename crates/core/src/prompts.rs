//! Prompt rendering.
//!
//! Every builder here is a pure function of its arguments: no I/O, no hidden state, and the
//! output is never empty. Symptom text is embedded verbatim.

use crate::domain::{Mode, PatientInfo};

const ANALYSIS_SCHEMA: &str = r#"{
  "diagnoses": [
    {
      "name": "string",
      "description": "string",
      "confidence": 0-100,
      "category": "string",
      "redFlags": ["string"],
      "recommendedTests": ["string"]
    }
  ],
  "overallConfidence": 0-100,
  "redFlags": ["string"],
  "recommendedTests": ["string"]
}"#;

fn framing(mode: Mode) -> &'static str {
    match mode {
        Mode::Doctor => {
            "You are assisting a physician as a clinical decision support tool. \
             Produce a ranked differential diagnosis using precise clinical terminology."
        }
        Mode::Patient => {
            "You are providing patient education. Use simple language a non-medical reader \
             can follow and avoid jargon."
        }
    }
}

fn patient_line(patient_info: Option<&PatientInfo>) -> Option<String> {
    let info = patient_info.filter(|i| !i.is_empty())?;
    let mut parts = Vec::new();
    if let Some(age) = info.age {
        parts.push(format!("Age: {age}"));
    }
    if let Some(gender) = info.gender {
        parts.push(format!("Gender: {gender}"));
    }
    Some(parts.join(", "))
}

fn push_symptoms(prompt: &mut String, symptoms: &str, patient_info: Option<&PatientInfo>) {
    prompt.push_str("Symptoms:\n");
    prompt.push_str(symptoms);
    prompt.push_str("\n\n");
    if let Some(line) = patient_line(patient_info) {
        prompt.push_str("Patient: ");
        prompt.push_str(&line);
        prompt.push_str("\n\n");
    }
}

/// Render the differential-diagnosis prompt for the reasoning model.
pub fn build_analysis_prompt(
    symptoms: &str,
    mode: Mode,
    patient_info: Option<&PatientInfo>,
) -> String {
    let mut prompt = String::with_capacity(1024 + symptoms.len());
    prompt.push_str(framing(mode));
    prompt.push_str("\n\n");
    push_symptoms(&mut prompt, symptoms, patient_info);

    prompt.push_str(
        "List the most likely diagnoses, most likely first, each with a confidence from 0 to 100, \
         a category, red flags that warrant urgent attention, and recommended tests.\n",
    );
    match mode {
        Mode::Doctor => prompt.push_str(
            "Include the standard ICD-10 code reference in each diagnosis description.\n",
        ),
        Mode::Patient => prompt.push_str(
            "Write every description in plain language and explain any medical term you use.\n",
        ),
    }

    prompt.push_str(
        "\nYour reply MUST be a single JSON object matching this schema exactly, \
         with no other text:\n",
    );
    prompt.push_str(ANALYSIS_SCHEMA);
    prompt.push('\n');
    prompt
}

/// Render the follow-up question prompt for the chat model.
pub fn build_follow_up_questions_prompt(
    symptoms: &str,
    mode: Mode,
    patient_info: Option<&PatientInfo>,
) -> String {
    let mut prompt = String::with_capacity(512 + symptoms.len());
    prompt.push_str(framing(mode));
    prompt.push_str("\n\n");
    push_symptoms(&mut prompt, symptoms, patient_info);

    prompt.push_str("Suggest 3 to 6 follow-up questions that would narrow down the cause.\n");
    match mode {
        Mode::Doctor => prompt.push_str(
            "Focus on onset and timing, relevant medical and family history, current medications \
             and allergies, and findings that would change management.\n",
        ),
        Mode::Patient => prompt.push_str(
            "Ask in plain, friendly language about how the symptoms feel, when they happen and \
             what makes them better or worse.\n",
        ),
    }
    prompt.push_str(
        "\nReply with a JSON array of strings only, for example [\"question one?\", \"question two?\"].\n",
    );
    prompt
}

/// Render the patient-education prompt for one condition.
pub fn build_education_prompt(diagnosis: &str) -> String {
    format!(
        "You are providing patient education. Explain the condition \"{diagnosis}\" in simple \
         language for a non-medical reader.\n\
         Cover: what it is, common causes, what can be done at home, and warning signs that mean \
         the reader should seek medical care promptly.\n\
         Keep it under 250 words and do not give a definitive diagnosis.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    #[test]
    fn analysis_prompt_is_deterministic() {
        let info = PatientInfo {
            age: Some(34),
            gender: Some(Gender::Female),
        };
        let a = build_analysis_prompt("fever and rash", Mode::Doctor, Some(&info));
        let b = build_analysis_prompt("fever and rash", Mode::Doctor, Some(&info));
        assert_eq!(a, b);

        let q1 = build_follow_up_questions_prompt("cough", Mode::Patient, None);
        let q2 = build_follow_up_questions_prompt("cough", Mode::Patient, None);
        assert_eq!(q1, q2);
    }

    #[test]
    fn doctor_prompt_frames_clinical_support_and_codes() {
        let prompt = build_analysis_prompt("chest pain", Mode::Doctor, None);
        assert!(prompt.contains("clinical decision support"));
        assert!(prompt.contains("ICD-10"));
        assert!(prompt.contains("chest pain"));
        assert!(prompt.contains("\"overallConfidence\""));
        assert!(prompt.contains("\"recommendedTests\""));
        assert!(prompt.contains("MUST be a single JSON object"));
    }

    #[test]
    fn patient_prompt_uses_plain_language() {
        let prompt = build_analysis_prompt("tummy ache", Mode::Patient, None);
        assert!(prompt.contains("patient education"));
        assert!(prompt.contains("simple language"));
        assert!(!prompt.contains("ICD-10"));
    }

    #[test]
    fn patient_attributes_are_optional() {
        let info = PatientInfo {
            age: Some(70),
            gender: Some(Gender::Male),
        };
        let with = build_analysis_prompt("dizzy", Mode::Doctor, Some(&info));
        assert!(with.contains("Age: 70, Gender: male"));

        let without = build_analysis_prompt("dizzy", Mode::Doctor, Some(&PatientInfo::default()));
        assert!(!without.contains("Patient:"));
    }

    #[test]
    fn prompts_are_never_empty_even_for_blank_symptoms() {
        assert!(!build_analysis_prompt("", Mode::Patient, None).is_empty());
        assert!(!build_follow_up_questions_prompt("", Mode::Doctor, None).is_empty());
        assert!(!build_education_prompt("").is_empty());
    }

    #[test]
    fn follow_up_prompt_requests_json_array() {
        let prompt = build_follow_up_questions_prompt("headache", Mode::Doctor, None);
        assert!(prompt.contains("3 to 6"));
        assert!(prompt.contains("JSON array of strings"));
        assert!(prompt.contains("medications"));
    }
}
