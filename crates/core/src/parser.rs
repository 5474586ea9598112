//! Response parsing.
//!
//! Language models wrap JSON in prose, drop fields and return numbers as strings. Both entry
//! points here are total: any input string yields a well-formed value and nothing panics.

use dx_types::Confidence;
use serde_json::{Map, Value};

use crate::constants::{GENERIC_CONFIDENCE, GENERIC_DIAGNOSIS_NAME, MAX_FOLLOW_UP_QUESTIONS};
use crate::domain::{AnalysisResult, DiagnosisCandidate};

/// Longest excerpt of an unstructured reply kept in the generic candidate's description.
const GENERIC_EXCERPT_CHARS: usize = 500;

/// Asked when a reply yields no usable questions at all.
pub const GENERIC_FOLLOW_UP_QUESTIONS: [&str; 3] = [
    "When did your symptoms start, and how long have they lasted?",
    "Have you noticed any other symptoms alongside these?",
    "Is there anything that triggers the symptoms or makes them better or worse?",
];

/// Outcome of parsing an analysis reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAnalysis {
    /// A JSON object was recovered and mapped field by field.
    Structured(AnalysisResult),
    /// The call succeeded but no structure could be recovered.
    Generic(AnalysisResult),
}

impl ParsedAnalysis {
    pub fn is_structured(&self) -> bool {
        matches!(self, ParsedAnalysis::Structured(_))
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            ParsedAnalysis::Structured(r) | ParsedAnalysis::Generic(r) => r,
        }
    }
}

/// Greedy span from the first `open` to the last `close`.
fn delimited_span(raw: &str, open: char, close: char) -> Option<&str> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    (end > start).then(|| &raw[start..=end])
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn confidence_of(value: Option<&Value>) -> Confidence {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(Confidence::from_f64).unwrap_or_default(),
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(Confidence::from_f64)
            .unwrap_or_default(),
        _ => Confidence::default(),
    }
}

fn candidate_from(obj: &Map<String, Value>) -> DiagnosisCandidate {
    DiagnosisCandidate {
        name: text_of(obj.get("name")),
        description: text_of(obj.get("description")),
        confidence: confidence_of(obj.get("confidence")),
        category: text_of(obj.get("category")),
        red_flags: string_list(obj.get("redFlags")),
        recommended_tests: string_list(obj.get("recommendedTests")),
    }
}

fn structured_from(obj: &Map<String, Value>) -> AnalysisResult {
    let diagnoses = match obj.get("diagnoses") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(candidate_from)
            .collect(),
        _ => Vec::new(),
    };

    AnalysisResult {
        diagnoses,
        follow_up_questions: Vec::new(),
        red_flags: string_list(obj.get("redFlags")),
        recommended_tests: string_list(obj.get("recommendedTests")),
        overall_confidence: confidence_of(obj.get("overallConfidence")),
    }
}

fn generic_from(raw: &str) -> AnalysisResult {
    let excerpt: String = raw.trim().chars().take(GENERIC_EXCERPT_CHARS).collect();
    let description = if excerpt.is_empty() {
        "The analysis completed but returned no readable detail.".to_string()
    } else {
        excerpt
    };
    let confidence = Confidence::saturating(GENERIC_CONFIDENCE);

    AnalysisResult {
        diagnoses: vec![DiagnosisCandidate {
            name: GENERIC_DIAGNOSIS_NAME.to_string(),
            description,
            confidence,
            category: "General".to_string(),
            red_flags: Vec::new(),
            recommended_tests: Vec::new(),
        }],
        follow_up_questions: Vec::new(),
        red_flags: Vec::new(),
        recommended_tests: Vec::new(),
        overall_confidence: confidence,
    }
}

/// Parse a diagnosis reply into an [`AnalysisResult`].
///
/// `follow_up_questions` is always left empty; filling it is the caller's business.
pub fn parse_analysis(raw: &str) -> ParsedAnalysis {
    let decoded = delimited_span(raw, '{', '}')
        .and_then(|span| serde_json::from_str::<Value>(span).ok());

    match decoded {
        Some(Value::Object(obj)) => ParsedAnalysis::Structured(structured_from(&obj)),
        _ => ParsedAnalysis::Generic(generic_from(raw)),
    }
}

/// Drop one leading list marker (`1.`, `2)`, `-`, `*`, `•`) followed by whitespace.
fn strip_enumeration(line: &str) -> &str {
    let line = line.trim();
    let after_number = line.trim_start_matches(|c: char| c.is_ascii_digit());
    let after_marker = if after_number.len() < line.len() {
        after_number.strip_prefix(&['.', ')'][..])
    } else {
        line.strip_prefix(&['-', '*', '•'][..])
    };
    let body = match after_marker {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest,
        _ => line,
    };
    body.trim_matches(|c: char| c == '"' || c == ',' || c.is_whitespace())
}

/// Parse a follow-up question reply. Never returns an empty list.
pub fn parse_follow_up_questions(raw: &str) -> Vec<String> {
    let from_json = delimited_span(raw, '[', ']')
        .and_then(|span| serde_json::from_str::<Value>(span).ok())
        .map(|v| string_list(Some(&v)))
        .unwrap_or_default();
    if !from_json.is_empty() {
        return from_json;
    }

    let from_lines: Vec<String> = raw
        .lines()
        .filter(|line| line.contains('?'))
        .map(strip_enumeration)
        .filter(|q| !q.is_empty())
        .take(MAX_FOLLOW_UP_QUESTIONS)
        .map(str::to_string)
        .collect();
    if !from_lines.is_empty() {
        return from_lines;
    }

    GENERIC_FOLLOW_UP_QUESTIONS
        .iter()
        .map(|q| q.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_object_from_surrounding_prose() {
        let raw = r#"Here is the result: {"diagnoses":[{"name":"X","description":"d","confidence":90,"category":"c","redFlags":[],"recommendedTests":[]}],"overallConfidence":90,"redFlags":[],"recommendedTests":[]} Thanks."#;

        let parsed = parse_analysis(raw);
        assert!(parsed.is_structured());
        let result = parsed.into_result();
        assert_eq!(result.diagnoses.len(), 1);
        assert_eq!(result.diagnoses[0].name, "X");
        assert_eq!(result.diagnoses[0].confidence.value(), 90);
        assert_eq!(result.overall_confidence.value(), 90);
        assert!(result.follow_up_questions.is_empty());
    }

    #[test]
    fn plain_prose_yields_generic_candidate() {
        let parsed = parse_analysis("The symptoms suggest a mild viral illness. Rest and fluids.");
        assert!(!parsed.is_structured());

        let result = parsed.into_result();
        assert_eq!(result.diagnoses.len(), 1);
        let only = &result.diagnoses[0];
        assert_eq!(only.name, "Analysis Available");
        assert_eq!(only.confidence.value(), 75);
        assert_eq!(only.category, "General");
        assert!(only.red_flags.is_empty());
        assert!(only.recommended_tests.is_empty());
        assert_eq!(result.overall_confidence.value(), 75);
    }

    #[test]
    fn malformed_json_falls_back_to_generic() {
        let parsed = parse_analysis(r#"{"diagnoses": [ {"name": "Flu", }"#);
        assert!(matches!(parsed, ParsedAnalysis::Generic(_)));

        let parsed = parse_analysis("} backwards {");
        assert!(matches!(parsed, ParsedAnalysis::Generic(_)));
    }

    #[test]
    fn missing_fields_default_defensively() {
        let result = parse_analysis(r#"{"diagnoses": "none"}"#).into_result();
        assert!(result.diagnoses.is_empty());
        assert!(result.red_flags.is_empty());
        assert!(result.recommended_tests.is_empty());
        assert_eq!(result.overall_confidence.value(), 0);

        let result = parse_analysis(r#"{"diagnoses":[{"name":"Flu"}, 7, "x"]}"#).into_result();
        assert_eq!(result.diagnoses.len(), 1);
        let flu = &result.diagnoses[0];
        assert_eq!(flu.name, "Flu");
        assert_eq!(flu.confidence.value(), 0);
        assert!(flu.description.is_empty());
        assert!(flu.red_flags.is_empty());
    }

    #[test]
    fn confidences_are_clamped_and_coerced() {
        let raw = r#"{"diagnoses":[
            {"name":"A","confidence":150},
            {"name":"B","confidence":-20},
            {"name":"C","confidence":"85%"},
            {"name":"D","confidence":72.6}
        ],"overallConfidence":"high"}"#;
        let result = parse_analysis(raw).into_result();
        let scores: Vec<u8> = result.diagnoses.iter().map(|d| d.confidence.value()).collect();
        assert_eq!(scores, vec![100, 0, 85, 73]);
        assert_eq!(result.overall_confidence.value(), 0);
    }

    #[test]
    fn follow_ups_from_json_array() {
        let raw = "Sure! [\"Any fever?\", \"  \", 3, \"Any travel?\"] Hope that helps.";
        assert_eq!(
            parse_follow_up_questions(raw),
            vec!["Any fever?".to_string(), "Any travel?".to_string()]
        );
    }

    #[test]
    fn follow_ups_from_enumerated_lines() {
        let raw = "1. What triggers it?\n2. How long?\nNo question here.";
        assert_eq!(
            parse_follow_up_questions(raw),
            vec!["What triggers it?".to_string(), "How long?".to_string()]
        );
    }

    #[test]
    fn enumeration_marker_removal_keeps_question_text() {
        let raw = "1. 24 hours after eating, is it worse?\n2) (Any) fever?\n- Any rash?\n* 3 days or longer?";
        assert_eq!(
            parse_follow_up_questions(raw),
            vec![
                "24 hours after eating, is it worse?".to_string(),
                "(Any) fever?".to_string(),
                "Any rash?".to_string(),
                "3 days or longer?".to_string(),
            ]
        );
    }

    #[test]
    fn unmarked_lines_are_left_intact() {
        assert_eq!(strip_enumeration("48 hours ago?"), "48 hours ago?");
        assert_eq!(strip_enumeration("1.5 days?"), "1.5 days?");
        assert_eq!(strip_enumeration("-Any fever?"), "-Any fever?");
    }

    #[test]
    fn follow_ups_heuristic_caps_at_five() {
        let raw = (1..=8)
            .map(|i| format!("{i}) Question {i}?"))
            .collect::<Vec<_>>()
            .join("\n");
        let questions = parse_follow_up_questions(&raw);
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0], "Question 1?");
        assert!(questions.iter().all(|q| q.ends_with('?')));
    }

    #[test]
    fn follow_ups_without_question_marks_use_generic_list() {
        let questions = parse_follow_up_questions("I cannot help with that.");
        assert_eq!(questions.len(), 3);
        assert_eq!(questions, GENERIC_FOLLOW_UP_QUESTIONS.map(String::from).to_vec());

        assert_eq!(parse_follow_up_questions("").len(), 3);
        assert_eq!(parse_follow_up_questions("[]").len(), 3);
    }

    #[test]
    fn parsers_are_total_on_odd_input() {
        for raw in ["", "{", "}", "[}", "{]", "\u{0}", "????", "{\"a\":[1,2,3]}"] {
            let result = parse_analysis(raw).into_result();
            assert!(result.overall_confidence.value() <= 100);
            assert!(!parse_follow_up_questions(raw).is_empty());
        }
    }
}
