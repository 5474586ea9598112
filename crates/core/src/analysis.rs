//! Symptom analysis orchestrator.
//!
//! Composes prompt building, the model gateway, response parsing and the demo fallback engine.
//! A model failure is never surfaced from here: the fallback engine takes over and the caller
//! still receives a complete result.
//!
//! `analyze` runs `Prompting -> AwaitingModel -> Parsing | Fallback -> Done`; parsing is total, so
//! every path ends in `Done` with a result.

use std::sync::Arc;

use crate::domain::{AnalysisResult, SymptomInput};
use crate::fallback;
use crate::gateway::{ModelGateway, ModelSlot};
use crate::parser::{self, ParsedAnalysis};
use crate::prompts;

/// Where an analysis result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    /// The reasoning model replied with recoverable JSON.
    Model,
    /// The reasoning model replied but its structure could not be recovered.
    ModelUnstructured,
    /// The model call failed and the demo engine produced the result.
    Demo,
}

impl AnalysisSource {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisSource::Model => "model",
            AnalysisSource::ModelUnstructured => "model_unstructured",
            AnalysisSource::Demo => "demo",
        }
    }
}

/// An analysis result together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub source: AnalysisSource,
}

/// Reachability of one model slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotStatus {
    pub connected: bool,
    pub model: String,
    pub error: Option<String>,
}

/// Reachability of both model slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHealth {
    pub reasoning: SlotStatus,
    pub chat: SlotStatus,
}

impl ModelHealth {
    pub fn all_connected(&self) -> bool {
        self.reasoning.connected && self.chat.connected
    }
}

/// Stateless orchestration over an injected [`ModelGateway`].
///
/// Cloning is cheap and clones share the gateway; concurrent calls share nothing else.
#[derive(Clone)]
pub struct SymptomAnalysisService {
    gateway: Arc<dyn ModelGateway>,
}

impl SymptomAnalysisService {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Run the diagnosis flow and report where the result came from.
    pub async fn analyze_detailed(&self, input: &SymptomInput) -> AnalysisOutcome {
        let prompt = prompts::build_analysis_prompt(
            &input.symptoms,
            input.mode,
            input.patient_info.as_ref(),
        );

        match self.gateway.complete(&prompt, ModelSlot::Reasoning).await {
            Ok(raw) => match parser::parse_analysis(&raw) {
                ParsedAnalysis::Structured(result) => {
                    tracing::info!(
                        mode = %input.mode,
                        diagnoses = result.diagnoses.len(),
                        "analysis parsed from model reply"
                    );
                    AnalysisOutcome {
                        result,
                        source: AnalysisSource::Model,
                    }
                }
                ParsedAnalysis::Generic(result) => {
                    tracing::warn!(mode = %input.mode, "model reply had no usable JSON object");
                    AnalysisOutcome {
                        result,
                        source: AnalysisSource::ModelUnstructured,
                    }
                }
            },
            Err(e) => {
                tracing::warn!("analysis falling back to demo engine: {}", e);
                AnalysisOutcome {
                    result: fallback::demo_analysis(&input.symptoms, input.mode),
                    source: AnalysisSource::Demo,
                }
            }
        }
    }

    /// Analyse the symptoms. Always returns a result.
    pub async fn analyze(&self, input: &SymptomInput) -> AnalysisResult {
        self.analyze_detailed(input).await.result
    }

    /// Ask the chat model for follow-up questions. Never returns an empty list.
    pub async fn generate_follow_up_questions(&self, input: &SymptomInput) -> Vec<String> {
        let prompt = prompts::build_follow_up_questions_prompt(
            &input.symptoms,
            input.mode,
            input.patient_info.as_ref(),
        );

        match self.gateway.complete(&prompt, ModelSlot::Chat).await {
            Ok(raw) => parser::parse_follow_up_questions(&raw),
            Err(e) => {
                tracing::warn!("follow-up questions falling back to demo engine: {}", e);
                fallback::demo_follow_up_questions(&input.symptoms, input.mode)
            }
        }
    }

    /// Analyse, then fetch follow-up questions only when the analysis came back without any.
    ///
    /// Makes at most two sequential model calls. Demo results already carry questions, so a
    /// failed reasoning call costs no second request.
    pub async fn analyze_with_follow_ups(&self, input: &SymptomInput) -> AnalysisOutcome {
        let mut outcome = self.analyze_detailed(input).await;
        if outcome.result.follow_up_questions.is_empty() {
            outcome.result.follow_up_questions = self.generate_follow_up_questions(input).await;
        }
        outcome
    }

    /// Plain-language education text about one condition, from the chat model.
    pub async fn generate_education(&self, diagnosis: &str) -> String {
        let prompt = prompts::build_education_prompt(diagnosis);

        match self.gateway.complete(&prompt, ModelSlot::Chat).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => fallback::demo_education(diagnosis),
            Err(e) => {
                tracing::warn!("education falling back to canned text: {}", e);
                fallback::demo_education(diagnosis)
            }
        }
    }

    /// Probe both model slots.
    pub async fn check_models(&self) -> ModelHealth {
        ModelHealth {
            reasoning: self.check_slot(ModelSlot::Reasoning).await,
            chat: self.check_slot(ModelSlot::Chat).await,
        }
    }

    async fn check_slot(&self, slot: ModelSlot) -> SlotStatus {
        let model = self.gateway.model_name(slot).to_string();
        match self.gateway.health_check(slot).await {
            Ok(()) => SlotStatus {
                connected: true,
                model,
                error: None,
            },
            Err(e) => {
                tracing::warn!("health check failed: {}", e);
                SlotStatus {
                    connected: false,
                    model,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mode, PatientInfo};
    use crate::{DxError, DxResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies per slot; `None` makes the slot fail.
    struct StubGateway {
        reasoning: Option<String>,
        chat: Option<String>,
        calls: Mutex<Vec<ModelSlot>>,
    }

    impl StubGateway {
        fn new(reasoning: Option<&str>, chat: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                reasoning: reasoning.map(str::to_string),
                chat: chat.map(str::to_string),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Self::new(None, None)
        }

        fn calls(&self) -> Vec<ModelSlot> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl ModelGateway for StubGateway {
        async fn complete(&self, _prompt: &str, slot: ModelSlot) -> DxResult<String> {
            self.calls.lock().expect("lock").push(slot);
            let reply = match slot {
                ModelSlot::Reasoning => &self.reasoning,
                ModelSlot::Chat => &self.chat,
            };
            reply.clone().ok_or(DxError::ModelUnavailable {
                slot,
                reason: "stubbed failure".into(),
            })
        }

        fn model_name(&self, slot: ModelSlot) -> &str {
            match slot {
                ModelSlot::Reasoning => "stub-reasoner",
                ModelSlot::Chat => "stub-chat",
            }
        }
    }

    fn service(gateway: Arc<StubGateway>) -> SymptomAnalysisService {
        SymptomAnalysisService::new(gateway)
    }

    const STRUCTURED_REPLY: &str = r#"Here is the result: {"diagnoses":[{"name":"X","description":"d","confidence":90,"category":"c","redFlags":[],"recommendedTests":[]}],"overallConfidence":90,"redFlags":[],"recommendedTests":[]} Thanks."#;

    #[tokio::test]
    async fn failing_gateway_uses_febrile_demo_pattern() {
        let svc = service(StubGateway::failing());
        let input = SymptomInput::new("fever and joint pain", Mode::Doctor);

        let outcome = svc.analyze_detailed(&input).await;
        assert_eq!(outcome.source, AnalysisSource::Demo);

        let result = outcome.result;
        assert_eq!(result.diagnoses.len(), 3);
        assert_eq!(result.diagnoses[0].name, "Viral Fever");
        let mean = result
            .diagnoses
            .iter()
            .map(|d| f64::from(d.confidence.value()))
            .sum::<f64>()
            / 3.0;
        assert_eq!(f64::from(result.overall_confidence.value()), mean.round());
        assert!(!result.follow_up_questions.is_empty());
    }

    #[tokio::test]
    async fn structured_reply_is_used_as_is() {
        let gateway = StubGateway::new(Some(STRUCTURED_REPLY), None);
        let svc = service(gateway.clone());

        let outcome = svc
            .analyze_detailed(&SymptomInput::new("anything", Mode::Patient))
            .await;
        assert_eq!(outcome.source, AnalysisSource::Model);
        assert_eq!(outcome.result.diagnoses.len(), 1);
        assert_eq!(outcome.result.diagnoses[0].name, "X");
        assert_eq!(gateway.calls(), vec![ModelSlot::Reasoning]);
    }

    #[tokio::test]
    async fn prose_reply_is_generic_not_demo() {
        let svc = service(StubGateway::new(Some("It is probably nothing serious."), None));

        let outcome = svc
            .analyze_detailed(&SymptomInput::new("headache", Mode::Doctor))
            .await;
        assert_eq!(outcome.source, AnalysisSource::ModelUnstructured);
        assert_eq!(outcome.result.diagnoses[0].name, "Analysis Available");
        assert_eq!(outcome.result.overall_confidence.value(), 75);
    }

    #[tokio::test]
    async fn follow_ups_are_fetched_when_analysis_has_none() {
        let gateway = StubGateway::new(
            Some(STRUCTURED_REPLY),
            Some(r#"["How long has it lasted?", "Any fever?"]"#),
        );
        let svc = service(gateway.clone());

        let outcome = svc
            .analyze_with_follow_ups(&SymptomInput::new("cough", Mode::Doctor))
            .await;
        assert_eq!(
            outcome.result.follow_up_questions,
            vec!["How long has it lasted?".to_string(), "Any fever?".to_string()]
        );
        assert_eq!(gateway.calls(), vec![ModelSlot::Reasoning, ModelSlot::Chat]);
    }

    #[tokio::test]
    async fn demo_analysis_needs_no_second_call() {
        let gateway = StubGateway::failing();
        let svc = service(gateway.clone());

        let outcome = svc
            .analyze_with_follow_ups(&SymptomInput::new("chest pain", Mode::Patient))
            .await;
        assert_eq!(outcome.source, AnalysisSource::Demo);
        assert!(!outcome.result.follow_up_questions.is_empty());
        assert_eq!(gateway.calls(), vec![ModelSlot::Reasoning]);
    }

    #[tokio::test]
    async fn follow_up_generation_never_empty() {
        let failing = service(StubGateway::failing());
        let input = SymptomInput::new("HEADACHE today", Mode::Patient);
        assert!(!failing.generate_follow_up_questions(&input).await.is_empty());

        let unhelpful = service(StubGateway::new(None, Some("No idea.")));
        assert_eq!(unhelpful.generate_follow_up_questions(&input).await.len(), 3);
    }

    #[tokio::test]
    async fn results_are_well_formed_for_any_input() {
        let inputs = ["", "   ", "fever", "Chest pain & SHORTNESS OF BREATH", "🤒🤕", "x".repeat(5000).as_str()]
            .map(str::to_string);
        let replies = [None, Some(STRUCTURED_REPLY), Some("prose"), Some(r#"{"diagnoses":[{"confidence":900}],"overallConfidence":-5}"#)];

        for reply in replies {
            let svc = service(StubGateway::new(reply, reply));
            for symptoms in &inputs {
                for mode in [Mode::Doctor, Mode::Patient] {
                    let input = SymptomInput::new(symptoms.clone(), mode).with_patient_info(
                        PatientInfo {
                            age: Some(30),
                            gender: None,
                        },
                    );
                    let result = svc.analyze(&input).await;
                    assert!(result.overall_confidence.value() <= 100);
                    assert!(result.diagnoses.iter().all(|d| d.confidence.value() <= 100));
                }
            }
        }
    }

    #[tokio::test]
    async fn education_falls_back_to_canned_text() {
        let svc = service(StubGateway::new(None, Some("  Migraine is a headache disorder.  ")));
        assert_eq!(
            svc.generate_education("Migraine").await,
            "Migraine is a headache disorder."
        );

        let svc = service(StubGateway::failing());
        assert!(svc.generate_education("Migraine").await.starts_with("About Migraine"));
    }

    #[tokio::test]
    async fn model_health_reports_each_slot() {
        let svc = service(StubGateway::new(Some("ok"), None));
        let health = svc.check_models().await;

        assert!(health.reasoning.connected);
        assert_eq!(health.reasoning.model, "stub-reasoner");
        assert!(!health.chat.connected);
        assert!(health.chat.error.as_deref().unwrap_or_default().contains("chat"));
        assert!(!health.all_connected());
    }
}
