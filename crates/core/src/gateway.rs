//! Model gateway.
//!
//! Sends one prompt to a remote chat-completion endpoint and returns the raw reply text. Two
//! logical slots exist: [`ModelSlot::Reasoning`] for the diagnosis prompt and [`ModelSlot::Chat`]
//! for follow-up questions and patient education.
//!
//! The gateway never retries. Every failure comes back as [`DxError::ModelUnavailable`] and the
//! orchestrator decides what to do about it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{GatewayConfig, ModelSlotConfig};
use crate::constants::{COMPLETION_MAX_TOKENS, COMPLETION_TEMPERATURE, COMPLETION_TOP_P};
use crate::{DxError, DxResult};

/// Which of the two configured models a call goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSlot {
    Reasoning,
    Chat,
}

impl std::fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSlot::Reasoning => f.write_str("reasoning"),
            ModelSlot::Chat => f.write_str("chat"),
        }
    }
}

/// Anything that can turn a prompt into raw model text.
///
/// Implemented over HTTP by [`HttpModelGateway`]; tests and offline tools supply their own.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send `prompt` as a single user message to the model behind `slot`.
    async fn complete(&self, prompt: &str, slot: ModelSlot) -> DxResult<String>;

    /// Model identifier configured for `slot`, for status reporting.
    fn model_name(&self, slot: ModelSlot) -> &str;

    /// Check that the model behind `slot` is reachable and answering.
    async fn health_check(&self, slot: ModelSlot) -> DxResult<()> {
        self.complete("Reply with the single word: ok", slot)
            .await
            .map(|_| ())
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

fn build_request<'a>(slot: &'a ModelSlotConfig, prompt: &'a str) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model: slot.model(),
        messages: [ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: COMPLETION_TEMPERATURE,
        max_tokens: COMPLETION_MAX_TOKENS,
        top_p: COMPLETION_TOP_P,
    }
}

/// Summarise a non-success HTTP status without echoing large provider bodies.
fn describe_http_error(status: u16, body: &str) -> String {
    const MAX_BODY: usize = 200;
    let body: String = body.trim().chars().take(MAX_BODY).collect();
    let kind = match status {
        401 | 403 => "authentication failed",
        404 => "model or endpoint not found",
        408 | 504 => "request timed out",
        429 => "rate limited or quota exhausted",
        400 => "request rejected",
        500..=599 => "provider error",
        _ => "unexpected status",
    };
    format!("{kind} (HTTP {status}): {body}")
}

/// OpenAI-compatible chat-completion gateway over `reqwest`.
pub struct HttpModelGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpModelGateway {
    /// Build the gateway and its HTTP client from startup configuration.
    pub fn new(config: GatewayConfig) -> DxResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DxError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ModelGateway for HttpModelGateway {
    async fn complete(&self, prompt: &str, slot: ModelSlot) -> DxResult<String> {
        let slot_cfg = self.config.slot(slot);
        tracing::debug!(
            %slot,
            model = slot_cfg.model(),
            prompt_chars = prompt.len(),
            "sending completion request"
        );

        let mut request = self
            .client
            .post(slot_cfg.endpoint())
            .json(&build_request(slot_cfg, prompt));
        if let Some(key) = slot_cfg.api_key() {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DxError::unavailable(slot, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DxError::unavailable(slot, e.to_string()))?;

        if !status.is_success() {
            return Err(DxError::unavailable(
                slot,
                describe_http_error(status.as_u16(), &body),
            ));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            DxError::unavailable(slot, format!("unreadable completion response: {e}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| DxError::unavailable(slot, "completion returned no content"))?;

        tracing::debug!(%slot, reply_chars = content.len(), "completion received");
        Ok(content)
    }

    fn model_name(&self, slot: ModelSlot) -> &str {
        self.config.slot(slot).model()
    }
}

/// Gateway with no model behind it; every call fails with `ModelUnavailable`.
///
/// Running the orchestrator over this yields demo fallback results without any network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGateway;

#[async_trait]
impl ModelGateway for OfflineGateway {
    async fn complete(&self, _prompt: &str, slot: ModelSlot) -> DxResult<String> {
        Err(DxError::unavailable(slot, "running offline"))
    }

    fn model_name(&self, _slot: ModelSlot) -> &str {
        "offline"
    }
}
