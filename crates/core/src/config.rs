//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the model gateway.
//! Nothing in request handling reads process-wide environment variables, which keeps credentials
//! out of global state and makes the services trivial to construct in tests.

use crate::constants::{
    DEFAULT_CHAT_MODEL, DEFAULT_COMPLETION_ENDPOINT, DEFAULT_MODEL_TIMEOUT_SECS,
    DEFAULT_REASONING_MODEL, MAX_MODEL_TIMEOUT_SECS,
};
use crate::gateway::ModelSlot;
use crate::{DxError, DxResult};
use std::time::Duration;

pub const ENV_REASONING_ENDPOINT: &str = "DX_REASONING_ENDPOINT";
pub const ENV_REASONING_MODEL: &str = "DX_REASONING_MODEL";
pub const ENV_REASONING_API_KEY: &str = "DX_REASONING_API_KEY";
pub const ENV_CHAT_ENDPOINT: &str = "DX_CHAT_ENDPOINT";
pub const ENV_CHAT_MODEL: &str = "DX_CHAT_MODEL";
pub const ENV_CHAT_API_KEY: &str = "DX_CHAT_API_KEY";
pub const ENV_MODEL_TIMEOUT_SECS: &str = "DX_MODEL_TIMEOUT_SECS";

/// Connection settings for one logical model slot.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelSlotConfig {
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ModelSlotConfig {
    /// Create a slot configuration.
    ///
    /// The endpoint must be an `http(s)://` URL and the model id must not be blank. A blank API
    /// key is treated as absent.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> DxResult<Self> {
        let endpoint = endpoint.into().trim().to_string();
        let model = model.into().trim().to_string();

        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(DxError::Config(format!(
                "model endpoint must be an http(s) URL, got {endpoint:?}"
            )));
        }
        if model.is_empty() {
            return Err(DxError::Config("model identifier cannot be empty".into()));
        }

        Ok(Self {
            endpoint,
            model,
            api_key: non_blank(api_key),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

// Credentials must never end up in logs.
impl std::fmt::Debug for ModelSlotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSlotConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Gateway configuration resolved at startup: one slot per model role plus a request timeout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    reasoning: ModelSlotConfig,
    chat: ModelSlotConfig,
    timeout: Duration,
}

impl GatewayConfig {
    pub fn new(reasoning: ModelSlotConfig, chat: ModelSlotConfig, timeout: Duration) -> Self {
        Self {
            reasoning,
            chat,
            timeout,
        }
    }

    /// Resolve the configuration from a key lookup (normally the process environment).
    ///
    /// The chat slot inherits the reasoning slot's endpoint and API key when its own are unset,
    /// so a single-provider deployment only needs the reasoning variables.
    pub fn from_lookup<F>(lookup: F) -> DxResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        let reasoning_endpoint =
            get(ENV_REASONING_ENDPOINT).unwrap_or_else(|| DEFAULT_COMPLETION_ENDPOINT.into());
        let reasoning_key = get(ENV_REASONING_API_KEY);

        let reasoning = ModelSlotConfig::new(
            reasoning_endpoint.clone(),
            get(ENV_REASONING_MODEL).unwrap_or_else(|| DEFAULT_REASONING_MODEL.into()),
            reasoning_key.clone(),
        )?;
        let chat = ModelSlotConfig::new(
            get(ENV_CHAT_ENDPOINT).unwrap_or(reasoning_endpoint),
            get(ENV_CHAT_MODEL).unwrap_or_else(|| DEFAULT_CHAT_MODEL.into()),
            get(ENV_CHAT_API_KEY).or(reasoning_key),
        )?;
        let timeout = model_timeout_from_env_value(lookup(ENV_MODEL_TIMEOUT_SECS))?;

        Ok(Self::new(reasoning, chat, timeout))
    }

    /// Resolve the configuration from the process environment.
    pub fn from_env() -> DxResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn slot(&self, slot: ModelSlot) -> &ModelSlotConfig {
        match slot {
            ModelSlot::Reasoning => &self.reasoning,
            ModelSlot::Chat => &self.chat,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Parse the model request timeout from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn model_timeout_from_env_value(value: Option<String>) -> DxResult<Duration> {
    let Some(value) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS));
    };

    let secs: u64 = value.parse().map_err(|_| {
        DxError::Config(format!(
            "{ENV_MODEL_TIMEOUT_SECS} must be a whole number of seconds, got {value:?}"
        ))
    })?;
    if secs == 0 || secs > MAX_MODEL_TIMEOUT_SECS {
        return Err(DxError::Config(format!(
            "{ENV_MODEL_TIMEOUT_SECS} must be between 1 and {MAX_MODEL_TIMEOUT_SECS}, got {secs}"
        )));
    }

    Ok(Duration::from_secs(secs))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
