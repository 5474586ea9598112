//! Constants used throughout the DX core crate.
//!
//! Model request parameters are fixed for every completion call; defaults for the two model
//! slots apply when the corresponding environment variables are unset.

/// Default OpenAI-compatible chat completion endpoint.
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model identifier for the reasoning slot (diagnosis).
pub const DEFAULT_REASONING_MODEL: &str = "gpt-4o";

/// Default model identifier for the chat slot (follow-up questions, patient education).
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default per-request timeout for model calls, in seconds.
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// Upper bound accepted for `DX_MODEL_TIMEOUT_SECS`.
pub const MAX_MODEL_TIMEOUT_SECS: u64 = 600;

/// Sampling temperature sent with every completion.
pub const COMPLETION_TEMPERATURE: f64 = 0.3;

/// Maximum output tokens requested per completion.
pub const COMPLETION_MAX_TOKENS: u32 = 2000;

/// Nucleus sampling probability sent with every completion.
pub const COMPLETION_TOP_P: f64 = 0.9;

/// Name of the synthetic candidate returned when a model reply has no recoverable structure.
pub const GENERIC_DIAGNOSIS_NAME: &str = "Analysis Available";

/// Confidence attached to the synthetic generic candidate and its result.
pub const GENERIC_CONFIDENCE: i64 = 75;

/// Most follow-up questions kept from heuristic extraction or the demo engine.
pub const MAX_FOLLOW_UP_QUESTIONS: usize = 5;
