use crate::gateway::ModelSlot;

#[derive(Debug, thiserror::Error)]
pub enum DxError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{slot} model unavailable: {reason}")]
    ModelUnavailable { slot: ModelSlot, reason: String },
}

impl DxError {
    pub(crate) fn unavailable(slot: ModelSlot, reason: impl Into<String>) -> Self {
        DxError::ModelUnavailable {
            slot,
            reason: reason.into(),
        }
    }
}

impl From<dx_types::TextError> for DxError {
    fn from(err: dx_types::TextError) -> Self {
        DxError::InvalidInput(err.to_string())
    }
}

pub type DxResult<T> = std::result::Result<T, DxError>;
