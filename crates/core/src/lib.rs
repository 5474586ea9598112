//! # DX Core
//!
//! Core logic for the symptom analysis service.
//!
//! This crate turns a free-text symptom description into a ranked differential:
//! - prompt rendering for the two model slots (`prompts`)
//! - the remote completion call (`gateway`)
//! - best-effort recovery of structure from model replies (`parser`)
//! - a deterministic keyword-matched fallback (`fallback`)
//! - the orchestration that ties them together (`analysis`)
//!
//! **No API concerns**: HTTP routing, wire formats and persistence belong in `api-rest`,
//! `api-shared` or the caller.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod parser;
pub mod prompts;

pub use analysis::{AnalysisOutcome, AnalysisSource, ModelHealth, SlotStatus, SymptomAnalysisService};
pub use config::{GatewayConfig, ModelSlotConfig};
pub use constants::DEFAULT_REST_ADDR;
pub use domain::{AnalysisResult, DiagnosisCandidate, Gender, Mode, PatientInfo, SymptomInput};
pub use error::{DxError, DxResult};
pub use gateway::{HttpModelGateway, ModelGateway, ModelSlot, OfflineGateway};
pub use parser::ParsedAnalysis;

pub use dx_types::{Confidence, NonEmptyText};
