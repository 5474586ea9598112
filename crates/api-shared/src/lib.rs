//! # API Shared
//!
//! Shared utilities and definitions for the DX APIs.
//!
//! Contains:
//! - JSON wire types with OpenAPI schemas (`wire` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and `dx-cli` so both speak the same JSON.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
