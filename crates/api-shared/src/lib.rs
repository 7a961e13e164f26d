//! # API Shared
//!
//! Shared definitions for the triage APIs.
//!
//! Contains:
//! - Request/response DTOs (`dto` module) with OpenAPI schemas
//! - Conversions between core triage types and their wire form
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the workspace binary for common functionality.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
