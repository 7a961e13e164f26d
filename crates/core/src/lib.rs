//! # Triage Core
//!
//! Core business logic for the symptom triage service.
//!
//! This crate turns free-text symptom descriptions into a structured triage result:
//! - Rule-based fallback classifier that never fails
//! - Optional AI analyzer behind the [`analyzer::PrimaryAnalyzer`] trait
//! - Dispatcher that picks a path, applies the emergency safety net and falls back on error
//! - Fixed multi-step conversational intake
//!
//! **No API concerns**: HTTP servers, request DTOs and CLI parsing belong in `api-rest`,
//! `api-shared` or `cli`.

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod dispatcher;
pub mod error;
pub mod keywords;
pub mod recommender;
pub mod types;
pub mod validation;

pub use classifier::classify;
pub use config::{EnvValues, TriageConfig};
pub use conversation::{
    compile_description, questions_for_step, start_conversation, ConversationOutcome,
    ConversationStep, Exchange, FinalAnalysis, Question, FINAL_STEP,
};
pub use dispatcher::{apply_safety_net, Dispatcher};
pub use error::{AnalyzerError, AnalyzerResult, ConfigError, ConfigResult};
pub use recommender::recommend_specialties;
pub use types::{SymptomInput, TriageResult, UnknownUrgency, Urgency};
