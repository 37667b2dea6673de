//! External AI insight client - advisory project health summaries.
//!
//! This crate turns a project snapshot into a short executive summary by
//! forwarding a fixed prompt template to an external text-generation
//! endpoint.
//!
//! # Safety Principle
//!
//! The generated text is strictly advisory. It never feeds back into budgets,
//! statuses, or workflow decisions, and a failed generation is replaced by a
//! static fallback string rather than surfaced as an error.

pub mod generator;
pub mod llm;

pub use generator::{build_insight_prompt, InsightGenerator, EMPTY_INSIGHT, FALLBACK_INSIGHT};
pub use llm::{HttpLlmClient, LlmClient};
