//! fitplan - personalized workout and diet plans from a hosted LLM
//!
//! Collects a user's goals, renders them into a prompt, asks an
//! OpenAI-compatible chat completions service for a plan, and answers
//! follow-up questions about that plan.
//!
//! # Core Concepts
//!
//! - **Templates**: fixed prompts with named fields, rendered all-or-nothing
//! - **One call per interaction**: a single user message in, the first completion out
//! - **Session state**: one current plan plus its chat transcript, owned by the session
//!
//! # Modules
//!
//! - [`prompts`] - Template engine (plan and chat prompts)
//! - [`llm`] - Completion client trait and Chat Completions implementation
//! - [`conversation`] - Per-session plan and transcript
//! - [`planner`] - Render, complete, record
//! - [`export`] - Plan text export
//! - [`config`] - Configuration types and loading
//! - [`cli`] / [`repl`] - Command-line and interactive front ends

pub mod cli;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod export;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod repl;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use conversation::{ChatTurn, ConversationState, Phase, StateError};
pub use domain::{Gender, PlanRequest};
pub use export::{DEFAULT_EXPORT_FILE, export_plan};
pub use llm::{ChatCompletionsClient, CompletionClient, CompletionError, CompletionRequest, Role, create_client};
pub use planner::{GenerationSettings, Planner, PlannerError};
pub use prompts::{FieldValue, Fields, PromptLoader, TemplateError, TemplateId};
