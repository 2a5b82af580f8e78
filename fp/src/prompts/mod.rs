//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for plan generation and follow-up chat.
//!
//! Template loading chain:
//! 1. `{prompts.dir}/{name}.pmt` (override, when configured)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution. Rendering is strict and
//! unescaped: values are interpolated literally and every required field must be present.

pub mod embedded;
mod error;
mod fields;
mod loader;

pub use error::TemplateError;
pub use fields::{FieldValue, Fields};
pub use loader::{CHAT_FIELDS, PLAN_FIELDS, PromptLoader, TemplateId};
