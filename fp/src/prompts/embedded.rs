//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Workout and diet plan generation prompt
pub const PLAN: &str = include_str!("../../prompts/plan.pmt");

/// Follow-up question prompt, answered against an existing plan
pub const CHAT: &str = include_str!("../../prompts/chat.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "plan" => {
            debug!("get_embedded: matched plan");
            Some(PLAN)
        }
        "chat" => {
            debug!("get_embedded: matched chat");
            Some(CHAT)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
