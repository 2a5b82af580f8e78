//! Per-session conversation state
//!
//! Holds the current plan and the follow-up chat transcript. A session either has
//! no plan, or exactly one current plan plus the turns asked about it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm::Role;

/// One message in the follow-up chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Errors from conversation state operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("No active plan: generate a plan before asking questions")]
    NoActivePlan,
}

/// Which half of the session lifecycle we are in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoPlan,
    HasPlan,
}

/// Plan plus its chat transcript, owned by one session
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    plan: Option<String>,
    turns: Vec<ChatTurn>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the plan and clear the transcript
    pub fn start_new_plan(&mut self, plan_text: impl Into<String>) {
        let plan_text = plan_text.into();
        debug!(plan_len = plan_text.len(), dropped_turns = self.turns.len(), "start_new_plan: called");
        self.plan = Some(plan_text);
        self.turns.clear();
    }

    /// Append a turn; fails without touching state when there is no plan
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) -> Result<(), StateError> {
        debug!(%role, "append_turn: called");
        if self.phase() == Phase::NoPlan {
            debug!("append_turn: no active plan");
            return Err(StateError::NoActivePlan);
        }
        self.turns.push(ChatTurn::new(role, content));
        Ok(())
    }

    /// Snapshot of the current plan
    pub fn current_plan(&self) -> Option<String> {
        self.plan.clone()
    }

    /// Snapshot of the transcript, oldest first
    pub fn history(&self) -> Vec<ChatTurn> {
        self.turns.clone()
    }

    /// An empty plan string counts as no plan
    pub fn phase(&self) -> Phase {
        match self.plan.as_deref() {
            Some(plan) if !plan.is_empty() => Phase::HasPlan,
            _ => Phase::NoPlan,
        }
    }

    pub fn has_plan(&self) -> bool {
        self.phase() == Phase::HasPlan
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }
}
