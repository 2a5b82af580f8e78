//! One user interaction at a time: render, complete, record
//!
//! State is only mutated after the completion resolves, so a failed request
//! leaves the session exactly as it was.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::LlmConfig;
use crate::conversation::{ConversationState, StateError};
use crate::domain::PlanRequest;
use crate::llm::{CompletionClient, CompletionError, CompletionRequest, Role};
use crate::prompts::{Fields, PromptLoader, TemplateError, TemplateId};

/// Errors from a planner interaction, one variant per failing component
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Model and sampling parameters for both call sites
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub plan_max_tokens: u32,
    pub chat_max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

impl From<&LlmConfig> for GenerationSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            plan_max_tokens: config.plan_max_tokens,
            chat_max_tokens: config.chat_max_tokens,
        }
    }
}

impl GenerationSettings {
    fn request(&self, prompt: String, max_tokens: u32) -> CompletionRequest {
        CompletionRequest {
            prompt,
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens,
            top_p: self.top_p,
        }
    }
}

/// Ties the template engine and completion client to a session's state
pub struct Planner {
    prompts: PromptLoader,
    llm: Arc<dyn CompletionClient>,
    settings: GenerationSettings,
}

impl Planner {
    pub fn new(prompts: PromptLoader, llm: Arc<dyn CompletionClient>, settings: GenerationSettings) -> Self {
        debug!(?settings, "Planner::new: called");
        Self { prompts, llm, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Render the plan prompt without sending it
    pub fn plan_prompt(&self, request: &PlanRequest) -> Result<String, PlannerError> {
        Ok(self.prompts.render(TemplateId::Plan, &request.to_fields())?)
    }

    /// Render the chat prompt for `question` against `plan` without sending it
    pub fn chat_prompt(&self, plan: &str, question: &str) -> Result<String, PlannerError> {
        let fields = Fields::new().with("plan", plan).with("question", question);
        Ok(self.prompts.render(TemplateId::Chat, &fields)?)
    }

    /// Generate a new plan and make it the session's current plan
    ///
    /// The transcript is cleared on success.
    pub async fn generate_plan(
        &self,
        state: &mut ConversationState,
        request: &PlanRequest,
    ) -> Result<String, PlannerError> {
        debug!(workout_type = %request.workout_type, weeks = request.number_of_weeks, "generate_plan: called");
        let prompt = self.plan_prompt(request)?;

        let plan = self
            .llm
            .complete(self.settings.request(prompt, self.settings.plan_max_tokens))
            .await?;

        info!("Generated plan ({} chars)", plan.len());
        state.start_new_plan(plan.clone());
        Ok(plan)
    }

    /// Answer a follow-up question about the current plan
    ///
    /// On success the question and answer are appended as a user turn then an assistant turn.
    pub async fn ask(&self, state: &mut ConversationState, question: &str) -> Result<String, PlannerError> {
        debug!(question_len = question.len(), "ask: called");
        let plan = match state.current_plan() {
            Some(plan) if state.has_plan() => plan,
            _ => return Err(StateError::NoActivePlan.into()),
        };

        let prompt = self.chat_prompt(&plan, question)?;

        let answer = self
            .llm
            .complete(self.settings.request(prompt, self.settings.chat_max_tokens))
            .await?;

        info!("Answered question ({} chars)", answer.len());
        state.append_turn(Role::User, question)?;
        state.append_turn(Role::Assistant, answer.clone())?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use crate::llm::client::mock::MockCompletionClient;

    fn request() -> PlanRequest {
        PlanRequest {
            workout_type: "Fat Loss".to_string(),
            diet_type: "Keto".to_string(),
            current_weight: 80.0,
            target_weight: 70.0,
            dietary_restrictions: "None".to_string(),
            health_conditions: "None".to_string(),
            age: 28,
            gender: Gender::Male,
            number_of_weeks: 4,
            comments: String::new(),
        }
    }

    fn planner(mock: Arc<MockCompletionClient>) -> Planner {
        Planner::new(PromptLoader::embedded_only(), mock, GenerationSettings::default())
    }

    #[tokio::test]
    async fn test_generate_plan_forwards_prompt_and_stores_plan() {
        let mock = Arc::new(MockCompletionClient::new(vec!["PLAN_TEXT"]));
        let planner = planner(mock.clone());
        let mut state = ConversationState::new();

        let plan = planner.generate_plan(&mut state, &request()).await.unwrap();
        assert_eq!(plan, "PLAN_TEXT");
        assert_eq!(state.current_plan().as_deref(), Some("PLAN_TEXT"));
        assert!(state.history().is_empty());

        let sent = mock.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].max_tokens, 3072);
        assert_eq!(sent[0].temperature, 1.0);
        assert_eq!(sent[0].top_p, 1.0);
        assert_eq!(sent[0].model, "meta-llama/llama-4-scout-17b-16e-instruct");
        assert!(sent[0].prompt.contains("4 weeks"));
        assert!(sent[0].prompt.contains("Keto"));
        assert!(sent[0].prompt.contains("80 kg"));
    }

    #[tokio::test]
    async fn test_ask_appends_question_then_answer() {
        let mock = Arc::new(MockCompletionClient::new(vec!["PLAN_TEXT", "2 rest days"]));
        let planner = planner(mock.clone());
        let mut state = ConversationState::new();

        planner.generate_plan(&mut state, &request()).await.unwrap();
        let answer = planner.ask(&mut state, "How many rest days?").await.unwrap();
        assert_eq!(answer, "2 rest days");

        let history = state.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "How many rest days?");
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].content, "2 rest days");

        let sent = mock.requests();
        assert_eq!(sent[1].max_tokens, 1024);
        assert!(sent[1].prompt.contains("Plan: PLAN_TEXT"));
        assert!(sent[1].prompt.contains("Question: How many rest days?"));
    }

    #[tokio::test]
    async fn test_ask_without_plan_is_state_error() {
        let mock = Arc::new(MockCompletionClient::new(vec!["unused"]));
        let planner = planner(mock.clone());
        let mut state = ConversationState::new();

        let err = planner.ask(&mut state, "Hello?").await.unwrap_err();
        assert!(matches!(err, PlannerError::State(StateError::NoActivePlan)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_previous_plan() {
        let mock = Arc::new(MockCompletionClient::with_outcomes(vec![
            Ok("PLAN 1".to_string()),
            Ok("answer".to_string()),
            Err("API error 500: overloaded".to_string()),
        ]));
        let planner = planner(mock);
        let mut state = ConversationState::new();

        planner.generate_plan(&mut state, &request()).await.unwrap();
        planner.ask(&mut state, "Q").await.unwrap();

        let err = planner.generate_plan(&mut state, &request()).await.unwrap_err();
        assert!(matches!(err, PlannerError::Completion(_)));
        assert_eq!(err.to_string(), "API error 500: overloaded");
        assert_eq!(state.current_plan().as_deref(), Some("PLAN 1"));
        assert_eq!(state.history().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_answer_records_nothing() {
        let mock = Arc::new(MockCompletionClient::with_outcomes(vec![
            Ok("PLAN".to_string()),
            Err("Network error: connection refused".to_string()),
        ]));
        let planner = planner(mock);
        let mut state = ConversationState::new();

        planner.generate_plan(&mut state, &request()).await.unwrap();
        let err = planner.ask(&mut state, "Q").await.unwrap_err();
        assert!(matches!(err, PlannerError::Completion(_)));
        assert!(state.history().is_empty());
    }

    #[tokio::test]
    async fn test_regenerating_clears_history() {
        let mock = Arc::new(MockCompletionClient::new(vec!["PLAN 1", "A1", "PLAN 2"]));
        let planner = planner(mock);
        let mut state = ConversationState::new();

        planner.generate_plan(&mut state, &request()).await.unwrap();
        planner.ask(&mut state, "Q1").await.unwrap();
        planner.generate_plan(&mut state, &request()).await.unwrap();

        assert_eq!(state.current_plan().as_deref(), Some("PLAN 2"));
        assert!(state.history().is_empty());
    }
}
