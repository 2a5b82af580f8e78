//! Integration tests for fitplan
//!
//! These tests drive the public API end to end with a stubbed completion client.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use fitplan::{
    ChatTurn, CompletionClient, CompletionError, CompletionRequest, ConversationState, Gender, GenerationSettings,
    Phase, PlanRequest, Planner, PlannerError, PromptLoader, Role, StateError, TemplateId, export_plan,
};
use tempfile::TempDir;

/// Returns canned replies in order and keeps every request
struct StubClient {
    replies: Mutex<Vec<Result<String, String>>>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl StubClient {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().rev().map(|r| Ok(r.to_string())).collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(vec![Err(message.to_string())]),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.seen.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(CompletionError::new(message)),
            None => Err(CompletionError::new("stub exhausted")),
        }
    }
}

fn keto_request() -> PlanRequest {
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

fn planner(client: Arc<StubClient>) -> Planner {
    Planner::new(PromptLoader::embedded_only(), client, GenerationSettings::default())
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[test]
fn test_plan_prompt_contains_request_values() {
    let prompt = PromptLoader::embedded_only()
        .render(TemplateId::Plan, &keto_request().to_fields())
        .expect("render should succeed");

    assert!(prompt.contains("4 weeks"));
    assert!(prompt.contains("Keto"));
    assert!(prompt.contains("80 kg"));
    assert!(prompt.contains("70 kg"));
    assert!(prompt.contains("Age: 28"));
    assert!(prompt.contains("Gender: Male"));
}

#[test]
fn test_plan_prompt_without_age_fails() {
    let mut fields = keto_request().to_fields();
    fields.remove("age");

    let err = PromptLoader::embedded_only()
        .render(TemplateId::Plan, &fields)
        .expect_err("missing age must fail");
    assert_eq!(err.missing_field(), Some("age"));
}

#[tokio::test]
async fn test_generate_then_chat() {
    let client = StubClient::new(&["PLAN_TEXT", "2 rest days"]);
    let planner = planner(client.clone());
    let mut state = ConversationState::new();

    planner.generate_plan(&mut state, &keto_request()).await.unwrap();
    assert_eq!(state.current_plan().as_deref(), Some("PLAN_TEXT"));
    assert!(state.history().is_empty());
    assert_eq!(state.phase(), Phase::HasPlan);

    planner.ask(&mut state, "How many rest days?").await.unwrap();
    assert_eq!(
        state.history(),
        vec![
            ChatTurn::new(Role::User, "How many rest days?"),
            ChatTurn::new(Role::Assistant, "2 rest days"),
        ]
    );

    let seen = client.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].max_tokens, 3072);
    assert_eq!(seen[1].max_tokens, 1024);
    assert!(seen.iter().all(|r| r.temperature == 1.0 && r.top_p == 1.0));
    assert!(seen[1].prompt.contains("PLAN_TEXT"));
}

#[tokio::test]
async fn test_manual_turns_after_stubbed_plan() {
    let planner = planner(StubClient::new(&["PLAN_TEXT"]));
    let mut state = ConversationState::new();
    planner.generate_plan(&mut state, &keto_request()).await.unwrap();

    state.append_turn(Role::User, "How many rest days?").unwrap();
    state.append_turn(Role::Assistant, "2 rest days").unwrap();

    let history = state.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], ChatTurn::user("How many rest days?"));
    assert_eq!(history[1], ChatTurn::assistant("2 rest days"));
}

#[tokio::test]
async fn test_completion_error_is_surfaced_and_state_kept() {
    let planner = planner(StubClient::failing("API error 401: Invalid API Key"));
    let mut state = ConversationState::new();

    let err = planner.generate_plan(&mut state, &keto_request()).await.unwrap_err();
    match err {
        PlannerError::Completion(e) => assert_eq!(e.message(), "API error 401: Invalid API Key"),
        other => panic!("expected completion error, got {:?}", other),
    }
    assert_eq!(state.phase(), Phase::NoPlan);
}

#[tokio::test]
async fn test_ask_before_plan() {
    let client = StubClient::new(&[]);
    let planner = planner(client.clone());
    let mut state = ConversationState::new();

    let err = planner.ask(&mut state, "Anything?").await.unwrap_err();
    assert!(matches!(err, PlannerError::State(StateError::NoActivePlan)));
    assert!(client.seen().is_empty());
}

#[tokio::test]
async fn test_export_current_plan() {
    let planner = planner(StubClient::new(&["Week 1: squats\nWeek 2: lunges\n"]));
    let mut state = ConversationState::new();
    planner.generate_plan(&mut state, &keto_request()).await.unwrap();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(fitplan::DEFAULT_EXPORT_FILE);
    export_plan(&state.current_plan().unwrap(), &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Week 1: squats\nWeek 2: lunges\n");
}
