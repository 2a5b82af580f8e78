//! Interactive planning session

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::conversation::ConversationState;
use crate::domain::{AGE_RANGE, Gender, PlanRequest, WEEKS_RANGE, WEIGHT_RANGE_KG};
use crate::export::export_plan;
use crate::llm::Role;
use crate::planner::Planner;

/// One user's session: a planner plus the state it owns
pub struct PlanSession {
    planner: Planner,
    state: ConversationState,
    export_file: PathBuf,
}

/// Outcome of reading one line
enum Input {
    Line(String),
    /// Ctrl+C or Ctrl+D
    Abort,
}

impl PlanSession {
    pub fn new(planner: Planner, export_file: PathBuf) -> Self {
        debug!(?export_file, "PlanSession::new: called");
        Self {
            planner,
            state: ConversationState::new(),
            export_file,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Run the session main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        if !self.new_plan(&mut rl).await? {
            println!("Goodbye!");
            return Ok(());
        }

        loop {
            let input = match read_line(&mut rl, &format!("{} ", ">".bright_green()))? {
                Input::Line(line) => line,
                Input::Abort => break,
            };
            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            let _ = rl.add_history_entry(input);

            if input.starts_with('/') {
                match self.handle_slash_command(input, &mut rl).await? {
                    SlashResult::Continue => continue,
                    SlashResult::Quit => break,
                }
            } else {
                self.ask(input).await;
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("{}", "Personalized Fitness & Diet Planner".bright_cyan().bold());
        println!("Model: {}", self.planner.settings().model);
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Collect goals and generate a plan
    ///
    /// Returns false if the user aborted the form.
    async fn new_plan(&mut self, rl: &mut DefaultEditor) -> Result<bool> {
        let Some(request) = collect_request(rl)? else {
            return Ok(false);
        };

        println!();
        println!("{}", "AI is generating your plan...".dimmed());
        match self.planner.generate_plan(&mut self.state, &request).await {
            Ok(plan) => {
                println!("{}", "Your personalized plan is ready!".bright_green());
                println!();
                println!("{}", "Your Generated Plan".bright_cyan().bold());
                println!("{}", plan);
                println!();
                println!("{}", "Ask me anything about your plan!".bright_cyan());
            }
            Err(e) => {
                warn!(error = %e, "new_plan: generation failed");
                println!("{} {}", "Error:".red(), e);
                println!("Type {} to try again", "/new".yellow());
            }
        }
        println!();
        Ok(true)
    }

    /// Send a follow-up question; failures are reported and the session continues
    async fn ask(&mut self, question: &str) {
        if !self.state.has_plan() {
            println!("{}", "No plan yet. Type /new to create one.".yellow());
            return;
        }

        println!("{}", "AI is typing...".dimmed());
        match self.planner.ask(&mut self.state, question).await {
            Ok(answer) => {
                println!();
                println!("{}", answer);
            }
            Err(e) => {
                warn!(error = %e, "ask: failed");
                println!("{} {}", "Error:".red(), e);
            }
        }
        println!();
    }

    /// Handle slash commands
    async fn handle_slash_command(&mut self, input: &str, rl: &mut DefaultEditor) -> Result<SlashResult> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                Ok(SlashResult::Continue)
            }
            "/quit" | "/q" | "/exit" => Ok(SlashResult::Quit),
            "/plan" | "/p" => {
                match self.state.current_plan() {
                    Some(plan) if self.state.has_plan() => println!("{}\n", plan),
                    _ => println!("{}", "No plan yet.".dimmed()),
                }
                Ok(SlashResult::Continue)
            }
            "/history" => {
                self.print_history();
                Ok(SlashResult::Continue)
            }
            "/export" => {
                let path = parts.get(1).map(|p| PathBuf::from(*p)).unwrap_or_else(|| self.export_file.clone());
                self.export(&path);
                Ok(SlashResult::Continue)
            }
            "/new" | "/n" => {
                if self.new_plan(rl).await? {
                    Ok(SlashResult::Continue)
                } else {
                    Ok(SlashResult::Quit)
                }
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                Ok(SlashResult::Continue)
            }
        }
    }

    fn export(&self, path: &Path) {
        match self.state.current_plan() {
            Some(plan) if self.state.has_plan() => match export_plan(&plan, path) {
                Ok(()) => println!("{} Plan saved to {}", "✓".green(), path.display()),
                Err(e) => println!("{} {:#}", "Error:".red(), e),
            },
            _ => println!("{}", "No plan to export.".dimmed()),
        }
    }

    /// Print help message
    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:16} Show this help", "/help".yellow());
        println!("  {:16} Show the current plan", "/plan".yellow());
        println!("  {:16} Show questions and answers so far", "/history".yellow());
        println!("  {:16} Save the plan as a text file", "/export [path]".yellow());
        println!("  {:16} Enter new goals and generate a new plan", "/new".yellow());
        println!("  {:16} Exit", "/quit".yellow());
        println!();
        println!("Anything else is sent as a question about your plan.");
        println!();
    }

    /// Print conversation history
    fn print_history(&self) {
        let history = self.state.history();
        if history.is_empty() {
            println!("{}", "No conversation history.".dimmed());
            return;
        }

        println!();
        println!("{}", "Conversation History:".bright_cyan());
        for (i, turn) in history.iter().enumerate() {
            let role = match turn.role {
                Role::User => "You".bright_green(),
                Role::Assistant => "Assistant".bright_blue(),
            };
            println!("  {}. {}: {}", i + 1, role, turn.content);
        }
        println!();
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Result<Input> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Input::Line(line)),
        Err(ReadlineError::Interrupted) => {
            println!("^C");
            Ok(Input::Abort)
        }
        Err(ReadlineError::Eof) => {
            println!();
            Ok(Input::Abort)
        }
        Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
    }
}

/// Walk the user through every plan field; `None` if they abort
fn collect_request(rl: &mut DefaultEditor) -> Result<Option<PlanRequest>> {
    println!("{}", "Enter Your Goals".bright_cyan().bold());
    let defaults = PlanRequest::default();

    macro_rules! field {
        ($e:expr) => {
            match $e? {
                Some(v) => v,
                None => return Ok(None),
            }
        };
    }

    let request = PlanRequest {
        workout_type: field!(ask_text(rl, "Workout Type (e.g., Fat Loss, Bulking)")),
        diet_type: field!(ask_text(rl, "Diet Type (e.g., Keto, Mediterranean)")),
        current_weight: field!(ask_parsed(rl, "Current Weight (kg)", defaults.current_weight, WEIGHT_RANGE_KG)),
        target_weight: field!(ask_parsed(rl, "Target Weight (kg)", defaults.target_weight, WEIGHT_RANGE_KG)),
        dietary_restrictions: field!(ask_text(rl, "Dietary Restrictions (e.g., No gluten)")),
        health_conditions: field!(ask_text(rl, "Health Conditions (e.g., Asthma)")),
        age: field!(ask_parsed(rl, "Age", defaults.age, AGE_RANGE)),
        gender: field!(ask_gender(rl, defaults.gender)),
        number_of_weeks: field!(ask_parsed(rl, "Plan Duration (weeks)", defaults.number_of_weeks, WEEKS_RANGE)),
        comments: field!(ask_text(rl, "Any other instructions")),
    };

    Ok(Some(request))
}

fn ask_text(rl: &mut DefaultEditor, label: &str) -> Result<Option<String>> {
    match read_line(rl, &format!("{}: ", label.bright_white()))? {
        Input::Line(line) => Ok(Some(line.trim().to_string())),
        Input::Abort => Ok(None),
    }
}

/// Ask until the answer parses and falls in `range`; empty input takes `default`
fn ask_parsed<T>(rl: &mut DefaultEditor, label: &str, default: T, range: RangeInclusive<T>) -> Result<Option<T>>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let prompt = format!(
        "{} [{}-{}, default {}]: ",
        label.bright_white(),
        range.start(),
        range.end(),
        default
    );
    loop {
        let line = match read_line(rl, &prompt)? {
            Input::Line(line) => line,
            Input::Abort => return Ok(None),
        };
        let line = line.trim();
        if line.is_empty() {
            return Ok(Some(default));
        }
        match line.parse::<T>() {
            Ok(value) if range.contains(&value) => return Ok(Some(value)),
            _ => println!(
                "{} Enter a number between {} and {}",
                "?".yellow(),
                range.start(),
                range.end()
            ),
        }
    }
}

fn ask_gender(rl: &mut DefaultEditor, default: Gender) -> Result<Option<Gender>> {
    let options: Vec<&str> = Gender::ALL.iter().map(Gender::as_str).collect();
    let prompt = format!("{} [{}, default {}]: ", "Gender".bright_white(), options.join("/"), default);
    loop {
        let line = match read_line(rl, &prompt)? {
            Input::Line(line) => line,
            Input::Abort => return Ok(None),
        };
        if line.trim().is_empty() {
            return Ok(Some(default));
        }
        match line.parse::<Gender>() {
            Ok(gender) => return Ok(Some(gender)),
            Err(e) => println!("{} {}", "?".yellow(), e),
        }
    }
}
