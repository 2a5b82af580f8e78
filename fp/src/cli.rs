//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{Gender, PlanRequest};

/// fitplan - personalized fitness and diet planner
#[derive(Parser)]
#[command(
    name = "fp",
    about = "Personalized workout and diet plans from a hosted LLM, with follow-up chat",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive session: enter goals, get a plan, ask questions about it (default)
    Session,

    /// Generate a plan once and print it
    Generate {
        #[command(flatten)]
        goals: GoalArgs,

        /// Also write the plan to this file
        #[arg(short, long, value_name = "PATH")]
        export: Option<PathBuf>,
    },

    /// Render a prompt without contacting the service
    Prompt {
        #[command(subcommand)]
        template: PromptCommand,
    },
}

/// Which prompt to render
#[derive(Debug, Subcommand)]
pub enum PromptCommand {
    /// The plan generation prompt
    Plan {
        #[command(flatten)]
        goals: GoalArgs,
    },

    /// The follow-up question prompt
    Chat {
        /// Plan text, or @FILE to read it from a file
        #[arg(long)]
        plan: String,

        /// Question about the plan
        #[arg(long)]
        question: String,
    },
}

/// The plan request as command-line flags, with the form's defaults
#[derive(Debug, Clone, Args)]
pub struct GoalArgs {
    /// Workout type (e.g. Fat Loss, Bulking)
    #[arg(long, default_value = "")]
    pub workout_type: String,

    /// Diet type (e.g. Keto, Mediterranean)
    #[arg(long, default_value = "")]
    pub diet_type: String,

    /// Current weight in kg
    #[arg(long, default_value_t = 75.0)]
    pub current_weight: f64,

    /// Target weight in kg
    #[arg(long, default_value_t = 70.0)]
    pub target_weight: f64,

    /// Dietary restrictions (e.g. No gluten)
    #[arg(long, default_value = "")]
    pub dietary_restrictions: String,

    /// Health conditions (e.g. Asthma)
    #[arg(long, default_value = "")]
    pub health_conditions: String,

    /// Age in years
    #[arg(long, default_value_t = 30)]
    pub age: u32,

    /// Gender
    #[arg(long, value_enum, default_value_t = Gender::Male)]
    pub gender: Gender,

    /// Plan duration in weeks
    #[arg(short = 'w', long = "weeks", default_value_t = 4)]
    pub number_of_weeks: u32,

    /// Any other instructions
    #[arg(long, default_value = "")]
    pub comments: String,
}

impl GoalArgs {
    /// Convert to a validated plan request
    pub fn into_request(self) -> eyre::Result<PlanRequest> {
        debug!(?self, "GoalArgs::into_request: called");
        let request = PlanRequest {
            workout_type: self.workout_type,
            diet_type: self.diet_type,
            current_weight: self.current_weight,
            target_weight: self.target_weight,
            dietary_restrictions: self.dietary_restrictions,
            health_conditions: self.health_conditions,
            age: self.age,
            gender: self.gender,
            number_of_weeks: self.number_of_weeks,
            comments: self.comments,
        };
        request
            .validate()
            .map_err(|problems| eyre::eyre!("Invalid input: {}", problems.join("; ")))?;
        Ok(request)
    }
}

/// Read `@FILE` arguments from disk, pass anything else through
pub fn read_text_arg(value: &str) -> eyre::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => {
            debug!(%path, "read_text_arg: reading file");
            std::fs::read_to_string(path).map_err(|e| eyre::eyre!("Failed to read {}: {}", path, e))
        }
        None => Ok(value.to_string()),
    }
}
