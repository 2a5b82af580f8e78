//! fitplan - personalized fitness and diet planner
//!
//! CLI entry point for the interactive session and one-shot commands.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use fitplan::cli::{Cli, Command, PromptCommand, read_text_arg};
use fitplan::config::Config;
use fitplan::conversation::ConversationState;
use fitplan::domain::PlanRequest;
use fitplan::export::export_plan;
use fitplan::llm::create_client;
use fitplan::planner::{GenerationSettings, Planner};
use fitplan::prompts::{Fields, PromptLoader, TemplateId};
use fitplan::repl;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fitplan")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("fitplan.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Build a planner with a live client; the credential is resolved here, once
fn build_planner(config: &Config) -> Result<Planner> {
    let api_key = config.llm.api_key()?;
    let llm = create_client(&config.llm, api_key).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;
    Ok(Planner::new(
        PromptLoader::from_dir(config.prompts.dir.as_deref()),
        llm,
        GenerationSettings::from(&config.llm),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Pick up GROQ_API_KEY and friends from a .env file, if there is one
    match dotenv::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => debug!(error = %e, "main: no .env file loaded"),
    }

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    info!("fitplan loaded config: model={}", config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None | Some(Command::Session) => {
            debug!("main: launching interactive session");
            let planner = build_planner(&config)?;
            repl::run_interactive(&config, planner).await
        }
        Some(Command::Generate { goals, export }) => {
            debug!(?export, "main: matched Generate command");
            let request = goals.into_request()?;
            let planner = build_planner(&config)?;
            cmd_generate(&planner, &request, export).await
        }
        Some(Command::Prompt { template }) => {
            debug!(?template, "main: matched Prompt command");
            cmd_prompt(&config, template)
        }
    }
}

/// Generate one plan, print it, optionally export it
async fn cmd_generate(planner: &Planner, request: &PlanRequest, export: Option<PathBuf>) -> Result<()> {
    debug!("cmd_generate: called");
    let mut state = ConversationState::new();

    eprintln!("{}", "AI is generating your plan...".dimmed());
    let plan = planner.generate_plan(&mut state, request).await?;
    println!("{}", plan);

    if let Some(path) = export {
        export_plan(&plan, &path)?;
        eprintln!("{} Plan saved to {}", "✓".green(), path.display());
    }
    Ok(())
}

/// Render a prompt to stdout without a client or credential
fn cmd_prompt(config: &Config, template: PromptCommand) -> Result<()> {
    debug!("cmd_prompt: called");
    let loader = PromptLoader::from_dir(config.prompts.dir.as_deref());
    let prompt = match template {
        PromptCommand::Plan { goals } => {
            let request = goals.into_request()?;
            loader.render(TemplateId::Plan, &request.to_fields())?
        }
        PromptCommand::Chat { plan, question } => {
            let fields = Fields::new().with("plan", read_text_arg(&plan)?).with("question", question);
            loader.render(TemplateId::Chat, &fields)?
        }
    };
    print!("{}", prompt);
    Ok(())
}
