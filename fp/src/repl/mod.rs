//! Interactive session for fitplan
//!
//! Prompts for the plan inputs, shows the generated plan, then answers
//! follow-up questions with slash commands for export and regeneration.

mod session;

pub use session::PlanSession;

use std::path::PathBuf;

use eyre::Result;

use crate::config::Config;
use crate::planner::Planner;

/// Run the interactive session
///
/// This is the main entry point for `fp` and `fp session`.
pub async fn run_interactive(config: &Config, planner: Planner) -> Result<()> {
    let mut session = PlanSession::new(planner, PathBuf::from(&config.export.file_name));
    session.run().await
}
