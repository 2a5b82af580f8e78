//! Plan export to a plain UTF-8 text file

use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use tracing::{debug, info};

/// File name offered when the user does not pick one
pub const DEFAULT_EXPORT_FILE: &str = "Your_Fitness_Plan.txt";

/// Write the full plan text to `path`, creating parent directories as needed
pub fn export_plan(plan: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!(?path, plan_len = plan.len(), "export_plan: called");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, plan).context(format!("Failed to write plan to {}", path.display()))?;
    info!("Exported plan to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_exact_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        let plan = "| Day | Exercise |\n|-----|----------|\n| 1 | Squats 🏋️ |\n";

        export_plan(plan, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), plan);
    }

    #[test]
    fn test_export_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plans").join("week1").join("plan.txt");

        export_plan("PLAN", &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.txt");

        export_plan("old plan that is longer", &path).unwrap();
        export_plan("new", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
