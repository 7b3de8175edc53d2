//! Show command - displays information.

use anyhow::Result;
use std::path::Path;

use super::absolute_dir;
use crate::config::Config;
use crate::state::AvsState;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// Show the files tracked for a device directory
    State,
}

/// Execute the show command.
pub fn cmd_show(dir: &Path, target: ShowTarget, config: &Config) -> Result<()> {
    match target {
        ShowTarget::Config => {
            config.print();
        }
        ShowTarget::State => {
            let dir = absolute_dir(dir)?;
            let state = AvsState::load(&dir)?;
            println!("Device directory: {}", state.gen_dir.display());
            if state.generated_files.is_empty() {
                println!("  (no generated files)");
            }
            for file in &state.generated_files {
                let marker = if file.exists() { "✓" } else { "✗" };
                println!("  {} {}", marker, file.display());
            }
        }
    }
    Ok(())
}
