//! Clean command - removes the files avs generated.

use anyhow::Result;
use std::path::Path;

use super::absolute_dir;
use crate::state::{clean, CleanSummary};

/// Execute the clean command.
///
/// Only files listed in `.avsstate` are removed. config.json, overlays and
/// hand-written files stay.
pub fn cmd_clean(dir: &Path) -> Result<CleanSummary> {
    let dir = absolute_dir(dir)?;
    let summary = clean(&dir)?;

    for path in &summary.removed {
        println!("Removing {}...", path.display());
    }
    for path in &summary.missing {
        eprintln!("  [WARN] {} was already gone", path.display());
    }
    for path in &summary.skipped_dirs {
        eprintln!("  [WARN] {} is a directory, kept", path.display());
    }

    println!("[avs c] OK: {} files removed", summary.removed.len());
    Ok(summary)
}
