//! Update command - regenerates a device directory from its config.json.

use anyhow::Result;
use std::path::Path;

use super::{absolute_dir, generate_and_record, load_device_spec};
use crate::config::Config;
use crate::state::AvsState;
use crate::validate::{validate, ValidationEnv};

/// Execute the update command.
///
/// Everything is regenerated. Nothing is written unless validation passes.
pub fn cmd_update(dir: &Path, config: &Config) -> Result<AvsState> {
    let dir = absolute_dir(dir)?;
    let spec = load_device_spec(&dir)?;

    let env = ValidationEnv::new(&dir, config);
    if let Err(e) = validate(&spec, &env) {
        println!("[avs u] FAILED: fix the validation errors first");
        return Err(e.into());
    }

    let state = generate_and_record(&spec, &dir)?;

    println!("[avs u] OK: {} files generated", state.generated_files.len());
    Ok(state)
}
