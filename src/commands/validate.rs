//! Validate command - checks a device directory, writes nothing.

use anyhow::Result;
use std::path::Path;

use super::{absolute_dir, load_device_spec};
use crate::config::Config;
use crate::validate::{validate, ValidationEnv, ValidationReport};

/// Execute the validate command.
pub fn cmd_validate(dir: &Path, config: &Config) -> Result<ValidationReport> {
    let dir = absolute_dir(dir)?;
    let spec = load_device_spec(&dir)?;

    let env = ValidationEnv::new(&dir, config);
    match validate(&spec, &env) {
        Ok(report) => {
            println!("[avs v] OK");
            Ok(report)
        }
        Err(e) => {
            println!("[avs v] FAILED");
            Err(e.into())
        }
    }
}
