//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `init` - Scaffold a device directory from a template
//! - `validate` - Check a device directory without touching it
//! - `update` - Validate, then regenerate a device directory
//! - `clean` - Remove everything avs generated
//! - `show` - Display configuration or tracked state

pub mod clean;
pub mod init;
pub mod show;
pub mod update;
pub mod validate;

pub use clean::cmd_clean;
pub use init::cmd_init;
pub use show::cmd_show;
pub use update::cmd_update;
pub use validate::cmd_validate;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::context::GenContext;
use crate::generate::generate_all;
use crate::loader::load_spec;
use crate::overlay::merge_overlays;
use crate::spec::Spec;
use crate::state::AvsState;

/// Source of truth in every device directory.
pub const CONFIG_FILE: &str = "config.json";

/// `dir` made absolute against the working directory.
pub fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get working directory")?;
    Ok(cwd.join(dir))
}

/// Load `<dir>/config.json` and apply the overlays found next to it.
pub fn load_device_spec(dir: &Path) -> Result<Spec> {
    let path = dir.join(CONFIG_FILE);
    let mut spec = load_spec(&path)?;
    merge_overlays(&mut spec, dir);
    Ok(spec)
}

/// Generate every file for `spec` into `dir` and record them in `.avsstate`.
///
/// When generation fails partway, the files already written are still recorded,
/// along with whatever an earlier run recorded, so `clean` can remove them.
pub fn generate_and_record(spec: &Spec, dir: &Path) -> Result<AvsState> {
    let mut ctx = GenContext::new(dir);
    let result = generate_all(spec, &mut ctx);

    let mut state = ctx.into_state();
    if let Err(e) = result {
        if let Ok(previous) = AvsState::load(dir) {
            for file in previous.generated_files {
                if !state.generated_files.contains(&file) {
                    state.generated_files.push(file);
                }
            }
        }
        if let Err(save) = state.update() {
            eprintln!("  [WARN] Failed to record partial output: {}", save);
        }
        return Err(anyhow::Error::new(e).context(format!("Failed to generate {}", dir.display())));
    }

    state.update()?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::minimal_spec;
    use tempfile::TempDir;

    #[test]
    fn test_generate_and_record() {
        let temp = TempDir::new().unwrap();

        let state = generate_and_record(&minimal_spec(), temp.path()).unwrap();

        assert_eq!(state.generated_files.len(), 8);
        assert_eq!(AvsState::load(temp.path()).unwrap(), state);
    }

    #[test]
    fn test_partial_generation_is_recorded() {
        let temp = TempDir::new().unwrap();
        let mut spec = minimal_spec();
        generate_and_record(&spec, temp.path()).unwrap();
        spec.boot_image.rootfs_overlay.fstab.name = "../fstab.poplar".into();

        let err = generate_and_record(&spec, temp.path()).unwrap_err();

        assert!(err.to_string().contains("Failed to generate"));
        let state = AvsState::load(temp.path()).unwrap();
        // Seven files rewritten before the fstab, then the earlier fstab entry.
        assert_eq!(state.generated_files.len(), 8);
        assert_eq!(
            state.generated_files.last(),
            Some(&temp.path().join("fstab.poplar"))
        );
        assert!(state.generated_files.contains(&temp.path().join("device.mk")));
    }

    #[test]
    fn test_partial_generation_without_earlier_state() {
        let temp = TempDir::new().unwrap();
        let mut spec = minimal_spec();
        spec.boot_image.rootfs_overlay.fstab.name = "../fstab.poplar".into();

        assert!(generate_and_record(&spec, temp.path()).is_err());

        let state = AvsState::load(temp.path()).unwrap();
        assert_eq!(state.generated_files.len(), 7);
        assert!(state.generated_files.iter().all(|f| f.is_file()));
    }
}
