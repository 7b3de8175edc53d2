//! Record of the files avs generated into a device directory.
//!
//! Persisted as `<gen_dir>/.avsstate`. `init` and `update` write it, `clean` reads
//! it to know what to delete.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::common::files::remove_file_if_exists;
use crate::loader::{save_spec, SpecError};

pub const STATE_FILE: &str = ".avsstate";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("no avs state in {} (run `avs init` or `avs update` first)", .dir.display())]
    NoState { dir: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed avs state {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't determine the working directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error(transparent)]
    Save(#[from] SpecError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvsState {
    pub gen_dir: PathBuf,
    pub generated_files: Vec<PathBuf>,
}

/// Outcome of a clean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub removed: Vec<PathBuf>,
    /// Listed but already gone.
    pub missing: Vec<PathBuf>,
    /// Listed but now a directory, left alone.
    pub skipped_dirs: Vec<PathBuf>,
}

pub fn state_path(gen_dir: &Path) -> PathBuf {
    gen_dir.join(STATE_FILE)
}

impl AvsState {
    /// Persist to `<gen_dir>/.avsstate`, replacing what was there.
    ///
    /// An empty `gen_dir` means the working directory.
    pub fn update(&mut self) -> Result<(), StateError> {
        if self.gen_dir.as_os_str().is_empty() || self.gen_dir.is_relative() {
            let cwd = std::env::current_dir().map_err(StateError::CurrentDir)?;
            self.gen_dir = cwd.join(&self.gen_dir);
        }
        save_spec(&*self, state_path(&self.gen_dir))?;
        Ok(())
    }

    pub fn load(gen_dir: &Path) -> Result<Self, StateError> {
        let path = state_path(gen_dir);
        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StateError::NoState {
                    dir: gen_dir.to_path_buf(),
                }
            } else {
                StateError::Read {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|source| StateError::Parse { path, source })
    }
}

/// Delete every file recorded for `gen_dir`.
///
/// Paths recorded under a different device directory (the directory was moved
/// or copied) are taken relative to `gen_dir`. Directories are kept. The state
/// file stays in `gen_dir`, with an empty file list, so a second clean reports
/// `NoState`.
pub fn clean(gen_dir: &Path) -> Result<CleanSummary, StateError> {
    let mut state = AvsState::load(gen_dir)?;
    if state.generated_files.is_empty() {
        return Err(StateError::NoState {
            dir: gen_dir.to_path_buf(),
        });
    }

    let recorded_dir = std::mem::replace(&mut state.gen_dir, gen_dir.to_path_buf());
    let mut summary = CleanSummary::default();
    for file in state.generated_files.drain(..) {
        let file = match file.strip_prefix(&recorded_dir) {
            Ok(rel) => gen_dir.join(rel),
            Err(_) => file,
        };
        if file.is_dir() {
            summary.skipped_dirs.push(file);
            continue;
        }
        match remove_file_if_exists(&file) {
            Ok(true) => summary.removed.push(file),
            Ok(false) => summary.missing.push(file),
            Err(source) => return Err(StateError::Remove { path: file, source }),
        }
    }

    state.update()?;
    Ok(summary)
}
