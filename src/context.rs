//! Per-invocation generation context.

use std::path::{Path, PathBuf};

use crate::state::AvsState;

/// Where a command generates into, and what it has written so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenContext {
    /// Absolute device directory.
    pub gen_dir: PathBuf,
    /// Written files, in generation order.
    pub generated: Vec<PathBuf>,
}

impl GenContext {
    pub fn new(gen_dir: &Path) -> Self {
        Self {
            gen_dir: gen_dir.to_path_buf(),
            generated: Vec::new(),
        }
    }

    /// Absolute path of a file named relative to the device directory.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.gen_dir.join(name)
    }

    pub fn record(&mut self, path: PathBuf) {
        self.generated.push(path);
    }

    pub fn into_state(self) -> AvsState {
        AvsState {
            gen_dir: self.gen_dir,
            generated_files: self.generated,
        }
    }
}
