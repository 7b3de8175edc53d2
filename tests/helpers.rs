//! Shared test utilities for avs tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use avs::config::Config;

/// Test environment with a scaffolded device directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Where vendor directories are created
    pub root: PathBuf,
    /// `<root>/acme/widget`
    pub device_dir: PathBuf,
}

impl TestEnv {
    /// Create an empty root; nothing is scaffolded yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let device_dir = root.join("acme/widget");

        Self {
            _temp_dir: temp_dir,
            root,
            device_dir,
        }
    }

    /// Create a root with `acme/widget` scaffolded from the bundled profile.
    pub fn scaffolded() -> Self {
        let env = Self::new();
        avs::commands::cmd_init(&env.root, "acme", "widget", None).expect("init failed");
        env
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.device_dir.join(name)
    }

    pub fn config_json(&self) -> String {
        fs::read_to_string(self.path("config.json")).expect("Failed to read config.json")
    }

    pub fn write(&self, name: &str, content: &str) {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write file");
    }
}

/// No Android tree, no optional checks: results don't depend on the host.
pub fn offline_config() -> Config {
    Config::default()
}

/// Every file under `dir`, relative, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .expect("walkdir escaped its root")
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    files.sort();
    files
}

/// Snapshot of every file's content, for "nothing changed" checks.
pub fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    list_files(dir)
        .into_iter()
        .map(|f| {
            let content = fs::read(dir.join(&f)).expect("Failed to read file");
            (f, content)
        })
        .collect()
}

/// Assert a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist: {}", path.display());
}

/// Assert a file does not exist.
pub fn assert_file_missing(path: &Path) {
    assert!(!path.exists(), "File should not exist: {}", path.display());
}

/// Assert a file contains the given content.
pub fn assert_file_contains(path: &Path, content: &str) {
    let file_content = fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to read file: {}", path.display()));
    assert!(
        file_content.contains(content),
        "File {} should contain '{}', but has:\n{}",
        path.display(),
        content,
        file_content
    );
}
