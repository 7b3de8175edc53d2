//! Configuration management for avs.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over the .env file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Root of the Android source tree, used to resolve non-local paths.
pub const ENV_BUILD_TOP: &str = "ANDROID_BUILD_TOP";
/// Enables the vendor build package check during validation.
pub const ENV_CHECK_BUILD_PACKAGES: &str = "AVS_CHECK_BUILD_PACKAGES";

/// avs configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// `$ANDROID_BUILD_TOP`, if set.
    pub build_top: Option<PathBuf>,
    /// Check that `:v` packages are declared by the HAL's build files.
    pub check_build_packages: bool,
}

impl Config {
    /// Load configuration from `<dir>/.env` and the environment.
    pub fn load(dir: &Path) -> Self {
        let mut env_vars = HashMap::new();

        let env_path = dir.join(".env");
        if let Ok(iter) = dotenvy::from_path_iter(&env_path) {
            for (key, value) in iter.flatten() {
                env_vars.insert(key, value);
            }
        }

        // Environment variables override .env file
        for (key, value) in std::env::vars() {
            env_vars.insert(key, value);
        }

        Self::from_vars(&env_vars)
    }

    fn from_vars(vars: &HashMap<String, String>) -> Self {
        let build_top = vars
            .get(ENV_BUILD_TOP)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let check_build_packages = vars
            .get(ENV_CHECK_BUILD_PACKAGES)
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            build_top,
            check_build_packages,
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        match &self.build_top {
            Some(top) => {
                println!("  {}: {}", ENV_BUILD_TOP, top.display());
                if top.is_dir() {
                    println!("  Android tree: FOUND");
                } else {
                    println!("  Android tree: NOT FOUND");
                }
            }
            None => println!(
                "  {}: (unset, checks of Android tree paths are skipped)",
                ENV_BUILD_TOP
            ),
        }
        println!(
            "  {}: {}",
            ENV_CHECK_BUILD_PACKAGES, self.check_build_packages
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&HashMap::new());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_blank_build_top_is_unset() {
        let config = Config::from_vars(&vars(&[(ENV_BUILD_TOP, "  ")]));
        assert_eq!(config.build_top, None);
    }

    #[test]
    fn test_check_build_packages_flag() {
        let on = Config::from_vars(&vars(&[(ENV_CHECK_BUILD_PACKAGES, "true")]));
        let off = Config::from_vars(&vars(&[(ENV_CHECK_BUILD_PACKAGES, "0")]));
        assert!(on.check_build_packages);
        assert!(!off.check_build_packages);
    }

    #[test]
    #[serial]
    fn test_env_overrides_dotenv() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".env"),
            "ANDROID_BUILD_TOP=/from/dotenv\nAVS_CHECK_BUILD_PACKAGES=1\n",
        )
        .unwrap();

        std::env::remove_var(ENV_CHECK_BUILD_PACKAGES);
        std::env::set_var(ENV_BUILD_TOP, "/from/env");
        let config = Config::load(temp.path());
        std::env::remove_var(ENV_BUILD_TOP);

        assert_eq!(config.build_top, Some(PathBuf::from("/from/env")));
        assert!(config.check_build_packages);
    }
}
