//! Resolution of copy sources.
//!
//! Paths starting with `$(LOCAL_PATH)` live in the device directory. Every other
//! path is relative to `$ANDROID_BUILD_TOP`, and can't be checked without it.

use std::path::PathBuf;

use super::types::{Finding, Severity, ValidationEnv};
use crate::config::ENV_BUILD_TOP;

/// Make variable for the device directory.
pub const LOCAL_PATH: &str = "$(LOCAL_PATH)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Found(PathBuf),
    Missing(PathBuf),
    /// Not local and no build top configured.
    Unchecked,
}

/// `$(LOCAL_PATH)/<name>`.
pub fn local(name: &str) -> String {
    format!("{}/{}", LOCAL_PATH, name.trim_start_matches('/'))
}

/// Where `src` lives on this machine, if that can be known.
pub fn resolve_source(src: &str, env: &ValidationEnv) -> Option<PathBuf> {
    match src.strip_prefix(LOCAL_PATH) {
        Some(rest) => Some(env.gen_dir.join(rest.trim_start_matches('/'))),
        None => env
            .build_top
            .as_ref()
            .map(|top| top.join(src.trim_start_matches('/'))),
    }
}

pub fn check_source(src: &str, env: &ValidationEnv) -> SourceStatus {
    match resolve_source(src, env) {
        Some(path) if path.exists() => SourceStatus::Found(path),
        Some(path) => SourceStatus::Missing(path),
        None => SourceStatus::Unchecked,
    }
}

/// Check a batch of sources for one rule.
///
/// Missing sources are reported together in a single finding of `severity`.
/// Sources that can't be checked produce one warning.
pub fn check_sources<I>(
    rule: &'static str,
    what: &str,
    sources: I,
    env: &ValidationEnv,
    severity: Severity,
) -> Vec<Finding>
where
    I: IntoIterator<Item = String>,
{
    let mut missing = Vec::new();
    let mut unchecked = 0;

    for src in sources {
        match check_source(&src, env) {
            SourceStatus::Found(_) => {}
            SourceStatus::Missing(path) => missing.push(format!("{} ({})", src, path.display())),
            SourceStatus::Unchecked => unchecked += 1,
        }
    }

    let mut findings = Vec::new();
    if unchecked > 0 {
        findings.push(Finding::warn(
            rule,
            format!(
                "${{{}}} not set, skipped checking {} {}",
                ENV_BUILD_TOP, unchecked, what
            ),
        ));
    }
    if !missing.is_empty() {
        findings.push(Finding {
            rule,
            severity,
            message: format!("can't find {}: {}", what, missing.join(", ")),
        });
    }
    findings
}
