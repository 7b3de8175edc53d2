//! Validation findings and report.

use std::path::{Path, PathBuf};

use crate::config::Config;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Reported, never fails validation.
    Warn,
    /// Fails validation.
    Fail,
}

/// One problem reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub rule: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn warn(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Warn,
            message: message.into(),
        }
    }

    pub fn fail(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Fail,
            message: message.into(),
        }
    }

    pub fn is_fail(&self) -> bool {
        self.severity == Severity::Fail
    }

    /// One-line console rendering.
    pub fn line(&self) -> String {
        let (icon, tag) = match self.severity {
            Severity::Warn => ("⚠", "WARN"),
            Severity::Fail => ("✗", "FAIL"),
        };
        format!("  {} [{}] {}: {}", icon, tag, self.rule, self.message)
    }
}

/// Where validation looks for files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationEnv {
    /// The device directory, target of `$(LOCAL_PATH)`.
    pub gen_dir: PathBuf,
    /// `$ANDROID_BUILD_TOP`; checks of Android tree paths are skipped without it.
    pub build_top: Option<PathBuf>,
    /// Run the vendor build package check (off by default).
    pub check_build_packages: bool,
}

impl ValidationEnv {
    pub fn new(gen_dir: &Path, config: &Config) -> Self {
        Self {
            gen_dir: gen_dir.to_path_buf(),
            build_top: config.build_top.clone(),
            check_build_packages: config.check_build_packages,
        }
    }

    /// An environment with no Android tree, for validating just the device directory.
    pub fn local(gen_dir: &Path) -> Self {
        Self {
            gen_dir: gen_dir.to_path_buf(),
            build_top: None,
            check_build_packages: false,
        }
    }
}

/// Results of every rule that ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub rules_run: Vec<&'static str>,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// Returns true if no rule failed. Warnings don't count.
    pub fn passed(&self) -> bool {
        !self.findings.iter().any(Finding::is_fail)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_fail())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_fail())
    }

    pub fn fail_count(&self) -> usize {
        self.failures().count()
    }

    pub fn warn_count(&self) -> usize {
        self.warnings().count()
    }

    /// Rules with at least one failure, in the order they ran.
    pub fn failed_rules(&self) -> Vec<&'static str> {
        self.rules_run
            .iter()
            .copied()
            .filter(|r| self.failures().any(|f| f.rule == *r))
            .collect()
    }

    /// Findings of one rule.
    pub fn for_rule<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.rule == rule)
    }

    pub fn print_summary(&self) {
        let total = self.rules_run.len();
        let failed = self.failed_rules().len();
        println!();
        println!("Summary: {}/{} rules passed", total - failed, total);
        if failed > 0 {
            println!("         {} FAILED: {}", failed, self.failed_rules().join(", "));
        }
        let warned = self.warn_count();
        if warned > 0 {
            println!("         {} warnings", warned);
        }
    }
}
