//! Validation of a device specification against its device directory.
//!
//! Every rule runs, even after an earlier one failed. Findings are printed as
//! they come in; any failing rule makes the whole validation fail with a single
//! `ValidationError`. Warnings never do.

pub mod boot;
pub mod modules;
pub mod paths;
pub mod system;
mod types;

use thiserror::Error;

pub use types::{Finding, Severity, ValidationEnv, ValidationReport};

use crate::spec::Spec;

/// Aggregate failure of a validation run.
#[derive(Debug, Error)]
#[error("validation failed: {} rule(s) reported errors ({})", .failed_rules.len(), .failed_rules.join(", "))]
pub struct ValidationError {
    pub failed_rules: Vec<&'static str>,
    pub report: ValidationReport,
}

/// A validation rule: a name and a check over (spec, environment).
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&Spec, &ValidationEnv) -> Vec<Finding>,
}

/// Rules in the order they run.
pub fn rules(env: &ValidationEnv) -> Vec<Rule> {
    let mut rules = vec![
        Rule {
            name: system::RULE_HAL_NAMES,
            check: system::check_hal_names,
        },
        Rule {
            name: boot::RULE_KERNEL_DTB,
            check: boot::check_kernel_dtb,
        },
        Rule {
            name: boot::RULE_ROOTFS_INIT_RC,
            check: boot::check_rootfs_init_rc,
        },
        Rule {
            name: boot::RULE_PARTITIONS,
            check: boot::check_partitions,
        },
        Rule {
            name: boot::RULE_MKBOOTIMG_ARGS,
            check: boot::check_mkbootimg_args,
        },
        Rule {
            name: system::RULE_FEATURE_FILES,
            check: system::check_feature_files,
        },
        Rule {
            name: system::RULE_RUNTIME_CONFIGS,
            check: system::check_runtime_configs,
        },
        Rule {
            name: system::RULE_COPY_PACKAGES,
            check: system::check_copy_packages,
        },
        Rule {
            name: system::RULE_HAL_INIT_RC,
            check: system::check_hal_init_rc,
        },
    ];

    if env.check_build_packages {
        rules.push(Rule {
            name: modules::RULE_BUILD_PACKAGES,
            check: modules::check_build_packages,
        });
    }

    rules
}

/// Run `rules` and collect what they find. Never short-circuits.
pub fn run_rules(spec: &Spec, env: &ValidationEnv, rules: &[Rule]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for rule in rules {
        let findings = (rule.check)(spec, env);
        for finding in &findings {
            println!("{}", finding.line());
        }
        report.rules_run.push(rule.name);
        report.findings.extend(findings);
    }

    report
}

/// Validate `spec` with the default rule set.
pub fn validate(spec: &Spec, env: &ValidationEnv) -> Result<ValidationReport, ValidationError> {
    let report = run_rules(spec, env, &rules(env));
    report.print_summary();

    if report.passed() {
        Ok(report)
    } else {
        Err(ValidationError {
            failed_rules: report.failed_rules(),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::minimal_spec;
    use std::path::Path;

    fn failing(_: &Spec, _: &ValidationEnv) -> Vec<Finding> {
        vec![Finding::fail("always-fails", "boom")]
    }

    fn warning(_: &Spec, _: &ValidationEnv) -> Vec<Finding> {
        vec![Finding::warn("always-warns", "hmm")]
    }

    #[test]
    fn test_all_rules_run_after_failure() {
        let env = ValidationEnv::local(Path::new("/nonexistent/avs"));
        let rules = [
            Rule {
                name: "always-fails",
                check: failing,
            },
            Rule {
                name: "always-warns",
                check: warning,
            },
        ];

        let report = run_rules(&minimal_spec(), &env, &rules);

        assert_eq!(report.rules_run, ["always-fails", "always-warns"]);
        assert_eq!(report.fail_count(), 1);
        assert_eq!(report.warn_count(), 1);
    }

    #[test]
    fn test_build_packages_rule_is_opt_in() {
        let mut env = ValidationEnv::local(Path::new("/nonexistent/avs"));
        assert!(!rules(&env).iter().any(|r| r.name == modules::RULE_BUILD_PACKAGES));

        env.check_build_packages = true;
        assert_eq!(
            rules(&env).last().map(|r| r.name),
            Some(modules::RULE_BUILD_PACKAGES)
        );
    }

    #[test]
    fn test_minimal_spec_fails_on_partitions_only() {
        let env = ValidationEnv::local(Path::new("/nonexistent/avs"));

        let err = validate(&minimal_spec(), &env).unwrap_err();

        assert_eq!(err.failed_rules, [boot::RULE_PARTITIONS]);
        assert!(err.to_string().contains("partitions"));
    }
}
