//! System image rules: HAL names, features, runtime configs, copied blobs and HAL
//! init scripts.

use std::collections::BTreeMap;

use super::boot::check_rc_scripts;
use super::paths::check_sources;
use super::types::{Finding, Severity, ValidationEnv};
use crate::generate::helpers::feature_src;
use crate::spec::Spec;

pub const RULE_HAL_NAMES: &str = "hal-names";
pub const RULE_FEATURE_FILES: &str = "feature-files";
pub const RULE_RUNTIME_CONFIGS: &str = "runtime-configs";
pub const RULE_COPY_PACKAGES: &str = "copy-packages";
pub const RULE_HAL_INIT_RC: &str = "hal-init-rc";

/// Every HAL has a name, and no two share one.
pub fn check_hal_names(spec: &Spec, _env: &ValidationEnv) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for (i, hal) in spec.hals.iter().enumerate() {
        if hal.name.trim().is_empty() {
            findings.push(Finding::fail(
                RULE_HAL_NAMES,
                format!("HAL #{} has no name", i + 1),
            ));
        } else {
            *counts.entry(hal.name.as_str()).or_default() += 1;
        }
    }

    for (name, count) in counts.into_iter().filter(|(_, n)| *n > 1) {
        findings.push(Finding::fail(
            RULE_HAL_NAMES,
            format!("HAL {} is declared {} times", name, count),
        ));
    }

    findings
}

/// Board and HAL feature files exist in frameworks/native/data/etc.
pub fn check_feature_files(spec: &Spec, env: &ValidationEnv) -> Vec<Finding> {
    let features = spec
        .board_config
        .board_features
        .iter()
        .chain(spec.hals.iter().flat_map(|h| h.features.iter()))
        .map(|f| feature_src(f));

    check_sources(RULE_FEATURE_FILES, "feature files", features, env, Severity::Fail)
}

pub fn check_runtime_configs(spec: &Spec, env: &ValidationEnv) -> Vec<Finding> {
    let sources = spec
        .hals
        .iter()
        .flat_map(|h| h.runtime_configs.iter())
        .map(|c| c.src.clone());

    check_sources(RULE_RUNTIME_CONFIGS, "runtime configs", sources, env, Severity::Fail)
}

/// Prebuilt libraries and binaries, firmware and kernel modules.
pub fn check_copy_packages(spec: &Spec, env: &ValidationEnv) -> Vec<Finding> {
    let sources = spec.hals.iter().flat_map(|h| {
        h.copy_packages()
            .iter()
            .map(|cp| cp.src.clone())
            .chain(h.firmwares.iter().cloned())
            .chain(h.drivers.iter().cloned())
    });

    check_sources(RULE_COPY_PACKAGES, "copy sources", sources, env, Severity::Fail)
}

pub fn check_hal_init_rc(spec: &Spec, env: &ValidationEnv) -> Vec<Finding> {
    check_rc_scripts(
        RULE_HAL_INIT_RC,
        spec.hals.iter().flat_map(|h| h.init_rc.iter()),
        env,
    )
}
