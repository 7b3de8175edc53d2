//! Vendor build package check.
//!
//! A build package tagged `:v` is vendor code living in the device directory.
//! The HAL's directory must hold an Android.mk or Android.bp that declares a
//! module of that name. Off by default: it needs the HAL sources checked out.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::types::{Finding, ValidationEnv};
use crate::spec::Spec;

pub const RULE_BUILD_PACKAGES: &str = "build-packages";

const BUILD_DESCRIPTORS: &[&str] = &["Android.mk", "Android.bp"];

/// Android.mk and Android.bp files under `dir`, sorted.
pub fn find_build_descriptors(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            BUILD_DESCRIPTORS
                .iter()
                .any(|d| e.file_name().to_string_lossy() == *d)
        })
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

/// Matches `LOCAL_MODULE := <module>` in make files and `name: "<module>"` in blueprints.
fn module_pattern(module: &str) -> Result<Regex, regex::Error> {
    let name = regex::escape(module);
    Regex::new(&format!(
        r#"(?m)^\s*(?:LOCAL_MODULE\s*:?=\s*{name}\s*$|name\s*:\s*"{name}")"#
    ))
}

/// True if `file` declares `module`.
pub fn has_module_in_file(file: &Path, module: &str) -> std::io::Result<bool> {
    let content = fs::read_to_string(file)?;
    let pattern = module_pattern(module)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    Ok(pattern.is_match(&content))
}

pub fn check_build_packages(spec: &Spec, env: &ValidationEnv) -> Vec<Finding> {
    let mut findings = Vec::new();

    for hal in &spec.hals {
        let modules = hal.vendor_packages();
        if modules.is_empty() {
            continue;
        }

        let hal_dir = env.gen_dir.join(&hal.name);
        let descriptors = find_build_descriptors(&hal_dir);
        if descriptors.is_empty() {
            findings.push(Finding::fail(
                RULE_BUILD_PACKAGES,
                format!(
                    "HAL '{}' has vendor packages but no Android.mk or Android.bp in {}",
                    hal.name,
                    hal_dir.display()
                ),
            ));
            continue;
        }

        for module in modules {
            let declared = descriptors
                .iter()
                .any(|d| has_module_in_file(d, module).unwrap_or(false));
            if !declared {
                findings.push(Finding::fail(
                    RULE_BUILD_PACKAGES,
                    format!(
                        "no module {} in the build files of HAL '{}' ({})",
                        module,
                        hal.name,
                        hal_dir.display()
                    ),
                ));
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::minimal_spec;
    use crate::spec::{Hal, Packages};
    use tempfile::TempDir;

    fn spec_with_wifi() -> Spec {
        let mut spec = minimal_spec();
        spec.hals.push(Hal {
            name: "wifi".into(),
            packages: Some(Packages {
                build: vec!["wificond:f".into(), "wifi_hal:v".into()],
                copy: vec![],
            }),
            ..Default::default()
        });
        spec
    }

    #[test]
    fn test_module_pattern_mk_and_bp() {
        let temp = TempDir::new().unwrap();
        let mk = temp.path().join("Android.mk");
        fs::write(&mk, "include $(CLEAR_VARS)\nLOCAL_MODULE := wifi_hal\n").unwrap();
        let bp = temp.path().join("Android.bp");
        fs::write(&bp, "cc_library {\n    name: \"libwifi-hal-vendor\",\n}\n").unwrap();

        assert!(has_module_in_file(&mk, "wifi_hal").unwrap());
        assert!(!has_module_in_file(&mk, "wifi").unwrap());
        assert!(has_module_in_file(&bp, "libwifi-hal-vendor").unwrap());
        assert!(!has_module_in_file(&bp, "libwifi").unwrap());
    }

    #[test]
    fn test_missing_descriptor_fails() {
        let temp = TempDir::new().unwrap();
        let findings = check_build_packages(&spec_with_wifi(), &ValidationEnv::local(temp.path()));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("no Android.mk"));
    }

    #[test]
    fn test_module_found_in_nested_descriptor() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("wifi/hal");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("Android.mk"), "LOCAL_MODULE := wifi_hal\n").unwrap();

        let findings = check_build_packages(&spec_with_wifi(), &ValidationEnv::local(temp.path()));

        assert!(findings.is_empty());
    }

    #[test]
    fn test_undeclared_module_fails() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("wifi")).unwrap();
        fs::write(temp.path().join("wifi/Android.mk"), "LOCAL_MODULE := other\n").unwrap();

        let findings = check_build_packages(&spec_with_wifi(), &ValidationEnv::local(temp.path()));

        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("no module wifi_hal"));
    }
}
