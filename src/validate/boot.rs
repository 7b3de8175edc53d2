//! Boot image rules: kernel, rootfs scripts, partitions, mkbootimg arguments.

use std::collections::BTreeSet;

use super::paths::{check_source, local, SourceStatus};
use super::types::{Finding, ValidationEnv};
use crate::spec::{RcMode, RcScript, Spec, PARTITION_USERDATA, REQUIRED_PARTITIONS};

pub const RULE_KERNEL_DTB: &str = "kernel-dtb";
pub const RULE_ROOTFS_INIT_RC: &str = "rootfs-init-rc";
pub const RULE_PARTITIONS: &str = "partitions";
pub const RULE_MKBOOTIMG_ARGS: &str = "mkbootimg-args";

/// Mount destination handled by vold rather than fstab partitions (usb, sdcard).
const AUTO_MOUNT: &str = "auto";

/// Kernel and DTB should exist. Only ever warns: they are often built later.
pub fn check_kernel_dtb(spec: &Spec, env: &ValidationEnv) -> Vec<Finding> {
    let kernel = &spec.boot_image.kernel;
    let mut findings = Vec::new();

    let images = [("kernel image", &kernel.local_kernel), ("dtb", &kernel.local_dtb)];
    for (what, path) in images {
        if path.is_empty() {
            continue;
        }
        match check_source(path, env) {
            SourceStatus::Found(_) => {}
            SourceStatus::Missing(resolved) => findings.push(Finding::warn(
                RULE_KERNEL_DTB,
                format!("can't find {} {} ({})", what, path, resolved.display()),
            )),
            SourceStatus::Unchecked => findings.push(Finding::warn(
                RULE_KERNEL_DTB,
                format!("can't check {} {} without a build top", what, path),
            )),
        }
    }

    findings
}

/// Naming of init scripts, shared by rootfs and HAL scripts. Warnings only.
pub(crate) fn check_rc_scripts<'a, I>(rule: &'static str, scripts: I, env: &ValidationEnv) -> Vec<Finding>
where
    I: IntoIterator<Item = &'a RcScript>,
{
    let mut findings = Vec::new();

    for rc in scripts {
        match rc.mode() {
            RcMode::Ambiguous => findings.push(Finding::warn(
                rule,
                format!(
                    "rc file ({}) and name ({}) are both set; only one is allowed, the file wins",
                    rc.file, rc.name
                ),
            )),
            RcMode::Unnamed => {
                findings.push(Finding::warn(rule, "rc script has neither a file nor a name"));
                continue;
            }
            RcMode::External(file) if rc.has_ignored_content() => findings.push(Finding::warn(
                rule,
                format!("rc file ({}) is set, all other attributes are ignored", file),
            )),
            RcMode::External(_) | RcMode::Embedded(_) => {}
        }

        // Embedded scripts only exist once the tree has been generated.
        if let Some(name) = rc.source_name() {
            if let SourceStatus::Missing(path) = check_source(&local(name), env) {
                findings.push(Finding::warn(
                    rule,
                    format!("can't find rc file {} ({})", name, path.display()),
                ));
            }
        }
    }

    findings
}

pub fn check_rootfs_init_rc(spec: &Spec, env: &ValidationEnv) -> Vec<Finding> {
    check_rc_scripts(
        RULE_ROOTFS_INIT_RC,
        &spec.boot_image.rootfs_overlay.init_rc,
        env,
    )
}

/// Partition name a mount destination refers to. `None` for `auto`.
pub fn mount_partition(dst: &str) -> Option<String> {
    if dst == AUTO_MOUNT {
        return None;
    }
    let name = dst.trim_start_matches('/');
    if name == "data" {
        Some(PARTITION_USERDATA.to_string())
    } else {
        Some(name.to_string())
    }
}

/// The partition table holds at least system, userdata and cache, and every
/// partition has exactly one fstab entry.
pub fn check_partitions(spec: &Spec, _env: &ValidationEnv) -> Vec<Finding> {
    let mut findings = Vec::new();

    let parts: BTreeSet<String> = spec
        .board_config
        .partition_table
        .names()
        .map(str::to_string)
        .collect();
    let mounts: BTreeSet<String> = spec
        .boot_image
        .rootfs_overlay
        .fstab
        .mounts
        .iter()
        .filter_map(|m| mount_partition(&m.dst))
        .collect();
    let required: BTreeSet<String> = REQUIRED_PARTITIONS.iter().map(|p| p.to_string()).collect();

    if !required.is_subset(&parts) {
        findings.push(Finding::fail(
            RULE_PARTITIONS,
            format!(
                "missing partition table declarations, has only {:?}, need at least {:?}",
                parts, required
            ),
        ));
    }

    if !required.is_subset(&mounts) {
        findings.push(Finding::fail(
            RULE_PARTITIONS,
            format!(
                "missing partitions in fstab, has only {:?}, need at least {:?}",
                mounts, required
            ),
        ));
    }

    if parts != mounts {
        findings.push(Finding::fail(
            RULE_PARTITIONS,
            format!("partitions {:?} and mounts {:?} don't match", parts, mounts),
        ));
    }

    findings
}

/// Load address overrides are all set or all left to the defaults.
pub fn check_mkbootimg_args(spec: &Spec, _env: &ValidationEnv) -> Vec<Finding> {
    match spec.boot_image.load_address() {
        Some(lda) if !lda.is_consistent() => vec![Finding::fail(
            RULE_MKBOOTIMG_ARGS,
            format!(
                "load_base ({:?}), kernel_offset ({:?}) and ramdisk_offset ({:?}) must all be set or all be empty",
                lda.load_base, lda.kernel_offset, lda.ramdisk_offset
            ),
        )],
        _ => Vec::new(),
    }
}
