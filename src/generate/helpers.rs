//! Path and instruction helpers shared by the artifact renderers.
//!
//! Everything here produces text for the Android build system, so paths use `/`
//! regardless of host and may contain make variables.

use crate::spec::{
    split_package_tag, BoardConfig, CopyPackage, Fstab, PartitionTable, RcScript, RuntimeConfig,
    Spec, UeventRc, SELINUX_ENFORCING,
};
use crate::validate::paths::LOCAL_PATH;

/// Where AOSP keeps the stock feature declarations.
pub const FEATURE_SRC_DIR: &str = "frameworks/native/data/etc";
pub const FEATURE_DEST_DIR: &str = "system/etc/permissions";

/// Stock product makefiles, for `inherit-product`.
pub const PRODUCT_DIR: &str = "$(SRC_TARGET_DIR)/product";

/// Vendor output directory as set by the build system.
pub const OUT_VENDOR: &str = "$(TARGET_COPY_OUT_VENDOR)";

pub const DEFAULT_RUNTIME_CONFIG_DEST: &str = "system/etc";

/// Suffix of generated files that have no name in the spec.
pub const GEN_SUFFIX: &str = ".gen";

/// Join two make paths with a single `/`.
pub fn join(dir: &str, file: &str) -> String {
    let dir = dir.trim_end_matches('/');
    let file = file.trim_start_matches('/');
    if dir.is_empty() {
        file.to_string()
    } else if file.is_empty() {
        dir.to_string()
    } else {
        format!("{}/{}", dir, file)
    }
}

/// Last path component.
pub fn basename(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

/// Name of a generated file that the spec leaves unnamed.
pub fn gen_file_name(name: &str) -> String {
    format!("{}{}", name, GEN_SUFFIX)
}

pub fn feature_src(feature: &str) -> String {
    join(FEATURE_SRC_DIR, feature)
}

pub fn feature_dest(feature: &str) -> String {
    join(FEATURE_DEST_DIR, feature)
}

/// `src:dest` for a feature declaration.
pub fn feature_instruction(feature: &str) -> String {
    format!("{}:{}", feature_src(feature), feature_dest(feature))
}

pub fn inherit_product_path(product: &str) -> String {
    join(PRODUCT_DIR, &format!("{}.mk", product))
}

/// Strip the `:tag` from a build package name.
pub fn remove_package_tag(package: &str) -> &str {
    split_package_tag(package).0
}

/// `src:dest` for a prebuilt. Without a destination, shared objects go to lib and
/// everything else to bin.
pub fn copy_instruction(cp: &CopyPackage) -> String {
    let dest = if cp.dest_dir.is_empty() {
        if cp.src.ends_with(".so") {
            join(OUT_VENDOR, "lib")
        } else {
            join(OUT_VENDOR, "bin")
        }
    } else {
        join(OUT_VENDOR, &cp.dest_dir)
    };

    format!("{}:{}", cp.src, join(&dest, basename(&cp.src)))
}

pub fn runtime_config_instruction(config: &RuntimeConfig) -> String {
    let dest_dir = if config.dest_dir.is_empty() {
        DEFAULT_RUNTIME_CONFIG_DEST
    } else {
        &config.dest_dir
    };
    format!("{}:{}", config.src, join(dest_dir, basename(&config.src)))
}

pub fn install_firmware(src: &str) -> String {
    format!("{}:{}", src, join(&join(OUT_VENDOR, "firmware"), basename(src)))
}

pub fn install_driver(src: &str) -> String {
    format!("{}:{}", src, join(&join(OUT_VENDOR, "lib/modules"), basename(src)))
}

/// Service scripts belong to the vendor image; anything else goes to the ramdisk.
pub fn rc_install_dest(rc: &RcScript) -> String {
    if rc.service_rc {
        join(OUT_VENDOR, "etc/init")
    } else {
        "root".to_string()
    }
}

/// One `src:dest` per named script. Unnamed scripts are left out.
pub fn init_rc_copy_statements(scripts: &[RcScript]) -> Vec<String> {
    scripts
        .iter()
        .filter_map(|rc| {
            rc.source_name().map(|name| {
                format!(
                    "{}:{}",
                    join(LOCAL_PATH, name),
                    join(&rc_install_dest(rc), basename(name))
                )
            })
        })
        .collect()
}

/// Device directory file name of the ueventd script, external or generated.
pub fn uevent_file_name(rc: &UeventRc) -> String {
    if rc.is_external() {
        rc.file.clone()
    } else if !rc.name.is_empty() {
        rc.name.clone()
    } else {
        gen_file_name("ueventd.rc")
    }
}

pub fn ueventd_copy_src(rc: &UeventRc) -> String {
    join(LOCAL_PATH, &uevent_file_name(rc))
}

/// Device directory file name of the generated fstab.
pub fn fstab_file_name(fstab: &Fstab, product: &str) -> String {
    if fstab.name.is_empty() {
        format!("fstab.{}", product)
    } else {
        fstab.name.clone()
    }
}

pub fn fstab_copy_src(fstab: &Fstab, product: &str) -> String {
    join(LOCAL_PATH, &fstab_file_name(fstab, product))
}

/// Relative path of the USB gadget init script.
pub fn usb_rc_file_name(product: &str) -> String {
    format!("rootfs/init.{}.usb.rc", product)
}

/// Vendor image path relative to the product output.
pub fn vendor_out(pt: &PartitionTable) -> &'static str {
    if pt.has_vendor() {
        "vendor"
    } else {
        "system/vendor"
    }
}

/// Absolute firmware directory on the target, for the kernel command line.
pub fn firmware_location(spec: &Spec) -> &'static str {
    if spec.board_config.partition_table.has_vendor() {
        "/vendor/firmware"
    } else {
        "/system/etc/firmware"
    }
}

/// Hardware id, SELinux mode, firmware path, then the device's own arguments.
pub fn full_kernel_cmdline(spec: &Spec) -> String {
    let mode = spec
        .board_config
        .selinux_mode()
        .unwrap_or(SELINUX_ENFORCING);

    let mut args = vec![
        format!("androidboot.hardware={}", spec.product.device),
        format!("androidboot.selinux={}", mode),
        format!("firmware_class.path={}", firmware_location(spec)),
    ];
    let user = spec.boot_image.kernel.cmd_line.trim();
    if !user.is_empty() {
        args.push(user.to_string());
    }
    args.join(" ")
}

/// True if any partition is ext4, so the build needs the ext4 image tools.
pub fn user_image_ext4(board: &BoardConfig) -> bool {
    board
        .partition_table
        .partitions
        .iter()
        .any(|p| p.fs_type.contains("ext4"))
}

/// A make assignment continued over several lines, without a trailing `\`.
///
/// Returns an empty string when there is nothing to assign.
pub fn make_list(var: &str, op: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut out = format!("{} {} \\\n", var, op);
    for (i, entry) in entries.iter().enumerate() {
        out.push_str("    ");
        out.push_str(entry);
        if i + 1 < entries.len() {
            out.push_str(" \\");
        }
        out.push('\n');
    }
    out
}
