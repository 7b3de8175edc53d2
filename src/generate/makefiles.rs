//! Makefile renderers: lunch setup, product index, board config, device and product makefiles.

use super::helpers::{
    copy_instruction, feature_instruction, fstab_copy_src, full_kernel_cmdline,
    inherit_product_path, init_rc_copy_statements, install_driver, install_firmware, make_list,
    remove_package_tag, runtime_config_instruction, ueventd_copy_src, usb_rc_file_name,
    user_image_ext4, vendor_out,
};
use crate::spec::{Arch, Hal, Spec, PARTITION_SYSTEM, PARTITION_USERDATA};
use crate::validate::paths::local;

const HEADER: &str = "# Generated by avs from config.json. Edit config.json instead.\n";

/// Build variants offered to lunch.
const LUNCH_VARIANTS: &[&str] = &["eng", "userdebug"];

pub fn render_vendorsetup(spec: &Spec) -> String {
    let mut out = String::from(HEADER);
    for variant in LUNCH_VARIANTS {
        out.push_str(&format!("add_lunch_combo {}-{}\n", spec.product.name, variant));
    }
    out
}

pub fn render_android_products(spec: &Spec) -> String {
    let mut out = String::from(HEADER);
    out.push_str(&make_list(
        "PRODUCT_MAKEFILES",
        ":=",
        &[format!("$(LOCAL_DIR)/{}.mk", spec.product.name)],
    ));
    out
}

pub fn render_product_mk(spec: &Spec) -> String {
    let product = &spec.product;
    let device_dir = format!("device/{}/{}", product.manufacturer, product.device);

    let mut out = String::from(HEADER);
    if !product.inherit_products.is_empty() {
        out.push('\n');
        for p in &product.inherit_products {
            out.push_str(&format!("$(call inherit-product, {})\n", inherit_product_path(p)));
        }
    }

    out.push_str(&format!(
        "\nPRODUCT_NAME := {}\n\
         PRODUCT_DEVICE := {}\n\
         PRODUCT_BRAND := {}\n\
         PRODUCT_MODEL := {}\n\
         PRODUCT_MANUFACTURER := {}\n\
         \n\
         DEVICE_PACKAGE_OVERLAYS := {}/overlay\n\
         \n\
         $(call inherit-product, {}/device.mk)\n",
        product.name,
        product.device,
        product.brand,
        product.model,
        product.manufacturer,
        device_dir,
        device_dir
    ));
    out
}

/// Make variable stem for a partition image, e.g. `SYSTEMIMAGE`.
fn image_var(partition: &str) -> String {
    format!("{}IMAGE", partition.to_uppercase())
}

fn push_arch(out: &mut String, prefix: &str, arch: &Arch) {
    out.push_str(&format!("{}_ARCH := {}\n", prefix, arch.name));
    out.push_str(&format!("{}_ARCH_VARIANT := {}\n", prefix, arch.variant));
    out.push_str(&format!("{}_CPU_VARIANT := {}\n", prefix, arch.cpu.variant));
    out.push_str(&format!("{}_CPU_ABI := {}\n", prefix, arch.cpu.abi));
    if !arch.cpu.abi2.is_empty() {
        out.push_str(&format!("{}_CPU_ABI2 := {}\n", prefix, arch.cpu.abi2));
    }
}

pub fn render_board_config(spec: &Spec) -> String {
    let board = &spec.board_config;
    let target = &board.target;
    let mut out = String::from(HEADER);

    out.push_str("\n# target\n");
    let arch_prefixes = ["TARGET", "TARGET_2ND"];
    for (prefix, arch) in arch_prefixes.iter().zip(&target.archs) {
        push_arch(&mut out, prefix, arch);
    }
    let platform = if target.board_platform.is_empty() {
        &spec.product.name
    } else {
        &target.board_platform
    };
    out.push_str(&format!("TARGET_BOARD_PLATFORM := {}\n", platform));
    if target.no_recovery {
        out.push_str("TARGET_NO_RECOVERY := true\n");
    }
    if target.no_radio {
        out.push_str("TARGET_NO_RADIOIMAGE := true\n");
    }
    if target.binder == "64" {
        out.push_str("TARGET_USES_64_BIT_BINDER := true\n");
    }
    if let Some(bootloader) = &board.bootloader {
        if !bootloader.board_name.is_empty() {
            out.push_str(&format!(
                "TARGET_BOOTLOADER_BOARD_NAME := {}\n",
                bootloader.board_name
            ));
        }
    }

    out.push_str("\n# partitions\n");
    let table = &board.partition_table;
    if !table.flash_block_size.is_empty() {
        out.push_str(&format!("BOARD_FLASH_BLOCK_SIZE := {}\n", table.flash_block_size));
    }
    if user_image_ext4(board) {
        out.push_str("TARGET_USERIMAGES_USE_EXT4 := true\n");
    }
    for p in &table.partitions {
        let var = image_var(&p.name);
        out.push_str(&format!("BOARD_{}_PARTITION_SIZE := {}\n", var, p.size));
        // system and userdata take their type from TARGET_USERIMAGES_USE_EXT4
        if p.name != PARTITION_SYSTEM && p.name != PARTITION_USERDATA {
            out.push_str(&format!("BOARD_{}_FILE_SYSTEM_TYPE := {}\n", var, p.fs_type));
        }
    }
    out.push_str(&format!("TARGET_COPY_OUT_VENDOR := {}\n", vendor_out(table)));

    out.push_str("\n# kernel\n");
    out.push_str(&format!("BOARD_KERNEL_CMDLINE := {}\n", full_kernel_cmdline(spec)));
    if let Some(lda) = spec.boot_image.load_address().filter(|l| l.is_complete()) {
        out.push_str(&format!(
            "BOARD_MKBOOTIMG_ARGS := --base {} --kernel_offset {} --ramdisk_offset {}\n",
            lda.load_base.trim(),
            lda.kernel_offset.trim(),
            lda.ramdisk_offset.trim()
        ));
    }

    if let Some(selinux) = &board.selinux {
        if !selinux.policy_dir.is_empty() {
            out.push_str(&format!("\n# selinux\nBOARD_SEPOLICY_DIRS += {}\n", selinux.policy_dir));
        }
    }

    if let Some(framework) = &spec.framework_configs {
        if !framework.build_configs.is_empty() {
            out.push_str("\n# framework\n");
            for line in &framework.build_configs {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    for hal in spec.hals_by_name() {
        if hal.build_configs.is_empty() {
            continue;
        }
        out.push_str(&format!("\n# HAL {}\n", hal.name));
        for line in &hal.build_configs {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

fn section(out: &mut String, title: &str, body: String) {
    if body.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}\n", title));
    out.push_str(&body);
}

fn render_hal(hal: &Hal) -> String {
    let mut out = format!("\n# start HAL {} >>>>>>>>\n", hal.name);

    let features: Vec<String> = hal.features.iter().map(|f| feature_instruction(f)).collect();
    section(
        &mut out,
        "## feature declaration",
        make_list("PRODUCT_COPY_FILES", "+=", &features),
    );

    if let Some(packages) = &hal.packages {
        let build: Vec<String> = packages
            .build
            .iter()
            .map(|p| remove_package_tag(p).to_string())
            .collect();
        section(
            &mut out,
            "## build packages",
            make_list("PRODUCT_PACKAGES", "+=", &build),
        );

        let copy: Vec<String> = packages.copy.iter().map(copy_instruction).collect();
        section(
            &mut out,
            "## copy packages",
            make_list("PRODUCT_COPY_FILES", "+=", &copy),
        );
    }

    let firmwares: Vec<String> = hal.firmwares.iter().map(|f| install_firmware(f)).collect();
    section(
        &mut out,
        "## firmwares",
        make_list("PRODUCT_COPY_FILES", "+=", &firmwares),
    );

    let drivers: Vec<String> = hal.drivers.iter().map(|d| install_driver(d)).collect();
    section(
        &mut out,
        "## drivers",
        make_list("PRODUCT_COPY_FILES", "+=", &drivers),
    );

    if !hal.raw_instructions.is_empty() {
        out.push_str("\n## raw instructions\n");
        for line in &hal.raw_instructions {
            out.push_str(line);
            out.push('\n');
        }
    }

    section(
        &mut out,
        "## service init.rc scripts",
        make_list("PRODUCT_COPY_FILES", "+=", &init_rc_copy_statements(&hal.init_rc)),
    );

    let configs: Vec<String> = hal
        .runtime_configs
        .iter()
        .map(runtime_config_instruction)
        .collect();
    section(
        &mut out,
        "## runtime configs",
        make_list("PRODUCT_COPY_FILES", "+=", &configs),
    );

    section(
        &mut out,
        &format!("## {} properties", hal.name),
        make_list("PRODUCT_PROPERTY_OVERRIDES", "+=", &hal.properties),
    );

    out.push_str(&format!("# end HAL {} <<<<<<<<\n", hal.name));
    out
}

pub fn render_device_mk(spec: &Spec) -> String {
    let product = &spec.product.name;
    let kernel = &spec.boot_image.kernel;
    let rootfs = &spec.boot_image.rootfs_overlay;
    let mut out = String::from(HEADER);

    out.push_str("\n# kernel and dtb\n");
    out.push_str(&format!("LOCAL_KERNEL := {}\n", kernel.local_kernel));
    out.push_str("PRODUCT_COPY_FILES += $(LOCAL_KERNEL):kernel\n");
    if !kernel.local_dtb.is_empty() {
        out.push_str(&format!("LOCAL_DTB := {}\n", kernel.local_dtb));
        out.push_str(&format!("PRODUCT_COPY_FILES += $(LOCAL_DTB):{}.dtb\n", spec.product.device));
        let has_2nd = spec
            .board_config
            .bootloader
            .as_ref()
            .is_some_and(|b| b.has_2nd_bootloader);
        if has_2nd {
            out.push_str("PRODUCT_COPY_FILES += $(LOCAL_DTB):2ndbootloader\n");
        }
    }

    let mut rootfs_files = vec![
        format!("{}:root/ueventd.{}.rc", ueventd_copy_src(&rootfs.uevent_rc), product),
        format!("{}:root/fstab.{}", fstab_copy_src(&rootfs.fstab, product), product),
    ];
    rootfs_files.extend(init_rc_copy_statements(&rootfs.init_rc));
    if spec.board_config.usb_gadget.is_some() {
        let usb = usb_rc_file_name(product);
        rootfs_files.push(format!("{}:root/init.{}.usb.rc", local(&usb), product));
    }
    section(
        &mut out,
        "# rootfs",
        make_list("PRODUCT_COPY_FILES", "+=", &rootfs_files),
    );

    let features: Vec<String> = spec
        .board_config
        .board_features
        .iter()
        .map(|f| feature_instruction(f))
        .collect();
    section(
        &mut out,
        "# feature declaration",
        make_list("PRODUCT_COPY_FILES", "+=", &features),
    );

    if let Some(framework) = &spec.framework_configs {
        section(
            &mut out,
            "# framework properties",
            make_list("PRODUCT_PROPERTY_OVERRIDES", "+=", &framework.properties),
        );
    }

    for hal in spec.hals_by_name() {
        out.push_str(&render_hal(hal));
    }

    section(
        &mut out,
        "# manifest.xml",
        make_list(
            "PRODUCT_COPY_FILES",
            "+=",
            &[format!("{}:$(TARGET_COPY_OUT_VENDOR)/manifest.xml", local("manifest.xml"))],
        ),
    );

    if let Some(raw) = &spec.vendor_raw {
        if !raw.instructions.is_empty() {
            out.push_str("\n# vendor raw instructions\n");
            for line in &raw.instructions {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out
}
