//! Init command - scaffolds a new device directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{absolute_dir, generate_and_record, CONFIG_FILE};
use crate::loader::{load_spec, load_spec_from_str, save_spec};
use crate::spec::{SeLinux, Spec};

/// Spec every new device starts from.
const DEFAULT_PROFILE: &str = include_str!("../../profile/default.json");

/// Point a template at `<vendor>/<device>`.
pub fn enrich_template_spec(spec: &mut Spec, vendor: &str, device: &str) {
    let kernel_dir = format!("device/{}/{}-kernel", vendor, device);

    let product = &mut spec.product;
    product.name = device.to_string();
    product.device = device.to_string();
    product.brand = device.to_string();
    product.model = device.to_string();
    product.manufacturer = vendor.to_string();

    let kernel = &mut spec.boot_image.kernel;
    kernel.local_kernel = format!("{}/Image", kernel_dir);
    kernel.local_dtb = format!("{}/{}.dtb", kernel_dir, device);

    let policy_dir = format!("device/{}/{}/sepolicy", vendor, device);
    match &mut spec.board_config.selinux {
        Some(selinux) => selinux.policy_dir = policy_dir,
        None => {
            spec.board_config.selinux = Some(SeLinux {
                mode: String::new(),
                policy_dir,
            })
        }
    }

    // The device's own init script is the first embedded one.
    if let Some(rc) = spec
        .boot_image
        .rootfs_overlay
        .init_rc
        .iter_mut()
        .find(|rc| rc.is_embedded())
    {
        rc.name = format!("init.{}.rc", device);
    }
}

/// Execute the init command.
///
/// Creates `<root>/<vendor>/<device>` and the kernel directory next to it,
/// writes `config.json` from `config` or the bundled profile, generates the
/// device files and records them. Returns the device directory.
pub fn cmd_init(root: &Path, vendor: &str, device: &str, config: Option<&Path>) -> Result<PathBuf> {
    if vendor.is_empty() || device.is_empty() {
        anyhow::bail!("Vendor and device names must not be empty");
    }

    let root = absolute_dir(root)?;
    let device_dir = root.join(vendor).join(device);
    let kernel_dir = root.join(vendor).join(format!("{}-kernel", device));
    for dir in [&device_dir, &kernel_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut spec = match config {
        Some(path) => {
            let path = absolute_dir(path)?;
            println!("[avs i] Using {} as template", path.display());
            load_spec(&path)?
        }
        None => load_spec_from_str(DEFAULT_PROFILE).context("Bundled profile is invalid")?,
    };
    enrich_template_spec(&mut spec, vendor, device);

    save_spec(&spec, device_dir.join(CONFIG_FILE))?;
    println!("[avs i] Created {}", device_dir.join(CONFIG_FILE).display());

    // The template is trusted, no validation.
    let state = generate_and_record(&spec, &device_dir)?;

    println!(
        "[avs i] OK: {} files generated in {}",
        state.generated_files.len(),
        device_dir.display()
    );
    Ok(device_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_profile_loads() {
        let spec = load_spec_from_str(DEFAULT_PROFILE).unwrap();
        assert!(spec.boot_image.rootfs_overlay.init_rc.iter().any(|rc| rc.is_embedded()));
    }

    #[test]
    fn test_enrich_template_spec() {
        let mut spec = load_spec_from_str(DEFAULT_PROFILE).unwrap();

        enrich_template_spec(&mut spec, "acme", "widget");

        assert_eq!(spec.product.name, "widget");
        assert_eq!(spec.product.manufacturer, "acme");
        assert_eq!(
            spec.boot_image.kernel.local_kernel,
            "device/acme/widget-kernel/Image"
        );
        assert_eq!(
            spec.boot_image.kernel.local_dtb,
            "device/acme/widget-kernel/widget.dtb"
        );
        assert_eq!(
            spec.board_config.selinux.as_ref().map(|s| s.policy_dir.as_str()),
            Some("device/acme/widget/sepolicy")
        );
        assert_eq!(spec.boot_image.rootfs_overlay.init_rc[0].name, "init.widget.rc");
    }
}
