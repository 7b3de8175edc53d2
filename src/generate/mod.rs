//! Rendering a device specification into the device directory.
//!
//! The set of files is fixed by [`plan`]: five files every device has, plus
//! files derived from the spec (product makefile, fstab, ueventd rules, USB
//! gadget script, SELinux fragments). Embedded init scripts are rendered
//! afterwards by [`generate_rc_scripts`].
//!
//! A file is recorded in the [`GenContext`] only once it has been written. The
//! first failure stops generation; files written before it stay on disk.

pub mod helpers;
pub mod makefiles;
pub mod rootfs;
pub mod treble;

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::common::files::ensure_parent_exists;
use crate::context::GenContext;
use crate::spec::{RcScript, Spec};
use helpers::{fstab_file_name, uevent_file_name, usb_rc_file_name};
use treble::PolicyFile;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to create directory for {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't render {name}: {reason}")]
    Render { name: String, reason: String },
}

/// A file in the device directory and how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    VendorSetup,
    AndroidProducts,
    BoardConfig,
    DeviceMk,
    Manifest,
    ProductMk,
    Ueventd,
    Fstab,
    UsbRc,
    SePolicy(PolicyFile),
}

impl Artifact {
    /// Path relative to the device directory.
    pub fn file_name(self, spec: &Spec) -> String {
        let product = &spec.product.name;
        match self {
            Artifact::VendorSetup => "vendorsetup.sh".to_string(),
            Artifact::AndroidProducts => "AndroidProducts.mk".to_string(),
            Artifact::BoardConfig => "BoardConfig.mk".to_string(),
            Artifact::DeviceMk => "device.mk".to_string(),
            Artifact::Manifest => "manifest.xml".to_string(),
            Artifact::ProductMk => format!("{}.mk", product),
            Artifact::Ueventd => uevent_file_name(&spec.boot_image.rootfs_overlay.uevent_rc),
            Artifact::Fstab => fstab_file_name(&spec.boot_image.rootfs_overlay.fstab, product),
            Artifact::UsbRc => usb_rc_file_name(product),
            Artifact::SePolicy(file) => file.file_name().to_string(),
        }
    }

    pub fn render(self, spec: &Spec) -> Result<String, GenerateError> {
        let content = match self {
            Artifact::VendorSetup => makefiles::render_vendorsetup(spec),
            Artifact::AndroidProducts => makefiles::render_android_products(spec),
            Artifact::BoardConfig => makefiles::render_board_config(spec),
            Artifact::DeviceMk => makefiles::render_device_mk(spec),
            Artifact::Manifest => treble::render_manifest(spec),
            Artifact::ProductMk => makefiles::render_product_mk(spec),
            Artifact::Ueventd => rootfs::render_ueventd(spec),
            Artifact::Fstab => rootfs::render_fstab(spec),
            Artifact::UsbRc => match &spec.board_config.usb_gadget {
                Some(gadget) => rootfs::render_usb_rc(gadget),
                None => {
                    return Err(GenerateError::Render {
                        name: self.file_name(spec),
                        reason: "no usb_gadget configured".to_string(),
                    })
                }
            },
            Artifact::SePolicy(file) => treble::render_policy(spec, file),
        };
        Ok(content)
    }
}

/// Files to generate for `spec`, in generation order.
pub fn plan(spec: &Spec) -> Vec<Artifact> {
    let mut artifacts = vec![
        Artifact::VendorSetup,
        Artifact::AndroidProducts,
        Artifact::BoardConfig,
        Artifact::DeviceMk,
        Artifact::Manifest,
        Artifact::ProductMk,
    ];

    // An external ueventd script is copied, not generated.
    if !spec.boot_image.rootfs_overlay.uevent_rc.is_external() {
        artifacts.push(Artifact::Ueventd);
    }
    artifacts.push(Artifact::Fstab);
    if spec.board_config.usb_gadget.is_some() {
        artifacts.push(Artifact::UsbRc);
    }
    for file in PolicyFile::ALL {
        if file.is_used(spec) {
            artifacts.push(Artifact::SePolicy(file));
        }
    }

    artifacts
}

/// Names from the spec must stay inside the device directory.
fn check_name(name: &str) -> Result<(), GenerateError> {
    let path = Path::new(name);
    let escapes = name.is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(GenerateError::Render {
            name: name.to_string(),
            reason: "file names must be relative to the device directory".to_string(),
        });
    }
    Ok(())
}

fn write(ctx: &mut GenContext, name: &str, content: &str) -> Result<(), GenerateError> {
    check_name(name)?;
    let path = ctx.path_of(name);

    ensure_parent_exists(&path).map_err(|source| GenerateError::CreateDir {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, content).map_err(|source| GenerateError::Write {
        path: path.clone(),
        source,
    })?;

    println!("  generate file {}", name);
    ctx.record(path);
    Ok(())
}

/// Render every planned artifact, then the embedded init scripts.
pub fn generate_all(spec: &Spec, ctx: &mut GenContext) -> Result<(), GenerateError> {
    for artifact in plan(spec) {
        let name = artifact.file_name(spec);
        let content = artifact.render(spec)?;
        write(ctx, &name, &content)?;
    }

    generate_rc_scripts(spec, ctx)
}

/// Render embedded rootfs and HAL scripts. External ones already exist and are skipped.
pub fn generate_rc_scripts(spec: &Spec, ctx: &mut GenContext) -> Result<(), GenerateError> {
    let embedded: Vec<&RcScript> = spec.rc_scripts().filter(|rc| rc.is_embedded()).collect();

    for rc in embedded {
        write(ctx, &rc.name, &rootfs::render_init_rc(rc))?;
    }
    Ok(())
}
