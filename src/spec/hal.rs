//! HAL entries: everything a vendor component needs besides its source code.

use serde::{Deserialize, Serialize};

use super::boot::UeventRule;
use super::rc::RcScript;

/// Tag marking a build package as vendor code, checked by `avs validate`.
pub const VENDOR_TAG: &str = "v";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hal {
    pub name: String,
    /// Treble manifest entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manifests: Vec<Manifest>,
    /// Feature files from frameworks/native/data/etc.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    /// Lines for BoardConfig.mk, kept with the HAL they belong to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build_configs: Vec<String>,
    #[serde(
        rename = "required_packages",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub packages: Option<Packages>,
    /// Firmware blobs installed under the vendor firmware directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub firmwares: Vec<String>,
    /// Kernel modules installed under the vendor modules directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drivers: Vec<String>,
    /// Unmodelled device.mk lines, copied verbatim.
    #[serde(rename = "raw", default, skip_serializing_if = "Vec::is_empty")]
    pub raw_instructions: Vec<String>,
    #[serde(rename = "init.rc", default, skip_serializing_if = "Vec::is_empty")]
    pub init_rc: Vec<RcScript>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime_configs: Vec<RuntimeConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
    /// Device nodes, merged into the generated ueventd script.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uevent_rules: Vec<UeventRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sepolicy: Option<SePolicy>,
}

impl Hal {
    /// Names of build packages tagged `:v`.
    pub fn vendor_packages(&self) -> Vec<&str> {
        self.packages
            .iter()
            .flat_map(|p| p.build.iter())
            .filter_map(|p| match split_package_tag(p) {
                (name, Some(VENDOR_TAG)) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn copy_packages(&self) -> &[CopyPackage] {
        self.packages.as_ref().map(|p| p.copy.as_slice()).unwrap_or(&[])
    }
}

/// Split `name:tag` into its parts. Only the last colon separates the tag.
pub fn split_package_tag(package: &str) -> (&str, Option<&str>) {
    match package.rsplit_once(':') {
        Some((name, tag)) => (name, Some(tag)),
        None => (package, None),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packages {
    /// Modules built by the Android build system; `:v` marks vendor modules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build: Vec<String>,
    /// Prebuilt binaries copied as is.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub copy: Vec<CopyPackage>,
}

/// A prebuilt file copied to the vendor output.
///
/// `src` is relative to `$(ANDROID_BUILD_TOP)` or, with a `$(LOCAL_PATH)` prefix,
/// to the device directory. Without `dest_dir`, `.so` files go to lib and
/// everything else to bin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPackage {
    pub src: String,
    #[serde(rename = "destDir", default, skip_serializing_if = "String::is_empty")]
    pub dest_dir: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

/// A runtime configuration file, installed to `system/etc` by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub src: String,
    #[serde(rename = "destDir", default, skip_serializing_if = "String::is_empty")]
    pub dest_dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub format: String,
    pub transport: HalTransport,
    #[serde(rename = "impl", default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<Impl>,
    pub version: String,
    pub interface: ServiceInterface,
}

/// `hwbinder` or `passthrough`, optionally per arch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalTransport {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arch: String,
    pub mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impl {
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInterface {
    pub name: String,
    pub instance: String,
}

/// SELinux policy owned by a HAL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SePolicy {
    /// New file types.
    #[serde(rename = "file.te", default, skip_serializing_if = "Vec::is_empty")]
    pub file_te: Vec<String>,
    /// New domains and their rules.
    #[serde(rename = "service.te", default, skip_serializing_if = "Vec::is_empty")]
    pub service_te: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_contexts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_contexts: Vec<String>,
}
