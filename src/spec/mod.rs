//! Android device build specification.
//!
//! The types in this module mirror the JSON schema of a device `config.json`.
//! Fields without `#[serde(default)]` are required: a document that omits them
//! fails to load. Optional lists are skipped on output when empty so a
//! load/save cycle reproduces the input byte for byte.

mod board;
mod boot;
mod hal;
mod rc;

pub use board::{
    Arch, BoardConfig, Bootloader, Cpu, Partition, PartitionTable, SeLinux, Target, UsbGadget,
};
pub use boot::{
    BootImage, Fstab, Kernel, LoadAddress, MkBootImgArgs, Mount, RootfsOverlay, UeventRc,
    UeventRule,
};
pub use hal::{
    split_package_tag, CopyPackage, Hal, HalTransport, Impl, Manifest, Packages, RuntimeConfig,
    SePolicy, ServiceInterface,
};
pub use rc::{RcAction, RcMode, RcScript, RcService};

use serde::{Deserialize, Serialize};

/// Partition names the build system relies on.
pub const PARTITION_SYSTEM: &str = "system";
pub const PARTITION_USERDATA: &str = "userdata";
pub const PARTITION_CACHE: &str = "cache";
pub const PARTITION_VENDOR: &str = "vendor";

/// Partitions every device must declare.
pub const REQUIRED_PARTITIONS: &[&str] = &[PARTITION_SYSTEM, PARTITION_USERDATA, PARTITION_CACHE];

/// SELinux mode used when the board leaves it unset.
pub const SELINUX_ENFORCING: &str = "enforcing";
pub const SELINUX_PERMISSIVE: &str = "permissive";

/// Root of a device specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    pub version: Version,
    pub product: Product,
    #[serde(rename = "boardConfig")]
    pub board_config: BoardConfig,
    pub boot_image: BootImage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_configs: Option<FrameworkConfigs>,
    pub hals: Vec<Hal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_raw: Option<VendorRaw>,
}

impl Spec {
    /// Position of the HAL called `name`, if any.
    ///
    /// A linear scan; devices carry tens of HALs, not thousands.
    pub fn hal_index(&self, name: &str) -> Option<usize> {
        self.hals.iter().position(|h| h.name == name)
    }

    pub fn hal(&self, name: &str) -> Option<&Hal> {
        self.hal_index(name).map(|i| &self.hals[i])
    }

    /// HALs ordered by name, for stable output. The spec itself is untouched.
    pub fn hals_by_name(&self) -> Vec<&Hal> {
        let mut hals: Vec<&Hal> = self.hals.iter().collect();
        hals.sort_by(|a, b| a.name.cmp(&b.name));
        hals
    }

    /// Every RcScript in the spec: rootfs entries first, then each HAL's.
    pub fn rc_scripts(&self) -> impl Iterator<Item = &RcScript> {
        self.boot_image
            .rootfs_overlay
            .init_rc
            .iter()
            .chain(self.hals.iter().flat_map(|h| h.init_rc.iter()))
    }
}

/// Schema version and the Android release the spec targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub schema: String,
    pub android: String,
}

/// Product identity and the base products it inherits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub device: String,
    pub brand: String,
    pub model: String,
    #[serde(alias = "manufacture")]
    pub manufacturer: String,
    /// Base product makefiles from `$(SRC_TARGET_DIR)/product`, e.g. `full_base`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inherit_products: Vec<String>,
}

/// Build and runtime settings for framework components (dalvik and friends).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkConfigs {
    /// Lines appended to BoardConfig.mk.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build_configs: Vec<String>,
    /// Entries for PRODUCT_PROPERTY_OVERRIDES in device.mk.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
}

/// Raw makefile lines copied verbatim to the end of device.mk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRaw {
    pub instructions: Vec<String>,
}
