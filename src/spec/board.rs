//! Board configuration: partitions, target architecture, bootloader, SELinux.

use serde::{Deserialize, Serialize};

use super::PARTITION_VENDOR;

/// Board-level build configuration.
///
/// Settings owned by a particular HAL belong in `Hal::build_configs`; they end up
/// in the same BoardConfig.mk but are kept next to the HAL they configure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub partition_table: PartitionTable,
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootloader: Option<Bootloader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selinux: Option<SeLinux>,
    /// Features that need no HAL, e.g. `android.software.webview.xml`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub board_features: Vec<String>,
    /// USB gadget used by adb. Its presence adds an init.<product>.usb.rc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usb_gadget: Option<UsbGadget>,
}

impl BoardConfig {
    pub fn selinux_mode(&self) -> Option<&str> {
        self.selinux
            .as_ref()
            .map(|s| s.mode.as_str())
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTable {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flash_block_size: String,
    /// `mbr`, `gpt`, ...
    pub scheme: String,
    pub partitions: Vec<Partition>,
}

impl PartitionTable {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.partitions.iter().map(|p| p.name.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    /// True when the device has a dedicated vendor partition.
    pub fn has_vendor(&self) -> bool {
        self.has(PARTITION_VENDOR)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    #[serde(rename = "type")]
    pub fs_type: String,
    pub size: String,
}

/// Static build configuration for the target CPU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub archs: Vec<Arch>,
    pub no_recovery: bool,
    #[serde(rename = "no_radioimage")]
    pub no_radio: bool,
    /// `32` or `64`.
    pub binder: String,
    /// Defaults to the product name.
    #[serde(
        rename = "boardPlatform",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub board_platform: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arch {
    pub name: String,
    pub variant: String,
    pub cpu: Cpu,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    pub variant: String,
    pub abi: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub abi2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bootloader {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_2nd_bootloader: bool,
    /// Defaults to the product name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub board_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeLinux {
    /// `enforcing` or `permissive`; overrides the kernel command line.
    pub mode: String,
    #[serde(rename = "policyDir")]
    pub policy_dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbGadget {
    pub serialnumber: String,
    pub manufacturer: String,
    pub product: String,
    /// UDC name written to the gadget's UDC file.
    pub controller: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(names: &[&str]) -> PartitionTable {
        PartitionTable {
            scheme: "gpt".into(),
            partitions: names
                .iter()
                .map(|n| Partition {
                    name: n.to_string(),
                    fs_type: "ext4".into(),
                    size: "1G".into(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_vendor_partition_detection() {
        assert!(!table(&["system", "userdata", "cache"]).has_vendor());
        assert!(table(&["system", "vendor", "userdata", "cache"]).has_vendor());
    }

    #[test]
    fn test_empty_selinux_mode_is_unset() {
        let mut board = BoardConfig::default();
        assert_eq!(board.selinux_mode(), None);
        board.selinux = Some(SeLinux::default());
        assert_eq!(board.selinux_mode(), None);
        board.selinux = Some(SeLinux {
            mode: "permissive".into(),
            policy_dir: String::new(),
        });
        assert_eq!(board.selinux_mode(), Some("permissive"));
    }
}
