//! Boot image: kernel, mkbootimg arguments and the rootfs overlay.

use serde::{Deserialize, Serialize};

use super::rc::RcScript;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<MkBootImgArgs>,
    pub kernel: Kernel,
    pub rootfs_overlay: RootfsOverlay,
}

impl BootImage {
    pub fn load_address(&self) -> Option<&LoadAddress> {
        self.args.as_ref().and_then(|a| a.lda.as_ref())
    }
}

/// Arguments handed to mkbootimg.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MkBootImgArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lda: Option<LoadAddress>,
}

/// Load address overrides. Either every field is set or none is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadAddress {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub load_base: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kernel_offset: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ramdisk_offset: String,
}

impl LoadAddress {
    fn fields(&self) -> [&str; 3] {
        [
            self.load_base.trim(),
            self.kernel_offset.trim(),
            self.ramdisk_offset.trim(),
        ]
    }

    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|f| !f.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|f| f.is_empty())
    }

    /// All set or all unset; a partial override is invalid.
    pub fn is_consistent(&self) -> bool {
        self.is_complete() || self.is_empty()
    }
}

/// Kernel image, device tree and the vendor part of the command line.
///
/// `androidboot.hardware`, `androidboot.selinux` and `firmware_class.path` are
/// added automatically when the full command line is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kernel {
    pub cmd_line: String,
    pub local_kernel: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub compressed: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub local_dtb: String,
}

/// Files placed in the ramdisk root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootfsOverlay {
    /// Installed as fstab.<product>.
    pub fstab: Fstab,
    /// The entry point is init.<hardware>.rc, which imports the rest.
    #[serde(rename = "init.rc")]
    pub init_rc: Vec<RcScript>,
    /// Installed as ueventd.<product>.rc.
    #[serde(rename = "uevent.rc")]
    pub uevent_rc: UeventRc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fstab {
    /// Generated file name, default fstab.<product>.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub mounts: Vec<Mount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    pub src: String,
    pub dst: String,
    #[serde(rename = "type")]
    pub fs_type: String,
    pub mnt_flag: String,
    pub fs_mgr_flag: String,
}

/// Rules for ueventd.
///
/// With `file` set the file is copied as is and the rest is ignored. Otherwise a
/// script is generated at `name` (default `ueventd.rc.gen`) from `rules` plus
/// every HAL's `uevent_rules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeventRc {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub rules: Vec<UeventRule>,
}

impl UeventRc {
    pub fn is_external(&self) -> bool {
        !self.file.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeventRule {
    pub node: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub attr: String,
    pub mode: String,
    pub uid: String,
    #[serde(alias = "guid")]
    pub gid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lda(base: &str, kernel: &str, ramdisk: &str) -> LoadAddress {
        LoadAddress {
            load_base: base.into(),
            kernel_offset: kernel.into(),
            ramdisk_offset: ramdisk.into(),
        }
    }

    #[test]
    fn test_load_address_consistency() {
        assert!(lda("0x0", "0x80000", "0x2000000").is_consistent());
        assert!(lda("", "", "").is_consistent());
        assert!(lda(" ", "", "").is_consistent());
        assert!(!lda("0x0", "", "").is_consistent());
        assert!(!lda("0x0", "0x80000", "").is_consistent());
    }
}
