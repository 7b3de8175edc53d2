//! End-to-end tests of the init/validate/update/clean pipeline.
//!
//! Every test works on a temporary root and an offline configuration, so no
//! Android tree is needed.

mod helpers;

use helpers::{
    assert_file_contains, assert_file_exists, assert_file_missing, list_files, offline_config,
    snapshot, TestEnv,
};
use std::fs;
use std::path::PathBuf;

use avs::commands::{cmd_clean, cmd_init, cmd_update, cmd_validate};
use avs::loader::{load_spec, save_spec};
use avs::state::{AvsState, StateError};
use avs::validate::ValidationError;

const GENERATED: &[&str] = &[
    "AndroidProducts.mk",
    "BoardConfig.mk",
    "device.mk",
    "fstab.widget",
    "init.widget.rc",
    "manifest.xml",
    "ueventd.rc.gen",
    "vendorsetup.sh",
    "widget.mk",
];

// =============================================================================
// init
// =============================================================================

#[test]
fn test_init_scaffolds_device_directory() {
    let env = TestEnv::new();

    let device_dir = cmd_init(&env.root, "acme", "widget", None).unwrap();

    assert_eq!(device_dir, env.device_dir);
    assert!(env.root.join("acme/widget-kernel").is_dir());
    assert_file_exists(&env.path("config.json"));
    assert_file_exists(&env.path(".avsstate"));

    let mut expected: Vec<String> = GENERATED.iter().map(|s| s.to_string()).collect();
    expected.push(".avsstate".into());
    expected.push("config.json".into());
    expected.sort();
    assert_eq!(list_files(&env.device_dir), expected);
}

#[test]
fn test_init_state_lists_exactly_generated_files() {
    let env = TestEnv::scaffolded();

    let state = AvsState::load(&env.device_dir).unwrap();

    assert_eq!(state.gen_dir, env.device_dir);
    let mut recorded = state.generated_files.clone();
    recorded.sort();
    let mut expected: Vec<PathBuf> = GENERATED.iter().map(|f| env.path(f)).collect();
    expected.sort();
    assert_eq!(recorded, expected);
}

#[test]
fn test_init_enriches_template() {
    let env = TestEnv::scaffolded();

    let spec = load_spec(env.path("config.json")).unwrap();
    assert_eq!(spec.product.name, "widget");
    assert_eq!(spec.product.manufacturer, "acme");

    assert_file_contains(&env.path("widget.mk"), "PRODUCT_NAME := widget\n");
    assert_file_contains(
        &env.path("widget.mk"),
        "$(call inherit-product, device/acme/widget/device.mk)",
    );
    assert_file_contains(
        &env.path("device.mk"),
        "LOCAL_KERNEL := device/acme/widget-kernel/Image\n",
    );
    assert_file_contains(
        &env.path("device.mk"),
        "$(LOCAL_PATH)/init.widget.rc:root/init.widget.rc",
    );
    assert_file_contains(
        &env.path("BoardConfig.mk"),
        "BOARD_SEPOLICY_DIRS += device/acme/widget/sepolicy\n",
    );
    assert_file_contains(
        &env.path("BoardConfig.mk"),
        "BOARD_KERNEL_CMDLINE := androidboot.hardware=widget androidboot.selinux=permissive",
    );
    assert_file_contains(&env.path("AndroidProducts.mk"), "$(LOCAL_DIR)/widget.mk");
    assert_file_contains(&env.path("vendorsetup.sh"), "add_lunch_combo widget-userdebug");
    assert_file_contains(&env.path("manifest.xml"), "<name>android.hardware.audio</name>");
    assert_file_contains(&env.path("fstab.widget"), "/dev/block/by-name/userdata    /data");
    assert_file_contains(&env.path("init.widget.rc"), "on fs\n    mount_all /fstab.${ro.hardware}\n");
}

#[test]
fn test_init_from_custom_config() {
    let env = TestEnv::scaffolded();
    let mut spec = load_spec(env.path("config.json")).unwrap();
    spec.product.inherit_products = vec!["aosp_arm64".into()];
    let template = env.root.join("template.json");
    save_spec(&spec, &template).unwrap();

    let gadget = cmd_init(&env.root, "acme", "gadget", Some(&template)).unwrap();

    assert_file_contains(&gadget.join("gadget.mk"), "PRODUCT_NAME := gadget\n");
    assert_file_contains(
        &gadget.join("gadget.mk"),
        "$(SRC_TARGET_DIR)/product/aosp_arm64.mk",
    );
    assert_file_exists(&gadget.join("init.gadget.rc"));
}

// =============================================================================
// validate
// =============================================================================

#[test]
fn test_validate_scaffold_passes_and_writes_nothing() {
    let env = TestEnv::scaffolded();
    let before = snapshot(&env.device_dir);

    let report = cmd_validate(&env.device_dir, &offline_config()).unwrap();

    assert!(report.passed());
    assert_eq!(snapshot(&env.device_dir), before);
}

#[test]
fn test_validate_without_config_json() {
    let env = TestEnv::new();
    fs::create_dir_all(&env.device_dir).unwrap();

    let err = cmd_validate(&env.device_dir, &offline_config()).unwrap_err();

    assert!(err.to_string().contains("config.json"));
}

#[test]
fn test_partition_violation_fails_validation() {
    let env = TestEnv::scaffolded();
    let mut spec = load_spec(env.path("config.json")).unwrap();
    spec.board_config
        .partition_table
        .partitions
        .retain(|p| p.name != "cache");
    save_spec(&spec, env.path("config.json")).unwrap();

    let err = cmd_validate(&env.device_dir, &offline_config()).unwrap_err();

    let validation = err.downcast_ref::<ValidationError>().unwrap();
    assert_eq!(validation.failed_rules, ["partitions"]);
    assert!(validation
        .report
        .failures()
        .any(|f| f.message.contains("missing partition table declarations")));
}

// =============================================================================
// update
// =============================================================================

#[test]
fn test_update_after_init_is_stable() {
    let env = TestEnv::scaffolded();
    let before = snapshot(&env.device_dir);

    let state = cmd_update(&env.device_dir, &offline_config()).unwrap();

    assert_eq!(state.generated_files.len(), GENERATED.len());
    assert_eq!(snapshot(&env.device_dir), before);
}

#[test]
fn test_update_refuses_invalid_spec() {
    let env = TestEnv::scaffolded();
    cmd_clean(&env.device_dir).unwrap();
    let mut spec = load_spec(env.path("config.json")).unwrap();
    spec.boot_image.rootfs_overlay.fstab.mounts.pop();
    spec.boot_image.rootfs_overlay.fstab.mounts.remove(0);
    save_spec(&spec, env.path("config.json")).unwrap();

    let err = cmd_update(&env.device_dir, &offline_config()).unwrap_err();

    assert!(err.downcast_ref::<ValidationError>().is_some());
    assert_file_missing(&env.path("device.mk"));
}

#[test]
fn test_update_picks_up_config_changes() {
    let env = TestEnv::scaffolded();
    let mut spec = load_spec(env.path("config.json")).unwrap();
    spec.product.model = "Widget Pro".into();
    save_spec(&spec, env.path("config.json")).unwrap();

    cmd_update(&env.device_dir, &offline_config()).unwrap();

    assert_file_contains(&env.path("widget.mk"), "PRODUCT_MODEL := Widget Pro\n");
}

// =============================================================================
// clean
// =============================================================================

#[test]
fn test_clean_removes_generated_files_only() {
    let env = TestEnv::scaffolded();
    env.write("ol.hal.widget.wifi.json", r#"{"name": "wifi"}"#);
    env.write("notes.txt", "hand written");

    let summary = cmd_clean(&env.device_dir).unwrap();

    assert_eq!(summary.removed.len(), GENERATED.len());
    assert!(summary.missing.is_empty());
    assert_eq!(
        list_files(&env.device_dir),
        [".avsstate", "config.json", "notes.txt", "ol.hal.widget.wifi.json"]
    );
}

#[test]
fn test_second_clean_reports_no_state() {
    let env = TestEnv::scaffolded();
    cmd_clean(&env.device_dir).unwrap();

    let err = cmd_clean(&env.device_dir).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<StateError>(),
        Some(StateError::NoState { .. })
    ));
}

#[test]
fn test_clean_tolerates_already_deleted_files() {
    let env = TestEnv::scaffolded();
    fs::remove_file(env.path("device.mk")).unwrap();

    let summary = cmd_clean(&env.device_dir).unwrap();

    assert_eq!(summary.missing, [env.path("device.mk")]);
    assert_eq!(summary.removed.len(), GENERATED.len() - 1);
}

#[test]
fn test_clean_without_state_fails() {
    let env = TestEnv::new();
    fs::create_dir_all(&env.device_dir).unwrap();

    let err = cmd_clean(&env.device_dir).unwrap_err();

    assert!(err.downcast_ref::<StateError>().is_some());
}

#[test]
fn test_clean_moved_device_directory() {
    let env = TestEnv::scaffolded();
    let moved = env.root.join("acme/moved");
    fs::rename(&env.device_dir, &moved).unwrap();

    let summary = cmd_clean(&moved).unwrap();

    assert_eq!(summary.removed.len(), GENERATED.len());
    assert!(!env.device_dir.exists());
    assert_eq!(list_files(&moved), [".avsstate", "config.json"]);
    assert!(matches!(
        cmd_clean(&moved).unwrap_err().downcast_ref::<StateError>(),
        Some(StateError::NoState { .. })
    ));
}

#[test]
fn test_update_after_clean_regenerates() {
    let env = TestEnv::scaffolded();
    cmd_clean(&env.device_dir).unwrap();

    cmd_update(&env.device_dir, &offline_config()).unwrap();

    for f in GENERATED {
        assert_file_exists(&env.path(f));
    }
    assert_eq!(
        AvsState::load(&env.device_dir).unwrap().generated_files.len(),
        GENERATED.len()
    );
}

// =============================================================================
// round trip
// =============================================================================

#[test]
fn test_config_json_round_trip_is_byte_identical() {
    let env = TestEnv::scaffolded();
    let original = env.config_json();

    let spec = load_spec(env.path("config.json")).unwrap();
    let copy = env.root.join("copy.json");
    save_spec(&spec, &copy).unwrap();

    assert_eq!(fs::read_to_string(&copy).unwrap(), original);
    assert_eq!(load_spec(&copy).unwrap(), spec);
}
