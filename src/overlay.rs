//! HAL overlays.
//!
//! An overlay is a file `ol.hal.<anything>.json` in the device directory holding
//! one HAL. A good name is `ol.hal.<device>.<hal>.json`. Each overlay replaces the
//! HAL of the same name in place, or is appended when the spec has no such HAL.
//!
//! Overlays are optional: an unreadable directory leaves the spec untouched, and a
//! malformed overlay is reported and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::loader::load_hal_spec;
use crate::spec::{Hal, Spec};

pub const OVERLAY_PREFIX: &str = "ol.hal.";
pub const OVERLAY_SUFFIX: &str = ".json";

/// Where an overlay landed in `Spec::hals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Replaced(usize),
    Appended(usize),
}

/// True if `file_name` follows the overlay naming convention.
pub fn is_overlay_file_name(file_name: &str) -> bool {
    file_name.len() > OVERLAY_PREFIX.len() + OVERLAY_SUFFIX.len()
        && file_name.starts_with(OVERLAY_PREFIX)
        && file_name.ends_with(OVERLAY_SUFFIX)
}

/// Overlay files in `dir`, sorted by file name.
pub fn find_overlays(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut overlays: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .map(|n| is_overlay_file_name(&n.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();
    overlays.sort();
    overlays
}

/// Replace the HAL of the same name, keeping its position, or append it.
pub fn apply_hal_overlay(spec: &mut Spec, hal: Hal) -> Placement {
    match spec.hal_index(&hal.name) {
        Some(index) => {
            spec.hals[index] = hal;
            Placement::Replaced(index)
        }
        None => {
            spec.hals.push(hal);
            Placement::Appended(spec.hals.len() - 1)
        }
    }
}

/// Merge every overlay found in `dir` into `spec`.
///
/// Returns the overlays that were applied.
pub fn merge_overlays(spec: &mut Spec, dir: &Path) -> Vec<PathBuf> {
    let mut applied = Vec::new();

    for path in find_overlays(dir) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match load_hal_spec(&path) {
            Ok(hal) => {
                let hal_name = hal.name.clone();
                match apply_hal_overlay(spec, hal) {
                    Placement::Replaced(_) => {
                        println!("Loading overlay {} (replaces HAL '{}')", name, hal_name)
                    }
                    Placement::Appended(_) => {
                        println!("Loading overlay {} (adds HAL '{}')", name, hal_name)
                    }
                }
                applied.push(path);
            }
            Err(e) => {
                eprintln!("  [WARN] Skipping overlay {}: {}", name, e);
            }
        }
    }

    applied
}
