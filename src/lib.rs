//! avs - Android device build specification compiler.
//!
//! A device is described by one `config.json`. avs turns it into the makefiles,
//! fstab, init scripts and manifest the Android build expects, and keeps track
//! of what it generated so the directory can be cleaned again.
//!
//! Pipeline: [`loader`] → [`overlay`] → [`validate`] → [`generate`] → [`state`].

pub mod commands;
pub mod common;
pub mod config;
pub mod context;
pub mod generate;
pub mod loader;
pub mod overlay;
pub mod spec;
pub mod state;
pub mod validate;
