//! Shared utilities across avs modules.

pub mod files;

pub use files::{ensure_parent_exists, remove_file_if_exists, write_file_mode, write_file_with_dirs};
