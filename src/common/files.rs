//! File writes with automatic parent directory creation.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Write a file, creating parent directories as needed.
///
/// Replaces the usual pattern of:
/// ```ignore
/// if let Some(parent) = path.parent() {
///     fs::create_dir_all(parent)?;
/// }
/// fs::write(path, content)?;
/// ```
pub fn write_file_with_dirs<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> io::Result<()> {
    let path = path.as_ref();
    ensure_parent_exists(path)?;
    fs::write(path, content)
}

/// Write a file with specific Unix permissions, creating parent directories as needed.
pub fn write_file_mode<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
    mode: u32,
) -> io::Result<()> {
    let path = path.as_ref();
    write_file_with_dirs(path, content)?;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

/// Ensure all parent directories of a file exist.
pub fn ensure_parent_exists(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Remove a file, treating "already gone" as success.
///
/// Returns whether a file was actually removed.
pub fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_with_dirs_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rootfs/nested/init.usb.rc");

        write_file_with_dirs(&path, "on boot\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "on boot\n");
    }

    #[test]
    fn test_write_file_mode_sets_permissions() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");

        write_file_mode(&path, "{}", 0o666).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o666);
    }

    #[test]
    fn test_remove_file_if_exists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("device.mk");
        fs::write(&path, "").unwrap();

        assert!(remove_file_if_exists(&path).unwrap());
        assert!(!remove_file_if_exists(&path).unwrap());
    }
}
