//! JSON loading and saving of device specifications.
//!
//! Output is pretty-printed with a fixed field order and a trailing newline, so a
//! save/load/save cycle is byte-identical.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::common::files::write_file_mode;
use crate::spec::{Hal, Spec};

/// Generated files are group and world writable, like the rest of the device tree.
pub const SPEC_FILE_MODE: u32 = 0o666;

/// Errors loading or saving specification files.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("JSON specification file {} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed specification {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} isn't an absolute path", .path.display())]
    RelativePath { path: PathBuf },

    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SpecError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SpecError::NotFound { .. })
    }
}

/// Load a full device specification.
pub fn load_spec(path: impl AsRef<Path>) -> Result<Spec, SpecError> {
    load_json(path.as_ref())
}

/// Load a single HAL fragment, as used by overlays.
pub fn load_hal_spec(path: impl AsRef<Path>) -> Result<Hal, SpecError> {
    load_json(path.as_ref())
}

/// Decode a specification held in memory, e.g. the bundled scaffold template.
pub fn load_spec_from_str(json: &str) -> Result<Spec, SpecError> {
    serde_json::from_str(json).map_err(|source| SpecError::Parse {
        path: PathBuf::from("<memory>"),
        source,
    })
}

/// Serialize `value` to `path`, which must be absolute.
pub fn save_spec<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<(), SpecError> {
    let path = path.as_ref();
    if !path.is_absolute() {
        return Err(SpecError::RelativePath {
            path: path.to_path_buf(),
        });
    }

    let json = to_json(value).map_err(|source| SpecError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    write_file_mode(path, json, SPEC_FILE_MODE).map_err(|source| SpecError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// The canonical on-disk rendering of a value.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, SpecError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SpecError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SpecError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&content).map_err(|source| SpecError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
