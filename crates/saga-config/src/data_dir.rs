//! Discovery and creation of the `.saga/` data directory.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// The name of the saga data directory.
pub const DATA_DIR_NAME: &str = ".saga";

/// Environment variable that overrides directory discovery.
pub const DATA_DIR_ENV: &str = "SAGA_DIR";

/// Finds the data directory: `SAGA_DIR` if it names a directory, otherwise
/// the nearest `.saga/` at or above `start`.
pub fn find_data_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(DATA_DIR_ENV) {
        let env_path = PathBuf::from(env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }
    walk_up(start)
}

/// Like [`find_data_dir`], failing with [`ConfigError::DataDirNotFound`].
pub fn find_data_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_data_dir(start).ok_or(ConfigError::DataDirNotFound)
}

/// Walks up from `start` looking for a `.saga/` directory.
pub fn walk_up(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Ensures a `.saga/` directory exists at `path` (or below it, if `path`
/// is not itself named `.saga`) and returns it.
pub fn ensure_data_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let data_dir = if path.ends_with(DATA_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(DATA_DIR_NAME)
    };
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}
