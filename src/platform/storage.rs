//! JSON file storage under the per-user data directory
//!
//! The data directory is `$CHAOS_SURVIVAL_HOME` when set, otherwise
//! `$HOME/.chaos_survival`, otherwise `./.chaos_survival`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors raised while reading or writing stored files
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// Filesystem failure
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exists but does not hold the expected JSON
    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "CHAOS_SURVIVAL_HOME";

/// Resolve the data directory
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(dir);
    }
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    home.join(".chaos_survival")
}

/// Load `name` from the data directory. `Ok(None)` when the file is absent.
pub fn load_json<T: DeserializeOwned>(name: &str) -> Result<Option<T>, StorageError> {
    load_json_from(&data_dir().join(name))
}

/// Save `value` as `name` in the data directory
pub fn save_json<T: Serialize>(name: &str, value: &T) -> Result<(), StorageError> {
    save_json_to(&data_dir().join(name), value)
}

/// Load a JSON file from an explicit path. `Ok(None)` when the file is absent.
pub fn load_json_from<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a JSON file to an explicit path, creating parent directories.
///
/// The file is written to a temporary sibling first and renamed into place.
pub fn save_json_to<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chaos_survival_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = scratch_dir("missing");
        let loaded: Option<BTreeMap<String, u32>> = load_json_from(&dir.join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join("scores.json");
        let mut value = BTreeMap::new();
        value.insert("best".to_string(), 420u32);

        save_json_to(&path, &value).unwrap();
        let loaded: Option<BTreeMap<String, u32>> = load_json_from(&path).unwrap();
        assert_eq!(loaded, Some(value));
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = scratch_dir("malformed");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Option<BTreeMap<String, u32>>, _> = load_json_from(&path);
        assert!(matches!(result, Err(StorageError::Json { .. })));

        let _ = fs::remove_dir_all(&dir);
    }
}
