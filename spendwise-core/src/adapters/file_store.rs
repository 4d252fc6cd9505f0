//! Filesystem-backed state store
//!
//! Each key is stored as `<key>.json` inside the data directory. Writes go
//! through a temp file in the same directory and are renamed into place, so a
//! crash mid-write leaves the previous value intact.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::ports::StateStore;

const EXTENSION: &str = "json";

/// State store writing one JSON file per key
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::storage(format!("Invalid state key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

impl StateStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path)
            .map_err(|e| Error::storage(format!("Failed to persist {}: {}", key, e.error)))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_read_remove() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        assert_eq!(store.read("spendwise_income").unwrap(), None);

        store.write("spendwise_income", "{\"version\":1,\"data\":\"50000\"}").unwrap();
        assert_eq!(
            store.read("spendwise_income").unwrap().as_deref(),
            Some("{\"version\":1,\"data\":\"50000\"}")
        );
        assert_eq!(store.keys().unwrap(), vec!["spendwise_income".to_string()]);

        store.remove("spendwise_income").unwrap();
        assert_eq!(store.read("spendwise_income").unwrap(), None);
        // Removing twice is fine
        store.remove("spendwise_income").unwrap();
    }

    #[test]
    fn test_clear_only_touches_json_files() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.write("a", "1").unwrap();
        store.write("b", "2").unwrap();
        std::fs::write(dir.path().join("settings.txt"), "keep").unwrap();

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(dir.path().join("settings.txt").exists());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(matches!(store.write("../escape", "x"), Err(Error::Storage(_))));
        assert!(store.read("").is_err());
    }
}
