//! File-backed storage: one JSON file per board key.

use std::fs;
use std::path::{Path, PathBuf};

use super::{BoardSnapshot, Storage, StorageError};

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform data directory, e.g. `~/.local/share/copperdraft` on Linux.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::new(dir.join("copperdraft")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys may contain dots but never path separators
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl Storage for FileStorage {
    fn save(&self, key: &str, snapshot: &BoardSnapshot) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(self.path_for(key), json)?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<BoardSnapshot, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        let raw = fs::read_to_string(path)?;
        // Lossy parse: a damaged file still yields a usable board
        Ok(BoardSnapshot::from_json_lossy(&raw))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
            Err(err) => return Err(err.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, Layer, Pad};
    use crate::storage::DEFAULT_BOARD_KEY;
    use kurbo::Point;

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let snapshot = BoardSnapshot {
            elements: vec![Element::Pad(Pad::new(Layer::Top, Point::new(3.0, 4.0), 1.5))],
            ..Default::default()
        };
        storage.save(DEFAULT_BOARD_KEY, &snapshot).unwrap();
        assert!(storage.exists(DEFAULT_BOARD_KEY));
        let loaded = storage.load(DEFAULT_BOARD_KEY).unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(storage.list().unwrap(), vec![DEFAULT_BOARD_KEY.to_string()]);
    }

    #[test]
    fn test_damaged_file_loads_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(
            storage.path_for(DEFAULT_BOARD_KEY),
            r#"{"elements": "corrupted"}"#,
        )
        .unwrap();
        let loaded = storage.load(DEFAULT_BOARD_KEY).unwrap();
        assert!(loaded.elements.is_empty());
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.load("nope"),
            Err(StorageError::NotFound(_))
        ));
        assert!(storage.list().unwrap().is_empty());
    }
}
