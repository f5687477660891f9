//! In-memory storage, for tests and embedding.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{BoardSnapshot, Storage, StorageError};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<String, BoardSnapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, snapshot: &BoardSnapshot) -> Result<(), StorageError> {
        let mut boards = self.boards.write().unwrap_or_else(|e| e.into_inner());
        boards.insert(key.to_string(), snapshot.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<BoardSnapshot, StorageError> {
        let boards = self.boards.read().unwrap_or_else(|e| e.into_inner());
        boards
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut boards = self.boards.write().unwrap_or_else(|e| e.into_inner());
        boards
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn exists(&self, key: &str) -> bool {
        let boards = self.boards.read().unwrap_or_else(|e| e.into_inner());
        boards.contains_key(key)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let boards = self.boards.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = boards.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DEFAULT_BOARD_KEY;

    #[test]
    fn test_save_load_delete() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists(DEFAULT_BOARD_KEY));
        storage
            .save(DEFAULT_BOARD_KEY, &BoardSnapshot::default())
            .unwrap();
        assert!(storage.exists(DEFAULT_BOARD_KEY));
        assert_eq!(storage.list().unwrap(), vec![DEFAULT_BOARD_KEY.to_string()]);
        storage.load(DEFAULT_BOARD_KEY).unwrap();
        storage.delete(DEFAULT_BOARD_KEY).unwrap();
        assert!(matches!(
            storage.load(DEFAULT_BOARD_KEY),
            Err(StorageError::NotFound(_))
        ));
    }
}
