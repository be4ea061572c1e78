//! In-memory storage implementation.

use super::{CanvasStore, SavedCanvas, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    canvases: RwLock<HashMap<String, SavedCanvas>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl CanvasStore for MemoryStore {
    fn save(&self, key: &str, canvas: &SavedCanvas) -> StorageResult<()> {
        let mut canvases = self.canvases.write().map_err(lock_error)?;
        canvases.insert(key.to_string(), canvas.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> StorageResult<SavedCanvas> {
        let canvases = self.canvases.read().map_err(lock_error)?;
        canvases
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut canvases = self.canvases.write().map_err(lock_error)?;
        canvases.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let canvases = self.canvases.read().map_err(lock_error)?;
        Ok(canvases.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> SavedCanvas {
        SavedCanvas {
            data_url: "data:image/png;base64,".to_string(),
            width: 10,
            height: 20,
        }
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        store.save("test", &canvas()).unwrap();
        assert_eq!(store.load("test").unwrap(), canvas());
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.load("nonexistent"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let store = MemoryStore::new();
        assert!(!store.exists("test").unwrap());
        store.save("test", &canvas()).unwrap();
        assert!(store.exists("test").unwrap());
        store.delete("test").unwrap();
        assert!(!store.exists("test").unwrap());
    }
}
