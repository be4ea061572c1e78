//! Browser `localStorage` implementation for WebAssembly.

use super::{CanvasStore, SavedCanvas, StorageError, StorageResult};
use web_sys::Storage;

/// Stores canvases as JSON strings in `window.localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Open the window's local storage.
    pub fn new() -> StorageResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl CanvasStore for LocalStorageStore {
    fn save(&self, key: &str, canvas: &SavedCanvas) -> StorageResult<()> {
        let json = canvas
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage
            .set_item(key, &json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {:?}", key, e)))
    }

    fn load(&self, key: &str) -> StorageResult<SavedCanvas> {
        let json = self
            .storage
            .get_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        SavedCanvas::from_json(&json).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to delete {}: {:?}", key, e)))
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        self.storage
            .get_item(key)
            .map(|v| v.is_some())
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))
    }
}
