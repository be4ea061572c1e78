//! Key-value persistence of the latest canvas image.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

use crate::error::ExportError;
use crate::export::{self, RgbaImage};
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key the canvas is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "canvasState";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Canvas not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<ExportError> for StorageError {
    fn from(e: ExportError) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// The persisted canvas: a PNG data URL plus its dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCanvas {
    #[serde(rename = "dataURL")]
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

impl SavedCanvas {
    /// Encode the current surface.
    pub fn capture(surface: &Surface) -> Result<Self, ExportError> {
        Ok(Self {
            data_url: export::surface_to_data_url(surface)?,
            width: surface.width(),
            height: surface.height(),
        })
    }

    /// Decode the stored image.
    pub fn decode(&self) -> Result<RgbaImage, ExportError> {
        export::decode_png(&export::from_data_url(&self.data_url)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A synchronous key-value store for saved canvases.
///
/// The session calls it from its own thread after every checkpoint, so
/// implementations should be quick and must not block on the network.
pub trait CanvasStore {
    fn save(&self, key: &str, canvas: &SavedCanvas) -> StorageResult<()>;

    fn load(&self, key: &str) -> StorageResult<SavedCanvas>;

    fn delete(&self, key: &str) -> StorageResult<()>;

    fn exists(&self, key: &str) -> StorageResult<bool>;
}
