//! SketchWire Core Library
//!
//! Shared-canvas drawing with real-time broadcast sync: a raster surface,
//! per-participant undo snapshots, tool state, the local input state
//! machine, the wire protocol and the applier that replays peer events.

pub mod applier;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod history;
pub mod input;
pub mod protocol;
pub mod session;
pub mod storage;
pub mod surface;
pub mod sync;
pub mod tools;

pub use applier::{Applied, RemoteEventApplier};
pub use color::Rgba;
pub use config::SessionConfig;
pub use context::CanvasContext;
pub use error::{ExportError, SyncError};
pub use history::{Snapshot, SnapshotStack};
pub use input::{InputPhase, LocalInputTranslator, PointerInput, Viewport};
pub use protocol::{DrawEvent, StrokeSample};
pub use session::DrawingSession;
pub use storage::{CanvasStore, MemoryStore, SavedCanvas, StorageError};
pub use surface::{StrokeColor, StrokeStyle, Surface};
pub use sync::{
    ConnectionState, MemoryHub, OfflineTransport, PlatformWebSocket, SyncChannel, Transport,
    TransportError, TransportEvent,
};
pub use tools::{ToolMode, ToolState};
