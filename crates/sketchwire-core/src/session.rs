//! A participant's drawing session.
//!
//! Owns the canvas context and connects local input, remote events, the
//! sync channel and persistence. Everything runs on the caller's thread;
//! the host feeds input with [`DrawingSession::handle_input`] and calls
//! [`DrawingSession::pump`] once per frame to apply what peers sent.

use crate::applier::{Applied, RemoteEventApplier};
use crate::color::Rgba;
use crate::config::SessionConfig;
use crate::context::CanvasContext;
use crate::error::{ExportError, SyncError};
use crate::export;
use crate::history::SnapshotStack;
use crate::input::{LocalInputTranslator, PointerInput, Viewport};
use crate::protocol::DrawEvent;
use crate::storage::{CanvasStore, SavedCanvas, StorageError};
use crate::surface::{MAX_DIMENSION, Surface, dimensions_valid};
use crate::sync::{
    ConnectionState, OfflineTransport, PlatformWebSocket, SyncChannel, Transport, TransportError,
};
use crate::tools::{ToolState, preset_width};

/// One participant: canvas state, input handling, sync and persistence.
pub struct DrawingSession<T: Transport> {
    ctx: CanvasContext,
    input: LocalInputTranslator,
    applier: RemoteEventApplier,
    channel: SyncChannel<T>,
    store: Option<Box<dyn CanvasStore>>,
    storage_key: String,
    pen_width: u32,
    eraser_width: u32,
    history_limit: Option<usize>,
}

impl<T: Transport> DrawingSession<T> {
    /// Start a session on a blank canvas. The blank canvas is the first
    /// checkpoint, so undoing every stroke returns to it.
    pub fn new(config: SessionConfig, transport: T) -> Self {
        let tools = ToolState::new(Rgba::black(), config.pen_width);
        let mut ctx = CanvasContext::new(config.width, config.height, config.background)
            .with_history(SnapshotStack::with_limit(config.history_limit))
            .with_tools(tools);
        ctx.checkpoint();

        log::info!(
            "Drawing session started: {}x{} canvas",
            config.width,
            config.height
        );

        Self {
            ctx,
            input: LocalInputTranslator::new(Viewport::identity(config.width, config.height)),
            applier: RemoteEventApplier::new(),
            channel: SyncChannel::new(transport),
            store: None,
            storage_key: config.storage_key,
            pen_width: config.pen_width,
            eraser_width: config.eraser_width,
            history_limit: config.history_limit,
        }
    }

    /// Attach a store and restore the canvas saved under the session key.
    pub fn with_store(mut self, store: Box<dyn CanvasStore>) -> Self {
        self.store = Some(store);
        self.restore();
        self
    }

    /// Detach the store, e.g. to hand it to another session.
    pub fn take_store(&mut self) -> Option<Box<dyn CanvasStore>> {
        self.store.take()
    }

    fn restore(&mut self) {
        let Some(store) = &self.store else {
            return;
        };

        let saved = match store.load(&self.storage_key) {
            Ok(saved) => saved,
            Err(StorageError::NotFound(_)) => {
                log::debug!("No saved canvas under '{}'", self.storage_key);
                return;
            }
            Err(e) => {
                log::warn!("Failed to load saved canvas: {}", e);
                return;
            }
        };

        if !dimensions_valid(saved.width, saved.height) {
            log::warn!("Ignoring saved canvas of size {}x{}", saved.width, saved.height);
            return;
        }

        let image = match saved.decode() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Saved canvas is unreadable: {}", e);
                return;
            }
        };

        // Blank checkpoint at the saved size, then the restored image on top.
        self.ctx.history = SnapshotStack::with_limit(self.history_limit);
        self.ctx.surface.resize(saved.width, saved.height);
        self.ctx.checkpoint();
        self.ctx
            .surface
            .put_rgba(image.width, image.height, &image.pixels);
        self.ctx.checkpoint();
        self.input
            .set_viewport(Viewport::identity(saved.width, saved.height));

        log::info!("Restored {}x{} canvas", saved.width, saved.height);
    }

    /// Apply one local input and broadcast the resulting event.
    ///
    /// A completed stroke is persisted right after its checkpoint.
    pub fn handle_input(&mut self, input: PointerInput) -> Option<DrawEvent> {
        let event = self.input.handle(input, &mut self.ctx)?;
        self.broadcast(&event);
        if matches!(input, PointerInput::Up | PointerInput::TouchEnd) {
            self.persist();
        }
        Some(event)
    }

    /// Apply everything peers have sent since the last call, in receipt
    /// order. Returns how many events changed pixels.
    ///
    /// A remote reset is persisted like a local one.
    pub fn pump(&mut self) -> usize {
        let mut changed = 0;
        let mut was_reset = false;
        for event in self.channel.poll() {
            if self.applier.apply(&event, &mut self.ctx) == Applied::Raster {
                changed += 1;
                was_reset |= event == DrawEvent::Reset;
            }
        }
        if was_reset {
            self.persist();
        }
        changed
    }

    /// Switch to the pen at its default width.
    pub fn select_pen(&mut self) {
        self.ctx.tools.select_pen(self.pen_width);
        self.broadcast(&DrawEvent::PenSelected {
            size: self.ctx.tools.width(),
        });
    }

    /// Switch to the eraser at its default width.
    pub fn select_eraser(&mut self) {
        self.ctx.tools.select_eraser(self.eraser_width);
        self.broadcast(&DrawEvent::EraserSelected {
            size: self.ctx.tools.width(),
        });
    }

    /// Pick a palette color. This also selects the pen.
    pub fn pick_color(&mut self, color: Rgba) {
        self.ctx.tools.set_color(color);
        self.broadcast(&DrawEvent::ColorChange { color });
    }

    /// Pick one of the width presets by tab index.
    /// Returns false if there is no such preset.
    pub fn pick_size(&mut self, index: usize) -> bool {
        match preset_width(index) {
            Some(width) => {
                self.set_size(width);
                true
            }
            None => false,
        }
    }

    pub fn set_size(&mut self, width: u32) {
        self.ctx.tools.set_width(width);
        self.broadcast(&DrawEvent::SizeChange {
            size: self.ctx.tools.width(),
        });
    }

    /// Undo the last local checkpoint and ask peers to undo theirs.
    pub fn undo(&mut self) -> bool {
        let changed = self.ctx.undo();
        self.broadcast(&DrawEvent::Clear);
        changed
    }

    /// Wipe the canvas and history everywhere.
    pub fn reset(&mut self) {
        self.ctx.reset();
        self.broadcast(&DrawEvent::Reset);
        self.persist();
    }

    /// Resize the canvas from user-entered dimensions.
    ///
    /// Dimensions must be positive integers; otherwise nothing changes.
    /// The content of the latest checkpoint is restored into the new raster.
    pub fn request_resize(&mut self, width: &str, height: &str) -> Result<(), SyncError> {
        let width = parse_dimension(width)?;
        let height = parse_dimension(height)?;

        if !self.ctx.resize(width, height) {
            return Err(SyncError::InvalidResize(format!(
                "{}x{} is too large",
                width, height
            )));
        }
        log::info!("Canvas resized to {}x{}", width, height);
        self.broadcast(&DrawEvent::Resize { width, height });
        Ok(())
    }

    /// Write the current canvas to the store, if one is attached.
    ///
    /// Failures are logged; drawing is never interrupted.
    pub fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let saved = match SavedCanvas::capture(&self.ctx.surface) {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("Failed to encode canvas for saving: {}", e);
                return;
            }
        };
        if let Err(e) = store.save(&self.storage_key, &saved) {
            log::warn!("Failed to save canvas: {}", e);
        }
    }

    /// Persist and close the connection, e.g. when the page unloads.
    pub fn shutdown(&mut self) {
        self.persist();
        self.channel.close();
    }

    /// The canvas as PNG bytes.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        export::encode_png(&self.ctx.surface)
    }

    /// The canvas as a `data:image/png;base64,` URL.
    pub fn export_data_url(&self) -> Result<String, ExportError> {
        export::surface_to_data_url(&self.ctx.surface)
    }

    /// Update where the surface is displayed.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.input.set_viewport(viewport);
    }

    pub fn viewport(&self) -> &Viewport {
        self.input.viewport()
    }

    pub fn context(&self) -> &CanvasContext {
        &self.ctx
    }

    pub fn surface(&self) -> &Surface {
        &self.ctx.surface
    }

    pub fn tools(&self) -> &ToolState {
        &self.ctx.tools
    }

    pub fn history(&self) -> &SnapshotStack {
        &self.ctx.history
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.channel.state()
    }

    pub fn channel(&self) -> &SyncChannel<T> {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut SyncChannel<T> {
        &mut self.channel
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Fire-and-forget: the channel logs and counts dropped events.
    fn broadcast(&mut self, event: &DrawEvent) {
        let _ = self.channel.send(event);
    }
}

impl DrawingSession<OfflineTransport> {
    /// A session that draws locally and never connects.
    pub fn offline(config: SessionConfig) -> Self {
        Self::new(config, OfflineTransport::default())
    }
}

impl DrawingSession<PlatformWebSocket> {
    /// Connect to the configured hub over WebSocket.
    pub fn connect(config: SessionConfig) -> Result<Self, TransportError> {
        let url = config
            .hub_url
            .clone()
            .ok_or_else(|| TransportError::InvalidUrl("no hub URL configured".to_string()))?;
        let mut socket = PlatformWebSocket::new();
        socket.connect(&url)?;
        Ok(Self::new(config, socket))
    }
}

fn parse_dimension(value: &str) -> Result<u32, SyncError> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err(SyncError::InvalidResize(format!("{:?} must be positive", value))),
        Ok(n) if n > MAX_DIMENSION => Err(SyncError::InvalidResize(format!(
            "{} exceeds the maximum of {}",
            n, MAX_DIMENSION
        ))),
        Ok(n) => Ok(n),
        Err(_) => Err(SyncError::InvalidResize(format!("{:?} is not a number", value))),
    }
}
