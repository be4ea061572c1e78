//! Session context shared by local input and remote events.

use crate::color::Rgba;
use crate::history::SnapshotStack;
use crate::surface::{StrokeStyle, Surface};
use crate::tools::ToolState;
use kurbo::Point;

/// The mutable canvas state of one participant.
///
/// Both the local input translator and the remote event applier mutate the
/// canvas only through this context, so the same event produces the same
/// pixels regardless of where it came from.
#[derive(Debug, Clone)]
pub struct CanvasContext {
    pub surface: Surface,
    pub history: SnapshotStack,
    pub tools: ToolState,
}

impl CanvasContext {
    /// A blank canvas with an empty history.
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            surface: Surface::new(width, height, background),
            history: SnapshotStack::new(),
            tools: ToolState::default(),
        }
    }

    pub fn with_history(mut self, history: SnapshotStack) -> Self {
        self.history = history;
        self
    }

    pub fn with_tools(mut self, tools: ToolState) -> Self {
        self.tools = tools;
        self
    }

    pub fn draw_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        self.surface.stroke_segment(from, to, style);
    }

    /// Push the current surface as an undo checkpoint.
    pub fn checkpoint(&mut self) {
        self.history.push(&self.surface);
    }

    /// Undo the last checkpoint. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.history.pop_and_restore(&mut self.surface)
    }

    /// Wipe the surface and drop all checkpoints.
    pub fn reset(&mut self) {
        self.history.reset(&mut self.surface);
    }

    /// Reallocate the surface and restore the latest checkpoint into it.
    ///
    /// Returns false and changes nothing if the size is out of range.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.surface.resize(width, height) {
            return false;
        }
        self.history.restore_top(&mut self.surface);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_restores_latest_checkpoint() {
        let mut ctx = CanvasContext::new(300, 150, Rgba::white());
        ctx.draw_segment(
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            &StrokeStyle::paint(2, Rgba::black()),
        );
        ctx.checkpoint();

        assert!(ctx.resize(600, 300));
        assert_eq!(ctx.surface.width(), 600);
        assert_eq!(ctx.surface.pixel(50, 50), Some(Rgba::black()));
    }

    #[test]
    fn test_oversized_resize_keeps_canvas() {
        let mut ctx = CanvasContext::new(30, 20, Rgba::white());
        ctx.draw_segment(
            Point::new(0.0, 0.0),
            Point::new(29.0, 19.0),
            &StrokeStyle::paint(2, Rgba::black()),
        );
        let before = ctx.surface.clone();
        assert!(!ctx.resize(u32::MAX, u32::MAX));
        assert_eq!(ctx.surface, before);
    }

    #[test]
    fn test_resize_without_history_is_blank() {
        let mut ctx = CanvasContext::new(10, 10, Rgba::white());
        ctx.draw_segment(
            Point::new(0.0, 0.0),
            Point::new(9.0, 9.0),
            &StrokeStyle::paint(2, Rgba::black()),
        );
        ctx.resize(20, 20);
        assert!(ctx.surface.is_blank());
    }

    #[test]
    fn test_undo_and_reset() {
        let mut ctx = CanvasContext::new(10, 10, Rgba::white());
        assert!(!ctx.undo());

        ctx.checkpoint();
        ctx.draw_segment(
            Point::new(0.0, 0.0),
            Point::new(9.0, 9.0),
            &StrokeStyle::paint(2, Rgba::black()),
        );
        ctx.checkpoint();
        assert!(ctx.undo());
        assert!(ctx.surface.is_blank());

        ctx.reset();
        assert!(ctx.history.is_empty());
    }
}
