//! Tool state: active color, stroke width and pen/eraser mode.

use crate::color::Rgba;
use crate::surface::{StrokeColor, StrokeStyle};
use serde::{Deserialize, Serialize};

/// Default pen width.
pub const DEFAULT_PEN_WIDTH: u32 = 2;

/// Default eraser width.
pub const DEFAULT_ERASER_WIDTH: u32 = 10;

/// Widths offered by the size tabs.
pub const SIZE_PRESETS: [u32; 4] = [2, 4, 6, 8];

/// Width for a zero-based size tab index, if it exists.
pub fn preset_width(index: usize) -> Option<u32> {
    SIZE_PRESETS.get(index).copied()
}

/// Mutually exclusive tool modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolMode {
    #[default]
    Pen,
    Eraser,
}

/// Color, width and mode consulted when a stroke is drawn.
///
/// The palette color survives an eraser excursion: switching back to the
/// pen paints with whatever color was chosen before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolState {
    palette_color: Rgba,
    width: u32,
    mode: ToolMode,
    drawing: bool,
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new(Rgba::black(), DEFAULT_PEN_WIDTH)
    }
}

impl ToolState {
    pub fn new(color: Rgba, width: u32) -> Self {
        Self {
            palette_color: color,
            width: width.max(1),
            mode: ToolMode::Pen,
            drawing: false,
        }
    }

    /// Switch to the pen with the given width.
    pub fn select_pen(&mut self, width: u32) {
        self.mode = ToolMode::Pen;
        self.width = width.max(1);
    }

    /// Switch to the eraser with the given width.
    pub fn select_eraser(&mut self, width: u32) {
        self.mode = ToolMode::Eraser;
        self.width = width.max(1);
    }

    /// Choose a palette color. Picking a color also picks the pen.
    pub fn set_color(&mut self, color: Rgba) {
        self.palette_color = color;
        self.mode = ToolMode::Pen;
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width.max(1);
    }

    pub fn palette_color(&self) -> Rgba {
        self.palette_color
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn is_eraser(&self) -> bool {
        self.mode == ToolMode::Eraser
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn begin_drawing(&mut self) {
        self.drawing = true;
    }

    pub fn end_drawing(&mut self) {
        self.drawing = false;
    }

    /// The style the next stroke segment will be drawn with.
    pub fn stroke_style(&self) -> StrokeStyle {
        let color = match self.mode {
            ToolMode::Pen => StrokeColor::Paint(self.palette_color),
            ToolMode::Eraser => StrokeColor::Erase,
        };
        StrokeStyle::new(self.width, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tools = ToolState::default();
        assert_eq!(tools.mode(), ToolMode::Pen);
        assert_eq!(tools.width(), DEFAULT_PEN_WIDTH);
        assert_eq!(tools.palette_color(), Rgba::black());
        assert!(!tools.is_drawing());
    }

    #[test]
    fn test_eraser_then_pen_restores_palette_color() {
        let blue = Rgba::rgb(0, 0, 255);
        let mut tools = ToolState::default();
        tools.set_color(blue);

        tools.select_eraser(DEFAULT_ERASER_WIDTH);
        assert!(tools.is_eraser());
        assert_eq!(tools.stroke_style(), StrokeStyle::erase(DEFAULT_ERASER_WIDTH));

        tools.select_pen(DEFAULT_PEN_WIDTH);
        assert_eq!(tools.stroke_style(), StrokeStyle::paint(DEFAULT_PEN_WIDTH, blue));
    }

    #[test]
    fn test_set_color_leaves_eraser_mode_and_keeps_width() {
        let mut tools = ToolState::default();
        tools.select_eraser(10);
        tools.set_color(Rgba::rgb(255, 0, 0));
        assert_eq!(tools.mode(), ToolMode::Pen);
        assert_eq!(tools.width(), 10);
    }

    #[test]
    fn test_width_is_clamped() {
        let mut tools = ToolState::default();
        tools.set_width(0);
        assert_eq!(tools.width(), 1);
        tools.select_pen(0);
        assert_eq!(tools.stroke_style().width, 1);
    }

    #[test]
    fn test_mode_change_is_not_retroactive() {
        let mut tools = ToolState::default();
        let before = tools.stroke_style();
        tools.select_eraser(10);
        assert_eq!(before, StrokeStyle::paint(2, Rgba::black()));
    }

    #[test]
    fn test_size_presets() {
        assert_eq!(preset_width(0), Some(2));
        assert_eq!(preset_width(3), Some(8));
        assert_eq!(preset_width(4), None);
    }
}
