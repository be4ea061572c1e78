//! Applies inbound draw events to the local canvas.

use crate::context::CanvasContext;
use crate::protocol::DrawEvent;
use kurbo::Point;

/// What an applied event did to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Pixels changed.
    Raster,
    /// Only tool state or the remote path cursor changed.
    State,
    /// The event had no effect.
    Ignored,
}

/// Replays remote events with the same primitives local input uses.
///
/// The remote path cursor is kept apart from the local one so remote
/// segments can interleave with a local stroke in progress. Undo history
/// is never shared: `Clear` pops this participant's own stack.
#[derive(Debug, Clone, Default)]
pub struct RemoteEventApplier {
    cursor: Option<Point>,
}

impl RemoteEventApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last point of the remote path, if a remote stroke is open.
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn apply(&mut self, event: &DrawEvent, ctx: &mut CanvasContext) -> Applied {
        match event {
            DrawEvent::StrokeBegin(sample) => {
                self.cursor = Some(sample.point);
                Applied::State
            }
            DrawEvent::StrokePoint(sample) => match self.cursor.replace(sample.point) {
                Some(from) => {
                    ctx.draw_segment(from, sample.point, &sample.style());
                    Applied::Raster
                }
                // A move without a begin only opens the path
                None => Applied::State,
            },
            DrawEvent::StrokeEnd(_) => {
                self.cursor = None;
                Applied::State
            }
            DrawEvent::Clear => {
                if ctx.undo() {
                    Applied::Raster
                } else {
                    Applied::Ignored
                }
            }
            DrawEvent::Reset => {
                self.cursor = None;
                ctx.reset();
                Applied::Raster
            }
            DrawEvent::Resize { width, height } => {
                if ctx.resize(*width, *height) {
                    Applied::Raster
                } else {
                    log::warn!("Ignoring remote resize to {}x{}", width, height);
                    Applied::Ignored
                }
            }
            DrawEvent::SizeChange { size } => {
                ctx.tools.set_width(*size);
                Applied::State
            }
            DrawEvent::ColorChange { color } => {
                ctx.tools.set_color(*color);
                Applied::State
            }
            DrawEvent::EraserSelected { size } => {
                ctx.tools.select_eraser(*size);
                Applied::State
            }
            DrawEvent::PenSelected { size } => {
                ctx.tools.select_pen(*size);
                Applied::State
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::input::{LocalInputTranslator, PointerInput, Viewport};
    use crate::protocol::{StrokeSample, decode};
    use crate::tools::ToolMode;

    fn sample(x: f64, y: f64) -> StrokeSample {
        StrokeSample {
            point: Point::new(x, y),
            size: 2,
            color: Rgba::black(),
            is_eraser: false,
        }
    }

    fn ctx() -> CanvasContext {
        CanvasContext::new(64, 64, Rgba::white())
    }

    #[test]
    fn test_local_and_remote_strokes_match() {
        let mut local = ctx();
        let mut input = LocalInputTranslator::new(Viewport::identity(64, 64));
        let inputs = [
            PointerInput::Down { position: Point::new(3.0, 4.0) },
            PointerInput::Move { position: Point::new(20.0, 30.0) },
            PointerInput::Move { position: Point::new(40.5, 12.25) },
            PointerInput::Move { position: Point::new(60.0, 60.0) },
            PointerInput::Up,
        ];
        let events: Vec<DrawEvent> = inputs
            .into_iter()
            .filter_map(|i| input.handle(i, &mut local))
            .collect();
        assert_eq!(events.len(), 5);

        let mut remote = ctx();
        let mut applier = RemoteEventApplier::new();
        for event in &events {
            applier.apply(event, &mut remote);
        }

        assert_eq!(local.surface.pixels(), remote.surface.pixels());
        assert!(!remote.surface.is_blank());
        assert_eq!(applier.cursor(), None);
    }

    #[test]
    fn test_begin_does_not_draw() {
        let mut ctx = ctx();
        let mut applier = RemoteEventApplier::new();
        let applied = applier.apply(&DrawEvent::StrokeBegin(sample(10.0, 10.0)), &mut ctx);
        assert_eq!(applied, Applied::State);
        assert!(ctx.surface.is_blank());
        assert_eq!(applier.cursor(), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_point_without_begin_only_opens_path() {
        let mut ctx = ctx();
        let mut applier = RemoteEventApplier::new();
        let applied = applier.apply(&DrawEvent::StrokePoint(sample(5.0, 5.0)), &mut ctx);
        assert_eq!(applied, Applied::State);
        assert!(ctx.surface.is_blank());
        let applied = applier.apply(&DrawEvent::StrokePoint(sample(30.0, 5.0)), &mut ctx);
        assert_eq!(applied, Applied::Raster);
        assert_eq!(ctx.surface.pixel(15, 5), Some(Rgba::black()));
    }

    #[test]
    fn test_unknown_action_message_changes_nothing() {
        let mut ctx = ctx();
        let mut applier = RemoteEventApplier::new();
        applier.apply(&DrawEvent::StrokeBegin(sample(0.0, 0.0)), &mut ctx);
        let before = ctx.surface.clone();

        let text = concat!(
            r##"{"type":"draw","x":30,"y":30,"size":2,"color":"#000000","##,
            r#""isEraser":false,"action":"mousewiggle"}"#,
        );
        if let Ok(event) = decode(text) {
            applier.apply(&event, &mut ctx);
        }
        assert_eq!(ctx.surface, before);
    }

    #[test]
    fn test_clear_pops_local_history() {
        let mut ctx = ctx();
        let mut applier = RemoteEventApplier::new();
        let style = sample(0.0, 0.0).style();

        ctx.draw_segment(Point::new(0.0, 0.0), Point::new(10.0, 10.0), &style);
        ctx.checkpoint();
        let first = ctx.surface.clone();
        ctx.draw_segment(Point::new(10.0, 10.0), Point::new(0.0, 20.0), &style);
        ctx.checkpoint();

        assert_eq!(applier.apply(&DrawEvent::Clear, &mut ctx), Applied::Raster);
        assert_eq!(ctx.surface, first);

        assert_eq!(applier.apply(&DrawEvent::Clear, &mut ctx), Applied::Raster);
        assert!(ctx.surface.is_blank());
        assert_eq!(applier.apply(&DrawEvent::Clear, &mut ctx), Applied::Ignored);
    }

    #[test]
    fn test_reset_wipes_history() {
        let mut ctx = ctx();
        let mut applier = RemoteEventApplier::new();
        applier.apply(&DrawEvent::StrokeBegin(sample(0.0, 0.0)), &mut ctx);
        applier.apply(&DrawEvent::StrokePoint(sample(20.0, 20.0)), &mut ctx);
        ctx.checkpoint();

        applier.apply(&DrawEvent::Reset, &mut ctx);
        assert!(ctx.surface.is_blank());
        assert!(ctx.history.is_empty());
        assert_eq!(applier.cursor(), None);
    }

    #[test]
    fn test_resize_restores_from_local_stack() {
        let mut ctx = CanvasContext::new(300, 150, Rgba::white());
        let mut applier = RemoteEventApplier::new();
        applier.apply(&DrawEvent::StrokeBegin(sample(10.0, 10.0)), &mut ctx);
        applier.apply(&DrawEvent::StrokePoint(sample(100.0, 100.0)), &mut ctx);
        ctx.checkpoint();

        let applied = applier.apply(&DrawEvent::Resize { width: 600, height: 300 }, &mut ctx);
        assert_eq!(applied, Applied::Raster);
        assert_eq!(ctx.surface.width(), 600);
        assert_eq!(ctx.surface.pixel(50, 50), Some(Rgba::black()));
    }

    #[test]
    fn test_zero_resize_ignored() {
        let mut ctx = ctx();
        let mut applier = RemoteEventApplier::new();
        assert_eq!(
            applier.apply(&DrawEvent::Resize { width: 0, height: 10 }, &mut ctx),
            Applied::Ignored
        );
        assert_eq!(ctx.surface.width(), 64);
    }

    #[test]
    fn test_oversized_resize_message_ignored() {
        let mut ctx = ctx();
        let mut applier = RemoteEventApplier::new();
        let event = decode(r#"{"type":"resize","width":4294967295,"height":4294967295}"#).unwrap();
        ctx.draw_segment(Point::new(0.0, 0.0), Point::new(63.0, 63.0), &sample(0.0, 0.0).style());
        let before = ctx.surface.clone();

        assert_eq!(applier.apply(&event, &mut ctx), Applied::Ignored);
        assert_eq!(
            applier.apply(&DrawEvent::Resize { width: 100_000, height: 100_000 }, &mut ctx),
            Applied::Ignored
        );
        assert_eq!(ctx.surface, before);
    }

    #[test]
    fn test_tool_events_mutate_shared_tools() {
        let mut ctx = ctx();
        let mut applier = RemoteEventApplier::new();
        let red = Rgba::rgb(255, 0, 0);

        applier.apply(&DrawEvent::ColorChange { color: red }, &mut ctx);
        applier.apply(&DrawEvent::SizeChange { size: 6 }, &mut ctx);
        assert_eq!(ctx.tools.palette_color(), red);
        assert_eq!(ctx.tools.width(), 6);

        applier.apply(&DrawEvent::EraserSelected { size: 10 }, &mut ctx);
        assert_eq!(ctx.tools.mode(), ToolMode::Eraser);

        applier.apply(&DrawEvent::PenSelected { size: 2 }, &mut ctx);
        assert_eq!(ctx.tools.mode(), ToolMode::Pen);
        assert_eq!(ctx.tools.palette_color(), red);
    }

    #[test]
    fn test_remote_segments_interleave_with_local_stroke() {
        let mut ctx = ctx();
        let mut input = LocalInputTranslator::new(Viewport::identity(64, 64));
        let mut applier = RemoteEventApplier::new();

        input.handle(PointerInput::Down { position: Point::new(5.0, 50.0) }, &mut ctx);
        applier.apply(&DrawEvent::StrokeBegin(sample(5.0, 5.0)), &mut ctx);
        input.handle(PointerInput::Move { position: Point::new(60.0, 50.0) }, &mut ctx);
        applier.apply(&DrawEvent::StrokePoint(sample(60.0, 5.0)), &mut ctx);
        input.handle(PointerInput::Up, &mut ctx);

        assert_eq!(ctx.surface.pixel(30, 50), Some(Rgba::black()));
        assert_eq!(ctx.surface.pixel(30, 5), Some(Rgba::black()));
        // The two paths never joined
        assert_eq!(ctx.surface.pixel(30, 27), Some(Rgba::white()));
    }
}
