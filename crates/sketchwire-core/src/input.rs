//! Local pointer/touch input: viewport mapping and the stroke state machine.

use crate::context::CanvasContext;
use crate::protocol::{DrawEvent, StrokeSample};
use kurbo::{Affine, Point, Size};
use serde::{Deserialize, Serialize};

/// Pointer and touch input in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerInput {
    Down { position: Point },
    Move { position: Point },
    Up,
    /// The pointer left the drawing surface.
    Leave,
    /// The pointer entered the drawing surface.
    Enter { position: Point, primary_held: bool },
    TouchStart { position: Point },
    TouchMove { position: Point },
    TouchEnd,
    TouchCancel,
}

/// Where the drawing surface sits in the viewport and how big it is drawn.
///
/// The surface may be displayed at a different size than its raster, so
/// client coordinates are scaled by `surface / displayed` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Top-left corner of the displayed surface in client coordinates.
    pub origin: Point,
    /// Displayed size of the surface in client pixels.
    pub size: Size,
}

impl Viewport {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// A viewport showing the surface 1:1 at the client origin.
    pub fn identity(width: u32, height: u32) -> Self {
        Self::new(Point::ZERO, Size::new(f64::from(width), f64::from(height)))
    }

    /// Transform from client coordinates to surface coordinates.
    pub fn client_to_surface(&self, surface_width: u32, surface_height: u32) -> Affine {
        let scale = |surface: u32, displayed: f64| {
            if displayed > 0.0 {
                f64::from(surface) / displayed
            } else {
                1.0
            }
        };
        let sx = scale(surface_width, self.size.width);
        let sy = scale(surface_height, self.size.height);
        Affine::scale_non_uniform(sx, sy) * Affine::translate(-self.origin.to_vec2())
    }

    /// Map a client point to surface coordinates.
    pub fn to_surface(&self, client: Point, surface_width: u32, surface_height: u32) -> Point {
        self.client_to_surface(surface_width, surface_height) * client
    }
}

/// State of the local stroke.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputPhase {
    #[default]
    Idle,
    Stroking {
        /// Last surface-space point of the open path.
        last: Point,
    },
}

/// Turns local input into surface mutations and outbound events.
///
/// Segments are rendered as soon as a move arrives; nothing waits for the
/// network.
#[derive(Debug, Clone)]
pub struct LocalInputTranslator {
    viewport: Viewport,
    phase: InputPhase,
}

impl LocalInputTranslator {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            phase: InputPhase::Idle,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Update the displayed geometry, e.g. after a layout change.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn phase(&self) -> InputPhase {
        self.phase
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.phase, InputPhase::Stroking { .. })
    }

    /// Apply one input to the context and return the event to broadcast.
    pub fn handle(&mut self, input: PointerInput, ctx: &mut CanvasContext) -> Option<DrawEvent> {
        match input {
            PointerInput::Down { position } | PointerInput::TouchStart { position } => {
                Some(self.begin(position, ctx))
            }
            PointerInput::Enter {
                position,
                primary_held,
            } => {
                // Re-entering with the button held starts a fresh path so
                // peers never connect the exit and entry points.
                if primary_held && !self.is_stroking() {
                    Some(self.begin(position, ctx))
                } else {
                    None
                }
            }
            PointerInput::Move { position } | PointerInput::TouchMove { position } => {
                self.extend(position, ctx)
            }
            PointerInput::Up | PointerInput::TouchEnd => self.finish(ctx, true),
            PointerInput::Leave | PointerInput::TouchCancel => self.finish(ctx, false),
        }
    }

    fn map(&self, client: Point, ctx: &CanvasContext) -> Point {
        self.viewport
            .to_surface(client, ctx.surface.width(), ctx.surface.height())
    }

    fn begin(&mut self, client: Point, ctx: &mut CanvasContext) -> DrawEvent {
        let point = self.map(client, ctx);
        self.phase = InputPhase::Stroking { last: point };
        ctx.tools.begin_drawing();
        DrawEvent::StrokeBegin(StrokeSample::from_tools(point, &ctx.tools))
    }

    fn extend(&mut self, client: Point, ctx: &mut CanvasContext) -> Option<DrawEvent> {
        let InputPhase::Stroking { last } = self.phase else {
            return None;
        };
        let point = self.map(client, ctx);
        let style = ctx.tools.stroke_style();
        ctx.draw_segment(last, point, &style);
        self.phase = InputPhase::Stroking { last: point };
        Some(DrawEvent::StrokePoint(StrokeSample::from_tools(
            point, &ctx.tools,
        )))
    }

    /// Close the path. Only a completed stroke becomes a checkpoint; an
    /// interrupted one stays on the surface without one.
    fn finish(&mut self, ctx: &mut CanvasContext, checkpoint: bool) -> Option<DrawEvent> {
        let InputPhase::Stroking { last } = self.phase else {
            return None;
        };
        self.phase = InputPhase::Idle;
        ctx.tools.end_drawing();
        if checkpoint {
            ctx.checkpoint();
        }
        Some(DrawEvent::StrokeEnd(StrokeSample::from_tools(
            last, &ctx.tools,
        )))
    }
}
