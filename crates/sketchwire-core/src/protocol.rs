//! Draw events and their JSON wire format.
//!
//! Each logical action is one JSON object tagged by `type`:
//! ```json
//! { "type": "draw", "x": 10, "y": 20, "size": 2, "color": "#000000",
//!   "isEraser": false, "action": "mousemove" }
//! { "type": "clear" }
//! { "type": "resize", "width": 600, "height": 300 }
//! { "type": "eraser", "size": 10 }
//! ```

use crate::color::Rgba;
use crate::error::SyncError;
use crate::surface::{StrokeColor, StrokeStyle};
use crate::tools::ToolState;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// One sampled point of a stroke together with the tool that drew it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSample {
    /// Surface-space position.
    pub point: Point,
    pub size: u32,
    /// Palette color at the time of the sample, even while erasing.
    pub color: Rgba,
    pub is_eraser: bool,
}

impl StrokeSample {
    /// Sample the current tool at a point.
    pub fn from_tools(point: Point, tools: &ToolState) -> Self {
        Self {
            point,
            size: tools.width(),
            color: tools.palette_color(),
            is_eraser: tools.is_eraser(),
        }
    }

    /// The style segments ending at this sample are drawn with.
    pub fn style(&self) -> StrokeStyle {
        let color = if self.is_eraser {
            StrokeColor::Erase
        } else {
            StrokeColor::Paint(self.color)
        };
        StrokeStyle::new(self.size, color)
    }
}

/// Every action that is broadcast between participants.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// A stroke starts at the sample point; nothing is drawn yet.
    StrokeBegin(StrokeSample),
    /// The stroke continues to the sample point.
    StrokePoint(StrokeSample),
    /// The stroke ended.
    StrokeEnd(StrokeSample),
    /// Undo the last checkpoint.
    Clear,
    /// Wipe canvas and history.
    Reset,
    Resize { width: u32, height: u32 },
    SizeChange { size: u32 },
    ColorChange { color: Rgba },
    EraserSelected { size: u32 },
    PenSelected { size: u32 },
}

/// Stroke lifecycle step carried by `draw` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawAction {
    MouseDown,
    MouseMove,
    MouseUp,
}

impl DrawAction {
    fn as_str(self) -> &'static str {
        match self {
            DrawAction::MouseDown => "mousedown",
            DrawAction::MouseMove => "mousemove",
            DrawAction::MouseUp => "mouseup",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "mousedown" => Some(DrawAction::MouseDown),
            "mousemove" => Some(DrawAction::MouseMove),
            "mouseup" => Some(DrawAction::MouseUp),
            _ => None,
        }
    }
}

/// JSON shape of a message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum WireMessage {
    #[serde(rename = "draw")]
    Draw {
        x: f64,
        y: f64,
        size: u32,
        color: String,
        #[serde(rename = "isEraser", default)]
        is_eraser: bool,
        action: String,
    },
    #[serde(rename = "clear")]
    Clear {},
    #[serde(rename = "reset")]
    Reset {},
    #[serde(rename = "resize")]
    Resize { width: u32, height: u32 },
    #[serde(rename = "sizeChange")]
    SizeChange { size: u32 },
    #[serde(rename = "colorChange")]
    ColorChange { color: String },
    #[serde(rename = "eraser")]
    Eraser { size: u32 },
    #[serde(rename = "pen")]
    Pen { size: u32 },
}

impl WireMessage {
    fn draw(sample: &StrokeSample, action: DrawAction) -> Self {
        WireMessage::Draw {
            x: sample.point.x,
            y: sample.point.y,
            size: sample.size,
            color: sample.color.to_string(),
            is_eraser: sample.is_eraser,
            action: action.as_str().to_string(),
        }
    }
}

impl From<&DrawEvent> for WireMessage {
    fn from(event: &DrawEvent) -> Self {
        match event {
            DrawEvent::StrokeBegin(s) => WireMessage::draw(s, DrawAction::MouseDown),
            DrawEvent::StrokePoint(s) => WireMessage::draw(s, DrawAction::MouseMove),
            DrawEvent::StrokeEnd(s) => WireMessage::draw(s, DrawAction::MouseUp),
            DrawEvent::Clear => WireMessage::Clear {},
            DrawEvent::Reset => WireMessage::Reset {},
            DrawEvent::Resize { width, height } => WireMessage::Resize {
                width: *width,
                height: *height,
            },
            DrawEvent::SizeChange { size } => WireMessage::SizeChange { size: *size },
            DrawEvent::ColorChange { color } => WireMessage::ColorChange {
                color: color.to_string(),
            },
            DrawEvent::EraserSelected { size } => WireMessage::Eraser { size: *size },
            DrawEvent::PenSelected { size } => WireMessage::Pen { size: *size },
        }
    }
}

impl TryFrom<WireMessage> for DrawEvent {
    type Error = SyncError;

    fn try_from(msg: WireMessage) -> Result<Self, Self::Error> {
        let event = match msg {
            WireMessage::Draw {
                x,
                y,
                size,
                color,
                is_eraser,
                action,
            } => {
                let action = DrawAction::parse(&action).ok_or_else(|| {
                    SyncError::MalformedMessage(format!("unknown draw action: {action}"))
                })?;
                let color = parse_color(&color)?;
                let sample = StrokeSample {
                    point: Point::new(x, y),
                    size,
                    color,
                    is_eraser,
                };
                match action {
                    DrawAction::MouseDown => DrawEvent::StrokeBegin(sample),
                    DrawAction::MouseMove => DrawEvent::StrokePoint(sample),
                    DrawAction::MouseUp => DrawEvent::StrokeEnd(sample),
                }
            }
            WireMessage::Clear {} => DrawEvent::Clear,
            WireMessage::Reset {} => DrawEvent::Reset,
            WireMessage::Resize { width, height } => DrawEvent::Resize { width, height },
            WireMessage::SizeChange { size } => DrawEvent::SizeChange { size },
            WireMessage::ColorChange { color } => DrawEvent::ColorChange {
                color: parse_color(&color)?,
            },
            WireMessage::Eraser { size } => DrawEvent::EraserSelected { size },
            WireMessage::Pen { size } => DrawEvent::PenSelected { size },
        };
        Ok(event)
    }
}

fn parse_color(color: &str) -> Result<Rgba, SyncError> {
    Rgba::parse(color).ok_or_else(|| SyncError::MalformedMessage(format!("invalid color: {color}")))
}

/// Serialize an event to its wire text.
pub fn encode(event: &DrawEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireMessage::from(event))
}

/// Parse wire text into an event.
///
/// Unparseable JSON, unknown `type` tags, unknown draw actions and bad
/// colors are all reported as [`SyncError::MalformedMessage`].
pub fn decode(text: &str) -> Result<DrawEvent, SyncError> {
    let msg: WireMessage =
        serde_json::from_str(text).map_err(|e| SyncError::MalformedMessage(e.to_string()))?;
    DrawEvent::try_from(msg)
}
