//! The drawing surface: an RGBA raster with stroke rendering.

use crate::color::Rgba;
use kurbo::{Line, ParamCurveNearest, Point};
use serde::{Deserialize, Serialize};

const BYTES_PER_PIXEL: usize = 4;

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest accepted pixel count (64 MiB of RGBA).
pub const MAX_PIXELS: usize = 16_777_216;

/// Whether a raster of this size may be allocated: both sides positive,
/// neither above [`MAX_DIMENSION`] and the area within [`MAX_PIXELS`].
pub fn dimensions_valid(width: u32, height: u32) -> bool {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return false;
    }
    (width as usize)
        .checked_mul(height as usize)
        .is_some_and(|pixels| pixels <= MAX_PIXELS)
}

/// Color a stroke is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeColor {
    /// Paint with a palette color.
    Paint(Rgba),
    /// Paint with the surface background (the eraser).
    Erase,
}

/// Style of a stroke segment. Caps are always round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Line width in surface pixels, at least 1.
    pub width: u32,
    pub color: StrokeColor,
}

impl StrokeStyle {
    pub fn new(width: u32, color: StrokeColor) -> Self {
        Self {
            width: width.max(1),
            color,
        }
    }

    pub fn paint(width: u32, color: Rgba) -> Self {
        Self::new(width, StrokeColor::Paint(color))
    }

    pub fn erase(width: u32) -> Self {
        Self::new(width, StrokeColor::Erase)
    }

    pub fn is_eraser(&self) -> bool {
        matches!(self.color, StrokeColor::Erase)
    }
}

/// Addressable 2-D raster the size of the visible drawing area.
///
/// Pixels are stored row-major as RGBA bytes. Rendering is aliased so the
/// same stroke always produces the same bytes on every participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    background: Rgba,
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a surface filled with the background color.
    ///
    /// Out-of-range sizes fall back to a 1x1 surface.
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        let (width, height) = if dimensions_valid(width, height) {
            (width, height)
        } else {
            log::warn!("Invalid surface size {}x{}, using 1x1", width, height);
            (1, 1)
        };
        let mut surface = Self {
            width,
            height,
            background,
            pixels: Vec::new(),
        };
        surface.allocate(width, height);
        surface
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at a pixel, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        Some(Rgba::from_bytes(bytes))
    }

    /// True when every pixel is the background color.
    pub fn is_blank(&self) -> bool {
        let bg = self.background.to_bytes();
        self.pixels.chunks_exact(BYTES_PER_PIXEL).all(|px| px == bg)
    }

    /// Resolve the color a style actually paints with on this surface.
    pub fn resolve(&self, color: StrokeColor) -> Rgba {
        match color {
            StrokeColor::Paint(c) => c,
            StrokeColor::Erase => self.background,
        }
    }

    /// Draw a round-capped line between two surface-space points.
    ///
    /// Every pixel whose center lies within `width / 2` of the segment is
    /// painted. A zero-length segment paints a round dot.
    pub fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let radius = f64::from(style.width.max(1)) / 2.0;
        let radius_sq = radius * radius;
        let color = self.resolve(style.color).to_bytes();
        let line = Line::new(from, to);

        let min_x = clamp_index(from.x.min(to.x) - radius, self.width);
        let max_x = clamp_index(from.x.max(to.x) + radius, self.width);
        let min_y = clamp_index(from.y.min(to.y) - radius, self.height);
        let max_y = clamp_index(from.y.max(to.y) + radius, self.height);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let distance_sq = if from == to {
                    (center - from).hypot2()
                } else {
                    line.nearest(center, 1e-9).distance_sq
                };
                if distance_sq <= radius_sq {
                    let offset = self.offset(x, y);
                    self.pixels[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color);
                }
            }
        }
    }

    /// Reset every pixel to the background color.
    pub fn clear_all(&mut self) {
        let bg = self.background.to_bytes();
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&bg);
        }
    }

    /// Reallocate the raster. Content is lost; callers restore from the
    /// latest snapshot afterwards.
    ///
    /// Returns false and leaves the surface untouched if the size is out of
    /// range (see [`dimensions_valid`]).
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !dimensions_valid(width, height) {
            log::warn!("Refusing to resize surface to {}x{}", width, height);
            return false;
        }
        self.allocate(width, height);
        true
    }

    fn allocate(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = self
            .background
            .to_bytes()
            .repeat(width as usize * height as usize);
    }

    /// Copy an RGBA image into the surface at the origin, clipped to the
    /// overlapping area.
    ///
    /// Returns false (and leaves the surface untouched) if `pixels` is too
    /// short for the given dimensions.
    pub fn put_rgba(&mut self, width: u32, height: u32, pixels: &[u8]) -> bool {
        let src_stride = width as usize * BYTES_PER_PIXEL;
        if pixels.len() < src_stride * height as usize {
            return false;
        }

        let copy_w = width.min(self.width) as usize * BYTES_PER_PIXEL;
        let copy_h = height.min(self.height) as usize;
        let dst_stride = self.width as usize * BYTES_PER_PIXEL;

        for row in 0..copy_h {
            let src = row * src_stride;
            let dst = row * dst_stride;
            self.pixels[dst..dst + copy_w].copy_from_slice(&pixels[src..src + copy_w]);
        }
        true
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

/// Clamp a surface coordinate to a valid pixel index in `0..len`.
fn clamp_index(value: f64, len: u32) -> u32 {
    let max = f64::from(len.saturating_sub(1));
    value.floor().clamp(0.0, max) as u32
}
