//! Pan/zoom transform between diagram coordinates and screen pixels.

use egui::{pos2, vec2, Pos2, Rect, Vec2};
use solflow_core::Position;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;

/// Canvas-space padding kept around the diagram by [`Viewport::fit`].
pub const FIT_PADDING: f32 = 40.0;

/// `screen = origin + pan + canvas * zoom`, where `origin` is the widget's top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn to_screen(&self, origin: Pos2, p: Position) -> Pos2 {
        origin + self.pan + vec2(p.x, p.y) * self.zoom
    }

    pub fn to_canvas(&self, origin: Pos2, screen: Pos2) -> Position {
        let local = (screen - origin - self.pan) / self.zoom;
        Position::new(local.x, local.y)
    }

    /// Screen rectangle of a canvas-space rectangle.
    pub fn rect_to_screen(&self, origin: Pos2, canvas: Rect) -> Rect {
        let min = self.to_screen(origin, Position::new(canvas.min.x, canvas.min.y));
        Rect::from_min_size(min, canvas.size() * self.zoom)
    }

    /// Canvas-space region currently visible inside `widget`.
    pub fn visible_canvas_rect(&self, widget: Rect) -> Rect {
        let min = self.to_canvas(widget.min, widget.min);
        let max = self.to_canvas(widget.min, widget.max);
        Rect::from_min_max(pos2(min.x, min.y), pos2(max.x, max.y))
    }

    /// Multiply the zoom by `factor`, keeping the canvas point under `anchor` fixed.
    pub fn zoom_around(&mut self, origin: Pos2, anchor: Pos2, factor: f32) {
        let before = self.to_canvas(origin, anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.to_screen(origin, before);
        self.pan += anchor - after;
    }

    /// Fit `bounds` (canvas space) into `widget`, centered.
    pub fn fit(&mut self, widget: Rect, bounds: Rect) {
        if !bounds.is_finite() || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            *self = Self::default();
            return;
        }
        let padded = bounds.expand(FIT_PADDING);
        let zoom = (widget.width() / padded.width())
            .min(widget.height() / padded.height())
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = zoom;
        self.pan = widget.size() * 0.5 - padded.center().to_vec2() * zoom;
    }
}
