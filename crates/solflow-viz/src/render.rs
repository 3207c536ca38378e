//! Edge, selection and background colors.

use egui::{Color32, Stroke};

#[derive(Debug, Clone, Copy)]
pub struct EdgeVisuals {
    pub stroke: Stroke,
    /// Dash pattern `(dash, gap)` in screen pixels, for animated edges.
    pub dashes: Option<(f32, f32)>,
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeRenderContext {
    pub dark_mode: bool,
    pub selected: bool,
    pub animated: bool,
    pub zoom: f32,
}

pub fn resolve_edge_visuals(ctx: EdgeRenderContext) -> EdgeVisuals {
    let base = if ctx.selected { 2.5 } else { 1.5 };
    let width = base * ctx.zoom.max(0.75);
    let color = if ctx.selected {
        selection_color(ctx.dark_mode)
    } else {
        edge_base_color(ctx.dark_mode)
    };
    let dashes = ctx.animated.then(|| (5.0 * ctx.zoom, 5.0 * ctx.zoom));

    EdgeVisuals {
        stroke: Stroke::new(width, color),
        dashes,
    }
}

pub fn selection_color(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(0, 212, 255)
    } else {
        Color32::from_rgb(0, 150, 200)
    }
}

fn edge_base_color(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(148, 163, 184)
    } else {
        Color32::from_rgb(100, 116, 139)
    }
}

pub fn grid_dot_color(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgba_unmultiplied(120, 120, 140, 70)
    } else {
        Color32::from_rgba_unmultiplied(90, 90, 110, 90)
    }
}

pub fn minimap_background(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgba_unmultiplied(20, 20, 28, 220)
    } else {
        Color32::from_rgba_unmultiplied(245, 245, 250, 230)
    }
}

pub fn minimap_viewport_stroke(dark_mode: bool) -> Stroke {
    Stroke::new(1.0, selection_color(dark_mode).linear_multiply(0.8))
}
