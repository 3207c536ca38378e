//! Interactive diagram canvas.
//!
//! [`CanvasView`] owns everything the widget needs between frames (viewport,
//! in-progress drag, memoized card visuals) while the diagram itself lives in
//! [`FlowCanvas`]. Pointer handling is split from egui: `begin_drag`,
//! `drag_to`, `end_drag` and `click` take canvas-space points and return the
//! change batches to apply, so interaction sequences can be driven directly.

use egui::{
    pos2, vec2, Align2, Button, Key, Painter, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Ui,
    Vec2,
};
use solflow_core::{
    DiagramEdge, DiagramNode, EdgeChange, EdgeId, FlowCanvas, NodeChange, NodeId, Position, Size,
};
use tracing::debug;

use crate::node_card::{
    self, card_rect, measure_card, paint_card, source_handle, target_handle, NodeCardCache,
    CARD_WIDTH,
};
use crate::render::{
    grid_dot_color, minimap_background, minimap_viewport_stroke, resolve_edge_visuals,
    selection_color, EdgeRenderContext,
};
use crate::viewport::Viewport;

/// Size assumed for a node that has not been measured yet.
pub const DEFAULT_CARD_SIZE: Size = Size::new(CARD_WIDTH, 80.0);

const GRID_SPACING: f32 = 20.0;
/// Handle grab radius in canvas units.
const HANDLE_HIT_RADIUS: f32 = 8.0;
/// Edge grab distance in screen pixels.
const EDGE_HIT_DISTANCE: f32 = 6.0;
const BEZIER_SEGMENTS: usize = 24;
/// Dash travel speed in screen pixels per second.
const DASH_SPEED: f32 = 20.0;
const MINIMAP_SIZE: Vec2 = vec2(180.0, 120.0);
const OVERLAY_MARGIN: f32 = 10.0;
const ZOOM_STEP: f32 = 1.2;

// =============================================================================
// Hit testing
// =============================================================================

/// Which part of a node the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeHit {
    Body,
    /// Bottom handle; dragging from it draws a connection.
    SourceHandle,
    TargetHandle,
}

fn point(p: Position) -> Pos2 {
    pos2(p.x, p.y)
}

fn position(p: Pos2) -> Position {
    Position::new(p.x, p.y)
}

/// Topmost node under `at` (canvas space). Later nodes are drawn on top.
pub fn hit_node(nodes: &[DiagramNode], at: Pos2) -> Option<(NodeId, NodeHit)> {
    nodes.iter().rev().find_map(|node| {
        let rect = card_rect(node, DEFAULT_CARD_SIZE);
        let hit = if source_handle(rect).distance(at) <= HANDLE_HIT_RADIUS {
            NodeHit::SourceHandle
        } else if target_handle(rect).distance(at) <= HANDLE_HIT_RADIUS {
            NodeHit::TargetHandle
        } else if rect.contains(at) {
            NodeHit::Body
        } else {
            return None;
        };
        Some((node.id.clone(), hit))
    })
}

/// Cubic bezier control points from a source handle down to a target handle.
pub fn edge_bezier(from: Pos2, to: Pos2) -> [Pos2; 4] {
    let bend = ((to.y - from.y).abs() * 0.5).max(40.0);
    [from, from + vec2(0.0, bend), to - vec2(0.0, bend), to]
}

/// Evenly sampled polyline along a cubic bezier.
pub fn bezier_points(ctrl: [Pos2; 4], segments: usize) -> Vec<Pos2> {
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            let v = ctrl[0].to_vec2() * (u * u * u)
                + ctrl[1].to_vec2() * (3.0 * u * u * t)
                + ctrl[2].to_vec2() * (3.0 * u * t * t)
                + ctrl[3].to_vec2() * (t * t * t);
            v.to_pos2()
        })
        .collect()
}

fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Canvas-space curve of an edge, if both endpoints exist.
fn edge_curve(nodes: &[DiagramNode], edge: &DiagramEdge) -> Option<[Pos2; 4]> {
    let source = nodes.iter().find(|n| n.id == edge.source)?;
    let target = nodes.iter().find(|n| n.id == edge.target)?;
    Some(edge_bezier(
        source_handle(card_rect(source, DEFAULT_CARD_SIZE)),
        target_handle(card_rect(target, DEFAULT_CARD_SIZE)),
    ))
}

/// Topmost edge within `tolerance` (canvas units) of `at`.
pub fn hit_edge(
    nodes: &[DiagramNode],
    edges: &[DiagramEdge],
    at: Pos2,
    tolerance: f32,
) -> Option<EdgeId> {
    edges.iter().rev().find_map(|edge| {
        let pts = bezier_points(edge_curve(nodes, edge)?, BEZIER_SEGMENTS);
        pts.windows(2)
            .any(|w| segment_distance(at, w[0], w[1]) <= tolerance)
            .then(|| edge.id.clone())
    })
}

/// Canvas-space bounding box of all cards.
pub fn diagram_bounds(nodes: &[DiagramNode]) -> Rect {
    nodes
        .iter()
        .map(|node| card_rect(node, DEFAULT_CARD_SIZE))
        .fold(Rect::NOTHING, |acc, rect| acc.union(rect))
}

// =============================================================================
// Interaction state
// =============================================================================

/// What the primary pointer is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    /// Moving a node; `grab` is the pointer offset from its top-left.
    Node {
        id: NodeId,
        grab: Vec2,
        last: Position,
    },
    Pan,
    /// Drawing a connection from `source`; `pointer` is in canvas space.
    Connect { source: NodeId, pointer: Pos2 },
}

/// Change batches produced by one interaction step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    pub nodes: Vec<NodeChange>,
    pub edges: Vec<EdgeChange>,
}

impl Changes {
    fn extend(&mut self, other: Changes) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn apply(self, canvas: &mut FlowCanvas) {
        if !self.nodes.is_empty() {
            canvas.apply_node_changes(self.nodes);
        }
        if !self.edges.is_empty() {
            canvas.apply_edge_changes(self.edges);
        }
    }
}

impl From<(Vec<NodeChange>, Vec<EdgeChange>)> for Changes {
    fn from((nodes, edges): (Vec<NodeChange>, Vec<EdgeChange>)) -> Self {
        Self { nodes, edges }
    }
}

/// Requests the canvas widget raises for its owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasOutput {
    pub save_requested: bool,
}

/// Widget state that survives between frames.
#[derive(Debug)]
pub struct CanvasView {
    viewport: Viewport,
    drag: DragState,
    cards: NodeCardCache,
    fit_pending: bool,
    pub show_minimap: bool,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            drag: DragState::Idle,
            cards: NodeCardCache::default(),
            fit_pending: true,
            show_minimap: true,
        }
    }
}

impl CanvasView {
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn cards(&self) -> &NodeCardCache {
        &self.cards
    }

    /// Fit the diagram on the next frame.
    pub fn request_fit(&mut self) {
        self.fit_pending = true;
    }

    /// Pointer pressed and started moving at `at`.
    pub fn begin_drag(&mut self, canvas: &FlowCanvas, at: Position) -> Changes {
        let at = point(at);
        match hit_node(canvas.nodes(), at) {
            Some((source, NodeHit::SourceHandle)) => {
                debug!(node = %source, "connection drag started");
                self.drag = DragState::Connect {
                    source,
                    pointer: at,
                };
                Changes::default()
            }
            Some((id, _)) => {
                let Some(node) = canvas.node(&id) else {
                    return Changes::default();
                };
                let grab = at - point(node.position);
                let changes = canvas.select_only_node(&id).into();
                self.drag = DragState::Node {
                    id,
                    grab,
                    last: node.position,
                };
                changes
            }
            None => {
                self.drag = DragState::Pan;
                Changes::default()
            }
        }
    }

    /// A drag recognized at `at` after the button went down at `press`.
    ///
    /// egui reports the drag only once the pointer has travelled past the
    /// click distance, so the hit test uses the press point and the pointer
    /// is then caught up to `at`.
    pub fn start_drag(&mut self, canvas: &FlowCanvas, press: Position, at: Position) -> Changes {
        let mut changes = self.begin_drag(canvas, press);
        let travelled = (point(at) - point(press)) * self.viewport.zoom;
        changes.extend(self.drag_to(at, travelled));
        changes
    }

    /// Pointer moved to `at`; `screen_delta` is the pixel movement since last frame.
    pub fn drag_to(&mut self, at: Position, screen_delta: Vec2) -> Changes {
        let mut changes = Changes::default();
        match &mut self.drag {
            DragState::Node { id, grab, last } => {
                *last = position(point(at) - *grab);
                changes.nodes.push(NodeChange::Position {
                    id: id.clone(),
                    position: *last,
                    dragging: true,
                });
            }
            DragState::Pan => self.viewport.pan += screen_delta,
            DragState::Connect { pointer, .. } => *pointer = point(at),
            DragState::Idle => {}
        }
        changes
    }

    /// Pointer released. Finishes a node move or a connection.
    pub fn end_drag(&mut self, canvas: &mut FlowCanvas) -> Changes {
        let mut changes = Changes::default();
        match std::mem::replace(&mut self.drag, DragState::Idle) {
            DragState::Node { id, last, .. } => {
                changes.nodes.push(NodeChange::Position {
                    id,
                    position: last,
                    dragging: false,
                });
            }
            DragState::Connect { source, pointer } => {
                match hit_node(canvas.nodes(), pointer) {
                    Some((target, _)) if target != source => {
                        canvas.connect(source, target);
                    }
                    _ => debug!(node = %source, "connection dropped on empty canvas"),
                }
            }
            DragState::Pan | DragState::Idle => {}
        }
        changes
    }

    /// Click without drag: select what is under `at`, or clear the selection.
    pub fn click(&self, canvas: &FlowCanvas, at: Position) -> Changes {
        let at = point(at);
        if let Some((id, _)) = hit_node(canvas.nodes(), at) {
            return canvas.select_only_node(&id).into();
        }
        let tolerance = EDGE_HIT_DISTANCE / self.viewport.zoom;
        if let Some(id) = hit_edge(canvas.nodes(), canvas.edges(), at, tolerance) {
            return canvas.select_only_edge(&id).into();
        }
        canvas.clear_selection().into()
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Draw the canvas into the remaining space of `ui` and handle input.
    pub fn show(&mut self, ui: &mut Ui, canvas: &mut FlowCanvas, dark_mode: bool) -> CanvasOutput {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        let origin = rect.min;
        let mut output = CanvasOutput::default();

        if self.fit_pending && rect.width() > 0.0 {
            self.viewport.fit(rect, diagram_bounds(canvas.nodes()));
            self.fit_pending = false;
        }

        if response.hovered() {
            let (scroll, pinch, hover) = ui.input(|i| {
                (i.smooth_scroll_delta.y, i.zoom_delta(), i.pointer.hover_pos())
            });
            let factor = pinch * (scroll * 0.002).exp();
            if let Some(anchor) = hover.filter(|_| (factor - 1.0).abs() > f32::EPSILON) {
                self.viewport.zoom_around(origin, anchor, factor);
            }
        }

        let mut changes = Changes::default();
        let pointer = response
            .interact_pointer_pos()
            .map(|p| self.viewport.to_canvas(origin, p));

        if response.drag_started() {
            let press = ui
                .input(|i| i.pointer.press_origin())
                .map(|p| self.viewport.to_canvas(origin, p));
            if let Some(at) = pointer {
                changes.extend(self.start_drag(canvas, press.unwrap_or(at), at));
            }
        } else if response.dragged() {
            if let Some(at) = pointer {
                changes.extend(self.drag_to(at, response.drag_delta()));
            }
        }
        if response.drag_stopped() {
            changes.extend(self.end_drag(canvas));
        }
        if response.clicked() {
            if let Some(at) = pointer {
                changes.extend(self.click(canvas, at));
            }
        }

        let delete = ui.input(|i| i.key_pressed(Key::Delete) || i.key_pressed(Key::Backspace));
        if delete && !ui.ctx().wants_keyboard_input() {
            changes.edges.extend(canvas.remove_selected_edges());
        }

        changes.apply(canvas);

        self.paint_grid(&painter, rect, dark_mode);
        self.paint_edges(ui, &painter, rect, canvas, dark_mode);
        let measured = self.paint_nodes(&painter, rect, canvas, dark_mode);
        if !measured.is_empty() {
            canvas.apply_node_changes(measured);
        }
        self.cards.retain(|id| canvas.node(id).is_some());

        if self.show_minimap {
            self.paint_minimap(&painter, rect, canvas, dark_mode);
        }
        self.controls(ui, rect, canvas);
        if self.toolbar(ui, rect, canvas) {
            output.save_requested = true;
        }

        output
    }

    fn paint_grid(&self, painter: &Painter, rect: Rect, dark_mode: bool) {
        let spacing = GRID_SPACING * self.viewport.zoom;
        if spacing < 6.0 {
            return;
        }
        let offset = self.viewport.pan;
        let start_x = rect.left() + offset.x.rem_euclid(spacing);
        let start_y = rect.top() + offset.y.rem_euclid(spacing);
        let color = grid_dot_color(dark_mode);
        let radius = (1.0 * self.viewport.zoom).max(0.6);

        let mut x = start_x;
        while x < rect.right() {
            let mut y = start_y;
            while y < rect.bottom() {
                painter.circle_filled(pos2(x, y), radius, color);
                y += spacing;
            }
            x += spacing;
        }
    }

    fn paint_edges(
        &self,
        ui: &Ui,
        painter: &Painter,
        rect: Rect,
        canvas: &FlowCanvas,
        dark_mode: bool,
    ) {
        let origin = rect.min;
        let time = ui.input(|i| i.time) as f32;
        let mut animating = false;

        for edge in canvas.edges() {
            let Some(curve) = edge_curve(canvas.nodes(), edge) else {
                continue;
            };
            let pts: Vec<Pos2> = bezier_points(curve, BEZIER_SEGMENTS)
                .into_iter()
                .map(|p| self.viewport.to_screen(origin, position(p)))
                .collect();
            let visuals = resolve_edge_visuals(EdgeRenderContext {
                dark_mode,
                selected: edge.selected,
                animated: edge.animated,
                zoom: self.viewport.zoom,
            });

            match visuals.dashes {
                Some((dash, gap)) => {
                    animating = true;
                    let offset = (time * DASH_SPEED).rem_euclid(dash + gap);
                    painter.extend(Shape::dashed_line_with_offset(
                        &pts,
                        visuals.stroke,
                        &[dash],
                        &[gap],
                        dash + gap - offset,
                    ));
                }
                None => {
                    painter.add(Shape::line(pts, visuals.stroke));
                }
            }
        }

        if let DragState::Connect { source, pointer } = &self.drag {
            if let Some(node) = canvas.node(source) {
                let from = source_handle(card_rect(node, DEFAULT_CARD_SIZE));
                let pts: Vec<Pos2> = bezier_points(edge_bezier(from, *pointer), BEZIER_SEGMENTS)
                    .into_iter()
                    .map(|p| self.viewport.to_screen(origin, position(p)))
                    .collect();
                painter.add(Shape::line(pts, Stroke::new(1.5, selection_color(dark_mode))));
            }
        }

        if animating {
            ui.ctx().request_repaint();
        }
    }

    /// Paint every card and collect `Dimensions` changes for resized ones.
    fn paint_nodes(
        &mut self,
        painter: &Painter,
        rect: Rect,
        canvas: &FlowCanvas,
        dark_mode: bool,
    ) -> Vec<NodeChange> {
        let mut measured = Vec::new();
        let zoom = self.viewport.zoom;

        for node in canvas.nodes() {
            let visual = self
                .cards
                .card(node, dark_mode, |label, description| {
                    measure_card(painter, label, description)
                });
            if node.size != Some(visual.size) {
                measured.push(NodeChange::Dimensions {
                    id: node.id.clone(),
                    size: visual.size,
                });
            }

            let card = Rect::from_min_size(
                point(node.position),
                vec2(visual.size.width, visual.size.height),
            );
            let screen = self.viewport.rect_to_screen(rect.min, card);
            if rect.intersects(screen) {
                paint_card(painter, screen, zoom, visual, node.selected, dark_mode);
            }
        }

        measured
    }

    fn paint_minimap(&self, painter: &Painter, rect: Rect, canvas: &FlowCanvas, dark_mode: bool) {
        let frame = Align2::RIGHT_BOTTOM.align_size_within_rect(
            MINIMAP_SIZE,
            rect.shrink(OVERLAY_MARGIN),
        );
        let visible = self.viewport.visible_canvas_rect(rect);
        let world = diagram_bounds(canvas.nodes()).union(visible);
        if !world.is_finite() || world.width() <= 0.0 || world.height() <= 0.0 {
            return;
        }

        let scale = (frame.width() / world.width()).min(frame.height() / world.height());
        let inset = (frame.size() - world.size() * scale) * 0.5;
        let map = |p: Pos2| frame.min + inset + (p - world.min) * scale;

        painter.rect_filled(frame, 4.0, minimap_background(dark_mode));
        for node in canvas.nodes() {
            let card = card_rect(node, DEFAULT_CARD_SIZE);
            let tint = node_card::palette(node.category(), dark_mode).badge;
            painter.rect_filled(Rect::from_min_max(map(card.min), map(card.max)), 1.0, tint);
        }
        painter.rect_stroke(
            Rect::from_min_max(map(visible.min), map(visible.max)).intersect(frame),
            0.0,
            minimap_viewport_stroke(dark_mode),
            StrokeKind::Inside,
        );
    }

    /// Zoom in, zoom out and fit view, stacked in the bottom-left corner.
    fn controls(&mut self, ui: &mut Ui, rect: Rect, canvas: &FlowCanvas) {
        let size = vec2(28.0, 28.0);
        let mut slot = Rect::from_min_size(
            pos2(
                rect.left() + OVERLAY_MARGIN,
                rect.bottom() - OVERLAY_MARGIN - size.y * 3.0 - 8.0,
            ),
            size,
        );
        let center = rect.center();

        if ui.put(slot, Button::new("+")).on_hover_text("Zoom in").clicked() {
            self.viewport.zoom_around(rect.min, center, ZOOM_STEP);
        }
        slot = slot.translate(vec2(0.0, size.y + 4.0));
        if ui.put(slot, Button::new("−")).on_hover_text("Zoom out").clicked() {
            self.viewport.zoom_around(rect.min, center, 1.0 / ZOOM_STEP);
        }
        slot = slot.translate(vec2(0.0, size.y + 4.0));
        if ui.put(slot, Button::new("⛶")).on_hover_text("Fit view").clicked() {
            self.viewport.fit(rect, diagram_bounds(canvas.nodes()));
        }
    }

    /// "Add Node" and "Save" in the top-right corner. Returns true when Save was clicked.
    fn toolbar(&mut self, ui: &mut Ui, rect: Rect, canvas: &mut FlowCanvas) -> bool {
        let size = vec2(84.0, 28.0);
        let save_slot = Rect::from_min_size(
            pos2(rect.right() - OVERLAY_MARGIN - size.x, rect.top() + OVERLAY_MARGIN),
            size,
        );
        let add_slot = save_slot.translate(vec2(-(size.x + 6.0), 0.0));

        if ui.put(add_slot, Button::new("Add Node")).clicked() {
            let id = canvas.add_node();
            debug!(node = %id, "node added from toolbar");
        }
        ui.put(save_slot, Button::new("Save")).clicked()
    }
}

#[cfg(test)]
mod tests {
    use solflow_core::FlowCanvas;

    use super::*;

    #[test]
    fn hit_node_prefers_handles_over_body() {
        let canvas = FlowCanvas::default();
        // Node 1 sits at (250,100) with the default 180x80 card.
        assert_eq!(
            hit_node(canvas.nodes(), pos2(340.0, 180.0)),
            Some((NodeId::from("1"), NodeHit::SourceHandle))
        );
        assert_eq!(
            hit_node(canvas.nodes(), pos2(340.0, 100.0)),
            Some((NodeId::from("1"), NodeHit::TargetHandle))
        );
        assert_eq!(
            hit_node(canvas.nodes(), pos2(300.0, 140.0)),
            Some((NodeId::from("1"), NodeHit::Body))
        );
        assert_eq!(hit_node(canvas.nodes(), pos2(700.0, 700.0)), None);
    }

    #[test]
    fn edge_hit_near_curve_midpoint() {
        let canvas = FlowCanvas::default();
        // Midpoint of e1-2: source handle (340,180) to target handle (190,250).
        let hit = hit_edge(canvas.nodes(), canvas.edges(), pos2(265.0, 215.0), 3.0);
        assert_eq!(hit, Some(EdgeId::from("e1-2")));
        assert_eq!(
            hit_edge(canvas.nodes(), canvas.edges(), pos2(265.0, 240.0), 3.0),
            None
        );
    }

    #[test]
    fn dangling_edges_are_not_hit() {
        let mut canvas = FlowCanvas::default();
        canvas.connect(NodeId::from("1"), NodeId::from("missing"));
        assert_eq!(
            hit_edge(canvas.nodes(), &canvas.edges()[4..], pos2(340.0, 200.0), 50.0),
            None
        );
    }

    #[test]
    fn dragging_a_node_moves_and_selects_it() {
        let mut canvas = FlowCanvas::default();
        let mut view = CanvasView::default();

        view.begin_drag(&canvas, Position::new(110.0, 260.0))
            .apply(&mut canvas);
        assert!(canvas.node(&NodeId::from("2")).unwrap().selected);

        let moving = view.drag_to(Position::new(310.0, 460.0), vec2(200.0, 200.0));
        assert_eq!(
            moving.nodes,
            vec![NodeChange::Position {
                id: NodeId::from("2"),
                position: Position::new(300.0, 450.0),
                dragging: true,
            }]
        );
        moving.apply(&mut canvas);
        assert!(canvas.node(&NodeId::from("2")).unwrap().dragging);

        view.end_drag(&mut canvas).apply(&mut canvas);
        let node = canvas.node(&NodeId::from("2")).unwrap();
        assert_eq!(node.position, Position::new(300.0, 450.0));
        assert!(!node.dragging);
        assert_eq!(view.drag_state(), &DragState::Idle);
    }

    #[test]
    fn dragging_from_source_handle_connects() {
        let mut canvas = FlowCanvas::default();
        let mut view = CanvasView::default();

        view.begin_drag(&canvas, Position::new(340.0, 180.0));
        assert!(matches!(view.drag_state(), DragState::Connect { .. }));
        view.drag_to(Position::new(300.0, 420.0), vec2(-40.0, 240.0));
        view.end_drag(&mut canvas);

        assert_eq!(canvas.edge_count(), 5);
        let added = canvas.edges().last().unwrap();
        assert_eq!(added.source, NodeId::from("1"));
        assert_eq!(added.target, NodeId::from("4"));
        assert!(added.animated);
    }

    #[test]
    fn drag_recognized_past_the_handle_still_connects() {
        let mut canvas = FlowCanvas::default();
        let mut view = CanvasView::default();

        // Pressed on node 1's source handle, reported 9 units further down.
        view.start_drag(&canvas, Position::new(340.0, 180.0), Position::new(340.0, 189.0));
        assert_eq!(
            view.drag_state(),
            &DragState::Connect {
                source: NodeId::from("1"),
                pointer: pos2(340.0, 189.0),
            }
        );

        view.drag_to(Position::new(300.0, 420.0), vec2(-40.0, 231.0));
        view.end_drag(&mut canvas);
        assert_eq!(canvas.edges().last().unwrap().target, NodeId::from("4"));
    }

    #[test]
    fn drag_recognized_late_on_a_body_keeps_the_grab_offset() {
        let mut canvas = FlowCanvas::default();
        let mut view = CanvasView::default();

        let changes = view.start_drag(&canvas, Position::new(110.0, 260.0), Position::new(118.0, 260.0));
        assert!(changes.nodes.contains(&NodeChange::Position {
            id: NodeId::from("2"),
            position: Position::new(108.0, 250.0),
            dragging: true,
        }));
        changes.apply(&mut canvas);
        assert!(canvas.node(&NodeId::from("2")).unwrap().selected);
    }

    #[test]
    fn late_pan_includes_the_travel_before_recognition() {
        let canvas = FlowCanvas::default();
        let mut view = CanvasView::default();

        view.start_drag(&canvas, Position::new(700.0, 700.0), Position::new(707.0, 700.0));
        assert_eq!(view.drag_state(), &DragState::Pan);
        assert_eq!(view.viewport().pan, vec2(7.0, 0.0));
    }

    #[test]
    fn connection_dropped_on_empty_space_adds_nothing() {
        let mut canvas = FlowCanvas::default();
        let mut view = CanvasView::default();

        view.begin_drag(&canvas, Position::new(340.0, 180.0));
        view.drag_to(Position::new(900.0, 900.0), Vec2::ZERO);
        view.end_drag(&mut canvas);

        assert_eq!(canvas.edge_count(), 4);
    }

    #[test]
    fn dragging_empty_space_pans() {
        let canvas = FlowCanvas::default();
        let mut view = CanvasView::default();

        view.begin_drag(&canvas, Position::new(900.0, 900.0));
        let changes = view.drag_to(Position::new(915.0, 895.0), vec2(15.0, -5.0));

        assert!(changes.is_empty());
        assert_eq!(view.viewport().pan, vec2(15.0, -5.0));
    }

    #[test]
    fn click_selects_edge_then_clears() {
        let mut canvas = FlowCanvas::default();
        let view = CanvasView::default();

        view.click(&canvas, Position::new(265.0, 215.0))
            .apply(&mut canvas);
        assert!(canvas.edge(&EdgeId::from("e1-2")).unwrap().selected);

        canvas.apply_edge_changes(canvas.remove_selected_edges());
        assert_eq!(canvas.edge_count(), 3);

        view.click(&canvas, Position::new(300.0, 140.0))
            .apply(&mut canvas);
        assert!(canvas.node(&NodeId::from("1")).unwrap().selected);

        view.click(&canvas, Position::new(900.0, 900.0))
            .apply(&mut canvas);
        assert!(canvas.nodes().iter().all(|n| !n.selected));
    }

    #[test]
    fn bounds_cover_seed_diagram() {
        let canvas = FlowCanvas::default();
        let bounds = diagram_bounds(canvas.nodes());
        assert_eq!(bounds.min, pos2(100.0, 100.0));
        assert_eq!(bounds.max, pos2(580.0, 480.0));
    }

    #[test]
    fn bezier_starts_and_ends_on_handles() {
        let pts = bezier_points(edge_bezier(pos2(0.0, 0.0), pos2(100.0, 200.0)), 8);
        assert_eq!(pts.len(), 9);
        assert_eq!(pts[0], pos2(0.0, 0.0));
        assert!((pts[8] - pos2(100.0, 200.0)).length() < 1e-3);
    }
}
