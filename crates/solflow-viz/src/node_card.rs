//! Card renderer for a single diagram node.
//!
//! A card is a rounded rectangle tinted by the node's category with a label,
//! a category badge, a description and two connection handles: the top one
//! receives edges, the bottom one starts them.
//!
//! Card visuals are memoized per node id in [`NodeCardCache`]. An entry is
//! rebuilt only when the node's category, label or description (or the
//! light/dark mode) differs from what it was built from.

use std::collections::HashMap;

use egui::{pos2, vec2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, StrokeKind};
use solflow_core::{DiagramNode, NodeCategory, NodeId, Size};

use crate::render::selection_color;

/// Fixed card width in canvas units.
pub const CARD_WIDTH: f32 = 180.0;
pub const CARD_PADDING: f32 = 10.0;
pub const HANDLE_RADIUS: f32 = 5.0;

const LABEL_FONT: f32 = 13.0;
const DESCRIPTION_FONT: f32 = 11.0;
const BADGE_FONT: f32 = 10.0;
const BADGE_HEIGHT: f32 = 16.0;
const ROW_GAP: f32 = 4.0;

// =============================================================================
// Palette
// =============================================================================

/// Tints for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePalette {
    pub background: Color32,
    pub border: Color32,
    pub badge: Color32,
    pub text: Color32,
    pub muted_text: Color32,
}

/// Entry is green, exit is red, process is blue.
pub fn palette(category: NodeCategory, dark_mode: bool) -> NodePalette {
    let (background, border, badge) = match (category, dark_mode) {
        (NodeCategory::Entry, false) => (
            Color32::from_rgb(220, 252, 231),
            Color32::from_rgb(134, 239, 172),
            Color32::from_rgb(34, 197, 94),
        ),
        (NodeCategory::Entry, true) => (
            Color32::from_rgb(5, 46, 22),
            Color32::from_rgb(21, 128, 61),
            Color32::from_rgb(34, 197, 94),
        ),
        (NodeCategory::Exit, false) => (
            Color32::from_rgb(254, 226, 226),
            Color32::from_rgb(252, 165, 165),
            Color32::from_rgb(239, 68, 68),
        ),
        (NodeCategory::Exit, true) => (
            Color32::from_rgb(69, 10, 10),
            Color32::from_rgb(185, 28, 28),
            Color32::from_rgb(239, 68, 68),
        ),
        (NodeCategory::Process, false) => (
            Color32::from_rgb(219, 234, 254),
            Color32::from_rgb(147, 197, 253),
            Color32::from_rgb(59, 130, 246),
        ),
        (NodeCategory::Process, true) => (
            Color32::from_rgb(23, 37, 84),
            Color32::from_rgb(29, 78, 216),
            Color32::from_rgb(59, 130, 246),
        ),
    };

    let (text, muted_text) = if dark_mode {
        (Color32::from_rgb(241, 245, 249), Color32::from_rgb(148, 163, 184))
    } else {
        (Color32::from_rgb(15, 23, 42), Color32::from_rgb(71, 85, 105))
    };

    NodePalette {
        background,
        border,
        badge,
        text,
        muted_text,
    }
}

// =============================================================================
// Memoized visuals
// =============================================================================

/// Inputs a card's visuals depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CardKey {
    category: NodeCategory,
    label: String,
    description: String,
    dark_mode: bool,
}

impl CardKey {
    fn of(node: &DiagramNode, dark_mode: bool) -> Self {
        Self {
            category: node.category(),
            label: node.data.label.clone(),
            description: node.data.description.clone(),
            dark_mode,
        }
    }
}

/// Resolved visuals for one card, in canvas units.
#[derive(Debug, Clone, PartialEq)]
pub struct CardVisual {
    pub palette: NodePalette,
    pub badge: &'static str,
    pub label: String,
    pub description: String,
    pub size: Size,
}

#[derive(Debug, Default)]
pub struct NodeCardCache {
    entries: HashMap<NodeId, (CardKey, CardVisual)>,
    rebuilds: u64,
}

impl NodeCardCache {
    /// Cached visual for `node`, rebuilding it when its inputs changed.
    ///
    /// `measure` receives `(label, description)` and returns the card size in
    /// canvas units; it only runs on a rebuild.
    pub fn card<F>(&mut self, node: &DiagramNode, dark_mode: bool, measure: F) -> &CardVisual
    where
        F: FnOnce(&str, &str) -> Size,
    {
        let key = CardKey::of(node, dark_mode);
        let stale = self
            .entries
            .get(&node.id)
            .is_none_or(|(cached, _)| *cached != key);

        if stale {
            self.rebuilds += 1;
            let visual = CardVisual {
                palette: palette(key.category, dark_mode),
                badge: key.category.label(),
                label: key.label.clone(),
                description: key.description.clone(),
                size: measure(&key.label, &key.description),
            };
            self.entries.insert(node.id.clone(), (key, visual));
        }

        &self.entries[&node.id].1
    }

    /// Drop entries for nodes that no longer exist.
    pub fn retain(&mut self, live: impl Fn(&NodeId) -> bool) {
        self.entries.retain(|id, _| live(id));
    }

    /// Number of times any card was rebuilt.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Card size for text that lays out to the given heights.
pub fn card_size(label_height: f32, description_height: f32) -> Size {
    Size::new(
        CARD_WIDTH,
        CARD_PADDING * 2.0 + BADGE_HEIGHT + ROW_GAP + label_height + ROW_GAP + description_height,
    )
}

/// Measure a card with real font metrics.
pub fn measure_card(painter: &Painter, label: &str, description: &str) -> Size {
    let wrap = CARD_WIDTH - CARD_PADDING * 2.0;
    let label = painter.layout(
        label.to_string(),
        FontId::proportional(LABEL_FONT),
        Color32::WHITE,
        wrap,
    );
    let description = painter.layout(
        description.to_string(),
        FontId::proportional(DESCRIPTION_FONT),
        Color32::WHITE,
        wrap,
    );
    card_size(label.size().y, description.size().y)
}

/// Canvas-space rectangle of a node's card.
pub fn card_rect(node: &DiagramNode, fallback: Size) -> Rect {
    let size = node.size.unwrap_or(fallback);
    Rect::from_min_size(
        pos2(node.position.x, node.position.y),
        vec2(size.width, size.height),
    )
}

/// Top (incoming) handle center.
pub fn target_handle(card: Rect) -> Pos2 {
    card.center_top()
}

/// Bottom (outgoing) handle center.
pub fn source_handle(card: Rect) -> Pos2 {
    card.center_bottom()
}

// =============================================================================
// Painting
// =============================================================================

/// Paint a card whose canvas rectangle maps to `screen` at `zoom`.
pub fn paint_card(
    painter: &Painter,
    screen: Rect,
    zoom: f32,
    visual: &CardVisual,
    selected: bool,
    dark_mode: bool,
) {
    let palette = visual.palette;
    let radius = CornerRadius::same((6.0 * zoom).round().clamp(0.0, 255.0) as u8);
    let border = if selected {
        Stroke::new(2.0 * zoom, selection_color(dark_mode))
    } else {
        Stroke::new(1.0 * zoom, palette.border)
    };
    painter.rect(screen, radius, palette.background, border, StrokeKind::Inside);

    let pad = CARD_PADDING * zoom;
    let wrap = (CARD_WIDTH - CARD_PADDING * 2.0) * zoom;
    let mut cursor = screen.min + vec2(pad, pad);

    // Badge
    let badge_text = painter.layout_no_wrap(
        visual.badge.to_string(),
        FontId::proportional(BADGE_FONT * zoom),
        Color32::WHITE,
    );
    let badge_rect = Rect::from_min_size(
        cursor,
        vec2(badge_text.size().x + 12.0 * zoom, BADGE_HEIGHT * zoom),
    );
    painter.rect_filled(badge_rect, CornerRadius::same(radius.nw), palette.badge);
    painter.galley(
        badge_rect.center() - badge_text.size() * 0.5,
        badge_text,
        Color32::WHITE,
    );
    cursor.y += (BADGE_HEIGHT + ROW_GAP) * zoom;

    let label = painter.layout(
        visual.label.clone(),
        FontId::proportional(LABEL_FONT * zoom),
        palette.text,
        wrap,
    );
    let label_height = label.size().y;
    painter.galley(cursor, label, palette.text);
    cursor.y += label_height + ROW_GAP * zoom;

    let description = painter.layout(
        visual.description.clone(),
        FontId::proportional(DESCRIPTION_FONT * zoom),
        palette.muted_text,
        wrap,
    );
    painter.galley(cursor, description, palette.muted_text);

    let handle_fill = if dark_mode {
        Color32::from_gray(200)
    } else {
        Color32::from_gray(60)
    };
    for center in [target_handle(screen), source_handle(screen)] {
        painter.circle(
            center,
            HANDLE_RADIUS * zoom,
            handle_fill,
            Stroke::new(1.0, palette.border),
        );
    }
}
