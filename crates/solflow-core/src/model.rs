//! Diagram records: nodes, edges and the categories that drive their styling.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier for a node on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier for an edge on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Position of a node's top-left corner in canvas coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Measured size of a rendered node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// =============================================================================
// Node category
// =============================================================================

/// Role a step plays in the instruction flow. Drives the node's colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    /// Where the program starts executing.
    Entry,
    /// Any intermediate step.
    #[default]
    Process,
    /// Terminal step.
    Exit,
}

impl NodeCategory {
    /// Lowercase tag as it appears in serialized diagrams.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Entry => "entry",
            NodeCategory::Process => "process",
            NodeCategory::Exit => "exit",
        }
    }

    /// Capitalized label used on the node badge.
    pub fn label(self) -> &'static str {
        match self {
            NodeCategory::Entry => "Entry",
            NodeCategory::Process => "Process",
            NodeCategory::Exit => "Exit",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Nodes & edges
// =============================================================================

/// Text and category shown on a node card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    pub description: String,
    #[serde(rename = "nodeType")]
    pub category: NodeCategory,
}

/// A labeled step in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: NodeId,
    pub position: Position,
    pub data: NodeData,
    /// Whether the node is part of the current selection.
    #[serde(default)]
    pub selected: bool,
    /// Set while the user is dragging the node.
    #[serde(default)]
    pub dragging: bool,
    /// Size reported by the renderer after the node was laid out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl DiagramNode {
    pub fn new(
        id: impl Into<String>,
        position: Position,
        category: NodeCategory,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: NodeId::new(id),
            position,
            data: NodeData {
                label: label.into(),
                description: description.into(),
                category,
            },
            selected: false,
            dragging: false,
            size: None,
        }
    }

    pub fn category(&self) -> NodeCategory {
        self.data.category
    }
}

/// A directed transition between two steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub selected: bool,
}

impl DiagramEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        animated: bool,
    ) -> Self {
        Self {
            id: EdgeId::new(id),
            source: NodeId::new(source),
            target: NodeId::new(target),
            animated,
            selected: false,
        }
    }
}

/// Serializable snapshot of everything on the canvas.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &NodeId) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&DiagramEdge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    /// Pretty JSON form used by `save` and the CLI.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
