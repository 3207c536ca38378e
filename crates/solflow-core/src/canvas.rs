//! In-memory canvas state and the change batches that mutate it.
//!
//! Every mutation is last-writer-wins. Nothing here validates that edges
//! point at existing nodes or that connections are unique.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::CanvasResult;
use crate::model::{
    Diagram, DiagramEdge, DiagramNode, EdgeId, NodeCategory, NodeId, Position, Size,
};
use crate::repository::{DiagramRepository, LogRepository};
use crate::sample::seed_diagram;

/// Where freshly added nodes appear.
pub const NEW_NODE_POSITION: Position = Position::new(250.0, 250.0);
pub const NEW_NODE_LABEL: &str = "New Node";
pub const NEW_NODE_DESCRIPTION: &str = "Description for new node";

/// A single user-driven change to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    /// Node moved. `dragging` is true while the pointer is still down.
    Position {
        id: NodeId,
        position: Position,
        dragging: bool,
    },
    /// Renderer measured the node.
    Dimensions { id: NodeId, size: Size },
    /// Node entered or left the selection.
    Select { id: NodeId, selected: bool },
    /// Node removed.
    Remove { id: NodeId },
}

impl NodeChange {
    pub fn id(&self) -> &NodeId {
        match self {
            NodeChange::Position { id, .. }
            | NodeChange::Dimensions { id, .. }
            | NodeChange::Select { id, .. }
            | NodeChange::Remove { id } => id,
        }
    }
}

/// A single user-driven change to an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeChange {
    Select { id: EdgeId, selected: bool },
    Remove { id: EdgeId },
}

impl EdgeChange {
    pub fn id(&self) -> &EdgeId {
        match self {
            EdgeChange::Select { id, .. } | EdgeChange::Remove { id } => id,
        }
    }
}

/// Ordered nodes and edges plus the counters used to mint new ids.
pub struct FlowCanvas {
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
    next_node_id: u64,
    next_edge_seq: u64,
    repository: Arc<dyn DiagramRepository>,
}

impl fmt::Debug for FlowCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowCanvas")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("next_node_id", &self.next_node_id)
            .field("next_edge_seq", &self.next_edge_seq)
            .finish_non_exhaustive()
    }
}

impl Default for FlowCanvas {
    fn default() -> Self {
        Self::new(seed_diagram())
    }
}

impl FlowCanvas {
    /// Build a canvas from an existing diagram. Saves go to the log.
    pub fn new(diagram: Diagram) -> Self {
        // Node ids are minted past the largest numeric id so they are never
        // reused, even after removals.
        let next_node_id = diagram
            .nodes
            .iter()
            .filter_map(|n| n.id.as_str().parse::<u64>().ok())
            .max()
            .and_then(|max| max.checked_add(1))
            .unwrap_or(diagram.nodes.len() as u64 + 1);

        Self {
            nodes: diagram.nodes,
            edges: diagram.edges,
            next_node_id,
            next_edge_seq: 1,
            repository: Arc::new(LogRepository),
        }
    }

    /// Replace the save destination.
    pub fn with_repository(mut self, repository: Arc<dyn DiagramRepository>) -> Self {
        self.repository = repository;
        self
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&DiagramEdge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Snapshot of the current nodes and edges.
    pub fn diagram(&self) -> Diagram {
        Diagram {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Merge a batch of node changes. Changes naming unknown ids are dropped.
    pub fn apply_node_changes(&mut self, changes: impl IntoIterator<Item = NodeChange>) {
        for change in changes {
            if let NodeChange::Remove { id } = &change {
                self.nodes.retain(|n| &n.id != id);
                continue;
            }

            let Some(node) = self.nodes.iter_mut().find(|n| &n.id == change.id()) else {
                debug!(node = %change.id(), "node change for unknown id ignored");
                continue;
            };

            match change {
                NodeChange::Position {
                    position, dragging, ..
                } => {
                    node.position = position;
                    node.dragging = dragging;
                }
                NodeChange::Dimensions { size, .. } => node.size = Some(size),
                NodeChange::Select { selected, .. } => node.selected = selected,
                NodeChange::Remove { .. } => {}
            }
        }
    }

    /// Merge a batch of edge changes. Changes naming unknown ids are dropped.
    pub fn apply_edge_changes(&mut self, changes: impl IntoIterator<Item = EdgeChange>) {
        for change in changes {
            match change {
                EdgeChange::Select { id, selected } => {
                    match self.edges.iter_mut().find(|e| e.id == id) {
                        Some(edge) => edge.selected = selected,
                        None => debug!(edge = %id, "edge change for unknown id ignored"),
                    }
                }
                EdgeChange::Remove { id } => self.edges.retain(|e| e.id != id),
            }
        }
    }

    /// Append an animated edge from `source` to `target`.
    ///
    /// Neither endpoint is checked, and duplicates are allowed.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        let id = EdgeId::new(format!("e{}-{}-{}", source, target, self.next_edge_seq));
        self.next_edge_seq += 1;

        debug!(edge = %id, source = %source, target = %target, "connect");
        self.edges.push(DiagramEdge {
            id: id.clone(),
            source,
            target,
            animated: true,
            selected: false,
        });
        id
    }

    /// Append a placeholder process node at the fixed drop position.
    pub fn add_node(&mut self) -> NodeId {
        // Skips taken ids; possible when the largest loaded id was u64::MAX.
        let id = loop {
            let candidate = NodeId::new(self.next_node_id.to_string());
            self.next_node_id = self.next_node_id.wrapping_add(1);
            if self.node(&candidate).is_none() {
                break candidate;
            }
        };

        debug!(node = %id, "add node");
        self.nodes.push(DiagramNode::new(
            id.as_str(),
            NEW_NODE_POSITION,
            NodeCategory::Process,
            NEW_NODE_LABEL,
            NEW_NODE_DESCRIPTION,
        ));
        id
    }

    /// Serialize the current diagram and hand it to the repository.
    ///
    /// Returns the JSON payload that was stored.
    pub fn save(&self) -> CanvasResult<String> {
        let diagram = self.diagram();
        let json = diagram.to_json_pretty()?;
        self.repository.store(&diagram, &json)?;
        Ok(json)
    }

    // -------------------------------------------------------------------------
    // Selection helpers used by the canvas widget
    // -------------------------------------------------------------------------

    /// Changes that make `id` the only selected node and clear edge selection.
    pub fn select_only_node(&self, id: &NodeId) -> (Vec<NodeChange>, Vec<EdgeChange>) {
        let nodes = self
            .nodes
            .iter()
            .filter(|n| n.selected != (&n.id == id))
            .map(|n| NodeChange::Select {
                id: n.id.clone(),
                selected: &n.id == id,
            })
            .collect();
        (nodes, self.deselect_edges_except(None))
    }

    /// Changes that make `id` the only selected edge and clear node selection.
    pub fn select_only_edge(&self, id: &EdgeId) -> (Vec<NodeChange>, Vec<EdgeChange>) {
        (self.deselect_nodes(), self.deselect_edges_except(Some(id)))
    }

    /// Changes that clear every selection.
    pub fn clear_selection(&self) -> (Vec<NodeChange>, Vec<EdgeChange>) {
        (self.deselect_nodes(), self.deselect_edges_except(None))
    }

    /// Removal changes for every selected edge.
    pub fn remove_selected_edges(&self) -> Vec<EdgeChange> {
        self.edges
            .iter()
            .filter(|e| e.selected)
            .map(|e| EdgeChange::Remove { id: e.id.clone() })
            .collect()
    }

    fn deselect_nodes(&self) -> Vec<NodeChange> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| NodeChange::Select {
                id: n.id.clone(),
                selected: false,
            })
            .collect()
    }

    fn deselect_edges_except(&self, keep: Option<&EdgeId>) -> Vec<EdgeChange> {
        self.edges
            .iter()
            .filter(|e| e.selected != (Some(&e.id) == keep))
            .map(|e| EdgeChange::Select {
                id: e.id.clone(),
                selected: Some(&e.id) == keep,
            })
            .collect()
    }
}
