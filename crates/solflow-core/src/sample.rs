//! Seed diagram shown when the canvas first opens.

use crate::model::{Diagram, DiagramEdge, DiagramNode, NodeCategory, Position};

/// Entry branching into two processing steps that converge on one exit.
pub fn seed_diagram() -> Diagram {
    Diagram {
        nodes: vec![
            DiagramNode::new(
                "1",
                Position::new(250.0, 100.0),
                NodeCategory::Entry,
                "Initialize Program",
                "Creates initial state for the program",
            ),
            DiagramNode::new(
                "2",
                Position::new(100.0, 250.0),
                NodeCategory::Process,
                "Process Transaction",
                "Handles token transfers between accounts",
            ),
            DiagramNode::new(
                "3",
                Position::new(400.0, 250.0),
                NodeCategory::Process,
                "Update State",
                "Updates program state based on transaction",
            ),
            DiagramNode::new(
                "4",
                Position::new(250.0, 400.0),
                NodeCategory::Exit,
                "Finalize",
                "Completes the transaction and emits events",
            ),
        ],
        edges: vec![
            DiagramEdge::new("e1-2", "1", "2", true),
            DiagramEdge::new("e1-3", "1", "3", true),
            DiagramEdge::new("e2-4", "2", "4", true),
            DiagramEdge::new("e3-4", "3", "4", true),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeId;

    #[test]
    fn seed_is_a_diamond() {
        let diagram = seed_diagram();
        assert_eq!(diagram.node_count(), 4);
        assert_eq!(diagram.edge_count(), 4);

        let entry = NodeId::from("1");
        let exit = NodeId::from("4");
        let out_of_entry = diagram.edges.iter().filter(|e| e.source == entry).count();
        let into_exit = diagram.edges.iter().filter(|e| e.target == exit).count();
        assert_eq!(out_of_entry, 2);
        assert_eq!(into_exit, 2);
        assert!(diagram.edges.iter().all(|e| e.animated));
    }
}
