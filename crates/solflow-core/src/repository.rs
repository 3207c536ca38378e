//! Destinations for saved diagrams.
//!
//! The canvas does not know where a saved diagram goes. It serializes itself
//! and hands the payload to a [`DiagramRepository`].

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::error::{CanvasError, CanvasResult};
use crate::model::Diagram;

/// Receives serialized diagrams from [`crate::FlowCanvas::save`].
pub trait DiagramRepository: Send + Sync {
    /// Store a diagram. `json` is the pretty-printed form of `diagram`.
    fn store(&self, diagram: &Diagram, json: &str) -> CanvasResult<()>;
}

/// Writes saved diagrams to the log and nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRepository;

impl DiagramRepository for LogRepository {
    fn store(&self, diagram: &Diagram, json: &str) -> CanvasResult<()> {
        info!(
            target: "solflow::save",
            nodes = diagram.node_count(),
            edges = diagram.edge_count(),
            "Saving flow diagram:\n{json}"
        );
        Ok(())
    }
}

/// Keeps every saved payload in memory. Cloning shares the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    saved: Arc<Mutex<Vec<String>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All payloads stored so far, oldest first.
    pub fn saved(&self) -> Vec<String> {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.saved().pop()
    }
}

impl DiagramRepository for MemoryRepository {
    fn store(&self, _diagram: &Diagram, json: &str) -> CanvasResult<()> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| CanvasError::repository("memory repository poisoned"))?;
        saved.push(json.to_string());
        Ok(())
    }
}
