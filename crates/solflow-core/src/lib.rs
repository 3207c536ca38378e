//! Core domain types for SolFlow: the program-flow diagram and the assistant chat.
//!
//! Nothing in this crate touches the GUI or the network. The canvas and the
//! chat are plain state machines driven by the viz crate.

mod canvas;
mod chat;
mod error;
mod model;
mod repository;
mod sample;

pub use canvas::{
    EdgeChange, FlowCanvas, NodeChange, NEW_NODE_DESCRIPTION, NEW_NODE_LABEL, NEW_NODE_POSITION,
};
pub use chat::{
    ChatMessage, ChatState, CompletionOutcome, PendingPrompt, RequestToken, Role, APOLOGY,
    GREETING,
};
pub use error::{CanvasError, CanvasResult};
pub use model::{
    Diagram, DiagramEdge, DiagramNode, EdgeId, NodeCategory, NodeData, NodeId, Position, Size,
};
pub use repository::{DiagramRepository, LogRepository, MemoryRepository};
pub use sample::seed_diagram;
