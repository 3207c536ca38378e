//! egui front end for SolFlow.
//!
//! The window shows the program-flow diagram on a pan/zoom canvas with a
//! sidebar holding the assistant chat and a static program listing.

mod app;
pub mod canvas;
pub mod chat_panel;
mod code_sample;
pub mod node_card;
mod render;
mod settings;
pub mod shell;
pub mod viewport;

pub use app::{SolFlowApp, SAVE_CONFIRMATION, TITLE};
pub use canvas::{CanvasOutput, CanvasView};
pub use chat_panel::{ChatBridge, ChatPanel};
pub use code_sample::PROGRAM_SOURCE;
pub use settings::{SettingsStyle, SettingsWindow};
