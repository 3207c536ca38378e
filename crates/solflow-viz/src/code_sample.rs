//! "Program Code" tab: a static, syntax-highlighted instruction processor.

use egui::{ScrollArea, TextStyle, Ui};
use egui_extras::syntax_highlighting::{self, CodeTheme};

/// Example Solana instruction processor shown next to the diagram.
pub const PROGRAM_SOURCE: &str = include_str!("../assets/instruction_processor.rs.txt");

/// syntect token for the listing.
const LANGUAGE: &str = "rs";

pub fn show(ui: &mut Ui) {
    let theme = CodeTheme::from_memory(ui.ctx(), ui.style());

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ScrollArea::both()
            .id_salt("program_code")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.style_mut().override_text_style = Some(TextStyle::Monospace);
                syntax_highlighting::code_view_ui(ui, &theme, PROGRAM_SOURCE, LANGUAGE);
            });
    });
}
