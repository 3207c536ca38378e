//! Settings structures for the SolFlow window.

/// Visual style toggles.
#[derive(Debug, Clone)]
pub struct SettingsStyle {
    pub dark_mode: bool,
    /// Show the diagram overview in the canvas corner.
    pub show_minimap: bool,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_minimap: true,
        }
    }
}

impl SettingsStyle {
    pub fn visuals(&self) -> egui::Visuals {
        if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        }
    }
}

/// Native window geometry.
#[derive(Debug, Clone, Copy)]
pub struct SettingsWindow {
    pub width: f32,
    pub height: f32,
    pub sidebar_width: f32,
}

impl Default for SettingsWindow {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            sidebar_width: 384.0,
        }
    }
}
