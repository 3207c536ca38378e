//! Page shell state: sidebar visibility and the active sidebar tab.

/// Tabs of the right-hand sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarTab {
    #[default]
    Assistant,
    Code,
}

impl SidebarTab {
    pub const ALL: [SidebarTab; 2] = [SidebarTab::Assistant, SidebarTab::Code];

    pub fn label(self) -> &'static str {
        match self {
            SidebarTab::Assistant => "AI Assistant",
            SidebarTab::Code => "Program Code",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellState {
    pub sidebar_open: bool,
    pub tab: SidebarTab,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            tab: SidebarTab::default(),
        }
    }
}

impl ShellState {
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }
}

/// Draw the sidebar toggle on the right edge of the canvas, vertically centered.
pub fn draw_sidebar_toggle(ui: &mut egui::Ui, shell: &mut ShellState) {
    let g_rect = ui.max_rect();
    let btn_size = egui::vec2(24.0, 32.0);

    let toggle_pos = egui::pos2(
        g_rect.right() - btn_size.x,
        g_rect.center().y - btn_size.y / 2.0,
    );

    let (arrow, tip) = if shell.sidebar_open {
        ("▶", "Hide sidebar (Tab)")
    } else {
        ("◀", "Show sidebar (Tab)")
    };

    egui::Area::new(egui::Id::new("sidebar_toggle_btn"))
        .order(egui::Order::Foreground)
        .fixed_pos(toggle_pos)
        .movable(false)
        .show(ui.ctx(), |ui_area| {
            ui_area.set_clip_rect(g_rect);
            let arrow_text = egui::RichText::new(arrow).size(16.0);
            let response = ui_area.add_sized(btn_size, egui::Button::new(arrow_text).frame(false));
            if response.on_hover_text(tip).clicked() {
                shell.toggle_sidebar();
            }
        });
}
