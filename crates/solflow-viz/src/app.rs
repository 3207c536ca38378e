//! Main application state and page layout.

use eframe::{App, CreationContext};
use egui::{Context, Frame, Margin, RichText};
use solflow_core::FlowCanvas;
use tracing::{debug, error, info};

use crate::canvas::CanvasView;
use crate::chat_panel::ChatPanel;
use crate::code_sample;
use crate::settings::{SettingsStyle, SettingsWindow};
use crate::shell::{draw_sidebar_toggle, ShellState, SidebarTab};

pub const TITLE: &str = "Solana Flow Diagram";
pub const SAVE_CONFIRMATION: &str = "Flow diagram saved!";

/// The SolFlow window: diagram canvas plus the assistant/code sidebar.
pub struct SolFlowApp {
    canvas: FlowCanvas,
    view: CanvasView,
    chat: ChatPanel,
    shell: ShellState,
    settings_style: SettingsStyle,
    settings_window: SettingsWindow,
    /// Confirmation dialog after a successful save.
    save_notice: bool,
}

impl SolFlowApp {
    /// Create the app over the seed diagram.
    pub fn new(cc: &CreationContext<'_>, chat: ChatPanel, settings_style: SettingsStyle) -> Self {
        cc.egui_ctx.set_visuals(settings_style.visuals());

        let mut view = CanvasView::default();
        view.show_minimap = settings_style.show_minimap;

        Self {
            canvas: FlowCanvas::default(),
            view,
            chat,
            shell: ShellState::default(),
            settings_style,
            settings_window: SettingsWindow::default(),
            save_notice: false,
        }
    }

    /// Replace the diagram (e.g. to inject a different save repository).
    pub fn with_canvas(mut self, canvas: FlowCanvas) -> Self {
        self.canvas = canvas;
        self.view.request_fit();
        self
    }

    pub fn with_window(mut self, settings_window: SettingsWindow) -> Self {
        self.settings_window = settings_window;
        self
    }

    fn save(&mut self) {
        match self.canvas.save() {
            Ok(_) => {
                info!(
                    nodes = self.canvas.node_count(),
                    edges = self.canvas.edge_count(),
                    "diagram saved"
                );
                self.save_notice = true;
            }
            Err(err) => error!("failed to save diagram: {err}"),
        }
    }

    fn set_dark_mode(&mut self, ctx: &Context, dark_mode: bool) {
        self.settings_style.dark_mode = dark_mode;
        ctx.set_visuals(self.settings_style.visuals());
    }

    fn ui_header(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("header")
            .frame(Frame::side_top_panel(&ctx.style()).inner_margin(Margin::symmetric(12, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⇄").size(18.0));
                    ui.label(RichText::new(TITLE).strong().size(15.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Connect Wallet").clicked() {
                            debug!("wallet connection is not available");
                        }

                        let dark_mode = self.settings_style.dark_mode;
                        let (icon, tip) = if dark_mode {
                            ("☀", "Switch to light mode")
                        } else {
                            ("🌙", "Switch to dark mode")
                        };
                        if ui.button(icon).on_hover_text(tip).clicked() {
                            self.set_dark_mode(ui.ctx(), !dark_mode);
                        }
                    });
                });
            });
    }

    fn ui_sidebar(&mut self, ctx: &Context) {
        egui::SidePanel::right("sidebar")
            .default_width(self.settings_window.sidebar_width)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    for tab in SidebarTab::ALL {
                        ui.selectable_value(&mut self.shell.tab, tab, tab.label());
                    }
                });
                ui.separator();

                match self.shell.tab {
                    SidebarTab::Assistant => self.chat.show(ui),
                    SidebarTab::Code => code_sample::show(ui),
                }
            });
    }

    fn ui_save_notice(&mut self, ctx: &Context) {
        if !self.save_notice {
            return;
        }

        let mut acknowledged = false;
        let modal = egui::Modal::new(egui::Id::new("save_notice")).show(ctx, |ui| {
            ui.set_width(260.0);
            ui.label(SAVE_CONFIRMATION);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                acknowledged = true;
            }
        });
        if acknowledged || modal.should_close() {
            self.save_notice = false;
        }
    }
}

// =============================================================================
// App
// =============================================================================

impl App for SolFlowApp {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        // Completions can arrive while the assistant tab is hidden.
        if !(self.shell.sidebar_open && self.shell.tab == SidebarTab::Assistant) {
            self.chat.poll();
        }

        if !ctx.wants_keyboard_input() && ctx.input(|i| i.key_pressed(egui::Key::Tab)) {
            self.shell.toggle_sidebar();
        }

        self.ui_header(ctx);

        if self.shell.sidebar_open {
            self.ui_sidebar(ctx);
        }

        egui::CentralPanel::default()
            .frame(Frame::NONE)
            .show(ctx, |ui| {
                let output = self
                    .view
                    .show(ui, &mut self.canvas, self.settings_style.dark_mode);
                if output.save_requested {
                    self.save();
                }
                draw_sidebar_toggle(ui, &mut self.shell);
            });

        self.ui_save_notice(ctx);
    }
}
