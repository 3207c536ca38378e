//! Native window command.

use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::{run_native, NativeOptions};
use solflow_llm::CompletionClient;
use solflow_viz::{ChatBridge, ChatPanel, SettingsStyle, SettingsWindow, SolFlowApp, TITLE};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::config::Config;

/// Open the SolFlow window. Chat requests run on `runtime`.
pub fn execute(config: &Config, runtime: Handle) -> Result<()> {
    let client =
        CompletionClient::new(config.provider.clone()).context("Failed to build completion client")?;
    if config.provider.api_key.is_none() {
        warn!("no API key configured; assistant requests may be rejected");
    }

    let window = SettingsWindow::default();
    let style = SettingsStyle {
        dark_mode: config.dark_mode,
        ..Default::default()
    };

    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_title(TITLE),
        ..Default::default()
    };

    info!(model = %config.provider.model_name, "launching window");

    run_native(
        TITLE,
        options,
        Box::new(move |cc| {
            let bridge = ChatBridge::new(runtime, Arc::new(client));
            let app = SolFlowApp::new(cc, ChatPanel::new(bridge), style).with_window(window);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Visualization error: {}", e))?;

    Ok(())
}
