//! "AI Assistant" tab: transcript, input row and the async bridge to the generator.
//!
//! Generation runs on a tokio runtime owned by the binary. Each result is
//! sent back over a channel and applied to the [`ChatState`] when the panel
//! polls at the start of a frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use egui::{Align, Color32, Context, CornerRadius, Frame, Layout, Margin, RichText, ScrollArea, Stroke, Ui};
use solflow_core::{ChatState, PendingPrompt, RequestToken, Role};
use solflow_llm::{answer, LlmResult, TextGenerator};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Failure recorded for a generation task that died without sending a result.
const TASK_LOST: &str = "generation task ended without a result";

/// A finished generation call.
#[derive(Debug)]
struct Completion {
    token: RequestToken,
    result: LlmResult<String>,
}

/// Runs generation calls off the UI thread and hands results back.
pub struct ChatBridge {
    runtime: Handle,
    generator: Arc<dyn TextGenerator>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    task: Option<(RequestToken, JoinHandle<()>)>,
}

impl std::fmt::Debug for ChatBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatBridge")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl ChatBridge {
    pub fn new(runtime: Handle, generator: Arc<dyn TextGenerator>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            runtime,
            generator,
            tx,
            rx,
            task: None,
        }
    }

    /// Start generating for `pending`, aborting any call still running.
    ///
    /// `repaint` is woken when the result is ready.
    pub fn dispatch(&mut self, pending: PendingPrompt, repaint: Option<Context>) {
        if let Some((_, previous)) = self.task.take() {
            if !previous.is_finished() {
                debug!(token = %pending.token, "aborting superseded chat request");
                previous.abort();
            }
        }

        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        let token = pending.token;
        let handle = self.runtime.spawn(async move {
            let (token, result) = answer(generator.as_ref(), pending).await;
            let _ = tx.send(Completion { token, result });
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
        self.task = Some((token, handle));
    }

    /// Apply every completion received so far. Returns how many arrived.
    ///
    /// A task that finished without sending (it panicked) completes its
    /// request as a failure so the chat never stays loading.
    pub fn poll(&mut self, chat: &mut ChatState) -> usize {
        // Checked before draining: a task sends before it finishes.
        let finished = self
            .task
            .as_ref()
            .filter(|(_, task)| task.is_finished())
            .map(|(token, _)| *token);

        let mut received = 0;
        while let Ok(Completion { token, result }) = self.rx.try_recv() {
            chat.complete(token, result);
            received += 1;
        }

        if let Some(token) = finished {
            if chat.in_flight() == Some(token) {
                chat.complete(token, Err::<String, _>(TASK_LOST));
            }
        }
        if !chat.is_loading() {
            self.task = None;
        }
        received
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|(_, task)| !task.is_finished())
    }
}

/// Transcript plus bridge, rendered as the assistant tab.
#[derive(Debug)]
pub struct ChatPanel {
    pub chat: ChatState,
    bridge: ChatBridge,
}

impl ChatPanel {
    pub fn new(bridge: ChatBridge) -> Self {
        Self {
            chat: ChatState::new(),
            bridge,
        }
    }

    /// Drain finished calls into the transcript.
    pub fn poll(&mut self) -> usize {
        self.bridge.poll(&mut self.chat)
    }

    /// Submit the input buffer. Blank input does nothing.
    pub fn submit(&mut self, repaint: Option<Context>) -> bool {
        match self.chat.submit() {
            Some(pending) => {
                self.bridge.dispatch(pending, repaint);
                true
            }
            None => false,
        }
    }

    pub fn show(&mut self, ui: &mut Ui) {
        self.poll();
        if self.chat.is_loading() {
            ui.ctx().request_repaint();
        }

        let dark_mode = ui.visuals().dark_mode;
        let input_height = 44.0;
        let transcript_height = (ui.available_height() - input_height).max(80.0);

        ScrollArea::vertical()
            .id_salt("chat_transcript")
            .max_height(transcript_height)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = 8.0;
                for message in self.chat.transcript() {
                    message_bubble(ui, message.role, &message.content, dark_mode);
                }
                if self.chat.is_loading() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Thinking...").weak());
                    });
                }
            });

        ui.separator();

        let loading = self.chat.is_loading();
        let mut send_now = false;
        ui.horizontal(|ui| {
            let button_width = 64.0;
            let text_width = (ui.available_width() - button_width - 8.0).max(80.0);

            let response = ui
                .add_enabled_ui(!loading, |ui| {
                    ui.add_sized(
                        [text_width, 0.0],
                        egui::TextEdit::singleline(&mut self.chat.input)
                            .hint_text("Ask about the program flow..."),
                    )
                })
                .inner;
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send_now = true;
                response.request_focus();
            }

            let clicked = ui
                .add_enabled_ui(!loading, |ui| {
                    ui.add_sized([button_width, 0.0], egui::Button::new("Send"))
                })
                .inner
                .clicked();
            send_now |= clicked;
        });

        if send_now && !loading {
            self.submit(Some(ui.ctx().clone()));
        }
    }
}

fn message_bubble(ui: &mut Ui, role: Role, content: &str, dark_mode: bool) {
    let (fill, marker, layout) = match (role, dark_mode) {
        (Role::User, true) => (
            Color32::from_rgb(30, 64, 175),
            "You",
            Layout::right_to_left(Align::TOP),
        ),
        (Role::User, false) => (
            Color32::from_rgb(219, 234, 254),
            "You",
            Layout::right_to_left(Align::TOP),
        ),
        (Role::Assistant, true) => (
            Color32::from_rgb(39, 39, 42),
            "Assistant",
            Layout::left_to_right(Align::TOP),
        ),
        (Role::Assistant, false) => (
            Color32::from_rgb(244, 244, 245),
            "Assistant",
            Layout::left_to_right(Align::TOP),
        ),
    };
    let max_width = ui.available_width() * 0.85;

    ui.with_layout(layout, |ui| {
        Frame::new()
            .fill(fill)
            .stroke(Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(Margin::symmetric(10, 6))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.vertical(|ui| {
                    ui.label(RichText::new(marker).small().strong());
                    ui.label(content);
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use solflow_core::{ChatMessage, APOLOGY, GREETING};
    use solflow_llm::{fixtures::ScriptedGenerator, GenerationRequest, LlmResult};
    use tokio::runtime::Runtime;

    use super::*;

    /// Answers "slow" after a delay and everything else immediately.
    struct PacedGenerator;

    #[async_trait::async_trait]
    impl TextGenerator for PacedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> LlmResult<String> {
            if request.prompt == "slow" {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            Ok(format!("re: {}", request.prompt))
        }
    }

    struct PanickingGenerator;

    #[async_trait::async_trait]
    impl TextGenerator for PanickingGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> LlmResult<String> {
            panic!("generator blew up");
        }
    }

    fn panel(runtime: &Runtime, generator: Arc<dyn TextGenerator>) -> ChatPanel {
        ChatPanel::new(ChatBridge::new(runtime.handle().clone(), generator))
    }

    fn wait_until_idle(panel: &mut ChatPanel) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while panel.chat.is_loading() && Instant::now() < deadline {
            panel.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn answer_arrives_through_bridge() {
        let runtime = Runtime::new().unwrap();
        let mut panel = panel(&runtime, Arc::new(ScriptedGenerator::answering("It initializes state.")));

        panel.chat.input = "What does entry do?".into();
        assert!(panel.submit(None));
        assert!(panel.chat.is_loading());
        assert!(panel.chat.input.is_empty());

        wait_until_idle(&mut panel);

        assert_eq!(
            panel.chat.transcript(),
            &[
                ChatMessage::assistant(GREETING),
                ChatMessage::user("What does entry do?"),
                ChatMessage::assistant("It initializes state."),
            ]
        );
    }

    #[test]
    fn failure_becomes_apology() {
        let runtime = Runtime::new().unwrap();
        let mut panel = panel(&runtime, Arc::new(ScriptedGenerator::failing(401)));

        panel.chat.input = "hello".into();
        panel.submit(None);
        wait_until_idle(&mut panel);

        assert!(!panel.chat.is_loading());
        assert_eq!(
            panel.chat.transcript().last(),
            Some(&ChatMessage::assistant(APOLOGY))
        );
    }

    #[test]
    fn dead_task_clears_loading_with_apology() {
        let runtime = Runtime::new().unwrap();
        let mut panel = panel(&runtime, Arc::new(PanickingGenerator));

        panel.chat.input = "hello".into();
        assert!(panel.submit(None));
        wait_until_idle(&mut panel);

        assert!(!panel.chat.is_loading());
        assert!(!panel.bridge.is_running());
        assert_eq!(
            panel.chat.transcript(),
            &[
                ChatMessage::assistant(GREETING),
                ChatMessage::user("hello"),
                ChatMessage::assistant(APOLOGY),
            ]
        );

        // The input is usable again afterwards.
        panel.chat.input = "again".into();
        assert!(panel.submit(None));
    }

    #[test]
    fn blank_input_is_not_dispatched() {
        let runtime = Runtime::new().unwrap();
        let generator = ScriptedGenerator::answering("unused");
        let mut panel = panel(&runtime, Arc::new(generator.clone()));

        panel.chat.input = "  ".into();
        assert!(!panel.submit(None));
        assert!(!panel.bridge.is_running());
        assert!(generator.requests().is_empty());
    }

    #[test]
    fn superseded_request_never_lands() {
        let runtime = Runtime::new().unwrap();
        let mut panel = panel(&runtime, Arc::new(PacedGenerator));

        panel.chat.input = "slow".into();
        panel.submit(None);
        panel.chat.input = "fast".into();
        panel.submit(None);

        wait_until_idle(&mut panel);
        // Give an unaborted slow call time to show up.
        std::thread::sleep(Duration::from_millis(400));
        panel.poll();

        let contents: Vec<&str> = panel
            .chat
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec![GREETING, "slow", "fast", "re: fast"]);
    }
}
