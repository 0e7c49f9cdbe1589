//! Main egui application. Composes the panels and dispatches their intents
//! to the reply and voice controllers.

use std::rc::Rc;

use chrono::Utc;
use egui::{self, CentralPanel, SidePanel};

use chat_core::event_bus::EventBus;
use chat_core::ports::{AudioCapturePort, ChatBackend, ObjectUrlPort};
use chat_core::reply::{ReplyController, SendOutcome};
use chat_core::sessions::SessionRegistry;
use chat_core::store::MessageStore;
use chat_core::voice::VoiceSessionController;
use chat_platform::llm::GeminiBackend;
use chat_platform::media::{BlobUrls, BrowserAudioCapture};
use chat_types::config::{BackendConfig, ChatConfig};
use chat_types::event::ChatEvent;
use chat_types::message::OutgoingMessage;
use chat_ui::intent::UiIntent;
use chat_ui::panels::{chat, settings, sidebar};
use chat_ui::state::UiState;
use chat_ui::theme;

use crate::seed::seed_conversations;

/// The main application state
pub struct ChatApp {
    ui_state: UiState,
    config: ChatConfig,
    event_bus: EventBus,
    store: MessageStore,
    sessions: Rc<SessionRegistry>,
    reply: Rc<ReplyController>,
    voice: Rc<VoiceSessionController>,
    first_frame: bool,
}

impl ChatApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = ChatConfig::default();
        let event_bus = EventBus::new();
        let store = MessageStore::new(seed_conversations(Utc::now()), event_bus.clone());

        let backend: Rc<dyn ChatBackend> = Rc::new(GeminiBackend::new(config.backend.clone()));
        let sessions = Rc::new(SessionRegistry::new(backend.clone()));
        let reply = ReplyController::new(
            store.clone(),
            sessions.clone(),
            event_bus.clone(),
            config.reply.clone(),
        );

        let capture: Rc<dyn AudioCapturePort> = Rc::new(BrowserAudioCapture::new());
        let urls: Rc<dyn ObjectUrlPort> = Rc::new(BlobUrls::new());
        let voice = VoiceSessionController::new(
            backend,
            capture,
            urls,
            config.voice.clone(),
            config.backend.live_model.clone(),
            event_bus.clone(),
        );

        let mut ui_state = UiState::new(config.backend.clone());
        if config.backend.api_key.trim().is_empty() {
            log::warn!("No Gemini API key configured; opening settings");
            ui_state.show_settings = true;
        }

        Self {
            ui_state,
            config,
            event_bus,
            store,
            sessions,
            reply: Rc::new(reply),
            voice: Rc::new(voice),
            first_frame: true,
        }
    }

    /// New sessions and recordings use the rebuilt backend; sessions already
    /// cached keep theirs.
    fn apply_settings(&mut self, backend_config: BackendConfig) {
        if backend_config == self.config.backend {
            log::debug!("Backend settings unchanged");
            return;
        }
        let backend: Rc<dyn ChatBackend> = Rc::new(GeminiBackend::new(backend_config.clone()));
        self.sessions.set_backend(backend.clone());
        self.voice.set_backend(backend, backend_config.live_model.clone());
        log::info!(
            "Backend settings applied: chat model {}, live model {}",
            backend_config.chat_model,
            backend_config.live_model
        );
        self.ui_state.settings_draft = backend_config.clone();
        self.config.backend = backend_config;
        self.ui_state.status_text = "Settings applied".to_string();
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        // Drain events from the controllers
        let events = self.event_bus.drain();
        if !events.is_empty() {
            if events.iter().any(|e| matches!(e, ChatEvent::RecordingFailed { .. })) {
                self.abort_recording(ctx);
            }
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        if self.ui_state.needs_sync() {
            self.ui_state.sync_conversations(self.store.conversations());
        }

        if self.ui_state.is_busy() {
            ctx.request_repaint();
        }

        let mut intents = Vec::new();

        // ── Conversation list ────────────────────────────────
        SidePanel::left("sidebar")
            .resizable(true)
            .default_width(320.0)
            .min_width(240.0)
            .frame(egui::Frame::default().fill(theme::BG_PRIMARY))
            .show(ctx, |ui| {
                sidebar::sidebar_panel(ui, &mut self.ui_state, &mut intents);
            });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    settings::settings_panel(ui, &mut self.ui_state, &mut intents);
                });
        }

        // ── Chat window ──────────────────────────────────────
        CentralPanel::default()
            .frame(egui::Frame::default().fill(theme::BG_CHAT))
            .show(ctx, |ui| {
                chat::chat_panel(ui, &mut self.ui_state, &mut intents);
            });

        for intent in intents {
            self.dispatch(intent, ctx);
        }
    }
}

impl ChatApp {
    fn dispatch(&mut self, intent: UiIntent, ctx: &egui::Context) {
        match intent {
            UiIntent::SelectConversation(id) => self.ui_state.select(&id),
            UiIntent::Send { conversation_id, text, image } => {
                let mut outgoing = OutgoingMessage::text(text);
                if let Some(image) = image {
                    outgoing = outgoing.with_image(image);
                }
                self.dispatch_send(conversation_id, outgoing, ctx);
            }
            UiIntent::PickSuggestion { conversation_id, text } => {
                self.dispatch_send(conversation_id, OutgoingMessage::text(text), ctx);
            }
            UiIntent::StartRecording => self.start_recording(ctx),
            UiIntent::StopRecording => self.stop_recording(ctx),
            UiIntent::AttachImage(image) => self.ui_state.attachment = Some(image),
            UiIntent::ClearAttachment => self.ui_state.attachment = None,
            UiIntent::ApplySettings(backend_config) => self.apply_settings(backend_config),
        }
    }

    /// Run one send/receive cycle (async)
    fn dispatch_send(&self, conversation_id: String, outgoing: OutgoingMessage, ctx: &egui::Context) {
        let reply = self.reply.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            log_outcome(&conversation_id, reply.send(&conversation_id, outgoing).await);
            ctx.request_repaint();
        });
    }

    fn start_recording(&self, ctx: &egui::Context) {
        let voice = self.voice.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            voice.start().await;
            ctx.request_repaint();
        });
    }

    /// Stop recording and send the transcript to the active conversation
    fn stop_recording(&self, ctx: &egui::Context) {
        let voice = self.voice.clone();
        let reply = self.reply.clone();
        let target = self.ui_state.active_conversation.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let recording = voice.stop().await;
            ctx.request_repaint();
            let Some(outgoing) = recording.clone().into_outgoing() else {
                log::info!("Recording produced nothing to send");
                voice.discard(&recording);
                return;
            };
            match target {
                Some(conversation_id) => {
                    log_outcome(&conversation_id, reply.send(&conversation_id, outgoing).await);
                }
                None => {
                    log::warn!("Voice message dropped: no active conversation");
                    voice.discard(&recording);
                }
            }
            ctx.request_repaint();
        });
    }

    fn abort_recording(&self, ctx: &egui::Context) {
        let voice = self.voice.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = voice.abort().await {
                log::debug!("Nothing to abort: {}", e);
            }
            ctx.request_repaint();
        });
    }
}

fn log_outcome(conversation_id: &str, outcome: SendOutcome) {
    match outcome {
        SendOutcome::Rejected(reason) => {
            log::debug!("Send to {} rejected: {:?}", conversation_id, reason);
        }
        SendOutcome::Replied(outcome) => {
            log::debug!("Reply for {} finished: {:?}", conversation_id, outcome);
        }
    }
}
