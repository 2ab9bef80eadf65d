//! Application state and update logic for the tutor TUI.

use crate::event::Action;
use crate::feedback::{pulse, Pulse};
use crate::transcript::TranscriptState;
use crate::ui::widgets::InputState;
use std::path::PathBuf;
use tutor_engine::{
    frame_digest, sessions_dir, AgentError, CaptureError, CaptureRequest, CapturedFrame, Config,
    ModelConfig, ModelInfo, Part, Session, SendPayload, ToolRegistry, Transcript, KICKOFF_TEXT,
};

/// The current screen being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Welcome,
    Capture,
    Tutor,
}

/// Conversation phase, derived from the latch and the transcript.
///
/// `Idle` until the problem image kicks off the first send, then
/// `AwaitingFirstResponse` until the transcript grows past the opening
/// message. There is no way back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorPhase {
    Idle,
    AwaitingFirstResponse,
    Conversing,
}

/// A suggested prompt with its on-screen label.
#[derive(Debug, Clone, Copy)]
pub struct QuickPrompt {
    /// Label shown on the button row.
    pub label: &'static str,
    /// Text dispatched verbatim.
    pub text: &'static str,
}

/// Fixed quick actions, shown once the opening exchange has happened.
pub const QUICK_PROMPTS: &[QuickPrompt] = &[
    QuickPrompt {
        label: "Why did we do that?",
        text: "Why did we do that?",
    },
    QuickPrompt {
        label: "Explain differently",
        text: "Can you explain that differently?",
    },
];

/// Everything the event loop needs to spawn one agent turn.
#[derive(Debug)]
pub struct SendJob {
    pub model: ModelConfig,
    pub transcript: Transcript,
    pub registry: ToolRegistry,
    pub timeout_seconds: u64,
}

/// Everything the event loop needs to spawn one capture.
#[derive(Debug)]
pub struct CaptureJob {
    pub path: PathBuf,
    pub request: CaptureRequest,
}

/// Application state.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Current screen.
    pub screen: Screen,

    /// Directory the app was started in (config and sessions live under it).
    pub root: PathBuf,

    /// Configuration.
    pub config: Config,

    /// Discovered backends.
    pub models: Vec<ModelInfo>,

    /// Registered agent tools.
    pub registry: ToolRegistry,

    /// Current session (owns the transcript).
    pub session: Session,

    /// Chat input state.
    pub input: InputState,

    /// Image-path input on the capture screen.
    pub path_input: InputState,

    /// Transcript viewport state.
    pub transcript_state: TranscriptState,

    /// Captured problem image as a data URI (the navigation parameter).
    pub problem_image: Option<String>,

    /// One-shot latch for the initial image-triggered send.
    kickoff_sent: bool,

    /// Whether an agent turn is in flight.
    pub send_in_flight: bool,

    /// Whether a capture is in flight.
    pub capturing: bool,

    /// Whether the last agent turn failed (renders the generic notice).
    pub agent_error: bool,

    /// Tick counter for animations.
    pub tick: usize,

    /// Temporary notification in the status bar.
    pub notification: Option<String>,

    /// Ticks remaining until the notification clears.
    notification_ttl: usize,
}

impl App {
    /// Create a new app instance.
    pub fn new(root: PathBuf, config: Config, models: Vec<ModelInfo>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            screen: Screen::Welcome,
            root,
            config,
            models,
            registry: ToolRegistry::tutor_default(),
            session: Session::new(),
            input: InputState::new(),
            path_input: InputState::new(),
            transcript_state: TranscriptState::new(),
            problem_image: None,
            kickoff_sent: false,
            send_in_flight: false,
            capturing: false,
            agent_error: false,
            tick: 0,
            notification: None,
            notification_ttl: 0,
        }
    }

    /// The conversation transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.session.transcript
    }

    /// Current conversation phase.
    pub fn phase(&self) -> TutorPhase {
        if self.session.transcript.len() > 1 {
            TutorPhase::Conversing
        } else if self.kickoff_sent {
            TutorPhase::AwaitingFirstResponse
        } else {
            TutorPhase::Idle
        }
    }

    /// Whether the agent owes a reply right now.
    ///
    /// The transcript predicate is the contract; the in-flight flag covers
    /// the window where an assistant turn arrives in several messages.
    pub fn is_responding(&self) -> bool {
        self.session.transcript.awaiting_reply() || self.send_in_flight
    }

    /// Quick actions appear once the opening exchange is on screen.
    pub fn quick_actions_visible(&self) -> bool {
        self.session.transcript.len() > 1
    }

    /// The backend used for sends: first configured backend that was
    /// discovered as ready.
    pub fn chat_model(&self) -> Option<ModelConfig> {
        self.config
            .model_priority
            .iter()
            .find(|name| {
                self.models
                    .iter()
                    .any(|m| &m.name == *name && m.ready())
            })
            .map(|name| self.config.model(name))
    }

    // === Dispatch controller ===

    /// Fire the initial image-triggered send, at most once per app instance.
    ///
    /// Returns the payload only on the single call where the latch flips;
    /// callers may invoke this as often as they like.
    pub fn maybe_kickoff(&mut self) -> Option<SendPayload> {
        if self.kickoff_sent {
            return None;
        }
        let image = self.problem_image.clone()?;
        if image.is_empty() || self.chat_model().is_none() {
            return None;
        }

        self.kickoff_sent = true;
        Some(SendPayload::with_file(KICKOFF_TEXT, "image/jpeg", image))
    }

    /// Submit the chat input.
    ///
    /// Empty or whitespace-only input dispatches nothing and is left
    /// untouched; otherwise the input clears immediately (not gated on the
    /// send finishing).
    pub fn submit_input(&mut self) -> Option<SendPayload> {
        if self.send_in_flight {
            return None;
        }
        if self.input.content().trim().is_empty() {
            return None;
        }
        let text = self.input.submit().trim().to_string();
        Some(SendPayload::text(text))
    }

    /// Dispatch a quick-action prompt verbatim.
    pub fn quick_action(&mut self, index: usize) -> Option<SendPayload> {
        if !self.quick_actions_visible() || self.send_in_flight {
            return None;
        }
        let prompt = QUICK_PROMPTS.get(index)?;
        Some(SendPayload::text(prompt.text))
    }

    /// Append the payload as a user message and prepare the agent turn.
    ///
    /// Returns `None` (leaving the transcript unchanged) when no backend is
    /// available.
    pub fn dispatch(&mut self, payload: SendPayload) -> Option<SendJob> {
        let Some(model) = self.chat_model() else {
            self.set_notification("No tutor backend found. Run `tutor doctor`.".to_string());
            return None;
        };

        if let Err(e) = self.session.transcript.push(payload.into_message()) {
            tracing::error!(error = %e, "failed to append user message");
            return None;
        }

        pulse(Pulse::Light);
        self.agent_error = false;
        self.send_in_flight = true;
        self.transcript_state.jump_to_latest();

        Some(SendJob {
            timeout_seconds: model.timeout_seconds,
            model,
            transcript: self.session.transcript.clone(),
            registry: self.registry.clone(),
        })
    }

    /// Apply the result of an agent turn.
    pub fn complete_send(&mut self, result: Result<Vec<Part>, AgentError>) {
        self.send_in_flight = false;
        match result {
            Ok(parts) => {
                let message = tutor_engine::Message::assistant(parts);
                if let Err(e) = self.session.transcript.push(message) {
                    tracing::error!(error = %e, "failed to append assistant message");
                    self.agent_error = true;
                    return;
                }
                self.transcript_state.jump_to_latest();
            }
            Err(e) => {
                tracing::error!(error = %e, "agent turn failed");
                self.agent_error = true;
            }
        }
    }

    // === Capture flow ===

    /// Start a capture from the path typed on the capture screen.
    pub fn begin_capture(&mut self) -> Option<CaptureJob> {
        if self.capturing {
            return None;
        }
        let path = self.path_input.content().trim().to_string();
        if path.is_empty() {
            return None;
        }

        self.capturing = true;
        pulse(Pulse::Medium);
        Some(CaptureJob {
            path: PathBuf::from(path),
            request: CaptureRequest {
                quality: self.config.capture_quality,
                base64: true,
            },
        })
    }

    /// Apply the result of a capture. On success this navigates to the
    /// tutor screen with the data URI as the only carried parameter.
    pub fn complete_capture(&mut self, result: Result<CapturedFrame, CaptureError>) {
        self.capturing = false;
        match result {
            Ok(frame) => {
                self.session.set_image_digest(frame_digest(&frame));
                self.problem_image = Some(frame.data_uri());
                self.path_input.clear();
                self.screen = Screen::Tutor;
            }
            Err(e) => {
                // Logged only; the capture control re-enabling is the UI.
                tracing::error!(error = %e, "capture failed");
            }
        }
    }

    // === Actions ===

    /// Handle a navigation/scroll action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.quit();
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        match self.screen {
            Screen::Welcome => self.handle_welcome_action(action),
            Screen::Capture => self.handle_capture_action(action),
            Screen::Tutor => self.handle_tutor_action(action),
        }
    }

    fn handle_welcome_action(&mut self, action: Action) {
        match action {
            Action::Select | Action::Capture => {
                self.screen = Screen::Capture;
            }
            Action::Back => self.quit(),
            _ => {}
        }
    }

    fn handle_capture_action(&mut self, action: Action) {
        if action == Action::Back {
            self.screen = Screen::Welcome;
        }
    }

    fn handle_tutor_action(&mut self, action: Action) {
        use crate::transcript::SCROLL_STEP;
        match action {
            Action::Back => {
                // Back to the capture screen; the kickoff latch stays set,
                // so a second visit never re-fires the opening send.
                self.screen = Screen::Capture;
            }
            Action::Up => self.transcript_state.scroll_up(SCROLL_STEP),
            Action::Down => self.transcript_state.scroll_down(SCROLL_STEP),
            Action::JumpLatest => self.transcript_state.jump_to_latest(),
            _ => {}
        }
    }

    /// Save the session (when configured) and quit.
    fn quit(&mut self) {
        if self.config.save_sessions && !self.session.transcript.is_empty() {
            let dir = sessions_dir(&self.root);
            if let Err(e) = self.session.save(&dir) {
                tracing::warn!(error = %e, "failed to save session");
            }
        }
        self.should_quit = true;
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        // ~3 seconds at the 4 Hz tick rate.
        self.notification_ttl = 12;
    }

    /// Increment the tick counter and expire the notification.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn new_for_test() -> Self {
        let models = vec![ModelInfo {
            name: "claude".into(),
            found: true,
            path: Some("/usr/local/bin/claude".into()),
            version: Some("1.0.0".into()),
        }];
        let config = Config {
            save_sessions: false,
            ..Config::default()
        };
        Self::new(std::env::temp_dir(), config, models)
    }
}
