//! tutor-tui: Terminal UI for the tutor app
//!
//! This crate provides the UI layer:
//! - Welcome, capture, and tutor screens
//! - Transcript rendering with follow-mode scrolling
//! - Dispatch of chat turns and captures as background tasks
//! - Help overlay and status bar

mod app;
mod event;
mod feedback;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod transcript;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, Screen, TutorPhase, QUICK_PROMPTS};
pub use event::{key_to_action, Action, Event, EventHandler};
pub use tutor_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::Path;
use tutor_engine::{
    invoke_tutor, AgentError, CaptureError, CapturedFrame, Config, FileFrameSource, FrameSource,
    ModelInfo, Part,
};

type SendHandle = tokio::task::JoinHandle<Result<Vec<Part>, AgentError>>;
type CaptureHandle = tokio::task::JoinHandle<Result<CapturedFrame, CaptureError>>;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit. When `image` is given, the photo is captured before the first
/// frame and the app opens on the tutor screen.
pub async fn run_tui(
    root: &Path,
    config: Config,
    models: Vec<ModelInfo>,
    image: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(root.to_path_buf(), config, models);

    // A preloaded photo goes through the same capture contract as the
    // capture screen, just synchronously before the first frame.
    if let Some(path) = image {
        let request = tutor_engine::CaptureRequest {
            quality: app.config.capture_quality,
            base64: true,
        };
        app.capturing = true;
        app.complete_capture(FileFrameSource::new(path).capture(&request));
    }

    // 4 Hz tick rate.
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut send_handles: Vec<SendHandle> = Vec::new();
    let mut capture_handles: Vec<CaptureHandle> = Vec::new();

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();

            match app.screen {
                Screen::Welcome => screens::welcome::WelcomeScreen.render(app, area, buf),
                Screen::Capture => screens::capture::CaptureScreen.render(app, area, buf),
                Screen::Tutor => screens::tutor::TutorScreen.render(app, area, buf),
            }

            if app.show_help {
                screens::render_help_overlay(area, buf);
            }
        })?;

        drain_finished_sends(app, &mut send_handles).await;
        drain_finished_captures(app, &mut capture_handles).await;

        // The latch makes re-evaluation harmless; this fires the opening
        // send as soon as an image and a backend are both available.
        if let Some(payload) = app.maybe_kickoff() {
            if let Some(job) = app.dispatch(payload) {
                spawn_send(job, &mut send_handles);
            }
        }

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    let consumed = match app.screen {
                        Screen::Tutor => handle_tutor_key(app, key),
                        Screen::Capture => handle_capture_key(app, key),
                        Screen::Welcome => false,
                    };
                    if consumed {
                        continue;
                    }

                    let action = key_to_action(key);
                    match (app.screen, action) {
                        (Screen::Tutor, Action::Select) => {
                            if let Some(payload) = app.submit_input() {
                                if let Some(job) = app.dispatch(payload) {
                                    spawn_send(job, &mut send_handles);
                                }
                            }
                        }
                        (Screen::Tutor, Action::Quick(i)) => {
                            if let Some(payload) = app.quick_action(i) {
                                if let Some(job) = app.dispatch(payload) {
                                    spawn_send(job, &mut send_handles);
                                }
                            }
                        }
                        (Screen::Capture, Action::Select) => {
                            if let Some(job) = app.begin_capture() {
                                spawn_capture(job, &mut capture_handles);
                            }
                        }
                        _ => app.handle_action(action),
                    }
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::Up),
                        MouseEventKind::ScrollDown => app.handle_action(Action::Down),
                        _ => {}
                    }
                }
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {}
            }
        }

        if app.should_quit {
            for handle in send_handles {
                handle.abort();
            }
            for handle in capture_handles {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

fn spawn_send(job: app::SendJob, handles: &mut Vec<SendHandle>) {
    handles.push(tokio::spawn(async move {
        invoke_tutor(&job.model, &job.transcript, &job.registry, job.timeout_seconds).await
    }));
}

fn spawn_capture(job: app::CaptureJob, handles: &mut Vec<CaptureHandle>) {
    handles.push(tokio::task::spawn_blocking(move || {
        FileFrameSource::new(job.path).capture(&job.request)
    }));
}

async fn drain_finished_sends(app: &mut App, handles: &mut Vec<SendHandle>) {
    let mut completed = Vec::new();
    for (i, handle) in handles.iter().enumerate() {
        if handle.is_finished() {
            completed.push(i);
        }
    }
    for i in completed.into_iter().rev() {
        match handles.remove(i).await {
            Ok(result) => app.complete_send(result),
            Err(e) => {
                tracing::error!(error = %e, "send task failed");
                app.complete_send(Err(AgentError::Io(io::Error::other(e))));
            }
        }
    }
}

async fn drain_finished_captures(app: &mut App, handles: &mut Vec<CaptureHandle>) {
    let mut completed = Vec::new();
    for (i, handle) in handles.iter().enumerate() {
        if handle.is_finished() {
            completed.push(i);
        }
    }
    for i in completed.into_iter().rev() {
        match handles.remove(i).await {
            Ok(result) => app.complete_capture(result),
            Err(e) => {
                tracing::error!(error = %e, "capture task failed");
                app.complete_capture(Err(CaptureError::Io(io::Error::other(e))));
            }
        }
    }
}

/// Handle key input for the tutor chat box.
/// Returns true if the key was consumed by the input.
fn handle_tutor_key(app: &mut App, key: crossterm::event::KeyEvent) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};

    // Control chords carry actions (quit, quick prompts).
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match key.code {
        KeyCode::Char(c) => {
            // Leave '?' for the help overlay while nothing is typed.
            if c == '?' && app.input.is_empty() {
                return false;
            }
            app.input.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input.backspace();
            true
        }
        KeyCode::Delete => {
            app.input.delete();
            true
        }
        KeyCode::Left => {
            app.input.move_left();
            true
        }
        KeyCode::Right => {
            app.input.move_right();
            true
        }
        KeyCode::Home => {
            app.input.move_home();
            true
        }
        KeyCode::End => {
            if app.input.is_empty() {
                false // Jump the transcript to the newest message.
            } else {
                app.input.move_end();
                true
            }
        }
        KeyCode::Up => {
            if app.input.is_empty() {
                app.input.history_prev();
                true
            } else {
                false
            }
        }
        KeyCode::Down => {
            if app.input.is_empty() {
                app.input.history_next();
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Handle key input for the capture screen's path box.
fn handle_capture_key(app: &mut App, key: crossterm::event::KeyEvent) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match key.code {
        KeyCode::Char(c) => {
            if c == '?' && app.path_input.is_empty() {
                return false;
            }
            app.path_input.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.path_input.backspace();
            true
        }
        KeyCode::Delete => {
            app.path_input.delete();
            true
        }
        KeyCode::Left => {
            app.path_input.move_left();
            true
        }
        KeyCode::Right => {
            app.path_input.move_right();
            true
        }
        KeyCode::Home => {
            app.path_input.move_home();
            true
        }
        KeyCode::End => {
            app.path_input.move_end();
            true
        }
        _ => false,
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use crate::test_utils::create_test_app;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    #[test]
    fn test_tutor_key_routes_chars_to_input() {
        let mut app = create_test_app();
        app.screen = Screen::Tutor;

        assert!(handle_tutor_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE)
        ));
        assert!(handle_tutor_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE)
        ));
        assert_eq!(app.input.content(), "hi");
    }

    #[test]
    fn test_tutor_key_passes_control_chords_through() {
        let mut app = create_test_app();
        app.screen = Screen::Tutor;

        assert!(!handle_tutor_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL)
        ));
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_tutor_key_enter_not_consumed() {
        let mut app = create_test_app();
        assert!(!handle_tutor_key(
            &mut app,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
        ));
    }

    #[test]
    fn test_capture_key_routes_chars_to_path_input() {
        let mut app = create_test_app();
        app.screen = Screen::Capture;

        for c in "a.jpg".chars() {
            handle_capture_key(&mut app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        assert_eq!(app.path_input.content(), "a.jpg");
    }
}
