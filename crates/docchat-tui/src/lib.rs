//! docchat-tui: Terminal UI for chatting with a PDF
//!
//! This crate provides the interactive front end for docchat:
//! - Upload stage with a path prompt and processing indicator
//! - Chat stage with document panel, transcript and question box
//! - The event loop that owns all state and runs network requests as tasks

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, Request, Screen};
pub use docchat_engine;
pub use event::{Action, Event, EventHandler};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        KeyCode, KeyEvent, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use docchat_engine::{Answer, ClientError, Config, DocChatClient, QuestionTicket};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::task::JoinHandle;

type UploadTask = (u64, JoinHandle<Result<(), ClientError>>);
type QuestionTask = (QuestionTicket, JoinHandle<Result<Answer, ClientError>>);

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop until the user quits, and
/// restores the terminal on exit.
pub async fn run_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = DocChatClient::new(&config)?;

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!(server = %config.server_url, "starting tui");
    let mut app = App::new(config);

    // 4 Hz tick rate = 250ms
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events, &client).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    client: &DocChatClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut uploads: Vec<UploadTask> = Vec::new();
    let mut questions: Vec<QuestionTask> = Vec::new();

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();

            match app.screen() {
                Screen::Upload | Screen::Chat => screens::render_stage(app, area, buf),
                Screen::QuitConfirm => screens::QuitConfirmScreen.render(app, area, buf),
            }

            if app.show_help {
                screens::render_help_overlay(area, buf);
            }
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if !handle_text_key(app, key) {
                        app.handle_action(event::key_to_action(key));
                    }
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                        MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                        _ => {}
                    }
                }
                Event::Paste(text) => handle_paste(app, &text),
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        for request in app.take_requests() {
            match request {
                Request::Upload(ticket) => {
                    let client = client.clone();
                    let generation = ticket.generation;
                    let handle = tokio::spawn(async move { client.upload(&ticket.file).await });
                    uploads.push((generation, handle));
                }
                Request::Question(ticket) => {
                    let client = client.clone();
                    let question = ticket.question.clone();
                    let handle = tokio::spawn(async move { client.ask(&question).await });
                    questions.push((ticket, handle));
                }
            }
        }

        // Check for completed uploads (non-blocking)
        let completed: Vec<usize> = uploads
            .iter()
            .enumerate()
            .filter(|(_, (_, handle))| handle.is_finished())
            .map(|(i, _)| i)
            .collect();
        for i in completed.into_iter().rev() {
            let (generation, handle) = uploads.remove(i);
            let result = handle.await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "upload task failed");
                Err(ClientError::Request(e.to_string()))
            });
            app.apply_upload_result(generation, result);
        }

        // Check for completed questions
        let completed: Vec<usize> = questions
            .iter()
            .enumerate()
            .filter(|(_, (_, handle))| handle.is_finished())
            .map(|(i, _)| i)
            .collect();
        for i in completed.into_iter().rev() {
            let (ticket, handle) = questions.remove(i);
            let result = handle.await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "question task failed");
                Err(ClientError::Request(e.to_string()))
            });
            app.apply_answer(&ticket, result);
        }

        if app.should_quit {
            for (_, handle) in uploads {
                handle.abort();
            }
            for (_, handle) in questions {
                handle.abort();
            }
            break;
        }
    }

    tracing::info!("tui closed");
    Ok(())
}

/// Route a key to the active text input.
/// Returns true if the key was handled (should not be processed as action).
fn handle_text_key(app: &mut App, key: KeyEvent) -> bool {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }
    let Some(input) = app.active_input_mut() else {
        return false;
    };

    match key.code {
        // A leading '?' opens help instead of starting the text
        KeyCode::Char('?') if input.is_empty() => false,
        KeyCode::Char(c) => {
            input.insert(c);
            true
        }
        KeyCode::Backspace => {
            input.backspace();
            true
        }
        KeyCode::Delete => {
            input.delete();
            true
        }
        KeyCode::Left => {
            input.move_left();
            true
        }
        KeyCode::Right => {
            input.move_right();
            true
        }
        KeyCode::Home => {
            input.move_home();
            true
        }
        KeyCode::End => {
            input.move_end();
            true
        }
        KeyCode::Up => {
            input.history_prev();
            true
        }
        KeyCode::Down => {
            input.history_next();
            true
        }
        _ => false,
    }
}

/// Insert pasted text into the active input as a single line.
fn handle_paste(app: &mut App, text: &str) {
    if let Some(input) = app.active_input_mut() {
        let line = text.trim_end_matches(['\r', '\n']).replace(['\r', '\n'], " ");
        input.insert_str(&line);
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
