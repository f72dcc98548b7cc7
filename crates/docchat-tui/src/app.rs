//! Application state and update logic for the docchat TUI.

use crate::event::Action;
use crate::ui::widgets::TextInputState;
use docchat_engine::{
    Answer, ClientError, Config, ConversationEngine, Notice, QuestionTicket, Resolution,
    SessionController, SessionError, UploadFile, UploadTicket, View,
};
use std::path::Path;

/// Lines moved by one PgUp/PgDn press.
const PAGE_LINES: usize = 10;

/// The screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Path prompt, or the processing indicator while an upload runs.
    Upload,
    /// Document panel and conversation.
    Chat,
    /// Quit confirmation over the current stage.
    QuitConfirm,
}

/// Work the event loop should start on the app's behalf.
#[derive(Debug)]
pub enum Request {
    Upload(UploadTicket),
    Question(QuestionTicket),
}

/// Main application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether to show the help overlay.
    pub show_help: bool,

    quit_confirm: bool,

    /// Upload stage reopened from chat to replace the document.
    picker_open: bool,

    /// Effective configuration.
    pub config: Config,

    /// Document lifecycle and chat history.
    pub session: SessionController,

    /// Question/answer exchange state.
    pub engine: ConversationEngine,

    /// Path prompt on the upload stage.
    pub path_input: TextInputState,

    /// Question box on the chat stage.
    pub question_input: TextInputState,

    /// Externally owned reset signal; every increment starts a new session.
    reset_counter: u64,

    /// Transient notification shown in the status bar.
    pub notification: Option<Notice>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Transcript lines scrolled up from the bottom (0 = follow new messages).
    pub transcript_scroll: usize,

    /// Tick counter for animations.
    pub tick: usize,

    outbox: Vec<Request>,
}

impl App {
    /// Create a new app.
    pub fn new(config: Config) -> Self {
        let reset_counter = 0;
        Self {
            should_quit: false,
            show_help: false,
            quit_confirm: false,
            picker_open: false,
            config,
            session: SessionController::with_reset_signal(reset_counter),
            engine: ConversationEngine::new(),
            path_input: TextInputState::new(),
            question_input: TextInputState::new(),
            reset_counter,
            notification: None,
            notification_ttl: 0,
            transcript_scroll: 0,
            tick: 0,
            outbox: Vec::new(),
        }
    }

    /// Create an app with default configuration for tests.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self::new(Config::default())
    }

    /// The screen to render.
    pub fn screen(&self) -> Screen {
        if self.quit_confirm {
            Screen::QuitConfirm
        } else {
            self.stage()
        }
    }

    /// The stage under any overlay: `Upload` or `Chat`.
    pub fn stage(&self) -> Screen {
        match self.session.view() {
            View::Chat if !self.picker_open => Screen::Chat,
            View::Chat | View::Upload => Screen::Upload,
        }
    }

    /// Whether the upload stage was opened from chat and can be dismissed.
    pub fn picker_open(&self) -> bool {
        self.picker_open
    }

    /// Whether the question box may submit right now.
    pub fn can_ask(&self) -> bool {
        !self.engine.is_busy()
    }

    /// The text input that receives typing on the current screen, if any.
    pub fn active_input_mut(&mut self) -> Option<&mut TextInputState> {
        if self.show_help {
            return None;
        }
        match self.screen() {
            Screen::Upload if !self.session.is_processing() => Some(&mut self.path_input),
            Screen::Chat => Some(&mut self.question_input),
            Screen::Upload | Screen::QuitConfirm => None,
        }
    }

    /// Requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        if self.show_help {
            if matches!(
                action,
                Action::Back | Action::Help | Action::Quit | Action::Select
            ) {
                self.show_help = false;
            }
            return;
        }

        match self.screen() {
            Screen::QuitConfirm => self.handle_quit_confirm_action(action),
            Screen::Upload => self.handle_upload_action(action),
            Screen::Chat => self.handle_chat_action(action),
        }
    }

    fn handle_quit_confirm_action(&mut self, action: Action) {
        match action {
            Action::Select | Action::Quit => self.should_quit = true,
            Action::Back => self.quit_confirm = false,
            _ => {}
        }
    }

    fn handle_upload_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit_confirm = true,
            Action::Help => self.show_help = true,
            Action::Back => {
                if self.picker_open {
                    self.picker_open = false;
                    self.path_input.clear();
                } else {
                    self.quit_confirm = true;
                }
            }
            Action::Select => self.submit_input(),
            Action::NewSession => self.request_new_session(),
            _ => {}
        }
    }

    fn handle_chat_action(&mut self, action: Action) {
        match action {
            Action::Quit | Action::Back => self.quit_confirm = true,
            Action::Help => self.show_help = true,
            Action::Select => self.submit_input(),
            Action::OpenUpload => {
                self.picker_open = true;
                self.path_input.clear();
            }
            Action::DeleteDocument => self.delete_document(),
            Action::NewSession => self.request_new_session(),
            Action::ScrollUp => self.transcript_scroll += 1,
            Action::ScrollDown => self.transcript_scroll = self.transcript_scroll.saturating_sub(1),
            Action::PageUp => self.transcript_scroll += PAGE_LINES,
            Action::PageDown => {
                self.transcript_scroll = self.transcript_scroll.saturating_sub(PAGE_LINES);
            }
            Action::ScrollBottom => self.transcript_scroll = 0,
            Action::None => {}
        }
    }

    /// Submit the input of the current screen.
    pub fn submit_input(&mut self) {
        match self.screen() {
            Screen::Upload => self.submit_path(),
            Screen::Chat => self.submit_question(),
            Screen::QuitConfirm => {}
        }
    }

    fn submit_path(&mut self) {
        if self.session.is_processing() {
            return;
        }
        let raw = self.path_input.content().trim();
        // Terminals quote dropped paths.
        let path = raw.trim_matches(|c| c == '\'' || c == '"').to_string();
        if path.is_empty() {
            return;
        }

        let file = match UploadFile::from_path(Path::new(&path)) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "cannot read upload");
                self.set_notification(Notice::error(format!("Cannot read {path}: {e}")));
                return;
            }
        };

        match self.session.submit_upload(file) {
            Ok(ticket) => {
                self.path_input.submit();
                self.picker_open = false;
                self.outbox.push(Request::Upload(ticket));
            }
            Err(SessionError::InvalidFileType { .. }) => {}
            Err(e) => self.set_notification(Notice::warning(e.to_string())),
        }
        self.pull_notices();
    }

    fn submit_question(&mut self) {
        if !self.can_ask() {
            return;
        }
        let question = self.question_input.content().to_string();
        if let Some(ticket) = self
            .engine
            .submit_question(self.session.history_mut(), &question)
        {
            self.question_input.submit();
            self.transcript_scroll = 0;
            self.outbox.push(Request::Question(ticket));
        }
    }

    fn delete_document(&mut self) {
        match self.session.delete_document() {
            Ok(()) => {
                self.set_notification(Notice::info("Document removed. Chat history kept."));
            }
            Err(e) => self.set_notification(Notice::warning(e.to_string())),
        }
    }

    /// Increment the reset signal and let the session observe it.
    pub fn request_new_session(&mut self) {
        self.reset_counter += 1;
        self.observe_reset();
    }

    fn observe_reset(&mut self) {
        if self
            .session
            .observe_reset(self.reset_counter, &mut self.engine)
        {
            self.path_input.clear();
            self.question_input.clear();
            self.picker_open = false;
            self.transcript_scroll = 0;
            self.outbox.clear();
            self.set_notification(Notice::info("Started a new session"));
        }
    }

    /// Apply the result of an upload request.
    pub fn apply_upload_result(&mut self, generation: u64, result: Result<(), ClientError>) {
        if self.session.on_processing_complete(generation, result) {
            self.transcript_scroll = 0;
        }
        self.pull_notices();
    }

    /// Apply the result of a question request.
    pub fn apply_answer(&mut self, ticket: &QuestionTicket, result: Result<Answer, ClientError>) {
        let resolution = self
            .engine
            .resolve(self.session.history_mut(), ticket, result);
        if resolution == Resolution::Answered {
            self.transcript_scroll = 0;
        }
        self.pull_notices();
    }

    /// Move queued component notices into the status bar.
    fn pull_notices(&mut self) {
        let mut notices = self.session.take_notices();
        notices.extend(self.engine.take_notices());
        if let Some(notice) = latest_notice(notices) {
            self.set_notification(notice);
        }
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, notice: Notice) {
        self.notification = Some(notice);
        self.notification_ttl = self.config.notice_ticks;
    }

    /// Advance animations and expire the notification.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.observe_reset();

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }
}

/// The status bar shows one notice; the newest wins and the rest go to the log.
fn latest_notice(mut notices: Vec<Notice>) -> Option<Notice> {
    let latest = notices.pop();
    for dropped in notices {
        tracing::debug!(level = %dropped.level, message = %dropped.message, "notice superseded");
    }
    latest
}
