//! Session controller: document lifecycle and chat history retention.
//!
//! ```text
//! Empty      --submit_upload-->            Processing
//! Processing --processing ok-->            Ready
//! Processing --processing failed-->        Empty
//! Ready      --submit_upload-->            Processing   (history kept)
//! Ready      --delete_document-->          Ready        (history kept)
//! any        --reset-->                    Empty        (history cleared)
//! ```
//!
//! The history is only cleared by a reset. Uploads carry a generation number
//! so that a completion arriving after a reset or a newer upload is ignored.

use crate::client::ClientError;
use crate::conversation::{ChatHistory, ConversationEngine, Message};
use crate::document::{welcome_message, Document, UploadFile};
use crate::notice::{Notice, Notices};
use std::fmt;

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No document yet (or the last upload failed).
    #[default]
    Empty,
    /// A document is being uploaded and processed.
    Processing,
    /// Processing succeeded; chat is available.
    Ready,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Processing => write!(f, "processing"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Which stage of the interface the session calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Upload,
    Chat,
}

/// An accepted upload, to be sent to the service.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    /// Upload generation; pass it back to [`SessionController::on_processing_complete`].
    pub generation: u64,
    /// The file to send.
    pub file: UploadFile,
}

/// Owns the document, the session state and the chat history.
#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
    document: Option<Document>,
    history: ChatHistory,
    reset_signal: u64,
    upload_generation: u64,
    notices: Notices,
}

impl SessionController {
    /// Create a controller in the `Empty` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller that treats `reset_signal` as the current signal value.
    pub fn with_reset_signal(reset_signal: u64) -> Self {
        Self {
            reset_signal,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The bound document, if any.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Mutable history, for the conversation engine.
    pub fn history_mut(&mut self) -> &mut ChatHistory {
        &mut self.history
    }

    /// Whether an upload is being processed.
    pub fn is_processing(&self) -> bool {
        self.state == SessionState::Processing
    }

    /// The stage to show: chat once ready, upload otherwise.
    pub fn view(&self) -> View {
        match self.state {
            SessionState::Ready => View::Chat,
            SessionState::Empty | SessionState::Processing => View::Upload,
        }
    }

    /// Accept a file for upload.
    ///
    /// Files that are not declared as PDF are rejected without any state
    /// change. On success the document is bound, the state moves to
    /// `Processing` and the returned ticket should be sent to the service.
    pub fn submit_upload(&mut self, file: UploadFile) -> Result<UploadTicket, SessionError> {
        if !file.is_document() {
            tracing::debug!(name = %file.name, media_type = %file.media_type, "rejected upload");
            self.notices.push(Notice::warning("Please upload a PDF file"));
            return Err(SessionError::InvalidFileType {
                name: file.name,
                media_type: file.media_type,
            });
        }
        if self.state == SessionState::Processing {
            return Err(SessionError::UploadInProgress);
        }

        let document = Document::from(&file);
        tracing::debug!(
            name = %document.name,
            size = document.size,
            from = %self.state,
            "session -> processing"
        );
        self.document = Some(document);
        self.state = SessionState::Processing;
        self.upload_generation += 1;
        self.notices.push(Notice::info("Processing your PDF..."));

        Ok(UploadTicket {
            generation: self.upload_generation,
            file,
        })
    }

    /// Apply the outcome reported by the processing service.
    ///
    /// Returns `false` when the completion belongs to a superseded upload and
    /// was ignored.
    pub fn on_processing_complete(
        &mut self,
        generation: u64,
        outcome: Result<(), ClientError>,
    ) -> bool {
        if generation != self.upload_generation || self.state != SessionState::Processing {
            tracing::debug!(
                generation,
                current = self.upload_generation,
                state = %self.state,
                "ignoring stale processing result"
            );
            return false;
        }

        match outcome {
            Ok(()) => {
                self.state = SessionState::Ready;
                if self.history.is_empty() {
                    if let Some(document) = &self.document {
                        self.history
                            .push(Message::assistant(welcome_message(document), None));
                    }
                }
                tracing::debug!("session -> ready");
                self.notices.push(Notice::success("PDF processed successfully!"));
            }
            Err(err) => {
                tracing::warn!(error = %err, "document processing failed");
                self.state = SessionState::Empty;
                self.document = None;
                self.notices.push(Notice::error(err.user_message()));
            }
        }
        true
    }

    /// Unbind the document while staying in the chat stage.
    pub fn delete_document(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NotReady(self.state));
        }
        if let Some(document) = self.document.take() {
            tracing::debug!(name = %document.name, "document removed");
        }
        Ok(())
    }

    /// Compare the external reset signal with the last value seen.
    ///
    /// Any change starts a new session. Returns whether a reset happened; the
    /// caller then discards its own pending input.
    pub fn observe_reset(&mut self, signal: u64, engine: &mut ConversationEngine) -> bool {
        if signal == self.reset_signal {
            return false;
        }
        self.reset_signal = signal;
        self.reset_session(engine);
        true
    }

    /// Start over: clear history and document, abandon in-flight work.
    pub fn reset_session(&mut self, engine: &mut ConversationEngine) {
        tracing::debug!(from = %self.state, "session reset");
        self.history.clear();
        self.document = None;
        self.state = SessionState::Empty;
        self.upload_generation += 1;
        engine.cancel_in_flight();
    }

    /// Take queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }
}

/// Errors returned by session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The file is not declared as a PDF.
    #[error("{name} is not a PDF (declared type {media_type})")]
    InvalidFileType { name: String, media_type: String },

    /// Another upload is still being processed.
    #[error("an upload is already being processed")]
    UploadInProgress,

    /// The operation needs a ready session.
    #[error("session is {0}, not ready")]
    NotReady(SessionState),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::notice::NoticeLevel;

    fn pdf(name: &str, size: usize) -> UploadFile {
        UploadFile::new(name, "application/pdf", vec![0u8; size])
    }

    fn ready_session() -> SessionController {
        let mut session = SessionController::new();
        let ticket = session.submit_upload(pdf("a.pdf", 10)).unwrap();
        assert!(session.on_processing_complete(ticket.generation, Ok(())));
        session.take_notices();
        session
    }

    #[test]
    fn test_initial_state() {
        let session = SessionController::new();
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.view(), View::Upload);
        assert!(session.document().is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_invalid_file_type_changes_nothing() {
        let mut session = SessionController::new();
        let err = session
            .submit_upload(UploadFile::new("notes.txt", "text/plain", b"hi".to_vec()))
            .unwrap_err();

        assert!(matches!(err, SessionError::InvalidFileType { .. }));
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.document().is_none());

        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_upload_then_success_seeds_welcome() {
        let mut session = SessionController::new();
        let ticket = session.submit_upload(pdf("report.pdf", 2048)).unwrap();
        assert_eq!(session.state(), SessionState::Processing);
        assert_eq!(session.document().unwrap().name, "report.pdf");

        assert!(session.on_processing_complete(ticket.generation, Ok(())));
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.view(), View::Chat);

        let messages = session.history().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert!(messages[0].content.contains("report.pdf"));
        assert!(messages[0].content.contains("2.00 KB"));
    }

    #[test]
    fn test_processing_failure_returns_to_empty() {
        let mut session = SessionController::new();
        let ticket = session.submit_upload(pdf("report.pdf", 10)).unwrap();
        session.take_notices();

        let applied = session.on_processing_complete(
            ticket.generation,
            Err(ClientError::Connect {
                url: "http://x".into(),
            }),
        );

        assert!(applied);
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.document().is_none());
        assert!(session.history().is_empty());
        let notices = session.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.contains("Cannot connect"));
    }

    #[test]
    fn test_upload_while_processing_is_rejected() {
        let mut session = SessionController::new();
        session.submit_upload(pdf("a.pdf", 1)).unwrap();
        assert_eq!(
            session.submit_upload(pdf("b.pdf", 1)).unwrap_err(),
            SessionError::UploadInProgress
        );
        assert_eq!(session.document().unwrap().name, "a.pdf");
    }

    #[test]
    fn test_delete_document_keeps_history() {
        let mut session = ready_session();
        let before = session.history().len();

        session.delete_document().unwrap();
        assert!(session.document().is_none());
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.view(), View::Chat);
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn test_delete_document_requires_ready() {
        let mut session = SessionController::new();
        assert_eq!(
            session.delete_document().unwrap_err(),
            SessionError::NotReady(SessionState::Empty)
        );
    }

    #[test]
    fn test_replacement_keeps_history_without_second_welcome() {
        let mut session = ready_session();
        session.delete_document().unwrap();

        let ticket = session.submit_upload(pdf("b.pdf", 10)).unwrap();
        assert_eq!(session.state(), SessionState::Processing);
        session.on_processing_complete(ticket.generation, Ok(()));

        assert_eq!(session.document().unwrap().name, "b.pdf");
        assert_eq!(session.history().len(), 1);
        assert!(session.history().messages()[0].content.contains("a.pdf"));
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut engine = ConversationEngine::new();
        let mut session = ready_session();
        engine
            .submit_question(session.history_mut(), "question")
            .unwrap();

        assert!(session.observe_reset(1, &mut engine));
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.history().is_empty());
        assert!(session.document().is_none());
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_reset_signal_only_fires_on_change() {
        let mut engine = ConversationEngine::new();
        let mut session = SessionController::with_reset_signal(5);

        assert!(!session.observe_reset(5, &mut engine));
        assert!(session.observe_reset(3, &mut engine));
        assert!(!session.observe_reset(3, &mut engine));
        assert!(session.observe_reset(40, &mut engine));
        assert_eq!(engine.epoch(), 2);
    }

    #[test]
    fn test_processing_result_after_reset_is_ignored() {
        let mut engine = ConversationEngine::new();
        let mut session = SessionController::new();
        let ticket = session.submit_upload(pdf("a.pdf", 1)).unwrap();

        session.reset_session(&mut engine);
        assert!(!session.on_processing_complete(ticket.generation, Ok(())));
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_superseded_upload_result_is_ignored() {
        let mut engine = ConversationEngine::new();
        let mut session = SessionController::new();
        let first = session.submit_upload(pdf("a.pdf", 1)).unwrap();
        session.reset_session(&mut engine);
        let second = session.submit_upload(pdf("b.pdf", 1)).unwrap();

        assert!(!session.on_processing_complete(first.generation, Ok(())));
        assert_eq!(session.state(), SessionState::Processing);
        assert!(session.on_processing_complete(second.generation, Ok(())));
        assert!(session.history().messages()[0].content.contains("b.pdf"));
    }
}
