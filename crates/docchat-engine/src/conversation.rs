//! Conversation engine: the message log and the question lifecycle.
//!
//! A question goes through submit -> pending indicator -> resolve. The
//! engine keeps at most one question in flight and tags each with the epoch
//! current at submission. A reset advances the epoch, so an answer that
//! arrives afterwards no longer matches and is dropped.

use crate::client::{Answer, ClientError};
use crate::notice::{Notice, Notices};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions.
    User,
    /// The answering service.
    Assistant,
}

/// A single entry in the chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Source citations attached to an answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    /// Typing indicator placeholder.
    #[serde(default)]
    pub pending: bool,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
            pending: false,
            timestamp: Utc::now(),
        }
    }

    /// Create a finalized assistant message.
    pub fn assistant(content: impl Into<String>, sources: Option<Vec<String>>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources,
            pending: false,
            timestamp: Utc::now(),
        }
    }

    /// Create the assistant typing indicator.
    pub fn pending() -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            sources: None,
            pending: true,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered message log.
///
/// At most one pending message exists, and when it does it is the last
/// entry. The mutators below keep that true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a finalized message. Any pending indicator stays last.
    pub fn push(&mut self, message: Message) {
        debug_assert!(!message.pending, "use push_pending for placeholders");
        match self.remove_pending() {
            Some(pending) => {
                self.messages.push(message);
                self.messages.push(pending);
            }
            None => self.messages.push(message),
        }
    }

    /// Append the typing indicator, replacing an existing one.
    pub fn push_pending(&mut self) {
        self.remove_pending();
        self.messages.push(Message::pending());
    }

    /// Remove the typing indicator, if present.
    pub fn remove_pending(&mut self) -> Option<Message> {
        if self.messages.last().is_some_and(|m| m.pending) {
            self.messages.pop()
        } else {
            None
        }
    }

    /// The typing indicator, if present.
    pub fn pending(&self) -> Option<&Message> {
        self.messages.last().filter(|m| m.pending)
    }

    /// Number of pending messages (0 or 1).
    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.pending).count()
    }

    /// Remove every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// A question that has been submitted and awaits an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTicket {
    /// Epoch at submission time.
    pub epoch: u64,
    /// Trimmed question text to send.
    pub question: String,
}

/// What happened when an answer (or failure) came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The answer was appended to the history.
    Answered,
    /// The question failed; the pending indicator was removed.
    Failed(ClientError),
    /// The ticket belonged to an earlier epoch; nothing changed.
    Discarded,
}

/// Drives the question lifecycle against a [`ChatHistory`].
#[derive(Debug, Default)]
pub struct ConversationEngine {
    epoch: u64,
    in_flight: Option<u64>,
    notices: Notices,
}

impl ConversationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a question is awaiting its answer.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Submit a question.
    ///
    /// Blank text is ignored. While another question is in flight nothing is
    /// submitted either. Otherwise the user message and the typing indicator
    /// are appended and a ticket for exactly one request is returned.
    pub fn submit_question(
        &mut self,
        history: &mut ChatHistory,
        text: &str,
    ) -> Option<QuestionTicket> {
        let question = text.trim();
        if question.is_empty() {
            return None;
        }
        if self.is_busy() {
            tracing::debug!("question ignored, another one is in flight");
            return None;
        }

        history.push(Message::user(question));
        history.push_pending();
        self.in_flight = Some(self.epoch);
        tracing::debug!(epoch = self.epoch, "question submitted");

        Some(QuestionTicket {
            epoch: self.epoch,
            question: question.to_string(),
        })
    }

    /// Apply the outcome of a submitted question.
    pub fn resolve(
        &mut self,
        history: &mut ChatHistory,
        ticket: &QuestionTicket,
        outcome: Result<Answer, ClientError>,
    ) -> Resolution {
        if ticket.epoch != self.epoch || self.in_flight != Some(ticket.epoch) {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "discarding stale answer"
            );
            return Resolution::Discarded;
        }

        history.remove_pending();
        self.in_flight = None;

        match outcome {
            Ok(answer) => {
                history.push(Message::assistant(answer.content, answer.sources));
                Resolution::Answered
            }
            Err(err) => {
                tracing::warn!(error = %err, "question failed");
                self.notices.push(Notice::error(err.user_message()));
                Resolution::Failed(err)
            }
        }
    }

    /// Abandon any in-flight question. Its answer will be discarded.
    pub fn cancel_in_flight(&mut self) {
        self.epoch += 1;
        self.in_flight = None;
    }

    /// Take queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }
}
