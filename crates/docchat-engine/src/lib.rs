//! docchat-engine: Headless core for chatting with an uploaded document
//!
//! This crate provides everything below the presentation layer:
//! - Document handles, size labels and upload validation
//! - The session controller (empty / processing / ready lifecycle)
//! - The conversation engine (message log, pending indicator, epoch guard)
//! - An HTTP client for the upload and question endpoints
//! - Configuration and user notices

pub mod client;
pub mod config;
pub mod conversation;
pub mod document;
pub mod notice;
pub mod session;

// Re-export commonly used types
pub use client::{parse_answer, Answer, ClientError, DocChatClient, CONNECT_FAILED_MESSAGE};
pub use config::{Config, ConfigError, CONFIG_DIR, SERVER_URL_ENV};
pub use conversation::{
    ChatHistory, ConversationEngine, Message, QuestionTicket, Resolution, Role,
};
pub use document::{
    format_file_size, media_type_for, welcome_message, Document, UploadFile, DOCUMENT_MIME,
};
pub use notice::{Notice, NoticeLevel, Notices};
pub use session::{SessionController, SessionError, SessionState, UploadTicket, View};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
