//! HTTP client for the document service.
//!
//! The service exposes two endpoints:
//! - upload: multipart body with a `file` field, any 2xx means processed
//! - ask: form body with a `question` field, answers with JSON
//!   `{"answer": "...", "sources": ["..."]}` (`response` is accepted in place
//!   of `answer`)
//!
//! Error bodies may carry a `detail` string, which becomes the user-facing
//! message.

use crate::config::Config;
use crate::document::UploadFile;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

/// Message shown when the service cannot be reached at all.
pub const CONNECT_FAILED_MESSAGE: &str = "Cannot connect to server. Is the backend running?";

/// A finalized answer from the question endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Answer text.
    pub content: String,
    /// Source citations, in the order the service returned them.
    pub sources: Option<Vec<String>>,
}

/// Wire format of the question endpoint response.
#[derive(Debug, Deserialize)]
struct AnswerPayload {
    answer: Option<String>,
    response: Option<String>,
    sources: Option<Vec<String>>,
}

impl AnswerPayload {
    fn into_answer(self) -> Result<Answer, ClientError> {
        let content = self.answer.or(self.response).ok_or_else(|| {
            ClientError::Malformed("response has neither `answer` nor `response`".into())
        })?;
        Ok(Answer {
            content,
            sources: self.sources,
        })
    }
}

/// Decode a question endpoint body.
pub fn parse_answer(body: &str) -> Result<Answer, ClientError> {
    let payload: AnswerPayload =
        serde_json::from_str(body).map_err(|e| ClientError::Malformed(e.to_string()))?;
    payload.into_answer()
}

/// Pull a `detail` string out of an error body, if there is one.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

/// Client for the upload and question endpoints.
#[derive(Debug, Clone)]
pub struct DocChatClient {
    http: Client,
    upload_url: String,
    ask_url: String,
    timeout_secs: u64,
}

impl DocChatClient {
    /// Create a client for the endpoints named in `config`.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;
        Ok(Self {
            http,
            upload_url: config.upload_url(),
            ask_url: config.ask_url(),
            timeout_secs: config.timeout_seconds,
        })
    }

    /// Upload a document for processing.
    pub async fn upload(&self, file: &UploadFile) -> Result<(), ClientError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| ClientError::Request(e.to_string()))?;
        let form = Form::new().part("file", part);

        tracing::info!(name = %file.name, size = file.size(), url = %self.upload_url, "uploading document");
        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e, &self.upload_url))?;

        check_status(response).await?;
        tracing::info!(name = %file.name, "document processed");
        Ok(())
    }

    /// Ask a question about the current document.
    pub async fn ask(&self, question: &str) -> Result<Answer, ClientError> {
        tracing::debug!(url = %self.ask_url, "sending question");
        let response = self
            .http
            .post(&self.ask_url)
            .form(&[("question", question)])
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e, &self.ask_url))?;

        let response = check_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e, &self.ask_url))?;
        parse_answer(&body)
    }

    fn map_transport_error(&self, err: &reqwest::Error, url: &str) -> ClientError {
        if err.is_connect() {
            ClientError::Connect { url: url.to_string() }
        } else if err.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            ClientError::Malformed(err.to_string())
        } else {
            ClientError::Request(err.to_string())
        }
    }
}

/// Turn a non-2xx response into a [`ClientError::Status`].
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body);
    tracing::warn!(status = status.as_u16(), detail = ?detail, "request rejected by server");
    Err(ClientError::Status {
        status: status.as_u16(),
        detail,
    })
}

/// Errors from talking to the document service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The server could not be reached.
    #[error("cannot connect to server at {url}")]
    Connect { url: String },

    /// The request did not finish in time.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The server answered with a non-2xx status.
    #[error("server returned HTTP {status}")]
    Status { status: u16, detail: Option<String> },

    /// The response body was not what the endpoint promises.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Any other request failure.
    #[error("request failed: {0}")]
    Request(String),
}

impl ClientError {
    /// Text suitable for a user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Connect { .. } => CONNECT_FAILED_MESSAGE.to_string(),
            Self::Timeout(secs) => format!("The server did not respond within {secs}s"),
            Self::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Status { status, .. } => format!("Server returned HTTP {status}"),
            Self::Malformed(_) => "Unexpected response from server".to_string(),
            Self::Request(msg) => msg.clone(),
        }
    }

    /// Whether the failure means the server was unreachable.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }
}
