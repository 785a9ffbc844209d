//! Prompts and `generateContent` payloads.

use crate::error::{FeedbackError, FeedbackResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Instruction sent alongside an exported drawing.
pub const IMAGE_PROMPT: &str =
    "Provide artistic feedback (under 100 words) to help improve this drawing.";

/// Appended to every chat message.
pub const CHAT_PROMPT_SUFFIX: &str = "\n\nPlease respond in under 100 words and act like an art teacher teaching an student. Omit all markdown/syntaxxing (bold, italics, underline)";

/// User line posted to the chat when an analysis starts.
pub const ANALYSIS_REQUEST_LINE: &str = "Analyzing your drawing in 100 words or less";

pub const ANALYSIS_FALLBACK: &str = "Something went wrong analyzing your drawing.";
pub const CHAT_FALLBACK: &str = "Sorry, something went wrong.";
pub const NO_REPLY: &str = "No reply.";

pub const PNG_MIME_TYPE: &str = "image/png";

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a message: text or inline binary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64, no data-URL prefix.
    pub data: String,
}

/// Response body. Only the fields the client reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ServiceError>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

impl GenerateRequest {
    /// Image analysis: the PNG inline, then the feedback instruction.
    pub fn image_analysis(png: &[u8]) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: PNG_MIME_TYPE.to_string(),
                            data: STANDARD.encode(png),
                        },
                    },
                    Part::Text {
                        text: IMAGE_PROMPT.to_string(),
                    },
                ],
            }],
        }
    }

    /// A single-turn chat message with the tutor suffix appended.
    pub fn chat(message: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::Text {
                    text: chat_prompt(message),
                }],
            }],
        }
    }
}

pub fn chat_prompt(message: &str) -> String {
    format!("{message}{CHAT_PROMPT_SUFFIX}")
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        let content = self.candidates.first()?.content.as_ref()?;
        match content.parts.first()? {
            Part::Text { text } => Some(text.as_str()),
            Part::InlineData { .. } => None,
        }
    }
}

/// Pull the reply text out of a response, or report why there is none.
pub fn extract_reply(response: &GenerateResponse) -> FeedbackResult<String> {
    if let Some(error) = &response.error {
        return Err(FeedbackError::Service {
            status: error.code,
            message: error.message.clone(),
        });
    }
    response
        .first_text()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or(FeedbackError::EmptyReply)
}
