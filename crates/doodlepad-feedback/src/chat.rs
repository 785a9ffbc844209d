//! Chat panel model: an ordered conversation with a typing placeholder.

use crate::error::FeedbackResult;
use crate::prompt::ANALYSIS_REQUEST_LINE;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder text shown while a reply is in flight.
pub const TYPING_TEXT: &str = "Typing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Ai,
}

impl ChatRole {
    /// CSS class used by the chat panel.
    pub fn css_class(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Ai => "ai",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    /// True for the typing placeholder.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pending: bool,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            pending: false,
        }
    }
}

/// Chat messages in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Post a user message. Input is trimmed; blank input is ignored and
    /// returns `None`, otherwise the text that should be sent.
    pub fn push_user(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::new(ChatRole::User, text));
        Some(text.to_string())
    }

    /// Post the line that opens a drawing analysis.
    pub fn push_analysis_request(&mut self) {
        self.messages
            .push(ChatMessage::new(ChatRole::User, ANALYSIS_REQUEST_LINE));
    }

    /// Show the typing placeholder and return its id.
    pub fn push_typing(&mut self) -> Uuid {
        let mut placeholder = ChatMessage::new(ChatRole::Ai, TYPING_TEXT);
        placeholder.pending = true;
        let id = placeholder.id;
        self.messages.push(placeholder);
        id
    }

    /// Remove the placeholder `typing` and append the reply.
    pub fn resolve(&mut self, typing: Uuid, reply: impl Into<String>) {
        self.messages.retain(|m| !(m.pending && m.id == typing));
        self.messages.push(ChatMessage::new(ChatRole::Ai, reply));
    }

    pub fn is_waiting(&self) -> bool {
        self.messages.iter().any(|m| m.pending)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Serialize, leaving out any placeholders.
    pub fn to_json(&self) -> FeedbackResult<String> {
        let settled = ChatLog {
            messages: self.messages.iter().filter(|m| !m.pending).cloned().collect(),
        };
        Ok(serde_json::to_string(&settled)?)
    }

    pub fn from_json(json: &str) -> FeedbackResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_input_ignored() {
        let mut log = ChatLog::new();
        assert_eq!(log.push_user("   \n"), None);
        assert!(log.is_empty());
        assert_eq!(log.push_user("  hello "), Some("hello".to_string()));
        assert_eq!(log.messages()[0].text, "hello");
        assert_eq!(log.messages()[0].role, ChatRole::User);
    }

    #[test]
    fn test_typing_replaced_by_reply() {
        let mut log = ChatLog::new();
        log.push_analysis_request();
        let typing = log.push_typing();
        assert!(log.is_waiting());
        assert_eq!(log.messages()[1].text, TYPING_TEXT);

        log.resolve(typing, "Try varying line weight.");
        assert!(!log.is_waiting());
        let texts: Vec<&str> = log.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![ANALYSIS_REQUEST_LINE, "Try varying line weight."]);
    }

    #[test]
    fn test_concurrent_placeholders_resolve_independently() {
        let mut log = ChatLog::new();
        let first = log.push_typing();
        let second = log.push_typing();
        log.resolve(second, "b");
        assert!(log.is_waiting());
        log.resolve(first, "a");
        assert!(!log.is_waiting());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_json_skips_placeholder() {
        let mut log = ChatLog::new();
        log.push_user("hi");
        log.push_typing();

        let restored = ChatLog::from_json(&log.to_json().unwrap()).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.messages()[0], log.messages()[0]);
        assert!(ChatLog::from_json("not json").is_err());
    }

    #[test]
    fn test_role_css_class() {
        assert_eq!(ChatRole::User.css_class(), "user");
        assert_eq!(ChatRole::Ai.css_class(), "ai");
    }
}
