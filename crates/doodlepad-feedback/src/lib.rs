//! Doodlepad Feedback Library
//!
//! Client for the generative model that critiques drawings and answers chat
//! questions, plus the chat panel model.

pub mod chat;
mod client;
pub mod config;
mod error;
pub mod prompt;

pub use chat::{ChatLog, ChatMessage, ChatRole};
pub use client::FeedbackClient;
pub use config::FeedbackConfig;
pub use error::{FeedbackError, FeedbackResult};
