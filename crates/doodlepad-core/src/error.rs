//! Errors raised while interpreting toolbar input.
//!
//! Drawing operations themselves never fail; only the string values coming
//! from UI controls can be malformed.

use thiserror::Error;

/// Toolbar parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid line width: {0}")]
    InvalidWidth(String),
    #[error("Unknown toolbar control: {0}")]
    UnknownControl(String),
}

/// Result type for toolbar parsing.
pub type ParseResult<T> = Result<T, ParseError>;
