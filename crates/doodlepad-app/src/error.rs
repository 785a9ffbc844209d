//! Application errors.

use doodlepad_render::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid event script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

pub type AppResult<T> = Result<T, AppError>;
