//! Doodlepad Application
//!
//! Application shell combining the drawing core, the raster/export layer and
//! the feedback client. Browsers drive it through the `web` bindings; the native
//! binary replays event scripts headlessly.

mod app;
mod error;
pub mod script;

pub use app::{App, AppConfig, connect_feedback, request_analysis, send_chat};
pub use error::{AppError, AppResult};
pub use script::{ReplaySummary, ScriptEvent, load_script, parse_script, replay};

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{CanvasSurface, DrawingBoard, run_wasm};
