//! Doodlepad Render Library
//!
//! CPU raster implementation of the core [`Surface`](doodlepad_core::Surface)
//! and PNG export of its contents.

mod error;
pub mod export;
mod raster;

pub use error::{RenderError, RenderResult};
pub use export::{EXPORT_FILE_NAME, composite_on_background, encode_png, export_png};
pub use raster::RasterSurface;
