//! Overmark Render Library
//!
//! Render-target abstraction for the annotation engine, plus a recording
//! backend (`DisplayList`) used by headless hosts and tests. Real backends
//! (GPU, raster) implement [`RenderSurface`] out of tree.

mod display;
mod surface;

pub use display::{DisplayCommand, DisplayList};
pub use surface::{RenderSurface, StrokeOptions};
