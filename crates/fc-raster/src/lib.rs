//! Discrete sampling geometry for line cuts and background regions.
//!
//! - [`rasterize_line`] walks a segment pixel by pixel (integer Bresenham).
//!   Output is gap-free in 8-connectivity and always includes both rounded
//!   endpoints.
//! - [`parallel_offsets`] spans a segment's averaging width with unit-spaced
//!   parallel copies centered on it.
//! - [`Polygon`] tests pixel-center membership with the even-odd rule and
//!   [`average_color`] reduces its interior to one real-valued color.

mod line;
mod offset;
mod polygon;

pub use line::{LinePixels, rasterize_line};
pub use offset::{band_offsets, parallel_offsets};
pub use polygon::{Polygon, average_color};
