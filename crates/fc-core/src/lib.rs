//! Foundational primitives for optical contrast measurement on captured
//! images.
//!
//! ## Raster
//! [`Image`] is an owned, immutable width x height buffer; [`ImageView`] is a
//! borrowed read-only view of it. Signed pixel access through
//! [`ImageView::at`] fails with [`Error::OutOfBounds`] instead of clamping.
//!
//! ## Coordinates
//! Integer pixel `(x, y)` has its center at real coordinates `(x, y)`. Real
//! points are quantized with round-half-away-from-zero
//! ([`Point2f::to_pixel`]).
//!
//! ## Colors
//! Raster pixels are [`Rgb8`]; every derived color (means, band averages) is
//! a real-valued [`RgbF`] and is never rounded back to 8 bits.

mod color;
mod error;
mod geom;
mod image;

pub use color::{Channel, Rgb8, RgbAccumulator, RgbF};
pub use error::{Error, GeometryIssue};
pub use geom::{Pixel2i, Point2f, Segment, Vec2f};
pub use image::{Image, ImageView};

/// Captured RGB raster.
pub type RgbImage = Image<Rgb8>;
