//! Per-image annotation state for flake contrast measurements.
//!
//! An [`ImageSession`] owns one captured raster, the background region with
//! its cached mean color, and an ordered list of named line cuts. Setting the
//! background recomputes every line cut (in parallel); changing a line cut's
//! width recomputes only that one. [`DrawingMode`] is the small state
//! machine an interactive front end drives to produce the annotations.

mod mode;
mod palette;
mod session;

pub use mode::{Completed, DrawingMode};
pub use palette::{LINECUT_COLORS, linecut_color, parse_hex};
pub use session::{Background, ImageSession, Linecut, SessionSnapshot};
