//! Umbrella crate for the `flake-contrast` workspace.
//!
//! Re-exports the raster primitives, the line/offset/polygon rasterizers, the
//! contrast engine and the per-image session model, so applications can
//! depend on a single crate.

pub use fc_contrast::*;
pub use fc_core::*;
pub use fc_raster::*;
pub use fc_session::*;
