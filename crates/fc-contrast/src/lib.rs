//! Optical contrast profiles along user-drawn line cuts.
//!
//! Pipeline per measurement:
//! - Each segment is rasterized and widened into a band of parallel lines
//!   ([`sample_band`]). Band lines are index-aligned with the centerline and
//!   averaged position by position; off-image samples are skipped.
//! - Each averaged color becomes a per-channel contrast against the
//!   background color ([`contrast_of`]).
//! - Segments are concatenated on one cumulative path-length axis, dropping
//!   the duplicate sample at every shared vertex ([`build_profile`]).
//!
//! A background color is mandatory: profile requests without one fail with
//! [`fc_core::Error::NoBackgroundDefined`].

mod band;
mod config;
mod contrast;
mod profile;

pub use band::{BandSample, sample_band};
pub use config::{Baseline, ContrastConfig, ZeroBackgroundPolicy};
pub use contrast::{Contrast, contrast_of};
pub use profile::{ContrastProfile, ContrastSample, Measurement, build_profile};
