//! Building blocks of the `flake_contrast` binary: annotation files, result
//! reports and overlay rendering.

pub mod annotations;
pub mod overlay;
pub mod report;
