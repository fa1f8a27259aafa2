use serde::{Deserialize, Serialize};

/// What to do when a background channel is exactly zero (or not finite).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroBackgroundPolicy {
    /// Report contrast 0 for that channel.
    #[default]
    Zero,
    /// Fail with [`fc_core::Error::DivisionByZero`].
    Error,
}

/// Per-channel offset applied to a finished profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Baseline {
    #[default]
    None,
    /// Subtract the median of the `k` largest values of each channel, which
    /// pins the brightest stretch of the cut (usually bare substrate) to 0.
    TopKMedian { k: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    pub zero_background: ZeroBackgroundPolicy,
    pub baseline: Baseline,
}
