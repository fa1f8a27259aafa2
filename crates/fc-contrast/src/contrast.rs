use fc_core::{Channel, Error, RgbF};
use serde::{Deserialize, Serialize};

use crate::config::ZeroBackgroundPolicy;

/// Relative per-channel difference `(sample - background) / background`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Contrast {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Contrast {
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }
}

/// Contrast of `sample` against `background`.
///
/// A background channel that is zero or not finite never divides: under
/// [`ZeroBackgroundPolicy::Zero`] that channel's contrast is 0, under
/// [`ZeroBackgroundPolicy::Error`] the call fails with
/// [`Error::DivisionByZero`]. The result is always finite for finite samples.
pub fn contrast_of(
    sample: RgbF,
    background: RgbF,
    policy: ZeroBackgroundPolicy,
) -> Result<Contrast, Error> {
    let channel = |ch: Channel| -> Result<f64, Error> {
        let bg = background.get(ch);
        if bg == 0.0 || !bg.is_finite() {
            return match policy {
                ZeroBackgroundPolicy::Zero => Ok(0.0),
                ZeroBackgroundPolicy::Error => Err(Error::DivisionByZero { channel: ch }),
            };
        }
        Ok((sample.get(ch) - bg) / bg)
    };

    Ok(Contrast {
        r: channel(Channel::Red)?,
        g: channel(Channel::Green)?,
        b: channel(Channel::Blue)?,
    })
}
