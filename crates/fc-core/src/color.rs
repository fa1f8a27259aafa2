use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One 8-bit RGB pixel as stored in a captured raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Real-valued RGB triple. Averages and contrasts are never rounded back to
/// 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RgbF {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RgbF {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut f64 {
        match channel {
            Channel::Red => &mut self.r,
            Channel::Green => &mut self.g,
            Channel::Blue => &mut self.b,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl From<Rgb8> for RgbF {
    fn from(px: Rgb8) -> Self {
        Self {
            r: f64::from(px.r),
            g: f64::from(px.g),
            b: f64::from(px.b),
        }
    }
}

/// Running per-channel sum used to average pixels without intermediate
/// rounding.
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbAccumulator {
    sum: [u64; 3],
    count: u64,
}

impl RgbAccumulator {
    pub fn push(&mut self, px: Rgb8) {
        self.sum[0] += u64::from(px.r);
        self.sum[1] += u64::from(px.g);
        self.sum[2] += u64::from(px.b);
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean color, or `None` when nothing was pushed.
    pub fn mean(&self) -> Option<RgbF> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(RgbF {
            r: self.sum[0] as f64 / n,
            g: self.sum[1] as f64 / n,
            b: self.sum[2] as f64 / n,
        })
    }
}
