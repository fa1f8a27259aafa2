use fc_core::{Channel, Error, GeometryIssue, ImageView, Pixel2i, Point2f, Rgb8, RgbF, Segment};
use serde::{Deserialize, Serialize};

use crate::band::sample_band;
use crate::config::{Baseline, ContrastConfig, ZeroBackgroundPolicy};
use crate::contrast::contrast_of;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContrastSample {
    /// Path length in pixels from the start of the measurement.
    pub position: f64,
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ContrastSample {
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    fn get_mut(&mut self, channel: Channel) -> &mut f64 {
        match channel {
            Channel::Red => &mut self.r,
            Channel::Green => &mut self.g,
            Channel::Blue => &mut self.b,
        }
    }
}

/// Contrast samples ordered by strictly increasing position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContrastProfile {
    pub samples: Vec<ContrastSample>,
}

impl ContrastProfile {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn positions(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.position).collect()
    }

    pub fn channel(&self, channel: Channel) -> Vec<f64> {
        self.samples.iter().map(|s| s.get(channel)).collect()
    }

    /// Subtracts the per-channel baseline in place. Empty profiles are left
    /// untouched.
    pub fn apply_baseline(&mut self, baseline: Baseline) {
        let Baseline::TopKMedian { k } = baseline else {
            return;
        };
        if self.samples.is_empty() || k == 0 {
            return;
        }

        for ch in Channel::ALL {
            let mut values = self.channel(ch);
            values.sort_by(|a, b| b.total_cmp(a));
            let top = &values[..k.min(values.len())];
            let offset = median_sorted(top);
            for s in &mut self.samples {
                *s.get_mut(ch) -= offset;
            }
        }
    }
}

fn median_sorted(values: &[f64]) -> f64 {
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    }
}

/// A chained line cut: segment `i` ends exactly where segment `i + 1` starts
/// and all segments share one averaging width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeasurementRecord")]
pub struct Measurement {
    id: u32,
    width: u32,
    segments: Vec<Segment>,
    profile: Option<ContrastProfile>,
}

#[derive(Deserialize)]
struct MeasurementRecord {
    id: u32,
    width: u32,
    segments: Vec<Segment>,
    #[serde(default)]
    profile: Option<ContrastProfile>,
}

impl TryFrom<MeasurementRecord> for Measurement {
    type Error = Error;

    fn try_from(rec: MeasurementRecord) -> Result<Self, Self::Error> {
        let mut m = Self::new(rec.id, rec.segments)?;
        if m.width != rec.width {
            return Err(GeometryIssue::MixedWidths.into());
        }
        m.profile = rec.profile;
        Ok(m)
    }
}

impl Measurement {
    pub fn new(id: u32, segments: Vec<Segment>) -> Result<Self, Error> {
        let first = segments.first().ok_or(GeometryIssue::EmptyMeasurement)?;
        let width = first.width;
        if width == 0 {
            return Err(GeometryIssue::ZeroWidth.into());
        }

        for (i, seg) in segments.iter().enumerate() {
            if !seg.start.is_finite() || !seg.end.is_finite() {
                return Err(GeometryIssue::NonFiniteCoordinate.into());
            }
            if seg.width != width {
                return Err(GeometryIssue::MixedWidths.into());
            }
            if i > 0 && segments[i - 1].end != seg.start {
                return Err(GeometryIssue::NotChained { index: i }.into());
            }
        }

        Ok(Self {
            id,
            width,
            segments,
            profile: None,
        })
    }

    /// Chains consecutive `points` into segments of the given width.
    pub fn from_polyline(id: u32, points: &[Point2f], width: u32) -> Result<Self, Error> {
        if points.len() < 2 {
            return Err(GeometryIssue::TooFewVertices {
                min: 2,
                actual: points.len(),
            }
            .into());
        }
        let segments = points
            .windows(2)
            .map(|w| Segment::new(w[0], w[1], width))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(id, segments)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn profile(&self) -> Option<&ContrastProfile> {
        self.profile.as_ref()
    }

    /// Changes the averaging width of every segment. The stored profile is
    /// discarded and must be recomputed.
    pub fn set_width(&mut self, width: u32) -> Result<(), Error> {
        if width == 0 {
            return Err(GeometryIssue::ZeroWidth.into());
        }
        self.width = width;
        for seg in &mut self.segments {
            seg.width = width;
        }
        self.profile = None;
        Ok(())
    }

    /// Replaces the path, keeping id and width. The stored profile is
    /// discarded. On error the measurement is left unchanged.
    pub fn set_polyline(&mut self, points: &[Point2f]) -> Result<(), Error> {
        let replaced = Self::from_polyline(self.id, points, self.width)?;
        self.segments = replaced.segments;
        self.profile = None;
        Ok(())
    }

    /// Rebuilds and stores the profile.
    pub fn recompute(
        &mut self,
        raster: &ImageView<'_, Rgb8>,
        background: Option<RgbF>,
        cfg: &ContrastConfig,
    ) -> Result<&ContrastProfile, Error> {
        self.profile = None;
        let profile = build_profile(self, raster, background, cfg)?;
        Ok(&*self.profile.insert(profile))
    }
}

/// Contrast profile along all segments of `measurement` against `background`.
///
/// Positions are cumulative pixel-space path lengths: each segment
/// contributes the distance between its rounded endpoints. The first sample
/// of a segment that lands on the pixel just emitted by the previous segment
/// (the shared vertex) is dropped, so positions are strictly increasing.
pub fn build_profile(
    measurement: &Measurement,
    raster: &ImageView<'_, Rgb8>,
    background: Option<RgbF>,
    cfg: &ContrastConfig,
) -> Result<ContrastProfile, Error> {
    let background = background.ok_or(Error::NoBackgroundDefined)?;
    if cfg.zero_background == ZeroBackgroundPolicy::Zero {
        for ch in Channel::ALL {
            let v = background.get(ch);
            if v == 0.0 || !v.is_finite() {
                tracing::warn!(%ch, value = v, "background channel unusable, contrast reported as 0");
            }
        }
    }

    let mut samples = Vec::new();
    let mut base = 0.0f64;
    let mut last_pixel: Option<Pixel2i> = None;
    let mut junction_drops = 0usize;

    for seg in &measurement.segments {
        let first = seg.start.to_pixel();
        for s in sample_band(raster, seg)? {
            if s.index == 0 && last_pixel == Some(s.pixel) {
                junction_drops += 1;
                continue;
            }
            let c = contrast_of(s.color, background, cfg.zero_background)?;
            samples.push(ContrastSample {
                position: base + first.distance(s.pixel),
                r: c.r,
                g: c.g,
                b: c.b,
            });
            last_pixel = Some(s.pixel);
        }
        base += first.distance(seg.end.to_pixel());
    }

    let mut profile = ContrastProfile { samples };
    profile.apply_baseline(cfg.baseline);

    tracing::debug!(
        id = measurement.id,
        segments = measurement.segments.len(),
        width = measurement.width,
        samples = profile.len(),
        junction_drops,
        path_len = base,
        "built contrast profile"
    );
    Ok(profile)
}
