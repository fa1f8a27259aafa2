use fc_contrast::{ContrastConfig, ContrastProfile, Measurement};
use fc_core::{Error, Point2f, RgbF, RgbImage};
use fc_raster::{Polygon, average_color};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::mode::Completed;
use crate::palette::linecut_color;

/// Background region together with its cached mean color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub polygon: Polygon,
    pub color: RgbF,
}

/// A measurement with its display name and palette color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linecut {
    pub name: String,
    pub color: String,
    pub measurement: Measurement,
}

impl Linecut {
    pub fn id(&self) -> u32 {
        self.measurement.id()
    }

    pub fn profile(&self) -> Option<&ContrastProfile> {
        self.measurement.profile()
    }
}

/// Serializable state of an [`ImageSession`] without the raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub config: ContrastConfig,
    pub background: Option<Background>,
    #[serde(default)]
    pub linecuts: Vec<Linecut>,
    pub next_id: u32,
}

/// All annotations on one captured image.
///
/// The background color is cached when the region is set. Changing the
/// background recomputes every line cut; changing one line cut's width
/// recomputes only that line cut.
#[derive(Debug, Clone)]
pub struct ImageSession {
    raster: RgbImage,
    config: ContrastConfig,
    background: Option<Background>,
    linecuts: Vec<Linecut>,
    next_id: u32,
}

impl ImageSession {
    pub fn new(raster: RgbImage, config: ContrastConfig) -> Self {
        Self {
            raster,
            config,
            background: None,
            linecuts: Vec::new(),
            next_id: 1,
        }
    }

    pub fn raster(&self) -> &RgbImage {
        &self.raster
    }

    pub fn config(&self) -> &ContrastConfig {
        &self.config
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn background_color(&self) -> Option<RgbF> {
        self.background.as_ref().map(|b| b.color)
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn linecuts(&self) -> &[Linecut] {
        &self.linecuts
    }

    pub fn get(&self, id: u32) -> Result<&Linecut, Error> {
        self.linecuts
            .iter()
            .find(|l| l.id() == id)
            .ok_or(Error::UnknownMeasurement { id })
    }

    /// Replaces the background region and recomputes every line cut.
    ///
    /// If the region has no pixel on the raster the session is left
    /// untouched. A failing recompute leaves the new background in place and
    /// the affected line cuts without a profile.
    pub fn set_background(&mut self, polygon: Polygon) -> Result<RgbF, Error> {
        let color = average_color(&self.raster.as_view(), &polygon)?;
        tracing::info!(
            vertices = polygon.vertices().len(),
            r = color.r,
            g = color.g,
            b = color.b,
            "background set"
        );
        self.background = Some(Background { polygon, color });
        self.recompute_all()?;
        Ok(color)
    }

    /// Adds a line cut through `points` and computes its profile.
    pub fn add_linecut(&mut self, points: &[Point2f], width: u32) -> Result<u32, Error> {
        let background = self.background_color().ok_or(Error::NoBackgroundDefined)?;
        let id = self.next_id;
        let mut measurement = Measurement::from_polyline(id, points, width)?;
        measurement.recompute(&self.raster.as_view(), Some(background), &self.config)?;

        let color = linecut_color((id - 1) as usize);
        self.next_id += 1;
        self.linecuts.push(Linecut {
            name: format!("Linecut {}", self.linecuts.len() + 1),
            color: color.to_string(),
            measurement,
        });
        tracing::info!(id, width, segments = points.len() - 1, "linecut added");
        Ok(id)
    }

    /// Changes the averaging width of one line cut and recomputes it.
    pub fn set_width(&mut self, id: u32, width: u32) -> Result<&ContrastProfile, Error> {
        let background = self.background_color();
        let view = self.raster.as_view();
        let entry = self
            .linecuts
            .iter_mut()
            .find(|l| l.measurement.id() == id)
            .ok_or(Error::UnknownMeasurement { id })?;
        entry.measurement.set_width(width)?;
        tracing::info!(id, width, "linecut width changed");
        entry.measurement.recompute(&view, background, &self.config)
    }

    /// Moves a line cut onto a new path and recomputes it.
    pub fn set_path(&mut self, id: u32, points: &[Point2f]) -> Result<&ContrastProfile, Error> {
        let background = self.background_color();
        let view = self.raster.as_view();
        let entry = self
            .linecuts
            .iter_mut()
            .find(|l| l.measurement.id() == id)
            .ok_or(Error::UnknownMeasurement { id })?;
        entry.measurement.set_polyline(points)?;
        tracing::info!(id, segments = points.len() - 1, "linecut path changed");
        entry.measurement.recompute(&view, background, &self.config)
    }

    /// Removes a line cut and renumbers the remaining names in order.
    pub fn remove(&mut self, id: u32) -> Result<Linecut, Error> {
        let index = self
            .linecuts
            .iter()
            .position(|l| l.id() == id)
            .ok_or(Error::UnknownMeasurement { id })?;
        let removed = self.linecuts.remove(index);
        for (i, l) in self.linecuts.iter_mut().enumerate() {
            l.name = format!("Linecut {}", i + 1);
        }
        tracing::info!(id, remaining = self.linecuts.len(), "linecut removed");
        Ok(removed)
    }

    /// Applies an annotation finished in a [`crate::DrawingMode`].
    pub fn commit(&mut self, completed: Completed) -> Result<(), Error> {
        match completed {
            Completed::Background(polygon) => self.set_background(polygon).map(|_| ()),
            Completed::Linecut { points, width } => self.add_linecut(&points, width).map(|_| ()),
        }
    }

    /// Recomputes all line cuts in parallel against the cached background.
    ///
    /// Every line cut is visited even when some fail, so none keeps a profile
    /// from an earlier background. The first error in list order is returned.
    pub fn recompute_all(&mut self) -> Result<(), Error> {
        if self.linecuts.is_empty() {
            return Ok(());
        }
        let background = self.background_color();
        let view = self.raster.as_view();
        let config = &self.config;
        let results: Vec<Result<(), Error>> = self
            .linecuts
            .par_iter_mut()
            .map(|l| l.measurement.recompute(&view, background, config).map(|_| ()))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if let Some(err) = results.into_iter().find_map(Result::err) {
            tracing::warn!(failed, linecuts = self.linecuts.len(), %err, "recompute failed");
            return Err(err);
        }
        tracing::info!(linecuts = self.linecuts.len(), "recomputed all linecuts");
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            width: self.raster.width(),
            height: self.raster.height(),
            config: self.config.clone(),
            background: self.background.clone(),
            linecuts: self.linecuts.clone(),
            next_id: self.next_id,
        }
    }

    /// Rebuilds a session from a snapshot taken on a raster of the same size.
    /// The background color and all profiles are recomputed from `raster`;
    /// line cuts without a background are rejected.
    pub fn restore(raster: RgbImage, snapshot: SessionSnapshot) -> Result<Self, Error> {
        if raster.width() != snapshot.width || raster.height() != snapshot.height {
            return Err(Error::SizeMismatch {
                expected: snapshot.width.saturating_mul(snapshot.height),
                actual: raster.width() * raster.height(),
            });
        }

        let next_id = snapshot
            .linecuts
            .iter()
            .map(|l| l.id().saturating_add(1))
            .max()
            .unwrap_or(1)
            .max(snapshot.next_id);
        let mut session = Self {
            raster,
            config: snapshot.config,
            background: None,
            linecuts: snapshot.linecuts,
            next_id,
        };
        match snapshot.background {
            Some(bg) => {
                session.set_background(bg.polygon)?;
            }
            None if !session.linecuts.is_empty() => return Err(Error::NoBackgroundDefined),
            None => {}
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use fc_contrast::{ContrastConfig, ZeroBackgroundPolicy};
    use fc_core::{Channel, Error, GeometryIssue, Image, Point2f, Rgb8, RgbF, RgbImage};
    use fc_raster::Polygon;

    use super::{ImageSession, SessionSnapshot};
    use crate::mode::{Completed, DrawingMode};

    /// Left half 200 gray, right half (x >= 50) a flake of (180, 190, 210).
    fn flake_image() -> RgbImage {
        Image::from_fn(100, 60, |x, _| {
            if x < 50 {
                Rgb8::new(200, 200, 200)
            } else {
                Rgb8::new(180, 190, 210)
            }
        })
    }

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Polygon {
        Polygon::from_corners(Point2f::new(x0, y0), Point2f::new(x1, y1)).expect("rectangle")
    }

    fn line(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point2f> {
        vec![Point2f::new(x0, y0), Point2f::new(x1, y1)]
    }

    #[test]
    fn linecut_before_background_is_rejected() {
        let mut s = ImageSession::new(flake_image(), ContrastConfig::default());
        assert_eq!(
            s.add_linecut(&line(60.0, 30.0, 90.0, 30.0), 3),
            Err(Error::NoBackgroundDefined)
        );
        assert!(s.linecuts().is_empty());
    }

    #[test]
    fn background_is_cached_and_linecut_profiled() {
        let mut s = ImageSession::new(flake_image(), ContrastConfig::default());
        let bg = s.set_background(rect(0.0, 0.0, 20.0, 20.0)).expect("background");
        assert_eq!(bg, RgbF::new(200.0, 200.0, 200.0));

        let id = s.add_linecut(&line(60.0, 30.0, 90.0, 30.0), 3).expect("linecut");
        let cut = s.get(id).expect("present");
        assert_eq!(cut.name, "Linecut 1");
        assert_eq!(cut.color, "#FF6B6B");
        let profile = cut.profile().expect("computed");
        assert_eq!(profile.len(), 31);
        for v in profile.channel(Channel::Red) {
            assert_abs_diff_eq!(v, -0.10, epsilon = 1e-12);
        }
        for v in profile.channel(Channel::Blue) {
            assert_abs_diff_eq!(v, 0.05, epsilon = 1e-12);
        }
    }

    #[test]
    fn changing_background_recomputes_every_linecut() {
        let mut s = ImageSession::new(flake_image(), ContrastConfig::default());
        s.set_background(rect(0.0, 0.0, 20.0, 20.0)).expect("background");
        let a = s.add_linecut(&line(60.0, 10.0, 90.0, 10.0), 1).expect("linecut");
        let b = s.add_linecut(&line(10.0, 40.0, 40.0, 40.0), 5).expect("linecut");

        // The flake itself becomes the reference.
        s.set_background(rect(60.0, 0.0, 100.0, 60.0)).expect("background");
        let on_flake = s.get(a).expect("a").profile().expect("recomputed");
        assert!(on_flake.samples.iter().all(|p| p.r == 0.0 && p.g == 0.0 && p.b == 0.0));
        let on_substrate = s.get(b).expect("b").profile().expect("recomputed");
        for v in on_substrate.channel(Channel::Red) {
            assert_abs_diff_eq!(v, 20.0 / 180.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn empty_background_region_keeps_previous_state() {
        let mut s = ImageSession::new(flake_image(), ContrastConfig::default());
        s.set_background(rect(0.0, 0.0, 20.0, 20.0)).expect("background");
        assert_eq!(
            s.set_background(rect(200.0, 200.0, 210.0, 210.0)),
            Err(Error::EmptyRegion)
        );
        assert_eq!(s.background_color(), Some(RgbF::new(200.0, 200.0, 200.0)));
    }

    #[test]
    fn width_change_recomputes_only_that_linecut() {
        let mut s = ImageSession::new(flake_image(), ContrastConfig::default());
        s.set_background(rect(0.0, 0.0, 20.0, 20.0)).expect("background");
        let a = s.add_linecut(&line(60.0, 10.0, 90.0, 10.0), 1).expect("linecut");
        let b = s.add_linecut(&line(60.0, 20.0, 90.0, 20.0), 1).expect("linecut");

        let profile = s.set_width(a, 7).expect("recomputed");
        assert_eq!(profile.len(), 31);
        assert_eq!(s.get(a).expect("a").measurement.width(), 7);
        assert_eq!(s.get(b).expect("b").measurement.width(), 1);
        assert_eq!(
            s.set_width(99, 3).map(|_| ()),
            Err(Error::UnknownMeasurement { id: 99 })
        );
        assert_eq!(
            s.set_width(a, 0).map(|_| ()),
            Err(Error::InvalidGeometry(GeometryIssue::ZeroWidth))
        );
    }

    #[test]
    fn path_change_recomputes_on_new_pixels() {
        let mut s = ImageSession::new(flake_image(), ContrastConfig::default());
        s.set_background(rect(0.0, 0.0, 20.0, 20.0)).expect("background");
        let id = s.add_linecut(&line(10.0, 10.0, 40.0, 10.0), 3).expect("linecut");
        assert!(s.get(id).expect("present").profile().expect("computed").samples.iter().all(|p| p.r == 0.0));

        let profile = s.set_path(id, &line(60.0, 10.0, 70.0, 10.0)).expect("recomputed");
        assert_eq!(profile.len(), 11);
        for v in profile.channel(Channel::Red) {
            assert_abs_diff_eq!(v, -0.10, epsilon = 1e-12);
        }
        assert_eq!(s.get(id).expect("present").measurement.width(), 3);
    }

    #[test]
    fn removal_renumbers_names_and_keeps_colors() {
        let mut s = ImageSession::new(flake_image(), ContrastConfig::default());
        s.set_background(rect(0.0, 0.0, 20.0, 20.0)).expect("background");
        let ids: Vec<u32> = (0..3)
            .map(|i| {
                let y = 10.0 + 10.0 * i as f32;
                s.add_linecut(&line(55.0, y, 95.0, y), 1).expect("linecut")
            })
            .collect();

        let removed = s.remove(ids[0]).expect("present");
        assert_eq!(removed.name, "Linecut 1");
        let names: Vec<&str> = s.linecuts().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Linecut 1", "Linecut 2"]);
        assert_eq!(s.linecuts()[0].color, "#4ECDC4");

        let next = s.add_linecut(&line(55.0, 50.0, 95.0, 50.0), 1).expect("linecut");
        assert_eq!(next, 4);
        assert_eq!(s.get(next).expect("new").name, "Linecut 3");
        assert_eq!(s.get(next).expect("new").color, "#96CEB4");
        assert_eq!(s.remove(ids[0]).map(|_| ()), Err(Error::UnknownMeasurement { id: 1 }));
    }

    #[test]
    fn strict_policy_surfaces_zero_background() {
        let img = Image::from_fn(40, 20, |x, _| {
            if x < 20 {
                Rgb8::new(0, 100, 100)
            } else {
                Rgb8::new(50, 50, 50)
            }
        });
        let cfg = ContrastConfig {
            zero_background: ZeroBackgroundPolicy::Error,
            ..ContrastConfig::default()
        };
        let mut s = ImageSession::new(img, cfg);
        s.set_background(rect(0.0, 0.0, 10.0, 10.0)).expect("background");
        assert_eq!(
            s.add_linecut(&line(22.0, 5.0, 38.0, 5.0), 1),
            Err(Error::DivisionByZero {
                channel: Channel::Red
            })
        );
        assert!(s.linecuts().is_empty());
    }

    #[test]
    fn failed_background_change_clears_every_profile() {
        let img = Image::from_fn(40, 20, |x, _| {
            if x < 20 {
                Rgb8::new(0, 100, 100)
            } else {
                Rgb8::new(50, 50, 50)
            }
        });
        let cfg = ContrastConfig {
            zero_background: ZeroBackgroundPolicy::Error,
            ..ContrastConfig::default()
        };
        let mut s = ImageSession::new(img, cfg);
        s.set_background(rect(30.0, 0.0, 40.0, 10.0)).expect("background");
        for y in [2.0, 6.0, 10.0, 14.0, 18.0] {
            s.add_linecut(&line(22.0, y, 38.0, y), 1).expect("linecut");
        }
        assert!(s.linecuts().iter().all(|l| l.profile().is_some()));

        assert_eq!(
            s.set_background(rect(0.0, 0.0, 10.0, 10.0)),
            Err(Error::DivisionByZero {
                channel: Channel::Red
            })
        );
        assert_eq!(s.background_color(), Some(RgbF::new(0.0, 100.0, 100.0)));
        assert_eq!(s.linecuts().len(), 5);
        assert!(s.linecuts().iter().all(|l| l.profile().is_none()));
    }

    #[test]
    fn drawing_mode_commits_into_session() {
        let mut s = ImageSession::new(flake_image(), ContrastConfig::default());
        let mut mode = DrawingMode::Idle;

        assert_eq!(
            mode.begin_linecut(3, s.has_background()),
            Err(Error::NoBackgroundDefined)
        );

        mode.begin_background().expect("idle");
        mode.push_point(Point2f::new(0.0, 0.0)).expect("drawing");
        mode.push_point(Point2f::new(10.0, 10.0)).expect("drawing");
        s.commit(mode.finish().expect("rectangle")).expect("background");

        mode.begin_linecut(3, s.has_background()).expect("background exists");
        for p in line(60.0, 30.0, 80.0, 30.0) {
            mode.push_point(p).expect("drawing");
        }
        let done = mode.finish().expect("linecut");
        assert!(matches!(done, Completed::Linecut { width: 3, .. }));
        s.commit(done).expect("linecut");
        assert_eq!(s.linecuts().len(), 1);
    }

    #[test]
    fn snapshot_restores_on_same_sized_raster() {
        let mut s = ImageSession::new(flake_image(), ContrastConfig::default());
        s.set_background(rect(0.0, 0.0, 20.0, 20.0)).expect("background");
        s.add_linecut(&line(60.0, 30.0, 90.0, 30.0), 3).expect("linecut");
        s.add_linecut(&[
            Point2f::new(10.0, 50.0),
            Point2f::new(70.0, 50.0),
            Point2f::new(70.0, 5.0),
        ], 2)
        .expect("linecut");

        let json = serde_json::to_string(&s.snapshot()).expect("serialize");
        let snap = serde_json::from_str(&json).expect("deserialize");
        let restored = ImageSession::restore(flake_image(), snap).expect("same size");
        assert_eq!(restored.snapshot(), s.snapshot());

        let snap = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(
            ImageSession::restore(Image::new_fill(10, 10, Rgb8::default()), snap).map(|_| ()),
            Err(Error::SizeMismatch {
                expected: 6000,
                actual: 100
            })
        );
    }

    #[test]
    fn restore_rejects_oversized_snapshot_dimensions() {
        let snap = SessionSnapshot {
            width: usize::MAX,
            height: 3,
            config: ContrastConfig::default(),
            background: None,
            linecuts: Vec::new(),
            next_id: u32::MAX,
        };
        assert_eq!(
            ImageSession::restore(flake_image(), snap).map(|_| ()),
            Err(Error::SizeMismatch {
                expected: usize::MAX,
                actual: 6000
            })
        );
    }
}
