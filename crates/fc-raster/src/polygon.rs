use fc_core::{Error, GeometryIssue, ImageView, Pixel2i, Point2f, Rgb8, RgbAccumulator, RgbF};
use serde::{Deserialize, Serialize};

/// Closed simple polygon bounding a background region.
///
/// Membership uses the even-odd rule evaluated at pixel centers with a
/// half-open crossing test, so an axis-aligned square with integer corners
/// `[x0, x1] x [y0, y1]` contains exactly the pixels `x0 <= x < x1`,
/// `y0 <= y < y1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2f>", into = "Vec<Point2f>")]
pub struct Polygon {
    vertices: Vec<Point2f>,
}

impl Polygon {
    pub const MIN_VERTICES: usize = 3;

    pub fn new(vertices: Vec<Point2f>) -> Result<Self, Error> {
        if vertices.len() < Self::MIN_VERTICES {
            return Err(GeometryIssue::TooFewVertices {
                min: Self::MIN_VERTICES,
                actual: vertices.len(),
            }
            .into());
        }
        if vertices.iter().any(|p| !p.is_finite()) {
            return Err(GeometryIssue::NonFiniteCoordinate.into());
        }
        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle from two opposite corners, listed clockwise
    /// from `a`.
    pub fn from_corners(a: Point2f, b: Point2f) -> Result<Self, Error> {
        Self::new(vec![
            Point2f::new(a.x, a.y),
            Point2f::new(b.x, a.y),
            Point2f::new(b.x, b.y),
            Point2f::new(a.x, b.y),
        ])
    }

    pub fn vertices(&self) -> &[Point2f] {
        &self.vertices
    }

    /// Absolute shoelace area.
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let mut twice = 0.0f64;
        for i in 0..n {
            let p = self.vertices[i];
            let q = self.vertices[(i + 1) % n];
            twice += f64::from(p.x) * f64::from(q.y) - f64::from(q.x) * f64::from(p.y);
        }
        0.5 * twice.abs()
    }

    /// Inclusive range of pixel centers that can lie inside the polygon, as
    /// `(min, max)`. Empty when `min` exceeds `max` on either axis.
    pub fn pixel_bounds(&self) -> (Pixel2i, Pixel2i) {
        let mut lo = (f32::INFINITY, f32::INFINITY);
        let mut hi = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in &self.vertices {
            lo = (lo.0.min(p.x), lo.1.min(p.y));
            hi = (hi.0.max(p.x), hi.1.max(p.y));
        }
        (
            Pixel2i::new(lo.0.ceil() as i32, lo.1.ceil() as i32),
            Pixel2i::new(hi.0.floor() as i32, hi.1.floor() as i32),
        )
    }

    /// Even-odd membership of a real point.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (f64::from(self.vertices[i].x), f64::from(self.vertices[i].y));
            let (xj, yj) = (f64::from(self.vertices[j].x), f64::from(self.vertices[j].y));
            if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn contains_pixel(&self, px: Pixel2i) -> bool {
        self.contains(f64::from(px.x), f64::from(px.y))
    }

    /// Interior pixels that lie on a `width`x`height` raster, in row-major
    /// order. The scan covers only the bounding box clipped to the raster.
    pub fn interior_pixels(&self, width: usize, height: usize) -> Vec<Pixel2i> {
        let (lo, hi) = self.clipped_bounds(width, height);
        let mut out = Vec::new();
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let px = Pixel2i::new(x, y);
                if self.contains_pixel(px) {
                    out.push(px);
                }
            }
        }
        out
    }

    fn clipped_bounds(&self, width: usize, height: usize) -> (Pixel2i, Pixel2i) {
        let (lo, hi) = self.pixel_bounds();
        let last = |n: usize| i32::try_from(n).unwrap_or(i32::MAX) - 1;
        (
            Pixel2i::new(lo.x.max(0), lo.y.max(0)),
            Pixel2i::new(hi.x.min(last(width)), hi.y.min(last(height))),
        )
    }
}

impl TryFrom<Vec<Point2f>> for Polygon {
    type Error = Error;

    fn try_from(vertices: Vec<Point2f>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<Point2f> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

/// Mean color of the polygon interior pixels that fall inside `raster`.
///
/// Fails with [`Error::EmptyRegion`] when no interior pixel lies on the
/// raster, e.g. for a zero-area polygon or one entirely off-image.
pub fn average_color(raster: &ImageView<'_, Rgb8>, polygon: &Polygon) -> Result<RgbF, Error> {
    let mut acc = RgbAccumulator::default();
    for px in polygon.interior_pixels(raster.width(), raster.height()) {
        acc.push(raster.at(px)?);
    }

    let mean = acc.mean().ok_or(Error::EmptyRegion)?;
    tracing::debug!(
        pixels = acc.count(),
        r = mean.r,
        g = mean.g,
        b = mean.b,
        "background region averaged"
    );
    Ok(mean)
}
