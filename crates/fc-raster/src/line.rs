use fc_core::{Pixel2i, Point2f};

/// Integer Bresenham walk between two pixels, both endpoints included.
///
/// The major axis is the one with the larger absolute delta; every step
/// advances it by one, so the walk yields `max(|dx|, |dy|) + 1` pixels and
/// consecutive pixels are always 8-connected.
#[derive(Debug, Clone)]
pub struct LinePixels {
    major: i64,
    minor: i64,
    major_step: i64,
    minor_step: i64,
    d_major: i64,
    d_minor: i64,
    err: i64,
    steep: bool,
    remaining: usize,
}

impl LinePixels {
    pub fn new(from: Pixel2i, to: Pixel2i) -> Self {
        let (x0, y0) = (i64::from(from.x), i64::from(from.y));
        let (x1, y1) = (i64::from(to.x), i64::from(to.y));
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let steep = dy > dx;

        let (major, minor, d_major, d_minor, major_step, minor_step) = if steep {
            (y0, x0, dy, dx, (y1 - y0).signum(), (x1 - x0).signum())
        } else {
            (x0, y0, dx, dy, (x1 - x0).signum(), (y1 - y0).signum())
        };

        Self {
            major,
            minor,
            major_step,
            minor_step,
            d_major,
            d_minor,
            err: 2 * d_minor - d_major,
            steep,
            remaining: d_major as usize + 1,
        }
    }
}

impl Iterator for LinePixels {
    type Item = Pixel2i;

    fn next(&mut self) -> Option<Pixel2i> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        // Coordinates stay between the two i32 endpoints.
        let px = if self.steep {
            Pixel2i::new(self.minor as i32, self.major as i32)
        } else {
            Pixel2i::new(self.major as i32, self.minor as i32)
        };

        if self.err > 0 {
            self.minor += self.minor_step;
            self.err -= 2 * self.d_major;
        }
        self.err += 2 * self.d_minor;
        self.major += self.major_step;

        Some(px)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for LinePixels {}

/// Pixels along the straight line from `p0` to `p1`, endpoints rounded to the
/// nearest pixel. Coincident endpoints give a single pixel.
pub fn rasterize_line(p0: Point2f, p1: Point2f) -> Vec<Pixel2i> {
    LinePixels::new(p0.to_pixel(), p1.to_pixel()).collect()
}
