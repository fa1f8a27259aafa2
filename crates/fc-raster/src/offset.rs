use fc_core::{Error, GeometryIssue, Segment};

/// Perpendicular offsets, in pixels, of the `width` lines that make up an
/// averaging band: `k - (width - 1) / 2` for `k = 0..width`.
///
/// Odd widths include the centerline itself; even widths straddle it at
/// half-pixel offsets.
pub fn band_offsets(width: u32) -> impl ExactSizeIterator<Item = f32> {
    let half = (width.saturating_sub(1)) as f32 * 0.5;
    (0..width).map(move |k| k as f32 - half)
}

/// Parallel copies of `segment` spanning a band `width` pixels wide, ordered
/// from the most negative to the most positive perpendicular offset.
///
/// The perpendicular is the normalized `(dy, -dx)` of the segment direction.
/// Every copy keeps the centerline's length and angle. A zero-length segment
/// has no direction, so all copies coincide with it.
pub fn parallel_offsets(segment: &Segment, width: u32) -> Result<Vec<Segment>, Error> {
    if width == 0 {
        return Err(GeometryIssue::ZeroWidth.into());
    }

    let normal = segment.direction().normalize().perp();
    Ok(band_offsets(width)
        .map(|d| {
            if d == 0.0 {
                *segment
            } else {
                segment.translated(normal * d)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use fc_core::{Error, GeometryIssue, Point2f, Segment};

    use super::{band_offsets, parallel_offsets};

    fn seg(x0: f32, y0: f32, x1: f32, y1: f32, width: u32) -> Segment {
        Segment::new(Point2f::new(x0, y0), Point2f::new(x1, y1), width).expect("valid segment")
    }

    #[test]
    fn width_one_is_the_centerline() {
        let s = seg(1.5, 2.0, 17.25, 9.0, 5);
        assert_eq!(parallel_offsets(&s, 1), Ok(vec![s]));
    }

    #[test]
    fn offsets_are_centered_and_unit_spaced() {
        assert_eq!(band_offsets(1).collect::<Vec<_>>(), vec![0.0]);
        assert_eq!(band_offsets(3).collect::<Vec<_>>(), vec![-1.0, 0.0, 1.0]);
        assert_eq!(band_offsets(4).collect::<Vec<_>>(), vec![-1.5, -0.5, 0.5, 1.5]);
    }

    #[test]
    fn horizontal_band_shifts_along_y() {
        let s = seg(10.0, 50.0, 90.0, 50.0, 3);
        let lines = parallel_offsets(&s, 3).expect("valid width");
        assert_eq!(lines.len(), 3);

        // direction (80, 0) -> perpendicular (0, -1)
        let ys: Vec<f32> = lines.iter().map(|l| l.start.y).collect();
        assert_eq!(ys, vec![51.0, 50.0, 49.0]);
        for l in &lines {
            assert_eq!(l.start.x, 10.0);
            assert_eq!(l.end.x, 90.0);
            assert_eq!(l.start.y, l.end.y);
        }
    }

    #[test]
    fn oblique_band_keeps_length_and_angle() {
        let s = seg(3.0, 4.0, 33.0, 44.0, 5);
        let dir = s.direction().normalize();
        for (line, d) in parallel_offsets(&s, 5).expect("valid width").iter().zip([
            -2.0f32, -1.0, 0.0, 1.0, 2.0,
        ]) {
            assert_abs_diff_eq!(line.length(), s.length(), epsilon = 1e-4);
            let shift = line.start - s.start;
            assert_abs_diff_eq!(shift.dot(dir), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(shift.norm(), d.abs(), epsilon = 1e-5);
            assert_abs_diff_eq!((line.end - line.start).normalize().dot(dir), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn zero_width_is_rejected() {
        let s = seg(0.0, 0.0, 1.0, 0.0, 1);
        assert_eq!(
            parallel_offsets(&s, 0),
            Err(Error::InvalidGeometry(GeometryIssue::ZeroWidth))
        );
    }

    #[test]
    fn zero_length_segment_collapses() {
        let s = seg(4.0, 4.0, 4.0, 4.0, 3);
        let lines = parallel_offsets(&s, 3).expect("valid width");
        assert!(lines.iter().all(|l| l.start == s.start && l.end == s.end));
    }
}
