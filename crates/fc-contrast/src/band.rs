use fc_core::{Error, ImageView, Pixel2i, Rgb8, RgbAccumulator, RgbF, Segment};
use fc_raster::{parallel_offsets, rasterize_line};

/// Band-averaged color at one centerline pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSample {
    /// Index along the centerline pixel path.
    pub index: usize,
    /// Centerline pixel.
    pub pixel: Pixel2i,
    pub color: RgbF,
    /// Number of band lines that landed on the raster at this index.
    pub lines: u32,
}

/// Averages the `segment.width` parallel band lines position by position.
///
/// Lines are index-aligned, not resampled by distance: each band line is the
/// centerline pixel path translated by the integer shift between its rounded
/// start and the centerline's rounded start, so all lines have exactly the
/// centerline's pixel count. Samples that fall off the raster are left out
/// of that position's average; a position with no sample on the raster is
/// omitted from the output.
pub fn sample_band(raster: &ImageView<'_, Rgb8>, segment: &Segment) -> Result<Vec<BandSample>, Error> {
    let center = rasterize_line(segment.start, segment.end);
    let origin = segment.start.to_pixel();
    let shifts: Vec<Pixel2i> = parallel_offsets(segment, segment.width)?
        .iter()
        .map(|line| line.start.to_pixel() - origin)
        .collect();

    let mut out = Vec::with_capacity(center.len());
    for (index, &pixel) in center.iter().enumerate() {
        let mut acc = RgbAccumulator::default();
        for &shift in &shifts {
            let px = pixel + shift;
            if raster.contains(px) {
                acc.push(raster.at(px)?);
            }
        }

        if let Some(color) = acc.mean() {
            out.push(BandSample {
                index,
                pixel,
                color,
                lines: acc.count() as u32,
            });
        }
    }

    let dropped = center.len() - out.len();
    if dropped > 0 {
        tracing::warn!(
            dropped,
            total = center.len(),
            "band positions entirely outside the raster were dropped"
        );
    }
    tracing::debug!(
        pixels = center.len(),
        lines = shifts.len(),
        "sampled band along segment"
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use fc_core::{Image, Pixel2i, Point2f, Rgb8, RgbF, Segment};

    use super::sample_band;

    fn seg(x0: f32, y0: f32, x1: f32, y1: f32, width: u32) -> Segment {
        Segment::new(Point2f::new(x0, y0), Point2f::new(x1, y1), width).expect("valid segment")
    }

    #[test]
    fn width_one_reads_centerline_pixels() {
        let img = Image::from_fn(8, 8, |x, y| Rgb8::new(x as u8, y as u8, 0));
        let out = sample_band(&img.as_view(), &seg(1.0, 2.0, 5.0, 2.0, 1)).expect("in bounds");
        assert_eq!(out.len(), 5);
        for (i, s) in out.iter().enumerate() {
            assert_eq!(s.index, i);
            assert_eq!(s.pixel, Pixel2i::new(1 + i as i32, 2));
            assert_eq!(s.color, RgbF::new(1.0 + i as f64, 2.0, 0.0));
            assert_eq!(s.lines, 1);
        }
    }

    #[test]
    fn horizontal_band_averages_rows() {
        // Row y holds value 10 * y, so a 3-wide band around y=4 averages 30, 40, 50.
        let img = Image::from_fn(10, 10, |_, y| Rgb8::new(10 * y as u8, 0, 255));
        let out = sample_band(&img.as_view(), &seg(2.0, 4.0, 7.0, 4.0, 3)).expect("in bounds");
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|s| s.color == RgbF::new(40.0, 0.0, 255.0) && s.lines == 3));
    }

    #[test]
    fn offimage_band_lines_are_excluded_not_zeroed() {
        // Centerline on row 0: the band row above is off-image.
        let img = Image::from_fn(6, 3, |_, y| Rgb8::new(if y == 0 { 100 } else { 200 }, 0, 0));
        let out = sample_band(&img.as_view(), &seg(0.0, 0.0, 5.0, 0.0, 3)).expect("in bounds");
        assert_eq!(out.len(), 6);
        for s in &out {
            assert_eq!(s.lines, 2);
            assert_eq!(s.color.r, 150.0);
        }
    }

    #[test]
    fn positions_fully_offimage_are_dropped() {
        let img = Image::new_fill(5, 5, Rgb8::new(9, 9, 9));
        let out = sample_band(&img.as_view(), &seg(-3.0, 2.0, 3.0, 2.0, 1)).expect("no error");
        let xs: Vec<i32> = out.iter().map(|s| s.pixel.x).collect();
        assert_eq!(xs, vec![0, 1, 2, 3]);
        assert_eq!(out[0].index, 3);
    }

    #[test]
    fn oblique_band_lines_share_centerline_length() {
        let img = Image::new_fill(64, 64, Rgb8::new(50, 60, 70));
        let s = seg(10.3, 12.7, 47.9, 31.2, 6);
        let out = sample_band(&img.as_view(), &s).expect("in bounds");
        let (a, b) = (s.start.to_pixel(), s.end.to_pixel());
        let expected = (b.x - a.x).abs().max((b.y - a.y).abs()) as usize + 1;
        assert_eq!(out.len(), expected);
        assert!(out.iter().all(|p| p.lines == 6));
    }
}
