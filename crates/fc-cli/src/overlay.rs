use fc_core::{Pixel2i, Point2f};
use fc_raster::{Polygon, rasterize_line};
use fc_session::{ImageSession, parse_hex};
use image::{Rgb, RgbImage};

const BACKGROUND_OUTLINE: Rgb<u8> = Rgb([255, 255, 0]);
const FALLBACK_LINECUT: Rgb<u8> = Rgb([255, 64, 64]);

/// Copies a session raster into an `image` buffer.
pub fn to_rgb_image(session: &ImageSession) -> RgbImage {
    let raster = session.raster();
    let (w, h) = (raster.width() as u32, raster.height() as u32);
    RgbImage::from_fn(w, h, |x, y| {
        let px = raster.data()[y as usize * raster.width() + x as usize];
        Rgb([px.r, px.g, px.b])
    })
}

/// Input image with the background outline and every line cut path drawn on
/// top, each line cut in its palette color.
pub fn render_overlay(session: &ImageSession) -> RgbImage {
    let mut rgb = to_rgb_image(session);

    if let Some(bg) = session.background() {
        draw_polygon(&mut rgb, &bg.polygon, BACKGROUND_OUTLINE);
    }

    for cut in session.linecuts() {
        let color = parse_hex(&cut.color).map_or(FALLBACK_LINECUT, Rgb);
        let segments = cut.measurement.segments();
        for seg in segments {
            draw_path(&mut rgb, seg.start, seg.end, color);
        }
        if let (Some(first), Some(last)) = (segments.first(), segments.last()) {
            draw_dot(&mut rgb, first.start, color);
            draw_dot(&mut rgb, last.end, color);
        }
    }

    rgb
}

fn draw_polygon(img: &mut RgbImage, polygon: &Polygon, color: Rgb<u8>) {
    let v = polygon.vertices();
    for (i, &a) in v.iter().enumerate() {
        draw_path(img, a, v[(i + 1) % v.len()], color);
    }
}

fn draw_path(img: &mut RgbImage, a: Point2f, b: Point2f, color: Rgb<u8>) {
    for px in rasterize_line(a, b) {
        put(img, px, color);
    }
}

fn draw_dot(img: &mut RgbImage, p: Point2f, color: Rgb<u8>) {
    let c = p.to_pixel();
    for dy in -1..=1 {
        for dx in -1..=1 {
            put(img, c + Pixel2i::new(dx, dy), color);
        }
    }
}

fn put(img: &mut RgbImage, px: Pixel2i, color: Rgb<u8>) {
    if px.x < 0 || px.y < 0 {
        return;
    }
    let (ux, uy) = (px.x as u32, px.y as u32);
    if ux >= img.width() || uy >= img.height() {
        return;
    }
    img.put_pixel(ux, uy, color);
}

#[cfg(test)]
mod tests {
    use fc_contrast::ContrastConfig;
    use fc_core::{Image, Point2f, Rgb8};
    use fc_raster::Polygon;
    use fc_session::ImageSession;
    use image::Rgb;

    use super::{BACKGROUND_OUTLINE, render_overlay, to_rgb_image};

    #[test]
    fn copy_preserves_pixels() {
        let raster = Image::from_fn(5, 4, |x, y| Rgb8::new(x as u8, y as u8, 7));
        let session = ImageSession::new(raster, ContrastConfig::default());
        let rgb = to_rgb_image(&session);
        assert_eq!(rgb.dimensions(), (5, 4));
        assert_eq!(*rgb.get_pixel(3, 2), Rgb([3, 2, 7]));
    }

    #[test]
    fn overlay_marks_outline_and_linecut() {
        let mut session =
            ImageSession::new(Image::new_fill(40, 40, Rgb8::new(0, 0, 0)), ContrastConfig::default());
        session
            .set_background(
                Polygon::from_corners(Point2f::new(2.0, 2.0), Point2f::new(12.0, 12.0))
                    .expect("rectangle"),
            )
            .expect("background");
        session
            .add_linecut(&[Point2f::new(5.0, 30.0), Point2f::new(35.0, 30.0)], 1)
            .expect("linecut");

        let rgb = render_overlay(&session);
        assert_eq!(*rgb.get_pixel(7, 2), BACKGROUND_OUTLINE);
        assert_eq!(*rgb.get_pixel(20, 30), Rgb([0xFF, 0x6B, 0x6B]));
        assert_eq!(*rgb.get_pixel(20, 20), Rgb([0, 0, 0]));
    }
}
