//! Example: contrast profile along a single line cut.
//!
//! Loads an RGB image, averages a rectangular background region given by two
//! corners, and prints the per-channel contrast along a straight cut. When no
//! image is given, a synthetic 200x120 substrate with a darker flake stripe is
//! used instead.
//!
//! Run from the workspace root:
//!   cargo run -p flake-contrast --example linecut -- --help
//!   cargo run -p flake-contrast --example linecut -- --width 5 --percent

use anyhow::{Context, Result};
use clap::Parser;
use flake_contrast::{ContrastConfig, Image, ImageSession, Point2f, Polygon, Rgb8, RgbImage};
use serde::Serialize;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Print the contrast profile along one line cut")]
struct Args {
    /// Input PNG/JPEG (default: synthetic flake image)
    #[arg(long)]
    input: Option<String>,

    /// Background rectangle as x0,y0,x1,y1
    #[arg(long, value_delimiter = ',', num_args = 4, default_values_t = [5.0, 5.0, 45.0, 30.0])]
    background: Vec<f32>,

    /// Line cut as x0,y0,x1,y1
    #[arg(long, value_delimiter = ',', num_args = 4, default_values_t = [20.0, 90.0, 180.0, 40.0])]
    cut: Vec<f32>,

    /// Averaging width in pixels
    #[arg(long, default_value_t = 3)]
    width: u32,

    /// Report contrast in percent
    #[arg(long)]
    percent: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Row {
    position: f64,
    r: f64,
    g: f64,
    b: f64,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn synthetic() -> RgbImage {
    Image::from_fn(200, 120, |x, y| {
        let on_flake = (x as i64 - 2 * y as i64).abs() < 40 && x > 60;
        if on_flake {
            Rgb8::new(150, 165, 190)
        } else {
            Rgb8::new(196, 188, 201)
        }
    })
}

fn load(path: &str) -> Result<RgbImage> {
    let rgb = image::open(path)
        .with_context(|| format!("opening {path}"))?
        .into_rgb8();
    let (w, h) = rgb.dimensions();
    RgbImage::from_rgb_bytes(w as usize, h as usize, rgb.as_raw())
        .with_context(|| format!("converting {path}"))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let raster = match &args.input {
        Some(path) => load(path)?,
        None => synthetic(),
    };
    println!("raster: {}x{}", raster.width(), raster.height());

    let mut session = ImageSession::new(raster, ContrastConfig::default());
    let bg = &args.background;
    let color = session.set_background(Polygon::from_corners(
        Point2f::new(bg[0], bg[1]),
        Point2f::new(bg[2], bg[3]),
    )?)?;
    println!("background: ({:.2}, {:.2}, {:.2})", color.r, color.g, color.b);

    let cut = &args.cut;
    let id = session.add_linecut(
        &[Point2f::new(cut[0], cut[1]), Point2f::new(cut[2], cut[3])],
        args.width,
    )?;
    let linecut = session.get(id)?;
    let profile = linecut.profile().context("profile not computed")?;

    let scale = if args.percent { 100.0 } else { 1.0 };
    let rows: Vec<Row> = profile
        .samples
        .iter()
        .map(|s| Row {
            position: s.position,
            r: s.r * scale,
            g: s.g * scale,
            b: s.b * scale,
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{} ({}), {} samples", linecut.name, linecut.color, rows.len());
        for row in &rows {
            println!(
                "{:8.2}  {:+9.4}  {:+9.4}  {:+9.4}",
                row.position, row.r, row.g, row.b
            );
        }
    }

    Ok(())
}
