use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use fc_cli::annotations::Annotations;
use fc_cli::overlay::render_overlay;
use fc_cli::report::{Scale, background_dto, csv_name, summarize, write_profile_csv};
use fc_core::RgbImage;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "flake_contrast")]
#[command(about = "Measure optical contrast of 2D-material flakes against the substrate")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Average the background region only
    #[command(name = "background")]
    Background(CommonArgs),
    /// Background plus one contrast profile per line cut
    #[command(name = "profile")]
    Profile(ProfileArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Captured image (PNG or JPEG)
    #[arg(long, required = true)]
    image: PathBuf,
    /// Annotation JSON with background region, line cuts and config
    #[arg(long, required = true)]
    annotations: PathBuf,
    #[arg(long, default_value = "out")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct ProfileArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Report contrast in percent instead of as a fraction
    #[arg(long)]
    percent: bool,
    /// Skip writing overlay.png
    #[arg(long)]
    no_overlay: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Background(args) => run_background(args),
        Command::Profile(args) => run_profile(args),
    }
}

fn run_background(args: CommonArgs) -> Result<()> {
    let (out_dir, annotations) = prepare_run(&args)?;
    let Some(region) = &annotations.background else {
        bail!(
            "annotation file {} has no background region.",
            args.annotations.display()
        );
    };
    let raster = load_input(&args.image)?;

    let only_background = Annotations {
        background: Some(region.clone()),
        linecuts: Vec::new(),
        config: annotations.config.clone(),
    };
    let session = only_background
        .apply(raster)
        .context("averaging background region")?;
    let dto = background_dto(&session).context("background missing after averaging")?;

    println!(
        "background: ({:.3}, {:.3}, {:.3}) over {} vertices",
        dto.color.r, dto.color.g, dto.color.b, dto.vertices
    );
    write_json(out_dir.join("background.json"), &dto)
}

fn run_profile(args: ProfileArgs) -> Result<()> {
    let (out_dir, annotations) = prepare_run(&args.common)?;
    let raster = load_input(&args.common.image)?;
    let scale = if args.percent {
        Scale::Percent
    } else {
        Scale::Fraction
    };

    let session = annotations
        .apply(raster)
        .context("building measurements from annotations")?;

    for (i, cut) in session.linecuts().iter().enumerate() {
        let Some(profile) = cut.profile() else {
            bail!("{} has no computed profile.", cut.name);
        };
        let path = out_dir.join(csv_name(i));
        let file =
            fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        write_profile_csv(BufWriter::new(file), profile, scale)
            .with_context(|| format!("writing csv {}", path.display()))?;
        println!("{}: {} samples -> {}", cut.name, profile.len(), path.display());
    }

    write_json(out_dir.join("session.json"), &session.snapshot())?;
    write_json(out_dir.join("meta.json"), &summarize(&session, scale))?;

    if !args.no_overlay {
        let path = out_dir.join("overlay.png");
        render_overlay(&session)
            .save(&path)
            .with_context(|| format!("saving image {}", path.display()))?;
    }

    tracing::info!(
        linecuts = session.linecuts().len(),
        out = %out_dir.display(),
        "profile run finished"
    );
    Ok(())
}

fn prepare_run(common: &CommonArgs) -> Result<(PathBuf, Annotations)> {
    ensure_file_exists(&common.image, "image")?;
    ensure_file_exists(&common.annotations, "annotations")?;

    let annotations: Annotations = read_json(&common.annotations).with_context(|| {
        format!(
            "reading annotations json at {}",
            common.annotations.display()
        )
    })?;

    fs::create_dir_all(&common.out)
        .with_context(|| format!("creating output directory {}", common.out.display()))?;

    Ok((common.out.clone(), annotations))
}

fn load_input(path: &Path) -> Result<RgbImage> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgb = dyn_img.to_rgb8();
    let (w, h) = rgb.dimensions();

    RgbImage::from_rgb_bytes(w as usize, h as usize, rgb.as_raw())
        .with_context(|| format!("constructing raster from {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
