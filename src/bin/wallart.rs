use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use wallart::{
    Compositor, CompositorOpts, ContentSource, DominantColorOpts, Raster, WallArtOverlay,
    create_default_region, decode_image, detect_dominant_color, load_source, rgb_to_hex,
    sample_color,
};

#[derive(Parser, Debug)]
#[command(name = "wallart", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a scene's overlays onto its frame and write a PNG.
    Render(RenderArgs),
    /// Print the average color around a pixel.
    Sample(SampleArgs),
    /// Print the dominant color of a percentage rectangle.
    Dominant(DominantArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Brightness multiplier for paint and art.
    #[arg(long, default_value_t = 1.0)]
    brightness: f32,

    /// Warp grid subdivisions per axis.
    #[arg(long, default_value_t = wallart::DEFAULT_SUBDIVISIONS)]
    subdivisions: u32,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Frame image.
    #[arg(long)]
    frame: PathBuf,

    /// Pixel column.
    #[arg(long, allow_hyphen_values = true)]
    x: i64,

    /// Pixel row.
    #[arg(long, allow_hyphen_values = true)]
    y: i64,

    /// Window edge in pixels.
    #[arg(long, default_value_t = wallart::DEFAULT_SAMPLE_SIZE)]
    size: u32,
}

#[derive(Parser, Debug)]
struct DominantArgs {
    /// Frame image.
    #[arg(long)]
    frame: PathBuf,

    /// Left edge, percent of frame width.
    #[arg(long, default_value_t = 0.0)]
    x: f64,

    /// Top edge, percent of frame height.
    #[arg(long, default_value_t = 0.0)]
    y: f64,

    /// Width, percent of frame width.
    #[arg(long, default_value_t = 100.0)]
    width: f64,

    /// Height, percent of frame height.
    #[arg(long, default_value_t = 100.0)]
    height: f64,

    /// Number of k-means clusters.
    #[arg(long, default_value_t = 5)]
    clusters: usize,

    /// Fraction of pixels sampled.
    #[arg(long, default_value_t = 0.1)]
    density: f64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Scene {
    frame: PathBuf,
    #[serde(default)]
    mask: Option<PathBuf>,
    #[serde(default)]
    feather_radius: Option<f32>,
    #[serde(default)]
    timestamp_s: Option<f64>,
    overlays: Vec<WallArtOverlay>,
    #[serde(default)]
    sources: HashMap<String, PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Dominant(args) => cmd_dominant(args),
    }
}

fn read_raster(path: &Path) -> anyhow::Result<Raster> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).with_context(|| format!("decode image '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read scene '{}'", args.in_path.display()))?;
    let scene: Scene = serde_json::from_str(&text)
        .with_context(|| format!("parse scene '{}'", args.in_path.display()))?;
    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));

    let mut frame = read_raster(&root.join(&scene.frame))?;
    let mask = match &scene.mask {
        Some(p) => Some(read_raster(&root.join(p))?),
        None => None,
    };

    let mut sources: HashMap<String, Box<dyn ContentSource>> = HashMap::new();
    for (id, rel) in &scene.sources {
        let path = root.join(rel);
        let source =
            load_source(&path).with_context(|| format!("load source '{}'", path.display()))?;
        sources.insert(id.clone(), source);
    }

    let opts = CompositorOpts::default()
        .with_subdivisions(args.subdivisions)
        .with_brightness(args.brightness)
        .with_feather_radius(scene.feather_radius.unwrap_or(0.0));
    let stats = Compositor::new(opts).render_overlays(
        &mut frame,
        &scene.overlays,
        &sources,
        mask.as_ref(),
        scene.timestamp_s.unwrap_or(0.0),
    )?;
    tracing::info!(
        overlays = stats.overlays_rendered,
        layers = stats.layers_drawn,
        triangles = stats.triangles_drawn,
        "rendered"
    );

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let frame = read_raster(&args.frame)?;
    let color = sample_color(&frame, args.x, args.y, args.size)
        .with_context(|| format!("pixel ({}, {}) is outside the frame", args.x, args.y))?;
    println!("{}", rgb_to_hex(color));
    Ok(())
}

fn cmd_dominant(args: DominantArgs) -> anyhow::Result<()> {
    let frame = read_raster(&args.frame)?;
    let region = create_default_region(args.x, args.y, args.width, args.height);
    let opts = DominantColorOpts::default()
        .with_clusters(args.clusters)
        .with_sample_density(args.density);
    let color =
        detect_dominant_color(&frame, &region, opts).context("region covers no pixels")?;
    println!("{}", rgb_to_hex(color));
    Ok(())
}
