use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use motion_overlay::{
    ExportPipeline, FrameIndex, FrameStore as _, InMemoryFrameStore, LogProgress, OverlayConfig,
    OverlayError, PngSequenceSink, RegionKind, Simulation, Stroke, ThreadYield, Vec2,
};

#[derive(Parser, Debug)]
#[command(name = "motion-overlay", version)]
struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every background frame with the overlay and write an animated GIF.
    Export(ExportArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the containment region derived from a stroke as JSON.
    Region(RegionArgs),
}

#[derive(Args, Debug)]
struct OverlayArgs {
    /// Background animation (GIF) or still image.
    #[arg(long)]
    background: PathBuf,

    /// Overlay config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stroke JSON (`[{"x": .., "y": ..}, ..]`) confining the particles.
    #[arg(long)]
    stroke: Option<PathBuf>,

    /// Region shape derived from the stroke; overrides the config.
    #[arg(long, value_enum)]
    region: Option<RegionArg>,

    /// RNG seed; overrides the config.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    overlay: OverlayArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Gif)]
    format: ExportFormat,

    /// Output GIF path, or output directory for `png-seq`.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormat {
    /// One infinitely looping animated GIF.
    Gif,
    /// Numbered `frame-NNNN.png` files.
    PngSeq,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    overlay: OverlayArgs,

    /// Frame index (0-based). The simulation is stepped through every frame up to it.
    #[arg(long)]
    index: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RegionArgs {
    /// Stroke JSON.
    #[arg(long)]
    stroke: PathBuf,

    #[arg(long, value_enum, default_value_t = RegionArg::Circle)]
    region: RegionArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RegionArg {
    Circle,
    Polygon,
}

impl From<RegionArg> for RegionKind {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::Circle => RegionKind::Circle,
            RegionArg::Polygon => RegionKind::Polygon,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Region(args) => cmd_region(args),
    }
}

struct Prepared {
    cfg: OverlayConfig,
    store: InMemoryFrameStore,
    sim: Simulation,
}

fn prepare(args: &OverlayArgs) -> anyhow::Result<Prepared> {
    let mut cfg = match &args.config {
        Some(path) => OverlayConfig::from_json_path(path)?,
        None => OverlayConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(region) = args.region {
        cfg.region = region.into();
    }

    let store = motion_overlay::load_background(&args.background)?;
    let mut sim = cfg.new_simulation();
    sim.initialize(store.dimensions(), cfg.simulation_settings())?;

    if let Some(path) = &args.stroke {
        let stroke = read_stroke(path)?;
        match motion_overlay::derive_with(&stroke, cfg.region) {
            Ok(region) => sim.install_region(Some(region)),
            Err(OverlayError::InsufficientPoints(msg)) => {
                tracing::warn!(%msg, "stroke ignored");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Prepared { cfg, store, sim })
}

fn read_stroke(path: &Path) -> anyhow::Result<Stroke> {
    let f = std::fs::File::open(path)
        .with_context(|| format!("open stroke JSON '{}'", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse stroke JSON '{}'", path.display()))
}

fn create_parent_dir(out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let Prepared {
        cfg,
        store,
        mut sim,
    } = prepare(&args.overlay)?;

    let mut pipeline = ExportPipeline::new(cfg.export_opts());
    match args.format {
        ExportFormat::Gif => {
            let gif = pipeline.export_gif(
                &store,
                &mut sim,
                &cfg.blend,
                cfg.gif_opts(),
                &mut LogProgress,
                &mut ThreadYield,
            )?;

            create_parent_dir(&args.out)?;
            std::fs::write(&args.out, &gif)
                .with_context(|| format!("write gif '{}'", args.out.display()))?;
            eprintln!("wrote {}", args.out.display());
        }
        ExportFormat::PngSeq => {
            let mut sink = PngSequenceSink::new();
            pipeline.export(
                &store,
                &mut sim,
                &cfg.blend,
                &mut sink,
                &mut LogProgress,
                &mut ThreadYield,
            )?;

            let written = sink.write_to_dir(&args.out)?;
            eprintln!("wrote {} frames to {}", written.len(), args.out.display());
        }
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let Prepared {
        cfg,
        store,
        mut sim,
    } = prepare(&args.overlay)?;

    let index = FrameIndex(args.index);
    let background = store.frame(index)?;
    for _ in 0..=args.index {
        sim.step()?;
    }
    let visual = sim.render(index)?;
    let frame = motion_overlay::composite(background, &visual, Vec2::ZERO, &cfg.blend)?;

    create_parent_dir(&args.out)?;
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

fn cmd_region(args: RegionArgs) -> anyhow::Result<()> {
    let stroke = read_stroke(&args.stroke)?;
    let region = motion_overlay::derive_with(&stroke, args.region.into())?;
    let json = serde_json::to_string_pretty(&region).context("serialize region")?;
    println!("{json}");
    Ok(())
}
