use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use moodblob::schedule::refresh::RefreshSource;
use moodblob::session::sink::write_png;
use moodblob::{
    BlobConfig, BlobSession, Canvas, ColorPalette, FixedRate, PcmTap, PngSequenceSink, Scheduler,
    ShapeProfile, Unpaced, WebSocketBroadcaster, WsOptions,
};

#[derive(Parser, Debug)]
#[command(name = "moodblob", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a PNG sequence, optionally audio-reactive and broadcasting.
    Render(RenderArgs),
    /// List shape profiles and color presets.
    Presets,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Blob config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 400)]
    width: u32,

    #[arg(long, default_value_t = 400)]
    height: u32,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Blob config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to render.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Output directory for the PNG sequence.
    #[arg(long)]
    out_dir: PathBuf,

    /// WAV file used as the audio source for pulsing.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// WebSocket address receiving derived scalars, e.g. ws://127.0.0.1:3000.
    #[arg(long)]
    broadcast: Option<String>,

    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Pace frames in wall-clock time instead of rendering as fast as possible.
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Re-randomize shape, palette and phase seeds with this seed before rendering.
    #[arg(long)]
    randomize: Option<u64>,

    #[arg(long, default_value_t = 400)]
    width: u32,

    #[arg(long, default_value_t = 400)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Presets => cmd_presets(),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BlobConfig> {
    match path {
        Some(p) => BlobConfig::from_path(p).with_context(|| format!("load config '{}'", p.display())),
        None => Ok(BlobConfig::default()),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let canvas = Canvas::new(args.width, args.height)?;
    let session = BlobSession::new(&config, canvas)?;

    let source = Unpaced::new(60.0, Some(args.frame + 1))?;
    let mut sched = Scheduler::new(source, session);
    sched.start()?;
    sched.run(None);
    sched.stop();

    let frame = sched
        .task()
        .last_frame()
        .context("no frame was rendered")?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&args.out, frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let canvas = Canvas::new(args.width, args.height)?;

    let mut session = BlobSession::new(&config, canvas)?
        .with_sink(Box::new(PngSequenceSink::new(&args.out_dir)));
    if let Some(seed) = args.randomize {
        session.rerandomize(seed)?;
    }
    if let Some(url) = &args.broadcast {
        let ws = WebSocketBroadcaster::connect(url, WsOptions::default())?;
        session = session.with_broadcaster(Box::new(ws));
    }
    if let Some(path) = &args.audio {
        let tap = PcmTap::open_wav(path)?;
        session.attach_audio(Some(Box::new(tap)))?;
    }

    tracing::info!(
        frames = args.frames,
        fps = args.fps,
        realtime = args.realtime,
        audio = args.audio.is_some(),
        "rendering"
    );
    let stats = if args.realtime {
        drive(FixedRate::new(args.fps, Some(args.frames))?, session)?
    } else {
        drive(Unpaced::new(args.fps, Some(args.frames))?, session)?
    };

    eprintln!(
        "wrote {} frames to {} ({} skipped)",
        stats.0,
        args.out_dir.display(),
        stats.1
    );
    Ok(())
}

fn drive<S: RefreshSource>(source: S, session: BlobSession) -> anyhow::Result<(u64, u64)> {
    let mut sched = Scheduler::new(source, session);
    sched.start()?;
    let frames = sched.run(None);
    sched.stop();
    sched.task_mut().finish()?;
    Ok((frames, sched.skipped()))
}

fn cmd_presets() -> anyhow::Result<()> {
    println!("shapes:");
    for shape in ShapeProfile::ALL {
        println!("  {shape}");
    }
    println!("color presets:");
    for (name, hexes) in moodblob::palette::presets::COLOR_PRESETS {
        println!("  {name:<10} {}", hexes.join(" "));
    }
    println!(
        "default palette: {}",
        ColorPalette::default_palette()
            .colors()
            .iter()
            .map(|c| c.to_hex())
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(())
}
