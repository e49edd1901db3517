use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use shades_core::{
    AppConfig, AudioFeed, AudioFrame, AudioTrace, EffectKind, Engine, FrameClock, Recorder,
    RecordingSettings, ScriptedAudio, SilentAudio, SyntheticAudio,
};
use tracing_subscriber::EnvFilter;

fn main() -> shades_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for kind in EffectKind::ALL {
                println!("{kind}");
            }
            Ok(())
        }
        Commands::Render(args) => run_render(&args),
        Commands::SynthAudio {
            output,
            bpm,
            duration_ms,
            step_ms,
        } => run_synth_audio(&output, bpm, duration_ms, step_ms),
    }
}

fn run_render(args: &RenderArgs) -> shades_core::Result<()> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let kind: EffectKind = args.effect.parse()?;
    tracing::info!(effect = %kind, duration_ms = args.duration_ms, "rendering");

    let mut feed: Box<dyn AudioFeed> = match (&args.audio, args.bpm) {
        (Some(path), _) => Box::new(ScriptedAudio::new(AudioTrace::load(path)?)),
        (None, Some(bpm)) => Box::new(SyntheticAudio::new(bpm)),
        (None, None) => Box::new(SilentAudio),
    };

    let mut engine = Engine::from_config(&config, kind)?;
    let mut recorder = Recorder::new(RecordingSettings {
        output_path: args.output.to_string_lossy().into_owned(),
        max_frames: args.max_frames,
    });
    recorder.start()?;

    let mut clock = FrameClock::new();
    while clock.now_ms() <= args.duration_ms {
        let now = clock.now_ms();
        let audio = if engine.wants_audio() {
            feed.next_frame(now)
        } else {
            AudioFrame::silent()
        };
        if engine.tick(now, &audio) {
            recorder.capture(now, engine.canvas());
        }
        clock.advance(args.step_ms);
    }

    let frames = recorder.finish()?;
    tracing::info!(
        frames,
        fade_passes = engine.fade_passes(),
        output = ?args.output,
        "render finished"
    );
    Ok(())
}

fn run_synth_audio(
    output: &Path,
    bpm: f32,
    duration_ms: u64,
    step_ms: u64,
) -> shades_core::Result<()> {
    tracing::info!(?output, bpm, duration_ms, "synthesising audio trace");
    let mut feed = SyntheticAudio::new(bpm);
    let trace = AudioTrace::capture(&mut feed, step_ms, duration_ms)?;
    trace.save(output)?;
    tracing::info!(frames = trace.frames.len(), "audio trace written");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Effect engine for RGB LED shades", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every registered effect name.
    List,
    /// Run one effect on a simulated clock and record the frames it draws.
    Render(RenderArgs),
    /// Write a synthetic, tempo-locked audio trace for `render --audio`.
    SynthAudio {
        /// Destination of the JSON trace.
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 120.0)]
        bpm: f32,
        #[arg(long, default_value_t = 10_000)]
        duration_ms: u64,
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        step_ms: u64,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Effect to run, as printed by `list`.
    #[arg(short, long)]
    effect: String,
    /// Optional JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Replay a recorded audio trace.
    #[arg(long, conflicts_with = "bpm")]
    audio: Option<PathBuf>,
    /// Drive audio effects with a synthetic beat at this tempo.
    #[arg(long)]
    bpm: Option<f32>,
    #[arg(long, default_value_t = 5_000)]
    duration_ms: u64,
    /// Simulated time between ticks.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    step_ms: u64,
    /// Stop recording after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,
    /// Where the recorded frames are written.
    #[arg(short, long, default_value = "frames.json")]
    output: PathBuf,
}
