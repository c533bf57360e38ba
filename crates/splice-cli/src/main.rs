use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rhai::Engine;
use serde_json::json;
use splice_core::playback::RealtimeFrames;
use splice_core::preview::{FitMode, PreviewOptions};
use splice_core::scripting::{register_rhai_api, EditorHandle};
use splice_core::{DefaultAssetLoader, EditorConfig, EditorSession};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Rhai script. It must evaluate to an editor.
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// JSON editor configuration used by `new_editor()`
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Play the composition in real time after the script finishes
    #[arg(long)]
    play: bool,

    /// Frame rate for `--play`
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Preview fit mode
    #[arg(long, value_enum, default_value_t = Fit::Contain)]
    fit: Fit,

    /// Preview viewport as WIDTHxHEIGHT, e.g. 1280x720
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<(f32, f32)>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Fit {
    Contain,
    Cover,
    Fill,
}

impl From<Fit> for FitMode {
    fn from(fit: Fit) -> Self {
        match fit {
            Fit::Contain => FitMode::Contain,
            Fit::Cover => FitMode::Cover,
            Fit::Fill => FitMode::Fill,
        }
    }
}

fn parse_viewport(s: &str) -> Result<(f32, f32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w: f32 = w.trim().parse().map_err(|_| format!("bad width '{}'", w))?;
    let h: f32 = h.trim().parse().map_err(|_| format!("bad height '{}'", h))?;
    if w <= 0.0 || h <= 0.0 {
        return Err("viewport must be positive".into());
    }
    Ok((w, h))
}

fn main() {
    let cli = Cli::parse();

    // Initialize Logging
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(cli.log_level).into())
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match cli.log_format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("Script: {:?}", cli.script);

    let config = match &cli.config {
        Some(path) => EditorConfig::from_path(path)
            .with_context(|| format!("Cannot load config {:?}", path))?,
        None => EditorConfig::default().with_env_overrides(),
    };

    let script = fs::read_to_string(&cli.script)
        .with_context(|| format!("Error reading script file {:?}", cli.script))?;

    let mut engine = Engine::new();
    register_rhai_api(&mut engine, Arc::new(DefaultAssetLoader));
    // Scripts calling `new_editor()` pick up the command-line config.
    engine.register_fn("new_editor", move || EditorHandle::new(EditorSession::new(config.clone())));

    let editor = engine
        .eval::<EditorHandle>(&script)
        .map_err(|e| anyhow::anyhow!("Script Error: {}", e))?;
    info!("Script evaluated successfully.");

    let mut session = editor.lock();

    if cli.play {
        let fps = cli.fps.max(1);
        let frames = (session.duration() * fps as f64).ceil() as usize + 2;
        info!(fps, duration = session.duration(), "Playing composition");
        session.seek_to(0.0);
        session.play();
        let outcome = session.run_playback(&mut RealtimeFrames::new(fps).with_limit(frames));
        info!(?outcome, "Playback finished");
    }

    let preview = session.render_preview(&PreviewOptions {
        fit: cli.fit.into(),
        viewport: cli.viewport,
        zoom: None,
    });

    let summary = json!({
        "composition": session.composition(),
        "media": session.media().list(),
        "view": session.view_state(),
        "preview": preview,
        "can_undo": session.can_undo(),
        "can_redo": session.can_redo(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    session.close();
    Ok(())
}
