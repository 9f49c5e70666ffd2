use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use engrave::models::{load_settings_file, AppConfig, SettingsOverrides};
use engrave::services::{FileWatcher, PreviewOutcome, PreviewService, PreviewWriter, RenderService};
use laser_dither::Algorithm;

const DEFAULT_LOG_FILTER: &str = "engrave=info,laser_dither=warn";

#[derive(Parser)]
#[command(name = "engrave")]
#[command(about = "Turn photos into laser-ready monochrome bitmaps")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one image to a 1-bit PNG
    Process(ProcessArgs),
    /// Re-render whenever the input image or settings file changes
    Watch {
        /// Input PNG
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// YAML file with laser settings (algorithm, threshold, ...)
        #[arg(short, long)]
        settings: PathBuf,
    },
    /// List available dithering algorithms
    Algorithms,
    /// Print the resolved presets as JSON
    Presets {
        /// Config file (defaults to $ENGRAVE_CONFIG)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ProcessArgs {
    /// Input PNG
    input: PathBuf,

    /// Output PNG file path
    #[arg(short, long)]
    output: PathBuf,

    /// Preset name (see `engrave presets`)
    #[arg(short, long)]
    preset: Option<String>,

    /// Config file (defaults to $ENGRAVE_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dithering algorithm (see `engrave algorithms`)
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Cutoff for the threshold algorithm (0-255)
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<i32>,

    /// Brightness shift (-100 to 100)
    #[arg(short, long, allow_negative_numbers = true)]
    brightness: Option<i32>,

    /// Contrast (-100 to 100)
    #[arg(long, allow_negative_numbers = true)]
    contrast: Option<i32>,

    /// Invert tones (for materials that lighten under the beam)
    #[arg(long)]
    invert: bool,

    /// Downscale factor before dithering (0.1 to 1.0)
    #[arg(long)]
    scale: Option<f32>,

    /// Halftone cell size in pixels
    #[arg(long)]
    grid_size: Option<u32>,

    /// Skip oxipng re-compression
    #[arg(long)]
    no_optimize: bool,
}

impl ProcessArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            algorithm: self.algorithm,
            threshold: self.threshold,
            brightness: self.brightness,
            contrast: self.contrast,
            invert: self.invert,
            scale: self.scale,
            grid_size: self.grid_size,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Process(args)) => run_process_command(args).await,
        Some(Commands::Watch {
            input,
            output,
            settings,
        }) => run_watch_command(input, output, settings).await,
        Some(Commands::Algorithms) => {
            run_algorithms_command();
            Ok(())
        }
        Some(Commands::Presets { config }) => run_presets_command(config),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Initialize tracing; one-shot commands drop timestamps
fn init_tracing(one_shot: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    if one_shot {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// `--config`, else `$ENGRAVE_CONFIG`, else built-in presets.
///
/// An explicit `--config` must load; a broken `$ENGRAVE_CONFIG` only warns.
fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit {
        return Ok(AppConfig::load(&path)?);
    }
    let from_env = std::env::var("ENGRAVE_CONFIG").ok().map(PathBuf::from);
    Ok(AppConfig::load_or_default(from_env.as_deref()))
}

/// Render one image (no watching)
async fn run_process_command(args: ProcessArgs) -> anyhow::Result<()> {
    init_tracing(true);

    let config = load_config(args.config.clone())?;
    let base = config.resolve_preset(args.preset.as_deref())?;
    let settings = args.overrides().apply(base);
    tracing::debug!(?settings, "Resolved settings");

    let optimize = config.optimize && !args.no_optimize;
    let renderer = RenderService::new(optimize);
    let rendered = renderer
        .render_file(&args.input, &args.output, settings.clone())
        .await?;

    println!(
        "Rendered {} ({}x{}, {} bytes, {} algorithm, {:.1}% burn)",
        args.output.display(),
        rendered.width,
        rendered.height,
        rendered.png.len(),
        settings.algorithm,
        rendered.coverage() * 100.0
    );

    Ok(())
}

/// Watch the input and settings file, re-rendering on every change
async fn run_watch_command(
    input: PathBuf,
    output: PathBuf,
    settings_path: PathBuf,
) -> anyhow::Result<()> {
    init_tracing(false);

    // Previews favour turnaround over file size
    let preview = PreviewService::new(false);
    let writer = PreviewWriter::new(&output);
    let watcher = FileWatcher::new(&[input.clone(), settings_path.clone()]);
    if !watcher.is_active() {
        anyhow::bail!(
            "Nothing to watch: neither {} nor {} exists",
            input.display(),
            settings_path.display()
        );
    }
    let mut events = watcher.subscribe();

    tracing::info!(
        input = %input.display(),
        settings = %settings_path.display(),
        output = %output.display(),
        "Watching for changes (Ctrl-C to stop)"
    );
    submit_preview(&preview, &writer, &input, &settings_path);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    tracing::info!(paths = ?event.paths, "Change detected");
                    submit_preview(&preview, &writer, &input, &settings_path);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Change events lagged, re-rendering");
                    submit_preview(&preview, &writer, &input, &settings_path);
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

/// Read the current input and settings and hand them to the preview
/// service. Failures are logged; watch mode keeps running.
fn submit_preview(
    preview: &PreviewService,
    writer: &PreviewWriter,
    input: &Path,
    settings_path: &Path,
) {
    let settings = match load_settings_file(settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(%e, "Settings unusable, waiting for the next change");
            return;
        }
    };
    let bytes = match std::fs::read(input) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(%e, input = %input.display(), "Failed to read input");
            return;
        }
    };

    let pending = preview.submit(Arc::new(bytes), settings);
    let writer = writer.clone();
    tokio::spawn(async move {
        match pending.await {
            Ok(PreviewOutcome::Completed {
                generation,
                output: rendered,
            }) => match writer.write(generation, &rendered.png).await {
                Ok(true) => tracing::info!(
                    generation,
                    output = %writer.path().display(),
                    width = rendered.width,
                    height = rendered.height,
                    "Preview updated"
                ),
                Ok(false) => tracing::debug!(generation, "Newer preview already written"),
                Err(e) => {
                    tracing::warn!(%e, output = %writer.path().display(), "Failed to write preview")
                }
            },
            Ok(PreviewOutcome::Superseded { generation }) => {
                tracing::debug!(generation, "Dropped stale preview");
            }
            Err(e) => tracing::warn!(%e, "Preview render failed"),
        }
    });
}

/// List algorithms with a one-line description
fn run_algorithms_command() {
    println!("Algorithms:");
    for algorithm in Algorithm::ALL {
        println!("  {:<16} {}", algorithm.name(), algorithm.description());
    }
}

/// Print resolved presets as JSON
fn run_presets_command(config: Option<PathBuf>) -> anyhow::Result<()> {
    init_tracing(true);

    let config = load_config(config)?;
    let out = serde_json::json!({
        "default_preset": config.default_preset,
        "optimize": config.optimize,
        "presets": config.resolved_presets(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("ENGRAVE_CONFIG").ok();
    let log_filter = std::env::var("RUST_LOG").ok();

    println!("Engrave v{VERSION}");
    println!("Laser-ready monochrome bitmaps from photos\n");

    println!("Environment Variables:");
    println!(
        "  ENGRAVE_CONFIG = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG       = {}",
        log_filter
            .as_deref()
            .unwrap_or(&format!("{DEFAULT_LOG_FILTER} (default)"))
    );

    let presets = match config_file.as_deref().map(Path::new) {
        Some(path) if path.exists() => format!("{} + built-in", path.display()),
        Some(_) => "built-in (config file not found)".to_string(),
        None => "built-in".to_string(),
    };
    println!("\nPresets: {presets}");

    println!("\nCommands:");
    println!("  engrave process      Render one image to a 1-bit PNG");
    println!("  engrave watch        Re-render on input or settings changes");
    println!("  engrave algorithms   List dithering algorithms");
    println!("  engrave presets      Show presets as JSON");
    println!("\nRun 'engrave --help' for more details.");
}
