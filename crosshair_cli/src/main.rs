/*!
# Crosshair Tool

Decodes crosshair share codes and previews the primitives the render engine
emits for them.

## Usage

### Decode a share code
```bash
crosshair decode CSGO-kZRSL-TEe5b-GeyVE-48ubk-kcRVP --format json
```

### Render a few frames on a simulated clock
```bash
crosshair render CSGO-kZRSL-TEe5b-GeyVE-48ubk-kcRVP --recoil --frames 10
```

### Live preview until Ctrl+C
```bash
crosshair render --live --scale 1.5
```

### Generate a configuration file
```bash
crosshair config --output crosshair.toml
```
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crosshair_core::{decode, DecodedCrosshair, RenderEngine, RenderMode};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod preview;

use config::AppConfig;
use preview::{FrameFormat, LivePreview, PreviewSettings};

#[derive(Parser)]
#[command(name = "crosshair")]
#[command(about = "Crosshair share-code decoder and render preview")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "crosshair.toml", global = true)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a share code and print it
    Decode {
        /// Share code, e.g. CSGO-XXXXX-XXXXX-XXXXX-XXXXX-XXXXX
        code: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = DecodeFormat::Console)]
        format: DecodeFormat,
    },

    /// Render frames and print the draw primitives
    Render {
        /// Share code; defaults to the one in the config file
        code: Option<String>,

        /// Display scale factor
        #[arg(short, long)]
        scale: Option<f32>,

        /// Which parts of the crosshair to draw (full, main-only, dot-only)
        #[arg(short, long)]
        mode: Option<RenderMode>,

        /// Simulate recoil movement
        #[arg(long)]
        recoil: bool,

        /// Number of frames to render
        #[arg(short = 'n', long)]
        frames: Option<u64>,

        /// Render from the wall clock until Ctrl+C
        #[arg(long)]
        live: bool,

        /// Frame output format
        #[arg(long, value_enum, default_value_t = FrameFormat::Text)]
        output: FrameFormat,
    },

    /// Generate configuration file
    Config {
        /// Output path for configuration file
        #[arg(short, long, default_value = "crosshair.toml")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DecodeFormat {
    /// Game console commands
    Console,
    /// Structured JSON
    Json,
    /// Raw decoded buffer as hex
    Bytes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr to keep stdout clean for exports and frames
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Decode { code, format } => run_decode(&code, format),

        Commands::Render { code, scale, mode, recoil, frames, live, output } => {
            let mut config = AppConfig::load_or_default(&cli.config)?;

            // Command-line flags override the config file
            if code.is_some() {
                config.overlay.share_code = code;
            }
            if let Some(scale) = scale {
                config.overlay.scale_factor = scale;
            }
            if let Some(mode) = mode {
                config.overlay.render_mode = mode;
            }
            if recoil {
                config.overlay.simulate_recoil = true;
            }

            run_render(&config, frames, live, output)
        }

        Commands::Config { output } => generate_config_file(output),
    }
}

fn decode_code(code: &str) -> Result<DecodedCrosshair> {
    decode(code).with_context(|| format!("Failed to decode share code: {}", code))
}

/// Decode a share code and print it in the requested format
fn run_decode(code: &str, format: DecodeFormat) -> Result<()> {
    let decoded = decode_code(code)?;

    if !decoded.checksum_ok() {
        warn!("Checksum byte does not match the payload of {}", code);
    }

    let mut stdout = io::stdout().lock();
    match format {
        DecodeFormat::Console => write!(stdout, "{}", decoded.console_commands())?,
        DecodeFormat::Json => {
            let json = decoded.to_json().context("Failed to serialize crosshair to JSON")?;
            writeln!(stdout, "{}", json)?;
        }
        DecodeFormat::Bytes => writeln!(stdout, "{}", hex::encode(&decoded.raw))?,
    }
    stdout.flush()?;

    Ok(())
}

/// Build an engine from the config and render frames to stdout
fn run_render(
    config: &AppConfig,
    frames: Option<u64>,
    live: bool,
    format: FrameFormat,
) -> Result<()> {
    let overlay = &config.overlay;

    let mut engine = RenderEngine::new();
    engine.set_scale_factor(overlay.scale_factor);
    engine.set_mode(overlay.render_mode);
    engine.set_simulate_recoil(overlay.simulate_recoil);
    engine.set_recoil_params(config.recoil.params());

    match overlay.share_code.as_deref() {
        Some(code) => {
            let decoded = decode_code(code)?;
            info!("🎯 Loaded {} ({})", decoded.share_code, decoded.config.style.display_name());
            engine.set_config(Some(decoded.config));
        }
        None => warn!("No share code given, drawing the fallback dot"),
    }

    let settings = PreviewSettings {
        frames_per_second: config.preview.frames_per_second,
        center_x: overlay.center_x,
        center_y: overlay.center_y,
        channel_capacity: config.preview.channel_capacity,
        format,
    };

    if live {
        info!("🚀 Starting live preview (Ctrl+C to stop)");
        let preview = LivePreview::new(engine, settings, frames);

        // Set up Ctrl+C handler
        let running = preview.get_running_flag();
        ctrlc::set_handler(move || {
            eprintln!("\n🛑 Received Ctrl+C, shutting down gracefully...");
            running.store(false, std::sync::atomic::Ordering::SeqCst);
        })?;

        preview.start().context("Live preview failed")?;
        info!("✅ Preview completed");
    } else {
        let frames = frames.unwrap_or(config.preview.frame_limit);
        let mut stdout = io::stdout().lock();
        preview::render_simulated(&mut engine, &settings, frames, &mut stdout)?;
    }

    Ok(())
}

/// Generate a default configuration file
fn generate_config_file(output_path: PathBuf) -> Result<()> {
    let config = AppConfig::new();
    config.save_to_file(&output_path)?;

    println!("✅ Generated configuration file: {}", output_path.display());
    println!("📝 Edit the file to customize settings, then run:");
    println!("   crosshair --config {} render", output_path.display());

    Ok(())
}
