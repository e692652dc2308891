#![deny(unsafe_code)]
//! CLI binary for the textswarm particle field.
//!
//! Subcommands:
//! - `render [text]`: run a swarm N ticks, optionally resize mid-run, write PNG
//! - `sample [text]`: rasterize text and report the target field
//! - `params`: print the configuration schema

mod error;

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use textswarm_core::{
    bounds, rasterize, BlockSurface, CanvasSize, DVec2, FieldConfig, Mode, ResizeOutcome, Scene,
    SwarmField, TextSurface, Xorshift64,
};
use textswarm_render::snapshot::write_png;
use textswarm_render::RenderStyle;
use textswarm_text::CosmicSurface;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Simulated milliseconds between ticks.
const FRAME_MS: u64 = 16;

#[derive(Parser)]
#[command(name = "textswarm", about = "Text-to-particle field renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Draw glyphs as solid blocks instead of loading system fonts.
    #[arg(long, global = true)]
    block_glyphs: bool,

    /// Preferred font family (falls back to sans-serif).
    #[arg(long, global = true)]
    font: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Ordered,
    Chaotic,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Ordered => Mode::Ordered,
            ModeArg::Chaotic => Mode::Chaotic,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run a swarm for N ticks and write a PNG snapshot.
    Render {
        /// Text the particles form.
        #[arg(default_value = textswarm_core::scene::DEFAULT_TEXT)]
        text: String,

        /// Layout width in CSS pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: usize,

        /// Layout height in CSS pixels.
        #[arg(short = 'H', long, default_value_t = 400)]
        height: usize,

        /// Device pixels per layout pixel.
        #[arg(long, default_value_t = 1.0)]
        pixel_ratio: f64,

        /// Number of ticks.
        #[arg(short, long, default_value_t = 120)]
        steps: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(short, long, value_enum, default_value = "ordered")]
        mode: ModeArg,

        /// Pointer position in layout pixels, as "x,y".
        #[arg(long)]
        pointer: Option<String>,

        /// Resize the layout to "WxH" during the run.
        #[arg(long)]
        resize_to: Option<String>,

        /// Tick at which the resize event arrives.
        #[arg(long, default_value_t = 0)]
        resize_at: usize,

        /// Read the scene from a JSON file instead of the flags above.
        #[arg(long)]
        scene: Option<PathBuf>,

        /// Output file path.
        #[arg(short, long, default_value = "swarm.png")]
        output: PathBuf,

        /// Field parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Rasterize text and report its target field.
    Sample {
        #[arg(default_value = textswarm_core::scene::DEFAULT_TEXT)]
        text: String,

        /// Device width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: usize,

        /// Device height in pixels.
        #[arg(short = 'H', long, default_value_t = 400)]
        height: usize,

        /// Field parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Print the field parameter schema.
    Params,
}

fn parse_params(raw: &str) -> Result<serde_json::Value, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))
}

/// Parses "WxH" with both sides non-zero.
fn parse_size(raw: &str) -> Result<(usize, usize), CliError> {
    let bad = || CliError::Input(format!("expected non-zero WxH, got '{raw}'"));
    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(bad)?;
    let w: usize = w.trim().parse().map_err(|_| bad())?;
    let h: usize = h.trim().parse().map_err(|_| bad())?;
    if w == 0 || h == 0 {
        return Err(bad());
    }
    Ok((w, h))
}

/// Simulated clock reading at the start of tick `step`.
fn frame_time(step: usize) -> Duration {
    Duration::from_millis(FRAME_MS.saturating_mul(step as u64))
}

fn read_scene(path: &Path) -> Result<Scene, CliError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| CliError::Input(format!("invalid scene file: {e}")))
}

/// Parses "x,y".
fn parse_pointer(raw: &str) -> Result<(f64, f64), CliError> {
    let bad = || CliError::Input(format!("expected x,y, got '{raw}'"));
    let (x, y) = raw.split_once(',').ok_or_else(bad)?;
    let x = x.trim().parse().map_err(|_| bad())?;
    let y = y.trim().parse().map_err(|_| bad())?;
    Ok((x, y))
}

fn surface(block_glyphs: bool, font: Option<String>) -> Box<dyn TextSurface> {
    if block_glyphs {
        return Box::new(BlockSurface);
    }
    let surface = CosmicSurface::new();
    debug!(faces = surface.face_count(), "loaded system fonts");
    match font {
        Some(family) => Box::new(surface.with_family(family)),
        None => Box::new(surface),
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Params => {
            let schema = FieldConfig::param_schema();
            if cli.json {
                print_json(&schema)?;
            } else if let Some(keys) = schema.as_object() {
                for (name, entry) in keys {
                    println!(
                        "{name:<18} {:<8} default {:<24} {}",
                        entry["type"].as_str().unwrap_or("?"),
                        entry["default"].to_string(),
                        entry["description"].as_str().unwrap_or("")
                    );
                }
            }
        }
        Command::Sample {
            text,
            width,
            height,
            params,
        } => {
            let config = FieldConfig::from_json(&parse_params(&params)?);
            config.validate()?;
            let mut surface = surface(cli.block_glyphs, cli.font);
            let positions = rasterize(surface.as_mut(), width, height, &text, &config);
            let bbox = bounds(&positions);

            if cli.json {
                print_json(&serde_json::json!({
                    "text": text,
                    "width": width,
                    "height": height,
                    "font_size": config.font_size(width),
                    "count": positions.len(),
                    "bounds": bbox,
                    "positions": positions,
                }))?;
            } else {
                println!(
                    "{} targets for {text:?} on {width}x{height} (font {:.1}px, gap {})",
                    positions.len(),
                    config.font_size(width),
                    config.gap
                );
                match bbox {
                    Some(b) => println!(
                        "bounds: x {}..{}  y {}..{}",
                        b.min_x, b.max_x, b.min_y, b.max_y
                    ),
                    None => println!("bounds: none (empty field)"),
                }
            }
        }
        Command::Render {
            text,
            width,
            height,
            pixel_ratio,
            steps,
            seed,
            mode,
            pointer,
            resize_to,
            resize_at,
            scene,
            output,
            params,
        } => {
            let scene = match scene {
                Some(path) => read_scene(&path)?,
                None => Scene {
                    pixel_ratio,
                    steps,
                    mode: mode.into(),
                    pointer: pointer.as_deref().map(parse_pointer).transpose()?,
                    params: parse_params(&params)?,
                    ..Scene::new(&text, width, height, seed)
                },
            };
            scene.validate()?;

            let resize = resize_to
                .as_deref()
                .map(parse_size)
                .transpose()?
                .map(|(w, h)| CanvasSize::from_layout(w as f64, h as f64, scene.pixel_ratio));

            let mut surface = surface(cli.block_glyphs, cli.font);
            let mut rng = Xorshift64::new(scene.seed);
            let mut field = SwarmField::new(
                surface.as_mut(),
                scene.text.clone(),
                scene.canvas_size(),
                scene.config(),
                &mut rng,
            );
            let pointer = scene
                .pointer
                .map(|(x, y)| DVec2::new(x, y))
                .unwrap_or(DVec2::INFINITY);

            for step in 0..scene.steps {
                let now = frame_time(step);
                if let (Some(next), true) = (resize, step == resize_at) {
                    field.request_resize(now, next);
                }
                match field.poll_resize(now, surface.as_mut()) {
                    ResizeOutcome::Idle => {}
                    outcome => info!(step, ?outcome, "resize applied"),
                }
                field.tick(scene.mode, pointer);
            }

            let size = field.size();
            let frame = field.frame(scene.mode);
            write_png(
                &frame,
                size.device_width,
                size.device_height,
                scene.pixel_ratio,
                &RenderStyle::default(),
                &output,
            )?;

            if cli.json {
                print_json(&serde_json::json!({
                    "text": scene.text,
                    "width": size.device_width,
                    "height": size.device_height,
                    "particles": field.particles().len(),
                    "targets": field.targets().len(),
                    "links": frame.links.len(),
                    "steps": scene.steps,
                    "seed": scene.seed,
                    "mode": scene.mode,
                    "params": field.params(),
                    "output": output.display().to_string(),
                }))?;
            } else {
                eprintln!(
                    "rendered {:?} ({}x{}, {} particles, {} steps, seed {}) -> {}",
                    scene.text,
                    size.device_width,
                    size.device_height,
                    field.particles().len(),
                    scene.steps,
                    scene.seed,
                    output.display()
                );
            }
            field.shutdown();
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
