use anyhow::Context as _;
use beachfire_assets::{SandParams, generate_sand};
use beachfire_render::{DebugTextRenderer, RenderView, Renderer};
use beachfire_scene::{
    FrameLoop, PreferencesStore, SceneConfig, SceneRoot, SceneSummary, resolve_config,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beachfire-cli", about = "Headless tools for the beach vignette")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Query string overriding the sprite count, e.g. "sprites=3"
    #[arg(long, global = true)]
    query: Option<String>,

    /// Preferences file consulted after the query string
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Seed for every random choice in the scene
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and scene constants
    Info,
    /// Run the frame loop without a window and describe the result
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Print the scene description every N frames as well
        #[arg(long)]
        every: Option<u64>,
    },
    /// Write the procedural sand texture as a PNG
    SandTexture {
        #[arg(short, long, default_value = "sand.png")]
        out: PathBuf,
        /// Edge length in pixels
        #[arg(long, default_value = "256")]
        size: u32,
    },
    /// Print the resolved start-up configuration as JSON
    Config,
}

fn resolve(cli: &Cli) -> SceneConfig {
    let prefs = cli.prefs.as_ref().map(|p| PreferencesStore::new(p).load());
    let config = resolve_config(cli.query.as_deref(), prefs.as_ref());
    match cli.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}

/// Run `frames` frames of `delta` seconds, calling `each` after every frame.
fn simulate(
    config: SceneConfig,
    frames: u64,
    delta: f32,
    mut each: impl FnMut(u64, &SceneRoot),
) -> (SceneRoot, FrameLoop) {
    let mut scene = SceneRoot::start(config);
    let mut frame_loop = FrameLoop::new();
    for n in 1..=frames {
        frame_loop.tick(&mut scene, delta);
        each(n, &scene);
    }
    (scene, frame_loop)
}

fn describe(scene: &SceneRoot) -> String {
    DebugTextRenderer::new().render(scene, &RenderView::from_camera(&scene.camera))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "beachfire-cli starting");

    match &cli.command {
        Commands::Info => {
            let config = SceneConfig::default();
            println!("beachfire-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("default sprite count: {}", config.sprite_count);
            println!("max sprite count: {}", beachfire_input::MAX_SPRITE_COUNT);
            println!("default seed: {:#x}", config.seed);
            println!(
                "character frame duration: {:.2}s",
                config.character_frame_duration
            );
            let scene = SceneRoot::start(config);
            println!("{}", SceneSummary::of(&scene));
        }
        Commands::Simulate { frames, dt, every } => {
            let config = resolve(&cli);
            println!(
                "Simulating {frames} frames of {dt:.4}s (seed={}, sprites={}, source={:?})",
                config.seed, config.sprite_count, config.source
            );
            tracing::info!(frames, dt, "simulation started");
            let (scene, frame_loop) = simulate(config, *frames, *dt, |n, scene| {
                if every.is_some_and(|k| k > 0 && n % k == 0) {
                    println!("--- frame {n} ---");
                    print!("{}", describe(scene));
                }
            });
            if frame_loop.failed_frames() > 0 {
                tracing::warn!(failed = frame_loop.failed_frames(), "some frames failed");
            }
            print!("{}", describe(&scene));
            println!("{}", SceneSummary::of(&scene));
            println!(
                "Frames: {} ({} failed)",
                frame_loop.frame_count(),
                frame_loop.failed_frames()
            );
        }
        Commands::SandTexture { out, size } => {
            let seed = resolve(&cli).seed;
            let params = SandParams {
                size: *size,
                ..SandParams::default()
            };
            tracing::debug!(size, seed, "generating sand texture");
            let texture = generate_sand(&params, seed);
            texture
                .save_png(out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!(
                "Wrote {}x{} sand texture to {}",
                texture.width,
                texture.height,
                out.display()
            );
        }
        Commands::Config => {
            let config = resolve(&cli);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
