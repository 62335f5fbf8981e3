use anyhow::Context;
use aviator_common::SceneConfig;
use aviator_input::PointerPosition;
use aviator_kernel::NodeId;
use aviator_render::DebugTextRenderer;
use aviator_runtime::{AppState, FixedClock, FrameClock, FrameSignal, PacedClock, StopFlag, run};
use aviator_tools::SceneInspector;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aviator-cli", about = "Headless tools for the aviator scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Scene configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the layout seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and a summary of the freshly built scene
    Info {
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the frame loop headless with the text renderer
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Pointer held for the whole run, as "x,y" in [-1, 1]
        #[arg(short, long, allow_hyphen_values = true)]
        pointer: Option<PointerPosition>,
        /// Pace frames at this rate instead of running flat out
        #[arg(long)]
        fps: Option<u32>,
        /// Print the text renderer's output for the last frame
        #[arg(long)]
        print_last: bool,
    },
    /// Print the scene graph as an indented tree
    Tree,
    /// Show one node resolved against its ancestors
    Node {
        /// Node index as printed by `tree`
        id: u32,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn load_config(path: Option<PathBuf>, seed: Option<u64>) -> anyhow::Result<SceneConfig> {
    let mut config = match path {
        Some(path) => SceneConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `info --json` stays machine readable.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config, cli.seed)?;
    tracing::debug!(seed = config.seed, "config loaded");

    match cli.command {
        Commands::Info { json } => {
            let app = AppState::new(config)?;
            let summary = SceneInspector::summary(&app);
            if json {
                println!("{}", summary.to_json()?);
            } else {
                println!("aviator-cli v{}", env!("CARGO_PKG_VERSION"));
                println!("{summary}");
            }
        }
        Commands::Run {
            frames,
            pointer,
            fps,
            print_last,
        } => {
            let mut app = AppState::new(config)?;
            if let Some(pointer) = pointer {
                app.set_pointer(pointer);
            }
            println!("Running {frames} frames, seed={}", app.config().seed);

            let mut renderer = DebugTextRenderer::new();
            let stop = StopFlag::new();
            let report = match fps {
                Some(fps) => {
                    // The paced clock never ends on its own; the fixed clock
                    // bounds the run and the paced clock spaces it.
                    let mut clock = Paced {
                        paced: PacedClock::from_fps(fps),
                        fixed: FixedClock::new(frames),
                    };
                    run(&mut app, &mut clock, &mut renderer, &stop)?
                }
                None => run(&mut app, &mut FixedClock::new(frames), &mut renderer, &stop)?,
            };

            println!(
                "Stopped after {} frames ({:?}): avg {:.3} ms, min {:.3} ms, max {:.3} ms",
                report.frames,
                report.reason,
                report.average_frame.as_secs_f64() * 1000.0,
                report.min_frame.as_secs_f64() * 1000.0,
                report.max_frame.as_secs_f64() * 1000.0,
            );
            println!("{}", SceneInspector::summary(&app));
            if let Some(output) = report.last_output.filter(|_| print_last) {
                println!("{output}");
            }
        }
        Commands::Tree => {
            let app = AppState::new(config)?;
            print!("{}", SceneInspector::tree(app.scene()));
        }
        Commands::Node { id } => {
            let app = AppState::new(config)?;
            let info = SceneInspector::inspect_node(app.scene(), NodeId(id))
                .with_context(|| format!("no node #{id}"))?;
            println!("{info}");
        }
        Commands::Config => {
            config.validate()?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

/// Fixed frame budget with paced spacing.
struct Paced {
    paced: PacedClock,
    fixed: FixedClock,
}

impl FrameClock for Paced {
    fn next_frame(&mut self) -> FrameSignal {
        match self.fixed.next_frame() {
            FrameSignal::Frame => self.paced.next_frame(),
            gone => gone,
        }
    }
}
