//! delve: generate a dungeon level and print what an observer sees
//!
//! Handy for reproducing a level from a seed in a bug report.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delve_core::{generate, EngineConfig, GameRng, Level};

/// Dungeon generation and visibility explorer
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, about = "Generate a dungeon level and explore it", long_about = None)]
struct Args {
    /// Level seed (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Grid width, overriding the config file
    #[arg(long = "width")]
    width: Option<usize>,

    /// Grid height, overriding the config file
    #[arg(long = "height")]
    height: Option<usize>,

    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Vision radius, overriding the config file
    #[arg(short = 'r', long = "radius")]
    radius: Option<i32>,

    /// Random steps the observer takes from the entry
    #[arg(short = 'w', long = "walk", default_value_t = 0)]
    walk: usize,

    /// Show the whole level instead of the observer's view
    #[arg(long = "reveal")]
    reveal: bool,

    /// Verbose logging (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("delve: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(width) = args.width {
        config.generation.width = width;
    }
    if let Some(height) = args.height {
        config.generation.height = height;
    }
    if let Some(radius) = args.radius {
        config.vision_radius = radius;
    }

    let seed = args.seed.unwrap_or_else(|| GameRng::from_entropy().seed());
    info!(seed, "generating level");
    let mut level = generate(seed, &config.generation)?;

    let mut observer = level.entry();
    level.recompute_visibility(observer, config.vision_radius)?;
    let mut rng = GameRng::new(seed ^ 0x5eed);
    for _ in 0..args.walk {
        observer = step(&level, observer, &mut rng)?;
        level.recompute_visibility(observer, config.vision_radius)?;
    }

    if args.reveal {
        level.reveal_all();
    }

    print!("{}", level.render_known(Some(observer)));
    println!(
        "seed {seed}  rooms {}  observer {:?}  exit {:?}  seen {}/{}",
        level.rooms().len(),
        observer,
        level.exit(),
        level.exploration().count_known(),
        level.width() * level.height()
    );
    Ok(())
}

/// Move to a random walkable orthogonal neighbour, or stay put
fn step(
    level: &Level,
    from: (i32, i32),
    rng: &mut GameRng,
) -> delve_core::Result<(i32, i32)> {
    let mut options = Vec::with_capacity(4);
    for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        let (x, y) = (from.0 + dx, from.1 + dy);
        if level.grid().in_bounds(x, y) && level.is_walkable(x, y)? {
            options.push((x, y));
        }
    }
    let next = rng.choose(&options).copied().unwrap_or(from);
    debug!(?from, ?next, "observer step");
    Ok(next)
}
