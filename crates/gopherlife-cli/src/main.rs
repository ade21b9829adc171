//! Gopherlife CLI - run gopher worlds headless and report on them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gopherlife_core::{
    hash_world, Diagnostics, SearchStrategyKind, SpiralWorld, SpiralWorldSettings, World,
    WorldSettings,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "gopherlife")]
#[command(author, version, about = "Gopherlife - concurrent gopher population simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a foraging world
    Run(RunArgs),

    /// Run the spiral demo world
    Spiral(SpiralArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Starting configuration
    #[arg(short, long, value_enum, default_value = "default")]
    preset: Preset,

    /// JSON settings file, replaces the preset
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// World width
    #[arg(long)]
    width: Option<i32>,

    /// World height
    #[arg(long)]
    height: Option<i32>,

    /// Gophers placed at setup
    #[arg(long)]
    population: Option<usize>,

    /// Population cap
    #[arg(long)]
    max_population: Option<usize>,

    /// Food items placed at setup
    #[arg(long)]
    food: Option<usize>,

    /// Ticks between births (0 disables births)
    #[arg(long)]
    birth_rate: Option<u32>,

    /// Master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Food search strategy
    #[arg(long, value_enum)]
    search: Option<Search>,

    /// Number of ticks to run
    #[arg(short, long, default_value = "100")]
    ticks: u64,

    /// Log a progress line every N ticks (0 disables)
    #[arg(short, long, default_value = "10")]
    report_every: u64,

    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Print the resolved settings as JSON and exit
    #[arg(long)]
    dump_settings: bool,
}

#[derive(Args)]
struct SpiralArgs {
    /// World width
    #[arg(long, default_value = "50")]
    width: i32,

    /// World height
    #[arg(long, default_value = "50")]
    height: i32,

    /// Population cap
    #[arg(long, default_value = "1000")]
    max_population: usize,

    /// Number of ticks to run
    #[arg(short, long, default_value = "300")]
    ticks: u64,

    /// Log a progress line every N ticks (0 disables)
    #[arg(short, long, default_value = "25")]
    report_every: u64,

    /// Step by raw spiral offsets instead of walking the spiral
    #[arg(long)]
    weird: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Default,
    Partition,
    SpiralSearch,
    Fireworks,
}

#[derive(Clone, Copy, ValueEnum)]
enum Search {
    Spiral,
    Partition,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    settings: &'a WorldSettings,
    ticks: u64,
    population: usize,
    food: usize,
    state_hash: u64,
    wall_seconds: f64,
    diagnostics: &'a Diagnostics,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Spiral(args) => spiral(&args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn resolve_settings(args: &RunArgs) -> Result<WorldSettings> {
    let mut settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => match args.preset {
            Preset::Default => WorldSettings::default(),
            Preset::Partition => WorldSettings::partition(),
            Preset::SpiralSearch => WorldSettings::spiral_search(),
            Preset::Fireworks => WorldSettings::fireworks(),
        },
    };

    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(population) = args.population {
        settings.initial_population = population;
    }
    if let Some(max) = args.max_population {
        settings.max_population = max;
    }
    if let Some(food) = args.food {
        settings.food_count = food;
    }
    if let Some(rate) = args.birth_rate {
        settings.birth_rate = rate;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(search) = args.search {
        settings.search.strategy = match search {
            Search::Spiral => SearchStrategyKind::Spiral,
            Search::Partition => SearchStrategyKind::Partition,
        };
    }

    settings.validate().context("invalid world settings")?;
    Ok(settings)
}

fn load_settings(path: &Path) -> Result<WorldSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing settings in {}", path.display()))
}

fn run(args: &RunArgs) -> Result<()> {
    let settings = resolve_settings(args)?;
    if args.dump_settings {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let started = Instant::now();
    let mut world = World::new(settings).context("building world")?;

    for _ in 0..args.ticks {
        world
            .advance_one_tick()
            .with_context(|| format!("tick {} failed", world.tick()))?;

        if args.report_every > 0 && world.tick() % args.report_every == 0 {
            let diagnostics = world.diagnostics();
            info!(
                tick = world.tick(),
                population = world.population(),
                food = world.food_count(),
                births = diagnostics.cumulative.births,
                deaths = diagnostics.cumulative.deaths,
                compute_ms = diagnostics.compute.average().as_secs_f64() * 1e3,
                apply_ms = diagnostics.apply.average().as_secs_f64() * 1e3,
                tick_ms = diagnostics.tick.average().as_secs_f64() * 1e3,
                "progress"
            );
        }
    }

    let summary = RunSummary {
        settings: world.settings(),
        ticks: world.tick(),
        population: world.population(),
        food: world.food_count(),
        state_hash: hash_world(&world),
        wall_seconds: started.elapsed().as_secs_f64(),
        diagnostics: world.diagnostics(),
    };
    info!(
        ticks = summary.ticks,
        population = summary.population,
        food = summary.food,
        state_hash = summary.state_hash,
        wall_seconds = summary.wall_seconds,
        "run complete"
    );

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json).with_context(|| format!("writing summary to {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }
    Ok(())
}

fn spiral(args: &SpiralArgs) -> Result<()> {
    let settings = SpiralWorldSettings {
        width: args.width,
        height: args.height,
        max_population: args.max_population,
        weird: args.weird,
        ..SpiralWorldSettings::default()
    };
    let mut world = SpiralWorld::new(settings).context("building spiral world")?;

    for _ in 0..args.ticks {
        world
            .advance_one_tick()
            .with_context(|| format!("spiral tick {} failed", world.tick()))?;

        if args.report_every > 0 && world.tick() % args.report_every == 0 {
            info!(
                tick = world.tick(),
                population = world.population(),
                tick_us = world.diagnostics().tick.average().as_secs_f64() * 1e6,
                "progress"
            );
        }
    }

    let cumulative = world.diagnostics().cumulative;
    info!(
        ticks = world.tick(),
        population = world.population(),
        births = cumulative.births,
        deaths = cumulative.deaths,
        "spiral run complete"
    );
    Ok(())
}
