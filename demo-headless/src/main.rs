use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rane_core::export::{dump_text, log_dump, save_png, snapshot_path};
use rane_core::{DropLifetime, InjectionRequest, Simulation, SimulationConfig, SurfaceModel};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Upper bound on random drops queued per step
const MAX_RAIN_RATE: f64 = 1000.0;

/// Rain on a liquid surface without a terminal UI
#[derive(Parser, Debug)]
#[command(name = "rane-headless")]
#[command(about = "Headless liquid surface simulation with PNG snapshots", long_about = None)]
struct Args {
    /// Number of steps to run
    #[arg(short, long, default_value_t = 200)]
    steps: u64,

    /// Grid width in cells (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Update model: radial or wave
    #[arg(short, long)]
    model: Option<SurfaceModel>,

    /// Wave velocity damping in (0, 1]
    #[arg(long)]
    damping: Option<f64>,

    /// Keep radial drops active for this many steps
    #[arg(long, conflicts_with = "persistent")]
    max_age: Option<u32>,

    /// Never retire radial drops
    #[arg(long)]
    persistent: bool,

    /// Random drops per step; fractions accumulate across steps
    #[arg(short, long, default_value_t = 0.5)]
    rain_rate: f64,

    /// RNG seed for reproducible rain
    #[arg(long)]
    seed: Option<u64>,

    /// YAML configuration file
    #[arg(short, long, default_value = "rane.yaml")]
    config: PathBuf,

    /// Directory for PNG snapshots (overrides the config file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Snapshot every N steps, 0 to disable (overrides the config file)
    #[arg(long)]
    snapshot_every: Option<u64>,

    /// Steps between progress reports
    #[arg(long, default_value_t = 50)]
    report_interval: u64,

    /// Print the final field (and wave velocity) as a tab-separated dump
    #[arg(short, long)]
    dump: bool,
}

impl Args {
    fn check_rain_rate(&self) -> Result<()> {
        anyhow::ensure!(
            (0.0..=MAX_RAIN_RATE).contains(&self.rain_rate),
            "rain rate must be between 0 and {} drops per step, got {}",
            MAX_RAIN_RATE,
            self.rain_rate
        );
        Ok(())
    }

    fn resolve_config(&self) -> Result<SimulationConfig> {
        let mut config = SimulationConfig::load_or_default(&self.config);
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(damping) = self.damping {
            config.wave.damping = damping;
        }
        if let Some(max_age) = self.max_age {
            config.lifetime = DropLifetime::MaxAge(max_age);
        } else if self.persistent {
            config.lifetime = DropLifetime::Persistent;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(output) = &self.output {
            config.display.snapshot_dir.clone_from(output);
        }
        if let Some(every) = self.snapshot_every {
            config.display.snapshot_every = every;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.check_rain_rate()?;
    let config = args.resolve_config()?;
    let mut sim = Simulation::new(&config).context("failed to create simulation")?;

    println!("=== Liquid Surface Simulation ===\n");
    println!(
        "Model: {}, grid {}x{}, {} steps, {:.2} drops/step",
        config.model, config.grid.width, config.grid.height, args.steps, args.rain_rate
    );
    if config.display.snapshot_every > 0 {
        println!(
            "Snapshots every {} steps into {}",
            config.display.snapshot_every,
            config.display.snapshot_dir.display()
        );
    }
    println!();

    let start = Instant::now();
    let mut rain_carry = 0.0;
    let mut snapshots = 0_u32;

    for step in 1..=args.steps {
        rain_carry += args.rain_rate;
        while rain_carry >= 1.0 {
            sim.submit(InjectionRequest::Random);
            rain_carry -= 1.0;
        }
        sim.tick();

        if step.checked_rem(config.display.snapshot_every) == Some(0) {
            let snapshot = sim.snapshot();
            let path = snapshot_path(&config.display.snapshot_dir, step);
            save_png(&snapshot, &path)
                .with_context(|| format!("failed to write snapshot {}", path.display()))?;
            log_dump(&snapshot);
            snapshots += 1;
        }

        if step.checked_rem(args.report_interval) == Some(0) {
            println!("  {}", sim.stats());
        }
    }

    let elapsed = start.elapsed();
    info!("Finished {} steps in {:.2?}", args.steps, elapsed);

    println!("\n=== Summary ===");
    println!("{}", sim.stats());
    println!(
        "Elapsed: {:.2?} ({:.1} steps/s), snapshots written: {}",
        elapsed,
        args.steps as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        snapshots
    );

    if args.dump {
        println!("\nHeight:\n{}", dump_text(&sim.snapshot()));
        if let Some(velocity) = sim.grid().velocity_snapshot() {
            println!("\nVelocity:\n{}", dump_text(&velocity));
        }
    }

    Ok(())
}
