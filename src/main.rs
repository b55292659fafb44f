use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use highway_sim::simulation::{SimParams, Simulation, DEFAULT_DT, TICKS_PER_SECOND};

/// Width of the printed road strip in characters
const MAP_WIDTH: usize = 75;

#[derive(Parser)]
#[command(name = "highway_sim")]
#[command(about = "Single-lane highway traffic simulation (headless)")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 20_000)]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value_t = DEFAULT_DT)]
    dt: f32,

    /// Print a summary every this many ticks
    #[arg(long, default_value_t = TICKS_PER_SECOND)]
    report_every: u32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum spawn speed (before speed scaling)
    #[arg(long, default_value_t = SimParams::default().min_speed)]
    min_speed: f32,

    /// Maximum spawn speed (before speed scaling)
    #[arg(long, default_value_t = SimParams::default().max_speed)]
    max_speed: f32,

    /// Minimum ticks between spawn attempts
    #[arg(long, default_value_t = SimParams::default().min_spawn_interval)]
    min_spawn_interval: i32,

    /// Maximum ticks between spawn attempts
    #[arg(long, default_value_t = SimParams::default().max_spawn_interval)]
    max_spawn_interval: i32,

    /// Acceleration coefficient for newly spawned vehicles
    #[arg(long, default_value_t = SimParams::default().accel_coef)]
    accel: f32,

    /// Deceleration coefficient for newly spawned vehicles
    #[arg(long, default_value_t = SimParams::default().decel_coef)]
    decel: f32,

    /// Hold the lead vehicle, as TICK:SECONDS (repeatable)
    #[arg(long = "delay", value_parser = parse_delay)]
    delays: Vec<DelayRequest>,

    /// Do not draw the road strip
    #[arg(long)]
    no_map: bool,
}

/// A scheduled hold of the lead vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DelayRequest {
    at_tick: u32,
    seconds: u32,
}

impl DelayRequest {
    fn ticks(&self) -> u32 {
        self.seconds.saturating_mul(TICKS_PER_SECOND)
    }
}

fn parse_delay(raw: &str) -> Result<DelayRequest> {
    let (tick, seconds) = raw
        .split_once(':')
        .with_context(|| format!("Expected TICK:SECONDS, got '{}'", raw))?;
    let at_tick = tick
        .trim()
        .parse()
        .with_context(|| format!("Invalid tick '{}'", tick))?;
    let seconds = seconds
        .trim()
        .parse()
        .with_context(|| format!("Invalid delay seconds '{}'", seconds))?;
    Ok(DelayRequest { at_tick, seconds })
}

impl Cli {
    fn params(&self) -> SimParams {
        SimParams {
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_spawn_interval: self.min_spawn_interval,
            max_spawn_interval: self.max_spawn_interval,
            accel_coef: self.accel,
            decel_coef: self.decel,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let params = cli.params();
    params.validate().context("Invalid simulation parameters")?;
    if !(cli.dt.is_finite() && cli.dt > 0.0) {
        anyhow::bail!("Time step must be a positive number (got {})", cli.dt);
    }

    run_headless(&cli, params);
    Ok(())
}

/// Run the simulation without any display
fn run_headless(cli: &Cli, params: SimParams) {
    info!("Running highway simulation in headless mode...");
    info!("Ticks: {}, Delta: {}s", cli.ticks, cli.dt);

    let mut sim = match cli.seed {
        Some(seed) => Simulation::with_seed(params, seed),
        None => Simulation::new(params),
    };

    let report_every = cli.report_every.max(1);
    for tick in 1..=cli.ticks {
        for request in cli.delays.iter().filter(|d| d.at_tick == tick) {
            apply_delay(&mut sim, request);
        }

        sim.step(cli.dt);

        if tick % report_every == 0 && tick < cli.ticks {
            println!("--- After tick {} ({:.1}s simulated time) ---", tick, tick as f32 * cli.dt);
            sim.print_summary();
            if !cli.no_map {
                sim.draw_road(MAP_WIDTH);
            }
            println!();
        }
    }

    println!("=== Final State ===");
    sim.print_summary();
    if !cli.no_map {
        sim.draw_road(MAP_WIDTH);
    }

    let stats = sim.stats();
    info!("=== SIMULATION COMPLETE ===");
    info!("Total vehicles spawned: {}", stats.total_spawned);
    info!("Total vehicles left the road: {}", stats.total_removed);
    info!("Total crashes: {}", stats.total_crashes);
    info!("Throughput: {:.1}%", stats.throughput_rate());
}

fn apply_delay(sim: &mut Simulation, request: &DelayRequest) {
    match sim.roadway_mut().lead_mut() {
        Some(lead) => {
            info!(
                "Holding vehicle {} for {}s at tick {}",
                lead.id(),
                request.seconds,
                request.at_tick
            );
            lead.delay(request.ticks());
        }
        None => warn!("No vehicle on the road to delay at tick {}", request.at_tick),
    }
}
