use clap::{Parser, Subcommand};
use cs_core::GeoPoint;
use cs_field::GridSpec;
use cs_netlist::{Netlist, NetlistError};
use cs_sim::{SimError, Simulation, StepOutcome, TickReport};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(about = "CircuitSim CLI - circuit, thermal and magnetic field simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a netlist file and the circuit it describes
    Validate {
        /// Path to the netlist (.yaml, .yml or .json)
        netlist_path: PathBuf,
    },
    /// Run the simulation for a number of fixed steps
    Run {
        /// Path to the netlist (.yaml, .yml or .json)
        netlist_path: PathBuf,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.1)]
        dt: f64,
        /// Number of steps to run
        #[arg(long, default_value_t = 10)]
        steps: u64,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Magnetic field at one geodetic point after running
    Field {
        /// Path to the netlist (.yaml, .yml or .json)
        netlist_path: PathBuf,
        /// Steps to run before sampling (dt = 0.1 s)
        #[arg(long, default_value_t = 1)]
        steps: u64,
        /// Latitude in degrees (defaults to the first magnetic component)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Altitude in metres
        #[arg(long, allow_hyphen_values = true)]
        alt: Option<f64>,
    },
    /// Sample the magnetic field over a cube around the first magnetic component
    Grid {
        /// Path to the netlist (.yaml, .yml or .json)
        netlist_path: PathBuf,
        /// Steps to run before sampling (dt = 0.1 s)
        #[arg(long, default_value_t = 1)]
        steps: u64,
        /// Points per axis
        #[arg(long, default_value_t = 10)]
        resolution: usize,
        /// Half side length of the cube in metres
        #[arg(long, default_value_t = 0.5)]
        half_extent: f64,
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Netlist(#[from] NetlistError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Circuit is not valid: {0}")]
    InvalidCircuit(String),

    #[error("No magnetic component with a position; pass --lat/--lon/--alt")]
    NoFieldOrigin,
}

const FIELD_DT_S: f64 = 0.1;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { netlist_path } => cmd_validate(&netlist_path),
        Commands::Run {
            netlist_path,
            dt,
            steps,
            json,
        } => cmd_run(&netlist_path, dt, steps, json),
        Commands::Field {
            netlist_path,
            steps,
            lat,
            lon,
            alt,
        } => cmd_field(&netlist_path, steps, lat, lon, alt),
        Commands::Grid {
            netlist_path,
            steps,
            resolution,
            half_extent,
            output,
        } => cmd_grid(
            &netlist_path,
            steps,
            resolution,
            half_extent,
            output.as_deref(),
        ),
    }
}

fn cmd_validate(netlist_path: &Path) -> CliResult<()> {
    println!("Validating netlist: {}", netlist_path.display());
    let netlist = cs_netlist::load(netlist_path)?;
    let sim = netlist.into_simulation()?;
    let report = sim.validate();

    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
    for error in &report.errors {
        println!("  error: {}", error);
    }
    if report.is_valid {
        println!("✓ Netlist is valid");
        Ok(())
    } else {
        Err(CliError::InvalidCircuit(format!(
            "{} error(s)",
            report.errors.len()
        )))
    }
}

/// Load a netlist, start it and advance `steps` ticks of `dt`.
fn run_netlist(
    netlist: Netlist,
    dt: f64,
    steps: u64,
    mut on_tick: impl FnMut(u64, &TickReport),
) -> CliResult<Simulation> {
    let mut sim = netlist.into_simulation()?;
    let report = sim.start();
    if !report.is_valid {
        let errors: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        return Err(CliError::InvalidCircuit(errors.join("; ")));
    }

    for step in 1..=steps {
        match sim.step(dt)? {
            StepOutcome::Advanced(tick) => on_tick(step, &tick),
            StepOutcome::Idle => info!(step, "circuit has no nodes, tick skipped"),
            StepOutcome::NotRunning => break,
        }
    }
    Ok(sim)
}

fn cmd_run(netlist_path: &Path, dt: f64, steps: u64, json: bool) -> CliResult<()> {
    let netlist = cs_netlist::load(netlist_path)?;
    if !json {
        println!("Running netlist: {}", netlist.name);
        println!("  dt = {:.3} s, steps = {}", dt, steps);
    }

    let mut failures = Vec::new();
    let sim = run_netlist(netlist, dt, steps, |step, tick| {
        failures.extend(tick.newly_failed.iter().map(|id| (tick.clock, id.clone())));
        if !json {
            render_progress(step, steps, tick);
        }
    })?;

    let snapshot = sim.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    clear_progress_line();
    println!("✓ Simulation completed at t = {:.3} s", snapshot.clock);
    if let Some(tick) = sim.last_report() {
        println!("  Nodes: {}", tick.node_count);
        println!("  Unknowns: {}", tick.system_size);
        if tick.solver_fallback {
            println!("  Solver fell back to zero voltages on the last tick");
        }
    }
    for (t, id) in &failures {
        println!("  ✗ {} failed at t = {:.3} s", id, t);
    }

    println!("\nComponents:");
    for reading in &snapshot.components {
        let s = &reading.state;
        let status = match s.failure_type {
            Some(failure) => format!("FAILED ({})", failure),
            None => format!("{:?}", s.warning_level).to_lowercase(),
        };
        println!(
            "  {:<10} I={:>10.4e} A  V={:>10.4e} V  P={:>10.4e} W  T={:>7.2} °C  {}",
            reading.id, s.current_flow, s.voltage_drop, s.power_dissipation, s.temperature, status
        );
    }
    if !snapshot.wires.is_empty() {
        println!("\nWires:");
        for wire in &snapshot.wires {
            println!(
                "  {:<10} I={:>10.4e} A  V={:>10.4e} V",
                wire.id, wire.state.current, wire.state.voltage_drop
            );
        }
    }
    Ok(())
}

fn cmd_field(
    netlist_path: &Path,
    steps: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    alt: Option<f64>,
) -> CliResult<()> {
    let netlist = cs_netlist::load(netlist_path)?;
    let sim = run_netlist(netlist, FIELD_DT_S, steps, |_, _| {})?;

    let origin = field_origin(&sim);
    let point = match (lat, lon, origin) {
        (Some(latitude), Some(longitude), _) => {
            GeoPoint::new(latitude, longitude, alt.unwrap_or(0.0))
        }
        (_, _, Some(o)) => GeoPoint::new(
            lat.unwrap_or(o.latitude),
            lon.unwrap_or(o.longitude),
            alt.unwrap_or(o.altitude),
        ),
        _ => return Err(CliError::NoFieldOrigin),
    };

    let sample = sim.field_at(point)?;
    println!(
        "Field at ({:.6}, {:.6}, {:.2} m):",
        point.latitude, point.longitude, point.altitude
    );
    println!("  East:  {:.6e} T", sample.field.x);
    println!("  North: {:.6e} T", sample.field.y);
    println!("  Up:    {:.6e} T", sample.field.z);
    println!("  |B|:   {:.6e} T", sample.magnitude);
    Ok(())
}

fn cmd_grid(
    netlist_path: &Path,
    steps: u64,
    resolution: usize,
    half_extent: f64,
    output: Option<&Path>,
) -> CliResult<()> {
    let netlist = cs_netlist::load(netlist_path)?;
    let sim = run_netlist(netlist, FIELD_DT_S, steps, |_, _| {})?;
    let center = field_origin(&sim).ok_or(CliError::NoFieldOrigin)?;

    let grid = sim.field_grid(&GridSpec::cube(center, half_extent, resolution))?;
    let content = serde_json::to_string_pretty(&grid)?;

    if let Some(path) = output {
        std::fs::write(path, content)?;
        println!(
            "✓ Exported {} of {} grid points to {}",
            grid.metadata.returned_points,
            grid.metadata.sampled_points,
            path.display()
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Position of the first magnetic component that has one.
fn field_origin(sim: &Simulation) -> Option<GeoPoint> {
    sim.components()
        .iter()
        .filter(|c| c.kind.is_magnetic())
        .find_map(|c| c.properties.position)
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_progress(step: u64, steps: u64, tick: &TickReport) {
    let width = 28usize;
    let fraction = if steps == 0 {
        1.0
    } else {
        step as f64 / steps as f64
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    print!(
        "\r[{}{}] {:>6.2}%  t={:.3}s  step={}  unknowns={}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled)),
        fraction * 100.0,
        tick.clock,
        step,
        tick.system_size
    );
    let _ = io::stdout().flush();
}
