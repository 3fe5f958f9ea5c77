use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use railsim::config::SimConfig;
use railsim::io::csv;
use railsim::io::json::{self, FlightSummary};
use railsim::launch::Accelerator;
use railsim::sim::{self, Termination};

/// Rail-accelerator launch simulation in ECEF coordinates.
#[derive(Parser, Debug)]
#[command(name = "railsim", version)]
struct Args {
    /// Scenario YAML file (defaults are used for anything left out)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the stop time, s
    #[arg(long)]
    tf: Option<f64>,

    /// Write the trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the flight summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(tf) = args.tf {
        config.timing.tf = tf;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let trajectory = sim::simulate(&config).context("simulation failed")?;
    let radius_earth = config.planet.radius_earth;
    let summary = FlightSummary::from_trajectory(&trajectory, radius_earth);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let [x0, y0, z0] = config.projectile.initial_position;
    let launcher = Accelerator::from_config(&config.launcher, &nalgebra::Vector3::new(x0, y0, z0));

    println!();
    println!("====================================================================");
    println!("  RAIL LAUNCH SIMULATION");
    println!("====================================================================");
    println!();
    println!("  Launcher");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Stored energy: {:>10.3e} J   Thrust:       {:>10.0} N",
        launcher.stored_energy(),
        launcher.thrust_magnitude()
    );
    println!(
        "  Fire window:   {:>5.1}-{:<5.1}s   Ideal dv:     {:>10.0} m/s",
        launcher.launch_start,
        launcher.thrust_cutoff,
        launcher.ideal_delta_v(config.projectile.mass)
    );
    println!(
        "  Projectile:    {:>10.1} kg  dt:           {:>10.3} s",
        config.projectile.mass, config.timing.dt
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &summary.events {
        println!(
            "  {:<14} t={:>8.2}s   alt={:>12.0}m   speed={:>8.1}m/s",
            format!("{:?}", e.kind),
            e.time,
            e.altitude,
            e.speed
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Max altitude:  {:>12.0} m   ({:.1} km at t={:.1}s)",
        summary.max_altitude_m,
        summary.max_altitude_m / 1000.0,
        summary.max_altitude_time_s
    );
    println!("  Max speed:     {:>12.1} m/s", summary.max_speed_ms);
    if let Some(v) = summary.burnout_speed_ms {
        println!("  Burnout speed: {:>12.1} m/s", v);
    }
    println!(
        "  Flight time:   {:>12.1} s   ({})",
        summary.flight_time_s,
        match trajectory.termination() {
            Termination::Impact => "impact",
            Termination::EndTime => "end of run",
        }
    );
    println!();
    println!("  Simulation: {} steps, dt={} s", summary.steps, config.timing.dt);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        csv::write_trajectory_file(path, trajectory.samples(), radius_earth)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("trajectory written to {}", path.display());
    }
    if let Some(path) = &args.json {
        json::write_summary_file(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("summary written to {}", path.display());
    }

    Ok(())
}
