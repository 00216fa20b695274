use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{error, info};
use TrafficLightMini::core::light::{LightConfig, Result, TrafficLight};
use TrafficLightMini::core::logging::init_logging;

/// Run one traffic light and a few vehicles that cross on green
#[derive(Debug, Parser)]
#[command(name = "traffic-light", version)]
struct Args {
    /// JSON file with a `LightConfig`
    #[arg(long, env = "TRAFFIC_LIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Number of vehicle threads
    #[arg(long, default_value_t = 3)]
    vehicles: usize,

    /// Crossings each vehicle makes before exiting
    #[arg(long, default_value_t = 2)]
    crossings: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose.max(1));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "traffic light failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => LightConfig::from_path(path)?,
        None => LightConfig::default(),
    };
    let light = Arc::new(TrafficLight::with_config(config)?);
    light.simulate()?;
    let start = Instant::now();

    let mut handles = vec![];
    for id in 0..args.vehicles {
        let light = Arc::clone(&light);
        let crossings = args.crossings;
        handles.push(thread::spawn(move || {
            for crossing in 1..=crossings {
                info!(vehicle = id, phase = %light.current_phase(), "waiting at intersection");
                light.wait_for_green();
                info!(vehicle = id, crossing, "crossed on green");
                thread::sleep(Duration::from_millis(50));
            }
        }));
    }

    for handle in handles {
        if handle.join().is_err() {
            error!("vehicle thread panicked");
        }
    }

    light.stop();
    info!(
        cycles = light.cycle_count(),
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "simulation finished"
    );
    Ok(())
}
