use anyhow::{Context, Result};
use log::info;

use drone_boat::{Autopilot, SimConfig, Simulation};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting drone boat simulation...");

    // Usage: drone-boat [config.json] [--realtime]
    let mut config_path = None;
    let mut realtime = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--realtime" => realtime = true,
            _ if arg.starts_with("--") => anyhow::bail!("Unknown flag: {}", arg),
            _ => config_path = Some(arg),
        }
    }

    let config = match config_path {
        Some(path) => SimConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => SimConfig::default(),
    };

    let mut autopilot = Autopilot::new(&config);
    let mut sim = Simulation::new(config).context("Failed to build the simulation")?;

    let outcome = if realtime {
        info!("Running in real time");
        sim.run_realtime(&mut autopilot)?
    } else {
        sim.run(&mut autopilot)?
    };

    info!("Run finished: {:?}", outcome);

    let report = serde_json::json!({
        "result": outcome,
        "telemetry": sim.telemetry()?,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
