use std::env;

use camino::Utf8PathBuf;
use sky_orbits::config::SystemConfig;
use sky_orbits::orbit_errors::OrbitError;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Propagate a system of bodies and print their sky positions.
///
/// Usage:
///   two_body_sky [CONFIG.json] [--stride N]
/// Without a configuration file the built-in two-body system is used
/// (100 years every 10 days, stopped when the second body reverses along z).
/// Set `RUST_LOG=debug` to follow the solver.
fn main() -> Result<(), OrbitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    let stride = match args.iter().position(|a| a == "--stride") {
        Some(pos) => {
            args.remove(pos);
            let value = if pos < args.len() {
                args.remove(pos)
            } else {
                String::new()
            };
            value.parse::<usize>().map_err(|_| {
                OrbitError::InvalidConfiguration(format!("invalid stride: {value}"))
            })?
        }
        None => 100,
    };

    let config = match args.first() {
        Some(path) => SystemConfig::from_path(&Utf8PathBuf::from(path))?,
        None => SystemConfig::two_body_default(),
    };

    let times = config.time_grid()?;
    let system = config.build_system()?;
    info!(bodies = system.len(), samples = times.len(), "propagating system");

    let result = system.propagate(&times)?;
    match result.stop_index() {
        Some(index) => info!(index, time = times[index], "stopped at direction reversal"),
        None => info!("full time grid propagated"),
    }

    for (name, traj) in result.iter() {
        println!("== {name} ({} samples)", traj.len());
        println!("{}", traj.elements());
        println!("{}", traj.to_table(stride));

        let radii = traj.radii();
        let (r_min, r_max) = radii
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                (lo.min(r), hi.max(r))
            });
        println!("radius range: [{r_min:.4}, {r_max:.4}]\n");
    }

    Ok(())
}
