//! warehouse: drive a simulated AGV around a warehouse floor.
//!
//! ```text
//! warehouse [MAP_JSON [CONFIG_JSON]]
//! ```
//!
//! Without a map the built-in three-aisle floor is used.  `CONFIG_JSON`
//! holds a `DriveConfig`; missing fields take their defaults.  Set
//! `RUST_LOG` to change verbosity (default `info`).

mod floor;

use std::f64::consts::PI;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use agv_control::AgvBuilder;
use agv_core::DriveConfig;
use agv_drive::{DriveOutcome, SimulatedTransport};
use agv_spatial::{Network, load_map_json};

// ── Constants ─────────────────────────────────────────────────────────────────

const POLLS_PER_HOP: u32 = 5;
const ABORT_WAIT:    Duration = Duration::from_secs(5);

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .context("failed to initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<DriveConfig> {
    let config: DriveConfig = match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))?
        }
        None => DriveConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Network, start node, and the targets to visit.
fn load_floor(map_path: Option<&Path>) -> Result<(Network, String, Vec<String>)> {
    let Some(path) = map_path else {
        let network = Network::from_map(&floor::warehouse_map(), &floor::obstacles())?;
        let tour = floor::TOUR.iter().map(|s| s.to_string()).collect();
        return Ok((network, floor::START.to_string(), tour));
    };

    let network = Network::from_map(&load_map_json(path)?, &[])?;
    let (first, last) = match network.nodes() {
        [] => bail!("{} contains no nodes", path.display()),
        [first, ..] => (first.id.clone(), network.nodes()[network.node_count() - 1].id.clone()),
    };
    let tour = vec![last, first.clone()];
    Ok((network, first, tour))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing()?;

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if args.len() > 2 {
        bail!("usage: warehouse [MAP_JSON [CONFIG_JSON]]");
    }
    let config = load_config(args.get(1).map(PathBuf::as_path))?;
    let (network, start, tour) = load_floor(args.first().map(PathBuf::as_path))?;

    println!("=== warehouse: simulated AGV drive ===");
    println!(
        "Network: {} nodes, {} bindings  |  start: {start}  |  poll every {} ms",
        network.node_count(),
        network.edge_count(),
        config.poll_interval_ms,
    );
    println!();

    let transport = Arc::new(SimulatedTransport::at_node(&network, &start)?.polls_per_hop(POLLS_PER_HOP));
    let agv = Arc::new(
        AgvBuilder::new(Arc::clone(&transport))
            .config(config)
            .network(network)
            .build()?,
    );

    // 1. Tour.
    let t0 = Instant::now();
    let mut legs: Vec<(String, DriveOutcome, Vec<String>)> = Vec::with_capacity(tour.len());
    for target in &tour {
        let sent = transport.gotos().len();
        let outcome = agv.navigate_to_node(target)?;
        legs.push((target.clone(), outcome, transport.gotos()[sent..].to_vec()));
    }
    let elapsed = t0.elapsed();

    println!("{:<8} {:<12} {:<6} {}", "Target", "Outcome", "Hops", "Stops");
    println!("{}", "-".repeat(48));
    for (target, outcome, stops) in &legs {
        let label = match outcome {
            DriveOutcome::Completed { .. } => "completed",
            DriveOutcome::Aborted { .. } => "aborted",
            DriveOutcome::Paused { .. } => "paused",
        };
        println!("{:<8} {:<12} {:<6} {}", target, label, outcome.hops(), stops.join(" > "));
    }
    println!("Tour finished in {:.3} s", elapsed.as_secs_f64());
    println!();

    // 2. Turn around.
    let plan = agv.turn_to(agv.vehicle().theta()? + PI)?;
    println!("Turned around: {} x {:?}", plan.count, plan.direction);

    // 3. Abort a drive from a second thread.
    if let Some(target) = tour.first().cloned() {
        let sent = transport.gotos().len();
        let driver = {
            let agv = Arc::clone(&agv);
            thread::spawn(move || agv.navigate_to_node(&target))
        };
        let deadline = Instant::now() + ABORT_WAIT;
        while transport.gotos().len() == sent && !driver.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        agv.abort()?;
        let outcome = driver.join().map_err(|_| anyhow!("drive thread panicked"))??;
        info!(?outcome, pending = agv.sequencer().pending_len(), "drive after abort");
        println!("Drive after abort: {outcome:?}");
    }

    // 4. Point at a coordinate.
    let here = agv.location()?;
    let nearest = agv.find_closest_node()?;
    println!("Vehicle at {here}, nearest node {}", nearest.id);
    let toward = agv.go_to_coordinate(here.x + 10.0, here.y)?;
    println!("Sent toward ({:.1}, {:.1}): closest node {}", here.x + 10.0, here.y, toward.id);
    println!(
        "Actions sent: {} gotos, {} stops, {} telemetry polls",
        transport.count("goto"),
        transport.count("Stop"),
        transport.poll_count(),
    );

    Ok(())
}
