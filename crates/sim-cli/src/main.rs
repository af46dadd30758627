//! `driver`: loads a config file, runs the configured number of simulation
//! replications (in parallel, independently — see `sim_runtime::Simulation`),
//! and writes the accumulated CSV reports.

use std::process::ExitCode;

use clap::Parser;
use rayon::prelude::*;
use sim_analyzer::format_report;
use sim_config::Config;
use sim_report::{init_logging, Reporters};
use sim_runtime::{AttackOutcome, Simulation, SimulationOutcome};
use tracing::{error, info, warn};

/// Nakamoto double-spend simulator driver.
#[derive(Parser, Debug)]
#[command(name = "driver")]
#[command(about = "Runs a discrete-event Nakamoto consensus simulation from a config file")]
struct Args {
    /// Path to the config file (`key = value` lines).
    #[arg(short = 'c', long = "config")]
    config: String,

    /// Directory CSV reports are written to. Created if missing.
    #[arg(short = 'o', long = "output-dir", default_value = "./sim-output")]
    output_dir: String,

    /// Base RNG seed. Each replication derives its own stream from this.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = Config::load_file(&args.config)?;
    info!(
        honest = config.num_honest_nodes,
        malicious = config.num_malicious_nodes,
        replications = config.simulation_count.count(),
        "loaded config"
    );

    std::fs::create_dir_all(&args.output_dir)?;

    let outcomes: Vec<SimulationOutcome> = (config.simulation_count.from..=config.simulation_count.to)
        .into_par_iter()
        .map(|sim_id| {
            let simulation = Simulation::new(&config, sim_id as u64, args.seed);
            simulation.run()
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| anyhow::anyhow!("simulation aborted: {err}"))?;

    let mut reporters = Reporters::open(&args.output_dir, config.report)?;
    for outcome in &outcomes {
        for row in outcome.logs.events.iter().cloned() {
            reporters.log_event(row)?;
        }
        for row in outcome.logs.blocks.iter().cloned() {
            reporters.log_block(row)?;
        }
        for row in outcome.logs.structure.iter().cloned() {
            reporters.log_structure(row)?;
        }
        for row in outcome.logs.attacks.iter().cloned() {
            reporters.log_attack(row)?;
        }
        for row in outcome.logs.errors.iter().cloned() {
            reporters.log_error(row)?;
        }
    }
    reporters.flush_all()?;

    summarize(&config, &outcomes);
    Ok(())
}

/// Logs a short summary of the attack outcomes across all replications and,
/// when the config describes an attacker, the theoretical success
/// probability the observed rate can be checked against.
fn summarize(config: &Config, outcomes: &[SimulationOutcome]) {
    let revealed = outcomes
        .iter()
        .filter(|o| o.attack_outcome == AttackOutcome::Revealed)
        .count();
    let started = outcomes
        .iter()
        .filter(|o| o.attack_outcome != AttackOutcome::NeverStarted)
        .count();

    info!(
        replications = outcomes.len(),
        attacks_started = started,
        attacks_revealed = revealed,
        "run complete"
    );

    if config.num_malicious_nodes == 0 {
        return;
    }

    let total_power = config.hash_power_mean * (config.num_honest_nodes + config.num_malicious_nodes) as f64;
    if total_power <= 0.0 {
        warn!("cannot derive attacker hashpower share: total hashpower is zero");
        return;
    }
    let q = (config.hash_power_mean * config.num_malicious_nodes as f64) / total_power;
    let confirmations: Vec<u64> = outcomes
        .iter()
        .filter_map(|o| o.confirmations_at_attack_start)
        .collect();
    if confirmations.is_empty() {
        return;
    }
    println!("{}", format_report(q, &confirmations));
}
