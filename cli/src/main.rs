//! Command-line driver: builds a lattice, seeds it randomly, and runs one of
//! the built-in rules on it.

#![warn(missing_docs)]

use anyhow::{ensure, Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{debug, info, LevelFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simple_logger::SimpleLogger;

use latticell_core::prelude::*;
use latticell_core::rule::library;

/// Runs a cellular automaton on a finite lattice.
#[derive(Parser, Debug)]
#[command(name = "latticell", version)]
struct Args {
    /// Number of columns.
    #[arg(long, default_value_t = 32)]
    width: usize,
    /// Number of rows (ignored for one-dimensional topologies).
    #[arg(long, default_value_t = 32)]
    height: usize,
    /// Neighborhood topology, optionally with a parameter, e.g. `moore:2` or
    /// `random-gaussian:1.5`.
    #[arg(short, long, default_value = "square")]
    topology: Topology,
    /// Boundary condition: `wrap` or `reflect`.
    #[arg(short, long, default_value = "wrap")]
    boundary: Boundary,
    /// Built-in rule name.
    #[arg(short, long, default_value = "life")]
    rule: String,
    /// Rulestring for the `life` rule.
    #[arg(long, default_value = "B3/S23")]
    rulestring: String,
    /// Number of states, for rules that take one.
    #[arg(long)]
    states: Option<u32>,
    /// Neighbors needed to advance, for the `cyclic` rule.
    #[arg(long, default_value_t = 1)]
    trigger: u32,
    /// Fraction of cells that start out nonzero.
    #[arg(short, long, default_value_t = 0.3)]
    density: f64,
    /// Number of generations to simulate.
    #[arg(short = 'n', long, default_value_t = 16)]
    generations: u64,
    /// Seed for the initial state and random topologies.
    #[arg(long)]
    seed: Option<u64>,
    /// Don't print the final lattice.
    #[arg(short, long)]
    quiet: bool,
    /// Log level.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(args.log_level)
        .init()
        .context("Failed to initialize logger")?;
    info!("Starting latticell v{} ...", env!("CARGO_PKG_VERSION"));
    debug!("{:?}", args);

    ensure!(
        (0.0..=1.0).contains(&args.density),
        "density must be between 0 and 1, not {}",
        args.density,
    );

    let params = RuleParams {
        rulestring: args.rulestring.clone(),
        num_states: args.states,
        trigger: args.trigger,
    };
    let builtin = library::lookup(&args.rule, &params)
        .with_context(|| format!("Failed to build rule {:?}", args.rule))?;
    info!("Using rule {} with {} states", builtin.name, builtin.num_states);

    let height = match args.topology.dimensionality() {
        Dimensionality::One => 1,
        Dimensionality::Two => args.height,
    };
    let mut config = LatticeConfig::new(args.width, height, args.topology)
        .with_boundary(args.boundary)
        .with_history(builtin.rule.required_generations().max(2));
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let num_states = builtin.num_states;
    let lattice = Lattice::new(&config, |_| {
        if rng.gen_bool(args.density) {
            rng.gen_range(1..num_states)
        } else {
            0
        }
    })
    .context("Failed to build lattice")?;
    info!(
        "Built {}x{} {} lattice ({}, {:?} neighbors)",
        lattice.width(),
        lattice.height(),
        lattice.topology(),
        lattice.boundary(),
        lattice.strategy(),
    );

    let mut sim = Simulation::new(lattice, builtin.rule).context("Failed to build simulation")?;
    println!("generation {:>6}: population {}", 0, population(sim.lattice()));
    for _ in 0..args.generations {
        sim.step()
            .with_context(|| format!("Failed to simulate generation {}", sim.generation()))?;
        println!(
            "generation {:>6}: population {}",
            sim.generation(),
            population(sim.lattice()),
        );
    }

    if !args.quiet {
        println!();
        println!("{}", render(sim.lattice()));
    }
    Ok(())
}

/// Returns the number of cells in a nonzero state.
fn population(lattice: &Lattice<u32>) -> usize {
    lattice.states().filter(|&&s| s != 0).count()
}

/// Renders the lattice one row per line, with `.` for state 0, `O` for state 1
/// and a base-36 digit for higher states.
fn render(lattice: &Lattice<u32>) -> String {
    lattice
        .cells()
        .chunks(lattice.width())
        .map(|row| {
            row.iter()
                .map(|cell| match *cell.state() {
                    0 => '.',
                    1 => 'O',
                    s => std::char::from_digit(s, 36).unwrap_or('#'),
                })
                .collect::<String>()
        })
        .join("\n")
}
