use itertools::Itertools;

use crate::prelude::*;
use crate::rule::library;

#[test]
fn test_cyclic_on_lattice() {
    // Four states, trigger 2, von Neumann neighborhood.
    let config = LatticeConfig::new(3, 3, Topology::FourNeighborSquare)
        .with_boundary(Boundary::Reflection);
    let mut lattice = Lattice::filled(&config, 1_u32).unwrap();
    lattice.set_state(Coord::new(0, 1), 2).unwrap();
    lattice.set_state(Coord::new(1, 0), 2).unwrap();
    let mut sim = Simulation::from(lattice, CyclicRule::new(4, 2).unwrap()).unwrap();
    sim.step().unwrap();
    let state = |row, col| *sim.lattice().cell(Coord::new(row, col)).unwrap().state();
    // (1, 1) has two neighbors in state 2 and advances.
    assert_eq!(2, state(1, 1));
    // (2, 2) has none and stays put.
    assert_eq!(1, state(2, 2));
    // (0, 0) sees each of (0, 1) and (1, 0) twice because of reflection.
    assert_eq!(2, state(0, 0));
}

#[test]
fn test_multi_generation_reads_are_synchronized() {
    // Every cell holds its generation number, so any mismatched read shows up
    // as a wrong value.
    let rule = MultiGenerationRule::new(3, |own: &[u32], neighbors: &[Vec<u32>], generation| {
        let expected = (0..3)
            .map(|age| generation.saturating_sub(age) as u32)
            .collect_vec();
        assert_eq!(expected, own);
        for history in neighbors {
            assert_eq!(&expected, history);
        }
        own[0] + 1
    })
    .unwrap();
    let config = LatticeConfig::new(6, 6, Topology::Moore { radius: 2 }).with_history(3);
    let lattice = Lattice::filled(&config, 0_u32).unwrap();
    let mut sim = Simulation::from(lattice, rule).unwrap();
    sim.step_n(6).unwrap();
    assert!(sim.lattice().states().all(|&s| s == 6));
}

#[test]
fn test_critters_inverts_empty_blocks() {
    let critters = library::lookup("critters", &RuleParams::default()).unwrap();
    let config = LatticeConfig::new(6, 4, Topology::Margolus);
    let lattice = Lattice::filled(&config, 0_u32).unwrap();
    let mut sim = Simulation::new(lattice, critters.rule).unwrap();
    sim.step().unwrap();
    assert!(sim.lattice().states().all(|&s| s == 1));
    // Full blocks (on the shifted partition) are inverted back.
    sim.step().unwrap();
    assert!(sim.lattice().states().all(|&s| s == 0));
}

#[test]
fn test_critters_leaves_two_cell_blocks() {
    let critters = library::lookup("critters", &RuleParams::default()).unwrap();
    let config = LatticeConfig::new(4, 4, Topology::Margolus);
    let mut lattice = Lattice::filled(&config, 0_u32).unwrap();
    lattice.set_state(Coord::new(0, 0), 1).unwrap();
    lattice.set_state(Coord::new(1, 1), 1).unwrap();
    let mut sim = Simulation::new(lattice, critters.rule).unwrap();
    sim.step().unwrap();
    let state = |row, col| *sim.lattice().cell(Coord::new(row, col)).unwrap().state();
    assert_eq!((1, 0, 0, 1), (state(0, 0), state(0, 1), state(1, 0), state(1, 1)));
    // The three empty blocks are now full.
    assert_eq!(1, state(2, 2));
}

#[test]
fn test_finite_object_rule_on_lattice() {
    let colors = vec!["red".to_owned(), "green".to_owned(), "blue".to_owned()];
    // Every cell takes the "next" color in the list.
    let next = colors.clone();
    let rule = FiniteObjectRule::new(colors, move |own: &String, _: &[&String], _| {
        let i = next.iter().position(|c| c == own).unwrap_or(0);
        next[(i + 1) % next.len()].clone()
    })
    .unwrap();
    let config = LatticeConfig::new(4, 1, Topology::Linear { radius: 1 });
    let lattice = Lattice::new(&config, |c| c.col as u32 % 3).unwrap();
    let mut sim = Simulation::from(lattice, rule).unwrap();
    sim.step().unwrap();
    assert_eq!(
        vec![1, 2, 0, 1],
        sim.lattice().states().copied().collect_vec()
    );
}

#[test]
fn test_builtin_life_matches_life_rule() {
    let params = RuleParams {
        rulestring: "B36/S23".to_owned(),
        ..RuleParams::default()
    };
    let highlife = library::lookup("life", &params).unwrap();
    assert_eq!(2, highlife.num_states);
    let config = LatticeConfig::new(8, 8, Topology::Square);
    // Six live cells around (3, 3) cause a birth only in HighLife.
    let live = [(2, 2), (2, 3), (2, 4), (4, 2), (4, 3), (4, 4)];
    let init = |c: Coord| live.contains(&(c.row, c.col)) as u32;
    let mut high = Simulation::new(Lattice::new(&config, init).unwrap(), highlife.rule).unwrap();
    let mut conway = Simulation::from(Lattice::new(&config, init).unwrap(), LIFE).unwrap();
    high.step().unwrap();
    conway.step().unwrap();
    let center = Coord::new(3, 3);
    assert_eq!(&1, high.lattice().cell(center).unwrap().state());
    assert_eq!(&0, conway.lattice().cell(center).unwrap().state());
}

#[test]
fn test_rule_errors_reach_the_driver() {
    let config = LatticeConfig::new(4, 4, Topology::Square);
    let mut lattice = Lattice::filled(&config, 0_u32).unwrap();
    lattice.set_state(Coord::new(2, 1), 9).unwrap();
    let mut sim = Simulation::from(lattice, LIFE).unwrap();
    assert_eq!(
        Err(SimError::Rule(RuleError::StateOutOfBounds {
            value: 9,
            num_states: 2
        })),
        sim.step(),
    );
}
