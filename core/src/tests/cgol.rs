use std::collections::HashSet;

use crate::prelude::*;

fn live_cells(lattice: &Lattice<u32>) -> HashSet<(usize, usize)> {
    lattice
        .cells()
        .iter()
        .filter(|cell| *cell.state() != 0)
        .map(|cell| (cell.coord().row, cell.coord().col))
        .collect()
}

fn make_lattice(width: usize, height: usize, live: &[(usize, usize)]) -> Lattice<u32> {
    let config = LatticeConfig::new(width, height, Topology::Square);
    let mut lattice = Lattice::filled(&config, 0).unwrap();
    for &coord in live {
        lattice.set_state(coord.into(), 1).unwrap();
    }
    lattice
}

#[test]
fn test_cgol_glider() {
    let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
    let mut sim = Simulation::from(make_lattice(16, 16, &glider), LIFE).unwrap();
    assert_eq!(glider.iter().copied().collect::<HashSet<_>>(), live_cells(sim.lattice()));

    // Simulate it for a few steps.
    sim.step().unwrap();
    assert_eq!(
        vec![(1, 0), (1, 2), (2, 1), (2, 2), (3, 1)]
            .into_iter()
            .collect::<HashSet<_>>(),
        live_cells(sim.lattice()),
    );
    sim.step_n(3).unwrap();
    assert_eq!(
        glider
            .iter()
            .map(|&(row, col)| (row + 1, col + 1))
            .collect::<HashSet<_>>(),
        live_cells(sim.lattice()),
    );

    // After 64 generations it has crossed the whole torus.
    sim.step_n(60).unwrap();
    assert_eq!(64, sim.generation());
    assert_eq!(glider.iter().copied().collect::<HashSet<_>>(), live_cells(sim.lattice()));
}

#[test]
fn test_cgol_blinker_with_reflection() {
    // A blinker against the top edge: reflected neighbors keep it from
    // oscillating the way it would in open space.
    let config = LatticeConfig::new(5, 5, Topology::Square).with_boundary(Boundary::Reflection);
    let mut lattice = Lattice::filled(&config, 0).unwrap();
    for col in 1..4 {
        lattice.set_state(Coord::new(0, col), 1).unwrap();
    }
    let mut sim = Simulation::from(lattice, LIFE).unwrap();
    sim.step().unwrap();
    // (0, 2) sees only its two row-0 neighbors, since row -1 mirrors onto
    // the empty row 1. (1, 2) is born from the three cells above it.
    let live = live_cells(sim.lattice());
    assert!(live.contains(&(0, 2)));
    assert!(live.contains(&(1, 2)));
    assert!(!live.contains(&(2, 2)));
}

#[test]
fn test_cgol_block_is_still_life() {
    let block = [(3, 3), (3, 4), (4, 3), (4, 4)];
    for &boundary in &[Boundary::WrapAround, Boundary::Reflection] {
        let config = LatticeConfig::new(8, 8, Topology::Square).with_boundary(boundary);
        let lattice = Lattice::new(&config, |c| block.contains(&(c.row, c.col)) as u32).unwrap();
        let mut sim = Simulation::from(lattice, LIFE).unwrap();
        sim.step_n(10).unwrap();
        assert_eq!(block.iter().copied().collect::<HashSet<_>>(), live_cells(sim.lattice()));
    }
}
