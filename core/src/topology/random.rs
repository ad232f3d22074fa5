//! Random neighbor graphs.
//!
//! These are built once per lattice and cached; the relation is fixed for the
//! lifetime of the lattice but differs between lattices unless a seed is
//! given.

use std::f64::consts::TAU;

use itertools::Itertools;
use log::{debug, trace};
use rand::seq::index;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::boundary::Boundary;
use crate::coord::{Coord, Offset};

/// Maximum number of neighbors a cell draws on an asymmetric random lattice.
pub const MAX_RANDOM_NEIGHBORS: usize = 50;

/// Number of times a Gaussian offset is redrawn before the candidate is given
/// up on.
const MAX_GAUSSIAN_DRAWS: usize = 1000;

/// Adjacency list indexed by row-major cell index.
pub type Graph = Vec<Box<[usize]>>;

/// Builds a directed graph in which every cell draws between 1 and
/// `MAX_RANDOM_NEIGHBORS` (at most `cell_count - 1`) distinct other cells.
pub fn asymmetric(cell_count: usize, rng: &mut impl Rng) -> Graph {
    debug!("Building asymmetric random graph of {} cells", cell_count);
    (0..cell_count)
        .map(|i| {
            let others = cell_count - 1;
            if others == 0 {
                return Box::default();
            }
            let count = rng.gen_range(1..=MAX_RANDOM_NEIGHBORS).min(others);
            index::sample(rng, others, count)
                .into_iter()
                // Skip over the cell itself.
                .map(|j| if j >= i { j + 1 } else { j })
                .sorted()
                .collect()
        })
        .collect()
}

/// Builds a symmetric graph whose link offsets are drawn from a 2D Gaussian
/// with standard deviation `std_dev`, never longer than half the grid along
/// either axis.
pub fn gaussian(height: usize, width: usize, std_dev: f64, rng: &mut impl Rng) -> Graph {
    let cell_count = height * width;
    debug!(
        "Building Gaussian random graph of {}x{} cells (std-dev {})",
        width, height, std_dev,
    );
    let cap = (cell_count.saturating_sub(1))
        .saturating_mul(cell_count.saturating_sub(1))
        .min(MAX_RANDOM_NEIGHBORS);
    let mut adjacency: Vec<Vec<usize>> = vec![vec![]; cell_count];
    if cap == 0 {
        return finish(adjacency);
    }

    for i in 0..cell_count {
        let coord = Coord::from_index(i, width);
        let attempts = rng.gen_range(1..=cap);
        for _ in 0..attempts {
            if adjacency[i].len() >= cap {
                break;
            }
            let offset = match gaussian_offset(height, width, std_dev, rng) {
                Some(o) => o,
                None => continue,
            };
            let j = Boundary::WrapAround
                .resolve(coord, offset, height, width)
                .to_index(width);
            if j == i || adjacency[i].contains(&j) || adjacency[j].len() >= cap {
                continue;
            }
            adjacency[i].push(j);
            adjacency[j].push(i);
        }
    }
    finish(adjacency)
}

/// Draws a nonzero offset from a 2D Gaussian, redrawing until it fits within
/// half the grid along both axes.
fn gaussian_offset(
    height: usize,
    width: usize,
    std_dev: f64,
    rng: &mut impl Rng,
) -> Option<Offset> {
    let max_dr = (height / 2) as isize;
    let max_dc = (width / 2) as isize;
    for _ in 0..MAX_GAUSSIAN_DRAWS {
        // Box-Muller transform; `1 - u` keeps the logarithm finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen();
        let magnitude = std_dev * (-2.0 * u1.ln()).sqrt();
        let dr = (magnitude * (TAU * u2).cos()).round() as isize;
        let dc = (magnitude * (TAU * u2).sin()).round() as isize;
        let offset = Offset::new(dr, dc);
        if dr.abs() <= max_dr && dc.abs() <= max_dc && !offset.is_zero() {
            return Some(offset);
        }
    }
    trace!("Gave up drawing a Gaussian offset");
    None
}

/// Builds a symmetric preferential-attachment graph.
///
/// Cells are added in random order. Each new cell links to every earlier cell
/// with probability `degree / total_degree` (or certainly, while there are no
/// links at all). Cells left without links become their own sole neighbor.
pub fn small_world(cell_count: usize, rng: &mut impl Rng) -> Graph {
    debug!("Building small-world random graph of {} cells", cell_count);
    let mut order = (0..cell_count).collect_vec();
    order.shuffle(rng);

    let mut adjacency: Vec<Vec<usize>> = vec![vec![]; cell_count];
    let mut total_degree = 0_usize;
    for (k, &new_cell) in order.iter().enumerate() {
        // Decide every link against the degrees from before this cell was
        // added.
        let targets = order[..k]
            .iter()
            .copied()
            .filter(|&old_cell| {
                if total_degree == 0 {
                    true
                } else {
                    let p = adjacency[old_cell].len() as f64 / total_degree as f64;
                    rng.gen_bool(p.min(1.0))
                }
            })
            .collect_vec();
        for old_cell in targets {
            adjacency[new_cell].push(old_cell);
            adjacency[old_cell].push(new_cell);
            total_degree += 2;
        }
    }

    let isolated = adjacency.iter().filter(|n| n.is_empty()).count();
    if isolated > 0 {
        debug!("{} isolated cells become their own neighbor", isolated);
    }
    for (i, neighbors) in adjacency.iter_mut().enumerate() {
        if neighbors.is_empty() {
            neighbors.push(i);
        }
    }
    finish(adjacency)
}

fn finish(adjacency: Vec<Vec<usize>>) -> Graph {
    adjacency
        .into_iter()
        .map(|mut neighbors| {
            neighbors.sort_unstable();
            neighbors.into_boxed_slice()
        })
        .collect()
}
