//! Neighbor offsets for geometric topologies.

use std::borrow::Cow;

use itertools::Itertools;

use super::Dimensionality;
use crate::cell::{BlockCorner, BlockTag};
use crate::coord::{Coord, Offset, Parity};

/// Offsets of a cell's neighbors, possibly depending on where the cell is or
/// which generation it is in.
#[derive(Debug, Clone, PartialEq)]
pub enum Stencil {
    /// The same offsets for every cell.
    Uniform(Vec<Offset>),
    /// Offsets selected by row parity (even rows first).
    ByRow([Vec<Offset>; 2]),
    /// Offsets selected by the parity of `row + col` (even first).
    ByChecker([Vec<Offset>; 2]),
    /// Offsets selected by generation parity (even first).
    ByGeneration([Vec<Offset>; 2]),
    /// Block-mates in a Margolus partition of the given dimensionality.
    Block(Dimensionality),
}

impl Stencil {
    /// Returns the neighbor offsets of a cell at `coord` during a generation
    /// with the given parity.
    pub fn offsets(&self, coord: Coord, generation: Parity) -> Cow<'_, [Offset]> {
        match self {
            Stencil::Uniform(offsets) => Cow::Borrowed(offsets),
            Stencil::ByRow(by_parity) => {
                Cow::Borrowed(&by_parity[Parity::of(coord.row as u64).index()])
            }
            Stencil::ByChecker(by_parity) => {
                Cow::Borrowed(&by_parity[coord.checker_parity().index()])
            }
            Stencil::ByGeneration(by_parity) => Cow::Borrowed(&by_parity[generation.index()]),
            Stencil::Block(dim) => {
                let corner = block_tag(*dim, coord).corner(generation);
                let corners: &[BlockCorner] = match dim {
                    Dimensionality::One => &BlockCorner::PAIR,
                    Dimensionality::Two => &BlockCorner::SQUARE,
                };
                let own = corner.offset_in_block();
                Cow::Owned(
                    corners
                        .iter()
                        .filter(|&&other| other != corner)
                        .map(|other| {
                            let pos = other.offset_in_block();
                            Offset::new(pos.dr - own.dr, pos.dc - own.dc)
                        })
                        .collect(),
                )
            }
        }
    }
}

/// Returns the Margolus block tag of the cell at `coord`. Blocks are anchored
/// at even rows and columns on even generations.
pub(crate) fn block_tag(dim: Dimensionality, coord: Coord) -> BlockTag {
    match dim {
        Dimensionality::One => BlockTag::from_even(BlockCorner::pair_from_col(coord.col)),
        Dimensionality::Two => BlockTag::from_even(BlockCorner::square_from_coord(coord)),
    }
}

/// Returns the ring of cells at Chebyshev distance exactly `distance`,
/// traversed clockwise: top edge left to right, right edge top to bottom,
/// bottom edge right to left, then left edge bottom to top.
pub fn square_ring(distance: usize) -> Vec<Offset> {
    let d = distance as isize;
    let mut ring = Vec::with_capacity(8 * distance);
    for dc in -d..=d {
        ring.push(Offset::new(-d, dc));
    }
    for dr in (-d + 1)..=d {
        ring.push(Offset::new(dr, d));
    }
    for dc in (-d..d).rev() {
        ring.push(Offset::new(d, dc));
    }
    for dr in ((-d + 1)..d).rev() {
        ring.push(Offset::new(dr, -d));
    }
    ring
}

/// Returns the Moore neighborhood of a given radius: the square rings from
/// the outermost inwards.
pub fn moore_offsets(radius: usize) -> Vec<Offset> {
    (1..=radius).rev().flat_map(square_ring).collect()
}

/// Returns the von Neumann neighborhood of a given radius, in the same order
/// as `moore_offsets()`.
pub fn von_neumann_offsets(radius: usize) -> Vec<Offset> {
    moore_offsets(radius)
        .into_iter()
        .filter(|o| o.manhattan() <= radius)
        .collect()
}

pub(super) fn hexagonal() -> Stencil {
    let o = Offset::new;
    Stencil::ByRow([
        // Even rows.
        vec![o(-1, -1), o(-1, 0), o(0, 1), o(1, 0), o(1, -1), o(0, -1)],
        // Odd rows are shifted half a cell east.
        vec![o(-1, 0), o(-1, 1), o(0, 1), o(1, 1), o(1, 0), o(0, -1)],
    ])
}

pub(super) fn triangular() -> Stencil {
    let o = Offset::new;
    Stencil::ByChecker([
        // Pointing up: west, east, south.
        vec![o(0, -1), o(0, 1), o(1, 0)],
        // Pointing down: west, north, east.
        vec![o(0, -1), o(-1, 0), o(0, 1)],
    ])
}

pub(super) fn twelve_triangular() -> Stencil {
    let o = Offset::new;
    Stencil::ByChecker([
        // Pointing up: 3 above, 4 beside, 5 below.
        vec![
            o(-1, -1),
            o(-1, 0),
            o(-1, 1),
            o(0, 1),
            o(0, 2),
            o(1, 2),
            o(1, 1),
            o(1, 0),
            o(1, -1),
            o(1, -2),
            o(0, -2),
            o(0, -1),
        ],
        // Pointing down: 5 above, 4 beside, 3 below.
        vec![
            o(-1, -2),
            o(-1, -1),
            o(-1, 0),
            o(-1, 1),
            o(-1, 2),
            o(0, 1),
            o(0, 2),
            o(1, 1),
            o(1, 0),
            o(1, -1),
            o(0, -2),
            o(0, -1),
        ],
    ])
}

pub(super) fn bahr() -> Stencil {
    let diagonals = square_ring(1)
        .into_iter()
        .filter(|o| o.manhattan() == 2)
        .collect_vec();
    Stencil::ByGeneration([von_neumann_offsets(1), diagonals])
}

pub(super) fn linear(radius: usize) -> Stencil {
    let r = radius as isize;
    Stencil::Uniform(
        (-r..0)
            .chain(1..=r)
            .map(|dc| Offset::new(0, dc))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(offsets: &[Offset]) -> Vec<(isize, isize)> {
        offsets.iter().map(|o| (o.dr, o.dc)).collect()
    }

    #[test]
    fn test_moore_radius_1_is_clockwise_from_northwest() {
        assert_eq!(
            vec![
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
                (1, 0),
                (1, -1),
                (0, -1)
            ],
            pairs(&moore_offsets(1)),
        );
        assert_eq!(
            vec![(-1, 0), (0, 1), (1, 0), (0, -1)],
            pairs(&von_neumann_offsets(1)),
        );
    }

    #[test]
    fn test_spiral_outer_ring_first() {
        let offsets = moore_offsets(2);
        assert_eq!(24, offsets.len());
        // Outer ring starts at the north-west corner of radius 2 ...
        assert_eq!(Offset::new(-2, -2), offsets[0]);
        assert_eq!(Offset::new(-2, 2), offsets[4]);
        assert_eq!(Offset::new(2, 2), offsets[8]);
        assert_eq!(Offset::new(2, -2), offsets[12]);
        assert_eq!(Offset::new(-1, -2), offsets[15]);
        // ... and the inner ring follows.
        assert_eq!(Offset::new(-1, -1), offsets[16]);
        assert!(offsets[..16].iter().all(|o| o.chebyshev() == 2));
        assert!(offsets[16..].iter().all(|o| o.chebyshev() == 1));
    }

    #[test]
    fn test_von_neumann_radius_2_order() {
        assert_eq!(
            vec![
                (-2, 0),
                (0, 2),
                (2, 0),
                (0, -2),
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
                (1, 0),
                (1, -1),
                (0, -1)
            ],
            pairs(&von_neumann_offsets(2)),
        );
    }

    #[test]
    fn test_square_ring_has_no_duplicates() {
        for d in 1..6 {
            let ring = square_ring(d);
            assert_eq!(8 * d, ring.len());
            assert_eq!(ring.len(), ring.iter().unique().count());
        }
    }

    #[test]
    fn test_margolus_block_offsets() {
        let stencil = Stencil::Block(Dimensionality::Two);
        // (0, 0) is the north-west corner on even generations ...
        assert_eq!(
            vec![(0, 1), (1, 1), (1, 0)],
            pairs(&stencil.offsets(Coord::new(0, 0), Parity::Even)),
        );
        // ... and the south-east corner on odd generations.
        assert_eq!(
            vec![(-1, -1), (-1, 0), (0, -1)],
            pairs(&stencil.offsets(Coord::new(0, 0), Parity::Odd)),
        );
        let stencil = Stencil::Block(Dimensionality::One);
        assert_eq!(
            vec![(0, 1)],
            pairs(&stencil.offsets(Coord::new(0, 4), Parity::Even))
        );
        assert_eq!(
            vec![(0, -1)],
            pairs(&stencil.offsets(Coord::new(0, 4), Parity::Odd))
        );
    }

    #[test]
    fn test_bahr_alternates() {
        let stencil = bahr();
        assert_eq!(
            vec![(-1, 0), (0, 1), (1, 0), (0, -1)],
            pairs(&stencil.offsets(Coord::new(3, 3), Parity::Even)),
        );
        assert_eq!(
            vec![(-1, -1), (-1, 1), (1, 1), (1, -1)],
            pairs(&stencil.offsets(Coord::new(3, 3), Parity::Odd)),
        );
    }

    #[test]
    fn test_linear_order() {
        let stencil = linear(2);
        assert_eq!(
            vec![(0, -2), (0, -1), (0, 1), (0, 2)],
            pairs(&stencil.offsets(Coord::new(0, 5), Parity::Even)),
        );
    }
}
