//! Individual cells and their state history.
//!
//! A cell knows its coordinate, its current generation, and a bounded number
//! of past states. It does not know its neighbors; that is the lattice's job.

use std::collections::VecDeque;
use std::fmt;

use crate::coord::{Coord, Offset, Parity};

/// Position of a cell within its Margolus block.
///
/// 2D blocks are 2x2 and use the four compass corners; 1D blocks are pairs and
/// use `West`/`East`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlockCorner {
    /// Top-left cell of a 2x2 block.
    NorthWest,
    /// Top-right cell of a 2x2 block.
    NorthEast,
    /// Bottom-right cell of a 2x2 block.
    SouthEast,
    /// Bottom-left cell of a 2x2 block.
    SouthWest,
    /// Left cell of a 1x2 block.
    West,
    /// Right cell of a 1x2 block.
    East,
}
impl BlockCorner {
    /// Corners of a 2x2 block, in clockwise order starting from the north-west.
    pub const SQUARE: [BlockCorner; 4] = [
        BlockCorner::NorthWest,
        BlockCorner::NorthEast,
        BlockCorner::SouthEast,
        BlockCorner::SouthWest,
    ];
    /// Cells of a 1x2 block, west first.
    pub const PAIR: [BlockCorner; 2] = [BlockCorner::West, BlockCorner::East];

    /// Returns the index of this corner in `SQUARE` or `PAIR`.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            BlockCorner::NorthWest | BlockCorner::West => 0,
            BlockCorner::NorthEast | BlockCorner::East => 1,
            BlockCorner::SouthEast => 2,
            BlockCorner::SouthWest => 3,
        }
    }

    /// Returns the corner that the same cell occupies after the block
    /// partition shifts by one cell diagonally: `(position + 2) % 4` for 2x2
    /// blocks, and swapping `West`/`East` for pairs.
    #[inline]
    pub const fn rotate(self) -> Self {
        match self {
            BlockCorner::West => BlockCorner::East,
            BlockCorner::East => BlockCorner::West,
            _ => BlockCorner::SQUARE[(self.index() + 2) % 4],
        }
    }

    /// Returns the position of this corner relative to the block's
    /// north-west (or west) cell.
    #[inline]
    pub const fn offset_in_block(self) -> Offset {
        match self {
            BlockCorner::NorthWest | BlockCorner::West => Offset::new(0, 0),
            BlockCorner::NorthEast | BlockCorner::East => Offset::new(0, 1),
            BlockCorner::SouthEast => Offset::new(1, 1),
            BlockCorner::SouthWest => Offset::new(1, 0),
        }
    }

    /// Returns the corner of a 2x2 block occupied by a cell at `coord` when
    /// blocks are anchored at even rows and columns.
    pub const fn square_from_coord(coord: Coord) -> Self {
        match (coord.row % 2, coord.col % 2) {
            (0, 0) => BlockCorner::NorthWest,
            (0, _) => BlockCorner::NorthEast,
            (_, 0) => BlockCorner::SouthWest,
            (_, _) => BlockCorner::SouthEast,
        }
    }
    /// Returns the cell of a 1x2 block occupied by a cell at `col` when blocks
    /// are anchored at even columns.
    pub const fn pair_from_col(col: usize) -> Self {
        if col % 2 == 0 {
            BlockCorner::West
        } else {
            BlockCorner::East
        }
    }
}
impl fmt::Display for BlockCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockCorner::NorthWest => "NW",
            BlockCorner::NorthEast => "NE",
            BlockCorner::SouthEast => "SE",
            BlockCorner::SouthWest => "SW",
            BlockCorner::West => "W",
            BlockCorner::East => "E",
        };
        write!(f, "{}", name)
    }
}

/// Block membership of a cell on a Margolus lattice, for both generation
/// parities.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlockTag {
    /// Corner occupied on even generations.
    pub even: BlockCorner,
    /// Corner occupied on odd generations.
    pub odd: BlockCorner,
}
impl BlockTag {
    /// Constructs a tag from the even-generation corner; the odd-generation
    /// corner is its rotation.
    pub const fn from_even(even: BlockCorner) -> Self {
        Self {
            even,
            odd: even.rotate(),
        }
    }
    /// Returns the corner for a given generation parity.
    #[inline]
    pub const fn corner(self, parity: Parity) -> BlockCorner {
        match parity {
            Parity::Even => self.even,
            Parity::Odd => self.odd,
        }
    }
}

/// Single cell of a lattice, holding state type `S`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<S> {
    coord: Coord,
    /// Generation of the newest state in `history`.
    generation: u64,
    /// Oldest state first.
    history: VecDeque<S>,
    capacity: usize,
    block: Option<BlockTag>,
}

impl<S> Cell<S> {
    /// Constructs a cell at generation 0 that remembers up to `capacity`
    /// states (at least one).
    pub fn new(coord: Coord, initial: S, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut history = VecDeque::with_capacity(capacity);
        history.push_back(initial);
        Self {
            coord,
            generation: 0,
            history,
            capacity,
            block: None,
        }
    }

    /// Returns the position of the cell.
    #[inline]
    pub fn coord(&self) -> Coord {
        self.coord
    }
    /// Returns the generation of the cell's current state.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
    /// Returns the parity of the cell's current generation.
    #[inline]
    pub fn parity(&self) -> Parity {
        Parity::of(self.generation)
    }
    /// Returns the maximum number of states retained.
    #[inline]
    pub fn history_capacity(&self) -> usize {
        self.capacity
    }
    /// Returns the oldest generation still retained.
    #[inline]
    pub fn oldest_generation(&self) -> u64 {
        self.generation + 1 - self.history.len() as u64
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> &S {
        self.history
            .back()
            .expect("cell history is never empty")
    }
    /// Returns the state at a given generation, or `None` if that generation
    /// is in the future or has been forgotten.
    pub fn state_at(&self, generation: u64) -> Option<&S> {
        if generation > self.generation {
            return None;
        }
        let age = (self.generation - generation) as usize;
        if age >= self.history.len() {
            return None;
        }
        self.history.get(self.history.len() - 1 - age)
    }

    /// Appends a new state, advancing the cell by one generation. The oldest
    /// state is dropped once the history is full.
    pub fn push_state(&mut self, state: S) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(state);
        self.generation += 1;
    }
    /// Overwrites the current state without advancing the generation.
    pub fn set_state(&mut self, state: S) {
        if let Some(current) = self.history.back_mut() {
            *current = state;
        }
    }

    /// Returns the Margolus block tag, if the cell lives on a block-partitioned
    /// lattice.
    #[inline]
    pub fn block(&self) -> Option<BlockTag> {
        self.block
    }
    /// Returns the Margolus corner for the cell's current generation.
    #[inline]
    pub fn block_corner(&self) -> Option<BlockCorner> {
        self.block_corner_at(self.generation)
    }
    /// Returns the Margolus corner at a given generation.
    #[inline]
    pub fn block_corner_at(&self, generation: u64) -> Option<BlockCorner> {
        self.block.map(|tag| tag.corner(Parity::of(generation)))
    }
    pub(crate) fn set_block(&mut self, block: Option<BlockTag>) {
        self.block = block;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_history_ring_buffer() {
        let mut cell = Cell::new(Coord::new(1, 2), 10_u32, 3);
        assert_eq!(0, cell.generation());
        assert_eq!(&10, cell.state());
        for s in 11..=14 {
            cell.push_state(s);
        }
        assert_eq!(4, cell.generation());
        assert_eq!(&14, cell.state());
        assert_eq!(Some(&14), cell.state_at(4));
        assert_eq!(Some(&13), cell.state_at(3));
        assert_eq!(Some(&12), cell.state_at(2));
        // Forgotten and future generations.
        assert_eq!(None, cell.state_at(1));
        assert_eq!(None, cell.state_at(5));
        assert_eq!(2, cell.oldest_generation());
    }

    #[test]
    fn test_cell_set_state() {
        let mut cell = Cell::new(Coord::default(), 0_u32, 1);
        cell.set_state(5);
        assert_eq!(0, cell.generation());
        assert_eq!(&5, cell.state());
        cell.push_state(6);
        assert_eq!(None, cell.state_at(0));
    }

    #[test]
    fn test_block_corner_rotation() {
        use BlockCorner::*;
        assert_eq!(SouthEast, NorthWest.rotate());
        assert_eq!(SouthWest, NorthEast.rotate());
        assert_eq!(NorthWest, SouthEast.rotate());
        assert_eq!(NorthEast, SouthWest.rotate());
        assert_eq!(East, West.rotate());
        for &corner in &BlockCorner::SQUARE {
            assert_eq!(corner, corner.rotate().rotate());
        }
    }

    #[test]
    fn test_block_tag_parity() {
        let mut cell = Cell::new(Coord::new(0, 1), (), 2);
        cell.set_block(Some(BlockTag::from_even(BlockCorner::square_from_coord(
            cell.coord(),
        ))));
        assert_eq!(Some(BlockCorner::NorthEast), cell.block_corner());
        cell.push_state(());
        assert_eq!(Some(BlockCorner::SouthWest), cell.block_corner());
        assert_eq!(Some(BlockCorner::NorthEast), cell.block_corner_at(0));
    }
}
