//! Block rules for Margolus lattices.
//!
//! On a Margolus lattice every cell belongs to one block per generation (2x2
//! in 2D, 1x2 in 1D). A block rule computes the new values of a whole block
//! at once. The result is cached for the rest of the generation so that the
//! hook runs exactly once per block, even if it is non-deterministic.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasherDefault;
use std::marker::PhantomData;

use log::trace;
use parking_lot::Mutex;
use seahash::SeaHasher;

use super::{check_num_states, value_at, Rule, RuleError, RuleResult, Scalar};
use crate::cell::Cell;
use crate::coord::Coord;

/// Block results for one generation, keyed by the coordinate of the block's
/// north-west (or west) cell.
#[derive(Debug)]
struct BlockCache<T, const N: usize> {
    generation: Option<u64>,
    blocks: HashMap<Coord, [T; N], BuildHasherDefault<SeaHasher>>,
}
impl<T, const N: usize> Default for BlockCache<T, N> {
    fn default() -> Self {
        Self {
            generation: None,
            blocks: HashMap::default(),
        }
    }
}
impl<T, const N: usize> BlockCache<T, N> {
    fn start(&mut self, generation: u64) {
        if self.generation != Some(generation) {
            trace!(
                "Clearing {} cached Margolus blocks for generation {}",
                self.blocks.len(),
                generation,
            );
            self.blocks.clear();
            self.generation = Some(generation);
        }
    }
}

/// Rule that maps the `N` values of a Margolus block to `N` new values.
///
/// Block values are ordered by corner: north-west, north-east, south-east,
/// south-west for 2x2 blocks, and west, east for pairs.
pub struct BlockRule<T, F, const N: usize> {
    num_states: Option<u32>,
    hook: F,
    cache: Mutex<BlockCache<T, N>>,
    _marker: PhantomData<fn() -> T>,
}

/// Block rule for 2D Margolus lattices.
pub type MargolusRule<T, F> = BlockRule<T, F, 4>;
/// Block rule for 1D Margolus lattices.
pub type Margolus1DRule<T, F> = BlockRule<T, F, 2>;

impl<T, F, const N: usize> fmt::Debug for BlockRule<T, F, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRule")
            .field("block_size", &N)
            .field("num_states", &self.num_states)
            .finish()
    }
}

impl<T, F, const N: usize> BlockRule<T, F, N>
where
    T: Scalar,
    F: Fn([T; N], u64) -> [T; N] + Send + Sync,
{
    /// Constructs a block rule.
    pub fn new(hook: F) -> Self {
        Self {
            num_states: None,
            hook,
            cache: Mutex::new(BlockCache::default()),
            _marker: PhantomData,
        }
    }
}
impl<F, const N: usize> BlockRule<u32, F, N> {
    /// Bounds every value of every result block to `0..num_states`.
    pub fn with_num_states(mut self, num_states: u32) -> RuleResult<Self> {
        check_num_states(num_states)?;
        self.num_states = Some(num_states);
        Ok(self)
    }
}

impl<T, F, const N: usize> BlockRule<T, F, N>
where
    T: Scalar,
    F: Fn([T; N], u64) -> [T; N] + Send + Sync,
{
    /// Assembles the values of the block containing `cell`, returning them
    /// along with the block's anchor and the cell's position in the block.
    fn read_block(
        &self,
        cell: &Cell<T>,
        neighbors: &[&Cell<T>],
        generation: u64,
    ) -> RuleResult<([T; N], Coord, usize)> {
        let corner_of = |c: &Cell<T>| {
            c.block_corner_at(generation)
                .map(|corner| corner.index())
                .filter(|&i| i < N)
                .ok_or_else(|| RuleError::NotInBlock(c.coord()))
        };
        if neighbors.len() + 1 != N {
            return Err(RuleError::IncompleteBlock(cell.coord()));
        }

        let own_index = corner_of(cell)?;
        let mut values = [T::default(); N];
        let mut anchor = None;
        let mut filled = [false; N];
        for &member in std::iter::once(&cell).chain(neighbors) {
            let i = corner_of(member)?;
            if filled[i] {
                return Err(RuleError::IncompleteBlock(cell.coord()));
            }
            filled[i] = true;
            values[i] = *value_at(member, generation)?;
            if i == 0 {
                anchor = Some(member.coord());
            }
        }
        let anchor = anchor.ok_or(RuleError::IncompleteBlock(cell.coord()))?;
        Ok((values, anchor, own_index))
    }
}

impl<T, F, const N: usize> Rule<T> for BlockRule<T, F, N>
where
    T: Scalar,
    F: Fn([T; N], u64) -> [T; N] + Send + Sync,
{
    fn next_state(&self, cell: &Cell<T>, neighbors: &[&Cell<T>]) -> RuleResult<T> {
        let generation = cell.generation();
        let (values, anchor, own_index) = self.read_block(cell, neighbors, generation)?;

        let mut cache = self.cache.lock();
        cache.start(generation);
        if let Some(block) = cache.blocks.get(&anchor) {
            return Ok(block[own_index]);
        }
        let block = (self.hook)(values, generation);
        for &value in &block {
            value.check(self.num_states)?;
        }
        cache.blocks.insert(anchor, block);
        Ok(block[own_index])
    }

    fn begin_generation(&self, generation: u64) {
        let mut cache = self.cache.lock();
        cache.blocks.clear();
        cache.generation = Some(generation);
    }
}
