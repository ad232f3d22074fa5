use std::fmt;
use std::marker::PhantomData;

use super::{check_num_states, config_error, value_at, Rule, RuleResult, Scalar};
use crate::cell::Cell;

/// Rule whose hook sees the last `k` states of the cell and of each neighbor.
///
/// Histories are passed newest first: index 0 is the current generation `g`,
/// index 1 is `g - 1`, and so on. Every history is read at exactly the same
/// generations. Before generation `k - 1` there is not enough history yet, so
/// generations before 0 read as generation 0.
pub struct MultiGenerationRule<T, F> {
    generations: usize,
    num_states: Option<u32>,
    hook: F,
    _marker: PhantomData<fn() -> T>,
}
impl<T, F> fmt::Debug for MultiGenerationRule<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiGenerationRule")
            .field("generations", &self.generations)
            .field("num_states", &self.num_states)
            .finish()
    }
}

impl<T, F> MultiGenerationRule<T, F>
where
    T: Scalar,
    F: Fn(&[T], &[Vec<T>], u64) -> T + Send + Sync,
{
    /// Constructs a rule that reads `generations` generations of history.
    /// Fails if `generations` is 0.
    pub fn new(generations: usize, hook: F) -> RuleResult<Self> {
        if generations == 0 {
            return config_error("multi-generation rule must read at least 1 generation");
        }
        Ok(Self {
            generations,
            num_states: None,
            hook,
            _marker: PhantomData,
        })
    }

    fn history(&self, cell: &Cell<T>, generation: u64) -> RuleResult<Vec<T>> {
        (0..self.generations as u64)
            .map(|age| value_at(cell, generation.saturating_sub(age)).copied())
            .collect()
    }
}
impl<F> MultiGenerationRule<u32, F> {
    /// Bounds every result to `0..num_states`.
    pub fn with_num_states(mut self, num_states: u32) -> RuleResult<Self> {
        check_num_states(num_states)?;
        self.num_states = Some(num_states);
        Ok(self)
    }
}

impl<T, F> Rule<T> for MultiGenerationRule<T, F>
where
    T: Scalar,
    F: Fn(&[T], &[Vec<T>], u64) -> T + Send + Sync,
{
    fn next_state(&self, cell: &Cell<T>, neighbors: &[&Cell<T>]) -> RuleResult<T> {
        let generation = cell.generation();
        let own = self.history(cell, generation)?;
        let neighbors = neighbors
            .iter()
            .map(|&n| self.history(n, generation))
            .collect::<RuleResult<Vec<_>>>()?;
        (self.hook)(&own, &neighbors, generation).check(self.num_states)
    }

    fn required_generations(&self) -> usize {
        self.generations
    }
}
