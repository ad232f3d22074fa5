use std::fmt;

use super::{check_num_states, gather, Rule, RuleResult, Scalar};
use crate::cell::Cell;

/// Rule over integer states in `0..num_states`.
///
/// The hook receives the cell's state, its neighbors' states, and the
/// generation number. A result outside `0..num_states` is an error.
pub struct IntegerRule<F> {
    num_states: u32,
    hook: F,
}
impl<F> fmt::Debug for IntegerRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegerRule")
            .field("num_states", &self.num_states)
            .finish()
    }
}

impl<F> IntegerRule<F>
where
    F: Fn(u32, &[u32], u64) -> u32 + Send + Sync,
{
    /// Constructs an integer rule. Fails if there are fewer than 2 states.
    pub fn new(num_states: u32, hook: F) -> RuleResult<Self> {
        check_num_states(num_states)?;
        Ok(Self { num_states, hook })
    }
}
impl<F> IntegerRule<F> {
    /// Returns the number of cell states.
    pub fn num_states(&self) -> u32 {
        self.num_states
    }
}

impl<F> Rule<u32> for IntegerRule<F>
where
    F: Fn(u32, &[u32], u64) -> u32 + Send + Sync,
{
    fn next_state(&self, cell: &Cell<u32>, neighbors: &[&Cell<u32>]) -> RuleResult<u32> {
        let (generation, own, neighbors) = gather(cell, neighbors)?;
        (self.hook)(own, &neighbors, generation).check(Some(self.num_states))
    }
}

/// Integer rule restricted to the states `0` and `1`.
pub struct BinaryRule<F>(IntegerRule<F>);
impl<F> fmt::Debug for BinaryRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryRule").finish()
    }
}
impl<F> BinaryRule<F>
where
    F: Fn(u32, &[u32], u64) -> u32 + Send + Sync,
{
    /// Constructs a binary rule.
    pub fn new(hook: F) -> Self {
        Self(IntegerRule {
            num_states: 2,
            hook,
        })
    }
}
impl<F> Rule<u32> for BinaryRule<F>
where
    F: Fn(u32, &[u32], u64) -> u32 + Send + Sync,
{
    fn next_state(&self, cell: &Cell<u32>, neighbors: &[&Cell<u32>]) -> RuleResult<u32> {
        self.0.next_state(cell, neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coord;
    use crate::rule::RuleError;

    fn cells(states: &[u32]) -> Vec<Cell<u32>> {
        states
            .iter()
            .enumerate()
            .map(|(i, &s)| Cell::new(Coord::new(0, i), s, 1))
            .collect()
    }

    #[test]
    fn test_integer_rule_sum() {
        let rule = IntegerRule::new(5, |own, neighbors: &[u32], _| {
            (own + neighbors.iter().sum::<u32>()) % 5
        })
        .unwrap();
        let cells = cells(&[1, 2, 3, 4]);
        let neighbors = cells[1..].iter().collect::<Vec<_>>();
        assert_eq!(Ok(0), rule.next_state(&cells[0], &neighbors));
    }

    #[test]
    fn test_integer_rule_out_of_bounds() {
        let rule = IntegerRule::new(3, |own, _: &[u32], _| own + 1).unwrap();
        let cells = cells(&[2]);
        assert_eq!(
            Err(RuleError::StateOutOfBounds {
                value: 3,
                num_states: 3
            }),
            rule.next_state(&cells[0], &[]),
        );
        assert!(IntegerRule::new(1, |own, _: &[u32], _| own).is_err());
    }

    #[test]
    fn test_binary_rule_rejects_two() {
        let rule = BinaryRule::new(|_, neighbors: &[u32], _| neighbors.len() as u32);
        let cells = cells(&[0, 1, 1]);
        assert_eq!(Ok(1), rule.next_state(&cells[0], &[&cells[1]]));
        assert!(rule.next_state(&cells[0], &[&cells[1], &cells[2]]).is_err());
    }

    #[test]
    fn test_hook_sees_generation() {
        let rule = IntegerRule::new(100, |_, _: &[u32], generation| generation as u32).unwrap();
        let mut cell = Cell::new(Coord::new(0, 0), 0, 1);
        for _ in 0..7 {
            cell.push_state(0);
        }
        assert_eq!(Ok(7), rule.next_state(&cell, &[]));
    }
}
