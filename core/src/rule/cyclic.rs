use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{check_num_states, gather, Rule, RuleResult, Scalar};
use crate::cell::Cell;

/// Cyclic cellular automaton.
///
/// A cell in state `i` advances to `(i + 1) % num_states` if at least
/// `trigger` of its neighbors are in that successor state, and otherwise
/// keeps its state.
///
/// The trigger can be changed at any time through a shared handle. The value
/// is read once at the start of each generation, so every cell in a
/// generation sees the same trigger.
#[derive(Debug)]
pub struct CyclicRule {
    num_states: u32,
    trigger: Arc<AtomicU32>,
    /// Generation and the trigger value read for it.
    snapshot: Mutex<Option<(u64, u32)>>,
}
impl CyclicRule {
    /// Constructs a cyclic rule. Fails if there are fewer than 2 states.
    pub fn new(num_states: u32, trigger: u32) -> RuleResult<Self> {
        check_num_states(num_states)?;
        Ok(Self {
            num_states,
            trigger: Arc::new(AtomicU32::new(trigger)),
            snapshot: Mutex::new(None),
        })
    }

    /// Returns the number of cell states.
    pub fn num_states(&self) -> u32 {
        self.num_states
    }
    /// Returns a handle that can be used to change the trigger. Changes take
    /// effect at the start of the next generation.
    pub fn trigger_handle(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.trigger)
    }
    /// Sets the trigger, effective from the start of the next generation.
    pub fn set_trigger(&self, trigger: u32) {
        self.trigger.store(trigger, Ordering::Relaxed);
    }

    /// Returns the trigger for a generation, reading it the first time the
    /// generation is seen.
    fn trigger_for(&self, generation: u64) -> u32 {
        let mut snapshot = self.snapshot.lock();
        match *snapshot {
            Some((g, trigger)) if g == generation => trigger,
            _ => {
                let trigger = self.trigger.load(Ordering::Relaxed);
                *snapshot = Some((generation, trigger));
                trigger
            }
        }
    }
}

impl Rule<u32> for CyclicRule {
    fn next_state(&self, cell: &Cell<u32>, neighbors: &[&Cell<u32>]) -> RuleResult<u32> {
        let (generation, own, neighbors) = gather(cell, neighbors)?;
        let own = own.check(Some(self.num_states))?;
        let successor = (own + 1) % self.num_states;
        let count = neighbors.iter().filter(|&&n| n == successor).count();
        if count >= self.trigger_for(generation) as usize {
            Ok(successor)
        } else {
            Ok(own)
        }
    }

    fn begin_generation(&self, generation: u64) {
        self.trigger_for(generation);
    }
}
