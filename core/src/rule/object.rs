//! Templates for cells holding arbitrary objects.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasherDefault;
use std::str::FromStr;

use parking_lot::RwLock;
use seahash::SeaHasher;

use super::{config_error, gather, value_at, values_at, Rule, RuleError, RuleResult};
use crate::cell::Cell;

/// Object that can be stored in a cell.
///
/// The string form must be bijective: parsing the output of `Display` gives
/// back an equal object.
pub trait ObjectState:
    fmt::Debug + fmt::Display + FromStr + Clone + PartialEq + Send + Sync + 'static
{
    /// Returns whether the object survives a trip through its string form.
    fn round_trips(&self) -> bool {
        self.to_string()
            .parse::<Self>()
            .map_or(false, |parsed| parsed == *self)
    }
}
impl<T> ObjectState for T where
    T: fmt::Debug + fmt::Display + FromStr + Clone + PartialEq + Send + Sync + 'static
{
}

/// Rule over cells that hold objects directly.
///
/// Results whose string form does not parse back to the same object are
/// rejected.
pub struct ObjectRule<T, F> {
    hook: F,
    _marker: std::marker::PhantomData<fn() -> T>,
}
impl<T, F> fmt::Debug for ObjectRule<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRule").finish()
    }
}
impl<T, F> ObjectRule<T, F>
where
    T: ObjectState,
    F: Fn(&T, &[&T], u64) -> T + Send + Sync,
{
    /// Constructs an object rule.
    pub fn new(hook: F) -> Self {
        Self {
            hook,
            _marker: std::marker::PhantomData,
        }
    }
}
impl<T, F> Rule<T> for ObjectRule<T, F>
where
    T: ObjectState,
    F: Fn(&T, &[&T], u64) -> T + Send + Sync,
{
    fn next_state(&self, cell: &Cell<T>, neighbors: &[&Cell<T>]) -> RuleResult<T> {
        let generation = cell.generation();
        let own = value_at(cell, generation)?;
        let neighbors = values_at(neighbors, generation)?;
        let next = (self.hook)(own, &neighbors, generation);
        if next.round_trips() {
            Ok(next)
        } else {
            Err(RuleError::UnrecognizedObject(next.to_string()))
        }
    }
}

type SeaHashMap<K, V> = HashMap<K, V, BuildHasherDefault<SeaHasher>>;

/// Bijection between a finite list of objects and `0..len`.
#[derive(Debug, Clone)]
struct StateTable<T> {
    objects: Vec<T>,
    indices: SeaHashMap<String, u32>,
}
impl<T: ObjectState> StateTable<T> {
    fn new(objects: Vec<T>) -> RuleResult<Self> {
        if objects.len() < 2 {
            return config_error(format!(
                "need at least 2 object states, got {}",
                objects.len(),
            ));
        }
        let mut indices = SeaHashMap::default();
        for (i, object) in objects.iter().enumerate() {
            if !object.round_trips() {
                return config_error(format!("object state {} does not round-trip", object));
            }
            if indices.insert(object.to_string(), i as u32).is_some() {
                return config_error(format!("duplicate object state {}", object));
            }
        }
        Ok(Self { objects, indices })
    }

    fn object(&self, index: u32) -> RuleResult<&T> {
        self.objects
            .get(index as usize)
            .ok_or(RuleError::StateOutOfBounds {
                value: index,
                num_states: self.objects.len() as u32,
            })
    }
    fn index(&self, object: &T) -> RuleResult<u32> {
        let key = object.to_string();
        self.indices
            .get(&key)
            .copied()
            .ok_or(RuleError::UnrecognizedObject(key))
    }
}

/// Rule over a finite set of objects, stored in cells as integer indices.
///
/// The hook works with objects; the template translates between objects and
/// indices on the way in and out. The set of objects can be replaced between
/// generations with `set_states()`.
pub struct FiniteObjectRule<T, F> {
    table: RwLock<StateTable<T>>,
    hook: F,
}
impl<T: fmt::Debug, F> fmt::Debug for FiniteObjectRule<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiniteObjectRule")
            .field("states", &self.table.read().objects)
            .finish()
    }
}
impl<T, F> FiniteObjectRule<T, F>
where
    T: ObjectState,
    F: Fn(&T, &[&T], u64) -> T + Send + Sync,
{
    /// Constructs a rule whose cells may take any of `states`; cell value
    /// `i` stands for `states[i]`. Fails if there are fewer than 2 states, or
    /// if two states have the same string form.
    pub fn new(states: Vec<T>, hook: F) -> RuleResult<Self> {
        Ok(Self {
            table: RwLock::new(StateTable::new(states)?),
            hook,
        })
    }
}
impl<T: ObjectState, F> FiniteObjectRule<T, F> {
    /// Replaces the set of object states, rebuilding the index mapping.
    pub fn set_states(&self, states: Vec<T>) -> RuleResult<()> {
        *self.table.write() = StateTable::new(states)?;
        Ok(())
    }
    /// Returns the number of object states.
    pub fn num_states(&self) -> u32 {
        self.table.read().objects.len() as u32
    }
    /// Returns the object that a cell value stands for.
    pub fn object(&self, index: u32) -> RuleResult<T> {
        self.table.read().object(index).cloned()
    }
    /// Returns the cell value that stands for an object.
    pub fn index_of(&self, object: &T) -> RuleResult<u32> {
        self.table.read().index(object)
    }
}
impl<T, F> Rule<u32> for FiniteObjectRule<T, F>
where
    T: ObjectState,
    F: Fn(&T, &[&T], u64) -> T + Send + Sync,
{
    fn next_state(&self, cell: &Cell<u32>, neighbors: &[&Cell<u32>]) -> RuleResult<u32> {
        let (generation, own, neighbors) = gather(cell, neighbors)?;
        let table = self.table.read();
        let own = table.object(own)?;
        let neighbors = neighbors
            .into_iter()
            .map(|i| table.object(i))
            .collect::<RuleResult<Vec<_>>>()?;
        table.index(&(self.hook)(own, &neighbors, generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coord;

    #[derive(Debug, Copy, Clone, PartialEq)]
    enum Weather {
        Sun,
        Rain,
        Snow,
    }
    impl fmt::Display for Weather {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }
    impl FromStr for Weather {
        type Err = ();
        fn from_str(s: &str) -> Result<Self, ()> {
            match s {
                "Sun" => Ok(Weather::Sun),
                "Rain" => Ok(Weather::Rain),
                // Snow is deliberately unparseable.
                _ => Err(()),
            }
        }
    }

    fn majority(own: &Weather, neighbors: &[&Weather], _: u64) -> Weather {
        let rain = neighbors.iter().filter(|&&&w| w == Weather::Rain).count();
        if rain * 2 > neighbors.len() {
            Weather::Rain
        } else {
            *own
        }
    }

    #[test]
    fn test_object_rule() {
        let rule = ObjectRule::new(majority);
        let a = Cell::new(Coord::new(0, 0), Weather::Sun, 1);
        let b = Cell::new(Coord::new(0, 1), Weather::Rain, 1);
        assert_eq!(Ok(Weather::Rain), rule.next_state(&a, &[&b]));

        let snow = ObjectRule::new(|_: &Weather, _: &[&Weather], _| Weather::Snow);
        assert_eq!(
            Err(RuleError::UnrecognizedObject("Snow".to_owned())),
            snow.next_state(&a, &[]),
        );
    }

    #[test]
    fn test_finite_object_rule() {
        let rule = FiniteObjectRule::new(vec![Weather::Sun, Weather::Rain], majority).unwrap();
        assert_eq!(2, rule.num_states());
        assert_eq!(Ok(1), rule.index_of(&Weather::Rain));
        let a = Cell::new(Coord::new(0, 0), 0, 1);
        let b = Cell::new(Coord::new(0, 1), 1, 1);
        let c = Cell::new(Coord::new(0, 2), 1, 1);
        assert_eq!(Ok(1), rule.next_state(&a, &[&b, &c]));
        assert_eq!(Ok(0), rule.next_state(&a, &[&a, &b]));

        let bad = Cell::new(Coord::new(0, 3), 7, 1);
        assert!(rule.next_state(&bad, &[]).is_err());
    }

    #[test]
    fn test_finite_object_rebuild() {
        let rule = FiniteObjectRule::new(vec![Weather::Sun, Weather::Rain], majority).unwrap();
        rule.set_states(vec![Weather::Rain, Weather::Sun]).unwrap();
        assert_eq!(Ok(Weather::Rain), rule.object(0));
        assert_eq!(Ok(1), rule.index_of(&Weather::Sun));
        assert!(rule.set_states(vec![Weather::Sun, Weather::Sun]).is_err());
        assert!(rule.set_states(vec![Weather::Sun, Weather::Snow]).is_err());
        assert!(FiniteObjectRule::new(vec![Weather::Sun], majority).is_err());
    }
}
