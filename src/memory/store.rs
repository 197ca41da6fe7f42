//! Variable store
//!
//! Maps variable names to non-negative integers of unbounded magnitude. A
//! name that was never written reads as zero, and decrementing zero leaves
//! zero.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Final variable state handed back to callers, ordered by name
pub type Bindings = BTreeMap<String, BigUint>;

/// Rough per-entry bookkeeping cost used by [`VariableStore::estimated_size`]
const ENTRY_OVERHEAD: usize = 48;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    vars: FxHashMap<String, BigUint>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `name`, zero if it was never written.
    pub fn get(&self, name: &str) -> BigUint {
        self.vars.get(name).cloned().unwrap_or_default()
    }

    pub fn is_zero(&self, name: &str) -> bool {
        self.vars.get(name).map_or(true, Zero::is_zero)
    }

    pub fn set(&mut self, name: &str, value: BigUint) {
        if let Some(slot) = self.vars.get_mut(name) {
            *slot = value;
        } else {
            self.vars.insert(name.to_string(), value);
        }
    }

    pub fn clear(&mut self, name: &str) {
        self.set(name, BigUint::zero());
    }

    pub fn increment(&mut self, name: &str) {
        if let Some(value) = self.vars.get_mut(name) {
            *value += 1u32;
        } else {
            self.vars.insert(name.to_string(), BigUint::one());
        }
    }

    /// Saturating decrement: zero stays zero.
    pub fn decrement(&mut self, name: &str) {
        if let Some(value) = self.vars.get_mut(name) {
            if !value.is_zero() {
                *value -= 1u32;
            }
        } else {
            self.vars.insert(name.to_string(), BigUint::zero());
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// All written variables in name order.
    pub fn sorted(&self) -> Vec<(&str, &BigUint)> {
        let mut entries: Vec<(&str, &BigUint)> = self
            .vars
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn to_bindings(&self) -> Bindings {
        self.vars
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Estimate the memory held by this store in bytes
    pub fn estimated_size(&self) -> usize {
        self.vars
            .iter()
            .map(|(name, value)| ENTRY_OVERHEAD + name.len() + (value.bits() / 8) as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_reads_zero() {
        let store = VariableStore::new();
        assert_eq!(store.get("x"), BigUint::zero());
        assert!(store.is_zero("x"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut store = VariableStore::new();
        store.increment("x");
        store.increment("x");
        store.decrement("x");

        assert_eq!(store.get("x"), BigUint::from(1u32));
        assert!(!store.is_zero("x"));
    }

    #[test]
    fn test_decrement_saturates() {
        let mut store = VariableStore::new();
        store.decrement("x");
        assert_eq!(store.get("x"), BigUint::zero());
        assert_eq!(store.len(), 1);

        store.increment("x");
        store.decrement("x");
        store.decrement("x");
        assert_eq!(store.get("x"), BigUint::zero());
    }

    #[test]
    fn test_beyond_machine_word() {
        let mut store = VariableStore::new();
        store.set("big", BigUint::from(u64::MAX));
        store.increment("big");

        assert_eq!(store.get("big"), BigUint::from(u64::MAX) + 1u32);
    }

    #[test]
    fn test_clear_and_sorted() {
        let mut store = VariableStore::new();
        store.increment("b");
        store.increment("a");
        store.clear("b");

        let entries = store.sorted();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[1], ("b", &BigUint::zero()));

        let bindings = store.to_bindings();
        assert_eq!(bindings.get("a"), Some(&BigUint::from(1u32)));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut store = VariableStore::new();
        store.increment("X");

        assert!(store.is_zero("x"));
        assert_eq!(store.len(), 1);
    }
}
