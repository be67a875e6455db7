//! Per-interface tracking state store.
//!
//! Owns the mapping from interface name to its per-class counter state.
//! Single-writer, accessed only from the poll loop, so no locking.

use std::collections::{HashMap, HashSet};

use crate::types::{CounterState, ErrorClass, TrackedInterface};

/// In-memory store of tracked interfaces. Process lifetime only; an entry
/// exists exactly while its interface stays in the connected set.
#[derive(Debug, Default)]
pub struct InterfaceStateStore {
    interfaces: HashMap<String, TrackedInterface>,
}

impl InterfaceStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str, class: ErrorClass) -> Option<CounterState> {
        self.interfaces
            .get(name)
            .and_then(|entry| entry.classes.get(&class))
            .copied()
    }

    pub fn set(&mut self, name: &str, class: ErrorClass, state: CounterState) {
        self.interfaces
            .entry(name.to_string())
            .or_default()
            .classes
            .insert(class, state);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.interfaces.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.interfaces.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Drops every interface not present in `connected`, returning the
    /// names that were pruned. Called at the end of each poll cycle so
    /// disconnection discards all history for the interface.
    pub fn retain_connected(&mut self, connected: &[String]) -> Vec<String> {
        let keep: HashSet<&str> = connected.iter().map(String::as_str).collect();
        let pruned: Vec<String> = self
            .interfaces
            .keys()
            .filter(|name| !keep.contains(name.as_str()))
            .cloned()
            .collect();
        for name in &pruned {
            self.interfaces.remove(name);
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(base: u64) -> CounterState {
        CounterState {
            base,
            consecutive_failures: 0,
        }
    }

    #[test]
    fn test_get_set() {
        let mut store = InterfaceStateStore::new();
        assert_eq!(store.get("Ethernet0", ErrorClass::Fcs), None);

        store.set("Ethernet0", ErrorClass::Fcs, state(50));
        assert_eq!(store.get("Ethernet0", ErrorClass::Fcs), Some(state(50)));
        // Classes are independent.
        assert_eq!(store.get("Ethernet0", ErrorClass::Symbol), None);

        store.set("Ethernet0", ErrorClass::Fcs, state(80));
        assert_eq!(store.get("Ethernet0", ErrorClass::Fcs), Some(state(80)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut store = InterfaceStateStore::new();
        store.set("Ethernet0", ErrorClass::Fcs, state(50));
        store.set("Ethernet0", ErrorClass::Symbol, state(5));

        assert!(store.remove("Ethernet0"));
        assert!(!store.remove("Ethernet0"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_retain_connected_prunes_departed() {
        let mut store = InterfaceStateStore::new();
        store.set("Ethernet0", ErrorClass::Fcs, state(50));
        store.set("Ethernet4", ErrorClass::Fcs, state(60));
        store.set("Ethernet8", ErrorClass::Symbol, state(70));

        let connected = vec!["Ethernet0".to_string(), "Ethernet8".to_string()];
        let mut pruned = store.retain_connected(&connected);
        pruned.sort();
        assert_eq!(pruned, vec!["Ethernet4".to_string()]);

        assert!(store.contains("Ethernet0"));
        assert!(!store.contains("Ethernet4"));
        assert!(store.contains("Ethernet8"));
    }

    #[test]
    fn test_retain_connected_noop_when_all_present() {
        let mut store = InterfaceStateStore::new();
        store.set("Ethernet0", ErrorClass::Fcs, state(50));

        let pruned = store.retain_connected(&["Ethernet0".to_string()]);
        assert!(pruned.is_empty());
        assert_eq!(store.len(), 1);
    }
}
