use std::collections::HashMap;
use std::fmt;

use crate::error::DecodeError;

/// Decodes a payload and applies the resulting event to `T`.
pub type PlayFn<T> = fn(&T, &[u8]) -> Result<(), DecodeError>;

/// Maps message names to the routine that replays them.
///
/// Filled once when the owning handler is built and never changed after.
/// Lookup is exact and case-sensitive.
pub struct DispatchTable<T> {
    entries: HashMap<&'static str, PlayFn<T>>,
}

impl<T> DispatchTable<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `play` under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. Tables are built from a fixed
    /// list, so a duplicate is a bug in that list.
    pub fn register(&mut self, name: &'static str, play: PlayFn<T>) {
        if self.entries.insert(name, play).is_some() {
            panic!("duplicate dispatch registration for {}", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<PlayFn<T>> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for DispatchTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DispatchTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("DispatchTable").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter {
        hits: Cell<usize>,
    }

    fn bump(counter: &Counter, data: &[u8]) -> Result<(), DecodeError> {
        counter.hits.set(counter.hits.get() + data.len());
        Ok(())
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut table: DispatchTable<Counter> = DispatchTable::new();
        table.register("OnKeyChar", bump);

        let counter = Counter { hits: Cell::new(0) };
        let play = table.get("OnKeyChar").expect("registered");
        play(&counter, &[1, 2, 3]).unwrap();
        assert_eq!(counter.hits.get(), 3);

        assert!(table.get("onKeyChar").is_none());
        assert!(table.get("OnKeyChar ").is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate dispatch registration for OnKeyUp")]
    fn test_duplicate_registration_panics() {
        let mut table: DispatchTable<Counter> = DispatchTable::new();
        table.register("OnKeyUp", bump);
        table.register("OnKeyUp", bump);
    }
}
