//! Binding Environment
//!
//! The shared name -> value namespace. It is owned by the session loop and
//! lent to whichever evaluator is active, so its contents survive hot-swaps.

use indexmap::IndexMap;

use super::value::{Value, ValueKind};

/// Reserved key holding the most recently printed result
pub const LAST_RESULT: &str = "_";

/// Binding Environment
///
/// Entries keep insertion order so listings are stable across a session.
#[derive(Debug, Default)]
pub struct Bindings {
    entries: IndexMap<String, Value>,
}

impl Bindings {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name, replacing any previous value
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        self.entries.insert(name.into(), value)
    }

    /// Look up a name
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Remove a name
    pub fn remove(
        &mut self,
        name: &str,
    ) -> Option<Value> {
        self.entries.shift_remove(name)
    }

    /// Check whether a name is bound
    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.entries.contains_key(name)
    }

    /// Most recently printed result
    pub fn last_result(&self) -> Option<&Value> {
        self.get(LAST_RESULT)
    }

    /// Store the most recently printed result
    pub fn set_last_result(
        &mut self,
        value: Value,
    ) {
        self.set(LAST_RESULT, value);
    }

    /// Entries with their kinds, in insertion order
    pub fn kinds(&self) -> Vec<(&str, ValueKind)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.kind()))
            .collect()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the environment is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
