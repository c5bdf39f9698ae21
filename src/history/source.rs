use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{HistoryError, HistoryResult};

/// What a history source persists per navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub uri: String,
    pub state: Value,
    pub key: String,
}

impl HistoryEntry {
    pub fn new(uri: impl Into<String>, state: Value, key: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            state,
            key: key.into(),
        }
    }
}

/// Navigable history backend: the platform's session history in a live
/// environment, or an in-memory stack for headless execution.
pub trait HistorySource {
    /// Entry currently addressed by the source.
    fn entry(&self) -> HistoryEntry;

    fn push(&mut self, entry: HistoryEntry) -> HistoryResult<()>;

    fn replace(&mut self, entry: HistoryEntry) -> HistoryResult<()>;

    /// Hard fallback used when a push or replace is rejected; equivalent to a
    /// full location reassignment and must not fail.
    fn assign(&mut self, entry: HistoryEntry);

    /// Moves the cursor by `delta` entries; false when out of range.
    fn go(&mut self, delta: isize) -> bool;
}

/// Array-backed, index-addressed history stack.
#[derive(Debug)]
pub struct MemorySource {
    entries: Vec<HistoryEntry>,
    index: usize,
    write_budget: Option<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::starting_at("/")
    }

    pub fn starting_at(uri: &str) -> Self {
        Self {
            entries: vec![HistoryEntry::new(uri, Value::Null, "initial")],
            index: 0,
            write_budget: None,
        }
    }

    /// Caps the number of accepted push/replace writes, mirroring platform
    /// call-count limits. `assign` is never budget-limited.
    pub fn with_write_budget(mut self, budget: usize) -> Self {
        self.write_budget = Some(budget);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn charge_write(&mut self, operation: &'static str) -> HistoryResult<()> {
        match self.write_budget.as_mut() {
            Some(0) => Err(HistoryError::WriteBudgetExhausted { operation }),
            Some(budget) => {
                *budget -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl HistorySource for MemorySource {
    fn entry(&self) -> HistoryEntry {
        self.entries[self.index].clone()
    }

    fn push(&mut self, entry: HistoryEntry) -> HistoryResult<()> {
        self.charge_write("push")?;
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index += 1;
        Ok(())
    }

    fn replace(&mut self, entry: HistoryEntry) -> HistoryResult<()> {
        self.charge_write("replace")?;
        self.entries[self.index] = entry;
        Ok(())
    }

    fn assign(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index += 1;
    }

    fn go(&mut self, delta: isize) -> bool {
        let target = self.index as isize + delta;
        if target < 0 || target as usize >= self.entries.len() {
            return false;
        }
        self.index = target as usize;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_truncates_the_forward_stack() {
        let mut source = MemorySource::new();
        source
            .push(HistoryEntry::new("/a", Value::Null, "1"))
            .unwrap();
        source
            .push(HistoryEntry::new("/b", Value::Null, "2"))
            .unwrap();
        assert!(source.go(-2));
        source
            .push(HistoryEntry::new("/c", Value::Null, "3"))
            .unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.entry().uri, "/c");
    }

    #[test]
    fn go_is_bounds_checked() {
        let mut source = MemorySource::new();
        assert!(!source.go(-1));
        assert!(!source.go(1));
        source
            .push(HistoryEntry::new("/a", Value::Null, "1"))
            .unwrap();
        assert!(source.go(-1));
        assert_eq!(source.entry().uri, "/");
    }

    #[test]
    fn exhausted_budget_rejects_writes_but_not_assign() {
        let mut source = MemorySource::new().with_write_budget(1);
        source
            .push(HistoryEntry::new("/a", Value::Null, "1"))
            .unwrap();
        let err = source
            .push(HistoryEntry::new("/b", Value::Null, "2"))
            .unwrap_err();
        assert!(matches!(
            err,
            HistoryError::WriteBudgetExhausted { operation: "push" }
        ));
        source.assign(HistoryEntry::new("/b", Value::Null, "2"));
        assert_eq!(source.entry().uri, "/b");
    }
}
