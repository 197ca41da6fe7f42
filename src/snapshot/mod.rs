// Snapshot management for reverse execution

use crate::memory::VariableStore;
use crate::parser::ast::SourceLocation;

/// Fixed cost charged for every snapshot on top of its store
const SNAPSHOT_OVERHEAD: usize = 64;

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub store: VariableStore,
    pub source_location: SourceLocation,
    pub steps_executed: u64,
    /// Variable written by the step that produced this snapshot
    pub last_written: Option<String>,
}

impl Snapshot {
    pub fn new(
        store: VariableStore,
        source_location: SourceLocation,
        steps_executed: u64,
        last_written: Option<String>,
    ) -> Self {
        Snapshot {
            store,
            source_location,
            steps_executed,
            last_written,
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        let name_size = self.last_written.as_ref().map_or(0, String::len);
        SNAPSHOT_OVERHEAD + self.store.estimated_size() + name_size
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(vars: &[&str]) -> Snapshot {
        let mut store = VariableStore::new();
        for var in vars {
            store.increment(var);
        }
        Snapshot::new(store, SourceLocation::new(1, 1), 0, None)
    }

    #[test]
    fn test_push_and_get() {
        let mut manager = SnapshotManager::new(1024 * 1024);
        manager.push(snapshot_with(&["x"])).unwrap();
        manager.push(snapshot_with(&["x", "y"])).unwrap();

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get(1).map(|s| s.store.len()), Some(2));
        assert!(manager.get(2).is_none());
        assert!(manager.memory_usage() > 0);
    }

    #[test]
    fn test_memory_limit() {
        let snapshot = snapshot_with(&["counter"]);
        let size = snapshot.estimated_size();
        let mut manager = SnapshotManager::new(size * 2);

        manager.push(snapshot.clone()).unwrap();
        manager.push(snapshot.clone()).unwrap();
        assert!(manager.push(snapshot).is_err());
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.memory_usage(), size * 2);
    }
}
