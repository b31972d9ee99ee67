// taskd: Task Table — bounded slot array of active task instances

// ACCEPTABLE: expect()/unwrap() here guard invariants established by the
// caller holding the same lock acquisition, and test code (see error.rs).
#![allow(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::catalog::TaskParameters;

/// One admitted task instance. Several instances of the same name may
/// coexist, each in its own slot with its own executor.
pub struct TaskInstance {
    pub name: String,
    pub parameters: TaskParameters,
    /// Shared with the spawned executor task; the executor polls this at the
    /// top of its loop and exits once it is cleared.
    pub active: Arc<AtomicBool>,
    pub executor_handle: JoinHandle<()>,
}

/// Fixed-size set of `max_threads` slots guarded by a single mutex in `Server`.
/// `TaskTable` itself holds no lock — callers serialize access to it through
/// `Server::table`.
pub struct TaskTable {
    slots: Vec<Option<TaskInstance>>,
}

/// Returned by `admit` to tell the caller exactly which slot to populate.
pub struct FreeSlot(pub usize);

impl TaskTable {
    pub fn new(max_threads: usize) -> Self {
        let mut slots = Vec::with_capacity(max_threads);
        slots.resize_with(max_threads, || None);
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn count_active(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Parameters of every currently active instance, for the admission controller's RTA pass.
    pub fn snapshot_active_parameters(&self) -> Vec<TaskParameters> {
        self.slots
            .iter()
            .filter_map(|s| s.as_ref().map(|i| i.parameters))
            .collect()
    }

    /// Finds a free slot index without mutating anything, so the caller can
    /// run RTA and then call `insert` under the *same* lock acquisition —
    /// checking capacity and reserving a slot in one step closes the window
    /// where two admissions could both see a free slot and race to fill it.
    pub fn find_free_slot(&self) -> Option<FreeSlot> {
        self.slots.iter().position(|s| s.is_none()).map(FreeSlot)
    }

    /// Occupies a previously reserved free slot. Panics if `slot` is out of
    /// range or already occupied — both indicate a caller bug (the slot was
    /// found by `find_free_slot` under the same lock acquisition).
    pub fn insert(&mut self, slot: FreeSlot, instance: TaskInstance) {
        let existing = &mut self.slots[slot.0];
        assert!(existing.is_none(), "insert into occupied slot");
        *existing = Some(instance);
    }

    /// Marks every slot whose instance is named `name` inactive and removes
    /// it from the table, returning the join handles so the caller can
    /// `.await` them outside the lock.
    pub fn take_inactive_by_name(&mut self, name: &str) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        for slot in &mut self.slots {
            let matches = slot.as_ref().is_some_and(|i| i.name == name);
            if matches {
                let instance = slot.take().expect("checked Some above");
                instance.active.store(false, Ordering::SeqCst);
                handles.push(instance.executor_handle);
            }
        }
        handles
    }
}
