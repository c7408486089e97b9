//! Hash-partitioned intermediate store.
//!
//! Each partition owns its entries and its own lock; different
//! partitions never contend. A partition is written only during the map
//! phase and read only during the reduce phase; the run barrier keeps
//! the two from overlapping.

use std::sync::{Mutex, MutexGuard};

use crate::KeyValue;

/// Compute the partition index for `key` among `count` partitions.
///
/// Stable within a run: a key always routes to the same partition.
pub fn index_for(key: &str, count: u32) -> u32 {
    (djb2(key) % u64::from(count)) as u32
}

/// DJB2: start at 5381, then `hash = hash * 33 + byte` with wraparound.
fn djb2(key: &str) -> u64 {
    let mut hash: u64 = 5381;
    for byte in key.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    hash
}

/// Fixed array of independently-locked partitions.
///
/// Entries are pushed in emit order; readers walk them newest-first, so
/// list order within a partition is most-recently-emitted first.
pub struct PartitionStore {
    partitions: Vec<Mutex<Vec<KeyValue>>>,
}

impl PartitionStore {
    /// Create `count` empty partitions.
    pub fn new(count: u32) -> Self {
        let partitions = (0..count).map(|_| Mutex::new(Vec::new())).collect();
        Self { partitions }
    }

    /// The number of partitions.
    pub fn count(&self) -> u32 {
        self.partitions.len() as u32
    }

    /// Route `(key, value)` to its partition and append it under that
    /// partition's lock. Concurrent appends to different partitions do
    /// not block each other; appends to the same partition serialize.
    pub fn append(&self, key: String, value: String) {
        let index = index_for(&key, self.count());
        let mut entries = self.lock(index);
        entries.push(KeyValue::new(key, value));
    }

    /// Acquire partition `index`'s lock. Reduce jobs hold the returned
    /// guard for the whole time they process the partition.
    pub fn lock(&self, index: u32) -> MutexGuard<'_, Vec<KeyValue>> {
        self.partitions[index as usize]
            .lock()
            .expect("partition mutex poisoned")
    }
}
