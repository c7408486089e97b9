//! Execution engine: one map → barrier → reduce run over a worker pool.

use std::sync::Arc;

use anyhow::{ensure, Result};
use itertools::Itertools;
use tracing::{debug, warn};

use crate::partition::PartitionStore;
use crate::pool::WorkerPool;
use crate::{Mapper, Reducer};

/// Per-run shared state: the partition array and the registered reducer.
///
/// One context is created per [`run`] and dropped at its end; concurrent
/// runs never share a context.
struct ExecutionContext {
    store: PartitionStore,
    reducer: Box<dyn Reducer>,
}

/// The emit interface handed to mappers, valid only for the duration of
/// the map call that receives it.
pub struct Emitter<'a> {
    store: &'a PartitionStore,
}

impl Emitter<'_> {
    /// Route `(key, value)` to its partition and append it under that
    /// partition's lock.
    pub fn emit(&self, key: impl Into<String>, value: impl Into<String>) {
        self.store.append(key.into(), value.into());
    }
}

/// Pull iterator over one contiguous equal-key run within a partition,
/// most-recently-emitted value first.
///
/// Reads through the partition guard already held by the enclosing
/// reduce job; it never takes a lock of its own, so it cannot deadlock
/// against the reduce loop. `next` returns `None` at exhaustion rather
/// than blocking.
pub struct RunValues<'a> {
    values: Box<dyn Iterator<Item = &'a str> + 'a>,
}

impl<'a> Iterator for RunValues<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.values.next()
    }
}

/// Execute one complete MapReduce run and block until it finishes.
///
/// Schedules one map job per input unit, waits for the map barrier,
/// schedules one reduce job per partition, waits again, and joins the
/// pool before returning. A mapper that fails (an unreadable input,
/// say) contributes nothing and does not abort the run.
pub fn run<I, M, R>(
    inputs: impl IntoIterator<Item = I>,
    mapper: M,
    reducer: R,
    num_workers: usize,
    num_partitions: u32,
) -> Result<()>
where
    I: Send + 'static,
    M: Mapper<I> + 'static,
    R: Reducer + 'static,
{
    ensure!(num_workers > 0, "a run needs at least one worker");
    ensure!(num_partitions > 0, "a run needs at least one partition");

    let ctx = Arc::new(ExecutionContext {
        store: PartitionStore::new(num_partitions),
        reducer: Box::new(reducer),
    });
    let mapper = Arc::new(mapper);
    let mut pool = WorkerPool::new(num_workers)?;

    debug!(num_workers, num_partitions, "map phase starting");
    let mut map_tasks = 0usize;
    for input in inputs {
        let ctx = Arc::clone(&ctx);
        let mapper = Arc::clone(&mapper);
        pool.schedule(move || {
            let out = Emitter { store: &ctx.store };
            if let Err(err) = mapper.map(input, &out) {
                warn!("map task failed, emitting nothing: {:#}", err);
            }
        });
        map_tasks += 1;
    }
    pool.wait_idle();

    debug!(map_tasks, "map phase complete, reduce phase starting");
    for index in 0..num_partitions {
        let ctx = Arc::clone(&ctx);
        pool.schedule(move || {
            if let Err(err) = reduce_partition(&ctx, index) {
                warn!(partition = index, "reduce task failed: {:#}", err);
            }
        });
    }
    pool.wait_idle();

    debug!("reduce phase complete");
    pool.shutdown();
    Ok(())
}

/// Drain one partition: hold its lock for the whole pass, walk the
/// entries newest-first, and invoke the reducer once per maximal
/// contiguous equal-key run.
///
/// A key whose entries sit in two non-adjacent runs (mapper threads
/// interleaved their emits) gets one reducer invocation per run, each
/// seeing only that run's values. Merging across runs would need a sort
/// pass first and is deliberately not done here.
fn reduce_partition(ctx: &ExecutionContext, index: u32) -> Result<()> {
    let entries = ctx.store.lock(index);
    for (key, group) in &entries.iter().rev().chunk_by(|kv| kv.key()) {
        let mut values = RunValues {
            values: Box::new(group.map(|kv| kv.value())),
        };
        ctx.reducer.reduce(key, &mut values)?;
    }
    Ok(())
}
