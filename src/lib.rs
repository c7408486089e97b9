//! A single-machine MapReduce execution engine.
//!
//! Users specify map and reduce tasks, which a fixed pool of worker
//! threads executes against a hash-partitioned, in-memory intermediate
//! store. A run is one map phase, a barrier, and one reduce phase; all
//! data stays on the local machine, unlike Hadoop or GFS.

use std::sync::Arc;

use anyhow::Result;

pub mod cmd;
pub mod engine;
pub mod partition;
pub mod pool;
pub mod workload;

pub use engine::{run, Emitter, RunValues};

/////////////////////////////////////////////////////////////////////////////
// MapReduce application types
/////////////////////////////////////////////////////////////////////////////

/// A map task over one input unit of type `I` (for the built-in
/// workloads, a file path).
///
/// The mapper produces zero or more key-value pairs by calling
/// [`Emitter::emit`] on the emitter it is handed. The emitter borrows
/// run state, so emitting after `map` returns is impossible.
///
/// An error return is local to that input: the engine logs it, the
/// mapper contributes nothing, and the run continues.
pub trait Mapper<I>: Send + Sync {
    fn map(&self, input: I, out: &Emitter<'_>) -> Result<()>;
}

/// A reduce task for one contiguous run of a key within a partition.
///
/// The reducer pulls that run's values from [`RunValues`] until
/// exhaustion and then produces its externally-visible output (the
/// built-in workloads print to stdout).
pub trait Reducer: Send + Sync {
    fn reduce(&self, key: &str, values: &mut RunValues<'_>) -> Result<()>;
}

impl<I, M> Mapper<I> for Arc<M>
where
    M: Mapper<I> + ?Sized,
{
    fn map(&self, input: I, out: &Emitter<'_>) -> Result<()> {
        (**self).map(input, out)
    }
}

impl<R> Reducer for Arc<R>
where
    R: Reducer + ?Sized,
{
    fn reduce(&self, key: &str, values: &mut RunValues<'_>) -> Result<()> {
        (**self).reduce(key, values)
    }
}

/// Adapter turning a plain closure or `fn` into a [`Mapper`].
pub struct MapFn<F>(pub F);

impl<I, F> Mapper<I> for MapFn<F>
where
    F: Fn(I, &Emitter<'_>) -> Result<()> + Send + Sync,
{
    fn map(&self, input: I, out: &Emitter<'_>) -> Result<()> {
        (self.0)(input, out)
    }
}

/// Adapter turning a plain closure or `fn` into a [`Reducer`].
pub struct ReduceFn<F>(pub F);

impl<F> Reducer for ReduceFn<F>
where
    F: Fn(&str, &mut RunValues<'_>) -> Result<()> + Send + Sync,
{
    fn reduce(&self, key: &str, values: &mut RunValues<'_>) -> Result<()> {
        (self.0)(key, values)
    }
}

/// A map reduce application: a mapper over file paths plus a reducer.
#[derive(Clone)]
pub struct Workload {
    pub mapper: Arc<dyn Mapper<String>>,
    pub reducer: Arc<dyn Reducer>,
}

/////////////////////////////////////////////////////////////////////////////
// Key-value pairs
/////////////////////////////////////////////////////////////////////////////

/// A single intermediate key-value pair.
///
/// Immutable once emitted; owned by exactly one partition until run
/// teardown.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct KeyValue {
    /// The key.
    pub key: String,
    /// The value.
    pub value: String,
}

impl KeyValue {
    /// Construct a new key-value pair from the given key and value.
    pub fn new(key: String, value: String) -> Self {
        Self { key, value }
    }

    /// Get the key of this key-value pair.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value of this key-value pair.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }
}
