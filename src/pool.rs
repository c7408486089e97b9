//! Fixed-size worker pool over a shared FIFO job queue.
//!
//! The queue doubles as the phase barrier: [`WorkerPool::wait_idle`]
//! blocks until every scheduled job has finished, which is what keeps
//! the map and reduce phases of a run from overlapping.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use tracing::{trace, warn};

/// A unit of work: a closure run exactly once by some worker thread.
type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct QueueState {
    jobs: VecDeque<Job>,
    /// Jobs queued plus jobs currently executing. A job stays counted
    /// from `schedule` until its closure returns, so the barrier cannot
    /// observe an empty queue while a worker is still mid-job.
    outstanding: usize,
    stop: bool,
}

/// Shared FIFO of pending jobs, insertion order = execution order.
struct JobQueue {
    state: Mutex<QueueState>,
    /// Wakes one worker blocked on an empty queue.
    job_ready: Condvar,
    /// Wakes callers blocked in `wait_idle`.
    idle: Condvar,
}

impl JobQueue {
    fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            job_ready: Condvar::new(),
            idle: Condvar::new(),
        }
    }

    /// Append a job at the tail and wake one worker.
    ///
    /// Refused (the job is dropped) once shutdown has been requested.
    fn schedule(&self, job: Job) -> bool {
        let mut state = self.state.lock().expect("job queue mutex poisoned");
        if state.stop {
            return false;
        }
        state.jobs.push_back(job);
        state.outstanding += 1;
        self.job_ready.notify_one();
        true
    }

    /// Block until a job is available and dequeue it, or return `None`
    /// once stop is requested and the queue has drained. Jobs already
    /// queued at shutdown still run.
    fn next_job(&self) -> Option<Job> {
        let mut state = self.state.lock().expect("job queue mutex poisoned");
        loop {
            if let Some(job) = state.jobs.pop_front() {
                return Some(job);
            }
            if state.stop {
                return None;
            }
            state = self
                .job_ready
                .wait(state)
                .expect("job queue mutex poisoned");
        }
    }

    /// Mark one dequeued job as finished.
    fn job_done(&self) {
        let mut state = self.state.lock().expect("job queue mutex poisoned");
        state.outstanding -= 1;
        if state.outstanding == 0 {
            self.idle.notify_all();
        }
    }

    /// Barrier: block until the outstanding count, queued jobs plus jobs
    /// currently executing, reaches zero.
    fn wait_idle(&self) {
        let mut state = self.state.lock().expect("job queue mutex poisoned");
        while state.outstanding > 0 {
            state = self.idle.wait(state).expect("job queue mutex poisoned");
        }
    }

    fn request_stop(&self) {
        let mut state = self.state.lock().expect("job queue mutex poisoned");
        state.stop = true;
        self.job_ready.notify_all();
    }
}

/// Fixed set of worker threads bound to one [`JobQueue`] for their
/// lifetime. Created once per run, joined at run end.
pub struct WorkerPool {
    queue: Arc<JobQueue>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` worker threads draining a fresh queue.
    ///
    /// Thread spawn failure is fatal to the run; there is no recovery
    /// path.
    pub fn new(size: usize) -> Result<Self> {
        let queue = Arc::new(JobQueue::new());
        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let queue = Arc::clone(&queue);
            let handle = thread::Builder::new()
                .name(format!("mr-worker-{id}"))
                .spawn(move || worker_loop(id, &queue))
                .context("failed to spawn worker thread")?;
            workers.push(handle);
        }
        Ok(Self { queue, workers })
    }

    /// Queue `job` for execution on some worker.
    ///
    /// Returns `false` if the pool is shutting down. Once dequeued, a
    /// job is never retried or cancelled; it runs to completion.
    pub fn schedule<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.schedule(Box::new(job))
    }

    /// Block until all previously scheduled work, queued and in-flight,
    /// has finished.
    pub fn wait_idle(&self) {
        self.queue.wait_idle();
    }

    /// Stop accepting work, wake all blocked workers, and join every
    /// worker thread.
    pub fn shutdown(&mut self) {
        self.queue.request_stop();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("worker thread panicked");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.shutdown();
        }
    }
}

fn worker_loop(id: usize, queue: &JobQueue) {
    while let Some(job) = queue.next_job() {
        trace!(worker = id, "running job");
        job();
        queue.job_done();
    }
}
