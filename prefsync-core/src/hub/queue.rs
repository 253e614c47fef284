//! Serial Job Queue
//!
//! [`SerialQueue`] is the coordination context: a FIFO of jobs executed
//! strictly in submission order, never concurrently. It plays the role a UI
//! main queue plays on platforms that have one, without requiring an event
//! loop or an async runtime.
//!
//! # How It Works
//!
//! `submit` pushes the job and, if no drain is in progress, the submitting
//! thread becomes the drainer: it pops and runs jobs until the queue is
//! empty. If a drain is already running — on another thread, or re-entrantly
//! because a job submitted another job — `submit` just enqueues and returns
//! immediately.
//!
//! # Guarantees
//!
//! - For jobs A then B (any producers), A's effects are fully applied before
//!   B begins.
//! - At most one job runs at any instant; jobs get mutual exclusion on
//!   whatever state they share "for free".
//! - Submission never blocks on job execution from the caller's perspective
//!   beyond draining the current batch; re-entrant submission never
//!   deadlocks.
//!
//! Jobs run outside the queue lock, so a job may freely submit further jobs.
//! A panicking job is caught and logged; the drain continues with the next
//! job so one misbehaving listener cannot wedge the whole context.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};

use parking_lot::Mutex;
use tracing::error;

type Job = Box<dyn FnOnce() + Send>;

struct QueueState {
    jobs: VecDeque<Job>,
    draining: bool,
}

/// A FIFO job queue with strict submission-order execution.
pub struct SerialQueue {
    state: Mutex<QueueState>,
}

impl SerialQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                draining: false,
            }),
        }
    }

    /// Enqueue `job` and drain the queue unless a drain is already running.
    ///
    /// Ordering is guaranteed relative to other submissions, not wall-clock:
    /// when another thread is draining, this returns before `job` has run.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.state.lock();
        state.jobs.push_back(Box::new(job));

        if state.draining {
            return;
        }
        state.draining = true;

        loop {
            let Some(next) = state.jobs.pop_front() else {
                state.draining = false;
                return;
            };

            // Run outside the lock so jobs can submit re-entrantly.
            drop(state);
            if catch_unwind(AssertUnwindSafe(next)).is_err() {
                error!("queued job panicked; continuing with next job");
            }
            state = self.state.lock();
        }
    }

    /// Whether the queue has no pending jobs and no active drain.
    pub fn is_idle(&self) -> bool {
        let state = self.state.lock();
        !state.draining && state.jobs.is_empty()
    }
}

impl Default for SerialQueue {
    fn default() -> Self {
        Self::new()
    }
}
