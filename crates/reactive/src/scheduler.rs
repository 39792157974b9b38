use core_types::JobId;
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

/// External batching queue.
///
/// Guarantee: a job enqueued any number of times before it is handed out runs
/// once for that drain. Re-enqueueing after it was handed out queues it again.
pub trait Scheduler {
    fn enqueue(&self, job: JobId);
}

/// FIFO job queue drained by an explicit flush loop.
#[derive(Debug, Default)]
pub struct JobQueue {
    state: RefCell<QueueState>,
}

#[derive(Debug, Default)]
struct QueueState {
    order: VecDeque<JobId>,
    pending: HashSet<JobId>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the oldest pending job.
    pub fn pop(&self) -> Option<JobId> {
        let mut state = self.state.borrow_mut();
        let job = state.order.pop_front()?;
        state.pending.remove(&job);
        Some(job)
    }

    pub fn contains(&self, job: JobId) -> bool {
        self.state.borrow().pending.contains(&job)
    }

    /// Withdraw `job` if it is waiting. Returns whether it was.
    pub fn cancel(&self, job: JobId) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.pending.remove(&job) {
            return false;
        }
        state.order.retain(|queued| *queued != job);
        true
    }

    pub fn len(&self) -> usize {
        self.state.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().order.is_empty()
    }

    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.order.clear();
        state.pending.clear();
    }
}

impl Scheduler for JobQueue {
    fn enqueue(&self, job: JobId) {
        let mut state = self.state.borrow_mut();
        if state.pending.insert(job) {
            state.order.push_back(job);
            log::trace!(target: "reactive.queue", "enqueue job={} len={}", job.0, state.order.len());
        }
    }
}
