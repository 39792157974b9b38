use crate::scheduler::Scheduler;
use core_types::JobId;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A job registered with a scheduler.
pub struct Effect {
    job: JobId,
    scheduler: Rc<dyn Scheduler>,
    active: Cell<bool>,
}

/// Register `job` to run through `scheduler` whenever the returned effect is
/// triggered. Dropping every strong reference or calling [`Effect::dispose`]
/// ends the registration.
pub fn register_effect(job: JobId, scheduler: Rc<dyn Scheduler>) -> Rc<Effect> {
    Rc::new(Effect {
        job,
        scheduler,
        active: Cell::new(true),
    })
}

impl Effect {
    pub fn job(&self) -> JobId {
        self.job
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn trigger(&self) {
        if self.active.get() {
            self.scheduler.enqueue(self.job);
        }
    }

    pub fn dispose(&self) {
        self.active.set(false);
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("job", &self.job)
            .field("active", &self.active.get())
            .finish()
    }
}
