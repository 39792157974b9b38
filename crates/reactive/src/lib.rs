//! Reactive-system contract consumed by the reconciler.
//!
//! Three pieces:
//! - [`Scheduler`]: one operation, `enqueue(job)`. [`JobQueue`] is a manual-flush
//!   implementation that de-duplicates by [`JobId`](core_types::JobId).
//! - [`Effect`]: a registered job. Triggering it enqueues the job; disposing it
//!   makes later triggers no-ops.
//! - [`Reactive`]: a shallow reactive map. Writing a top-level key with a new
//!   value triggers every subscribed effect.
//!
//! The effect body is not stored here. Whoever owns the job id runs the work when
//! the queue hands the id back.

mod effect;
mod reactive;
mod scheduler;

pub use crate::effect::{Effect, register_effect};
pub use crate::reactive::Reactive;
pub use crate::scheduler::{JobQueue, Scheduler};
