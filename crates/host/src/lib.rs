//! Host-tree side of the reconciler.
//!
//! The reconciler never touches a concrete tree. It talks to a [`HostAdapter`],
//! a capability set of exactly seven operations. [`MemoryHost`] is the reference
//! adapter: an arena-backed tree that records every call as a [`HostOp`].

mod adapter;
mod memory;
mod op;

pub use crate::adapter::{HostAdapter, HostError, TEXT_CONTENT};
pub use crate::memory::MemoryHost;
pub use crate::op::{HostOp, HostOpKind};
