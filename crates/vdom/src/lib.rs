//! Virtual-tree reconciliation.
//!
//! [`Renderer::render`] takes a [`VNode`] tree and makes a host tree match it
//! through a [`host::HostAdapter`], reusing host nodes wherever the previous tree
//! allows. Child lists are reconciled by one of four [`DiffStrategy`]s.
//! Component nodes get a durable instance with reactive state, lifecycle hooks
//! and an update effect scheduled on the renderer's job queue.

mod component;
mod config;
mod context;
mod diff;
mod error;
mod keep_alive;
pub mod lis;
mod patch;
mod renderer;
mod teleport;
mod unmount;
mod vnode;

pub use crate::component::{
    Component, ComponentBuilder, ComponentInstance, ComponentKind, Hook, InstanceId,
    LifecyclePhase, Method, RenderFn, SetupFn, SetupResult,
};
pub use crate::config::RendererConfig;
pub use crate::context::{
    ATTRS_KEY, Binding, Emitter, PropsView, RenderContext, SLOTS_KEY, SetupContext, handler_key,
};
pub use crate::diff::DiffStrategy;
pub use crate::error::RenderError;
pub use crate::renderer::Renderer;
pub use crate::vnode::{
    Children, DEFAULT_SLOT, KeepAliveFlags, Key, Slot, Slots, TELEPORT_TARGET, VNode, VNodeKind,
    is_reusable, same_type,
};
