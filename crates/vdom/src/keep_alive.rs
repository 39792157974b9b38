//! Keep-alive container.
//!
//! The container renders its default slot itself. A component child is marked
//! `should_keep_alive` so unmount parks it in an offscreen host node instead of
//! destroying it, and a child whose descriptor is already cached is marked
//! `kept_alive` so mount moves the parked subtree back instead of constructing a
//! new instance.
//!
//! The cache holds one entry per descriptor. Two children of the same descriptor
//! share that entry.

use crate::component::{Component, InstanceId, LifecyclePhase};
use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::vnode::{Children, DEFAULT_SLOT, VNode, VNodeKind};
use core_types::NodeHandle;
use host::HostAdapter;

#[derive(Debug)]
pub(crate) struct KeepAliveState {
    pub(crate) cache: Vec<(Component, InstanceId)>,
    /// Detached host node holding deactivated subtrees.
    pub(crate) storage: NodeHandle,
}

impl KeepAliveState {
    pub(crate) fn new(storage: NodeHandle) -> Self {
        Self {
            cache: Vec::new(),
            storage,
        }
    }
}

impl<H: HostAdapter> Renderer<H> {
    pub(crate) fn render_keep_alive(&self, id: InstanceId) -> Result<VNode, RenderError> {
        let instance = self
            .instances
            .get(id)
            .ok_or(RenderError::MissingInstance(Some(id)))?;
        let state = instance
            .keep_alive
            .as_ref()
            .ok_or(RenderError::MissingInstance(Some(id)))?;
        let mut children = instance.ctx.slot(DEFAULT_SLOT).into_iter();
        let Some(mut child) = children.next() else {
            return Ok(VNode::comment("keep-alive"));
        };
        if children.next().is_some() {
            log::warn!(target: "vdom.component", "keep-alive renders only its first child");
        }
        let VNodeKind::Component(def) = &child.kind else {
            return Ok(child);
        };

        let cached = state
            .cache
            .iter()
            .find(|(cached, cid)| cached.ptr_eq(def) && self.instances.contains_key(*cid))
            .map(|(_, cid)| *cid);
        if let Some(cached) = cached {
            child.component = Some(cached);
            child.keep_alive.kept_alive = true;
        }
        child.keep_alive.should_keep_alive = true;
        child.keep_alive.owner = Some(id);
        Ok(child)
    }

    /// Record a freshly mounted child in its keep-alive owner's cache.
    pub(crate) fn remember_kept_alive(&mut self, owner: InstanceId, def: &Component, id: InstanceId) {
        let Some(state) = self
            .instances
            .get_mut(owner)
            .and_then(|o| o.keep_alive.as_mut())
        else {
            return;
        };
        state.cache.retain(|(cached, _)| !cached.ptr_eq(def));
        state.cache.push((def.clone(), id));
        log::trace!(target: "vdom.component", "keep-alive {owner:?} caches {} as {id:?}", def.name());
    }

    /// Bring a parked instance back under `parent`.
    pub(crate) fn activate(
        &mut self,
        id: InstanceId,
        node: &mut VNode,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        self.fire(id, LifecyclePhase::Activated);
        self.move_instance(id, parent, anchor)?;
        self.update_instance_props(id, &node.props)?;
        if let Children::Slots(slots) = &node.children {
            if let Some(instance) = self.instances.get(id) {
                instance.ctx.replace_slots(slots.clone());
            }
        }
        self.rerender_pending(id, anchor)?;
        node.el = self.instance_host(id);
        log::debug!(target: "vdom.component", "activate {id:?} into {parent}");
        Ok(())
    }

    /// Park an instance in its owner's storage node without destroying it.
    pub(crate) fn deactivate(&mut self, id: InstanceId, owner: InstanceId) -> Result<(), RenderError> {
        let storage = self
            .instances
            .get(owner)
            .and_then(|o| o.keep_alive.as_ref())
            .map(|state| state.storage)
            .ok_or(RenderError::MissingInstance(Some(owner)))?;
        self.fire(id, LifecyclePhase::Deactivated);
        self.move_instance(id, storage, None)?;
        log::debug!(target: "vdom.component", "deactivate {id:?} into storage {storage}");
        Ok(())
    }

    /// Whether `owner` is a live keep-alive instance.
    pub(crate) fn is_keep_alive_owner(&self, owner: InstanceId) -> bool {
        self.instances
            .get(owner)
            .is_some_and(|o| o.keep_alive.is_some())
    }
}
