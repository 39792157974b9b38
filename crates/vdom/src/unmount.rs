//! Tearing subtrees down.
//!
//! Only the outermost host node of a removed subtree is detached; its
//! descendants leave with it. Teleported children are the exception: they live
//! elsewhere and are always detached from their target. A component owned by a
//! live keep-alive is parked instead of destroyed.

use crate::component::{InstanceId, LifecyclePhase};
use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::teleport::teleport_target;
use crate::vnode::{VNode, VNodeKind};
use core_types::NodeHandle;
use host::HostAdapter;

impl<H: HostAdapter> Renderer<H> {
    pub(crate) fn unmount(&mut self, node: &VNode, parent: NodeHandle) -> Result<(), RenderError> {
        self.unmount_with(node, parent, true, false)
    }

    /// `detach`: remove this subtree's outer host nodes from `parent`.
    /// `destroy`: tear components down even when a keep-alive owns them.
    fn unmount_with(
        &mut self,
        node: &VNode,
        parent: NodeHandle,
        detach: bool,
        destroy: bool,
    ) -> Result<(), RenderError> {
        match &node.kind {
            VNodeKind::Element(_) => {
                let el = node.el.ok_or(RenderError::MissingElement("element"))?;
                for child in node.child_nodes() {
                    self.unmount_with(child, el, false, destroy)?;
                }
                if detach {
                    self.host.remove(el, parent)?;
                }
            }
            VNodeKind::Text => {
                if detach {
                    let el = node.el.ok_or(RenderError::MissingElement("text"))?;
                    self.host.remove(el, parent)?;
                }
            }
            VNodeKind::Comment => {}
            VNodeKind::Fragment => {
                for child in node.child_nodes() {
                    self.unmount_with(child, parent, detach, destroy)?;
                }
            }
            VNodeKind::Teleport => {
                let target = teleport_target(node)?;
                for child in node.child_nodes() {
                    self.unmount_with(child, target, true, destroy)?;
                }
            }
            VNodeKind::Component(_) => {
                let id = node.component.ok_or(RenderError::MissingInstance(None))?;
                let flags = &node.keep_alive;
                if !destroy && flags.should_keep_alive {
                    if let Some(owner) = flags.owner.filter(|o| self.is_keep_alive_owner(*o)) {
                        return self.deactivate(id, owner);
                    }
                }
                self.destroy_instance(id, detach, destroy)?;
            }
        }
        Ok(())
    }

    /// Unmount an instance's sub-tree, fire `unmounted`, and free the instance.
    ///
    /// Destroying a keep-alive also destroys every instance parked in its cache.
    fn destroy_instance(
        &mut self,
        id: InstanceId,
        detach: bool,
        destroy: bool,
    ) -> Result<(), RenderError> {
        let Some(instance) = self.instances.get_mut(id) else {
            return Err(RenderError::MissingInstance(Some(id)));
        };
        let tree = instance.sub_tree.take();
        let keep_alive = instance.keep_alive.take();
        let container = instance.container;
        let destroy_children = destroy || keep_alive.is_some();

        if let Some(tree) = &tree {
            self.unmount_with(tree, container, detach, destroy_children)?;
        }
        if let Some(state) = keep_alive {
            for (_, cached) in state.cache {
                if cached != id && self.instances.contains_key(cached) {
                    self.destroy_instance(cached, true, true)?;
                }
            }
        }

        self.fire(id, LifecyclePhase::Unmounted);
        if let Some(instance) = self.instances.remove(id) {
            instance.effect.dispose();
            log::debug!(target: "vdom.component", "unmount {} {id:?}", instance.def.name());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Component, Renderer, VNode};
    use host::{HostOpKind, MemoryHost};

    #[test]
    fn only_the_outermost_node_is_removed() {
        let mut host = MemoryHost::new();
        let root = host.create_container("div");
        let mut r = Renderer::new(host);
        let tree = VNode::element("ul").with_children([
            VNode::element("li").with_text("a"),
            VNode::element("li").with_children([VNode::text("b")]),
        ]);
        r.render(Some(tree), root).unwrap();
        r.host_mut().clear_ops();
        r.render(None, root).unwrap();
        assert_eq!(r.host().count(HostOpKind::Remove), 1);
        assert!(r.host().children(root).is_empty());
        assert_eq!(r.host().live_count(), 1);
    }

    #[test]
    fn component_instance_is_freed() {
        let leaf = Component::builder("Leaf")
            .render(|_| VNode::element("i"))
            .build();
        let mut host = MemoryHost::new();
        let root = host.create_container("div");
        let mut r = Renderer::new(host);
        r.render(Some(VNode::component(&leaf)), root).unwrap();
        assert_eq!(r.instance_count(), 1);
        r.render(None, root).unwrap();
        assert_eq!(r.instance_count(), 0);
        assert!(r.host().children(root).is_empty());
    }
}
