//! Teleport: children live in a host node named by the `to` prop, not in the
//! teleport's own parent. A teleport occupies no host node in its parent's flow.

use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::vnode::{Children, TELEPORT_TARGET, VNode};
use core_types::NodeHandle;
use host::HostAdapter;

pub(crate) fn teleport_target(node: &VNode) -> Result<NodeHandle, RenderError> {
    node.props
        .get(TELEPORT_TARGET)
        .and_then(|value| value.as_node())
        .ok_or(RenderError::MissingTeleportTarget)
}

impl<H: HostAdapter> Renderer<H> {
    pub(crate) fn mount_teleport(&mut self, node: &mut VNode) -> Result<(), RenderError> {
        let target = teleport_target(node)?;
        match &mut node.children {
            Children::Text(_) => return Err(RenderError::TextInFragment),
            Children::Nodes(children) => {
                for child in children.iter_mut() {
                    self.patch(None, child, target, None)?;
                }
            }
            Children::None | Children::Slots(_) => {}
        }
        log::trace!(target: "vdom.diff", "teleport mounted into {target}");
        Ok(())
    }

    /// Reconcile inside the old target, then carry the children over when the
    /// target changed.
    pub(crate) fn patch_teleport(&mut self, old: &VNode, new: &mut VNode) -> Result<(), RenderError> {
        if matches!(new.children, Children::Text(_)) {
            return Err(RenderError::TextInFragment);
        }
        let from = teleport_target(old)?;
        let to = teleport_target(new)?;
        self.patch_children(&old.children, &mut new.children, from, None)?;
        if from != to {
            log::debug!(target: "vdom.diff", "teleport target {from} -> {to}");
            for child in new.child_nodes() {
                self.move_vnode(child, to, None)?;
            }
        }
        Ok(())
    }
}
