use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::vnode::VNode;
use core_types::NodeHandle;
use host::HostAdapter;

impl<H: HostAdapter> Renderer<H> {
    /// Pair children by position, then mount or unmount the longer tail.
    pub(crate) fn diff_unkeyed(
        &mut self,
        old: &[VNode],
        new: &mut [VNode],
        parent: NodeHandle,
        end_anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let common = old.len().min(new.len());
        for i in 0..common {
            // Old siblings after `i` are still in place, so they bound position `i`.
            let anchor = self.first_host_in(&old[i + 1..]).or(end_anchor);
            self.patch(Some(&old[i]), &mut new[i], parent, anchor)?;
        }
        for node in &mut new[common..] {
            self.patch(None, node, parent, end_anchor)?;
        }
        for node in &old[common..] {
            self.unmount(node, parent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{DiffStrategy, Renderer, RendererConfig, VNode};
    use host::{HostOpKind, MemoryHost};

    fn list(items: &[&str]) -> VNode {
        VNode::element("ul").with_children(items.iter().map(|s| VNode::element("li").with_text(*s)))
    }

    #[test]
    fn positional_update_never_moves() {
        let mut host = MemoryHost::new();
        let root = host.create_container("div");
        let mut r = Renderer::with_config(host, RendererConfig::with_strategy(DiffStrategy::Unkeyed));
        r.render(Some(list(&["a", "b", "c"])), root).unwrap();
        r.host_mut().clear_ops();
        r.render(Some(list(&["c", "b"])), root).unwrap();
        let ul = r.host().children(root)[0];
        assert_eq!(r.host().child_texts(ul), vec!["c", "b"]);
        assert_eq!(r.host().count(HostOpKind::Move), 0);
        assert_eq!(r.host().count(HostOpKind::Remove), 1);
        assert_eq!(r.host().count(HostOpKind::SetProp), 1);
    }

    #[test]
    fn longer_list_mounts_tail() {
        let mut host = MemoryHost::new();
        let root = host.create_container("div");
        let mut r = Renderer::new(host);
        r.render(Some(list(&["a"])), root).unwrap();
        r.render(Some(list(&["a", "b", "c"])), root).unwrap();
        let ul = r.host().children(root)[0];
        assert_eq!(r.host().child_texts(ul), vec!["a", "b", "c"]);
    }

    #[test]
    fn kind_change_mid_list_keeps_position() {
        let mut host = MemoryHost::new();
        let root = host.create_container("div");
        let mut r = Renderer::new(host);
        let before = VNode::element("ul").with_children([
            VNode::element("li").with_text("a"),
            VNode::element("li").with_text("b"),
            VNode::element("li").with_text("c"),
        ]);
        let after = VNode::element("ul").with_children([
            VNode::element("li").with_text("a"),
            VNode::element("p").with_text("B"),
            VNode::element("li").with_text("c"),
        ]);
        r.render(Some(before), root).unwrap();
        r.render(Some(after), root).unwrap();
        let ul = r.host().children(root)[0];
        assert_eq!(r.host().child_texts(ul), vec!["a", "B", "c"]);
    }
}
