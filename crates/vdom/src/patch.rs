//! Recursive patch engine.
//!
//! Contract:
//! - `patch(old, new, parent, anchor)` reconciles one tree position inside
//!   `parent`, inserting before `anchor` when something is mounted.
//! - A type change unmounts `old` first, then mounts `new` at `anchor`.
//! - Every reused node takes its `el` (and `component`) from its old counterpart.
//! - Host failures propagate unchanged.
//!
//! The host contract has no sibling query, so anchors come from the virtual side:
//! [`Renderer::first_host`] finds the first host node a subtree occupies.

use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::vnode::{Children, VNode, VNodeKind, same_type};
use core_types::{NodeHandle, PropMap, Value};
use host::{HostAdapter, TEXT_CONTENT};
use std::sync::Arc;

impl<H: HostAdapter> Renderer<H> {
    pub(crate) fn patch(
        &mut self,
        old: Option<&VNode>,
        new: &mut VNode,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let old = match old {
            Some(old) if !same_type(old, new) => {
                log::trace!(
                    target: "vdom.diff",
                    "replace {} with {} in {parent}",
                    old.kind.label(),
                    new.kind.label()
                );
                self.unmount(old, parent)?;
                None
            }
            other => other,
        };

        match &new.kind {
            VNodeKind::Element(tag) => {
                let tag = Arc::clone(tag);
                match old {
                    None => self.mount_element(&tag, new, parent, anchor),
                    Some(old) => self.patch_element(old, new),
                }
            }
            VNodeKind::Text => match old {
                None => {
                    let el = self.host.create_text_node(new.text_content())?;
                    new.el = Some(el);
                    self.host.insert(el, parent, anchor)?;
                    Ok(())
                }
                Some(old) => {
                    let el = old.el.ok_or(RenderError::MissingElement("text"))?;
                    new.el = Some(el);
                    if old.text_content() != new.text_content() {
                        self.host.set_text(el, new.text_content())?;
                    }
                    Ok(())
                }
            },
            VNodeKind::Comment => Ok(()),
            VNodeKind::Fragment => self.patch_fragment(old, new, parent, anchor),
            VNodeKind::Component(def) => {
                let def = def.clone();
                match old {
                    None => self.mount_component(def, new, parent, anchor),
                    Some(old) => self.patch_component(old, new, parent, anchor),
                }
            }
            VNodeKind::Teleport => match old {
                None => self.mount_teleport(new),
                Some(old) => self.patch_teleport(old, new),
            },
        }
    }

    fn mount_element(
        &mut self,
        tag: &str,
        node: &mut VNode,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let el = self.host.create_node(tag)?;
        node.el = Some(el);
        for (key, value) in &node.props {
            self.host.set_prop(el, key, None, Some(value))?;
        }
        match &mut node.children {
            Children::Text(text) => {
                let text = Value::from(text.as_str());
                self.host.set_prop(el, TEXT_CONTENT, None, Some(&text))?;
            }
            Children::Nodes(children) => {
                for child in children.iter_mut() {
                    self.patch(None, child, el, None)?;
                }
            }
            Children::None | Children::Slots(_) => {}
        }
        self.host.insert(el, parent, anchor)?;
        Ok(())
    }

    fn patch_element(&mut self, old: &VNode, new: &mut VNode) -> Result<(), RenderError> {
        let el = old.el.ok_or(RenderError::MissingElement("element"))?;
        new.el = Some(el);
        self.patch_props(el, &old.props, &new.props)?;
        self.patch_children(&old.children, &mut new.children, el, None)
    }

    /// Touch only keys whose value changed or disappeared.
    fn patch_props(
        &mut self,
        el: NodeHandle,
        prev: &PropMap,
        next: &PropMap,
    ) -> Result<(), RenderError> {
        for (key, value) in next {
            let before = prev.get(key);
            if before != Some(value) {
                self.host.set_prop(el, key, before, Some(value))?;
            }
        }
        for (key, value) in prev {
            if !next.contains_key(key) {
                self.host.set_prop(el, key, Some(value), None)?;
            }
        }
        Ok(())
    }

    /// Reconcile the children of one element. `end_anchor` is the host node that
    /// follows the list, or `None` when the list runs to the end of `parent`.
    pub(crate) fn patch_children(
        &mut self,
        old: &Children,
        new: &mut Children,
        parent: NodeHandle,
        end_anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        match (old, new) {
            (Children::Nodes(old), Children::Nodes(new)) => {
                self.reconcile_children(old, new, parent, end_anchor)
            }
            (old, Children::Text(text)) => {
                if let Children::Nodes(old) = old {
                    for child in old {
                        self.unmount(child, parent)?;
                    }
                }
                let prev = match old {
                    Children::Text(prev) => Some(prev),
                    _ => None,
                };
                if prev != Some(&*text) {
                    let prev = prev.map(|p| Value::from(p.as_str()));
                    let next = Value::from(text.as_str());
                    self.host
                        .set_prop(parent, TEXT_CONTENT, prev.as_ref(), Some(&next))?;
                }
                Ok(())
            }
            (old, Children::Nodes(new)) => {
                if let Children::Text(prev) = old {
                    let prev = Value::from(prev.as_str());
                    self.host
                        .set_prop(parent, TEXT_CONTENT, Some(&prev), None)?;
                }
                for child in new.iter_mut() {
                    self.patch(None, child, parent, end_anchor)?;
                }
                Ok(())
            }
            (old, Children::None | Children::Slots(_)) => {
                match old {
                    Children::Nodes(old) => {
                        for child in old {
                            self.unmount(child, parent)?;
                        }
                    }
                    Children::Text(prev) => {
                        let prev = Value::from(prev.as_str());
                        self.host
                            .set_prop(parent, TEXT_CONTENT, Some(&prev), None)?;
                    }
                    Children::None | Children::Slots(_) => {}
                }
                Ok(())
            }
        }
    }

    fn patch_fragment(
        &mut self,
        old: Option<&VNode>,
        new: &mut VNode,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        if matches!(new.children, Children::Text(_)) {
            return Err(RenderError::TextInFragment);
        }
        match old {
            None => {
                if let Children::Nodes(children) = &mut new.children {
                    for child in children.iter_mut() {
                        self.patch(None, child, parent, anchor)?;
                    }
                }
                Ok(())
            }
            Some(old) => self.patch_children(&old.children, &mut new.children, parent, anchor),
        }
    }

    /// First host node the subtree occupies, in host order.
    ///
    /// Comments and teleports occupy none in their parent's flow.
    pub(crate) fn first_host(&self, node: &VNode) -> Option<NodeHandle> {
        match &node.kind {
            VNodeKind::Element(_) | VNodeKind::Text => node.el,
            VNodeKind::Comment | VNodeKind::Teleport => None,
            VNodeKind::Fragment => self.first_host_in(node.child_nodes()),
            VNodeKind::Component(_) => node.component.and_then(|id| self.instance_host(id)),
        }
    }

    pub(crate) fn first_host_in(&self, nodes: &[VNode]) -> Option<NodeHandle> {
        nodes.iter().find_map(|node| self.first_host(node))
    }

    /// Move every host node of a mounted subtree before `anchor`, keeping order.
    pub(crate) fn move_vnode(
        &mut self,
        node: &VNode,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        match &node.kind {
            VNodeKind::Element(_) | VNodeKind::Text => {
                let el = node.el.ok_or(RenderError::MissingElement(node.kind.label()))?;
                self.host.move_node(el, parent, anchor)?;
            }
            VNodeKind::Fragment => {
                for child in node.child_nodes() {
                    self.move_vnode(child, parent, anchor)?;
                }
            }
            VNodeKind::Component(_) => {
                let id = node.component.ok_or(RenderError::MissingInstance(None))?;
                self.move_instance(id, parent, anchor)?;
            }
            VNodeKind::Comment | VNodeKind::Teleport => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Renderer, VNode};
    use host::{HostOpKind, MemoryHost};

    fn setup() -> (Renderer<MemoryHost>, core_types::NodeHandle) {
        let mut host = MemoryHost::new();
        let root = host.create_container("div");
        (Renderer::new(host), root)
    }

    #[test]
    fn mount_element_applies_props_and_text() {
        let (mut r, root) = setup();
        r.render(
            Some(VNode::element("p").with_prop("id", "x").with_text("hello")),
            root,
        )
        .unwrap();
        assert_eq!(
            r.host().snapshot(root),
            vec!["<div>", "  <p id=\"x\">", "    \"hello\""]
        );
    }

    #[test]
    fn identical_tree_issues_no_writes() {
        let (mut r, root) = setup();
        let tree = || {
            VNode::element("ul").with_children([
                VNode::element("li").with_prop("class", "a").with_text("one"),
                VNode::element("li").with_children([VNode::text("two")]),
            ])
        };
        r.render(Some(tree()), root).unwrap();
        r.host_mut().clear_ops();
        r.render(Some(tree()), root).unwrap();
        assert!(r.host().ops().is_empty(), "{:?}", r.host().ops());
    }

    #[test]
    fn changed_text_sets_only_that_node() {
        let (mut r, root) = setup();
        r.render(Some(VNode::element("p").with_children([VNode::text("a")])), root)
            .unwrap();
        r.host_mut().clear_ops();
        r.render(Some(VNode::element("p").with_children([VNode::text("b")])), root)
            .unwrap();
        assert_eq!(r.host().count(HostOpKind::SetText), 1);
        assert_eq!(r.host().ops().len(), 1);
    }

    #[test]
    fn removed_prop_is_cleared() {
        let (mut r, root) = setup();
        r.render(
            Some(VNode::element("p").with_prop("a", 1).with_prop("b", 2)),
            root,
        )
        .unwrap();
        r.host_mut().clear_ops();
        r.render(Some(VNode::element("p").with_prop("a", 1)), root)
            .unwrap();
        assert_eq!(r.host().count(HostOpKind::SetProp), 1);
        let p = r.host().children(root)[0];
        assert_eq!(r.host().prop(p, "b"), None);
    }

    #[test]
    fn type_change_replaces_node() {
        let (mut r, root) = setup();
        r.render(Some(VNode::element("p").with_text("x")), root)
            .unwrap();
        r.render(Some(VNode::element("span").with_text("x")), root)
            .unwrap();
        assert_eq!(r.host().snapshot(root), vec!["<div>", "  <span>", "    \"x\""]);
    }

    #[test]
    fn text_and_list_children_switch() {
        let (mut r, root) = setup();
        r.render(Some(VNode::element("p").with_text("plain")), root)
            .unwrap();
        r.render(
            Some(VNode::element("p").with_children([VNode::text("a"), VNode::text("b")])),
            root,
        )
        .unwrap();
        assert_eq!(r.host().text_content(root), "ab");
        r.render(Some(VNode::element("p").with_text("again")), root)
            .unwrap();
        let p = r.host().children(root)[0];
        assert!(r.host().children(p).is_empty());
        assert_eq!(r.host().text_content(root), "again");
    }

    #[test]
    fn fragment_mounts_children_in_parent() {
        let (mut r, root) = setup();
        r.render(
            Some(VNode::fragment([
                VNode::element("a"),
                VNode::comment("gap"),
                VNode::element("b"),
            ])),
            root,
        )
        .unwrap();
        assert_eq!(r.host().children(root).len(), 2);
        r.render(Some(VNode::fragment([VNode::element("a")])), root)
            .unwrap();
        assert_eq!(r.host().snapshot(root), vec!["<div>", "  <a>"]);
    }

    #[test]
    fn fragment_rejects_text_children() {
        let (mut r, root) = setup();
        let mut node = VNode::fragment(Vec::<VNode>::new());
        node.children = crate::Children::Text("bad".into());
        assert_eq!(
            r.render(Some(node), root),
            Err(crate::RenderError::TextInFragment)
        );
    }
}
