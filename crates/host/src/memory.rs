use crate::adapter::{HostAdapter, HostError, TEXT_CONTENT};
use crate::op::{HostOp, HostOpKind};
use core_types::{NodeHandle, PropMap, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory host tree.
///
/// Invariants:
/// - Handles are allocated monotonically and never reused, so a stale handle
///   from a removed subtree reports `MissingNode` instead of aliasing a new node.
/// - A node has at most one parent; `insert` refuses attached nodes.
/// - Containers made with [`MemoryHost::create_container`] are set-up state and
///   are not recorded in the op log. Every adapter call is.
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<NodeRecord>,
    live: HashMap<NodeHandle, usize>,
    next_key: u32,
    ops: Vec<HostOp>,
}

#[derive(Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: Arc<str>,
        props: PropMap,
        text: Option<String>,
    },
    Text {
        text: String,
    },
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element to render into.
    pub fn create_container(&mut self, tag: &str) -> NodeHandle {
        self.alloc(NodeKind::Element {
            tag: Arc::from(tag),
            props: PropMap::new(),
            text: None,
        })
    }

    pub fn contains(&self, node: NodeHandle) -> bool {
        self.live.contains_key(&node)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.record(node).and_then(|record| record.parent)
    }

    pub fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.record(node)
            .map(|record| record.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn tag(&self, node: NodeHandle) -> Option<&str> {
        match &self.record(node)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }

    /// Text of a text node, or the `textContent` of an element.
    pub fn text_of(&self, node: NodeHandle) -> Option<&str> {
        match &self.record(node)?.kind {
            NodeKind::Element { text, .. } => text.as_deref(),
            NodeKind::Text { text } => Some(text),
        }
    }

    pub fn prop(&self, node: NodeHandle, key: &str) -> Option<&Value> {
        match &self.record(node)?.kind {
            NodeKind::Element { props, .. } => props.get(key),
            NodeKind::Text { .. } => None,
        }
    }

    /// Concatenated text of the subtree rooted at `node`.
    pub fn text_content(&self, node: NodeHandle) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// `text_content` of each direct child, in host order.
    pub fn child_texts(&self, node: NodeHandle) -> Vec<String> {
        self.children(node)
            .iter()
            .map(|child| self.text_content(*child))
            .collect()
    }

    /// Deterministic indented serialization of the subtree rooted at `node`.
    pub fn snapshot(&self, node: NodeHandle) -> Vec<String> {
        let mut lines = Vec::new();
        self.walk_snapshot(node, 0, &mut lines);
        lines
    }

    /// Invoke the `on<Event>` handler prop of `node`, if any.
    ///
    /// Returns whether a handler ran.
    pub fn dispatch(
        &self,
        node: NodeHandle,
        event: &str,
        args: &[Value],
    ) -> Result<bool, HostError> {
        let index = self.index(node)?;
        let key = handler_key(event);
        let handler = match &self.nodes[index].kind {
            NodeKind::Element { props, .. } => props
                .get(key.as_str())
                .and_then(Value::as_handler)
                .cloned(),
            NodeKind::Text { .. } => return Err(HostError::WrongNodeKind(node)),
        };
        let Some(handler) = handler else {
            log::debug!(target: "host.memory", "no {key} handler on {node}");
            return Ok(false);
        };
        handler.call(args);
        Ok(true)
    }

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn count(&self, kind: HostOpKind) -> usize {
        self.ops.iter().filter(|op| op.kind() == kind).count()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeHandle {
        self.next_key += 1;
        let key = NodeHandle(self.next_key);
        let index = self.nodes.len();
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        self.live.insert(key, index);
        key
    }

    fn record(&self, node: NodeHandle) -> Option<&NodeRecord> {
        self.live.get(&node).map(|&index| &self.nodes[index])
    }

    fn index(&self, node: NodeHandle) -> Result<usize, HostError> {
        if !node.is_valid() {
            return Err(HostError::InvalidHandle(node));
        }
        self.live
            .get(&node)
            .copied()
            .ok_or(HostError::MissingNode(node))
    }

    fn attach(
        &mut self,
        node: NodeHandle,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), HostError> {
        let parent_index = self.index(parent)?;
        let child_index = self.index(node)?;
        if parent == node || self.is_descendant(node, parent) {
            return Err(HostError::CycleDetected {
                parent,
                child: node,
            });
        }
        if !matches!(self.nodes[parent_index].kind, NodeKind::Element { .. }) {
            return Err(HostError::InvalidParent(parent));
        }
        if self.nodes[child_index].parent.is_some() {
            return Err(HostError::InvalidParent(node));
        }
        let position = match anchor {
            None => self.nodes[parent_index].children.len(),
            Some(before) => self.nodes[parent_index]
                .children
                .iter()
                .position(|k| *k == before)
                .ok_or(HostError::InvalidSibling { parent, before })?,
        };
        self.nodes[parent_index].children.insert(position, node);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    fn detach(&mut self, node: NodeHandle) -> Result<(), HostError> {
        let index = self.index(node)?;
        if let Some(parent) = self.nodes[index].parent.take() {
            let parent_index = self.index(parent)?;
            self.nodes[parent_index].children.retain(|k| *k != node);
        }
        Ok(())
    }

    fn release_subtree(&mut self, node: NodeHandle) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(index) = self.live.remove(&current) {
                stack.extend(self.nodes[index].children.drain(..));
            }
        }
    }

    fn is_descendant(&self, ancestor: NodeHandle, maybe_descendant: NodeHandle) -> bool {
        let Some(&index) = self.live.get(&ancestor) else {
            return false;
        };
        let mut stack: Vec<NodeHandle> = self.nodes[index].children.clone();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            if let Some(&child_index) = self.live.get(&current) {
                stack.extend(self.nodes[child_index].children.iter().copied());
            }
        }
        false
    }

    fn collect_text(&self, node: NodeHandle, out: &mut String) {
        let Some(record) = self.record(node) else {
            return;
        };
        match &record.kind {
            NodeKind::Text { text } => out.push_str(text),
            NodeKind::Element { text, .. } => {
                if let Some(text) = text {
                    out.push_str(text);
                }
                for child in &record.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn walk_snapshot(&self, node: NodeHandle, depth: usize, lines: &mut Vec<String>) {
        let Some(record) = self.record(node) else {
            return;
        };
        let indent = "  ".repeat(depth);
        match &record.kind {
            NodeKind::Text { text } => lines.push(format!("{indent}{text:?}")),
            NodeKind::Element { tag, props, text } => {
                let mut line = format!("{indent}<{tag}");
                for (key, value) in props {
                    match value {
                        Value::Str(v) => line.push_str(&format!(" {key}={v:?}")),
                        other => line.push_str(&format!(" {key}={other}")),
                    }
                }
                line.push('>');
                lines.push(line);
                if let Some(text) = text {
                    lines.push(format!("{indent}  {text:?}"));
                }
                for child in &record.children {
                    self.walk_snapshot(*child, depth + 1, lines);
                }
            }
        }
    }
}

impl HostAdapter for MemoryHost {
    fn create_node(&mut self, tag: &str) -> Result<NodeHandle, HostError> {
        let tag: Arc<str> = Arc::from(tag);
        let node = self.alloc(NodeKind::Element {
            tag: Arc::clone(&tag),
            props: PropMap::new(),
            text: None,
        });
        self.ops.push(HostOp::CreateNode { node, tag });
        Ok(node)
    }

    fn create_text_node(&mut self, text: &str) -> Result<NodeHandle, HostError> {
        let node = self.alloc(NodeKind::Text {
            text: text.to_string(),
        });
        self.ops.push(HostOp::CreateText {
            node,
            text: text.to_string(),
        });
        Ok(node)
    }

    fn set_text(&mut self, node: NodeHandle, text: &str) -> Result<(), HostError> {
        let index = self.index(node)?;
        match &mut self.nodes[index].kind {
            NodeKind::Text { text: existing } => {
                existing.clear();
                existing.push_str(text);
            }
            NodeKind::Element { .. } => return Err(HostError::WrongNodeKind(node)),
        }
        self.ops.push(HostOp::SetText {
            node,
            text: text.to_string(),
        });
        Ok(())
    }

    fn insert(
        &mut self,
        node: NodeHandle,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), HostError> {
        self.attach(node, parent, anchor)?;
        self.ops.push(HostOp::Insert {
            node,
            parent,
            anchor,
        });
        Ok(())
    }

    fn remove(&mut self, node: NodeHandle, parent: NodeHandle) -> Result<(), HostError> {
        let index = self.index(node)?;
        if self.nodes[index].parent != Some(parent) {
            return Err(HostError::InvalidParent(node));
        }
        self.detach(node)?;
        self.release_subtree(node);
        self.ops.push(HostOp::Remove { node, parent });
        Ok(())
    }

    fn set_prop(
        &mut self,
        node: NodeHandle,
        key: &str,
        _prev: Option<&Value>,
        next: Option<&Value>,
    ) -> Result<(), HostError> {
        let index = self.index(node)?;
        let NodeKind::Element { props, text, .. } = &mut self.nodes[index].kind else {
            return Err(HostError::WrongNodeKind(node));
        };
        if key == TEXT_CONTENT {
            *text = next.map(ToString::to_string);
        } else {
            match next {
                Some(value) => {
                    props.insert(Arc::from(key), value.clone());
                }
                None => {
                    props.remove(key);
                }
            }
        }
        self.ops.push(HostOp::SetProp {
            node,
            key: Arc::from(key),
            value: next.cloned(),
        });
        Ok(())
    }

    fn move_node(
        &mut self,
        node: NodeHandle,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), HostError> {
        if anchor == Some(node) {
            return Err(HostError::InvalidSibling {
                parent,
                before: node,
            });
        }
        self.index(parent)?;
        self.detach(node)?;
        self.attach(node, parent, anchor)?;
        self.ops.push(HostOp::Move {
            node,
            parent,
            anchor,
        });
        Ok(())
    }
}

fn handler_key(event: &str) -> String {
    let mut chars = event.chars();
    match chars.next() {
        Some(first) => format!("on{}{}", first.to_uppercase(), chars.as_str()),
        None => "on".to_string(),
    }
}
