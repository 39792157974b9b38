//! Virtual nodes.
//!
//! A [`VNode`] describes one position of a declarative tree. The reconciler writes
//! two back-references into it while patching: `el` (the host node it produced)
//! and `component` (the instance backing a component node). Each tree is owned by
//! the pass that produced it and is read-only once published, until the next pass
//! replaces it.

use crate::component::{Component, InstanceId};
use core_types::{NodeHandle, PropMap, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Sibling identity used by the keyed diff strategies.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Str(Arc<str>),
    Int(i64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(v) => f.write_str(v),
            Key::Int(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::Str(Arc::from(v))
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::Str(Arc::from(v))
    }
}

impl From<char> for Key {
    fn from(v: char) -> Self {
        Key::Str(Arc::from(v.to_string()))
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Int(v)
    }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self {
        Key::Int(i64::from(v))
    }
}

impl From<u32> for Key {
    fn from(v: u32) -> Self {
        Key::Int(i64::from(v))
    }
}

/// Slot provider: produces the children a component renders in a named slot.
#[derive(Clone)]
pub struct Slot(Rc<dyn Fn() -> Vec<VNode>>);

impl Slot {
    pub fn new(f: impl Fn() -> Vec<VNode> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn render(&self) -> Vec<VNode> {
        (self.0)()
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Slot(..)")
    }
}

pub type Slots = BTreeMap<Arc<str>, Slot>;

pub const DEFAULT_SLOT: &str = "default";

#[derive(Clone, Debug, Default)]
pub enum Children {
    #[default]
    None,
    Text(String),
    Nodes(Vec<VNode>),
    Slots(Slots),
}

impl Children {
    pub fn as_nodes(&self) -> &[VNode] {
        match self {
            Children::Nodes(nodes) => nodes,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug)]
pub enum VNodeKind {
    Element(Arc<str>),
    Text,
    Comment,
    Fragment,
    Component(Component),
    Teleport,
}

impl VNodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            VNodeKind::Element(_) => "element",
            VNodeKind::Text => "text",
            VNodeKind::Comment => "comment",
            VNodeKind::Fragment => "fragment",
            VNodeKind::Component(_) => "component",
            VNodeKind::Teleport => "teleport",
        }
    }
}

/// Flags a keep-alive container writes onto its child to redirect mount/unmount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeepAliveFlags {
    /// Unmount deactivates instead of destroying.
    pub should_keep_alive: bool,
    /// Mount activates the cached instance instead of constructing one.
    pub kept_alive: bool,
    /// The keep-alive instance that owns the cache entry.
    pub owner: Option<InstanceId>,
}

#[derive(Clone, Debug)]
pub struct VNode {
    pub kind: VNodeKind,
    pub key: Option<Key>,
    pub props: PropMap,
    pub children: Children,
    pub el: Option<NodeHandle>,
    pub component: Option<InstanceId>,
    pub keep_alive: KeepAliveFlags,
}

impl VNode {
    fn new(kind: VNodeKind) -> Self {
        Self {
            kind,
            key: None,
            props: PropMap::new(),
            children: Children::None,
            el: None,
            component: None,
            keep_alive: KeepAliveFlags::default(),
        }
    }

    pub fn element(tag: &str) -> Self {
        Self::new(VNodeKind::Element(Arc::from(tag)))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(VNodeKind::Text).with_text(text)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(VNodeKind::Comment).with_text(text)
    }

    pub fn fragment<I>(children: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<Option<VNode>>,
    {
        Self::new(VNodeKind::Fragment).with_children(children)
    }

    pub fn component(def: &Component) -> Self {
        Self::new(VNodeKind::Component(def.clone()))
    }

    /// A keep-alive container whose default slot renders `child`.
    pub fn keep_alive(child: VNode) -> Self {
        Self::component(&Component::keep_alive())
            .with_slot(DEFAULT_SLOT, move || vec![child.clone()])
    }

    /// Children render into `target` instead of the surrounding parent.
    pub fn teleport<I>(target: NodeHandle, children: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<Option<VNode>>,
    {
        Self::new(VNodeKind::Teleport)
            .with_prop(TELEPORT_TARGET, target)
            .with_children(children)
    }

    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(Arc::from(key), value.into());
        self
    }

    /// Replace the children with a node list. `None` entries are dropped.
    pub fn with_children<I>(mut self, children: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<Option<VNode>>,
    {
        self.children = Children::Nodes(
            children
                .into_iter()
                .filter_map(Into::<Option<VNode>>::into)
                .collect(),
        );
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children = Children::Text(text.into());
        self
    }

    /// Add a named slot provider. Only component nodes read slots.
    pub fn with_slot(mut self, name: &str, f: impl Fn() -> Vec<VNode> + 'static) -> Self {
        if !matches!(self.children, Children::Slots(_)) {
            self.children = Children::Slots(Slots::new());
        }
        if let Children::Slots(slots) = &mut self.children {
            slots.insert(Arc::from(name), Slot::new(f));
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            VNodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    /// Text of a text/comment node, or the text children of an element.
    pub fn text_content(&self) -> &str {
        match &self.children {
            Children::Text(text) => text,
            _ => "",
        }
    }

    pub fn child_nodes(&self) -> &[VNode] {
        self.children.as_nodes()
    }

    pub fn is_keep_alive(&self) -> bool {
        matches!(&self.kind, VNodeKind::Component(def) if def.is_keep_alive())
    }

    pub fn is_teleport(&self) -> bool {
        matches!(self.kind, VNodeKind::Teleport)
    }

    /// Keep-alive and teleport nodes match each other without keys.
    pub(crate) fn matches_without_key(&self) -> bool {
        self.is_keep_alive() || self.is_teleport()
    }
}

/// Prop naming a teleport's host target.
pub const TELEPORT_TARGET: &str = "to";

/// Whether `old` can be patched into `new` in place.
///
/// Elements compare tags, components compare descriptor identity. Two keep-alive
/// containers, or two teleports, always share a type.
pub fn same_type(old: &VNode, new: &VNode) -> bool {
    match (&old.kind, &new.kind) {
        (VNodeKind::Element(a), VNodeKind::Element(b)) => a == b,
        (VNodeKind::Text, VNodeKind::Text)
        | (VNodeKind::Comment, VNodeKind::Comment)
        | (VNodeKind::Fragment, VNodeKind::Fragment)
        | (VNodeKind::Teleport, VNodeKind::Teleport) => true,
        (VNodeKind::Component(a), VNodeKind::Component(b)) => {
            a.ptr_eq(b) || (a.is_keep_alive() && b.is_keep_alive())
        }
        _ => false,
    }
}

/// Whether two siblings may share one host node across an update.
///
/// Nodes without a key are never reusable, except for the keep-alive and
/// teleport pairs which always are.
pub fn is_reusable(old: &VNode, new: &VNode) -> bool {
    if (old.is_keep_alive() && new.is_keep_alive()) || (old.is_teleport() && new.is_teleport()) {
        return true;
    }
    match (&old.key, &new.key) {
        (Some(a), Some(b)) => a == b && same_type(old, new),
        _ => false,
    }
}
