use core_types::{NodeHandle, Value};
use thiserror::Error;

/// Prop key used to replace an element's whole text content.
pub const TEXT_CONTENT: &str = "textContent";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("handle {0} is reserved and never names a node")]
    InvalidHandle(NodeHandle),
    #[error("host node {0} does not exist")]
    MissingNode(NodeHandle),
    #[error("host node {0} cannot take this parent relation")]
    InvalidParent(NodeHandle),
    #[error("anchor {before} is not a child of {parent}")]
    InvalidSibling {
        parent: NodeHandle,
        before: NodeHandle,
    },
    #[error("inserting {child} under {parent} would create a cycle")]
    CycleDetected {
        parent: NodeHandle,
        child: NodeHandle,
    },
    #[error("host node {0} has the wrong kind for this operation")]
    WrongNodeKind(NodeHandle),
}

/// Capability set the reconciler requires from a host platform.
///
/// Contract:
/// - `insert` attaches a detached node; `move_node` relocates an attached one.
/// - `anchor == None` means append at the end of `parent`.
/// - `anchor`, when present, must be a current child of `parent`.
/// - `remove` detaches `node` from `parent` and releases its subtree.
/// - `set_prop` with `next == None` removes the prop.
///
/// Failures are returned, never swallowed; the reconciler propagates them as-is.
pub trait HostAdapter {
    fn create_node(&mut self, tag: &str) -> Result<NodeHandle, HostError>;

    fn create_text_node(&mut self, text: &str) -> Result<NodeHandle, HostError>;

    fn set_text(&mut self, node: NodeHandle, text: &str) -> Result<(), HostError>;

    fn insert(
        &mut self,
        node: NodeHandle,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), HostError>;

    fn remove(&mut self, node: NodeHandle, parent: NodeHandle) -> Result<(), HostError>;

    fn set_prop(
        &mut self,
        node: NodeHandle,
        key: &str,
        prev: Option<&Value>,
        next: Option<&Value>,
    ) -> Result<(), HostError>;

    fn move_node(
        &mut self,
        node: NodeHandle,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), HostError>;
}
