//! Recorded host operations.
//!
//! One variant per [`HostAdapter`](crate::HostAdapter) call, in call order.
//! Tests assert on these to check move counts and the absence of redundant writes.

use core_types::{NodeHandle, Value};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub enum HostOp {
    CreateNode {
        node: NodeHandle,
        tag: Arc<str>,
    },
    CreateText {
        node: NodeHandle,
        text: String,
    },
    SetText {
        node: NodeHandle,
        text: String,
    },
    Insert {
        node: NodeHandle,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    },
    Remove {
        node: NodeHandle,
        parent: NodeHandle,
    },
    /// `value == None` records a prop removal.
    SetProp {
        node: NodeHandle,
        key: Arc<str>,
        value: Option<Value>,
    },
    Move {
        node: NodeHandle,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostOpKind {
    CreateNode,
    CreateText,
    SetText,
    Insert,
    Remove,
    SetProp,
    Move,
}

impl HostOp {
    pub fn kind(&self) -> HostOpKind {
        match self {
            HostOp::CreateNode { .. } => HostOpKind::CreateNode,
            HostOp::CreateText { .. } => HostOpKind::CreateText,
            HostOp::SetText { .. } => HostOpKind::SetText,
            HostOp::Insert { .. } => HostOpKind::Insert,
            HostOp::Remove { .. } => HostOpKind::Remove,
            HostOp::SetProp { .. } => HostOpKind::SetProp,
            HostOp::Move { .. } => HostOpKind::Move,
        }
    }

    /// Whether this op changes tree structure rather than node content.
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind(),
            HostOpKind::Insert | HostOpKind::Remove | HostOpKind::Move
        )
    }
}
