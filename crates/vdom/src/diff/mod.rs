//! Child-list reconciliation.
//!
//! Four interchangeable strategies share one contract: afterwards the host
//! children of `parent` between the list start and `end_anchor` match `new` in
//! order, and every reused node carries the host node of its old counterpart.
//! The renderer applies whichever strategy its config selects; nothing here
//! inspects keys to choose one.

mod dual_end;
mod fast;
mod single_end;
mod unkeyed;

use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::vnode::VNode;
use core_types::NodeHandle;
use host::HostAdapter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DiffStrategy {
    /// Positional pairing. Never moves.
    #[default]
    Unkeyed,
    /// Forward scan with a running maximum old index.
    SingleEnd,
    /// Four cursors, then a linear scan of the remaining old range.
    DualEnd,
    /// Prefix/suffix trimming, then moves outside the longest increasing run.
    Fast,
}

impl DiffStrategy {
    pub const ALL: [DiffStrategy; 4] = [
        DiffStrategy::Unkeyed,
        DiffStrategy::SingleEnd,
        DiffStrategy::DualEnd,
        DiffStrategy::Fast,
    ];

    pub const KEYED: [DiffStrategy; 3] = [
        DiffStrategy::SingleEnd,
        DiffStrategy::DualEnd,
        DiffStrategy::Fast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DiffStrategy::Unkeyed => "unkeyed",
            DiffStrategy::SingleEnd => "single-end",
            DiffStrategy::DualEnd => "dual-end",
            DiffStrategy::Fast => "fast",
        }
    }
}

impl<H: HostAdapter> Renderer<H> {
    pub(crate) fn reconcile_children(
        &mut self,
        old: &[VNode],
        new: &mut [VNode],
        parent: NodeHandle,
        end_anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let strategy = self.config.diff_strategy;
        log::trace!(
            target: "vdom.diff",
            "{} diff in {parent}: {} -> {}",
            strategy.name(),
            old.len(),
            new.len()
        );
        match strategy {
            DiffStrategy::Unkeyed => self.diff_unkeyed(old, new, parent, end_anchor),
            DiffStrategy::SingleEnd => self.diff_single_end(old, new, parent, end_anchor),
            DiffStrategy::DualEnd => self.diff_dual_end(old, new, parent, end_anchor),
            DiffStrategy::Fast => self.diff_fast(old, new, parent, end_anchor),
        }
    }
}
