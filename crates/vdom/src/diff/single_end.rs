use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::vnode::{VNode, is_reusable};
use core_types::NodeHandle;
use host::HostAdapter;

/// One host position in the list while it is being rearranged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Old(usize),
    New(usize),
}

impl<H: HostAdapter> Renderer<H> {
    /// Forward scan keyed diff.
    ///
    /// `last_index` is the largest old index matched so far. A match below it is
    /// out of order and moves to just after the previous new child; anything else
    /// stays put. Unmatched new children mount right after the previous new child.
    /// O(n * m).
    pub(crate) fn diff_single_end(
        &mut self,
        old: &[VNode],
        new: &mut [VNode],
        parent: NodeHandle,
        end_anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        // Mirrors host order so the node after any position can be named.
        let mut order: Vec<Slot> = (0..old.len()).map(Slot::Old).collect();
        let mut matched = vec![false; old.len()];
        let mut last_index = 0;

        for i in 0..new.len() {
            let found = (0..old.len()).find(|&j| !matched[j] && is_reusable(&old[j], &new[i]));
            match found {
                Some(j) => {
                    matched[j] = true;
                    let at = position(&order, Slot::Old(j));
                    order[at] = Slot::New(i);
                    let anchor = self.slot_anchor(&order[at + 1..], old, new, end_anchor);
                    self.patch(Some(&old[j]), &mut new[i], parent, anchor)?;
                    if j < last_index {
                        order.remove(at);
                        let to = after_previous(&order, i);
                        order.insert(to, Slot::New(i));
                        let anchor = self.slot_anchor(&order[to + 1..], old, new, end_anchor);
                        log::trace!(target: "vdom.diff", "single-end move old {j} -> new {i}");
                        self.move_vnode(&new[i], parent, anchor)?;
                    } else {
                        last_index = j;
                    }
                }
                None => {
                    let to = after_previous(&order, i);
                    order.insert(to, Slot::New(i));
                    let anchor = self.slot_anchor(&order[to + 1..], old, new, end_anchor);
                    self.patch(None, &mut new[i], parent, anchor)?;
                }
            }
        }

        for (j, node) in old.iter().enumerate() {
            if !matched[j] {
                self.unmount(node, parent)?;
            }
        }
        Ok(())
    }

    fn slot_anchor(
        &self,
        following: &[Slot],
        old: &[VNode],
        new: &[VNode],
        end_anchor: Option<NodeHandle>,
    ) -> Option<NodeHandle> {
        following
            .iter()
            .find_map(|slot| match *slot {
                Slot::Old(j) => self.first_host(&old[j]),
                Slot::New(i) => self.first_host(&new[i]),
            })
            .or(end_anchor)
    }
}

fn position(order: &[Slot], slot: Slot) -> usize {
    order.iter().position(|s| *s == slot).unwrap_or(order.len())
}

/// Insertion index right after new child `i - 1`, or the list start for `i == 0`.
fn after_previous(order: &[Slot], i: usize) -> usize {
    match i.checked_sub(1) {
        Some(prev) => order
            .iter()
            .position(|s| *s == Slot::New(prev))
            .map_or(0, |p| p + 1),
        None => 0,
    }
}
