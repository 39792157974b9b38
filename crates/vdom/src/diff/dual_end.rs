use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::vnode::{VNode, is_reusable};
use core_types::NodeHandle;
use host::HostAdapter;

impl<H: HostAdapter> Renderer<H> {
    /// Four-cursor keyed diff.
    ///
    /// Per step, in priority order: start/start, old-end/new-start, old-start/new-end,
    /// end/end. When none match, the unconsumed old range is scanned for new-start:
    /// a hit is patched, moved before old-start and tombstoned; a miss mounts
    /// new-start before old-start. The loop stops when either range is empty.
    pub(crate) fn diff_dual_end(
        &mut self,
        old: &[VNode],
        new: &mut [VNode],
        parent: NodeHandle,
        end_anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let mut slots: Vec<Option<&VNode>> = old.iter().map(Some).collect();
        // Half-open ranges: old[os..oe], new[ns..ne].
        let (mut os, mut oe) = (0, old.len());
        let (mut ns, mut ne) = (0, new.len());

        while os < oe && ns < ne {
            let Some(old_start) = slots[os] else {
                os += 1;
                continue;
            };
            let Some(old_end) = slots[oe - 1] else {
                oe -= 1;
                continue;
            };
            // Host node right after the unprocessed range.
            let tail = self.first_host_in(&new[ne..]).or(end_anchor);

            if is_reusable(old_start, &new[ns]) {
                let anchor = self.range_anchor(&slots[os + 1..oe], tail);
                self.patch(Some(old_start), &mut new[ns], parent, anchor)?;
                os += 1;
                ns += 1;
            } else if is_reusable(old_end, &new[ns]) {
                let anchor = self.range_anchor(&slots[os..oe - 1], tail);
                self.patch(Some(old_end), &mut new[ns], parent, anchor)?;
                log::trace!(target: "vdom.diff", "dual-end move old end {} to front", oe - 1);
                self.move_vnode(&new[ns], parent, anchor)?;
                oe -= 1;
                ns += 1;
            } else if is_reusable(old_start, &new[ne - 1]) {
                self.patch(Some(old_start), &mut new[ne - 1], parent, tail)?;
                log::trace!(target: "vdom.diff", "dual-end move old start {os} to back");
                self.move_vnode(&new[ne - 1], parent, tail)?;
                os += 1;
                ne -= 1;
            } else if is_reusable(old_end, &new[ne - 1]) {
                self.patch(Some(old_end), &mut new[ne - 1], parent, tail)?;
                oe -= 1;
                ne -= 1;
            } else {
                let found = (os..oe).find(|&k| slots[k].is_some_and(|o| is_reusable(o, &new[ns])));
                match found {
                    Some(k) => {
                        let matched = slots[k].take();
                        let anchor = self.range_anchor(&slots[os..oe], tail);
                        self.patch(matched, &mut new[ns], parent, anchor)?;
                        log::trace!(target: "vdom.diff", "dual-end scan hit old {k}, move to front");
                        self.move_vnode(&new[ns], parent, anchor)?;
                    }
                    None => {
                        let anchor = self.range_anchor(&slots[os..oe], tail);
                        self.patch(None, &mut new[ns], parent, anchor)?;
                    }
                }
                ns += 1;
            }
        }

        if ns < ne {
            let tail = self.first_host_in(&new[ne..]).or(end_anchor);
            for node in &mut new[ns..ne] {
                self.patch(None, node, parent, tail)?;
            }
        }
        for node in slots[os..oe].iter().flatten() {
            self.unmount(node, parent)?;
        }
        Ok(())
    }

    /// First host node among live old slots, else `tail`.
    fn range_anchor(&self, slots: &[Option<&VNode>], tail: Option<NodeHandle>) -> Option<NodeHandle> {
        slots
            .iter()
            .flatten()
            .find_map(|node| self.first_host(node))
            .or(tail)
    }
}
