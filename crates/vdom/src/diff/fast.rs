use crate::error::RenderError;
use crate::lis::longest_increasing_subsequence;
use crate::renderer::Renderer;
use crate::vnode::{Key, VNode, is_reusable};
use core_types::NodeHandle;
use host::HostAdapter;
use std::collections::HashMap;

impl<H: HostAdapter> Renderer<H> {
    /// Prefix/suffix trimming plus LIS-guided moves.
    ///
    /// For the middle range, `source[p]` holds `old_index + 1` of the old node
    /// matched to new position `p`, or `0` when `p` must be mounted. Only the
    /// matched entries outside one longest increasing run of `source` move, so the
    /// move count is `matched - |LIS|`.
    ///
    /// Matched pairs are patched in the back-to-front walk, after everything that
    /// follows them is final, so anything a patch mounts lands before the right
    /// host node.
    pub(crate) fn diff_fast(
        &mut self,
        old: &[VNode],
        new: &mut [VNode],
        parent: NodeHandle,
        end_anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let mut j = 0;
        let mut old_end = old.len();
        let mut new_end = new.len();

        while j < old_end && j < new_end && is_reusable(&old[j], &new[j]) {
            let anchor = self.first_host_in(&old[j + 1..]).or(end_anchor);
            self.patch(Some(&old[j]), &mut new[j], parent, anchor)?;
            j += 1;
        }
        while j < old_end && j < new_end && is_reusable(&old[old_end - 1], &new[new_end - 1]) {
            let anchor = self.first_host_in(&new[new_end..]).or(end_anchor);
            self.patch(Some(&old[old_end - 1]), &mut new[new_end - 1], parent, anchor)?;
            old_end -= 1;
            new_end -= 1;
        }

        if j == old_end {
            let anchor = self.first_host_in(&new[new_end..]).or(end_anchor);
            for node in &mut new[j..new_end] {
                self.patch(None, node, parent, anchor)?;
            }
            return Ok(());
        }
        if j == new_end {
            for node in &old[j..old_end] {
                self.unmount(node, parent)?;
            }
            return Ok(());
        }

        let count = new_end - j;
        let mut key_index: HashMap<Key, usize> = HashMap::with_capacity(count);
        for (p, node) in new[j..new_end].iter().enumerate() {
            if let Some(key) = &node.key {
                key_index.entry(key.clone()).or_insert(p);
            }
        }

        let mut source = vec![0usize; count];
        let mut moved = false;
        let mut max_pos = 0;
        let mut patched = 0;
        for (offset, old_node) in old[j..old_end].iter().enumerate() {
            if patched >= count {
                self.unmount(old_node, parent)?;
                continue;
            }
            let keyed = old_node
                .key
                .as_ref()
                .and_then(|key| key_index.get(key).copied())
                .filter(|&p| source[p] == 0 && is_reusable(old_node, &new[j + p]));
            let found = keyed.or_else(|| {
                if old_node.matches_without_key() {
                    (0..count).find(|&p| source[p] == 0 && is_reusable(old_node, &new[j + p]))
                } else {
                    None
                }
            });
            let Some(p) = found else {
                self.unmount(old_node, parent)?;
                continue;
            };
            source[p] = j + offset + 1;
            if p < max_pos {
                moved = true;
            } else {
                max_pos = p;
            }
            patched += 1;
        }

        let run = if moved {
            longest_increasing_subsequence(&source)
        } else {
            Vec::new()
        };
        log::trace!(
            target: "vdom.diff",
            "fast diff middle: {count} new, {patched} matched, moved={moved}, stable={}",
            run.len()
        );
        let mut next_stable = run.len();
        for p in (0..count).rev() {
            let at = j + p;
            let anchor = self.first_host_in(&new[at + 1..]).or(end_anchor);
            if source[p] == 0 {
                self.patch(None, &mut new[at], parent, anchor)?;
                continue;
            }
            self.patch(Some(&old[source[p] - 1]), &mut new[at], parent, anchor)?;
            if moved {
                if next_stable > 0 && run[next_stable - 1] == p {
                    next_stable -= 1;
                } else {
                    self.move_vnode(&new[at], parent, anchor)?;
                }
            }
        }
        Ok(())
    }
}
