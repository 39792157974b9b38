//! Keyed-list helpers driving a `Renderer<MemoryHost>`.

use host::{HostOpKind, MemoryHost};
use std::collections::BTreeMap;
use vdom::{DiffStrategy, Renderer, RendererConfig, VNode};

/// `<ul>` with one keyed `<li>` per key, each showing its key as text.
pub fn keyed_list(keys: &[String]) -> VNode {
    VNode::element("ul").with_children(
        keys.iter()
            .map(|key| VNode::element("li").with_key(key.as_str()).with_text(key.as_str())),
    )
}

pub fn keys_of(raw: &str) -> Vec<String> {
    raw.chars().map(String::from).collect()
}

/// What one keyed update did to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReorderOutcome {
    /// Texts of the list items after the update, in host order.
    pub order: Vec<String>,
    pub moves: usize,
    pub inserts: usize,
    pub removes: usize,
    pub set_props: usize,
    /// Keys present in both lists whose host node was replaced.
    pub identity_breaks: Vec<String>,
}

/// Render `old`, then `new`, into a fresh host using `strategy`.
pub fn run_reorder(strategy: DiffStrategy, old: &[String], new: &[String]) -> ReorderOutcome {
    let mut host = MemoryHost::new();
    let root = host.create_container("div");
    let mut renderer = Renderer::with_config(host, RendererConfig::with_strategy(strategy));
    renderer
        .render(Some(keyed_list(old)), root)
        .unwrap_or_else(|err| panic!("{} mount of {old:?} failed: {err}", strategy.name()));
    let before = handles_by_text(renderer.host(), root);
    renderer.host_mut().clear_ops();

    renderer
        .render(Some(keyed_list(new)), root)
        .unwrap_or_else(|err| panic!("{} update {old:?} -> {new:?} failed: {err}", strategy.name()));
    let host = renderer.host();
    let after = handles_by_text(host, root);
    let identity_breaks = new
        .iter()
        .filter(|key| before.contains_key(*key) && before.get(*key) != after.get(*key))
        .cloned()
        .collect();
    ReorderOutcome {
        order: list_texts(host, root),
        moves: host.count(HostOpKind::Move),
        inserts: host.count(HostOpKind::Insert),
        removes: host.count(HostOpKind::Remove),
        set_props: host.count(HostOpKind::SetProp),
        identity_breaks,
    }
}

/// Item texts of the single list rendered into `root`.
pub fn list_texts(host: &MemoryHost, root: core_types::NodeHandle) -> Vec<String> {
    match host.children(root).first() {
        Some(list) => host.child_texts(*list),
        None => Vec::new(),
    }
}

fn handles_by_text(
    host: &MemoryHost,
    root: core_types::NodeHandle,
) -> BTreeMap<String, core_types::NodeHandle> {
    let Some(list) = host.children(root).first() else {
        return BTreeMap::new();
    };
    host.children(*list)
        .iter()
        .map(|item| (host.text_content(*item), *item))
        .collect()
}
