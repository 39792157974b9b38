//! Dual-end diff on crossed ends, scan misses and unkeyed lists.

use host::{HostOpKind, MemoryHost};
use vdom::{DiffStrategy, Renderer, RendererConfig, VNode};
use vdom_test_support::keyed::{keyed_list, keys_of, list_texts};

#[test]
fn crossed_ends_take_exactly_two_moves() {
    let mut host = MemoryHost::new();
    let root = host.create_container("div");
    let mut r = Renderer::with_config(host, RendererConfig::with_strategy(DiffStrategy::DualEnd));
    r.render(Some(keyed_list(&keys_of("abcd"))), root).unwrap();
    let before = r.host().children(r.host().children(root)[0]).to_vec();
    r.host_mut().clear_ops();

    r.render(Some(keyed_list(&keys_of("bdac"))), root).unwrap();
    assert_eq!(list_texts(r.host(), root), keys_of("bdac"));
    assert_eq!(r.host().count(HostOpKind::Move), 2);
    assert_eq!(r.host().count(HostOpKind::Insert), 0);
    assert_eq!(r.host().count(HostOpKind::Remove), 0);
    let after = r.host().children(r.host().children(root)[0]).to_vec();
    assert_eq!(after, vec![before[1], before[3], before[0], before[2]]);
}

#[test]
fn scan_miss_mounts_and_keeps_going() {
    let mut host = MemoryHost::new();
    let root = host.create_container("div");
    let mut r = Renderer::with_config(host, RendererConfig::with_strategy(DiffStrategy::DualEnd));
    r.render(Some(keyed_list(&keys_of("abc"))), root).unwrap();
    r.render(Some(keyed_list(&keys_of("xbzy"))), root).unwrap();
    assert_eq!(list_texts(r.host(), root), keys_of("xbzy"));
}

#[test]
fn unkeyed_children_never_match_by_position_in_keyed_mode() {
    let list = |texts: &[&str]| {
        VNode::element("ul").with_children(texts.iter().map(|t| VNode::element("li").with_text(*t)))
    };
    let mut host = MemoryHost::new();
    let root = host.create_container("div");
    let mut r = Renderer::with_config(host, RendererConfig::with_strategy(DiffStrategy::DualEnd));
    r.render(Some(list(&["a", "b"])), root).unwrap();
    r.host_mut().clear_ops();
    r.render(Some(list(&["a", "b"])), root).unwrap();
    assert_eq!(r.host().count(HostOpKind::Insert), 2);
    assert_eq!(r.host().count(HostOpKind::Remove), 2);
    assert_eq!(list_texts(r.host(), root), vec!["a", "b"]);
}
