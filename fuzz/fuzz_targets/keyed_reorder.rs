#![no_main]

use host::MemoryHost;
use libfuzzer_sys::fuzz_target;
use vdom::{DiffStrategy, Renderer, RendererConfig, VNode};

fn list(keys: &[u8]) -> VNode {
    VNode::element("ul").with_children(
        keys.iter()
            .map(|k| VNode::element("li").with_key(i64::from(*k)).with_text(k.to_string())),
    )
}

fn dedup(raw: &[u8]) -> Vec<u8> {
    let mut seen = [false; 256];
    raw.iter()
        .copied()
        .filter(|k| !std::mem::replace(&mut seen[usize::from(*k)], true))
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let split = data.first().map_or(0, |n| usize::from(*n)).min(data.len().saturating_sub(1));
    let body = data.get(1..).unwrap_or(&[]);
    let (old, new) = body.split_at(split.min(body.len()));
    let old = dedup(old);
    let new = dedup(new);
    let expected: Vec<String> = new.iter().map(u8::to_string).collect();

    for strategy in DiffStrategy::KEYED {
        let mut host = MemoryHost::new();
        let root = host.create_container("div");
        let mut r = Renderer::with_config(host, RendererConfig::with_strategy(strategy));
        r.render(Some(list(&old)), root).expect("mount");
        r.render(Some(list(&new)), root).expect("update");
        let ul = r.host().children(root)[0];
        assert_eq!(r.host().child_texts(ul), expected, "{}", strategy.name());
        r.render(None, root).expect("unmount");
        assert_eq!(r.host().live_count(), 1);
    }
});
